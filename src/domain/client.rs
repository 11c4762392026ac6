//! Client accounts the sales team works with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entity::{Column, Entity, EntityDraft, EntityKind, FormField, InputKind};
use crate::domain::types::{ClientId, empty_as_none, normalize_email, normalize_text, status_enum};

status_enum! {
    /// Whether the client is still being served.
    ClientStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct ClientDraft {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub address: Option<String>,
    pub status: ClientStatus,
}

impl EntityDraft for ClientDraft {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: normalize_email(self.email),
            phone: normalize_text(self.phone),
            company: normalize_text(self.company),
            address: normalize_text(self.address),
            status: self.status,
        }
    }
}

impl Entity for Client {
    type Id = ClientId;
    type Draft = ClientDraft;

    const KIND: EntityKind = EntityKind::Client;
    const COLUMNS: &'static [Column] = &[
        Column::new("name", "Name"),
        Column::new("company", "Company"),
        Column::new("email", "Email"),
        Column::new("phone", "Phone"),
        Column::new("status", "Status"),
    ];
    const FORM_FIELDS: &'static [FormField] = &[
        FormField::required("name", "Name", InputKind::Text),
        FormField::optional("email", "Email", InputKind::Email),
        FormField::optional("phone", "Phone", InputKind::Tel),
        FormField::optional("company", "Company", InputKind::Text),
        FormField::optional("address", "Address", InputKind::TextArea),
        FormField::required("status", "Status", InputKind::Select(ClientStatus::OPTIONS)),
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "email", "phone", "company"];

    fn id(&self) -> ClientId {
        self.id
    }

    fn to_draft(&self) -> ClientDraft {
        ClientDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            company: self.company.clone(),
            address: self.address.clone(),
            status: self.status,
        }
    }
}
