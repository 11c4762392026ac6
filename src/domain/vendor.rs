//! Suppliers the company buys from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entity::{Column, Entity, EntityDraft, EntityKind, FormField, InputKind};
use crate::domain::types::{VendorId, empty_as_none, normalize_email, normalize_text, status_enum};

status_enum! {
    VendorStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: VendorStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct VendorDraft {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub contact_person: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub address: Option<String>,
    pub status: VendorStatus,
}

impl EntityDraft for VendorDraft {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            contact_person: normalize_text(self.contact_person),
            email: normalize_email(self.email),
            phone: normalize_text(self.phone),
            address: normalize_text(self.address),
            status: self.status,
        }
    }
}

impl Entity for Vendor {
    type Id = VendorId;
    type Draft = VendorDraft;

    const KIND: EntityKind = EntityKind::Vendor;
    const COLUMNS: &'static [Column] = &[
        Column::new("name", "Name"),
        Column::new("contact_person", "Contact"),
        Column::new("email", "Email"),
        Column::new("phone", "Phone"),
        Column::new("status", "Status"),
    ];
    const FORM_FIELDS: &'static [FormField] = &[
        FormField::required("name", "Name", InputKind::Text),
        FormField::optional("contact_person", "Contact person", InputKind::Text),
        FormField::optional("email", "Email", InputKind::Email),
        FormField::optional("phone", "Phone", InputKind::Tel),
        FormField::optional("address", "Address", InputKind::TextArea),
        FormField::required("status", "Status", InputKind::Select(VendorStatus::OPTIONS)),
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "contact_person", "email"];

    fn id(&self) -> VendorId {
        self.id
    }

    fn to_draft(&self) -> VendorDraft {
        VendorDraft {
            name: self.name.clone(),
            contact_person: self.contact_person.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            status: self.status,
        }
    }
}
