//! Prospective clients that have not bought anything yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entity::{Column, Entity, EntityDraft, EntityKind, FormField, InputKind};
use crate::domain::types::{LeadId, empty_as_none, normalize_email, normalize_text, status_enum};

status_enum! {
    /// Position of a lead in the sales funnel.
    LeadStatus {
        New => "new",
        Contacted => "contacted",
        Qualified => "qualified",
        Converted => "converted",
        Lost => "lost",
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub status: LeadStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct LeadDraft {
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
    /// Channel the lead came from, e.g. "referral" or "website".
    #[serde(default, deserialize_with = "empty_as_none")]
    pub source: Option<String>,
    pub status: LeadStatus,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub notes: Option<String>,
}

impl EntityDraft for LeadDraft {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: normalize_email(self.email),
            phone: normalize_text(self.phone),
            company: normalize_text(self.company),
            source: normalize_text(self.source),
            status: self.status,
            notes: normalize_text(self.notes),
        }
    }
}

impl Entity for Lead {
    type Id = LeadId;
    type Draft = LeadDraft;

    const KIND: EntityKind = EntityKind::Lead;
    const COLUMNS: &'static [Column] = &[
        Column::new("name", "Name"),
        Column::new("company", "Company"),
        Column::new("email", "Email"),
        Column::new("source", "Source"),
        Column::new("status", "Status"),
    ];
    const FORM_FIELDS: &'static [FormField] = &[
        FormField::required("name", "Name", InputKind::Text),
        FormField::optional("email", "Email", InputKind::Email),
        FormField::optional("phone", "Phone", InputKind::Tel),
        FormField::optional("company", "Company", InputKind::Text),
        FormField::optional("source", "Source", InputKind::Text),
        FormField::required("status", "Status", InputKind::Select(LeadStatus::OPTIONS)),
        FormField::optional("notes", "Notes", InputKind::TextArea),
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "email", "company", "source"];

    fn id(&self) -> LeadId {
        self.id
    }

    fn to_draft(&self) -> LeadDraft {
        LeadDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            company: self.company.clone(),
            source: self.source.clone(),
            status: self.status,
            notes: self.notes.clone(),
        }
    }
}
