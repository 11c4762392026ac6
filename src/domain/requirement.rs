//! Goods or services a client has asked the company to source.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entity::{Column, Entity, EntityDraft, EntityKind, FormField, InputKind};
use crate::domain::types::{ClientId, RequirementId, empty_as_none, normalize_text, status_enum};

status_enum! {
    RequirementStatus {
        Open => "open",
        InProgress => "in_progress",
        Fulfilled => "fulfilled",
        Cancelled => "cancelled",
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Requirement {
    pub id: RequirementId,
    pub client_id: ClientId,
    pub title: String,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub due_date: Option<NaiveDate>,
    pub status: RequirementStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct RequirementDraft {
    pub client_id: ClientId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub due_date: Option<NaiveDate>,
    pub status: RequirementStatus,
}

impl EntityDraft for RequirementDraft {
    fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: normalize_text(self.description),
            ..self
        }
    }
}

impl Entity for Requirement {
    type Id = RequirementId;
    type Draft = RequirementDraft;

    const KIND: EntityKind = EntityKind::Requirement;
    const COLUMNS: &'static [Column] = &[
        Column::new("title", "Title"),
        Column::new("quantity", "Quantity"),
        Column::new("due_date", "Due"),
        Column::new("status", "Status"),
    ];
    const FORM_FIELDS: &'static [FormField] = &[
        FormField::required("client_id", "Client", InputKind::Reference(EntityKind::Client)),
        FormField::required("title", "Title", InputKind::Text),
        FormField::optional("description", "Description", InputKind::TextArea),
        FormField::optional("quantity", "Quantity", InputKind::Number),
        FormField::optional("due_date", "Due date", InputKind::Date),
        FormField::required(
            "status",
            "Status",
            InputKind::Select(RequirementStatus::OPTIONS),
        ),
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "description"];

    fn id(&self) -> RequirementId {
        self.id
    }

    fn to_draft(&self) -> RequirementDraft {
        RequirementDraft {
            client_id: self.client_id,
            title: self.title.clone(),
            description: self.description.clone(),
            quantity: self.quantity,
            due_date: self.due_date,
            status: self.status,
        }
    }
}
