//! Priced offers sent to clients.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entity::{Column, Entity, EntityDraft, EntityKind, FormField, InputKind};
use crate::domain::types::{
    ClientId, LeadId, QuoteId, empty_as_none, normalize_currency_code, normalize_text,
    status_enum, validate_amount, validate_currency_code,
};

status_enum! {
    QuoteStatus {
        Draft => "draft",
        Sent => "sent",
        Accepted => "accepted",
        Rejected => "rejected",
        Expired => "expired",
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub id: QuoteId,
    pub client_id: ClientId,
    pub lead_id: Option<LeadId>,
    pub quote_number: String,
    pub currency_code: String,
    pub amount: f64,
    pub valid_till: Option<NaiveDate>,
    pub status: QuoteStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct QuoteDraft {
    pub client_id: ClientId,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub lead_id: Option<LeadId>,
    #[validate(length(min = 1, max = 64))]
    pub quote_number: String,
    #[validate(custom(function = "validate_currency_code"))]
    pub currency_code: String,
    #[validate(custom(function = "validate_amount"))]
    pub amount: f64,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub valid_till: Option<NaiveDate>,
    pub status: QuoteStatus,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub notes: Option<String>,
}

impl EntityDraft for QuoteDraft {
    fn normalized(self) -> Self {
        Self {
            quote_number: self.quote_number.trim().to_string(),
            currency_code: normalize_currency_code(&self.currency_code),
            notes: normalize_text(self.notes),
            ..self
        }
    }
}

impl Entity for Quote {
    type Id = QuoteId;
    type Draft = QuoteDraft;

    const KIND: EntityKind = EntityKind::Quote;
    const COLUMNS: &'static [Column] = &[
        Column::new("quote_number", "Number"),
        Column::new("currency_code", "Currency"),
        Column::new("amount", "Amount"),
        Column::new("valid_till", "Valid till"),
        Column::new("status", "Status"),
    ];
    const FORM_FIELDS: &'static [FormField] = &[
        FormField::required("client_id", "Client", InputKind::Reference(EntityKind::Client)),
        FormField::optional("lead_id", "Lead", InputKind::Reference(EntityKind::Lead)),
        FormField::required("quote_number", "Quote number", InputKind::Text),
        FormField::required("currency_code", "Currency", InputKind::Text),
        FormField::required("amount", "Amount", InputKind::Number),
        FormField::optional("valid_till", "Valid till", InputKind::Date),
        FormField::required("status", "Status", InputKind::Select(QuoteStatus::OPTIONS)),
        FormField::optional("notes", "Notes", InputKind::TextArea),
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["quote_number", "notes"];

    fn id(&self) -> QuoteId {
        self.id
    }

    fn to_draft(&self) -> QuoteDraft {
        QuoteDraft {
            client_id: self.client_id,
            lead_id: self.lead_id,
            quote_number: self.quote_number.clone(),
            currency_code: self.currency_code.clone(),
            amount: self.amount,
            valid_till: self.valid_till,
            status: self.status,
            notes: self.notes.clone(),
        }
    }
}
