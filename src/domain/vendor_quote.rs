//! Prices vendors offered against a client requirement.
//!
//! `total_cost` is computed by the backend as `base_cost + additional_costs`
//! and therefore only exists on the persisted record, never on the draft.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entity::{Column, Entity, EntityDraft, EntityKind, FormField, InputKind};
use crate::domain::types::{
    RequirementId, RequirementItemId, VendorId, VendorQuoteId, empty_as_none,
    normalize_currency_code, normalize_text, status_enum, validate_amount, validate_currency_code,
};

status_enum! {
    VendorQuoteStatus {
        Received => "received",
        Shortlisted => "shortlisted",
        Approved => "approved",
        Rejected => "rejected",
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VendorQuote {
    pub id: VendorQuoteId,
    pub requirement_id: RequirementId,
    pub requirement_item_id: Option<RequirementItemId>,
    pub vendor_id: VendorId,
    pub currency_code: String,
    pub base_cost: f64,
    pub additional_costs: Option<f64>,
    pub total_cost: f64,
    pub vendor_quote_ref: Option<String>,
    pub valid_till: Option<NaiveDate>,
    pub status: VendorQuoteStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct VendorQuoteDraft {
    pub requirement_id: RequirementId,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub requirement_item_id: Option<RequirementItemId>,
    pub vendor_id: VendorId,
    #[validate(custom(function = "validate_currency_code"))]
    pub currency_code: String,
    #[validate(custom(function = "validate_amount"))]
    pub base_cost: f64,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(custom(function = "validate_amount"))]
    pub additional_costs: Option<f64>,
    /// Reference number printed on the vendor's own quote document.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub vendor_quote_ref: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub valid_till: Option<NaiveDate>,
    pub status: VendorQuoteStatus,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub notes: Option<String>,
}

impl VendorQuoteDraft {
    /// Total the backend will store for this draft.
    pub fn expected_total_cost(&self) -> f64 {
        self.base_cost + self.additional_costs.unwrap_or(0.0)
    }
}

impl EntityDraft for VendorQuoteDraft {
    fn normalized(self) -> Self {
        Self {
            currency_code: normalize_currency_code(&self.currency_code),
            vendor_quote_ref: normalize_text(self.vendor_quote_ref),
            notes: normalize_text(self.notes),
            ..self
        }
    }
}

impl Entity for VendorQuote {
    type Id = VendorQuoteId;
    type Draft = VendorQuoteDraft;

    const KIND: EntityKind = EntityKind::VendorQuote;
    const COLUMNS: &'static [Column] = &[
        Column::new("vendor_quote_ref", "Reference"),
        Column::new("currency_code", "Currency"),
        Column::new("base_cost", "Base cost"),
        Column::new("additional_costs", "Additional"),
        Column::new("total_cost", "Total"),
        Column::new("valid_till", "Valid till"),
        Column::new("status", "Status"),
    ];
    const FORM_FIELDS: &'static [FormField] = &[
        FormField::required(
            "requirement_id",
            "Requirement",
            InputKind::Reference(EntityKind::Requirement),
        ),
        FormField::optional("requirement_item_id", "Requirement item", InputKind::Text),
        FormField::required("vendor_id", "Vendor", InputKind::Reference(EntityKind::Vendor)),
        FormField::required("currency_code", "Currency", InputKind::Text),
        FormField::required("base_cost", "Base cost", InputKind::Number),
        FormField::optional("additional_costs", "Additional costs", InputKind::Number),
        FormField::optional("vendor_quote_ref", "Vendor reference", InputKind::Text),
        FormField::optional("valid_till", "Valid till", InputKind::Date),
        FormField::required(
            "status",
            "Status",
            InputKind::Select(VendorQuoteStatus::OPTIONS),
        ),
        FormField::optional("notes", "Notes", InputKind::TextArea),
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["vendor_quote_ref", "notes"];

    fn id(&self) -> VendorQuoteId {
        self.id
    }

    fn to_draft(&self) -> VendorQuoteDraft {
        VendorQuoteDraft {
            requirement_id: self.requirement_id,
            requirement_item_id: self.requirement_item_id,
            vendor_id: self.vendor_id,
            currency_code: self.currency_code.clone(),
            base_cost: self.base_cost,
            additional_costs: self.additional_costs,
            vendor_quote_ref: self.vendor_quote_ref.clone(),
            valid_till: self.valid_till,
            status: self.status,
            notes: self.notes.clone(),
        }
    }
}
