//! Confirmed orders placed by clients.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entity::{Column, Entity, EntityDraft, EntityKind, FormField, InputKind};
use crate::domain::types::{
    ClientId, QuoteId, SalesOrderId, empty_as_none, normalize_currency_code, normalize_text,
    status_enum, validate_amount, validate_currency_code,
};

status_enum! {
    SalesOrderStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Shipped => "shipped",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SalesOrder {
    pub id: SalesOrderId,
    pub client_id: ClientId,
    pub quote_id: Option<QuoteId>,
    pub order_number: String,
    pub currency_code: String,
    pub total_amount: f64,
    pub order_date: NaiveDate,
    pub status: SalesOrderStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct SalesOrderDraft {
    pub client_id: ClientId,
    /// Accepted quote the order was raised from, if any.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub quote_id: Option<QuoteId>,
    #[validate(length(min = 1, max = 64))]
    pub order_number: String,
    #[validate(custom(function = "validate_currency_code"))]
    pub currency_code: String,
    #[validate(custom(function = "validate_amount"))]
    pub total_amount: f64,
    pub order_date: NaiveDate,
    pub status: SalesOrderStatus,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub notes: Option<String>,
}

impl EntityDraft for SalesOrderDraft {
    fn normalized(self) -> Self {
        Self {
            order_number: self.order_number.trim().to_string(),
            currency_code: normalize_currency_code(&self.currency_code),
            notes: normalize_text(self.notes),
            ..self
        }
    }
}

impl Entity for SalesOrder {
    type Id = SalesOrderId;
    type Draft = SalesOrderDraft;

    const KIND: EntityKind = EntityKind::SalesOrder;
    const COLUMNS: &'static [Column] = &[
        Column::new("order_number", "Number"),
        Column::new("order_date", "Date"),
        Column::new("currency_code", "Currency"),
        Column::new("total_amount", "Total"),
        Column::new("status", "Status"),
    ];
    const FORM_FIELDS: &'static [FormField] = &[
        FormField::required("client_id", "Client", InputKind::Reference(EntityKind::Client)),
        FormField::optional("quote_id", "Quote", InputKind::Reference(EntityKind::Quote)),
        FormField::required("order_number", "Order number", InputKind::Text),
        FormField::required("currency_code", "Currency", InputKind::Text),
        FormField::required("total_amount", "Total amount", InputKind::Number),
        FormField::required("order_date", "Order date", InputKind::Date),
        FormField::required(
            "status",
            "Status",
            InputKind::Select(SalesOrderStatus::OPTIONS),
        ),
        FormField::optional("notes", "Notes", InputKind::TextArea),
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["order_number", "notes"];

    fn id(&self) -> SalesOrderId {
        self.id
    }

    fn to_draft(&self) -> SalesOrderDraft {
        SalesOrderDraft {
            client_id: self.client_id,
            quote_id: self.quote_id,
            order_number: self.order_number.clone(),
            currency_code: self.currency_code.clone(),
            total_amount: self.total_amount,
            order_date: self.order_date,
            status: self.status,
            notes: self.notes.clone(),
        }
    }
}
