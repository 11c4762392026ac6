//! Money spent on behalf of the business, optionally tied to an order or vendor.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entity::{Column, Entity, EntityDraft, EntityKind, FormField, InputKind};
use crate::domain::types::{
    ExpenseId, SalesOrderId, VendorId, empty_as_none, normalize_currency_code, normalize_text,
    validate_amount, validate_currency_code,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub category: String,
    pub description: Option<String>,
    pub currency_code: String,
    pub amount: f64,
    pub expense_date: NaiveDate,
    pub vendor_id: Option<VendorId>,
    pub sales_order_id: Option<SalesOrderId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct ExpenseDraft {
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    #[validate(custom(function = "validate_currency_code"))]
    pub currency_code: String,
    #[validate(custom(function = "validate_amount"))]
    pub amount: f64,
    pub expense_date: NaiveDate,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub vendor_id: Option<VendorId>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sales_order_id: Option<SalesOrderId>,
}

impl EntityDraft for ExpenseDraft {
    fn normalized(self) -> Self {
        Self {
            category: self.category.trim().to_string(),
            description: normalize_text(self.description),
            currency_code: normalize_currency_code(&self.currency_code),
            ..self
        }
    }
}

impl Entity for Expense {
    type Id = ExpenseId;
    type Draft = ExpenseDraft;

    const KIND: EntityKind = EntityKind::Expense;
    const COLUMNS: &'static [Column] = &[
        Column::new("expense_date", "Date"),
        Column::new("category", "Category"),
        Column::new("description", "Description"),
        Column::new("currency_code", "Currency"),
        Column::new("amount", "Amount"),
    ];
    const FORM_FIELDS: &'static [FormField] = &[
        FormField::required("category", "Category", InputKind::Text),
        FormField::optional("description", "Description", InputKind::TextArea),
        FormField::required("currency_code", "Currency", InputKind::Text),
        FormField::required("amount", "Amount", InputKind::Number),
        FormField::required("expense_date", "Date", InputKind::Date),
        FormField::optional("vendor_id", "Vendor", InputKind::Reference(EntityKind::Vendor)),
        FormField::optional(
            "sales_order_id",
            "Sales order",
            InputKind::Reference(EntityKind::SalesOrder),
        ),
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["category", "description"];

    fn id(&self) -> ExpenseId {
        self.id
    }

    fn to_draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            category: self.category.clone(),
            description: self.description.clone(),
            currency_code: self.currency_code.clone(),
            amount: self.amount,
            expense_date: self.expense_date,
            vendor_id: self.vendor_id,
            sales_order_id: self.sales_order_id,
        }
    }
}
