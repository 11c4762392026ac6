//! Shared description of the CRM entity kinds.
//!
//! Every entity exposes the same static schema: which backend table stores it,
//! which columns the list table shows, which inputs its Add/Edit dialogs
//! render and which columns free-text search covers. Pages, dialogs and the
//! backend client are written once against [`Entity`].

use std::fmt::{Debug, Display, Formatter};

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use crate::domain::role::Capability;

/// The entity kinds managed by the CRM.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Client,
    Lead,
    Quote,
    Vendor,
    SalesOrder,
    Requirement,
    VendorQuote,
    Expense,
    User,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Client,
        EntityKind::Lead,
        EntityKind::Quote,
        EntityKind::Vendor,
        EntityKind::SalesOrder,
        EntityKind::Requirement,
        EntityKind::VendorQuote,
        EntityKind::Expense,
        EntityKind::User,
    ];

    /// Singular name used in dialog identifiers such as `EditClient`.
    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::Client => "Client",
            EntityKind::Lead => "Lead",
            EntityKind::Quote => "Quote",
            EntityKind::Vendor => "Vendor",
            EntityKind::SalesOrder => "SalesOrder",
            EntityKind::Requirement => "Requirement",
            EntityKind::VendorQuote => "VendorQuote",
            EntityKind::Expense => "Expense",
            EntityKind::User => "User",
        }
    }

    /// Plural heading for list pages and navigation.
    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Client => "Clients",
            EntityKind::Lead => "Leads",
            EntityKind::Quote => "Quotes",
            EntityKind::Vendor => "Vendors",
            EntityKind::SalesOrder => "Sales orders",
            EntityKind::Requirement => "Requirements",
            EntityKind::VendorQuote => "Vendor quotes",
            EntityKind::Expense => "Expenses",
            EntityKind::User => "Users",
        }
    }

    /// URL segment of the entity's pages.
    pub const fn slug(self) -> &'static str {
        match self {
            EntityKind::Client => "clients",
            EntityKind::Lead => "leads",
            EntityKind::Quote => "quotes",
            EntityKind::Vendor => "vendors",
            EntityKind::SalesOrder => "sales-orders",
            EntityKind::Requirement => "requirements",
            EntityKind::VendorQuote => "vendor-quotes",
            EntityKind::Expense => "expenses",
            EntityKind::User => "users",
        }
    }

    /// Backend table holding the entity's rows.
    pub const fn table(self) -> &'static str {
        match self {
            EntityKind::Client => "clients",
            EntityKind::Lead => "leads",
            EntityKind::Quote => "quotes",
            EntityKind::Vendor => "vendors",
            EntityKind::SalesOrder => "sales_orders",
            EntityKind::Requirement => "requirements",
            EntityKind::VendorQuote => "vendor_quotes",
            EntityKind::Expense => "expenses",
            EntityKind::User => "profiles",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A column of an entity list table.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct Column {
    /// JSON key of the value in the serialized record.
    pub key: &'static str,
    pub label: &'static str,
}

/// Input widget used for a dialog field.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Email,
    Tel,
    Number,
    Date,
    TextArea,
    /// Identifier of a related record.
    Reference(EntityKind),
    Select(&'static [&'static str]),
}

/// A field of an Add/Edit dialog.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct FormField {
    /// JSON/form key of the value in the draft.
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    pub required: bool,
}

impl Column {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

impl FormField {
    pub const fn required(name: &'static str, label: &'static str, input: InputKind) -> Self {
        Self {
            name,
            label,
            input,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, input: InputKind) -> Self {
        Self {
            name,
            label,
            input,
            required: false,
        }
    }
}

/// Client-authored fields staged by an Add or Edit dialog.
pub trait EntityDraft:
    Serialize + DeserializeOwned + Validate + Clone + Debug + Send + Sync + 'static
{
    /// Trims text, drops blank optionals and canonicalizes codes.
    fn normalized(self) -> Self;
}

/// A record type persisted by the backend.
pub trait Entity:
    Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static
{
    type Id: Copy + Display + Debug + PartialEq + From<Uuid> + Into<Uuid> + Send + Sync + 'static;
    type Draft: EntityDraft;

    const KIND: EntityKind;
    const COLUMNS: &'static [Column];
    const FORM_FIELDS: &'static [FormField];
    const SEARCH_COLUMNS: &'static [&'static str];
    /// Whether rows can be created from the application.
    const CAN_ADD: bool = true;
    /// Capability required on top of area access to mutate rows.
    const WRITE_CAPABILITY: Option<Capability> = None;

    fn id(&self) -> Self::Id;

    /// Staging copy used to prefill the Edit dialog.
    fn to_draft(&self) -> Self::Draft;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_and_tables_are_unique() {
        let mut slugs: Vec<_> = EntityKind::ALL.iter().map(|k| k.slug()).collect();
        let mut tables: Vec<_> = EntityKind::ALL.iter().map(|k| k.table()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        tables.sort_unstable();
        tables.dedup();
        assert_eq!(slugs.len(), EntityKind::ALL.len());
        assert_eq!(tables.len(), EntityKind::ALL.len());
    }

    #[test]
    fn input_kind_serializes_for_templates() {
        let value = serde_json::to_value(InputKind::Select(&["a", "b"])).unwrap();
        assert_eq!(value["type"], "select");
        assert_eq!(value["options"], serde_json::json!(["a", "b"]));
        let value = serde_json::to_value(InputKind::Reference(EntityKind::SalesOrder)).unwrap();
        assert_eq!(value["options"], "sales_order");
        let value = serde_json::to_value(InputKind::Text).unwrap();
        assert_eq!(value["type"], "text");
    }
}
