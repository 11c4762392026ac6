//! Entity schema of the CRM: records, drafts, value objects and roles.

pub mod types;

pub mod client;
pub mod entity;
pub mod expense;
pub mod lead;
pub mod quote;
pub mod requirement;
pub mod role;
pub mod sales_order;
pub mod user;
pub mod vendor;
pub mod vendor_quote;
