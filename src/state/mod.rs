//! In-memory UI state: dialog selection stores, the session holder and guards.

pub mod dialog;
pub mod guard;
pub mod session;
