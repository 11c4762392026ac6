//! Process-level models loaded at startup.

pub mod config;
