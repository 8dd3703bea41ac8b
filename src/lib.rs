//! triage - Terminal dashboard for triaging issues across GitHub repositories
//!
//! This library crate exposes internal modules for integration testing.

pub mod commands;
pub mod config;
pub mod data;
pub mod integrations;
pub mod tui;
pub mod util;
