//! Public API module.
//!
//! This module contains the high-level user-facing API for the `dde-settings` crate.

pub mod bridge;
pub mod models;
pub mod network_settings;
