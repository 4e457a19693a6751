//! Settings plumbing for the Deepin desktop environment.
//!
//! This crate provides two independent pieces:
//!
//! - A typed, table-driven store for NetworkManager connection profiles
//!   ([`ConnectionData`]) with JSON accessors for every known key
//! - A bridge exposing keyboard, mouse and touchpad GSettings keys as D-Bus
//!   properties under `com.deepin.daemon.ExtDevManager` ([`ExtDevBridge`])
//!
//! # Connection data
//!
//! ```
//! use dde_settings::{ConnectionData, get_key_json, set_key_json};
//!
//! # fn example() -> dde_settings::Result<()> {
//! let mut data = ConnectionData::new();
//!
//! // Absent keys read as their schema default
//! assert_eq!(get_key_json(&data, "connection", "autoconnect"), "true");
//!
//! set_key_json(&mut data, "connection", "autoconnect", "false")?;
//! assert_eq!(get_key_json(&data, "connection", "autoconnect"), "false");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Device bridge
//!
//! ```no_run
//! use std::sync::Arc;
//! use dde_settings::ExtDevBridge;
//! use dde_settings::device::{ExtDevContext, GioSettingsBackend};
//!
//! # async fn example() -> dde_settings::Result<()> {
//! let backend = Arc::new(GioSettingsBackend::for_devices()?);
//! let ctx = ExtDevContext::session(backend).await?;
//! let bridge = ExtDevBridge::publish(ctx).await?;
//! # bridge.shutdown().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Property reads and writes go straight to GSettings. Changes made by
//! anyone else are announced with `PropertiesChanged` as long as a GLib main
//! loop is running on the default main context.
//!
//! # Error Handling
//!
//! Fallible operations return `Result<T, SettingsError>`. Unknown setting
//! names and keys are not errors: they are logged and read as empty values.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`. For example:
//!
//! ```no_run,ignore
//! env_logger::init();
//! // ...
//! ```

// Internal implementation modules
mod dbus;
mod types;

// Public API modules
pub mod api;
pub mod connection;
pub mod device;

// Re-exported public API
pub use api::bridge::ExtDevBridge;
pub use api::models::{DeviceId, ExtDeviceInfo, PropertyKind, PropertyValue, SettingsError};
pub use api::network_settings::NetworkSettings;
pub use connection::{
    ConnectionData, KeyKind, SettingValue, default_value_json, get_key, get_key_json, key_kind,
    remove_key, set_key, set_key_json,
};

/// A specialized `Result` type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
