//! Typed key mapping for NetworkManager connection settings.
//!
//! A NetworkManager profile is a two-level dictionary: setting name ->
//! key name -> value. This module gives every mapped key a static kind, a
//! default JSON literal, and an accessor family:
//!
//! - [`key_kind`] / [`default_value_json`]: classification and defaults
//! - [`get_key`] / [`set_key`] / [`remove_key`]: raw access
//! - [`get_key_json`] / [`set_key_json`]: JSON access for wire transport
//!
//! Typed handles such as [`setting_connection::AUTOCONNECT`] give the same
//! access with compile-time types through [`ConnectionData::get`] and
//! [`ConnectionData::set`].
//!
//! # Example
//!
//! ```rust
//! use dde_settings::connection::{ConnectionData, get_key_json, set_key_json};
//!
//! # fn example() -> dde_settings::Result<()> {
//! let mut data = ConnectionData::new();
//! assert_eq!(get_key_json(&data, "connection", "autoconnect"), "true");
//!
//! set_key_json(&mut data, "connection", "autoconnect", "false")?;
//! assert_eq!(get_key_json(&data, "connection", "autoconnect"), "false");
//! # Ok(())
//! # }
//! ```

mod accessor;
mod data;
mod group;
mod groups;
mod value;

pub use accessor::{
    default_value_json, get_key, get_key_json, key_kind, remove_key, set_key, set_key_json,
};
pub use data::ConnectionData;
pub(crate) use data::setting_value_from_variant;
pub use group::{Key, KeyDescriptor, SettingGroup};
pub use groups::{
    group, groups, setting_connection, setting_ipv4, setting_ipv6, setting_wired, setting_wireless,
};
pub use value::{KeyKind, SettingType, SettingValue};
