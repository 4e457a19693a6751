//! NetworkManager Settings.Connection proxy.

use std::collections::HashMap;
use zbus::{Result, proxy};
use zvariant::{OwnedValue, Value};

/// Proxy for a saved connection profile.
///
/// Settings are exchanged as `a{sa{sv}}`: setting name to key to value.
/// Secrets are never included in `GetSettings` replies.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Settings.Connection",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMSettingsConnection {
    /// Returns the profile's settings, without secrets.
    fn get_settings(&self) -> Result<HashMap<String, HashMap<String, OwnedValue>>>;

    /// Replaces the profile's settings and persists them to disk.
    fn update(&self, properties: HashMap<String, HashMap<String, Value<'_>>>) -> Result<()>;

    /// True if the profile has changes not yet written to disk.
    #[zbus(property)]
    fn unsaved(&self) -> Result<bool>;

    /// Path of the backing keyfile, if any.
    #[zbus(property)]
    fn filename(&self) -> Result<String>;
}
