//! Loading and saving NetworkManager connection profiles.

use log::debug;
use std::collections::HashMap;
use zbus::Connection;
use zvariant::{OwnedValue, Value};

use crate::connection::{ConnectionData, group, setting_value_from_variant};
use crate::dbus::NMSettingsConnectionProxy;
use crate::Result;

/// Client for NetworkManager's saved connection profiles.
///
/// Profiles are addressed by their D-Bus object path, e.g.
/// `/org/freedesktop/NetworkManager/Settings/3`.
///
/// ```no_run
/// use dde_settings::NetworkSettings;
/// use dde_settings::connection::setting_connection;
///
/// # async fn example() -> dde_settings::Result<()> {
/// let nm = NetworkSettings::new().await?;
/// let path = "/org/freedesktop/NetworkManager/Settings/3";
///
/// let mut data = nm.load(path).await?;
/// data.set(setting_connection::AUTOCONNECT, false);
/// nm.save(path, &data).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NetworkSettings {
    conn: Connection,
}

impl NetworkSettings {
    /// Connects to the system bus.
    pub async fn new() -> Result<Self> {
        let conn = Connection::system().await?;
        Ok(Self { conn })
    }

    pub fn with_connection(conn: Connection) -> Self {
        Self { conn }
    }

    async fn proxy(&self, path: &str) -> Result<NMSettingsConnectionProxy<'static>> {
        Ok(NMSettingsConnectionProxy::builder(&self.conn)
            .path(path.to_string())?
            .build()
            .await?)
    }

    /// Reads a profile. Only keys of the known setting groups are kept.
    pub async fn load(&self, path: &str) -> Result<ConnectionData> {
        let settings = self.proxy(path).await?.get_settings().await?;
        let data = ConnectionData::from_nm_settings(&settings);
        debug!(
            "Loaded {path} with {} setting groups",
            data.setting_names().count()
        );
        Ok(data)
    }

    /// Writes `data` back to a profile.
    ///
    /// Keys [`load`](Self::load) would not have imported are preserved from
    /// the stored profile, including modeled keys stored with a D-Bus type
    /// other than their kind. Imported keys absent from `data` are removed.
    pub async fn save(&self, path: &str, data: &ConnectionData) -> Result<()> {
        let proxy = self.proxy(path).await?;
        let current = proxy.get_settings().await?;
        proxy.update(merge_settings(current, data)).await?;
        debug!("Updated {path}");
        Ok(())
    }
}

/// Whether `ConnectionData::from_nm_settings` keeps this stored value.
fn is_imported(setting: &str, key: &str, value: &OwnedValue) -> bool {
    group(setting).is_some_and(|g| setting_value_from_variant(g.key_kind(key), value).is_some())
}

pub(crate) fn merge_settings(
    current: HashMap<String, HashMap<String, OwnedValue>>,
    data: &ConnectionData,
) -> HashMap<String, HashMap<String, Value<'static>>> {
    let mut merged: HashMap<String, HashMap<String, Value<'static>>> = HashMap::new();

    for (setting, keys) in current {
        let section: HashMap<String, Value<'static>> = keys
            .into_iter()
            .filter(|(key, value)| !is_imported(&setting, key, value))
            .map(|(key, value)| (key, Value::from(value)))
            .collect();
        if !section.is_empty() {
            merged.insert(setting, section);
        }
    }

    for (setting, keys) in data.to_nm_settings() {
        merged.entry(setting).or_default().extend(keys);
    }

    merged
}
