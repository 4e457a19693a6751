//! In-memory NetworkManager connection payload.
//!
//! [`ConnectionData`] mirrors the `a{sa{sv}}` dictionary NetworkManager
//! uses for a connection profile: setting name -> key name -> value. Values
//! are stored as [`SettingValue`]s, so reads can narrow them to a key's
//! static kind without runtime type assertions.

use log::{debug, warn};
use std::collections::HashMap;
use uuid::Uuid;
use zvariant::{OwnedValue, Value};

use crate::connection::group::Key;
use crate::connection::groups::{group, setting_connection};
use crate::connection::value::{KeyKind, SettingType, SettingValue};

/// One connection profile's raw settings, keyed by setting and key name.
///
/// A `ConnectionData` has a single owner for the duration of an operation;
/// it performs no locking of its own.
///
/// # Example
///
/// ```rust
/// use dde_settings::ConnectionData;
/// use dde_settings::connection::setting_connection;
///
/// let mut data = ConnectionData::new_profile("802-3-ethernet", "Wired 1");
/// assert_eq!(data.get(setting_connection::ID), "Wired 1");
///
/// data.set(setting_connection::AUTOCONNECT, false);
/// assert!(!data.get(setting_connection::AUTOCONNECT));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionData {
    settings: HashMap<String, HashMap<String, SettingValue>>,
}

impl ConnectionData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a profile skeleton with `type`, `id` and a random `uuid` in
    /// the `connection` setting.
    pub fn new_profile(connection_type: &str, id: impl Into<String>) -> Self {
        let mut data = Self::new();
        data.set(setting_connection::TYPE, connection_type.to_string());
        data.set(setting_connection::ID, id.into());
        data.set(setting_connection::UUID, Uuid::new_v4().to_string());
        data
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Names of the settings present in this profile.
    pub fn setting_names(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(String::as_str)
    }

    /// All keys stored for one setting.
    pub fn setting(&self, setting: &str) -> Option<&HashMap<String, SettingValue>> {
        self.settings.get(setting)
    }

    /// The stored value of a key, without any kind narrowing.
    pub fn value(&self, setting: &str, key: &str) -> Option<&SettingValue> {
        self.settings.get(setting)?.get(key)
    }

    /// Stores a value, creating the setting's map when absent. The previous
    /// value, if any, is returned.
    pub fn insert_value(
        &mut self,
        setting: &str,
        key: &str,
        value: SettingValue,
    ) -> Option<SettingValue> {
        self.settings
            .entry(setting.to_string())
            .or_default()
            .insert(key.to_string(), value)
    }

    /// Deletes a key. Absent keys are not an error.
    pub fn remove_value(&mut self, setting: &str, key: &str) -> Option<SettingValue> {
        self.settings.get_mut(setting)?.remove(key)
    }

    /// Reads a typed key. Absent keys and values of another kind read as
    /// the type's zero value.
    pub fn get<T: SettingType>(&self, key: Key<T>) -> T {
        self.value(key.setting(), key.name())
            .and_then(T::from_value)
            .unwrap_or_default()
    }

    /// Writes a typed key, overwriting any previous value.
    pub fn set<T: SettingType>(&mut self, key: Key<T>, value: T) {
        self.insert_value(key.setting(), key.name(), value.into_value());
    }

    pub fn remove<T>(&mut self, key: Key<T>) {
        self.remove_value(key.setting(), key.name());
    }

    pub fn contains<T>(&self, key: Key<T>) -> bool {
        self.value(key.setting(), key.name()).is_some()
    }

    /// Builds connection data from a NetworkManager settings dictionary, as
    /// returned by `GetSettings`.
    ///
    /// Only keys declared in a registered setting group are imported, and
    /// only when the D-Bus value matches the key's kind. Everything else is
    /// skipped.
    pub fn from_nm_settings(settings: &HashMap<String, HashMap<String, OwnedValue>>) -> Self {
        let mut data = Self::new();

        for (setting, keys) in settings {
            let Some(table) = group(setting) else {
                debug!("Skipping unmapped setting: {setting}");
                continue;
            };

            for (key, value) in keys {
                let kind = table.key_kind(key);
                if kind == KeyKind::Unknown {
                    debug!("Skipping unmapped key: {setting}.{key}");
                    continue;
                }

                match setting_value_from_variant(kind, value) {
                    Some(v) => {
                        data.insert_value(setting, key, v);
                    }
                    None => warn!("Value of {setting}.{key} is not a {kind}, skipping"),
                }
            }
        }

        data
    }

    /// Converts the payload to NetworkManager's `a{sa{sv}}` form.
    pub fn to_nm_settings(&self) -> HashMap<String, HashMap<String, Value<'static>>> {
        self.settings
            .iter()
            .map(|(setting, keys)| {
                let section = keys
                    .iter()
                    .map(|(key, value)| (key.clone(), setting_value_to_variant(value)))
                    .collect();
                (setting.clone(), section)
            })
            .collect()
    }
}

/// Converts a D-Bus value to the setting value of `kind`, `None` when the
/// D-Bus type doesn't fit.
pub(crate) fn setting_value_from_variant(kind: KeyKind, value: &Value<'_>) -> Option<SettingValue> {
    match (kind, value) {
        (_, Value::Value(inner)) => setting_value_from_variant(kind, inner),
        (KeyKind::String, Value::Str(s)) => Some(SettingValue::String(s.as_str().to_string())),
        (KeyKind::Boolean, Value::Bool(b)) => Some(SettingValue::Boolean(*b)),
        (KeyKind::Uint64, Value::U64(n)) => Some(SettingValue::Uint64(*n)),
        (KeyKind::Int64, Value::I64(n)) => Some(SettingValue::Int64(*n)),
        (KeyKind::Int32, Value::I32(n)) => Some(SettingValue::Int32(*n)),
        (KeyKind::Float64, Value::F64(n)) => Some(SettingValue::Float64(*n)),
        (KeyKind::ArrayOfString, Value::Array(arr)) => arr
            .iter()
            .map(|item| match item {
                Value::Str(s) => Some(s.as_str().to_string()),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(SettingValue::ArrayOfString),
        _ => None,
    }
}

pub(crate) fn setting_value_to_variant(value: &SettingValue) -> Value<'static> {
    match value {
        SettingValue::String(s) => Value::from(s.clone()),
        SettingValue::Boolean(b) => Value::from(*b),
        SettingValue::Uint64(n) => Value::from(*n),
        SettingValue::Int64(n) => Value::from(*n),
        SettingValue::Int32(n) => Value::from(*n),
        SettingValue::Float64(n) => Value::from(*n),
        SettingValue::ArrayOfString(items) => Value::from(items.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::groups::{setting_ipv4, setting_wireless};

    fn owned(value: Value<'_>) -> OwnedValue {
        OwnedValue::try_from(value).expect("plain values convert to OwnedValue")
    }

    #[test]
    fn new_profile_fills_connection_metadata() {
        let data = ConnectionData::new_profile("802-11-wireless", "HomeNetwork");
        assert_eq!(data.get(setting_connection::TYPE), "802-11-wireless");
        assert_eq!(data.get(setting_connection::ID), "HomeNetwork");
        let uuid = data.get(setting_connection::UUID);
        assert!(Uuid::parse_str(&uuid).is_ok(), "bad uuid {uuid}");
    }

    #[test]
    fn set_creates_setting_map() {
        let mut data = ConnectionData::new();
        assert!(data.setting("ipv4").is_none());

        data.set(setting_ipv4::METHOD, "manual".to_string());
        assert_eq!(data.setting("ipv4").map(|s| s.len()), Some(1));
        assert_eq!(data.get(setting_ipv4::METHOD), "manual");
    }

    #[test]
    fn last_write_wins() {
        let mut data = ConnectionData::new();
        data.set(setting_connection::ZONE, "home".to_string());
        data.set(setting_connection::ZONE, "work".to_string());
        assert_eq!(data.get(setting_connection::ZONE), "work");
    }

    #[test]
    fn mismatched_value_reads_as_zero() {
        let mut data = ConnectionData::new();
        data.insert_value("connection", "timestamp", SettingValue::from("yesterday"));
        assert_eq!(data.get(setting_connection::TIMESTAMP), 0);

        data.insert_value("connection", "autoconnect", SettingValue::Int32(1));
        assert!(!data.get(setting_connection::AUTOCONNECT));
    }

    #[test]
    fn remove_absent_key_is_noop() {
        let mut data = ConnectionData::new();
        data.remove(setting_connection::MASTER);
        assert!(data.is_empty());

        data.set(setting_connection::MASTER, "bond0".to_string());
        data.remove(setting_connection::MASTER);
        assert!(!data.contains(setting_connection::MASTER));
        assert_eq!(data.get(setting_connection::MASTER), "");
    }

    #[test]
    fn imports_mapped_keys_from_nm() {
        let mut connection = HashMap::new();
        connection.insert("id".to_string(), owned(Value::from("Office")));
        connection.insert("autoconnect".to_string(), owned(Value::from(false)));
        connection.insert("timestamp".to_string(), owned(Value::from(1_700_000_000u64)));
        connection.insert(
            "permissions".to_string(),
            owned(Value::from(vec!["user:alice:".to_string()])),
        );
        // Not in the table
        connection.insert("autoconnect-priority".to_string(), owned(Value::from(5i32)));
        // Wrong D-Bus type for a string key
        connection.insert("zone".to_string(), owned(Value::from(7u32)));

        let mut wireless = HashMap::new();
        wireless.insert("ssid".to_string(), owned(Value::from(b"Office".to_vec())));
        wireless.insert("hidden".to_string(), owned(Value::from(true)));

        let mut settings = HashMap::new();
        settings.insert("connection".to_string(), connection);
        settings.insert("802-11-wireless".to_string(), wireless);
        settings.insert("proxy".to_string(), HashMap::new());

        let data = ConnectionData::from_nm_settings(&settings);

        assert_eq!(data.get(setting_connection::ID), "Office");
        assert!(!data.get(setting_connection::AUTOCONNECT));
        assert_eq!(data.get(setting_connection::TIMESTAMP), 1_700_000_000);
        assert_eq!(
            data.get(setting_connection::PERMISSIONS),
            vec!["user:alice:".to_string()]
        );
        assert!(data.value("connection", "autoconnect-priority").is_none());
        assert!(!data.contains(setting_connection::ZONE));
        assert!(data.get(setting_wireless::HIDDEN));
        assert!(data.value("802-11-wireless", "ssid").is_none());
        assert!(data.setting("proxy").is_none());
    }

    #[test]
    fn exports_to_nm_dictionary() {
        let mut data = ConnectionData::new();
        data.set(setting_connection::ID, "eth0".to_string());
        data.set(setting_ipv4::ROUTE_METRIC, 100);
        data.set(setting_ipv4::DNS_SEARCH, vec!["example.com".to_string()]);

        let settings = data.to_nm_settings();
        let connection = settings.get("connection").unwrap();
        assert_eq!(connection.get("id"), Some(&Value::from("eth0")));

        let ipv4 = settings.get("ipv4").unwrap();
        assert_eq!(ipv4.get("route-metric"), Some(&Value::from(100i64)));
        assert_eq!(
            ipv4.get("dns-search"),
            Some(&Value::from(vec!["example.com".to_string()]))
        );
    }

    #[test]
    fn variant_wrapped_values_are_unwrapped() {
        let wrapped = Value::Value(Box::new(Value::from(true)));
        assert_eq!(
            setting_value_from_variant(KeyKind::Boolean, &wrapped),
            Some(SettingValue::Boolean(true))
        );
        assert_eq!(setting_value_from_variant(KeyKind::Unknown, &wrapped), None);
    }
}
