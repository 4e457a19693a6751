//! Name-based accessors over [`ConnectionData`].
//!
//! These are the entry points used when a key arrives as a string, e.g.
//! from a D-Bus method call. Each one resolves the key's kind through the
//! setting group registry first. A key outside every table is a
//! classification miss: it is logged and the call degrades to an empty
//! result instead of failing.

use log::{error, warn};

use crate::api::models::SettingsError;
use crate::connection::data::ConnectionData;
use crate::connection::groups::group;
use crate::connection::value::{KeyKind, SettingValue};
use crate::Result;

/// Classifies `setting.key`. Unregistered settings and keys are `Unknown`.
pub fn key_kind(setting: &str, key: &str) -> KeyKind {
    group(setting)
        .map(|g| g.key_kind(key))
        .unwrap_or(KeyKind::Unknown)
}

/// JSON literal standing in for an unset key.
///
/// Returns an empty string, and logs an error, for keys outside the tables.
pub fn default_value_json(setting: &str, key: &str) -> String {
    match group(setting) {
        Some(g) => g.default_value_json(key).to_string(),
        None => {
            error!("invalid setting {setting} for key {key}");
            String::new()
        }
    }
}

/// Reads a key narrowed to its kind.
///
/// An absent key or a stored value of another kind reads as the kind's zero
/// value. Returns `None` only for keys outside the tables.
pub fn get_key(data: &ConnectionData, setting: &str, key: &str) -> Option<SettingValue> {
    let kind = key_kind(setting, key);
    let Some(zero) = kind.zero_value() else {
        error!("get_key: invalid key {setting}.{key}");
        return None;
    };

    Some(
        data.value(setting, key)
            .filter(|v| v.kind() == kind)
            .cloned()
            .unwrap_or(zero),
    )
}

/// Writes a key, creating the setting's map when absent.
///
/// # Errors
///
/// Returns `SettingsError::KindMismatch` if `value` is not of the key's
/// kind. Keys outside the tables are logged and left untouched.
pub fn set_key(
    data: &mut ConnectionData,
    setting: &str,
    key: &str,
    value: SettingValue,
) -> Result<()> {
    let kind = key_kind(setting, key);
    if kind == KeyKind::Unknown {
        error!("set_key: invalid key {setting}.{key}");
        return Ok(());
    }

    if value.kind() != kind {
        return Err(SettingsError::KindMismatch {
            setting: setting.to_string(),
            key: key.to_string(),
            expected: kind,
            found: value.kind(),
        });
    }

    data.insert_value(setting, key, value);
    Ok(())
}

/// Deletes a key. Absent keys are not an error.
pub fn remove_key(data: &mut ConnectionData, setting: &str, key: &str) {
    data.remove_value(setting, key);
}

/// Reads a key as standalone JSON text.
///
/// Unset keys yield the key's default literal; an empty string list is
/// `null`. Keys outside the tables are logged and yield an empty string.
pub fn get_key_json(data: &ConnectionData, setting: &str, key: &str) -> String {
    let kind = key_kind(setting, key);
    if kind == KeyKind::Unknown {
        error!("get_key_json: invalid key {setting}.{key}");
        return String::new();
    }

    match data.value(setting, key) {
        None => default_value_json(setting, key),
        Some(value) if value.kind() == kind => value.to_json(),
        Some(value) => {
            warn!(
                "{setting}.{key} holds a {} value, expected {kind}",
                value.kind()
            );
            kind.zero_value()
                .map(|zero| zero.to_json())
                .unwrap_or_default()
        }
    }
}

/// Decodes JSON text as the key's kind and stores it.
///
/// # Errors
///
/// Returns `SettingsError::Json` if the text is not valid JSON for the
/// key's kind; the data is left unmodified. Keys outside the tables are
/// logged and left untouched.
pub fn set_key_json(data: &mut ConnectionData, setting: &str, key: &str, json: &str) -> Result<()> {
    let kind = key_kind(setting, key);
    let decoded = kind
        .decode_json(json)
        .map_err(|source| SettingsError::Json {
            setting: setting.to_string(),
            key: key.to_string(),
            kind,
            source,
        })?;

    match decoded {
        Some(value) => {
            data.insert_value(setting, key, value);
        }
        None => error!("set_key_json: invalid key {setting}.{key}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autoconnect_from_json() {
        let mut data = ConnectionData::new();
        set_key_json(&mut data, "connection", "autoconnect", "false").unwrap();
        assert_eq!(
            get_key(&data, "connection", "autoconnect"),
            Some(SettingValue::Boolean(false))
        );
    }

    #[test]
    fn secondaries_on_empty_store_is_null() {
        let data = ConnectionData::new();
        assert_eq!(get_key_json(&data, "connection", "secondaries"), "null");
    }

    #[test]
    fn bad_timestamp_json_leaves_store_untouched() {
        let mut data = ConnectionData::new();
        set_key_json(&mut data, "connection", "timestamp", "42").unwrap();
        let before = data.clone();

        let err = set_key_json(&mut data, "connection", "timestamp", "not-a-number").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Json { ref key, kind: KeyKind::Uint64, .. } if key == "timestamp"
        ));
        assert_eq!(data, before);
    }

    #[test]
    fn unknown_keys_degrade() {
        let mut data = ConnectionData::new();
        assert_eq!(key_kind("connection", "bogus"), KeyKind::Unknown);
        assert_eq!(key_kind("bogus", "id"), KeyKind::Unknown);
        assert_eq!(default_value_json("connection", "bogus"), "");
        assert_eq!(default_value_json("bogus", "id"), "");
        assert_eq!(get_key(&data, "connection", "bogus"), None);
        assert_eq!(get_key_json(&data, "connection", "bogus"), "");

        set_key_json(&mut data, "connection", "bogus", "\"x\"").unwrap();
        set_key(&mut data, "connection", "bogus", SettingValue::from("x")).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn set_key_rejects_wrong_kind() {
        let mut data = ConnectionData::new();
        let err = set_key(&mut data, "connection", "timestamp", SettingValue::from("now"));
        assert!(matches!(
            err,
            Err(SettingsError::KindMismatch {
                expected: KeyKind::Uint64,
                found: KeyKind::String,
                ..
            })
        ));
        assert!(data.is_empty());
    }

    #[test]
    fn absent_key_json_is_default_not_zero() {
        let data = ConnectionData::new();
        assert_eq!(get_key_json(&data, "connection", "autoconnect"), "true");
        assert_eq!(
            get_key(&data, "connection", "autoconnect"),
            Some(SettingValue::Boolean(false))
        );
    }

    #[test]
    fn mismatched_stored_value_reads_as_zero() {
        let mut data = ConnectionData::new();
        data.insert_value("ipv4", "dns-priority", SettingValue::from("high"));
        assert_eq!(get_key(&data, "ipv4", "dns-priority"), Some(SettingValue::Int32(0)));
        assert_eq!(get_key_json(&data, "ipv4", "dns-priority"), "0");
    }

    #[test]
    fn remove_then_read() {
        let mut data = ConnectionData::new();
        set_key_json(&mut data, "connection", "permissions", r#"["user:bob:"]"#).unwrap();
        assert_eq!(
            get_key_json(&data, "connection", "permissions"),
            r#"["user:bob:"]"#
        );

        remove_key(&mut data, "connection", "permissions");
        remove_key(&mut data, "connection", "permissions");
        assert_eq!(
            get_key(&data, "connection", "permissions"),
            Some(SettingValue::ArrayOfString(vec![]))
        );
        assert_eq!(get_key_json(&data, "connection", "permissions"), "null");
    }
}
