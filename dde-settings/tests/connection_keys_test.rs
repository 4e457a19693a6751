//! Tests for the connection key tables and the name-based accessors.

use dde_settings::connection::{group, groups, setting_connection, setting_ipv4};
use dde_settings::{
    ConnectionData, KeyKind, SettingValue, SettingsError, default_value_json, get_key,
    get_key_json, key_kind, remove_key, set_key, set_key_json,
};

fn sample_json(kind: KeyKind) -> &'static str {
    match kind {
        KeyKind::String => r#""eth0""#,
        KeyKind::Boolean => "true",
        KeyKind::Uint64 => "1700000000",
        KeyKind::Int64 => "-42",
        KeyKind::Int32 => "7",
        KeyKind::Float64 => "1.5",
        KeyKind::ArrayOfString => r#"["a","b"]"#,
        KeyKind::Unknown => unreachable!("tables never hold Unknown keys"),
    }
}

#[test]
fn test_every_table_key_has_a_stable_kind() {
    for g in groups() {
        for descriptor in g.keys() {
            let first = key_kind(g.name(), descriptor.name);
            assert_ne!(first, KeyKind::Unknown, "{}.{}", g.name(), descriptor.name);
            assert_eq!(first, descriptor.kind);
            assert_eq!(first, key_kind(g.name(), descriptor.name));
        }
    }
}

#[test]
fn test_keys_outside_the_tables_are_unknown() {
    assert_eq!(key_kind("connection", "no-such-key"), KeyKind::Unknown);
    assert_eq!(key_kind("no-such-setting", "id"), KeyKind::Unknown);
    assert_eq!(default_value_json("connection", "no-such-key"), "");
    assert_eq!(default_value_json("no-such-setting", "id"), "");
}

#[test]
fn test_defaults_decode_as_their_kind() {
    for g in groups() {
        for descriptor in g.keys() {
            let json = default_value_json(g.name(), descriptor.name);
            assert_eq!(json, descriptor.default_json);

            let mut data = ConnectionData::new();
            set_key_json(&mut data, g.name(), descriptor.name, &json).unwrap_or_else(|e| {
                panic!("default of {}.{} does not decode: {e}", g.name(), descriptor.name)
            });
        }
    }
}

#[test]
fn test_json_round_trip_is_stable() {
    for g in groups() {
        for descriptor in g.keys() {
            let (setting, key) = (g.name(), descriptor.name);
            let mut data = ConnectionData::new();

            // Unset key: the default literal survives a round trip
            let before = get_key_json(&data, setting, key);
            set_key_json(&mut data, setting, key, &before).unwrap();
            assert_eq!(get_key_json(&data, setting, key), before, "{setting}.{key}");

            // Set key: so does an explicit value
            set_key_json(&mut data, setting, key, sample_json(descriptor.kind)).unwrap();
            let before = get_key_json(&data, setting, key);
            set_key_json(&mut data, setting, key, &before).unwrap();
            assert_eq!(get_key_json(&data, setting, key), before, "{setting}.{key}");
        }
    }
}

#[test]
fn test_remove_then_get_yields_zero_and_default() {
    for g in groups() {
        for descriptor in g.keys() {
            let (setting, key) = (g.name(), descriptor.name);
            let mut data = ConnectionData::new();
            set_key_json(&mut data, setting, key, sample_json(descriptor.kind)).unwrap();

            remove_key(&mut data, setting, key);

            assert_eq!(get_key(&data, setting, key), descriptor.kind.zero_value());
            assert_eq!(get_key_json(&data, setting, key), descriptor.default_json);
        }
    }
}

#[test]
fn test_set_autoconnect_false() {
    let mut data = ConnectionData::new();
    set_key_json(&mut data, "connection", "autoconnect", "false").unwrap();

    assert_eq!(
        get_key(&data, "connection", "autoconnect"),
        Some(SettingValue::Boolean(false))
    );
    assert!(!data.get(setting_connection::AUTOCONNECT));
}

#[test]
fn test_unset_secondaries_read_as_null() {
    let data = ConnectionData::new();
    assert_eq!(get_key_json(&data, "connection", "secondaries"), "null");
}

#[test]
fn test_malformed_json_leaves_data_untouched() {
    let mut data = ConnectionData::new();
    let result = set_key_json(&mut data, "connection", "timestamp", "not-a-number");

    assert!(matches!(
        result,
        Err(SettingsError::Json { kind: KeyKind::Uint64, .. })
    ));
    assert!(data.is_empty());
    assert_eq!(get_key_json(&data, "connection", "timestamp"), "0");
}

#[test]
fn test_wrong_json_type_is_a_decode_error() {
    let mut data = ConnectionData::new();
    set_key_json(&mut data, "connection", "id", "\"Office\"").unwrap();

    assert!(set_key_json(&mut data, "connection", "id", "42").is_err());
    assert!(set_key_json(&mut data, "connection", "secondaries", r#"[1, 2]"#).is_err());
    assert_eq!(get_key_json(&data, "connection", "id"), r#""Office""#);
}

#[test]
fn test_unknown_keys_are_logged_no_ops() {
    let mut data = ConnectionData::new();

    set_key_json(&mut data, "connection", "no-such-key", "true").unwrap();
    set_key(
        &mut data,
        "no-such-setting",
        "id",
        SettingValue::String("x".into()),
    )
    .unwrap();

    assert!(data.is_empty());
    assert_eq!(get_key(&data, "connection", "no-such-key"), None);
    assert_eq!(get_key_json(&data, "connection", "no-such-key"), "");
}

#[test]
fn test_set_key_rejects_other_kinds() {
    let mut data = ConnectionData::new();
    let result = set_key(&mut data, "ipv4", "route-metric", SettingValue::Int32(5));

    assert!(matches!(
        result,
        Err(SettingsError::KindMismatch {
            expected: KeyKind::Int64,
            found: KeyKind::Int32,
            ..
        })
    ));
    assert_eq!(data.get(setting_ipv4::ROUTE_METRIC), 0);
    assert_eq!(get_key_json(&data, "ipv4", "route-metric"), "-1");
}

#[test]
fn test_wrong_kind_in_store_reads_as_zero() {
    let mut data = ConnectionData::new();
    data.insert_value("connection", "autoconnect", SettingValue::String("yes".into()));

    assert_eq!(
        get_key(&data, "connection", "autoconnect"),
        Some(SettingValue::Boolean(false))
    );
    assert_eq!(get_key_json(&data, "connection", "autoconnect"), "false");
}

#[test]
fn test_new_profile_fills_identity() {
    let data = ConnectionData::new_profile("802-3-ethernet", "Wired 1");

    assert_eq!(get_key_json(&data, "connection", "type"), r#""802-3-ethernet""#);
    assert_eq!(data.get(setting_connection::ID), "Wired 1");
    assert!(!data.get(setting_connection::UUID).is_empty());
    assert!(group("802-3-ethernet").is_some());
}
