use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

use crate::connection::KeyKind;
use crate::types::constants::ext_dev;

/// Device categories published by the ExtDevManager bridge.
///
/// The variant name doubles as the DeviceID used in object paths and
/// interface names, e.g. `/com/deepin/daemon/ExtDevManager/Keyboard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceId {
    /// Keyboard repeat, cursor blink and layout settings.
    Keyboard,
    /// Mouse handedness, acceleration and click settings.
    Mouse,
    /// Touchpad handedness, acceleration, drag and click settings.
    TouchPad,
}

impl DeviceId {
    /// Every device category, in publication order.
    pub const ALL: [DeviceId; 3] = [DeviceId::Keyboard, DeviceId::Mouse, DeviceId::TouchPad];

    /// The DeviceID string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyboard => "Keyboard",
            Self::Mouse => "Mouse",
            Self::TouchPad => "TouchPad",
        }
    }

    /// Object path of this device's entry (`<base-path>/<DeviceID>`).
    pub fn object_path(&self) -> String {
        format!("{}/{}", ext_dev::PATH, self.as_str())
    }

    /// Interface name of this device's entry (`<base-interface>.<DeviceID>`).
    pub fn interface_name(&self) -> String {
        format!("{}.{}", ext_dev::INTERFACE, self.as_str())
    }
}

impl Display for DeviceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceId {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Keyboard" => Ok(Self::Keyboard),
            "Mouse" => Ok(Self::Mouse),
            "TouchPad" => Ok(Self::TouchPad),
            other => Err(SettingsError::UnknownDevice(other.to_string())),
        }
    }
}

/// A device record listed by the manager object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtDeviceInfo {
    /// Object path of the device entry.
    pub device_path: String,
    /// Device category (the DeviceID).
    pub device_type: String,
}

impl ExtDeviceInfo {
    /// The record for `id`'s entry at `<base-path>/<DeviceID>`.
    pub fn for_device(id: DeviceId) -> Self {
        Self {
            device_path: id.object_path(),
            device_type: id.as_str().to_string(),
        }
    }
}

/// GVariant type of a GSettings key bound to a device property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// `b`
    Bool,
    /// `u`
    U32,
    /// `i`
    I32,
    /// `d`
    F64,
    /// `s`
    String,
    /// `as`
    StringArray,
}

impl Display for PropertyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool => write!(f, "boolean"),
            Self::U32 => write!(f, "uint32"),
            Self::I32 => write!(f, "int32"),
            Self::F64 => write!(f, "double"),
            Self::String => write!(f, "string"),
            Self::StringArray => write!(f, "string array"),
        }
    }
}

/// A value read from or written to a GSettings key.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// A `b` key, e.g. `left-handed` in the mouse schema.
    Bool(bool),
    /// A `u` key, e.g. the keyboard repeat `delay`.
    U32(u32),
    /// An `i` key, e.g. `double-click`.
    I32(i32),
    /// A `d` key, e.g. `motion-acceleration`.
    F64(f64),
    /// An `s` key, e.g. the touchpad `left-handed` mode.
    String(String),
    /// An `as` key, e.g. the keyboard `layouts`.
    StringArray(Vec<String>),
}

impl PropertyValue {
    /// The GVariant type this value carries.
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Bool(_) => PropertyKind::Bool,
            Self::U32(_) => PropertyKind::U32,
            Self::I32(_) => PropertyKind::I32,
            Self::F64(_) => PropertyKind::F64,
            Self::String(_) => PropertyKind::String,
            Self::StringArray(_) => PropertyKind::StringArray,
        }
    }
}

/// Errors that can occur while mapping settings keys or publishing the
/// device bridge.
///
/// Classification misses (unknown keys) are not errors: they are logged and
/// degrade to empty results. Only malformed input, kind mismatches on
/// writes, and backend failures surface here.
///
/// # Examples
///
/// ```
/// use dde_settings::{ConnectionData, SettingsError, set_key_json};
///
/// let mut data = ConnectionData::new();
/// match set_key_json(&mut data, "connection", "timestamp", "not-a-number") {
///     Err(SettingsError::Json { key, .. }) => assert_eq!(key, "timestamp"),
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A D-Bus communication error occurred.
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    /// A D-Bus value could not be converted.
    #[error("D-Bus variant error: {0}")]
    Variant(#[from] zvariant::Error),

    /// JSON text did not decode into the key's kind.
    #[error("invalid JSON for {setting}.{key} (expected {kind}): {source}")]
    Json {
        setting: String,
        key: String,
        kind: KeyKind,
        #[source]
        source: serde_json::Error,
    },

    /// A raw value of the wrong kind was offered for a key.
    #[error("value for {setting}.{key} must be {expected}, got {found}")]
    KindMismatch {
        setting: String,
        key: String,
        expected: KeyKind,
        found: KeyKind,
    },

    /// The default GSettings schema source could not be loaded.
    #[error("GSettings schema source unavailable")]
    SchemaSourceUnavailable,

    /// A required GSettings schema is not installed.
    #[error("GSettings schema not installed: {0}")]
    SchemaNotFound(String),

    /// The schema has no such key.
    #[error("no key {key} in schema {schema}")]
    KeyNotFound { schema: String, key: String },

    /// The stored GSettings value is not of the bound type.
    #[error("key {key} in schema {schema} does not hold a {expected}")]
    PropertyKindMismatch {
        schema: String,
        key: String,
        expected: PropertyKind,
    },

    /// The settings backend refused a write.
    #[error("failed to write {key} in schema {schema}: {reason}")]
    WriteFailed {
        schema: String,
        key: String,
        reason: String,
    },

    /// A DeviceID outside the published set.
    #[error("unknown device: {0}")]
    UnknownDevice(String),
}

impl From<SettingsError> for zbus::fdo::Error {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::KindMismatch { .. } | SettingsError::PropertyKindMismatch { .. } => {
                zbus::fdo::Error::InvalidArgs(err.to_string())
            }
            SettingsError::KeyNotFound { .. } => zbus::fdo::Error::UnknownProperty(err.to_string()),
            other => zbus::fdo::Error::Failed(other.to_string()),
        }
    }
}
