//! Setting group tables and typed key handles.
//!
//! Each NetworkManager setting group ("connection", "ipv4", ...) is declared
//! once with [`setting_group!`]. The declaration yields both the descriptor
//! table consulted by the name-based accessors and one typed [`Key`] handle
//! per entry, so the raw and JSON paths for a key can never disagree on its
//! kind.

use log::error;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

use crate::connection::value::{KeyKind, SettingType};

/// Name, kind and JSON default of one key in a setting group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDescriptor {
    pub name: &'static str,
    pub kind: KeyKind,
    pub default_json: &'static str,
}

/// The closed key table of one setting group.
#[derive(Debug)]
pub struct SettingGroup {
    name: &'static str,
    keys: &'static [KeyDescriptor],
}

impl SettingGroup {
    pub const fn new(name: &'static str, keys: &'static [KeyDescriptor]) -> Self {
        Self { name, keys }
    }

    /// The setting name, e.g. `"connection"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All key descriptors, in declaration order.
    pub fn keys(&self) -> &'static [KeyDescriptor] {
        self.keys
    }

    pub fn descriptor(&self, key: &str) -> Option<&'static KeyDescriptor> {
        self.keys.iter().find(|d| d.name == key)
    }

    /// Classifies a key. Keys outside the table are `KeyKind::Unknown`.
    pub fn key_kind(&self, key: &str) -> KeyKind {
        self.descriptor(key)
            .map(|d| d.kind)
            .unwrap_or(KeyKind::Unknown)
    }

    /// JSON literal used when the key is unset.
    ///
    /// Keys outside the table are reported through the log and yield an
    /// empty string.
    pub fn default_value_json(&self, key: &str) -> &'static str {
        match self.descriptor(key) {
            Some(d) => d.default_json,
            None => {
                error!("invalid key {key} for setting {}", self.name);
                ""
            }
        }
    }
}

/// Compile-time handle to one typed key of a setting group.
pub struct Key<T> {
    setting: &'static str,
    name: &'static str,
    _type: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    pub const fn new(setting: &'static str, name: &'static str) -> Self {
        Self {
            setting,
            name,
            _type: PhantomData,
        }
    }

    pub fn setting(&self) -> &'static str {
        self.setting
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: SettingType> Key<T> {
    pub fn kind(&self) -> KeyKind {
        T::KIND
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> Debug for Key<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Key({}.{})", self.setting, self.name)
    }
}

/// Declares a setting group module.
///
/// ```ignore
/// setting_group! {
///     pub mod setting_connection = "connection" {
///         AUTOCONNECT = "autoconnect": bool => "true";
///     }
/// }
/// ```
///
/// expands to a module holding `SETTING_NAME`, a `Key<bool>` constant named
/// `AUTOCONNECT` and a `GROUP` table with one descriptor per entry.
macro_rules! setting_group {
    (
        $(#[$meta:meta])*
        $vis:vis mod $module:ident = $setting:literal {
            $(
                $(#[$key_meta:meta])*
                $konst:ident = $key:literal: $ty:ty => $default:literal;
            )*
        }
    ) => {
        $(#[$meta])*
        $vis mod $module {
            use $crate::connection::group::{Key, KeyDescriptor, SettingGroup};
            use $crate::connection::value::SettingType;

            /// Setting name of this group.
            pub const SETTING_NAME: &str = $setting;

            $(
                $(#[$key_meta])*
                pub const $konst: Key<$ty> = Key::new($setting, $key);
            )*

            /// Key table of this group.
            pub static GROUP: SettingGroup = SettingGroup::new(
                $setting,
                &[$(
                    KeyDescriptor {
                        name: $key,
                        kind: <$ty as SettingType>::KIND,
                        default_json: $default,
                    },
                )*],
            );
        }
    };
}

pub(crate) use setting_group;

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_KEYS: [KeyDescriptor; 2] = [
        KeyDescriptor {
            name: "method",
            kind: KeyKind::String,
            default_json: r#""""#,
        },
        KeyDescriptor {
            name: "may-fail",
            kind: KeyKind::Boolean,
            default_json: "true",
        },
    ];

    static TEST_GROUP: SettingGroup = SettingGroup::new("test", &TEST_KEYS);

    #[test]
    fn classifies_known_keys() {
        assert_eq!(TEST_GROUP.key_kind("method"), KeyKind::String);
        assert_eq!(TEST_GROUP.key_kind("may-fail"), KeyKind::Boolean);
    }

    #[test]
    fn unknown_key_is_unknown_kind() {
        assert_eq!(TEST_GROUP.key_kind("does-not-exist"), KeyKind::Unknown);
        assert_eq!(TEST_GROUP.key_kind(""), KeyKind::Unknown);
        assert_eq!(TEST_GROUP.default_value_json("does-not-exist"), "");
    }

    #[test]
    fn default_json_lookup() {
        assert_eq!(TEST_GROUP.default_value_json("method"), r#""""#);
        assert_eq!(TEST_GROUP.default_value_json("may-fail"), "true");
    }

    #[test]
    fn typed_key_reports_kind() {
        let key: Key<Vec<String>> = Key::new("test", "dns-search");
        assert_eq!(key.kind(), KeyKind::ArrayOfString);
        assert_eq!(format!("{key:?}"), "Key(test.dns-search)");
    }
}
