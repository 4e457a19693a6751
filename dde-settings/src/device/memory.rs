//! In-process settings store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::api::models::{PropertyKind, PropertyValue, SettingsError};
use crate::device::backend::{ChangeCallback, SettingsBackend};
use crate::types::constants::schema;
use crate::Result;

type SchemaKey = (String, String);

/// [`SettingsBackend`] keeping values in memory.
///
/// Keys must be defined with [`MemorySettings::insert`] before they can be
/// read, written or watched, and a key keeps the type of its first value,
/// like a GSettings schema key. Watch callbacks run synchronously on the
/// writing thread.
///
/// # Example
///
/// ```rust
/// use dde_settings::device::{MemorySettings, SettingsBackend};
/// use dde_settings::{PropertyKind, PropertyValue};
///
/// # fn example() -> dde_settings::Result<()> {
/// let store = MemorySettings::with_device_defaults();
/// let delay = store.read(
///     "org.gnome.settings-daemon.peripherals.keyboard",
///     "delay",
///     PropertyKind::U32,
/// )?;
/// assert_eq!(delay, PropertyValue::U32(500));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<SchemaKey, PropertyValue>>,
    watchers: Mutex<HashMap<SchemaKey, Vec<Arc<dyn Fn() + Send + Sync>>>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the upstream GNOME defaults of every key the device
    /// bridge binds.
    pub fn with_device_defaults() -> Self {
        let store = Self::new();

        store.insert(schema::KEYBOARD_REPEAT, "delay", PropertyValue::U32(500));
        store.insert(schema::KEYBOARD_REPEAT, "repeat-interval", PropertyValue::U32(30));
        store.insert(schema::DESKTOP_INTERFACE, "cursor-blink-time", PropertyValue::I32(1200));
        store.insert(schema::KEYBOARD_LAYOUT, "layouts", PropertyValue::StringArray(Vec::new()));

        store.insert(schema::MOUSE, "left-handed", PropertyValue::Bool(false));
        store.insert(schema::MOUSE, "motion-acceleration", PropertyValue::F64(-1.0));
        store.insert(schema::MOUSE, "motion-threshold", PropertyValue::I32(-1));
        store.insert(schema::MOUSE, "double-click", PropertyValue::I32(400));
        store.insert(schema::MOUSE, "drag-threshold", PropertyValue::I32(8));

        store.insert(schema::TOUCHPAD, "disable-while-typing", PropertyValue::Bool(true));
        store.insert(schema::TOUCHPAD, "left-handed", PropertyValue::String("mouse".into()));
        store.insert(schema::TOUCHPAD, "motion-acceleration", PropertyValue::F64(-1.0));
        store.insert(schema::TOUCHPAD, "motion-threshold", PropertyValue::I32(-1));

        store
    }

    /// Defines or replaces a key without notifying watchers.
    pub fn insert(&self, schema: &str, key: &str, value: PropertyValue) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((schema.to_string(), key.to_string()), value);
    }

    /// The current value of a key, if defined.
    pub fn value(&self, schema: &str, key: &str) -> Option<PropertyValue> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(schema.to_string(), key.to_string()))
            .cloned()
    }

    fn key_not_found(schema: &str, key: &str) -> SettingsError {
        SettingsError::KeyNotFound {
            schema: schema.to_string(),
            key: key.to_string(),
        }
    }
}

impl SettingsBackend for MemorySettings {
    fn read(&self, schema: &str, key: &str, kind: PropertyKind) -> Result<PropertyValue> {
        let value = self
            .value(schema, key)
            .ok_or_else(|| Self::key_not_found(schema, key))?;

        if value.kind() != kind {
            return Err(SettingsError::PropertyKindMismatch {
                schema: schema.to_string(),
                key: key.to_string(),
                expected: kind,
            });
        }
        Ok(value)
    }

    fn write(&self, schema: &str, key: &str, value: &PropertyValue) -> Result<()> {
        let id = (schema.to_string(), key.to_string());
        {
            let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
            let slot = values
                .get_mut(&id)
                .ok_or_else(|| Self::key_not_found(schema, key))?;

            if slot.kind() != value.kind() {
                return Err(SettingsError::PropertyKindMismatch {
                    schema: schema.to_string(),
                    key: key.to_string(),
                    expected: slot.kind(),
                });
            }
            *slot = value.clone();
        }

        let callbacks = self
            .watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .unwrap_or_default();
        for callback in callbacks {
            callback();
        }
        Ok(())
    }

    fn watch(&self, schema: &str, key: &str, on_change: ChangeCallback) -> Result<()> {
        if self.value(schema, key).is_none() {
            return Err(Self::key_not_found(schema, key));
        }

        self.watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((schema.to_string(), key.to_string()))
            .or_default()
            .push(Arc::from(on_change));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn read_checks_kind() {
        let store = MemorySettings::with_device_defaults();
        assert_eq!(
            store.read(schema::MOUSE, "left-handed", PropertyKind::Bool).unwrap(),
            PropertyValue::Bool(false)
        );
        assert!(matches!(
            store.read(schema::MOUSE, "left-handed", PropertyKind::String),
            Err(SettingsError::PropertyKindMismatch { .. })
        ));
    }

    #[test]
    fn undefined_keys_are_errors() {
        let store = MemorySettings::new();
        assert!(matches!(
            store.read(schema::MOUSE, "left-handed", PropertyKind::Bool),
            Err(SettingsError::KeyNotFound { .. })
        ));
        assert!(store
            .write(schema::MOUSE, "left-handed", &PropertyValue::Bool(true))
            .is_err());
        assert!(store.watch(schema::MOUSE, "left-handed", Box::new(|| {})).is_err());
    }

    #[test]
    fn write_keeps_key_type() {
        let store = MemorySettings::with_device_defaults();
        let err = store
            .write(schema::KEYBOARD_REPEAT, "delay", &PropertyValue::I32(250))
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::PropertyKindMismatch { expected: PropertyKind::U32, .. }
        ));
        assert_eq!(
            store.value(schema::KEYBOARD_REPEAT, "delay"),
            Some(PropertyValue::U32(500))
        );
    }

    #[test]
    fn watchers_fire_on_write_only_for_their_key() {
        let store = MemorySettings::with_device_defaults();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        store
            .watch(
                schema::MOUSE,
                "double-click",
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        store
            .write(schema::MOUSE, "double-click", &PropertyValue::I32(300))
            .unwrap();
        store
            .write(schema::MOUSE, "drag-threshold", &PropertyValue::I32(4))
            .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(
            store.value(schema::MOUSE, "double-click"),
            Some(PropertyValue::I32(300))
        );
    }
}
