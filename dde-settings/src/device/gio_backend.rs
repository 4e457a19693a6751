//! GSettings-backed settings store.

use gio::prelude::*;
use glib::prelude::*;
use log::debug;
use std::cell::RefCell;

use crate::api::models::{PropertyKind, PropertyValue, SettingsError};
use crate::device::backend::{ChangeCallback, SettingsBackend};
use crate::types::constants::schema;
use crate::Result;

thread_local! {
    // Watched settings objects, owned by the thread running the default
    // main context so their `changed` handlers stay connected.
    static WATCHED: RefCell<Vec<gio::Settings>> = const { RefCell::new(Vec::new()) };
}

/// [`SettingsBackend`] over `gio::Settings`.
///
/// `gio::Settings` objects are not shared across threads: reads and writes
/// open a short-lived handle on the calling thread, watches are installed on
/// the default GLib main context. A main loop must be running on that
/// context for [`SettingsBackend::watch`] callbacks to fire.
#[derive(Debug)]
pub struct GioSettingsBackend {
    schemas: Vec<String>,
}

impl GioSettingsBackend {
    /// Opens every schema in `schema_ids`.
    ///
    /// # Errors
    ///
    /// Fails with `SchemaNotFound` if a schema is not installed, instead of
    /// letting GIO abort the process.
    pub fn new(schema_ids: &[&str]) -> Result<Self> {
        let source =
            gio::SettingsSchemaSource::default().ok_or(SettingsError::SchemaSourceUnavailable)?;

        let mut schemas = Vec::with_capacity(schema_ids.len());
        for id in schema_ids {
            if source.lookup(id, true).is_none() {
                return Err(SettingsError::SchemaNotFound(id.to_string()));
            }
            debug!("Found GSettings schema {id}");
            schemas.push(id.to_string());
        }

        Ok(Self { schemas })
    }

    /// Opens the schemas read by the device bridge.
    pub fn for_devices() -> Result<Self> {
        Self::new(schema::ALL)
    }

    fn settings_for(&self, schema: &str, key: &str) -> Result<gio::Settings> {
        if !self.schemas.iter().any(|s| s == schema) {
            return Err(SettingsError::SchemaNotFound(schema.to_string()));
        }

        let settings = gio::Settings::new(schema);
        let has_key = settings
            .settings_schema()
            .is_some_and(|s| s.has_key(key));
        if !has_key {
            return Err(SettingsError::KeyNotFound {
                schema: schema.to_string(),
                key: key.to_string(),
            });
        }

        Ok(settings)
    }
}

impl SettingsBackend for GioSettingsBackend {
    fn read(&self, schema: &str, key: &str, kind: PropertyKind) -> Result<PropertyValue> {
        let variant = self.settings_for(schema, key)?.value(key);

        let value = match kind {
            PropertyKind::Bool => variant.get::<bool>().map(PropertyValue::Bool),
            PropertyKind::U32 => variant.get::<u32>().map(PropertyValue::U32),
            PropertyKind::I32 => variant.get::<i32>().map(PropertyValue::I32),
            PropertyKind::F64 => variant.get::<f64>().map(PropertyValue::F64),
            PropertyKind::String => variant.get::<String>().map(PropertyValue::String),
            PropertyKind::StringArray => {
                variant.get::<Vec<String>>().map(PropertyValue::StringArray)
            }
        };

        value.ok_or_else(|| SettingsError::PropertyKindMismatch {
            schema: schema.to_string(),
            key: key.to_string(),
            expected: kind,
        })
    }

    fn write(&self, schema: &str, key: &str, value: &PropertyValue) -> Result<()> {
        let settings = self.settings_for(schema, key)?;

        let variant = match value {
            PropertyValue::Bool(b) => b.to_variant(),
            PropertyValue::U32(n) => n.to_variant(),
            PropertyValue::I32(n) => n.to_variant(),
            PropertyValue::F64(n) => n.to_variant(),
            PropertyValue::String(s) => s.to_variant(),
            PropertyValue::StringArray(items) => items.to_variant(),
        };

        let current = settings.value(key);
        if current.type_() != variant.type_() {
            return Err(SettingsError::PropertyKindMismatch {
                schema: schema.to_string(),
                key: key.to_string(),
                expected: value.kind(),
            });
        }

        settings
            .set_value(key, &variant)
            .map_err(|e| SettingsError::WriteFailed {
                schema: schema.to_string(),
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        gio::Settings::sync();

        debug!("Wrote {schema} {key} = {variant}");
        Ok(())
    }

    fn watch(&self, schema: &str, key: &str, on_change: ChangeCallback) -> Result<()> {
        // Validate on the caller's thread so errors reach the caller.
        self.settings_for(schema, key)?;

        let schema = schema.to_string();
        let key = key.to_string();
        glib::MainContext::default().invoke(move || {
            let settings = gio::Settings::new(&schema);
            settings.connect_changed(Some(&key), move |_, _| on_change());
            WATCHED.with(|watched| watched.borrow_mut().push(settings));
            debug!("Watching {schema} {key}");
        });
        Ok(())
    }
}
