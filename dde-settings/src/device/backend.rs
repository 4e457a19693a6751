//! Settings store abstraction behind the device properties.

use crate::api::models::{PropertyKind, PropertyValue};
use crate::Result;

/// Callback invoked whenever a watched key changes in the store.
pub type ChangeCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// A schema-scoped key/value store, GSettings in production.
///
/// Implementations are the source of truth: device properties hold no copy
/// of their values and every read or write is one round-trip here.
pub trait SettingsBackend: Send + Sync {
    /// Reads `schema`/`key`, which must hold a value of `kind`.
    fn read(&self, schema: &str, key: &str, kind: PropertyKind) -> Result<PropertyValue>;

    /// Writes `schema`/`key`. The store emits its own change notification.
    fn write(&self, schema: &str, key: &str, value: &PropertyValue) -> Result<()>;

    /// Registers `on_change` to run after every change of `schema`/`key`,
    /// whoever made it.
    fn watch(&self, schema: &str, key: &str, on_change: ChangeCallback) -> Result<()>;
}
