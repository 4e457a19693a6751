//! Device settings bridge: GSettings keys exposed as D-Bus properties.

pub(crate) mod backend;
pub(crate) mod context;
pub(crate) mod entries;
pub(crate) mod gio_backend;
pub(crate) mod manager;
pub(crate) mod memory;
pub(crate) mod property;

pub use backend::{ChangeCallback, SettingsBackend};
pub use context::ExtDevContext;
pub use entries::{DeviceEntry, KeyboardEntry, MouseEntry, TouchPadEntry};
pub use gio_backend::GioSettingsBackend;
pub use manager::ExtDevManager;
pub use memory::MemorySettings;
pub use property::{
    GSettingsProperty, PropertySpec, PropertyType, keyboard, mouse, properties, touchpad,
};
