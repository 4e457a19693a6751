//! GSettings key to D-Bus property bindings.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::api::models::{DeviceId, PropertyKind, PropertyValue, SettingsError};
use crate::device::backend::SettingsBackend;
use crate::types::constants::schema;
use crate::Result;

/// Static description of one bound property: the D-Bus property name and
/// the GSettings key behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub schema: &'static str,
    pub key: &'static str,
    pub kind: PropertyKind,
}

/// Keyboard properties.
pub mod keyboard {
    use super::*;

    pub const REPEAT_DELAY: PropertySpec = PropertySpec {
        name: "RepeatDelay",
        schema: schema::KEYBOARD_REPEAT,
        key: "delay",
        kind: PropertyKind::U32,
    };
    pub const REPEAT_SPEED: PropertySpec = PropertySpec {
        name: "RepeatSpeed",
        schema: schema::KEYBOARD_REPEAT,
        key: "repeat-interval",
        kind: PropertyKind::U32,
    };
    pub const CURSOR_BLINK: PropertySpec = PropertySpec {
        name: "CursorBlink",
        schema: schema::DESKTOP_INTERFACE,
        key: "cursor-blink-time",
        kind: PropertyKind::I32,
    };
    pub const DISABLE_TPAD: PropertySpec = PropertySpec {
        name: "DisableTPad",
        schema: schema::TOUCHPAD,
        key: "disable-while-typing",
        kind: PropertyKind::Bool,
    };
    pub const KEYBOARD_LAYOUT: PropertySpec = PropertySpec {
        name: "KeyboardLayout",
        schema: schema::KEYBOARD_LAYOUT,
        key: "layouts",
        kind: PropertyKind::StringArray,
    };

    pub const ALL: &[PropertySpec] = &[
        REPEAT_DELAY,
        REPEAT_SPEED,
        CURSOR_BLINK,
        DISABLE_TPAD,
        KEYBOARD_LAYOUT,
    ];
}

/// Mouse properties.
pub mod mouse {
    use super::*;

    pub const USE_HABIT: PropertySpec = PropertySpec {
        name: "UseHabit",
        schema: schema::MOUSE,
        key: "left-handed",
        kind: PropertyKind::Bool,
    };
    pub const MOVE_SPEED: PropertySpec = PropertySpec {
        name: "MoveSpeed",
        schema: schema::MOUSE,
        key: "motion-acceleration",
        kind: PropertyKind::F64,
    };
    pub const MOVE_ACCURACY: PropertySpec = PropertySpec {
        name: "MoveAccuracy",
        schema: schema::MOUSE,
        key: "motion-threshold",
        kind: PropertyKind::I32,
    };
    pub const CLICK_FREQUENCY: PropertySpec = PropertySpec {
        name: "ClickFrequency",
        schema: schema::MOUSE,
        key: "double-click",
        kind: PropertyKind::I32,
    };

    pub const ALL: &[PropertySpec] = &[USE_HABIT, MOVE_SPEED, MOVE_ACCURACY, CLICK_FREQUENCY];
}

/// Touchpad properties.
///
/// Drag and double-click timing are shared with the mouse schema.
pub mod touchpad {
    use super::*;

    /// `"mouse"`, `"left"` or `"right"`.
    pub const USE_HABIT: PropertySpec = PropertySpec {
        name: "UseHabit",
        schema: schema::TOUCHPAD,
        key: "left-handed",
        kind: PropertyKind::String,
    };
    pub const MOVE_SPEED: PropertySpec = PropertySpec {
        name: "MoveSpeed",
        schema: schema::TOUCHPAD,
        key: "motion-acceleration",
        kind: PropertyKind::F64,
    };
    pub const MOVE_ACCURACY: PropertySpec = PropertySpec {
        name: "MoveAccuracy",
        schema: schema::TOUCHPAD,
        key: "motion-threshold",
        kind: PropertyKind::I32,
    };
    pub const DRAG_DELAY: PropertySpec = PropertySpec {
        name: "DragDelay",
        schema: schema::MOUSE,
        key: "drag-threshold",
        kind: PropertyKind::I32,
    };
    pub const CLICK_FREQUENCY: PropertySpec = PropertySpec {
        name: "ClickFrequency",
        schema: schema::MOUSE,
        key: "double-click",
        kind: PropertyKind::I32,
    };

    pub const ALL: &[PropertySpec] = &[
        USE_HABIT,
        MOVE_SPEED,
        MOVE_ACCURACY,
        DRAG_DELAY,
        CLICK_FREQUENCY,
    ];
}

/// The bound properties of a device category.
pub fn properties(device: DeviceId) -> &'static [PropertySpec] {
    match device {
        DeviceId::Keyboard => keyboard::ALL,
        DeviceId::Mouse => mouse::ALL,
        DeviceId::TouchPad => touchpad::ALL,
    }
}

/// Rust types a bound property can be read or written as.
pub trait PropertyType: Sized {
    const KIND: PropertyKind;

    fn from_property(value: PropertyValue) -> Option<Self>;

    fn into_property(self) -> PropertyValue;
}

macro_rules! impl_property_type {
    ($ty:ty, $variant:ident) => {
        impl PropertyType for $ty {
            const KIND: PropertyKind = PropertyKind::$variant;

            fn from_property(value: PropertyValue) -> Option<Self> {
                match value {
                    PropertyValue::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn into_property(self) -> PropertyValue {
                PropertyValue::$variant(self)
            }
        }
    };
}

impl_property_type!(bool, Bool);
impl_property_type!(u32, U32);
impl_property_type!(i32, I32);
impl_property_type!(f64, F64);
impl_property_type!(String, String);
impl_property_type!(Vec<String>, StringArray);

/// A live binding between one GSettings key and one D-Bus property.
///
/// Reads and writes go straight to the backend; nothing is cached.
#[derive(Clone)]
pub struct GSettingsProperty {
    spec: PropertySpec,
    backend: Arc<dyn SettingsBackend>,
}

impl GSettingsProperty {
    pub fn bind(backend: Arc<dyn SettingsBackend>, spec: PropertySpec) -> Self {
        Self { spec, backend }
    }

    pub fn spec(&self) -> &PropertySpec {
        &self.spec
    }

    pub fn get(&self) -> Result<PropertyValue> {
        self.backend
            .read(self.spec.schema, self.spec.key, self.spec.kind)
    }

    /// Writes the key.
    ///
    /// # Errors
    ///
    /// Returns `PropertyKindMismatch` if `value` is not of the bound kind,
    /// or the backend's error if the write fails.
    pub fn set(&self, value: PropertyValue) -> Result<()> {
        if value.kind() != self.spec.kind {
            return Err(self.kind_mismatch());
        }
        self.backend.write(self.spec.schema, self.spec.key, &value)
    }

    pub fn get_typed<T: PropertyType>(&self) -> Result<T> {
        T::from_property(self.get()?).ok_or_else(|| self.kind_mismatch())
    }

    pub fn set_typed<T: PropertyType>(&self, value: T) -> Result<()> {
        self.set(value.into_property())
    }

    fn kind_mismatch(&self) -> SettingsError {
        SettingsError::PropertyKindMismatch {
            schema: self.spec.schema.to_string(),
            key: self.spec.key.to_string(),
            expected: self.spec.kind,
        }
    }
}

impl Debug for GSettingsProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GSettingsProperty")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}
