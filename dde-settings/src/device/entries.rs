//! Per-device D-Bus entries.
//!
//! Each entry is published at `/com/deepin/daemon/ExtDevManager/<DeviceID>`
//! with interface `com.deepin.daemon.ExtDevManager.<DeviceID>`. Every
//! property other than `DeviceID` reads and writes one GSettings key.

use async_trait::async_trait;
use log::warn;
use std::sync::Arc;
use zbus::fdo;
use zbus::interface;
use zbus::object_server::{Interface, SignalEmitter};

use crate::api::models::DeviceId;
use crate::device::backend::SettingsBackend;
use crate::device::property::{GSettingsProperty, keyboard, mouse, touchpad};

/// Common surface of the device entries used by the bridge.
#[async_trait]
pub trait DeviceEntry: Interface {
    const DEVICE: DeviceId;

    /// The GSettings bindings behind this entry's properties.
    fn bindings(&self) -> Vec<&GSettingsProperty>;

    /// Emits `PropertiesChanged` for the named property.
    async fn emit_property_changed(
        &self,
        property: &str,
        emitter: &SignalEmitter<'_>,
    ) -> zbus::Result<()>;
}

/// Keyboard entry (`DeviceID` = "Keyboard").
#[derive(Debug)]
pub struct KeyboardEntry {
    repeat_delay: GSettingsProperty,
    repeat_speed: GSettingsProperty,
    cursor_blink: GSettingsProperty,
    disable_tpad: GSettingsProperty,
    keyboard_layout: GSettingsProperty,
}

impl KeyboardEntry {
    pub fn new(backend: &Arc<dyn SettingsBackend>) -> Self {
        let bind = |spec| GSettingsProperty::bind(Arc::clone(backend), spec);
        Self {
            repeat_delay: bind(keyboard::REPEAT_DELAY),
            repeat_speed: bind(keyboard::REPEAT_SPEED),
            cursor_blink: bind(keyboard::CURSOR_BLINK),
            disable_tpad: bind(keyboard::DISABLE_TPAD),
            keyboard_layout: bind(keyboard::KEYBOARD_LAYOUT),
        }
    }
}

#[interface(name = "com.deepin.daemon.ExtDevManager.Keyboard")]
impl KeyboardEntry {
    #[zbus(property(emits_changed_signal = "const"), name = "DeviceID")]
    fn device_id(&self) -> String {
        DeviceId::Keyboard.to_string()
    }

    /// Delay before key repeat starts, in milliseconds.
    #[zbus(property, name = "RepeatDelay")]
    fn repeat_delay(&self) -> fdo::Result<u32> {
        Ok(self.repeat_delay.get_typed()?)
    }

    #[zbus(property, name = "RepeatDelay")]
    fn set_repeat_delay(&self, value: u32) -> fdo::Result<()> {
        Ok(self.repeat_delay.set_typed(value)?)
    }

    /// Interval between repeated keys, in milliseconds.
    #[zbus(property, name = "RepeatSpeed")]
    fn repeat_speed(&self) -> fdo::Result<u32> {
        Ok(self.repeat_speed.get_typed()?)
    }

    #[zbus(property, name = "RepeatSpeed")]
    fn set_repeat_speed(&self, value: u32) -> fdo::Result<()> {
        Ok(self.repeat_speed.set_typed(value)?)
    }

    /// Cursor blink cycle, in milliseconds.
    #[zbus(property, name = "CursorBlink")]
    fn cursor_blink(&self) -> fdo::Result<i32> {
        Ok(self.cursor_blink.get_typed()?)
    }

    #[zbus(property, name = "CursorBlink")]
    fn set_cursor_blink(&self, value: i32) -> fdo::Result<()> {
        Ok(self.cursor_blink.set_typed(value)?)
    }

    /// Whether the touchpad is disabled while typing.
    #[zbus(property, name = "DisableTPad")]
    fn disable_tpad(&self) -> fdo::Result<bool> {
        Ok(self.disable_tpad.get_typed()?)
    }

    #[zbus(property, name = "DisableTPad")]
    fn set_disable_tpad(&self, value: bool) -> fdo::Result<()> {
        Ok(self.disable_tpad.set_typed(value)?)
    }

    #[zbus(property, name = "KeyboardLayout")]
    fn keyboard_layout(&self) -> fdo::Result<Vec<String>> {
        Ok(self.keyboard_layout.get_typed()?)
    }

    #[zbus(property, name = "KeyboardLayout")]
    fn set_keyboard_layout(&self, value: Vec<String>) -> fdo::Result<()> {
        Ok(self.keyboard_layout.set_typed(value)?)
    }
}

#[async_trait]
impl DeviceEntry for KeyboardEntry {
    const DEVICE: DeviceId = DeviceId::Keyboard;

    fn bindings(&self) -> Vec<&GSettingsProperty> {
        vec![
            &self.repeat_delay,
            &self.repeat_speed,
            &self.cursor_blink,
            &self.disable_tpad,
            &self.keyboard_layout,
        ]
    }

    async fn emit_property_changed(
        &self,
        property: &str,
        emitter: &SignalEmitter<'_>,
    ) -> zbus::Result<()> {
        match property {
            "RepeatDelay" => self.repeat_delay_changed(emitter).await,
            "RepeatSpeed" => self.repeat_speed_changed(emitter).await,
            "CursorBlink" => self.cursor_blink_changed(emitter).await,
            "DisableTPad" => self.disable_t_pad_changed(emitter).await,
            "KeyboardLayout" => self.keyboard_layout_changed(emitter).await,
            other => {
                warn!("Keyboard has no property {other}");
                Ok(())
            }
        }
    }
}

/// Mouse entry (`DeviceID` = "Mouse").
#[derive(Debug)]
pub struct MouseEntry {
    use_habit: GSettingsProperty,
    move_speed: GSettingsProperty,
    move_accuracy: GSettingsProperty,
    click_frequency: GSettingsProperty,
}

impl MouseEntry {
    pub fn new(backend: &Arc<dyn SettingsBackend>) -> Self {
        let bind = |spec| GSettingsProperty::bind(Arc::clone(backend), spec);
        Self {
            use_habit: bind(mouse::USE_HABIT),
            move_speed: bind(mouse::MOVE_SPEED),
            move_accuracy: bind(mouse::MOVE_ACCURACY),
            click_frequency: bind(mouse::CLICK_FREQUENCY),
        }
    }
}

#[interface(name = "com.deepin.daemon.ExtDevManager.Mouse")]
impl MouseEntry {
    #[zbus(property(emits_changed_signal = "const"), name = "DeviceID")]
    fn device_id(&self) -> String {
        DeviceId::Mouse.to_string()
    }

    /// True for left-handed button mapping.
    #[zbus(property, name = "UseHabit")]
    fn use_habit(&self) -> fdo::Result<bool> {
        Ok(self.use_habit.get_typed()?)
    }

    #[zbus(property, name = "UseHabit")]
    fn set_use_habit(&self, value: bool) -> fdo::Result<()> {
        Ok(self.use_habit.set_typed(value)?)
    }

    #[zbus(property, name = "MoveSpeed")]
    fn move_speed(&self) -> fdo::Result<f64> {
        Ok(self.move_speed.get_typed()?)
    }

    #[zbus(property, name = "MoveSpeed")]
    fn set_move_speed(&self, value: f64) -> fdo::Result<()> {
        Ok(self.move_speed.set_typed(value)?)
    }

    #[zbus(property, name = "MoveAccuracy")]
    fn move_accuracy(&self) -> fdo::Result<i32> {
        Ok(self.move_accuracy.get_typed()?)
    }

    #[zbus(property, name = "MoveAccuracy")]
    fn set_move_accuracy(&self, value: i32) -> fdo::Result<()> {
        Ok(self.move_accuracy.set_typed(value)?)
    }

    /// Double-click interval, in milliseconds.
    #[zbus(property, name = "ClickFrequency")]
    fn click_frequency(&self) -> fdo::Result<i32> {
        Ok(self.click_frequency.get_typed()?)
    }

    #[zbus(property, name = "ClickFrequency")]
    fn set_click_frequency(&self, value: i32) -> fdo::Result<()> {
        Ok(self.click_frequency.set_typed(value)?)
    }
}

#[async_trait]
impl DeviceEntry for MouseEntry {
    const DEVICE: DeviceId = DeviceId::Mouse;

    fn bindings(&self) -> Vec<&GSettingsProperty> {
        vec![
            &self.use_habit,
            &self.move_speed,
            &self.move_accuracy,
            &self.click_frequency,
        ]
    }

    async fn emit_property_changed(
        &self,
        property: &str,
        emitter: &SignalEmitter<'_>,
    ) -> zbus::Result<()> {
        match property {
            "UseHabit" => self.use_habit_changed(emitter).await,
            "MoveSpeed" => self.move_speed_changed(emitter).await,
            "MoveAccuracy" => self.move_accuracy_changed(emitter).await,
            "ClickFrequency" => self.click_frequency_changed(emitter).await,
            other => {
                warn!("Mouse has no property {other}");
                Ok(())
            }
        }
    }
}

/// Touchpad entry (`DeviceID` = "TouchPad").
#[derive(Debug)]
pub struct TouchPadEntry {
    use_habit: GSettingsProperty,
    move_speed: GSettingsProperty,
    move_accuracy: GSettingsProperty,
    drag_delay: GSettingsProperty,
    click_frequency: GSettingsProperty,
}

impl TouchPadEntry {
    pub fn new(backend: &Arc<dyn SettingsBackend>) -> Self {
        let bind = |spec| GSettingsProperty::bind(Arc::clone(backend), spec);
        Self {
            use_habit: bind(touchpad::USE_HABIT),
            move_speed: bind(touchpad::MOVE_SPEED),
            move_accuracy: bind(touchpad::MOVE_ACCURACY),
            drag_delay: bind(touchpad::DRAG_DELAY),
            click_frequency: bind(touchpad::CLICK_FREQUENCY),
        }
    }
}

#[interface(name = "com.deepin.daemon.ExtDevManager.TouchPad")]
impl TouchPadEntry {
    #[zbus(property(emits_changed_signal = "const"), name = "DeviceID")]
    fn device_id(&self) -> String {
        DeviceId::TouchPad.to_string()
    }

    /// Handedness: "mouse" follows the mouse setting, "left" or "right".
    #[zbus(property, name = "UseHabit")]
    fn use_habit(&self) -> fdo::Result<String> {
        Ok(self.use_habit.get_typed()?)
    }

    #[zbus(property, name = "UseHabit")]
    fn set_use_habit(&self, value: String) -> fdo::Result<()> {
        Ok(self.use_habit.set_typed(value)?)
    }

    #[zbus(property, name = "MoveSpeed")]
    fn move_speed(&self) -> fdo::Result<f64> {
        Ok(self.move_speed.get_typed()?)
    }

    #[zbus(property, name = "MoveSpeed")]
    fn set_move_speed(&self, value: f64) -> fdo::Result<()> {
        Ok(self.move_speed.set_typed(value)?)
    }

    #[zbus(property, name = "MoveAccuracy")]
    fn move_accuracy(&self) -> fdo::Result<i32> {
        Ok(self.move_accuracy.get_typed()?)
    }

    #[zbus(property, name = "MoveAccuracy")]
    fn set_move_accuracy(&self, value: i32) -> fdo::Result<()> {
        Ok(self.move_accuracy.set_typed(value)?)
    }

    /// Pointer travel, in pixels, before a drag starts.
    #[zbus(property, name = "DragDelay")]
    fn drag_delay(&self) -> fdo::Result<i32> {
        Ok(self.drag_delay.get_typed()?)
    }

    #[zbus(property, name = "DragDelay")]
    fn set_drag_delay(&self, value: i32) -> fdo::Result<()> {
        Ok(self.drag_delay.set_typed(value)?)
    }

    #[zbus(property, name = "ClickFrequency")]
    fn click_frequency(&self) -> fdo::Result<i32> {
        Ok(self.click_frequency.get_typed()?)
    }

    #[zbus(property, name = "ClickFrequency")]
    fn set_click_frequency(&self, value: i32) -> fdo::Result<()> {
        Ok(self.click_frequency.set_typed(value)?)
    }
}

#[async_trait]
impl DeviceEntry for TouchPadEntry {
    const DEVICE: DeviceId = DeviceId::TouchPad;

    fn bindings(&self) -> Vec<&GSettingsProperty> {
        vec![
            &self.use_habit,
            &self.move_speed,
            &self.move_accuracy,
            &self.drag_delay,
            &self.click_frequency,
        ]
    }

    async fn emit_property_changed(
        &self,
        property: &str,
        emitter: &SignalEmitter<'_>,
    ) -> zbus::Result<()> {
        match property {
            "UseHabit" => self.use_habit_changed(emitter).await,
            "MoveSpeed" => self.move_speed_changed(emitter).await,
            "MoveAccuracy" => self.move_accuracy_changed(emitter).await,
            "DragDelay" => self.drag_delay_changed(emitter).await,
            "ClickFrequency" => self.click_frequency_changed(emitter).await,
            other => {
                warn!("TouchPad has no property {other}");
                Ok(())
            }
        }
    }
}
