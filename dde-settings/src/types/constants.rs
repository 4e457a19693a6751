//! Constants for the ExtDevManager D-Bus surface and the GSettings schemas
//! backing it.

/// D-Bus names of the ExtDevManager service.
pub mod ext_dev {
    /// Well-known bus name requested on the session bus.
    pub const SERVICE: &str = "com.deepin.daemon.ExtDevManager";
    /// Object path of the manager object.
    pub const PATH: &str = "/com/deepin/daemon/ExtDevManager";
    /// Interface of the manager object.
    pub const INTERFACE: &str = "com.deepin.daemon.ExtDevManager";
}

/// GSettings schema identifiers.
pub mod schema {
    pub const KEYBOARD_REPEAT: &str = "org.gnome.settings-daemon.peripherals.keyboard";
    pub const KEYBOARD_LAYOUT: &str = "org.gnome.libgnomekbd.keyboard";
    pub const DESKTOP_INTERFACE: &str = "org.gnome.desktop.interface";
    pub const MOUSE: &str = "org.gnome.settings-daemon.peripherals.mouse";
    pub const TOUCHPAD: &str = "org.gnome.settings-daemon.peripherals.touchpad";

    /// Every schema the device bridge reads from.
    pub const ALL: &[&str] = &[
        KEYBOARD_REPEAT,
        KEYBOARD_LAYOUT,
        DESKTOP_INTERFACE,
        MOUSE,
        TOUCHPAD,
    ];
}
