//! D-Bus proxy interfaces for NetworkManager.

mod settings_connection;

pub(crate) use settings_connection::NMSettingsConnectionProxy;
