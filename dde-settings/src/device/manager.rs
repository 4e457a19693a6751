//! The `com.deepin.daemon.ExtDevManager` root object.

use zbus::interface;

use crate::api::models::{DeviceId, ExtDeviceInfo};

/// Root object listing the published device entries.
#[derive(Debug, Clone, Default)]
pub struct ExtDevManager {
    dev_info_list: Vec<ExtDeviceInfo>,
}

impl ExtDevManager {
    pub fn new(devices: &[DeviceId]) -> Self {
        Self {
            dev_info_list: devices.iter().copied().map(ExtDeviceInfo::for_device).collect(),
        }
    }

    pub fn devices(&self) -> &[ExtDeviceInfo] {
        &self.dev_info_list
    }
}

#[interface(name = "com.deepin.daemon.ExtDevManager")]
impl ExtDevManager {
    /// `(object path, device type)` of every device entry, fixed at startup.
    #[zbus(property(emits_changed_signal = "const"), name = "DevInfoList")]
    fn dev_info_list(&self) -> Vec<(String, String)> {
        self.dev_info_list
            .iter()
            .map(|info| (info.device_path.clone(), info.device_type.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_entries_in_publication_order() {
        let manager = ExtDevManager::new(&DeviceId::ALL);
        assert_eq!(
            manager.dev_info_list(),
            vec![
                (
                    "/com/deepin/daemon/ExtDevManager/Keyboard".to_string(),
                    "Keyboard".to_string()
                ),
                (
                    "/com/deepin/daemon/ExtDevManager/Mouse".to_string(),
                    "Mouse".to_string()
                ),
                (
                    "/com/deepin/daemon/ExtDevManager/TouchPad".to_string(),
                    "TouchPad".to_string()
                ),
            ]
        );
    }

    #[test]
    fn empty_manager() {
        assert!(ExtDevManager::default().dev_info_list().is_empty());
    }
}
