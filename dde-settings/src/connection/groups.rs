//! Setting group declarations and the name registry.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::connection::group::{SettingGroup, setting_group};

setting_group! {
    /// General profile metadata (`connection` setting).
    pub mod setting_connection = "connection" {
        ID = "id": String => r#""""#;
        UUID = "uuid": String => r#""""#;
        TYPE = "type": String => r#""""#;
        PERMISSIONS = "permissions": Vec<String> => "null";
        AUTOCONNECT = "autoconnect": bool => "true";
        /// Seconds since the epoch of the last successful activation.
        TIMESTAMP = "timestamp": u64 => "0";
        READ_ONLY = "read-only": bool => "false";
        ZONE = "zone": String => r#""""#;
        MASTER = "master": String => r#""""#;
        SLAVE_TYPE = "slave-type": String => r#""""#;
        SECONDARIES = "secondaries": Vec<String> => "null";
    }
}

setting_group! {
    /// Wired link settings (`802-3-ethernet` setting).
    pub mod setting_wired = "802-3-ethernet" {
        PORT = "port": String => r#""""#;
        DUPLEX = "duplex": String => r#""""#;
        AUTO_NEGOTIATE = "auto-negotiate": bool => "false";
        ASSIGNED_MAC_ADDRESS = "assigned-mac-address": String => r#""""#;
        MAC_ADDRESS_BLACKLIST = "mac-address-blacklist": Vec<String> => "null";
    }
}

setting_group! {
    /// Wireless link settings (`802-11-wireless` setting).
    pub mod setting_wireless = "802-11-wireless" {
        MODE = "mode": String => r#""""#;
        BAND = "band": String => r#""""#;
        HIDDEN = "hidden": bool => "false";
        ASSIGNED_MAC_ADDRESS = "assigned-mac-address": String => r#""""#;
        MAC_ADDRESS_BLACKLIST = "mac-address-blacklist": Vec<String> => "null";
        SEEN_BSSIDS = "seen-bssids": Vec<String> => "null";
    }
}

setting_group! {
    /// IPv4 configuration (`ipv4` setting).
    pub mod setting_ipv4 = "ipv4" {
        METHOD = "method": String => r#""""#;
        DNS_SEARCH = "dns-search": Vec<String> => "null";
        DNS_PRIORITY = "dns-priority": i32 => "0";
        ROUTE_METRIC = "route-metric": i64 => "-1";
        IGNORE_AUTO_ROUTES = "ignore-auto-routes": bool => "false";
        IGNORE_AUTO_DNS = "ignore-auto-dns": bool => "false";
        DHCP_CLIENT_ID = "dhcp-client-id": String => r#""""#;
        DHCP_HOSTNAME = "dhcp-hostname": String => r#""""#;
        DHCP_SEND_HOSTNAME = "dhcp-send-hostname": bool => "true";
        DHCP_TIMEOUT = "dhcp-timeout": i32 => "0";
        NEVER_DEFAULT = "never-default": bool => "false";
        MAY_FAIL = "may-fail": bool => "true";
    }
}

setting_group! {
    /// IPv6 configuration (`ipv6` setting).
    pub mod setting_ipv6 = "ipv6" {
        METHOD = "method": String => r#""""#;
        DNS_SEARCH = "dns-search": Vec<String> => "null";
        DNS_PRIORITY = "dns-priority": i32 => "0";
        ROUTE_METRIC = "route-metric": i64 => "-1";
        IGNORE_AUTO_ROUTES = "ignore-auto-routes": bool => "false";
        IGNORE_AUTO_DNS = "ignore-auto-dns": bool => "false";
        DHCP_HOSTNAME = "dhcp-hostname": String => r#""""#;
        DHCP_SEND_HOSTNAME = "dhcp-send-hostname": bool => "true";
        NEVER_DEFAULT = "never-default": bool => "false";
        MAY_FAIL = "may-fail": bool => "true";
        /// -1 unknown, 0 disabled, 1 prefer public address, 2 prefer temporary.
        IP6_PRIVACY = "ip6-privacy": i32 => "-1";
    }
}

fn registry() -> &'static HashMap<&'static str, &'static SettingGroup> {
    static REGISTRY: OnceLock<HashMap<&'static str, &'static SettingGroup>> = OnceLock::new();

    REGISTRY.get_or_init(|| {
        let all: [&'static SettingGroup; 5] = [
            &setting_connection::GROUP,
            &setting_wired::GROUP,
            &setting_wireless::GROUP,
            &setting_ipv4::GROUP,
            &setting_ipv6::GROUP,
        ];
        all.into_iter().map(|g| (g.name(), g)).collect()
    })
}

/// Looks up the key table of a setting group by setting name.
pub fn group(setting: &str) -> Option<&'static SettingGroup> {
    registry().get(setting).copied()
}

/// All registered setting groups.
pub fn groups() -> impl Iterator<Item = &'static SettingGroup> {
    registry().values().copied()
}
