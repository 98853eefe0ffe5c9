//! HCI layer configuration.
//!
//! Ceilings, handle ranges and enabled traffic classes.  Values can be
//! provisioned as JSON or persisted in compact postcard form.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Core HCI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HciConfig {
    // --- Command flow control ---
    /// Number of commands the Host may have outstanding.
    pub nb_cmd_pkts: u8,

    // --- Advertising report flow control ---
    /// Maximum advertising-report fragments queued for transmission.
    pub adv_rep_frag_max: u8,
    /// Maximum connectionless IQ reports queued for transmission.
    pub iq_rep_max: u8,
    /// Number of periodic-sync activities tracked for report chaining.
    pub max_activities: u8,

    // --- BLE links ---
    /// BLE connection handles run from 0 to `ble_max_connections - 1`.
    pub ble_max_connections: u8,
    /// Largest BLE ACL payload accepted from the Host.
    pub ble_max_octets: u16,

    // --- BR/EDR links ---
    /// First BT ACL connection handle.
    pub bt_acl_conhdl_min: u16,
    /// Number of BT ACL links (handles `min .. min + n`).
    pub bt_max_acl_links: u8,
    /// Bits of a synchronous handle that carry the SCO/eSCO link id.
    pub bt_sync_conhdl_mask: u16,
    /// Largest BT ACL payload accepted from the Host.
    pub bt_acl_max_len: u16,
    /// Largest synchronous payload accepted from the Host.
    pub sync_max_len: u8,

    // --- Traffic classes ---
    /// ACL data traffic is compiled in.
    pub acl_enabled: bool,
    /// Voice-over-HCI synchronous traffic is compiled in.
    pub sync_enabled: bool,
}

impl Default for HciConfig {
    fn default() -> Self {
        Self {
            // Command flow control
            nb_cmd_pkts: 5,

            // Advertising reports
            adv_rep_frag_max: 4,
            iq_rep_max: 4,
            max_activities: 8,

            // BLE
            ble_max_connections: 10,
            ble_max_octets: 251,

            // BR/EDR
            bt_acl_conhdl_min: 0x0080,
            bt_max_acl_links: 3,
            bt_sync_conhdl_mask: 0x0700,
            bt_acl_max_len: 1021,
            sync_max_len: 120,

            // Traffic classes
            acl_enabled: true,
            sync_enabled: true,
        }
    }
}

impl HciConfig {
    /// Largest BLE connection handle.
    pub fn ble_conhdl_max(&self) -> u16 {
        u16::from(self.ble_max_connections).saturating_sub(1)
    }

    /// True when `conhdl` falls in the BLE handle range.
    pub fn is_ble_handle(&self, conhdl: u16) -> bool {
        self.ble_max_connections > 0 && conhdl <= self.ble_conhdl_max()
    }

    /// Largest BT ACL connection handle.
    pub fn bt_acl_conhdl_max(&self) -> u16 {
        self.bt_acl_conhdl_min + u16::from(self.bt_max_acl_links).saturating_sub(1)
    }

    /// True when `conhdl` falls in the BT ACL handle range.
    pub fn is_bt_acl_handle(&self, conhdl: u16) -> bool {
        self.bt_max_acl_links > 0
            && conhdl >= self.bt_acl_conhdl_min
            && conhdl <= self.bt_acl_conhdl_max()
    }

    /// Check every field against its legal range.
    ///
    /// Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nb_cmd_pkts == 0 || self.nb_cmd_pkts > i8::MAX as u8 {
            return Err(ConfigError::OutOfRange("nb_cmd_pkts"));
        }
        if self.adv_rep_frag_max == 0 {
            return Err(ConfigError::OutOfRange("adv_rep_frag_max"));
        }
        if self.ble_max_octets < 27 || self.ble_max_octets > 251 {
            return Err(ConfigError::OutOfRange("ble_max_octets"));
        }
        // BLE and BT handle ranges must not overlap.
        if self.bt_max_acl_links > 0
            && self.ble_max_connections > 0
            && self.bt_acl_conhdl_min <= self.ble_conhdl_max()
        {
            return Err(ConfigError::OutOfRange("bt_acl_conhdl_min"));
        }
        // Handles are 12 bits on the wire.
        if self.bt_acl_conhdl_max() > 0x0EFF {
            return Err(ConfigError::OutOfRange("bt_max_acl_links"));
        }
        if self.bt_sync_conhdl_mask & self.bt_acl_conhdl_max() != 0 {
            return Err(ConfigError::OutOfRange("bt_sync_conhdl_mask"));
        }
        Ok(())
    }

    /// Parse and validate a JSON provisioning blob.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode for persistent storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::Encode)
    }

    /// Decode and validate from persistent storage.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }
}
