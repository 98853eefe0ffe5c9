//! Bounded active-connection table.
//!
//! Serves both ends of the layer: the controller-side [`LinkDirectory`]
//! (which links exist, by handle or address) and the Host-side
//! [`HostLinks`] (connection slots with one pending command-status each).
//!
//! Link indices follow the controller convention: a BLE link's index is its
//! handle, a BT link's index is its handle minus the first BT ACL handle.

use heapless::Vec;

use super::consts::BD_ADDR_LEN;
use super::ports::{HostLinks, LinkDirectory};
use crate::config::HciConfig;

/// Capacity of each link list.
pub const MAX_LINKS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BtLink {
    conhdl: u16,
    addr: [u8; BD_ADDR_LEN],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HostConn {
    conhdl: u16,
    pending: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct ConnTable {
    bt_acl_conhdl_min: u16,
    ble: Vec<u16, MAX_LINKS>,
    bt: Vec<BtLink, MAX_LINKS>,
    host: [Option<HostConn>; MAX_LINKS],
}

impl ConnTable {
    pub fn new(config: &HciConfig) -> Self {
        Self {
            bt_acl_conhdl_min: config.bt_acl_conhdl_min,
            ble: Vec::new(),
            bt: Vec::new(),
            host: [None; MAX_LINKS],
        }
    }

    // ── Controller side ──────────────────────────────────────

    /// Mark a BLE link active.  Gives the handle back when the table is full.
    pub fn add_ble(&mut self, conhdl: u16) -> Result<(), u16> {
        if self.ble.contains(&conhdl) {
            return Ok(());
        }
        self.ble.push(conhdl)
    }

    pub fn remove_ble(&mut self, conhdl: u16) {
        self.ble.retain(|&h| h != conhdl);
    }

    /// Mark a BT ACL link active.  Gives the handle back when the table is
    /// full.
    pub fn add_bt(&mut self, conhdl: u16, addr: [u8; BD_ADDR_LEN]) -> Result<(), u16> {
        self.remove_bt(conhdl);
        self.bt
            .push(BtLink { conhdl, addr })
            .map_err(|link| link.conhdl)
    }

    pub fn remove_bt(&mut self, conhdl: u16) {
        self.bt.retain(|l| l.conhdl != conhdl);
    }

    fn bt_index(&self, conhdl: u16) -> Option<u8> {
        conhdl
            .checked_sub(self.bt_acl_conhdl_min)
            .and_then(|i| u8::try_from(i).ok())
    }

    // ── Host side ────────────────────────────────────────────

    /// Open a Host connection slot for `conhdl`; returns its index.
    pub fn host_connect(&mut self, conhdl: u16) -> Option<u8> {
        let idx = self.host.iter().position(Option::is_none)?;
        self.host[idx] = Some(HostConn {
            conhdl,
            pending: None,
        });
        u8::try_from(idx).ok()
    }

    pub fn host_disconnect(&mut self, idx: u8) {
        if let Some(slot) = self.host.get_mut(usize::from(idx)) {
            *slot = None;
        }
    }
}

impl LinkDirectory for ConnTable {
    fn ble_link(&self, conhdl: u16) -> Option<u8> {
        if self.ble.contains(&conhdl) {
            u8::try_from(conhdl).ok()
        } else {
            None
        }
    }

    fn bt_link(&self, conhdl: u16) -> Option<u8> {
        self.bt
            .iter()
            .find(|l| l.conhdl == conhdl)
            .and_then(|l| self.bt_index(l.conhdl))
    }

    fn bt_link_by_addr(&self, addr: &[u8; BD_ADDR_LEN]) -> Option<u8> {
        self.bt
            .iter()
            .find(|l| &l.addr == addr)
            .and_then(|l| self.bt_index(l.conhdl))
    }
}

impl HostLinks for ConnTable {
    fn link_by_handle(&self, conhdl: u16) -> Option<u8> {
        self.host
            .iter()
            .position(|c| c.is_some_and(|c| c.conhdl == conhdl))
            .and_then(|i| u8::try_from(i).ok())
    }

    fn record_pending_status(&mut self, idx: u8, opcode: u16) {
        if let Some(Some(conn)) = self.host.get_mut(usize::from(idx)) {
            conn.pending = Some(opcode);
        }
    }

    fn take_pending_status(&mut self, opcode: u16) -> Option<u8> {
        let idx = self
            .host
            .iter()
            .position(|c| c.is_some_and(|c| c.pending == Some(opcode)))?;
        if let Some(conn) = self.host[idx].as_mut() {
            conn.pending = None;
        }
        u8::try_from(idx).ok()
    }
}
