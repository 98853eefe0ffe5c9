//! Controller → Host data flow control.
//!
//! When the Host enables flow control it announces how many ACL and
//! synchronous packets it can buffer.  Every data packet sent consumes one
//! credit; Host Number Of Completed Packets gives them back.

use super::consts::status;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Credits {
    enabled: bool,
    max: u16,
    sent: u16,
}

impl Credits {
    fn available(&self) -> bool {
        !self.enabled || self.sent < self.max
    }

    fn consume(&mut self) {
        if self.enabled {
            self.sent = self.sent.saturating_add(1);
        }
    }

    fn release(&mut self, n: u16) {
        self.sent = self.sent.saturating_sub(n);
    }
}

/// Flow-control enable values of Set Controller To Host Flow Control.
pub mod mode {
    pub const OFF: u8 = 0x00;
    pub const ACL: u8 = 0x01;
    pub const SYNC: u8 = 0x02;
    pub const ACL_AND_SYNC: u8 = 0x03;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostFlowControl {
    acl: Credits,
    sync: Credits,
    acl_pkt_len: u16,
    sync_pkt_len: u8,
}

impl HostFlowControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a Set Controller To Host Flow Control value.
    pub fn set_mode(&mut self, value: u8) -> u8 {
        if value > mode::ACL_AND_SYNC {
            return status::INVALID_HCI_PARAMETERS;
        }
        self.acl.enabled = value & mode::ACL != 0;
        self.sync.enabled = value & mode::SYNC != 0;
        self.acl.sent = 0;
        self.sync.sent = 0;
        status::SUCCESS
    }

    /// Record the Host's buffer sizes.
    pub fn host_buffer_size(
        &mut self,
        acl_pkt_len: u16,
        sync_pkt_len: u8,
        nb_acl_pkts: u16,
        nb_sync_pkts: u16,
    ) -> u8 {
        if acl_pkt_len == 0 || nb_acl_pkts == 0 {
            return status::INVALID_HCI_PARAMETERS;
        }
        self.acl_pkt_len = acl_pkt_len;
        self.sync_pkt_len = sync_pkt_len;
        self.acl.max = nb_acl_pkts;
        self.sync.max = nb_sync_pkts;
        status::SUCCESS
    }

    pub fn acl_available(&self) -> bool {
        self.acl.available()
    }

    pub fn sync_available(&self) -> bool {
        self.sync.available()
    }

    pub fn acl_sent(&mut self) {
        self.acl.consume();
    }

    pub fn sync_sent(&mut self) {
        self.sync.consume();
    }

    pub fn acl_completed(&mut self, n: u16) {
        self.acl.release(n);
    }

    pub fn sync_completed(&mut self, n: u16) {
        self.sync.release(n);
    }

    /// Largest ACL payload the Host accepts, when it announced one.
    pub fn acl_pkt_len(&self) -> Option<u16> {
        (self.acl_pkt_len > 0).then_some(self.acl_pkt_len)
    }

    pub fn sync_pkt_len(&self) -> Option<u8> {
        (self.sync_pkt_len > 0).then_some(self.sync_pkt_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_never_blocks() {
        let mut fc = HostFlowControl::new();
        for _ in 0..100 {
            fc.acl_sent();
        }
        assert!(fc.acl_available());
        assert!(fc.sync_available());
    }

    #[test]
    fn credits_run_out_and_come_back() {
        let mut fc = HostFlowControl::new();
        assert_eq!(fc.host_buffer_size(1021, 64, 2, 1), status::SUCCESS);
        assert_eq!(fc.set_mode(mode::ACL), status::SUCCESS);

        fc.acl_sent();
        assert!(fc.acl_available());
        fc.acl_sent();
        assert!(!fc.acl_available());
        // SYNC not under flow control.
        assert!(fc.sync_available());

        fc.acl_completed(1);
        assert!(fc.acl_available());
        fc.acl_completed(10);
        assert!(fc.acl_available());
    }

    #[test]
    fn invalid_values_rejected() {
        let mut fc = HostFlowControl::new();
        assert_eq!(fc.set_mode(4), status::INVALID_HCI_PARAMETERS);
        assert_eq!(fc.host_buffer_size(0, 0, 1, 0), status::INVALID_HCI_PARAMETERS);
        assert_eq!(fc.acl_pkt_len(), None);
    }
}
