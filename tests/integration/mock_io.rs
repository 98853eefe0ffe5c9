//! Recording environment for integration tests.
//!
//! Implements every port the HCI layer consumes and keeps a history of
//! written frames, delivered messages and pool traffic so scenarios can
//! assert on the full exchange.

use bthci::HciConfig;
use bthci::hci::conn::ConnTable;
use bthci::hci::consts::{BD_ADDR_LEN, PacketType};
use bthci::hci::msg::{Dest, Message, MsgKind, Pool, PoolToken};
use bthci::hci::ports::{BufferPools, HostLinks, LinkDirectory, MessagePort, Transport};

// ── Pool call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolCall {
    Alloc(Pool, u16),
    Free(Pool, u16),
}

// ── MockIo ────────────────────────────────────────────────────

pub struct MockIo {
    pub written: Vec<(PacketType, Vec<u8>)>,
    pub delivered: Vec<Message>,
    pub freed_msgs: usize,
    pub pool_calls: Vec<PoolCall>,
    /// Free slots per pool: (BLE, BT).
    pub free_slots: (u16, u16),
    pub links: ConnTable,
    next_slot: u16,
}

#[allow(dead_code)]
impl MockIo {
    pub fn new(config: &HciConfig) -> Self {
        Self {
            written: Vec::new(),
            delivered: Vec::new(),
            freed_msgs: 0,
            pool_calls: Vec::new(),
            free_slots: (8, 8),
            links: ConnTable::new(config),
            next_slot: 0,
        }
    }

    /// Last frame written, without its H4 indicator.
    pub fn last_frame(&self) -> &[u8] {
        self.written.last().map(|(_, f)| f.as_slice()).unwrap_or(&[])
    }

    /// Event codes of every written event frame, in order.
    pub fn event_codes(&self) -> Vec<u8> {
        self.written
            .iter()
            .filter(|(t, _)| *t == PacketType::Event)
            .map(|(_, f)| f[0])
            .collect()
    }

    pub fn frees(&self) -> Vec<(Pool, u16)> {
        self.pool_calls
            .iter()
            .filter_map(|c| match *c {
                PoolCall::Free(pool, slot) => Some((pool, slot)),
                PoolCall::Alloc(..) => None,
            })
            .collect()
    }
}

impl Transport for MockIo {
    type Error = ();

    fn write(&mut self, ptype: PacketType, frame: &[u8]) -> Result<(), ()> {
        self.written.push((ptype, frame.to_vec()));
        Ok(())
    }
}

impl MessagePort for MockIo {
    fn alloc(&mut self, kind: MsgKind, id: u16, dest: Dest, param_len: usize) -> Option<Message> {
        Some(Message::new(kind, id, dest, param_len))
    }

    fn send(&mut self, msg: Message) {
        self.delivered.push(msg);
    }

    fn free(&mut self, _msg: Message) {
        self.freed_msgs += 1;
    }
}

impl BufferPools for MockIo {
    fn alloc_buf(&mut self, pool: Pool) -> Option<PoolToken> {
        let free = match pool {
            Pool::Ble => &mut self.free_slots.0,
            Pool::Bt => &mut self.free_slots.1,
        };
        *free = free.checked_sub(1)?;
        self.next_slot += 1;
        self.pool_calls.push(PoolCall::Alloc(pool, self.next_slot));
        Some(PoolToken::new(self.next_slot))
    }

    fn free_buf(&mut self, pool: Pool, token: PoolToken) {
        match pool {
            Pool::Ble => self.free_slots.0 += 1,
            Pool::Bt => self.free_slots.1 += 1,
        }
        self.pool_calls.push(PoolCall::Free(pool, token.slot()));
    }
}

impl LinkDirectory for MockIo {
    fn ble_link(&self, conhdl: u16) -> Option<u8> {
        self.links.ble_link(conhdl)
    }

    fn bt_link(&self, conhdl: u16) -> Option<u8> {
        self.links.bt_link(conhdl)
    }

    fn bt_link_by_addr(&self, addr: &[u8; BD_ADDR_LEN]) -> Option<u8> {
        self.links.bt_link_by_addr(addr)
    }
}

impl HostLinks for MockIo {
    fn link_by_handle(&self, conhdl: u16) -> Option<u8> {
        self.links.link_by_handle(conhdl)
    }

    fn record_pending_status(&mut self, idx: u8, opcode: u16) {
        self.links.record_pending_status(idx, opcode);
    }

    fn take_pending_status(&mut self, opcode: u16) -> Option<u8> {
        self.links.take_pending_status(opcode)
    }
}
