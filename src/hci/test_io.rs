//! Recording port set shared by the unit tests.

use super::conn::ConnTable;
use super::consts::{BD_ADDR_LEN, PacketType};
use super::msg::{Dest, Message, MsgKind, Pool, PoolToken};
use super::ports::{BufferPools, HostLinks, LinkDirectory, MessagePort, Transport};
use crate::config::HciConfig;

pub(crate) struct TestIo {
    pub frames: Vec<(PacketType, Vec<u8>)>,
    pub sent: Vec<Message>,
    pub dropped: usize,
    pub freed: Vec<(Pool, u16)>,
    pub fail_writes: bool,
    pub heap_exhausted: bool,
    /// Free slots per pool: (BLE, BT).
    pub slots: (u16, u16),
    next_slot: u16,
    pub links: ConnTable,
}

impl TestIo {
    pub fn new(config: &HciConfig) -> Self {
        Self {
            frames: Vec::new(),
            sent: Vec::new(),
            dropped: 0,
            freed: Vec::new(),
            fail_writes: false,
            heap_exhausted: false,
            slots: (4, 4),
            next_slot: 0,
            links: ConnTable::new(config),
        }
    }

    /// Last event frame written, without its H4 indicator.
    pub fn last_frame(&self) -> &[u8] {
        self.frames.last().map(|(_, f)| f.as_slice()).unwrap_or(&[])
    }
}

impl Transport for TestIo {
    type Error = ();

    fn write(&mut self, ptype: PacketType, frame: &[u8]) -> Result<(), ()> {
        if self.fail_writes {
            return Err(());
        }
        self.frames.push((ptype, frame.to_vec()));
        Ok(())
    }
}

impl MessagePort for TestIo {
    fn alloc(&mut self, kind: MsgKind, id: u16, dest: Dest, param_len: usize) -> Option<Message> {
        (!self.heap_exhausted).then(|| Message::new(kind, id, dest, param_len))
    }

    fn send(&mut self, msg: Message) {
        self.sent.push(msg);
    }

    fn free(&mut self, _msg: Message) {
        self.dropped += 1;
    }
}

impl BufferPools for TestIo {
    fn alloc_buf(&mut self, pool: Pool) -> Option<PoolToken> {
        let free = match pool {
            Pool::Ble => &mut self.slots.0,
            Pool::Bt => &mut self.slots.1,
        };
        *free = free.checked_sub(1)?;
        self.next_slot += 1;
        Some(PoolToken::new(self.next_slot))
    }

    fn free_buf(&mut self, pool: Pool, token: PoolToken) {
        match pool {
            Pool::Ble => self.slots.0 += 1,
            Pool::Bt => self.slots.1 += 1,
        }
        self.freed.push((pool, token.slot()));
    }
}

impl LinkDirectory for TestIo {
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

impl HostLinks for TestIo {
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
