//! Internal message representation.
//!
//! A [`Message`] carries the parameters of one command, event or data
//! packet in internal form, with the HCI header space reserved in front:
//!
//! ```text
//!  buf: ┌──────────────┬───────────────────────────────┐
//!       │ header (res) │ parameters (internal layout)  │
//!       └──────────────┴───────────────────────────────┘
//!        0              kind.header_len()
//! ```
//!
//! The transmit path packs the parameters in place and fills the header
//! last, so the finished frame is a prefix of `buf`.  Data packets keep
//! their payload in a pool-owned [`DataBuffer`] laid out the same way.

use super::consts::{ACL_HDR_LEN, CMD_HDR_LEN, CS_EVT_PARLEN, EVT_HDR_LEN, SYNC_HDR_LEN};

/// Message kinds, each with its own frame builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgKind {
    /// Host → Controller command (built on the Host side).
    Command,
    /// Command-complete event; `id` is the completed opcode.
    CmdCmpEvt,
    /// Command-status event; `id` is the opcode.
    CmdStatEvt,
    /// Plain event; `id` is the event code.
    Event,
    /// LE meta sub-event; `id` is the sub-event code.
    LeEvent,
    /// Debug meta sub-event; `id` is the sub-event code.
    DbgEvent,
    /// ACL data; `id` is the handle+flags word.
    AclData,
    /// Synchronous data; `id` is the handle+flags word.
    SyncData,
}

impl MsgKind {
    /// Header bytes reserved in front of the parameters.
    pub const fn header_len(self) -> usize {
        match self {
            // code, length, credit, opcode
            Self::CmdCmpEvt => EVT_HDR_LEN + 3,
            Self::CmdStatEvt | Self::Event | Self::LeEvent | Self::DbgEvent => EVT_HDR_LEN,
            Self::AclData => ACL_HDR_LEN,
            Self::SyncData => SYNC_HDR_LEN,
            Self::Command => CMD_HDR_LEN,
        }
    }

    pub const fn is_data(self) -> bool {
        matches!(self, Self::AclData | Self::SyncData)
    }
}

/// Internal destination (or source) task of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dest {
    /// BR/EDR link manager.
    Lm,
    /// BR/EDR broadcast manager.
    Lb,
    /// LE link-layer manager.
    Llm,
    /// LE link controller of one link.
    Llc(u8),
    /// BR/EDR link controller of one link.
    Lc(u8),
    /// LE isochronous manager.
    Lli,
    /// Debug task.
    Dbg,
    /// Host: GAP manager.
    Gapm,
    /// Host: GAP controller of one connection.
    Gapc(u8),
    /// Host: L2CAP controller of one connection.
    L2cc(u8),
    /// Host: isochronous manager of one connection.
    Iso(u8),
    /// The transport layer itself.
    Hci,
}

// ───────────────────────────────────────────────────────────────
// Data buffers
// ───────────────────────────────────────────────────────────────

/// Pool a data buffer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Ble,
    Bt,
}

/// Proof of ownership of one pool slot.
///
/// Not `Clone`: a token goes back to its pool exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct PoolToken(u16);

impl PoolToken {
    pub const fn new(slot: u16) -> Self {
        Self(slot)
    }

    pub const fn slot(&self) -> u16 {
        self.0
    }
}

/// Where a data buffer's storage comes from.
#[derive(Debug, PartialEq, Eq)]
pub enum Origin {
    Pool(Pool, PoolToken),
    /// Plain heap memory owned by the buffer itself (Host side).
    Heap,
    /// Scratch buffer handed out when no pool slot was free; its payload is
    /// discarded on reception.
    Trash,
}

/// One ACL or SYNC payload with its header space reserved.
#[derive(Debug, PartialEq, Eq)]
pub struct DataBuffer {
    pub origin: Origin,
    header_len: usize,
    bytes: Vec<u8>,
}

impl DataBuffer {
    pub fn new(origin: Origin, header_len: usize, payload_len: usize) -> Self {
        Self {
            origin,
            header_len,
            bytes: vec![0; header_len + payload_len],
        }
    }

    pub fn is_trash(&self) -> bool {
        self.origin == Origin::Trash
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes[self.header_len..]
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[self.header_len..]
    }

    pub fn header_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.header_len]
    }

    /// Header plus payload.
    pub fn frame(&self) -> &[u8] {
        &self.bytes
    }
}

// ───────────────────────────────────────────────────────────────
// Message
// ───────────────────────────────────────────────────────────────

/// One queued or delivered message.
#[derive(Debug, PartialEq, Eq)]
pub struct Message {
    pub kind: MsgKind,
    pub id: u16,
    pub dest: Dest,
    /// Source connection index for Host-side commands.
    pub src_idx: Option<u8>,
    buf: Vec<u8>,
    data: Option<DataBuffer>,
}

impl Message {
    /// Message with `param_len` zeroed parameter bytes.
    pub fn new(kind: MsgKind, id: u16, dest: Dest, param_len: usize) -> Self {
        Self {
            kind,
            id,
            dest,
            src_idx: None,
            buf: vec![0; kind.header_len() + param_len],
            data: None,
        }
    }

    /// Message with the given parameters copied in.
    pub fn with_params(kind: MsgKind, id: u16, dest: Dest, params: &[u8]) -> Self {
        let mut msg = Self::new(kind, id, dest, params.len());
        msg.params_mut().copy_from_slice(params);
        msg
    }

    /// Command-status event for `opcode`; credit and opcode are filled by
    /// the transmit path.
    pub fn command_status(opcode: u16, status: u8) -> Self {
        let mut msg = Self::new(MsgKind::CmdStatEvt, opcode, Dest::Hci, CS_EVT_PARLEN);
        msg.params_mut()[0] = status;
        msg
    }

    /// Data message owning `data`.
    pub fn data(kind: MsgKind, hdl_flags: u16, dest: Dest, data: DataBuffer) -> Self {
        Self {
            kind,
            id: hdl_flags,
            dest,
            src_idx: None,
            buf: Vec::new(),
            data: Some(data),
        }
    }

    pub fn params(&self) -> &[u8] {
        self.buf.get(self.kind.header_len()..).unwrap_or(&[])
    }

    pub fn params_mut(&mut self) -> &mut [u8] {
        let hdr = self.kind.header_len();
        self.buf.get_mut(hdr..).unwrap_or(&mut [])
    }

    pub fn data_buffer(&self) -> Option<&DataBuffer> {
        self.data.as_ref()
    }

    pub fn data_buffer_mut(&mut self) -> Option<&mut DataBuffer> {
        self.data.as_mut()
    }

    pub fn take_data(&mut self) -> Option<DataBuffer> {
        self.data.take()
    }

    /// Header bytes and parameter bytes, mutably and at once.
    pub(crate) fn split_mut(&mut self) -> (&mut [u8], &mut [u8]) {
        let hdr = self.kind.header_len().min(self.buf.len());
        self.buf.split_at_mut(hdr)
    }

    /// Shrink the parameters to `len` bytes.
    pub(crate) fn truncate_params(&mut self, len: usize) {
        self.buf.truncate(self.kind.header_len() + len);
    }

    /// Grow or shrink the parameters to `len` bytes, zero-filling.
    pub(crate) fn resize_params(&mut self, len: usize) {
        self.buf.resize(self.kind.header_len() + len, 0);
    }

    /// Finished frame: the whole buffer, or the data buffer for data kinds.
    pub fn frame(&self) -> &[u8] {
        match &self.data {
            Some(data) => data.frame(),
            None => &self.buf,
        }
    }

    /// Connection handle of a data message.
    pub const fn conhdl(&self) -> u16 {
        self.id & super::consts::HDL_MASK
    }
}
