//! Port traits: the boundary between the HCI layer and its collaborators.
//!
//! ```text
//!   Host byte stream ◀──▶ Transport
//!                            ▲
//!                          HciTl ──▶ MessagePort ──▶ LM / LLM / LLC / GAP ...
//!                            │
//!              BufferPools ◀─┴─▶ LinkDirectory / HostLinks
//! ```
//!
//! The transport layer never owns any of these.  Every entry point takes
//! `io: &mut impl HciIo` and calls through it, so tests drive the layer
//! with a single recording mock.

use super::consts::{BD_ADDR_LEN, PacketType};
use super::msg::{Dest, Message, MsgKind, Pool, PoolToken};

// ───────────────────────────────────────────────────────────────
// Transport (driven adapter: frames → Host)
// ───────────────────────────────────────────────────────────────

/// Frame-oriented transport towards the peer.
///
/// `write` starts the transmission of one complete frame.  The driver
/// reports completion by calling [`HciTl::tx_done`](super::tl::HciTl::tx_done)
/// once `write` has returned, never from inside it.
pub trait Transport {
    type Error: core::fmt::Debug;

    fn write(&mut self, ptype: PacketType, frame: &[u8]) -> Result<(), Self::Error>;
}

// ───────────────────────────────────────────────────────────────
// Message facility
// ───────────────────────────────────────────────────────────────

/// Delivery side of the internal message facility.
pub trait MessagePort {
    /// Allocate a message with `param_len` parameter bytes.
    ///
    /// `None` means the heap is exhausted.
    fn alloc(&mut self, kind: MsgKind, id: u16, dest: Dest, param_len: usize) -> Option<Message> {
        Some(Message::new(kind, id, dest, param_len))
    }

    /// Deliver a message to its destination task.
    fn send(&mut self, msg: Message);

    /// Release a message that will not be delivered.
    fn free(&mut self, msg: Message) {
        drop(msg);
    }
}

// ───────────────────────────────────────────────────────────────
// Data buffer pools
// ───────────────────────────────────────────────────────────────

/// Class-specific data buffer pools.
pub trait BufferPools {
    /// Take one slot from `pool`, or `None` when it is empty.
    fn alloc_buf(&mut self, pool: Pool) -> Option<PoolToken>;

    /// Give a slot back.
    fn free_buf(&mut self, pool: Pool, token: PoolToken);
}

// ───────────────────────────────────────────────────────────────
// Connection tables
// ───────────────────────────────────────────────────────────────

/// Controller-side view of the active links.
///
/// Each lookup returns the link index when the link is active.
pub trait LinkDirectory {
    fn ble_link(&self, conhdl: u16) -> Option<u8>;

    fn bt_link(&self, conhdl: u16) -> Option<u8>;

    fn bt_link_by_addr(&self, addr: &[u8; BD_ADDR_LEN]) -> Option<u8>;
}

/// Host-side view of the established connections.
pub trait HostLinks {
    fn link_by_handle(&self, conhdl: u16) -> Option<u8>;

    /// Remember that connection `idx` waits for a command status of `opcode`.
    fn record_pending_status(&mut self, idx: u8, opcode: u16);

    /// Find and clear the connection waiting for a status of `opcode`.
    fn take_pending_status(&mut self, opcode: u16) -> Option<u8>;
}

// ───────────────────────────────────────────────────────────────
// Aggregate
// ───────────────────────────────────────────────────────────────

/// Everything the layer talks to.
pub trait HciIo: Transport + MessagePort + BufferPools + LinkDirectory + HostLinks {}

impl<T> HciIo for T where T: Transport + MessagePort + BufferPools + LinkDirectory + HostLinks {}
