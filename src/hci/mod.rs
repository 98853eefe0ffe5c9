//! Bluetooth HCI transport layer and message codec.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        HCI layer                             │
//! │                                                              │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────────────────────┐  │
//! │  │    H4    │──▶│ Dispatch │──▶│  MessagePort (LM, LLM,   │  │
//! │  │ (framing)│   │ (route,  │   │  LLC, LC, GAPM, GAPC...) │  │
//! │  └──────────┘   │  unpack) │   └──────────────────────────┘  │
//! │       ▲         └──────────┘                │                │
//! │       │                                     ▼                │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────────────────────┐  │
//! │  │Transport │◀──│    TL    │◀──│ tl_send (events, data,   │  │
//! │  │ (write)  │   │ (queues, │   │ Host commands)           │  │
//! │  └──────────┘   │  pack)   │   └──────────────────────────┘  │
//! │                 └──────────┘                                 │
//! │   Registry + Codec: descriptors and wire/internal layouts    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod adv_filter;
pub mod codec;
pub mod conn;
pub mod consts;
pub mod descriptor;
pub mod dispatch;
pub mod flow;
pub mod h4;
pub mod msg;
pub mod ports;
pub mod registry;
pub mod shared;
pub mod tl;

#[cfg(test)]
pub(crate) mod test_io;

pub use h4::{H4Decoder, H4Packet, Role};
pub use msg::{DataBuffer, Dest, Message, MsgKind, Origin, Pool, PoolToken};
pub use ports::HciIo;
pub use shared::SharedHciTl;
pub use tl::{HciTl, InitType, TxState};
