//! H4 (UART) framing.
//!
//! Wire format:
//! ```text
//! ┌───────────┬───────────────────────────┬─────────────────┐
//! │ Indicator │ HCI header                │ Payload         │
//! │ 1 byte    │ cmd 3 / ACL 4 / SYNC 3 /  │ length from the │
//! │           │ evt 2 bytes               │ header          │
//! └───────────┴───────────────────────────┴─────────────────┘
//! ```
//!
//! The decoder accumulates incoming bytes and yields complete packets.
//! A single read may return part of a header, part of a payload, or
//! several packets back to back; `feed` advances the caller's slice past
//! what it consumed so the rest can be fed again.

use heapless::Vec;
use log::warn;

use super::consts::{
    ACL_HDR_LEN, CMD_HDR_LEN, EVT_HDR_LEN, MAX_PARAM_SIZE, PacketType, SYNC_HDR_LEN,
};
use super::ports::HciIo;
use super::registry;
use super::tl::HciTl;
use crate::error::Result;

/// Largest ACL payload the decoder buffers.
pub const MAX_ACL_PAYLOAD: usize = 1021;

const MAX_HDR_LEN: usize = ACL_HDR_LEN;

/// One complete inbound packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum H4Packet {
    Command {
        opcode: u16,
        params: Vec<u8, MAX_PARAM_SIZE>,
    },
    Event {
        code: u8,
        params: Vec<u8, MAX_PARAM_SIZE>,
    },
    Acl {
        hdl_flags: u16,
        payload: Vec<u8, MAX_ACL_PAYLOAD>,
    },
    Sync {
        hdl_flags: u16,
        payload: Vec<u8, MAX_PARAM_SIZE>,
    },
    /// A command whose declared length exceeds what its opcode accepts.
    /// The parameters were skipped; only the opcode is kept so the
    /// command can still be answered.
    OversizeCommand { opcode: u16 },
}

impl H4Packet {
    pub fn packet_type(&self) -> PacketType {
        match self {
            Self::Command { .. } | Self::OversizeCommand { .. } => PacketType::Command,
            Self::Event { .. } => PacketType::Event,
            Self::Acl { .. } => PacketType::Acl,
            Self::Sync { .. } => PacketType::Sync,
        }
    }
}

const fn header_len(ptype: PacketType) -> usize {
    match ptype {
        PacketType::Command => CMD_HDR_LEN,
        PacketType::Acl => ACL_HDR_LEN,
        PacketType::Sync => SYNC_HDR_LEN,
        PacketType::Event => EVT_HDR_LEN,
    }
}

/// Decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    /// Waiting for a packet indicator.
    Indicator,
    /// Indicator received, reading the HCI header.
    ReadingHeader { ptype: PacketType, collected: usize },
    /// Header received, reading payload.
    ReadingPayload { ptype: PacketType, expected: usize },
    /// Skipping the payload of a packet that cannot be accepted.
    /// `opcode` is set when the skipped packet is a command.
    Discarding { remaining: usize, opcode: Option<u16> },
}

/// Streaming H4 decoder.
#[derive(Debug)]
pub struct H4Decoder {
    state: DecoderState,
    header_buf: [u8; MAX_HDR_LEN],
    payload_buf: Vec<u8, MAX_ACL_PAYLOAD>,
}

impl Default for H4Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl H4Decoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::Indicator,
            header_buf: [0; MAX_HDR_LEN],
            payload_buf: Vec::new(),
        }
    }

    /// Feed bytes into the decoder.
    ///
    /// Consumes bytes from the front of `data` until a packet completes or
    /// the input runs out.  Call again with the remaining slice while it is
    /// not empty.
    pub fn feed(&mut self, data: &mut &[u8]) -> Option<H4Packet> {
        while !data.is_empty() {
            match self.state {
                DecoderState::Indicator => {
                    let byte = data[0];
                    *data = &data[1..];
                    match PacketType::try_from(byte) {
                        Ok(ptype) => {
                            self.state = DecoderState::ReadingHeader { ptype, collected: 0 };
                        }
                        Err(other) => warn!("H4: bad indicator 0x{other:02X}, skipped"),
                    }
                }

                DecoderState::ReadingHeader { ptype, collected } => {
                    let needed = header_len(ptype) - collected;
                    let to_copy = needed.min(data.len());
                    self.header_buf[collected..collected + to_copy].copy_from_slice(&data[..to_copy]);
                    *data = &data[to_copy..];

                    let collected = collected + to_copy;
                    if collected < header_len(ptype) {
                        self.state = DecoderState::ReadingHeader { ptype, collected };
                        continue;
                    }

                    let expected = self.payload_len(ptype);
                    self.payload_buf.clear();
                    if expected > self.capacity(ptype) {
                        warn!("H4: {ptype:?} payload of {expected} bytes too long, discarded");
                        let opcode = (ptype == PacketType::Command).then(|| self.opcode());
                        self.state = DecoderState::Discarding { remaining: expected, opcode };
                        continue;
                    }
                    self.state = DecoderState::ReadingPayload { ptype, expected };
                    if expected == 0 {
                        return self.complete(ptype);
                    }
                }

                DecoderState::ReadingPayload { ptype, expected } => {
                    let needed = expected - self.payload_buf.len();
                    let to_copy = needed.min(data.len());
                    // Capacity was checked against `expected` at header time.
                    if self.payload_buf.extend_from_slice(&data[..to_copy]).is_err() {
                        self.reset();
                        continue;
                    }
                    *data = &data[to_copy..];

                    if self.payload_buf.len() == expected {
                        return self.complete(ptype);
                    }
                }

                DecoderState::Discarding { remaining, opcode } => {
                    let to_skip = remaining.min(data.len());
                    *data = &data[to_skip..];
                    let remaining = remaining - to_skip;
                    if remaining > 0 {
                        self.state = DecoderState::Discarding { remaining, opcode };
                        continue;
                    }
                    self.state = DecoderState::Indicator;
                    if let Some(opcode) = opcode {
                        return Some(H4Packet::OversizeCommand { opcode });
                    }
                }
            }
        }
        None
    }

    /// Reset decoder state (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.state = DecoderState::Indicator;
        self.payload_buf.clear();
    }

    fn payload_len(&self, ptype: PacketType) -> usize {
        let h = &self.header_buf;
        match ptype {
            PacketType::Command | PacketType::Sync => usize::from(h[2]),
            PacketType::Event => usize::from(h[1]),
            PacketType::Acl => usize::from(u16::from_le_bytes([h[2], h[3]])),
        }
    }

    fn opcode(&self) -> u16 {
        u16::from_le_bytes([self.header_buf[0], self.header_buf[1]])
    }

    fn capacity(&self, ptype: PacketType) -> usize {
        match ptype {
            PacketType::Command => usize::from(registry::max_param_size_for(self.opcode())),
            PacketType::Acl => MAX_ACL_PAYLOAD,
            PacketType::Event | PacketType::Sync => MAX_PARAM_SIZE,
        }
    }

    fn complete(&mut self, ptype: PacketType) -> Option<H4Packet> {
        self.state = DecoderState::Indicator;
        let h = self.header_buf;
        let body = self.payload_buf.as_slice();
        let pkt = match ptype {
            PacketType::Command => H4Packet::Command {
                opcode: self.opcode(),
                params: Vec::from_slice(body).ok()?,
            },
            PacketType::Event => H4Packet::Event {
                code: h[0],
                params: Vec::from_slice(body).ok()?,
            },
            PacketType::Acl => H4Packet::Acl {
                hdl_flags: u16::from_le_bytes([h[0], h[1]]),
                payload: self.payload_buf.clone(),
            },
            PacketType::Sync => H4Packet::Sync {
                hdl_flags: u16::from_le_bytes([h[0], h[1]]),
                payload: Vec::from_slice(body).ok()?,
            },
        };
        self.payload_buf.clear();
        Some(pkt)
    }
}

/// Encode one outbound frame as `[indicator][frame]` into `out_buf`.
///
/// Returns the total number of bytes written.
pub fn encode_frame(ptype: PacketType, frame: &[u8], out_buf: &mut [u8]) -> Option<usize> {
    let total = 1 + frame.len();
    if total > out_buf.len() {
        return None;
    }
    out_buf[0] = ptype as u8;
    out_buf[1..total].copy_from_slice(frame);
    Some(total)
}

// ───────────────────────────────────────────────────────────────
// Dispatch
// ───────────────────────────────────────────────────────────────

/// Which end of the link this layer plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Controller,
    Host,
}

impl HciTl {
    /// Hand one decoded packet to the matching entry point.
    pub fn receive(&mut self, role: Role, pkt: H4Packet, io: &mut impl HciIo) -> Result<()> {
        match (role, pkt) {
            (Role::Controller, H4Packet::Command { opcode, params }) => {
                self.command_received(opcode, &params, io)
            }
            (Role::Controller, H4Packet::OversizeCommand { opcode }) => self.command_too_long(opcode, io),
            (Role::Controller, H4Packet::Acl { hdl_flags, payload }) => {
                let len = u16::try_from(payload.len()).unwrap_or(u16::MAX);
                match self.acl_tx_data_alloc(hdl_flags, len, io)? {
                    Some(mut buf) => {
                        buf.payload_mut().copy_from_slice(&payload);
                        self.acl_tx_data_received(hdl_flags, buf, io)
                    }
                    None => Ok(()),
                }
            }
            (Role::Controller, H4Packet::Sync { hdl_flags, payload }) => {
                let len = u8::try_from(payload.len()).unwrap_or(u8::MAX);
                let mut buf = self.sync_tx_data_alloc(hdl_flags, len, io)?;
                buf.payload_mut().copy_from_slice(&payload);
                self.sync_tx_data_received(hdl_flags, buf, io)
            }
            (Role::Host, H4Packet::Event { code, params }) => self.event_received(code, &params, io),
            (Role::Host, H4Packet::Acl { hdl_flags, payload }) => {
                let len = u16::try_from(payload.len()).unwrap_or(u16::MAX);
                let mut buf = self.acl_rx_data_alloc(hdl_flags, len);
                buf.payload_mut().copy_from_slice(&payload);
                self.acl_rx_data_received(hdl_flags, buf, io)
            }
            (role, pkt) => {
                warn!("{:?} packet unexpected in {role:?} role", pkt.packet_type());
                Ok(())
            }
        }
    }
}
