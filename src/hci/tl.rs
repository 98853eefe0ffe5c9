//! Transport environment and transmit path.
//!
//! One [`HciTl`] owns every queue and counter of the layer.  At most one
//! frame is in flight; the driver reports its completion with
//! [`HciTl::tx_done`], which releases the frame's resources and starts the
//! next one.
//!
//! ```text
//!             tl_send ──┬── ACL  ──▶ acl_queue  ─┐
//!                       ├── SYNC ──▶ sync_queue ─┤   tx_queue > sync > acl
//!                       └── else ─▶ adv filter ──▶ tx_queue ─┴──▶ build ──▶ Transport::write
//!                                                                            │
//!   Idle ◀──────────────────────────── tx_done ◀─────────────────────────────┘
//! ```

use std::collections::VecDeque;

use log::{debug, error, info, warn};

use super::adv_filter::AdvReportFilter;
use super::codec;
use super::consts::{
    CC_EVT_HDR_PARLEN, CS_EVT_PARLEN, MAX_PARAM_SIZE, PacketType, evt, op, status,
};
use super::descriptor::Format;
use super::flow::HostFlowControl;
use super::msg::{Message, MsgKind, Origin, Pool};
use super::ports::{BufferPools, HciIo, MessagePort, Transport};
use super::registry;
use crate::config::HciConfig;
use crate::error::{CodecError, Error, Fault, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Idle,
    Ongoing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitType {
    /// Power-on: everything is cleared.
    Cold,
    /// HCI reset: queued traffic is kept.
    Reset,
}

/// The transport environment.
#[derive(Debug)]
pub struct HciTl {
    pub(super) config: HciConfig,
    tx_queue: VecDeque<Message>,
    acl_queue: VecDeque<Message>,
    sync_queue: VecDeque<Message>,
    current: Option<Message>,
    tx_state: TxState,
    cmd_credits: i8,
    /// A trash buffer was handed out for the ACL payload being received.
    pub(super) acl_trash: bool,
    pub(super) sync_trash: bool,
    adv_filter: AdvReportFilter,
    flow: HostFlowControl,
}

impl HciTl {
    /// Validate `config` and build an idle environment.
    pub fn new(config: HciConfig) -> Result<Self> {
        config.validate()?;
        let adv_filter = AdvReportFilter::new(&config);
        let cmd_credits = config.nb_cmd_pkts as i8;
        Ok(Self {
            config,
            tx_queue: VecDeque::new(),
            acl_queue: VecDeque::new(),
            sync_queue: VecDeque::new(),
            current: None,
            tx_state: TxState::Idle,
            cmd_credits,
            acl_trash: false,
            sync_trash: false,
            adv_filter,
            flow: HostFlowControl::new(),
        })
    }

    /// Reinitialise the layer.
    ///
    /// A cold init drops queued and in-flight traffic; their data buffers
    /// go back to the pools and the messages are freed.
    pub fn init(&mut self, init_type: InitType, io: &mut impl HciIo) {
        match init_type {
            InitType::Cold => {
                info!("HCI cold init");
                let queues = [
                    core::mem::take(&mut self.tx_queue),
                    core::mem::take(&mut self.sync_queue),
                    core::mem::take(&mut self.acl_queue),
                ];
                let in_flight = self.current.take();
                for msg in in_flight.into_iter().chain(queues.into_iter().flatten()) {
                    self.discard(msg, io);
                }
                self.tx_state = TxState::Idle;
                self.acl_trash = false;
                self.sync_trash = false;
                self.adv_filter.reset();
                self.flow = HostFlowControl::new();
            }
            InitType::Reset => info!("HCI reset"),
        }
        self.cmd_credits = self.config.nb_cmd_pkts as i8;
    }

    // ── Accessors ────────────────────────────────────────────

    pub fn config(&self) -> &HciConfig {
        &self.config
    }

    pub fn tx_state(&self) -> TxState {
        self.tx_state
    }

    pub fn cmd_credits(&self) -> i8 {
        self.cmd_credits
    }

    /// Message currently in flight.
    pub fn current(&self) -> Option<&Message> {
        self.current.as_ref()
    }

    /// Queued messages per queue: (control, ACL, SYNC).
    pub fn queue_lens(&self) -> (usize, usize, usize) {
        (self.tx_queue.len(), self.acl_queue.len(), self.sync_queue.len())
    }

    pub fn adv_filter(&self) -> &AdvReportFilter {
        &self.adv_filter
    }

    pub fn flow(&self) -> &HostFlowControl {
        &self.flow
    }

    // ── Command credits ──────────────────────────────────────

    /// Take one command credit; `false` when the Host overran its credits.
    pub(super) fn consume_credit(&mut self) -> bool {
        self.cmd_credits = self.cmd_credits.saturating_sub(1);
        self.cmd_credits >= 0
    }

    fn restore_credit(&mut self) {
        if self.cmd_credits < self.config.nb_cmd_pkts as i8 {
            self.cmd_credits += 1;
        }
    }

    // ── Host flow control ────────────────────────────────────

    /// Set Controller To Host Flow Control.  Returns the HCI status.
    pub fn set_flow_control_mode(&mut self, value: u8) -> u8 {
        self.flow.set_mode(value)
    }

    /// Host Buffer Size.  Returns the HCI status.
    pub fn host_buffer_size(
        &mut self,
        acl_pkt_len: u16,
        sync_pkt_len: u8,
        nb_acl_pkts: u16,
        nb_sync_pkts: u16,
    ) -> u8 {
        self.flow
            .host_buffer_size(acl_pkt_len, sync_pkt_len, nb_acl_pkts, nb_sync_pkts)
    }

    /// Host Number Of Completed Packets: give credits back, then resume
    /// transmission of any data held back for lack of them.
    pub fn host_completed_packets(&mut self, entries: &[(u16, u16)], io: &mut impl HciIo) -> Result<()> {
        for &(conhdl, count) in entries {
            if conhdl & self.config.bt_sync_conhdl_mask != 0 {
                self.flow.sync_completed(count);
            } else {
                self.flow.acl_completed(count);
            }
        }
        self.trigger(io)
    }

    // ── Transmit path ────────────────────────────────────────

    /// Queue `msg` for transmission and start sending if idle.
    pub fn tl_send(&mut self, msg: Message, io: &mut impl HciIo) -> Result<()> {
        match msg.kind {
            MsgKind::AclData if self.config.acl_enabled => self.acl_queue.push_back(msg),
            MsgKind::SyncData if self.config.sync_enabled => self.sync_queue.push_back(msg),
            MsgKind::AclData | MsgKind::SyncData => {
                let kind = msg.kind;
                self.discard(msg, io);
                warn!("{kind:?} traffic disabled");
                return Err(self.fault(Fault::MisroutedKind));
            }
            _ => {
                if !self.adv_filter.admit(&msg) {
                    MessagePort::free(io, msg);
                    return Ok(());
                }
                self.tx_queue.push_back(msg);
            }
        }
        self.trigger(io)
    }

    /// Completion of the frame in flight.
    pub fn tx_done(&mut self, io: &mut impl HciIo) -> Result<()> {
        let done = self.finish_current(io);
        let next = self.tx_start(io);
        done.and(next)
    }

    fn trigger(&mut self, io: &mut impl HciIo) -> Result<()> {
        if self.tx_state == TxState::Idle {
            self.tx_start(io)
        } else {
            Ok(())
        }
    }

    fn next_message(&mut self) -> Option<Message> {
        if let Some(msg) = self.tx_queue.pop_front() {
            return Some(msg);
        }
        if self.config.sync_enabled && self.flow.sync_available() {
            if let Some(msg) = self.sync_queue.pop_front() {
                return Some(msg);
            }
        }
        if self.config.acl_enabled && self.flow.acl_available() {
            return self.acl_queue.pop_front();
        }
        None
    }

    fn tx_start(&mut self, io: &mut impl HciIo) -> Result<()> {
        let mut first_fault = None;

        while self.tx_state == TxState::Idle {
            let Some(mut msg) = self.next_message() else {
                break;
            };

            if matches!(msg.kind, MsgKind::CmdCmpEvt | MsgKind::CmdStatEvt) {
                self.restore_credit();
            }

            let ptype = match self.build(&mut msg) {
                Ok(ptype) => ptype,
                Err(fault) => {
                    let err = self.fault(fault);
                    first_fault.get_or_insert(err);
                    if let Err(err) = self.complete(msg, io) {
                        first_fault.get_or_insert(err);
                    }
                    continue;
                }
            };

            debug!("tx {:?} 0x{:04X} ({} bytes)", msg.kind, msg.id, msg.frame().len());
            let written = io.write(ptype, msg.frame());
            self.current = Some(msg);
            self.tx_state = TxState::Ongoing;

            if let Err(e) = written {
                warn!("transport write failed: {e:?}");
                if let Err(err) = self.finish_current(io) {
                    first_fault.get_or_insert(err);
                }
            }
        }

        first_fault.map_or(Ok(()), Err)
    }

    fn finish_current(&mut self, io: &mut impl HciIo) -> Result<()> {
        let Some(msg) = self.current.take() else {
            return Err(self.fault(Fault::NothingInFlight));
        };
        self.tx_state = TxState::Idle;
        self.complete(msg, io)
    }

    /// Release everything `msg` holds once it has left the transmit path.
    fn complete(&mut self, mut msg: Message, io: &mut impl HciIo) -> Result<()> {
        let adv = self.adv_filter.on_transmit(&msg);

        match msg.kind {
            MsgKind::AclData => {
                self.release_data(&mut msg, io);
                self.flow.acl_sent();
            }
            MsgKind::SyncData => {
                self.release_data(&mut msg, io);
                self.flow.sync_sent();
            }
            _ => {}
        }
        MessagePort::free(io, msg);
        adv.map_err(|f| self.fault(f))
    }

    fn release_data(&self, msg: &mut Message, io: &mut impl HciIo) {
        let conhdl = msg.conhdl();
        if let Some(buf) = msg.take_data() {
            if let Origin::Pool(_, token) = buf.origin {
                let pool = if self.config.is_ble_handle(conhdl) {
                    Pool::Ble
                } else {
                    Pool::Bt
                };
                io.free_buf(pool, token);
            }
        }
    }

    /// Drop a message without sending it.
    fn discard(&self, mut msg: Message, io: &mut impl HciIo) {
        self.release_data(&mut msg, io);
        MessagePort::free(io, msg);
    }

    pub(super) fn fault(&self, fault: Fault) -> Error {
        error!("HCI fault: {fault}");
        Error::Fault(fault)
    }

    // ── Frame builders ───────────────────────────────────────

    fn build(&self, msg: &mut Message) -> core::result::Result<PacketType, Fault> {
        match msg.kind {
            MsgKind::CmdCmpEvt => self.build_cc(msg).map(|()| PacketType::Event),
            MsgKind::CmdStatEvt => self.build_cs(msg).map(|()| PacketType::Event),
            MsgKind::Event => build_event(msg).map(|()| PacketType::Event),
            MsgKind::LeEvent => {
                build_sub_event(msg, evt::LE_META, registry::find_le_event).map(|()| PacketType::Event)
            }
            MsgKind::DbgEvent => {
                build_sub_event(msg, evt::DBG_META, registry::find_debug_event).map(|()| PacketType::Event)
            }
            MsgKind::AclData => build_acl(msg).map(|()| PacketType::Acl),
            MsgKind::SyncData => build_sync(msg).map(|()| PacketType::Sync),
            MsgKind::Command => build_command(msg).map(|()| PacketType::Command),
        }
    }

    fn credit_byte(&self) -> u8 {
        self.cmd_credits.max(0) as u8
    }

    /// `0E len credit opcode return-parameters`
    fn build_cc(&self, msg: &mut Message) -> core::result::Result<(), Fault> {
        let opcode = msg.id;
        match registry::find_command(opcode) {
            Some(desc) => {
                if !msg.params().is_empty() {
                    if let Some(reply) = desc.reply {
                        pack_in_place(msg, reply)?;
                    }
                }
            }
            None if opcode != op::NO_OPERATION => {
                msg.resize_params(1);
                msg.params_mut()[0] = status::UNKNOWN_HCI_COMMAND;
            }
            None => return Err(Fault::NopCompletion),
        }

        let len = param_len_byte(opcode, CC_EVT_HDR_PARLEN + msg.params().len())?;
        let credit = self.credit_byte();
        let (hdr, _) = msg.split_mut();
        hdr[0] = evt::CMD_CMP;
        hdr[1] = len;
        hdr[2] = credit;
        hdr[3..5].copy_from_slice(&opcode.to_le_bytes());
        Ok(())
    }

    /// `0F 04 status credit opcode`
    fn build_cs(&self, msg: &mut Message) -> core::result::Result<(), Fault> {
        let opcode = msg.id;
        msg.resize_params(CS_EVT_PARLEN);
        let credit = self.credit_byte();
        let (hdr, params) = msg.split_mut();
        params[1] = credit;
        params[2..4].copy_from_slice(&opcode.to_le_bytes());
        hdr[0] = evt::CMD_STATUS;
        hdr[1] = CS_EVT_PARLEN as u8;
        Ok(())
    }
}

/// Pack the parameters of `msg` over themselves.
fn pack_in_place(msg: &mut Message, format: Format) -> core::result::Result<usize, Fault> {
    let id = msg.id;
    let len = codec::packed_size(format, msg.params()).map_err(|err| Fault::PackFailed { id, err })?;
    if len > msg.params().len() {
        return Err(Fault::PackedLengthGrew { id });
    }

    let mut scratch: heapless::Vec<u8, MAX_PARAM_SIZE> = heapless::Vec::new();
    scratch.resize(len, 0).map_err(|()| Fault::PackFailed {
        id,
        err: CodecError::OutputBufferOverflow,
    })?;
    let n = codec::pack(format, &mut scratch, msg.params()).map_err(|err| Fault::PackFailed { id, err })?;

    msg.params_mut()[..n].copy_from_slice(&scratch[..n]);
    msg.truncate_params(n);
    Ok(n)
}

fn pack_optional(msg: &mut Message, format: Option<Format>) -> core::result::Result<usize, Fault> {
    match format {
        Some(format) => pack_in_place(msg, format),
        None if msg.params().is_empty() => Ok(0),
        None => Err(Fault::PackFailed {
            id: msg.id,
            err: CodecError::UnsupportedFormat,
        }),
    }
}

fn param_len_byte(id: u16, len: usize) -> core::result::Result<u8, Fault> {
    u8::try_from(len).map_err(|_| Fault::PackFailed {
        id,
        err: CodecError::OutputBufferOverflow,
    })
}

/// `code len parameters`
fn build_event(msg: &mut Message) -> core::result::Result<(), Fault> {
    let code = u8::try_from(msg.id).map_err(|_| Fault::UnknownEvent(0xFF))?;
    let desc = registry::find_event(code).ok_or(Fault::UnknownEvent(code))?;
    let len = pack_optional(msg, desc.format)?;
    let len = param_len_byte(msg.id, len)?;
    let (hdr, _) = msg.split_mut();
    hdr[0] = code;
    hdr[1] = len;
    Ok(())
}

/// `meta-code len subcode parameters`
fn build_sub_event(
    msg: &mut Message,
    code: u8,
    find: fn(u8) -> Option<&'static super::descriptor::EventDesc>,
) -> core::result::Result<(), Fault> {
    let subcode = msg.params().first().copied().unwrap_or_default();
    let desc = find(subcode).ok_or(Fault::UnknownSubEvent { code, subcode })?;
    let len = pack_optional(msg, desc.format)?;
    let len = param_len_byte(msg.id, len)?;
    let (hdr, _) = msg.split_mut();
    hdr[0] = code;
    hdr[1] = len;
    Ok(())
}

/// `handle+flags (2) length (2) payload`
fn build_acl(msg: &mut Message) -> core::result::Result<(), Fault> {
    let hdl_flags = msg.id;
    let buf = msg.data_buffer_mut().ok_or(Fault::MisroutedKind)?;
    let len = u16::try_from(buf.payload().len()).map_err(|_| Fault::PackFailed {
        id: hdl_flags,
        err: CodecError::OutputBufferOverflow,
    })?;
    let hdr = buf.header_mut();
    hdr[0..2].copy_from_slice(&hdl_flags.to_le_bytes());
    hdr[2..4].copy_from_slice(&len.to_le_bytes());
    Ok(())
}

/// `handle+flags (2) length (1) payload`
fn build_sync(msg: &mut Message) -> core::result::Result<(), Fault> {
    let hdl_flags = msg.id;
    let buf = msg.data_buffer_mut().ok_or(Fault::MisroutedKind)?;
    let len = param_len_byte(hdl_flags, buf.payload().len())?;
    let hdr = buf.header_mut();
    hdr[0..2].copy_from_slice(&hdl_flags.to_le_bytes());
    hdr[2] = len;
    Ok(())
}

/// `opcode (2) len parameters`, Host side.
fn build_command(msg: &mut Message) -> core::result::Result<(), Fault> {
    let opcode = msg.id;
    let desc = registry::find_command(opcode).ok_or(Fault::UnknownCommand(opcode))?;
    let len = pack_optional(msg, desc.request)?;
    let len = param_len_byte(opcode, len)?;
    let (hdr, _) = msg.split_mut();
    hdr[0..2].copy_from_slice(&opcode.to_le_bytes());
    hdr[2] = len;
    Ok(())
}
