//! Receive and dispatch path.
//!
//! Inbound HCI traffic is turned into internal messages and delivered to
//! the task that owns it.
//!
//! ```text
//!   Controller role                      Host role
//!   ───────────────                      ─────────
//!   command  ──▶ LM / LB / LLM / LLC     event ──▶ GAPM / GAPC / L2CC
//!   ACL data ──▶ LLC / LC / LB           ACL   ──▶ L2CC
//!   SYNC     ──▶ LC
//! ```
//!
//! Anything the peer gets wrong is answered on the wire (commands) or
//! dropped with a warning (events); only internal inconsistencies surface
//! as [`Error`](crate::error::Error).

use log::{debug, warn};

use super::codec::{self, fields::first_u16_offset};
use super::consts::{
    ACL_HDR_LEN, BD_ADDR_LEN, BroadcastFlag, CC_EVT_HDR_PARLEN, CS_EVT_PARLEN, HDL_MASK,
    SYNC_HDR_LEN, acl_header_fields, evt, link_type, status,
};
use super::descriptor::{CommandDesc, EventDesc, Field, Format, HlClass, LlClass};
use super::msg::{DataBuffer, Dest, Message, MsgKind, Origin, Pool};
use super::ports::{BufferPools, HciIo, HostLinks, LinkDirectory, MessagePort};
use super::registry;
use super::tl::HciTl;
use crate::error::{CodecError, Fault, Result};

/// Where accepted ACL data goes and how large it may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AclTarget {
    dest: Dest,
    pool: Pool,
    max_len: u16,
}

impl HciTl {
    // ── Controller role: commands ────────────────────────────

    /// A complete command arrived from the Host.
    ///
    /// Every command is answered: either it reaches its destination task,
    /// which replies later, or a rejection is queued right away.
    pub fn command_received(&mut self, opcode: u16, payload: &[u8], io: &mut impl HciIo) -> Result<()> {
        debug!("rx cmd 0x{opcode:04X} ({} bytes)", payload.len());
        let has_credit = self.consume_credit();

        let Some(desc) = registry::find_command(opcode) else {
            warn!("unknown command 0x{opcode:04X}");
            return self.reject(None, opcode, status::UNKNOWN_HCI_COMMAND, None, io);
        };
        if !has_credit {
            warn!("command 0x{opcode:04X} beyond credits");
            return self.reject(Some(desc), opcode, status::MEMORY_CAPACITY_EXCEEDED, None, io);
        }

        let dest = match self.command_dest(desc, payload, &*io) {
            Ok(dest) => dest,
            Err(error) => return self.reject(Some(desc), opcode, error, Some(payload), io),
        };

        let len = match codec::unpacked_size_opt(desc.request, payload) {
            Ok(len) => len,
            // Parameters sent to a parameterless command are ignored.
            Err(CodecError::UnsupportedFormat) if desc.request.is_none() => 0,
            Err(err) => {
                warn!("command 0x{opcode:04X} malformed: {err}");
                return self.reject(Some(desc), opcode, status::INVALID_HCI_PARAMETERS, None, io);
            }
        };

        let Some(mut msg) = io.alloc(MsgKind::Command, opcode, dest, len) else {
            return self.reject(Some(desc), opcode, status::MEMORY_CAPACITY_EXCEEDED, None, io);
        };
        if let Some(format) = desc.request.filter(|_| len > 0) {
            if let Err(err) = codec::unpack(format, msg.params_mut(), payload) {
                MessagePort::free(io, msg);
                return Err(self.fault(Fault::PackFailed { id: opcode, err }));
            }
        }

        debug!("cmd 0x{opcode:04X} -> {dest:?}");
        io.send(msg);
        Ok(())
    }

    /// A command arrived whose parameters were longer than its opcode
    /// accepts; the transport skipped them.
    ///
    /// It still costs a credit and is answered with invalid parameters.
    pub fn command_too_long(&mut self, opcode: u16, io: &mut impl HciIo) -> Result<()> {
        let has_credit = self.consume_credit();
        let Some(desc) = registry::find_command(opcode) else {
            warn!("unknown command 0x{opcode:04X}");
            return self.reject(None, opcode, status::UNKNOWN_HCI_COMMAND, None, io);
        };
        let error = if has_credit {
            status::INVALID_HCI_PARAMETERS
        } else {
            status::MEMORY_CAPACITY_EXCEEDED
        };
        self.reject(Some(desc), opcode, error, None, io)
    }

    /// Destination task of a command, or the status to reject it with.
    ///
    /// A payload too short to hold the handle or address cannot name a
    /// link, so it gets unknown connection rather than invalid parameters.
    fn command_dest(&self, desc: &CommandDesc, payload: &[u8], io: &impl HciIo) -> core::result::Result<Dest, u8> {
        match desc.route.ll {
            LlClass::BtMng | LlClass::Mng => Ok(Dest::Lm),
            LlClass::BtBcst => Ok(Dest::Lb),
            LlClass::BleMng => Ok(Dest::Llm),
            LlClass::BleIso => Ok(Dest::Lli),
            LlClass::Dbg => Ok(Dest::Dbg),
            LlClass::Ctrl | LlClass::BleCtrl | LlClass::BtCtrlConhdl => {
                let conhdl = read_u16(payload, 0).ok_or(status::UNKNOWN_CONNECTION_ID)?;
                self.link_dest(conhdl, io).ok_or(status::UNKNOWN_CONNECTION_ID)
            }
            LlClass::BtCtrlBdAddr => {
                let addr: &[u8; BD_ADDR_LEN] = payload
                    .get(..BD_ADDR_LEN)
                    .and_then(|a| a.try_into().ok())
                    .ok_or(status::UNKNOWN_CONNECTION_ID)?;
                io.bt_link_by_addr(addr)
                    .map(Dest::Lc)
                    .ok_or(status::UNKNOWN_CONNECTION_ID)
            }
        }
    }

    /// Link controller of an active BLE or BT link.
    fn link_dest(&self, conhdl: u16, io: &impl LinkDirectory) -> Option<Dest> {
        if self.config.is_ble_handle(conhdl) {
            if let Some(idx) = io.ble_link(conhdl) {
                return Some(Dest::Llc(idx));
            }
        }
        let acl_hdl = conhdl & !self.config.bt_sync_conhdl_mask;
        if self.config.is_bt_acl_handle(acl_hdl) {
            return io.bt_link(acl_hdl).map(Dest::Lc);
        }
        None
    }

    /// Queue the rejection of a command.
    ///
    /// Commands answered by command complete get their full return
    /// parameter block with `error` as status; the handle or address the
    /// Host sent is echoed back when the reply carries one.  Commands
    /// answered by command status get a command status.
    fn reject(
        &mut self,
        desc: Option<&CommandDesc>,
        opcode: u16,
        error: u8,
        payload: Option<&[u8]>,
        io: &mut impl HciIo,
    ) -> Result<()> {
        warn!("reject 0x{opcode:04X}: status 0x{error:02X}");

        let msg = match desc.map(|d| d.reply) {
            None => Message::with_params(MsgKind::CmdCmpEvt, opcode, Dest::Hci, &[error]),
            Some(None) => Message::command_status(opcode, error),
            Some(Some(reply)) => {
                let len = codec::internal_capacity(reply)
                    .map_err(|err| self.fault(Fault::PackFailed { id: opcode, err }))?;
                let mut msg = Message::new(MsgKind::CmdCmpEvt, opcode, Dest::Hci, len);
                let params = msg.params_mut();
                if let Some(st) = params.first_mut() {
                    *st = error;
                }
                if let (Some(fields), Some(payload)) = (reply.fields(), payload) {
                    echo_identifier(fields, payload, params);
                }
                msg
            }
        };
        self.tl_send(msg, io)
    }

    // ── Controller role: ACL data ────────────────────────────

    fn acl_target(&self, hdl_flags: u16, io: &impl LinkDirectory) -> Option<AclTarget> {
        let (conhdl, _, bc) = acl_header_fields(hdl_flags);
        match bc {
            BroadcastFlag::PointToPoint if self.config.is_ble_handle(conhdl) => {
                let idx = u8::try_from(conhdl).ok()?;
                Some(AclTarget {
                    dest: Dest::Llc(idx),
                    pool: Pool::Ble,
                    max_len: self.config.ble_max_octets,
                })
            }
            BroadcastFlag::ActiveSlaveBroadcast => Some(AclTarget {
                dest: Dest::Lb,
                pool: Pool::Bt,
                max_len: self.config.bt_acl_max_len,
            }),
            BroadcastFlag::PointToPoint if self.config.is_bt_acl_handle(conhdl) => {
                io.bt_link(conhdl).map(|idx| AclTarget {
                    dest: Dest::Lc(idx),
                    pool: Pool::Bt,
                    max_len: self.config.bt_acl_max_len,
                })
            }
            _ => None,
        }
    }

    /// An ACL header arrived from the Host; provide storage for its payload.
    ///
    /// `None` means the header is unacceptable (unknown link or oversize
    /// payload) and the driver must skip the payload.  When the pool is
    /// empty the Host is told with a data-buffer-overflow event and the
    /// payload lands in a trash buffer.
    pub fn acl_tx_data_alloc(
        &mut self,
        hdl_flags: u16,
        len: u16,
        io: &mut impl HciIo,
    ) -> Result<Option<DataBuffer>> {
        let Some(target) = self.acl_target(hdl_flags, &*io) else {
            warn!("ACL 0x{hdl_flags:04X}: no link");
            return Ok(None);
        };
        if len > target.max_len {
            warn!("ACL 0x{hdl_flags:04X}: {len} bytes over {}", target.max_len);
            return Ok(None);
        }

        if let Some(token) = io.alloc_buf(target.pool) {
            return Ok(Some(DataBuffer::new(
                Origin::Pool(target.pool, token),
                ACL_HDR_LEN,
                usize::from(len),
            )));
        }

        warn!("ACL pool empty, payload to trash");
        self.acl_trash = true;
        self.buffer_overflow(link_type::ACL, io)?;
        Ok(Some(DataBuffer::new(Origin::Trash, ACL_HDR_LEN, usize::from(len))))
    }

    /// The ACL payload allocated by [`acl_tx_data_alloc`](Self::acl_tx_data_alloc)
    /// is complete.
    pub fn acl_tx_data_received(&mut self, hdl_flags: u16, buf: DataBuffer, io: &mut impl HciIo) -> Result<()> {
        if buf.is_trash() {
            self.acl_trash = false;
            debug!("ACL 0x{hdl_flags:04X} discarded");
            return Ok(());
        }

        match self.acl_target(hdl_flags, &*io) {
            Some(target) => {
                io.send(Message::data(MsgKind::AclData, hdl_flags, target.dest, buf));
                Ok(())
            }
            None => {
                // Link went away between header and payload.
                warn!("ACL 0x{hdl_flags:04X}: link lost");
                release(buf, io);
                Ok(())
            }
        }
    }

    // ── Controller role: synchronous data ────────────────────

    /// Link controller owning a synchronous handle.
    fn sync_dest(&self, hdl_flags: u16, io: &impl LinkDirectory) -> Option<Dest> {
        let conhdl = hdl_flags & HDL_MASK;
        let mask = self.config.bt_sync_conhdl_mask;
        if !self.config.sync_enabled || conhdl & mask == 0 {
            return None;
        }
        let acl_hdl = conhdl & !mask;
        if !self.config.is_bt_acl_handle(acl_hdl) {
            return None;
        }
        io.bt_link(acl_hdl).map(Dest::Lc)
    }

    /// A SYNC header arrived from the Host.
    ///
    /// Always provides storage: payloads for unknown links or beyond the
    /// configured length go to a trash buffer.
    pub fn sync_tx_data_alloc(&mut self, hdl_flags: u16, len: u8, io: &mut impl HciIo) -> Result<DataBuffer> {
        let len_ok = len <= self.config.sync_max_len;
        if len_ok && self.sync_dest(hdl_flags, &*io).is_some() {
            if let Some(token) = io.alloc_buf(Pool::Bt) {
                return Ok(DataBuffer::new(Origin::Pool(Pool::Bt, token), SYNC_HDR_LEN, usize::from(len)));
            }
            warn!("SYNC pool empty, payload to trash");
            self.buffer_overflow(link_type::SYNC, io)?;
        } else {
            warn!("SYNC 0x{hdl_flags:04X}: no link or {len} bytes too long");
        }
        self.sync_trash = true;
        Ok(DataBuffer::new(Origin::Trash, SYNC_HDR_LEN, usize::from(len)))
    }

    pub fn sync_tx_data_received(&mut self, hdl_flags: u16, buf: DataBuffer, io: &mut impl HciIo) -> Result<()> {
        if buf.is_trash() {
            self.sync_trash = false;
            debug!("SYNC 0x{hdl_flags:04X} discarded");
            return Ok(());
        }
        match self.sync_dest(hdl_flags, &*io) {
            Some(dest) => io.send(Message::data(MsgKind::SyncData, hdl_flags, dest, buf)),
            None => {
                warn!("SYNC 0x{hdl_flags:04X}: link lost");
                release(buf, io);
            }
        }
        Ok(())
    }

    fn buffer_overflow(&mut self, link: u8, io: &mut impl HciIo) -> Result<()> {
        let evt = Message::with_params(MsgKind::Event, u16::from(evt::DATA_BUF_OVFLW), Dest::Hci, &[link]);
        self.tl_send(evt, io)
    }

    /// Payload in a trash buffer is being received.
    pub fn acl_trash(&self) -> bool {
        self.acl_trash
    }

    pub fn sync_trash(&self) -> bool {
        self.sync_trash
    }

    // ── Host role ────────────────────────────────────────────

    /// Queue a command towards the Controller.
    ///
    /// `params` are in internal layout.  `src_idx` is the issuing
    /// connection; a connection command answered by command status
    /// remembers it so the status can be routed back.
    pub fn send_command(&mut self, opcode: u16, params: &[u8], src_idx: Option<u8>, io: &mut impl HciIo) -> Result<()> {
        let Some(desc) = registry::find_command(opcode) else {
            return Err(self.fault(Fault::UnknownCommand(opcode)));
        };

        let mut msg = Message::with_params(MsgKind::Command, opcode, Dest::Hci, params);
        msg.src_idx = src_idx;
        if let Some(idx) = src_idx {
            if desc.reply.is_none() && is_conn_class(desc.route.hl) {
                io.record_pending_status(idx, opcode);
            }
        }
        self.tl_send(msg, io)
    }

    /// A complete event arrived from the Controller.
    pub fn event_received(&mut self, code: u8, payload: &[u8], io: &mut impl HciIo) -> Result<()> {
        debug!("rx evt 0x{code:02X} ({} bytes)", payload.len());
        match code {
            evt::CMD_CMP => self.host_command_complete(payload, io),
            evt::CMD_STATUS => self.host_command_status(payload, io),
            evt::LE_META | evt::DBG_META => {
                let Some(&subcode) = payload.first() else {
                    warn!("empty meta event 0x{code:02X}");
                    return Ok(());
                };
                let (kind, desc) = if code == evt::LE_META {
                    (MsgKind::LeEvent, registry::find_le_event(subcode))
                } else {
                    (MsgKind::DbgEvent, registry::find_debug_event(subcode))
                };
                match desc {
                    Some(desc) => self.host_event(kind, u16::from(subcode), desc, payload, io),
                    None => {
                        warn!("unknown sub-event 0x{code:02X}/0x{subcode:02X} dropped");
                        Ok(())
                    }
                }
            }
            _ => match registry::find_event(code) {
                Some(desc) => self.host_event(MsgKind::Event, u16::from(code), desc, payload, io),
                None => {
                    warn!("unknown event 0x{code:02X} dropped");
                    Ok(())
                }
            },
        }
    }

    fn host_event(
        &mut self,
        kind: MsgKind,
        id: u16,
        desc: &EventDesc,
        payload: &[u8],
        io: &mut impl HciIo,
    ) -> Result<()> {
        let Some(msg) = unpack_inbound(kind, id, desc.format, payload, io) else {
            return Ok(());
        };
        // Connection events for an unknown handle go to the manager.
        let dest = host_conn_dest(desc.hl, desc.format, msg.params(), &*io).unwrap_or(Dest::Gapm);
        deliver(msg, dest, io);
        Ok(())
    }

    fn host_command_complete(&mut self, payload: &[u8], io: &mut impl HciIo) -> Result<()> {
        let Some(opcode) = read_u16(payload, 1) else {
            warn!("short command complete dropped");
            return Ok(());
        };
        let Some(desc) = registry::find_command(opcode) else {
            warn!("command complete for unknown 0x{opcode:04X} dropped");
            return Ok(());
        };

        let ret = &payload[CC_EVT_HDR_PARLEN..];
        let Some(msg) = unpack_inbound(MsgKind::CmdCmpEvt, opcode, desc.reply, ret, io) else {
            return Ok(());
        };

        let dest = match desc.route.hl {
            HlClass::Mng | HlClass::None => Some(Dest::Gapm),
            hl => host_conn_dest(hl, desc.reply, msg.params(), &*io).or_else(|| {
                io.take_pending_status(opcode).map(|idx| conn_dest(hl, idx))
            }),
        };
        match dest {
            Some(dest) => deliver(msg, dest, io),
            None => {
                warn!("command complete 0x{opcode:04X}: no connection");
                MessagePort::free(io, msg);
            }
        }
        Ok(())
    }

    fn host_command_status(&mut self, payload: &[u8], io: &mut impl HciIo) -> Result<()> {
        let opcode = match read_u16(payload, 2) {
            Some(opcode) if payload.len() == CS_EVT_PARLEN => opcode,
            _ => {
                warn!("malformed command status dropped");
                return Ok(());
            }
        };
        let Some(desc) = registry::find_command(opcode) else {
            warn!("command status for unknown 0x{opcode:04X} dropped");
            return Ok(());
        };

        let dest = match desc.route.hl {
            HlClass::Mng | HlClass::None => Some(Dest::Gapm),
            hl => io.take_pending_status(opcode).map(|idx| conn_dest(hl, idx)),
        };
        let Some(dest) = dest else {
            warn!("command status 0x{opcode:04X}: no pending connection");
            return Ok(());
        };
        let Some(mut msg) = io.alloc(MsgKind::CmdStatEvt, opcode, dest, CS_EVT_PARLEN) else {
            warn!("no memory for command status 0x{opcode:04X}");
            return Ok(());
        };
        msg.params_mut().copy_from_slice(payload);
        deliver(msg, dest, io);
        Ok(())
    }

    // ── Host role: ACL data ──────────────────────────────────

    /// Storage for an inbound ACL payload.
    pub fn acl_rx_data_alloc(&self, hdl_flags: u16, len: u16) -> DataBuffer {
        debug!("rx ACL 0x{hdl_flags:04X} ({len} bytes)");
        DataBuffer::new(Origin::Heap, ACL_HDR_LEN, usize::from(len))
    }

    pub fn acl_rx_data_received(&mut self, hdl_flags: u16, buf: DataBuffer, io: &mut impl HciIo) -> Result<()> {
        let conhdl = hdl_flags & HDL_MASK;
        match io.link_by_handle(conhdl) {
            Some(idx) => io.send(Message::data(MsgKind::AclData, hdl_flags, Dest::L2cc(idx), buf)),
            None => warn!("rx ACL for unknown handle 0x{conhdl:04X} dropped"),
        }
        Ok(())
    }
}

// ── Helpers ──────────────────────────────────────────────────

fn read_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    match bytes.get(offset..offset + 2) {
        Some(&[lo, hi]) => Some(u16::from_le_bytes([lo, hi])),
        _ => None,
    }
}

/// Copy the handle or address the Host sent into a rejection's return
/// parameters.
fn echo_identifier(reply: &[Field], payload: &[u8], params: &mut [u8]) {
    let n = match reply {
        [Field::U8, Field::U16, ..] => 2,
        [Field::U8, Field::Bytes(BD_ADDR_LEN), ..] => BD_ADDR_LEN,
        _ => return,
    };
    let offset = match reply[1] {
        Field::U16 => first_u16_offset(reply),
        _ => Some(1),
    };
    if let (Some(off), Some(src)) = (offset, payload.get(..n)) {
        if let Some(dst) = params.get_mut(off..off + n) {
            dst.copy_from_slice(src);
        }
    }
}

fn release(buf: DataBuffer, io: &mut impl BufferPools) {
    if let Origin::Pool(pool, token) = buf.origin {
        io.free_buf(pool, token);
    }
}

fn is_conn_class(hl: HlClass) -> bool {
    matches!(hl, HlClass::Ctrl | HlClass::Data | HlClass::Iso)
}

fn conn_dest(hl: HlClass, idx: u8) -> Dest {
    match hl {
        HlClass::Data => Dest::L2cc(idx),
        HlClass::Iso => Dest::Iso(idx),
        _ => Dest::Gapc(idx),
    }
}

/// Internal offset of the connection handle a Host-side consumer is keyed
/// on.
fn handle_offset(format: Format) -> Option<usize> {
    match format {
        Format::Fields(fields) => first_u16_offset(fields),
        Format::Special(special) => special.host_handle_offset(),
    }
}

fn host_conn_dest(hl: HlClass, format: Option<Format>, params: &[u8], io: &impl HostLinks) -> Option<Dest> {
    if !is_conn_class(hl) {
        return None;
    }
    let conhdl = read_u16(params, handle_offset(format?)?)?;
    io.link_by_handle(conhdl).map(|idx| conn_dest(hl, idx))
}

/// Allocate and unpack an inbound event.  Malformed input is dropped.
fn unpack_inbound(
    kind: MsgKind,
    id: u16,
    format: Option<Format>,
    wire: &[u8],
    io: &mut impl MessagePort,
) -> Option<Message> {
    let len = match codec::unpacked_size_opt(format, wire) {
        Ok(len) => len,
        Err(err) => {
            warn!("{kind:?} 0x{id:04X} malformed ({err}), dropped");
            return None;
        }
    };
    let Some(mut msg) = io.alloc(kind, id, Dest::Gapm, len) else {
        warn!("no memory for {kind:?} 0x{id:04X}");
        return None;
    };
    if let Some(format) = format.filter(|_| len > 0) {
        if let Err(err) = codec::unpack(format, msg.params_mut(), wire) {
            warn!("{kind:?} 0x{id:04X} unpack failed ({err})");
            io.free(msg);
            return None;
        }
    }
    Some(msg)
}

fn deliver(mut msg: Message, dest: Dest, io: &mut impl MessagePort) {
    debug!("{:?} 0x{:04X} -> {dest:?}", msg.kind, msg.id);
    msg.dest = dest;
    io.send(msg);
}
