//! HCI wire constants: packet types, opcode groups, opcodes, event codes and
//! error codes.
//!
//! Opcodes are built from a 6-bit group (OGF) and a 10-bit command field
//! (OCF):
//!
//! ```text
//!  15          10 9                      0
//! ┌──────────────┬────────────────────────┐
//! │     OGF      │          OCF           │
//! └──────────────┴────────────────────────┘
//! ```

/// H4 packet type indicator, the first byte of every transport frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
    Command = 0x01,
    Acl = 0x02,
    Sync = 0x03,
    Event = 0x04,
}

impl TryFrom<u8> for PacketType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0x01 => Ok(Self::Command),
            0x02 => Ok(Self::Acl),
            0x03 => Ok(Self::Sync),
            0x04 => Ok(Self::Event),
            other => Err(other),
        }
    }
}

// ── Header sizes ─────────────────────────────────────────────

pub const CMD_HDR_LEN: usize = 3;
pub const EVT_HDR_LEN: usize = 2;
pub const ACL_HDR_LEN: usize = 4;
pub const SYNC_HDR_LEN: usize = 3;

/// Return-parameter prefix of a command-complete event (credit + opcode).
pub const CC_EVT_HDR_PARLEN: usize = 3;
/// Fixed parameter length of a command-status event.
pub const CS_EVT_PARLEN: usize = 4;

/// Largest command or event parameter block.
pub const MAX_PARAM_SIZE: usize = 255;

pub const BD_ADDR_LEN: usize = 6;
pub const KEY_LEN: usize = 16;
pub const DEV_CLASS_LEN: usize = 3;

// ── Opcode composition ───────────────────────────────────────

pub const fn opcode(ogf: u8, ocf: u16) -> u16 {
    ((ogf as u16) << 10) | (ocf & 0x03FF)
}

pub const fn ogf_of(opcode: u16) -> u8 {
    (opcode >> 10) as u8
}

pub const fn ocf_of(opcode: u16) -> u16 {
    opcode & 0x03FF
}

/// Opcode groups.
pub mod ogf {
    pub const LK_CNTL: u8 = 0x01;
    pub const LK_POL: u8 = 0x02;
    pub const CNTLR_BB: u8 = 0x03;
    pub const INFO_PAR: u8 = 0x04;
    pub const STAT_PAR: u8 = 0x05;
    pub const TEST: u8 = 0x06;
    pub const LE_CNTLR: u8 = 0x08;
    pub const VS: u8 = 0x3F;
}

/// Command opcodes.
pub mod op {
    use super::{ogf, opcode};

    pub const NO_OPERATION: u16 = 0x0000;

    // Link control
    pub const INQ: u16 = opcode(ogf::LK_CNTL, 0x01);
    pub const INQ_CANCEL: u16 = opcode(ogf::LK_CNTL, 0x02);
    pub const CREATE_CON: u16 = opcode(ogf::LK_CNTL, 0x05);
    pub const DISCONNECT: u16 = opcode(ogf::LK_CNTL, 0x06);
    pub const CREATE_CON_CANCEL: u16 = opcode(ogf::LK_CNTL, 0x08);
    pub const ACCEPT_CON_REQ: u16 = opcode(ogf::LK_CNTL, 0x09);
    pub const REJECT_CON_REQ: u16 = opcode(ogf::LK_CNTL, 0x0A);
    pub const LK_REQ_REPLY: u16 = opcode(ogf::LK_CNTL, 0x0B);
    pub const LK_REQ_NEG_REPLY: u16 = opcode(ogf::LK_CNTL, 0x0C);
    pub const PIN_CODE_REQ_REPLY: u16 = opcode(ogf::LK_CNTL, 0x0D);
    pub const AUTH_REQ: u16 = opcode(ogf::LK_CNTL, 0x11);
    pub const SET_CON_ENC: u16 = opcode(ogf::LK_CNTL, 0x13);
    pub const MASTER_LK: u16 = opcode(ogf::LK_CNTL, 0x17);
    pub const REM_NAME_REQ: u16 = opcode(ogf::LK_CNTL, 0x19);
    pub const RD_REM_SUPP_FEATS: u16 = opcode(ogf::LK_CNTL, 0x1B);
    pub const RD_REM_VER_INFO: u16 = opcode(ogf::LK_CNTL, 0x1D);
    pub const RD_CLK_OFF: u16 = opcode(ogf::LK_CNTL, 0x1F);
    pub const SETUP_SYNC_CON: u16 = opcode(ogf::LK_CNTL, 0x28);
    pub const ACCEPT_SYNC_CON_REQ: u16 = opcode(ogf::LK_CNTL, 0x29);
    pub const IO_CAP_REQ_REPLY: u16 = opcode(ogf::LK_CNTL, 0x2B);
    pub const USER_CFM_REQ_REPLY: u16 = opcode(ogf::LK_CNTL, 0x2C);
    pub const USER_PASSKEY_REQ_REPLY: u16 = opcode(ogf::LK_CNTL, 0x2E);

    // Link policy
    pub const SNIFF_MODE: u16 = opcode(ogf::LK_POL, 0x03);
    pub const EXIT_SNIFF_MODE: u16 = opcode(ogf::LK_POL, 0x04);
    pub const ROLE_DISCOVERY: u16 = opcode(ogf::LK_POL, 0x09);
    pub const SWITCH_ROLE: u16 = opcode(ogf::LK_POL, 0x0B);
    pub const RD_LINK_POL_STG: u16 = opcode(ogf::LK_POL, 0x0C);
    pub const WR_LINK_POL_STG: u16 = opcode(ogf::LK_POL, 0x0D);
    pub const RD_DFT_LINK_POL_STG: u16 = opcode(ogf::LK_POL, 0x0E);
    pub const WR_DFT_LINK_POL_STG: u16 = opcode(ogf::LK_POL, 0x0F);

    // Controller & baseband
    pub const SET_EVT_MASK: u16 = opcode(ogf::CNTLR_BB, 0x01);
    pub const RESET: u16 = opcode(ogf::CNTLR_BB, 0x03);
    pub const SET_EVT_FILTER: u16 = opcode(ogf::CNTLR_BB, 0x05);
    pub const WR_STORED_LK: u16 = opcode(ogf::CNTLR_BB, 0x11);
    pub const DEL_STORED_LK: u16 = opcode(ogf::CNTLR_BB, 0x12);
    pub const WR_LOCAL_NAME: u16 = opcode(ogf::CNTLR_BB, 0x13);
    pub const RD_LOCAL_NAME: u16 = opcode(ogf::CNTLR_BB, 0x14);
    pub const WR_SCAN_EN: u16 = opcode(ogf::CNTLR_BB, 0x1A);
    pub const RD_TX_PWR_LVL: u16 = opcode(ogf::CNTLR_BB, 0x2D);
    pub const SET_CTRL_TO_HOST_FLOW_CTRL: u16 = opcode(ogf::CNTLR_BB, 0x31);
    pub const HOST_BUF_SIZE: u16 = opcode(ogf::CNTLR_BB, 0x33);
    pub const HOST_NB_CMP_PKTS: u16 = opcode(ogf::CNTLR_BB, 0x35);
    pub const WR_CURR_IAC_LAP: u16 = opcode(ogf::CNTLR_BB, 0x3A);
    pub const SET_AFH_HOST_CH_CLASS: u16 = opcode(ogf::CNTLR_BB, 0x3F);
    pub const WR_EXT_INQ_RSP: u16 = opcode(ogf::CNTLR_BB, 0x52);
    pub const SET_EVT_MASK_PAGE_2: u16 = opcode(ogf::CNTLR_BB, 0x63);
    pub const SET_EXTERNAL_FRAME_CONFIG: u16 = opcode(ogf::CNTLR_BB, 0x6F);
    pub const SET_MWS_SCAN_FREQ_TABLE: u16 = opcode(ogf::CNTLR_BB, 0x72);
    pub const SET_MWS_PATTERN_CONFIG: u16 = opcode(ogf::CNTLR_BB, 0x73);
    pub const RD_AUTH_PAYL_TO: u16 = opcode(ogf::CNTLR_BB, 0x7B);
    pub const WR_AUTH_PAYL_TO: u16 = opcode(ogf::CNTLR_BB, 0x7C);

    // Informational
    pub const RD_LOCAL_VER_INFO: u16 = opcode(ogf::INFO_PAR, 0x01);
    pub const RD_LOCAL_SUPP_CMDS: u16 = opcode(ogf::INFO_PAR, 0x02);
    pub const RD_LOCAL_SUPP_FEATS: u16 = opcode(ogf::INFO_PAR, 0x03);
    pub const RD_BUF_SIZE: u16 = opcode(ogf::INFO_PAR, 0x05);
    pub const RD_BD_ADDR: u16 = opcode(ogf::INFO_PAR, 0x09);
    pub const GET_MWS_TRANSPORT_LAYER_CONFIG: u16 = opcode(ogf::INFO_PAR, 0x0C);

    // Status
    pub const RD_FAIL_CONTACT_CNT: u16 = opcode(ogf::STAT_PAR, 0x01);
    pub const RD_LINK_QUAL: u16 = opcode(ogf::STAT_PAR, 0x03);
    pub const RD_RSSI: u16 = opcode(ogf::STAT_PAR, 0x05);
    pub const RD_AFH_CH_MAP: u16 = opcode(ogf::STAT_PAR, 0x06);
    pub const RD_CLK: u16 = opcode(ogf::STAT_PAR, 0x07);
    pub const RD_ENC_KEY_SIZE: u16 = opcode(ogf::STAT_PAR, 0x08);

    // Testing
    pub const RD_LOOPBACK_MODE: u16 = opcode(ogf::TEST, 0x01);
    pub const WR_LOOPBACK_MODE: u16 = opcode(ogf::TEST, 0x02);
    pub const EN_DUT_MODE: u16 = opcode(ogf::TEST, 0x03);
    pub const WR_SP_DBG_MODE: u16 = opcode(ogf::TEST, 0x04);

    // LE controller
    pub const LE_SET_EVT_MASK: u16 = opcode(ogf::LE_CNTLR, 0x01);
    pub const LE_RD_BUFF_SIZE: u16 = opcode(ogf::LE_CNTLR, 0x02);
    pub const LE_RD_LOCAL_SUPP_FEATS: u16 = opcode(ogf::LE_CNTLR, 0x03);
    pub const LE_SET_RAND_ADDR: u16 = opcode(ogf::LE_CNTLR, 0x05);
    pub const LE_SET_ADV_PARAM: u16 = opcode(ogf::LE_CNTLR, 0x06);
    pub const LE_RD_ADV_CHNL_TX_PW: u16 = opcode(ogf::LE_CNTLR, 0x07);
    pub const LE_SET_ADV_DATA: u16 = opcode(ogf::LE_CNTLR, 0x08);
    pub const LE_SET_SCAN_RSP_DATA: u16 = opcode(ogf::LE_CNTLR, 0x09);
    pub const LE_SET_ADV_EN: u16 = opcode(ogf::LE_CNTLR, 0x0A);
    pub const LE_SET_SCAN_PARAM: u16 = opcode(ogf::LE_CNTLR, 0x0B);
    pub const LE_SET_SCAN_EN: u16 = opcode(ogf::LE_CNTLR, 0x0C);
    pub const LE_CREATE_CON: u16 = opcode(ogf::LE_CNTLR, 0x0D);
    pub const LE_CREATE_CON_CANCEL: u16 = opcode(ogf::LE_CNTLR, 0x0E);
    pub const LE_RD_WLST_SIZE: u16 = opcode(ogf::LE_CNTLR, 0x0F);
    pub const LE_CLEAR_WLST: u16 = opcode(ogf::LE_CNTLR, 0x10);
    pub const LE_ADD_DEV_TO_WLST: u16 = opcode(ogf::LE_CNTLR, 0x11);
    pub const LE_CON_UPDATE: u16 = opcode(ogf::LE_CNTLR, 0x13);
    pub const LE_SET_HOST_CH_CLASS: u16 = opcode(ogf::LE_CNTLR, 0x14);
    pub const LE_RD_CHNL_MAP: u16 = opcode(ogf::LE_CNTLR, 0x15);
    pub const LE_RD_REM_FEATS: u16 = opcode(ogf::LE_CNTLR, 0x16);
    pub const LE_ENC: u16 = opcode(ogf::LE_CNTLR, 0x17);
    pub const LE_RAND: u16 = opcode(ogf::LE_CNTLR, 0x18);
    pub const LE_START_ENC: u16 = opcode(ogf::LE_CNTLR, 0x19);
    pub const LE_LTK_REQ_REPLY: u16 = opcode(ogf::LE_CNTLR, 0x1A);
    pub const LE_LTK_REQ_NEG_REPLY: u16 = opcode(ogf::LE_CNTLR, 0x1B);
    pub const LE_RD_SUPP_STATES: u16 = opcode(ogf::LE_CNTLR, 0x1C);
    pub const LE_SET_DATA_LEN: u16 = opcode(ogf::LE_CNTLR, 0x22);
    pub const LE_SET_EXT_ADV_PARAM: u16 = opcode(ogf::LE_CNTLR, 0x36);
    pub const LE_SET_EXT_ADV_DATA: u16 = opcode(ogf::LE_CNTLR, 0x37);
    pub const LE_SET_EXT_SCAN_RSP_DATA: u16 = opcode(ogf::LE_CNTLR, 0x38);
    pub const LE_SET_EXT_ADV_EN: u16 = opcode(ogf::LE_CNTLR, 0x39);
    pub const LE_SET_PER_ADV_DATA: u16 = opcode(ogf::LE_CNTLR, 0x3F);
    pub const LE_SET_EXT_SCAN_PARAM: u16 = opcode(ogf::LE_CNTLR, 0x41);
    pub const LE_SET_EXT_SCAN_EN: u16 = opcode(ogf::LE_CNTLR, 0x42);
    pub const LE_EXT_CREATE_CON: u16 = opcode(ogf::LE_CNTLR, 0x43);
    pub const LE_PER_ADV_CREATE_SYNC: u16 = opcode(ogf::LE_CNTLR, 0x44);
    pub const LE_PER_ADV_CREATE_SYNC_CANCEL: u16 = opcode(ogf::LE_CNTLR, 0x45);
    pub const LE_PER_ADV_TERM_SYNC: u16 = opcode(ogf::LE_CNTLR, 0x46);
    pub const LE_RD_ISO_TX_SYNC: u16 = opcode(ogf::LE_CNTLR, 0x61);

    // Vendor specific (debug)
    pub const DBG_RD_MEM: u16 = opcode(ogf::VS, 0x01);
    pub const DBG_WR_MEM: u16 = opcode(ogf::VS, 0x02);
    pub const DBG_DEL_PAR: u16 = opcode(ogf::VS, 0x03);
    pub const DBG_ID_FLASH: u16 = opcode(ogf::VS, 0x05);
    pub const DBG_ER_FLASH: u16 = opcode(ogf::VS, 0x06);
    pub const DBG_WR_FLASH: u16 = opcode(ogf::VS, 0x07);
    pub const DBG_RD_FLASH: u16 = opcode(ogf::VS, 0x08);
    pub const DBG_RD_PAR: u16 = opcode(ogf::VS, 0x09);
    pub const DBG_WR_PAR: u16 = opcode(ogf::VS, 0x0A);
    pub const DBG_PLF_RESET: u16 = opcode(ogf::VS, 0x11);
    pub const DBG_RD_MEM_INFO: u16 = opcode(ogf::VS, 0x12);
    pub const DBG_IQGEN_CFG: u16 = opcode(ogf::VS, 0x60);
}

/// Event codes.
pub mod evt {
    pub const INQ_CMP: u8 = 0x01;
    pub const CON_CMP: u8 = 0x03;
    pub const CON_REQ: u8 = 0x04;
    pub const DISC_CMP: u8 = 0x05;
    pub const AUTH_CMP: u8 = 0x06;
    pub const REM_NAME_REQ_CMP: u8 = 0x07;
    pub const ENC_CHG: u8 = 0x08;
    pub const RD_REM_VER_INFO_CMP: u8 = 0x0C;
    pub const CMD_CMP: u8 = 0x0E;
    pub const CMD_STATUS: u8 = 0x0F;
    pub const HW_ERR: u8 = 0x10;
    pub const NB_CMP_PKTS: u8 = 0x13;
    pub const LK_REQ: u8 = 0x17;
    pub const DATA_BUF_OVFLW: u8 = 0x1A;
    pub const ENC_KEY_REFRESH_CMP: u8 = 0x30;
    pub const LE_META: u8 = 0x3E;
    pub const AUTH_PAYL_TO_EXP: u8 = 0x57;
    pub const DBG_META: u8 = 0xFF;
}

/// LE meta sub-event codes (first parameter byte of an LE meta event).
pub mod le_evt {
    pub const CON_CMP: u8 = 0x01;
    pub const ADV_REPORT: u8 = 0x02;
    pub const CON_UPDATE_CMP: u8 = 0x03;
    pub const RD_REM_FEATS_CMP: u8 = 0x04;
    pub const LTK_REQUEST: u8 = 0x05;
    pub const REM_CON_PARAM_REQ: u8 = 0x06;
    pub const DATA_LEN_CHG: u8 = 0x07;
    pub const ENH_CON_CMP: u8 = 0x0A;
    pub const DIR_ADV_REPORT: u8 = 0x0B;
    pub const PHY_UPD_CMP: u8 = 0x0C;
    pub const EXT_ADV_REPORT: u8 = 0x0D;
    pub const PER_ADV_SYNC_EST: u8 = 0x0E;
    pub const PER_ADV_REPORT: u8 = 0x0F;
    pub const PER_ADV_SYNC_LOST: u8 = 0x10;
    pub const SCAN_TIMEOUT: u8 = 0x11;
    pub const ADV_SET_TERMINATED: u8 = 0x12;
    pub const SCAN_REQ_RCVD: u8 = 0x13;
    pub const CH_SEL_ALGO: u8 = 0x14;
    pub const CONLESS_IQ_REPORT: u8 = 0x15;
    pub const CON_IQ_REPORT: u8 = 0x16;
}

/// Debug meta sub-event codes.
pub mod dbg_evt {
    pub const ASSERT: u8 = 0x02;
}

/// HCI status / error codes used by this layer.
pub mod status {
    pub const SUCCESS: u8 = 0x00;
    pub const UNKNOWN_HCI_COMMAND: u8 = 0x01;
    pub const UNKNOWN_CONNECTION_ID: u8 = 0x02;
    pub const MEMORY_CAPACITY_EXCEEDED: u8 = 0x07;
    pub const INVALID_HCI_PARAMETERS: u8 = 0x12;
}

/// Link type carried by the data-buffer-overflow event.
pub mod link_type {
    pub const SYNC: u8 = 0x00;
    pub const ACL: u8 = 0x01;
}

// ── Data header fields ───────────────────────────────────────

/// Connection handle bits of an ACL/SYNC header.
pub const HDL_MASK: u16 = 0x0FFF;

/// Broadcast flag of an ACL header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastFlag {
    PointToPoint,
    ActiveSlaveBroadcast,
    Reserved,
}

/// Split an ACL handle+flags word into (handle, packet-boundary, broadcast).
pub const fn acl_header_fields(hdl_flags: u16) -> (u16, u8, BroadcastFlag) {
    let bc = match (hdl_flags >> 14) & 0x03 {
        0 => BroadcastFlag::PointToPoint,
        1 => BroadcastFlag::ActiveSlaveBroadcast,
        _ => BroadcastFlag::Reserved,
    };
    (hdl_flags & HDL_MASK, ((hdl_flags >> 12) & 0x03) as u8, bc)
}

// ── Advertising report fields ────────────────────────────────

/// Data-status bits inside an extended report's event type.
pub const ADV_EVT_DATA_STATUS_MASK: u16 = 0x0060;
pub const ADV_EVT_DATA_STATUS_SHIFT: u16 = 5;
/// Data status: incomplete, more fragments follow.
pub const DATA_STATUS_INCOMPLETE: u8 = 0x01;

/// PHY value reported for LE 1M.
pub const PHY_1MBPS_VALUE: u8 = 0x01;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_split_roundtrip() {
        assert_eq!(op::RESET, 0x0C03);
        assert_eq!(op::LE_SET_ADV_PARAM, 0x2006);
        assert_eq!(ogf_of(op::DISCONNECT), ogf::LK_CNTL);
        assert_eq!(ocf_of(op::DISCONNECT), 0x06);
        assert_eq!(ogf_of(0xFFFF), 0x3F);
    }

    #[test]
    fn acl_header_split() {
        let (hdl, pb, bc) = acl_header_fields(0x2081);
        assert_eq!(hdl, 0x081);
        assert_eq!(pb, 0b10);
        assert_eq!(bc, BroadcastFlag::PointToPoint);

        let (_, _, bc) = acl_header_fields(0x4000);
        assert_eq!(bc, BroadcastFlag::ActiveSlaveBroadcast);
    }

    #[test]
    fn packet_type_from_byte() {
        assert_eq!(PacketType::try_from(0x04), Ok(PacketType::Event));
        assert_eq!(PacketType::try_from(0x09), Err(0x09));
    }
}
