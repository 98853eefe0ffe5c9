//! Descriptor registry: every command and event this layer understands.
//!
//! Commands are grouped per OGF; a lookup picks the group, then scans it
//! by OCF.  Events, LE meta sub-events and debug meta sub-events live in
//! three flat tables keyed by one byte.

use super::codec::special::Special;
use super::consts::{dbg_evt, evt, le_evt, ocf_of, ogf, ogf_of, op, BD_ADDR_LEN, KEY_LEN, MAX_PARAM_SIZE};
use super::descriptor::Field::{Bytes, Counted, U8, U16, U32};
use super::descriptor::{CommandDesc, EventDesc, Field, Format, HlClass, LlClass};

const fn f(fields: &'static [Field]) -> Option<Format> {
    Some(Format::Fields(fields))
}

const fn sp(special: Special) -> Option<Format> {
    Some(Format::Special(special))
}

const NONE: Option<Format> = None;

const ADDR: Field = Bytes(BD_ADDR_LEN);
const KEY: Field = Bytes(KEY_LEN);

// Common return parameter blocks
const ST: Option<Format> = f(&[U8]);
const ST_HDL: Option<Format> = f(&[U8, U16]);
const ST_ADDR: Option<Format> = f(&[U8, ADDR]);
const ST_DBG_DATA: Option<Format> = f(&[U8, Counted(128)]);

use HlClass as H;
use LlClass as L;

const fn cmd(
    opcode: u16,
    ll: LlClass,
    hl: HlClass,
    request: Option<Format>,
    reply: Option<Format>,
) -> CommandDesc {
    CommandDesc::new(opcode, ll, hl, request, reply)
}

// ───────────────────────────────────────────────────────────────
// Command tables
// ───────────────────────────────────────────────────────────────

static LK_CNTL: &[CommandDesc] = &[
    cmd(op::INQ, L::BtMng, H::Mng, f(&[Bytes(3), U8, U8]), NONE),
    cmd(op::INQ_CANCEL, L::BtMng, H::Mng, NONE, ST),
    cmd(op::CREATE_CON, L::BtMng, H::Mng, f(&[ADDR, U16, U8, U8, U16, U8]), NONE),
    cmd(op::DISCONNECT, L::Ctrl, H::Ctrl, f(&[U16, U8]), NONE),
    cmd(op::CREATE_CON_CANCEL, L::BtCtrlBdAddr, H::Mng, f(&[ADDR]), ST_ADDR),
    cmd(op::ACCEPT_CON_REQ, L::BtCtrlBdAddr, H::Mng, f(&[ADDR, U8]), NONE),
    cmd(op::REJECT_CON_REQ, L::BtCtrlBdAddr, H::Mng, f(&[ADDR, U8]), NONE),
    cmd(op::LK_REQ_REPLY, L::BtCtrlBdAddr, H::Mng, f(&[ADDR, KEY]), ST_ADDR),
    cmd(op::LK_REQ_NEG_REPLY, L::BtCtrlBdAddr, H::Mng, f(&[ADDR]), ST_ADDR),
    cmd(op::PIN_CODE_REQ_REPLY, L::BtCtrlBdAddr, H::Mng, f(&[ADDR, U8, KEY]), ST_ADDR),
    cmd(op::AUTH_REQ, L::BtCtrlConhdl, H::Ctrl, f(&[U16]), NONE),
    cmd(op::SET_CON_ENC, L::BtCtrlConhdl, H::Ctrl, f(&[U16, U8]), NONE),
    cmd(op::MASTER_LK, L::BtBcst, H::Mng, f(&[U8]), NONE),
    cmd(op::REM_NAME_REQ, L::BtMng, H::Mng, f(&[ADDR, U8, U8, U16]), NONE),
    cmd(op::RD_REM_SUPP_FEATS, L::BtCtrlConhdl, H::Ctrl, f(&[U16]), NONE),
    cmd(op::RD_REM_VER_INFO, L::Ctrl, H::Ctrl, f(&[U16]), NONE),
    cmd(op::RD_CLK_OFF, L::BtCtrlConhdl, H::Ctrl, f(&[U16]), NONE),
    cmd(op::SETUP_SYNC_CON, L::BtCtrlConhdl, H::Ctrl, f(&[U16, U32, U32, U16, U16, U8, U16]), NONE),
    cmd(op::ACCEPT_SYNC_CON_REQ, L::BtCtrlBdAddr, H::Mng, f(&[ADDR, U32, U32, U16, U16, U8, U16]), NONE),
    cmd(op::IO_CAP_REQ_REPLY, L::BtCtrlBdAddr, H::Mng, f(&[ADDR, U8, U8, U8]), ST_ADDR),
    cmd(op::USER_CFM_REQ_REPLY, L::BtCtrlBdAddr, H::Mng, f(&[ADDR]), ST_ADDR),
    cmd(op::USER_PASSKEY_REQ_REPLY, L::BtCtrlBdAddr, H::Mng, f(&[ADDR, U32]), ST_ADDR),
];

static LK_POL: &[CommandDesc] = &[
    cmd(op::SNIFF_MODE, L::BtCtrlConhdl, H::Ctrl, f(&[U16, U16, U16, U16, U16]), NONE),
    cmd(op::EXIT_SNIFF_MODE, L::BtCtrlConhdl, H::Ctrl, f(&[U16]), NONE),
    cmd(op::ROLE_DISCOVERY, L::BtCtrlConhdl, H::Ctrl, f(&[U16]), f(&[U8, U16, U8])),
    cmd(op::SWITCH_ROLE, L::BtCtrlBdAddr, H::Mng, f(&[ADDR, U8]), NONE),
    cmd(op::RD_LINK_POL_STG, L::BtCtrlConhdl, H::Ctrl, f(&[U16]), f(&[U8, U16, U16])),
    cmd(op::WR_LINK_POL_STG, L::BtCtrlConhdl, H::Ctrl, f(&[U16, U16]), ST_HDL),
    cmd(op::RD_DFT_LINK_POL_STG, L::BtMng, H::Mng, NONE, f(&[U8, U16])),
    cmd(op::WR_DFT_LINK_POL_STG, L::BtMng, H::Mng, f(&[U16]), ST),
];

static CNTLR_BB: &[CommandDesc] = &[
    cmd(op::SET_EVT_MASK, L::Mng, H::Mng, f(&[Bytes(8)]), ST),
    cmd(op::RESET, L::Mng, H::Mng, NONE, ST),
    cmd(op::SET_EVT_FILTER, L::BtMng, H::Mng, sp(Special::SetEvtFilter), ST),
    cmd(op::WR_STORED_LK, L::BtMng, H::Mng, sp(Special::WrStoredLk), f(&[U8, U8])),
    cmd(op::DEL_STORED_LK, L::BtMng, H::Mng, f(&[ADDR, U8]), f(&[U8, U16])),
    cmd(op::WR_LOCAL_NAME, L::BtMng, H::Mng, f(&[Bytes(248)]), ST),
    cmd(op::RD_LOCAL_NAME, L::BtMng, H::Mng, NONE, f(&[U8, Bytes(248)])),
    cmd(op::WR_SCAN_EN, L::BtMng, H::Mng, f(&[U8]), ST),
    cmd(op::RD_TX_PWR_LVL, L::Ctrl, H::Ctrl, f(&[U16, U8]), f(&[U8, U16, U8])),
    cmd(op::SET_CTRL_TO_HOST_FLOW_CTRL, L::Mng, H::Mng, f(&[U8]), ST),
    cmd(op::HOST_BUF_SIZE, L::Mng, H::Mng, f(&[U16, U8, U16, U16]), ST),
    cmd(op::HOST_NB_CMP_PKTS, L::Mng, H::Mng, sp(Special::HostNbCmpPkts), NONE),
    cmd(op::WR_CURR_IAC_LAP, L::BtMng, H::Mng, sp(Special::WrCurrIacLap), ST),
    cmd(op::SET_AFH_HOST_CH_CLASS, L::BtMng, H::Mng, f(&[Bytes(10)]), ST),
    cmd(op::WR_EXT_INQ_RSP, L::BtMng, H::Mng, f(&[U8, Bytes(240)]), ST),
    cmd(op::SET_EVT_MASK_PAGE_2, L::Mng, H::Mng, f(&[Bytes(8)]), ST),
    cmd(op::SET_EXTERNAL_FRAME_CONFIG, L::BtMng, H::Mng, sp(Special::SetExtFrameConfig), ST),
    cmd(op::SET_MWS_SCAN_FREQ_TABLE, L::BtMng, H::Mng, sp(Special::MwsScanFreqTable), ST),
    cmd(op::SET_MWS_PATTERN_CONFIG, L::BtMng, H::Mng, sp(Special::MwsPatternConfig), ST),
    cmd(op::RD_AUTH_PAYL_TO, L::Ctrl, H::Ctrl, f(&[U16]), f(&[U8, U16, U16])),
    cmd(op::WR_AUTH_PAYL_TO, L::Ctrl, H::Ctrl, f(&[U16, U16]), ST_HDL),
];

static INFO_PAR: &[CommandDesc] = &[
    cmd(op::RD_LOCAL_VER_INFO, L::Mng, H::Mng, NONE, f(&[U8, U8, U16, U8, U16, U16])),
    cmd(op::RD_LOCAL_SUPP_CMDS, L::Mng, H::Mng, NONE, f(&[U8, Bytes(64)])),
    cmd(op::RD_LOCAL_SUPP_FEATS, L::Mng, H::Mng, NONE, f(&[U8, Bytes(8)])),
    cmd(op::RD_BUF_SIZE, L::BtMng, H::Mng, NONE, f(&[U8, U16, U8, U16, U16])),
    cmd(op::RD_BD_ADDR, L::Mng, H::Mng, NONE, ST_ADDR),
    cmd(op::GET_MWS_TRANSPORT_LAYER_CONFIG, L::BtMng, H::Mng, NONE, sp(Special::GetMwsTransportLayerConfigCmp)),
];

static STAT_PAR: &[CommandDesc] = &[
    cmd(op::RD_FAIL_CONTACT_CNT, L::BtCtrlConhdl, H::Ctrl, f(&[U16]), f(&[U8, U16, U16])),
    cmd(op::RD_LINK_QUAL, L::BtCtrlConhdl, H::Ctrl, f(&[U16]), f(&[U8, U16, U8])),
    cmd(op::RD_RSSI, L::Ctrl, H::Ctrl, f(&[U16]), f(&[U8, U16, U8])),
    cmd(op::RD_AFH_CH_MAP, L::BtCtrlConhdl, H::Ctrl, f(&[U16]), f(&[U8, U16, U8, Bytes(10)])),
    cmd(op::RD_CLK, L::BtMng, H::Mng, f(&[U16, U8]), f(&[U8, U16, U32, U16])),
    cmd(op::RD_ENC_KEY_SIZE, L::BtCtrlConhdl, H::Ctrl, f(&[U16]), f(&[U8, U16, U8])),
];

static TEST: &[CommandDesc] = &[
    cmd(op::RD_LOOPBACK_MODE, L::BtMng, H::Mng, NONE, f(&[U8, U8])),
    cmd(op::WR_LOOPBACK_MODE, L::BtMng, H::Mng, f(&[U8]), ST),
    cmd(op::EN_DUT_MODE, L::BtMng, H::Mng, NONE, ST),
    cmd(op::WR_SP_DBG_MODE, L::BtMng, H::Mng, f(&[U8]), ST),
];

static LE_CNTLR: &[CommandDesc] = &[
    cmd(op::LE_SET_EVT_MASK, L::BleMng, H::Mng, f(&[Bytes(8)]), ST),
    cmd(op::LE_RD_BUFF_SIZE, L::BleMng, H::Mng, NONE, f(&[U8, U16, U8])),
    cmd(op::LE_RD_LOCAL_SUPP_FEATS, L::BleMng, H::Mng, NONE, f(&[U8, Bytes(8)])),
    cmd(op::LE_SET_RAND_ADDR, L::BleMng, H::Mng, f(&[ADDR]), ST),
    cmd(op::LE_SET_ADV_PARAM, L::BleMng, H::Mng, f(&[U16, U16, U8, U8, U8, ADDR, U8, U8]), ST),
    cmd(op::LE_RD_ADV_CHNL_TX_PW, L::BleMng, H::Mng, NONE, f(&[U8, U8])),
    cmd(op::LE_SET_ADV_DATA, L::BleMng, H::Mng, f(&[U8, Bytes(31)]), ST),
    cmd(op::LE_SET_SCAN_RSP_DATA, L::BleMng, H::Mng, f(&[U8, Bytes(31)]), ST),
    cmd(op::LE_SET_ADV_EN, L::BleMng, H::Mng, f(&[U8]), ST),
    cmd(op::LE_SET_SCAN_PARAM, L::BleMng, H::Mng, f(&[U8, U16, U16, U8, U8]), ST),
    cmd(op::LE_SET_SCAN_EN, L::BleMng, H::Mng, f(&[U8, U8]), ST),
    cmd(
        op::LE_CREATE_CON,
        L::BleMng,
        H::Mng,
        f(&[U16, U16, U8, U8, ADDR, U8, U16, U16, U16, U16, U16, U16]),
        NONE,
    ),
    cmd(op::LE_CREATE_CON_CANCEL, L::BleMng, H::Mng, NONE, ST),
    cmd(op::LE_RD_WLST_SIZE, L::BleMng, H::Mng, NONE, f(&[U8, U8])),
    cmd(op::LE_CLEAR_WLST, L::BleMng, H::Mng, NONE, ST),
    cmd(op::LE_ADD_DEV_TO_WLST, L::BleMng, H::Mng, f(&[U8, ADDR]), ST),
    cmd(op::LE_CON_UPDATE, L::BleCtrl, H::Ctrl, f(&[U16, U16, U16, U16, U16, U16, U16]), NONE),
    cmd(op::LE_SET_HOST_CH_CLASS, L::BleMng, H::Mng, f(&[Bytes(5)]), ST),
    cmd(op::LE_RD_CHNL_MAP, L::BleCtrl, H::Ctrl, f(&[U16]), f(&[U8, U16, Bytes(5)])),
    cmd(op::LE_RD_REM_FEATS, L::BleCtrl, H::Ctrl, f(&[U16]), NONE),
    cmd(op::LE_ENC, L::BleMng, H::Mng, f(&[KEY, KEY]), f(&[U8, KEY])),
    cmd(op::LE_RAND, L::BleMng, H::Mng, NONE, f(&[U8, Bytes(8)])),
    cmd(op::LE_START_ENC, L::BleCtrl, H::Ctrl, f(&[U16, Bytes(8), U16, KEY]), NONE),
    cmd(op::LE_LTK_REQ_REPLY, L::BleCtrl, H::Ctrl, f(&[U16, KEY]), ST_HDL),
    cmd(op::LE_LTK_REQ_NEG_REPLY, L::BleCtrl, H::Ctrl, f(&[U16]), ST_HDL),
    cmd(op::LE_RD_SUPP_STATES, L::BleMng, H::Mng, NONE, f(&[U8, Bytes(8)])),
    cmd(op::LE_SET_DATA_LEN, L::BleCtrl, H::Ctrl, f(&[U16, U16, U16]), ST_HDL),
    cmd(
        op::LE_SET_EXT_ADV_PARAM,
        L::BleMng,
        H::Mng,
        f(&[U8, U16, Bytes(3), Bytes(3), U8, U8, U8, ADDR, U8, U8, U8, U8, U8, U8, U8]),
        f(&[U8, U8]),
    ),
    cmd(op::LE_SET_EXT_ADV_DATA, L::BleMng, H::Mng, f(&[U8, U8, U8, Counted(251)]), ST),
    cmd(op::LE_SET_EXT_SCAN_RSP_DATA, L::BleMng, H::Mng, f(&[U8, U8, U8, Counted(251)]), ST),
    cmd(op::LE_SET_EXT_ADV_EN, L::BleMng, H::Mng, sp(Special::LeSetExtAdvEn), ST),
    cmd(op::LE_SET_PER_ADV_DATA, L::BleMng, H::Mng, f(&[U8, U8, Counted(252)]), ST),
    cmd(op::LE_SET_EXT_SCAN_PARAM, L::BleMng, H::Mng, sp(Special::LeSetExtScanParam), ST),
    cmd(op::LE_SET_EXT_SCAN_EN, L::BleMng, H::Mng, f(&[U8, U8, U16, U16]), ST),
    cmd(op::LE_EXT_CREATE_CON, L::BleMng, H::Mng, sp(Special::LeExtCreateCon), NONE),
    cmd(op::LE_PER_ADV_CREATE_SYNC, L::BleMng, H::Mng, f(&[U8, U8, U8, ADDR, U16, U16, U8]), NONE),
    cmd(op::LE_PER_ADV_CREATE_SYNC_CANCEL, L::BleMng, H::Mng, NONE, ST),
    cmd(op::LE_PER_ADV_TERM_SYNC, L::BleMng, H::Mng, f(&[U16]), ST),
    cmd(op::LE_RD_ISO_TX_SYNC, L::BleIso, H::Iso, f(&[U16]), f(&[U8, U16, U16, U32, Bytes(3)])),
];

static VS: &[CommandDesc] = &[
    cmd(op::DBG_RD_MEM, L::Dbg, H::Mng, f(&[U32, U8, U8]), ST_DBG_DATA),
    cmd(op::DBG_WR_MEM, L::Dbg, H::Mng, f(&[U32, U8, Counted(128)]), ST),
    cmd(op::DBG_DEL_PAR, L::Dbg, H::Mng, f(&[U16]), ST),
    cmd(op::DBG_ID_FLASH, L::Dbg, H::Mng, NONE, f(&[U8, U8])),
    cmd(op::DBG_ER_FLASH, L::Dbg, H::Mng, f(&[U8, U32, U32]), ST),
    cmd(op::DBG_WR_FLASH, L::Dbg, H::Mng, f(&[U8, U32, Counted(128)]), ST),
    cmd(op::DBG_RD_FLASH, L::Dbg, H::Mng, f(&[U8, U32, U8]), ST_DBG_DATA),
    cmd(op::DBG_RD_PAR, L::Dbg, H::Mng, f(&[U16]), ST_DBG_DATA),
    cmd(op::DBG_WR_PAR, L::Dbg, H::Mng, f(&[U16, Counted(128)]), ST),
    cmd(op::DBG_PLF_RESET, L::Dbg, H::Mng, f(&[U8]), ST),
    cmd(op::DBG_RD_MEM_INFO, L::Dbg, H::Mng, NONE, f(&[U8, U16, U16, U16, U32])),
    cmd(op::DBG_IQGEN_CFG, L::Dbg, H::Mng, sp(Special::DbgIqgenCfg), ST),
];

struct Group {
    ogf: u8,
    commands: &'static [CommandDesc],
}

static GROUPS: &[Group] = &[
    Group { ogf: ogf::LK_CNTL, commands: LK_CNTL },
    Group { ogf: ogf::LK_POL, commands: LK_POL },
    Group { ogf: ogf::CNTLR_BB, commands: CNTLR_BB },
    Group { ogf: ogf::INFO_PAR, commands: INFO_PAR },
    Group { ogf: ogf::STAT_PAR, commands: STAT_PAR },
    Group { ogf: ogf::TEST, commands: TEST },
    Group { ogf: ogf::LE_CNTLR, commands: LE_CNTLR },
    Group { ogf: ogf::VS, commands: VS },
];

// ───────────────────────────────────────────────────────────────
// Event tables
// ───────────────────────────────────────────────────────────────

const fn event(code: u8, hl: HlClass, format: Option<Format>) -> EventDesc {
    EventDesc::new(code, hl, format)
}

static EVENTS: &[EventDesc] = &[
    event(evt::INQ_CMP, H::Mng, f(&[U8])),
    event(evt::CON_CMP, H::Mng, f(&[U8, U16, ADDR, U8, U8])),
    event(evt::CON_REQ, H::Mng, f(&[ADDR, Bytes(3), U8])),
    event(evt::DISC_CMP, H::Ctrl, f(&[U8, U16, U8])),
    event(evt::AUTH_CMP, H::Ctrl, f(&[U8, U16])),
    event(evt::REM_NAME_REQ_CMP, H::Mng, f(&[U8, ADDR, Bytes(248)])),
    event(evt::ENC_CHG, H::Ctrl, f(&[U8, U16, U8])),
    event(evt::RD_REM_VER_INFO_CMP, H::Ctrl, f(&[U8, U16, U8, U16, U16])),
    event(evt::HW_ERR, H::Mng, f(&[U8])),
    event(evt::NB_CMP_PKTS, H::Data, f(&[U8, U16, U16])),
    event(evt::LK_REQ, H::Mng, f(&[ADDR])),
    event(evt::DATA_BUF_OVFLW, H::Mng, f(&[U8])),
    event(evt::ENC_KEY_REFRESH_CMP, H::Ctrl, f(&[U8, U16])),
    event(evt::AUTH_PAYL_TO_EXP, H::Ctrl, f(&[U16])),
];

static LE_EVENTS: &[EventDesc] = &[
    event(le_evt::CON_CMP, H::Mng, f(&[U8, U8, U16, U8, U8, ADDR, U16, U16, U16, U8])),
    event(le_evt::ADV_REPORT, H::Mng, sp(Special::LeAdvReport)),
    event(le_evt::CON_UPDATE_CMP, H::Ctrl, f(&[U8, U8, U16, U16, U16, U16])),
    event(le_evt::RD_REM_FEATS_CMP, H::Ctrl, f(&[U8, U8, U16, Bytes(8)])),
    event(le_evt::LTK_REQUEST, H::Ctrl, f(&[U8, U16, Bytes(8), U16])),
    event(le_evt::REM_CON_PARAM_REQ, H::Ctrl, f(&[U8, U16, U16, U16, U16, U16])),
    event(le_evt::DATA_LEN_CHG, H::Ctrl, f(&[U8, U16, U16, U16, U16, U16])),
    event(
        le_evt::ENH_CON_CMP,
        H::Mng,
        f(&[U8, U8, U16, U8, U8, ADDR, ADDR, ADDR, U16, U16, U16, U8]),
    ),
    event(le_evt::DIR_ADV_REPORT, H::Mng, sp(Special::LeDirAdvReport)),
    event(le_evt::PHY_UPD_CMP, H::Ctrl, f(&[U8, U8, U16, U8, U8])),
    event(le_evt::EXT_ADV_REPORT, H::Mng, sp(Special::LeExtAdvReport)),
    event(le_evt::PER_ADV_SYNC_EST, H::Mng, f(&[U8, U8, U16, U8, U8, ADDR, U8, U16, U8])),
    event(le_evt::PER_ADV_REPORT, H::Mng, f(&[U8, U16, U8, U8, U8, U8, Counted(247)])),
    event(le_evt::PER_ADV_SYNC_LOST, H::Mng, f(&[U8, U16])),
    event(le_evt::SCAN_TIMEOUT, H::Mng, f(&[U8])),
    event(le_evt::ADV_SET_TERMINATED, H::Mng, f(&[U8, U8, U8, U16, U8])),
    event(le_evt::SCAN_REQ_RCVD, H::Mng, f(&[U8, U8, U8, ADDR])),
    event(le_evt::CH_SEL_ALGO, H::Ctrl, f(&[U8, U16, U8])),
    event(le_evt::CONLESS_IQ_REPORT, H::Mng, sp(Special::ConlessIqReport)),
    event(le_evt::CON_IQ_REPORT, H::Ctrl, sp(Special::ConIqReport)),
];

static DBG_EVENTS: &[EventDesc] = &[event(dbg_evt::ASSERT, H::Mng, sp(Special::DbgAssert))];

// ───────────────────────────────────────────────────────────────
// Lookups
// ───────────────────────────────────────────────────────────────

/// Descriptor of `opcode`, or `None` for a command this layer does not know.
pub fn find_command(opcode: u16) -> Option<&'static CommandDesc> {
    let group = GROUPS.iter().find(|g| g.ogf == ogf_of(opcode))?;
    let ocf = ocf_of(opcode);
    group.commands.iter().find(|d| ocf_of(d.opcode) == ocf)
}

pub fn find_event(code: u8) -> Option<&'static EventDesc> {
    EVENTS.iter().find(|d| d.code == code)
}

pub fn find_le_event(subcode: u8) -> Option<&'static EventDesc> {
    LE_EVENTS.iter().find(|d| d.code == subcode)
}

pub fn find_debug_event(subcode: u8) -> Option<&'static EventDesc> {
    DBG_EVENTS.iter().find(|d| d.code == subcode)
}

/// Parameter length bound for `opcode`; the HCI maximum when unknown.
///
/// Used by the transport reader to size its receive buffer before the
/// payload arrives.
pub fn max_param_size_for(opcode: u16) -> u8 {
    find_command(opcode)
        .map(|d| d.max_param_size)
        .and_then(|n| u8::try_from(n).ok())
        .unwrap_or(MAX_PARAM_SIZE as u8)
}

/// Every registered command, group by group.
pub fn commands() -> impl Iterator<Item = &'static CommandDesc> {
    GROUPS.iter().flat_map(|g| g.commands.iter())
}

/// Every registered event descriptor across the three event tables.
pub fn events() -> impl Iterator<Item = &'static EventDesc> {
    EVENTS.iter().chain(LE_EVENTS).chain(DBG_EVENTS)
}
