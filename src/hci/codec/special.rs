//! Hand-written codecs for parameter layouts a plain field list cannot
//! express, or that convert asymmetrically.
//!
//! Most variants still run the generic engine over a private layout; the
//! remainder walk the shared [`Cursor`] by hand.

use crate::error::CodecError;
use crate::hci::consts::{BD_ADDR_LEN, DEV_CLASS_LEN, KEY_LEN, MAX_PARAM_SIZE};
use crate::hci::descriptor::{Count, Field, fields_max_wire_size};

use super::Direction;
use super::fields::{Cursor, internal_size, walk};

/// Closed set of special codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    // Count-prefixed repeats
    HostNbCmpPkts,
    WrStoredLk,
    WrCurrIacLap,
    SetExtFrameConfig,
    MwsScanFreqTable,
    MwsPatternConfig,
    LeSetExtAdvEn,
    DbgIqgenCfg,

    // Bitmask repeats
    LeSetExtScanParam,
    LeExtCreateCon,

    // Conditional layout
    SetEvtFilter,

    // Nested counts
    GetMwsTransportLayerConfigCmp,

    // Controller-packed, Host-passthrough reports
    LeAdvReport,
    LeDirAdvReport,
    LeExtAdvReport,
    ConlessIqReport,
    ConIqReport,

    DbgAssert,
}

// ───────────────────────────────────────────────────────────────
// Layouts
// ───────────────────────────────────────────────────────────────

const fn prefixed(record: &'static [Field], max: usize) -> Field {
    Field::Repeat {
        count: Count::Prefix,
        record,
        max,
    }
}

const fn per_phy(record: &'static [Field], max: usize) -> Field {
    Field::Repeat {
        count: Count::PopCount,
        record,
        max,
    }
}

const HOST_NB_CMP_PKTS: &[Field] = &[prefixed(&[Field::U16, Field::U16], 7)];

const WR_STORED_LK: &[Field] = &[prefixed(
    &[Field::Bytes(BD_ADDR_LEN), Field::Bytes(KEY_LEN)],
    11,
)];

const WR_CURR_IAC_LAP: &[Field] = &[prefixed(&[Field::Bytes(3)], 84)];

const SET_EXT_FRAME_CONFIG: &[Field] = &[
    Field::U16,
    Field::U16,
    Field::U16,
    prefixed(&[Field::U16, Field::U8], 82),
];

const MWS_SCAN_FREQ_TABLE: &[Field] = &[prefixed(&[Field::U16, Field::U16], 63)];

const MWS_PATTERN_CONFIG: &[Field] = &[Field::U8, prefixed(&[Field::U16, Field::U8], 84)];

const LE_SET_EXT_ADV_EN: &[Field] = &[Field::U8, prefixed(&[Field::U8, Field::U16, Field::U8], 10)];

/// Own address type, filter policy, PHY mask → type, interval, window.
const LE_SET_EXT_SCAN_PARAM: &[Field] = &[
    Field::U8,
    Field::U8,
    per_phy(&[Field::U8, Field::U16, Field::U16], 2),
];

/// Filter policy, own/peer address type, peer address, PHY mask →
/// scan interval/window, interval min/max, latency, timeout, CE min/max.
const LE_EXT_CREATE_CON: &[Field] = &[
    Field::U8,
    Field::U8,
    Field::U8,
    Field::Bytes(BD_ADDR_LEN),
    per_phy(
        &[
            Field::U16,
            Field::U16,
            Field::U16,
            Field::U16,
            Field::U16,
            Field::U16,
            Field::U16,
            Field::U16,
        ],
        3,
    ),
];

const LE_ADV_REPORT: &[Field] = &[
    Field::U8,
    prefixed(
        &[
            Field::U8,
            Field::U8,
            Field::Bytes(BD_ADDR_LEN),
            Field::Counted(31),
            Field::U8,
        ],
        6,
    ),
];

const LE_DIR_ADV_REPORT: &[Field] = &[
    Field::U8,
    prefixed(
        &[
            Field::U8,
            Field::U8,
            Field::Bytes(BD_ADDR_LEN),
            Field::U8,
            Field::Bytes(BD_ADDR_LEN),
            Field::U8,
        ],
        15,
    ),
];

const LE_EXT_ADV_REPORT: &[Field] = &[
    Field::U8,
    prefixed(
        &[
            Field::U16, // event type
            Field::U8,  // address type
            Field::Bytes(BD_ADDR_LEN),
            Field::U8, // primary PHY
            Field::U8, // secondary PHY
            Field::U8, // SID
            Field::U8, // TX power
            Field::U8, // RSSI
            Field::U16,
            Field::U8,
            Field::Bytes(BD_ADDR_LEN),
            Field::Counted(229),
        ],
        1,
    ),
];

const CONLESS_IQ_REPORT: &[Field] = &[
    Field::U8,
    Field::U16,
    Field::U8,
    Field::U16,
    Field::U8,
    Field::U8,
    Field::U8,
    Field::U8,
    Field::U16,
    prefixed(&[Field::U8, Field::U8], 82),
];

const CON_IQ_REPORT: &[Field] = &[
    Field::U8,
    Field::U16,
    Field::U8,
    Field::U8,
    Field::U16,
    Field::U8,
    Field::U8,
    Field::U8,
    Field::U8,
    Field::U16,
    prefixed(&[Field::U8, Field::U8], 82),
];

const DBG_ASSERT_HEADER: &[Field] = &[Field::U8, Field::U8, Field::U32, Field::U32, Field::U32];

/// Internal offset of the first report's event type in an extended
/// advertising report.
pub const EXT_ADV_REPORT_EVT_TYPE_OFFSET: usize = 2;
/// Internal offset of the first report's primary PHY.
pub const EXT_ADV_REPORT_PHY_OFFSET: usize = 11;

const DBG_IQGEN_MAX_ANTENNA: usize = 16;
const DBG_IQGEN_MAX_WIRE: usize = 2 + 2 * DBG_IQGEN_MAX_ANTENNA;

const SET_EVT_FILTER_MAX: usize = 2 + 2 * DEV_CLASS_LEN + 1;

const MWS_MAX_TRANSPORTS: usize = 3;
const MWS_MAX_RATES: usize = 4;
const MWS_TRANSPORT_BASE: usize = 4;
const MWS_RATE_LEN: usize = 8;
const MWS_TRANSPORT_STRIDE: usize = 4 + MWS_MAX_RATES * MWS_RATE_LEN;
const MWS_INTERNAL_SIZE: usize = MWS_TRANSPORT_BASE + MWS_MAX_TRANSPORTS * MWS_TRANSPORT_STRIDE;
const MWS_MAX_WIRE: usize = 2 + MWS_MAX_TRANSPORTS * (2 + MWS_MAX_RATES * MWS_RATE_LEN);

const DBG_ASSERT_FILE_OFFSET: usize = 16;
const DBG_ASSERT_WIRE_HEADER: usize = 14;

impl Special {
    /// Field list for variants that reuse the generic engine; `None` for
    /// the hand-written walkers.
    pub const fn layout(self) -> Option<&'static [Field]> {
        match self {
            Self::HostNbCmpPkts => Some(HOST_NB_CMP_PKTS),
            Self::WrStoredLk => Some(WR_STORED_LK),
            Self::WrCurrIacLap => Some(WR_CURR_IAC_LAP),
            Self::SetExtFrameConfig => Some(SET_EXT_FRAME_CONFIG),
            Self::MwsScanFreqTable => Some(MWS_SCAN_FREQ_TABLE),
            Self::MwsPatternConfig => Some(MWS_PATTERN_CONFIG),
            Self::LeSetExtAdvEn => Some(LE_SET_EXT_ADV_EN),
            Self::LeSetExtScanParam => Some(LE_SET_EXT_SCAN_PARAM),
            Self::LeExtCreateCon => Some(LE_EXT_CREATE_CON),
            Self::LeAdvReport => Some(LE_ADV_REPORT),
            Self::LeDirAdvReport => Some(LE_DIR_ADV_REPORT),
            Self::LeExtAdvReport => Some(LE_EXT_ADV_REPORT),
            Self::ConlessIqReport => Some(CONLESS_IQ_REPORT),
            Self::ConIqReport => Some(CON_IQ_REPORT),
            Self::DbgIqgenCfg
            | Self::SetEvtFilter
            | Self::GetMwsTransportLayerConfigCmp
            | Self::DbgAssert => None,
        }
    }

    /// Reports are packed field by field but forwarded verbatim when a
    /// Host unpacks them.
    pub const fn is_report(self) -> bool {
        matches!(
            self,
            Self::LeAdvReport
                | Self::LeDirAdvReport
                | Self::LeExtAdvReport
                | Self::ConlessIqReport
                | Self::ConIqReport
        )
    }

    /// Largest wire encoding this codec produces or accepts.
    pub const fn max_wire_size(&self) -> usize {
        if self.is_report() {
            return MAX_PARAM_SIZE;
        }
        match *self {
            Self::DbgIqgenCfg => DBG_IQGEN_MAX_WIRE,
            Self::SetEvtFilter => SET_EVT_FILTER_MAX,
            Self::GetMwsTransportLayerConfigCmp => MWS_MAX_WIRE,
            Self::DbgAssert => MAX_PARAM_SIZE,
            other => match other.layout() {
                Some(layout) => fields_max_wire_size(layout),
                None => 0,
            },
        }
    }

    /// Offset of the connection handle in a Host-side (unpacked) parameter
    /// block.
    pub const fn host_handle_offset(self) -> Option<usize> {
        match self {
            // Passthrough: internal is the wire form, handle after subcode.
            Self::ConIqReport => Some(1),
            _ => None,
        }
    }

    fn static_size(self, dir: Direction) -> usize {
        if dir == Direction::Pack {
            return self.max_wire_size();
        }
        match self {
            _ if self.is_report() => MAX_PARAM_SIZE,
            Self::DbgIqgenCfg => DBG_IQGEN_MAX_WIRE,
            Self::SetEvtFilter => SET_EVT_FILTER_MAX,
            Self::GetMwsTransportLayerConfigCmp => MWS_INTERNAL_SIZE,
            Self::DbgAssert => DBG_ASSERT_FILE_OFFSET + (MAX_PARAM_SIZE - DBG_ASSERT_WIRE_HEADER) + 1,
            other => other.layout().map_or(0, internal_size),
        }
    }

    /// Same contract as [`super::Codec::transcode`].
    pub fn transcode(
        self,
        dir: Direction,
        out: Option<&mut [u8]>,
        input: Option<&[u8]>,
    ) -> Result<usize, CodecError> {
        let Some(input) = input else {
            return Ok(self.static_size(dir));
        };
        let mut cur = Cursor::new(dir, input, out);

        match self {
            // A Host only forwards reports to its upper layer.
            _ if self.is_report() && dir == Direction::Unpack => passthrough(&mut cur)?,
            Self::DbgIqgenCfg => dbg_iqgen_cfg(&mut cur)?,
            Self::SetEvtFilter => set_evt_filter(&mut cur)?,
            Self::GetMwsTransportLayerConfigCmp => mws_transport_layer_config(&mut cur)?,
            Self::DbgAssert => dbg_assert(&mut cur, dir)?,
            other => walk(&mut cur, other.layout().ok_or(CodecError::UnsupportedFormat)?)?,
        }
        Ok(cur.finish())
    }
}

// ───────────────────────────────────────────────────────────────
// Hand-written walkers
// ───────────────────────────────────────────────────────────────

fn passthrough(cur: &mut Cursor<'_, '_>) -> Result<(), CodecError> {
    let n = cur.src_remaining();
    if n > MAX_PARAM_SIZE {
        return Err(CodecError::InputBufferOverflow);
    }
    cur.copy(n)
}

/// Antenna count, mode, then one (I, Q) pair per antenna.
fn dbg_iqgen_cfg(cur: &mut Cursor<'_, '_>) -> Result<(), CodecError> {
    let nb_antenna = cur.copy_u8()? as usize;
    if nb_antenna > DBG_IQGEN_MAX_ANTENNA {
        return Err(CodecError::InputBufferOverflow);
    }
    cur.copy(1)?;
    cur.copy(2 * nb_antenna)
}

mod evt_filter {
    pub const INQUIRY: u8 = 0x01;
    pub const CONNECTION: u8 = 0x02;

    pub const COND_ALL: u8 = 0x00;
    pub const COND_CLASS: u8 = 0x01;
    pub const COND_BD_ADDR: u8 = 0x02;
}

/// Filter type selects whether a condition follows; condition type selects
/// its shape.  Clear-all and unknown types carry nothing further.
fn set_evt_filter(cur: &mut Cursor<'_, '_>) -> Result<(), CodecError> {
    use evt_filter::*;

    let filter_type = cur.copy_u8()?;
    let auto_accept = match filter_type {
        INQUIRY => false,
        CONNECTION => true,
        _ => return Ok(()),
    };

    match cur.copy_u8()? {
        COND_ALL => {}
        COND_CLASS => cur.copy(2 * DEV_CLASS_LEN)?,
        COND_BD_ADDR => cur.copy(BD_ADDR_LEN)?,
        _ => return Ok(()),
    }
    if auto_accept {
        cur.copy(1)?;
    }
    Ok(())
}

/// Transport headers come first on the wire, then every baud-rate pair of
/// every transport; internally each transport owns its rate slots.
fn mws_transport_layer_config(cur: &mut Cursor<'_, '_>) -> Result<(), CodecError> {
    cur.copy(1)?; // status
    let num = cur.copy_u8()? as usize;
    if num > MWS_MAX_TRANSPORTS {
        return Err(CodecError::InputBufferOverflow);
    }

    let mut rates = [0usize; MWS_MAX_TRANSPORTS];
    for (t, nb_rates) in rates.iter_mut().enumerate().take(num) {
        cur.set_internal_pos(MWS_TRANSPORT_BASE + t * MWS_TRANSPORT_STRIDE);
        cur.copy(1)?; // layer
        *nb_rates = cur.copy_u8()? as usize;
        if *nb_rates > MWS_MAX_RATES {
            return Err(CodecError::InputBufferOverflow);
        }
    }

    for (t, &nb_rates) in rates.iter().enumerate().take(num) {
        for r in 0..nb_rates {
            cur.set_internal_pos(MWS_TRANSPORT_BASE + t * MWS_TRANSPORT_STRIDE + 4 + r * MWS_RATE_LEN);
            cur.copy(4)?; // to controller
            cur.copy(4)?; // from controller
        }
    }
    Ok(())
}

/// Fixed header, then the file name.  The terminator lives only in the
/// internal form.
fn dbg_assert(cur: &mut Cursor<'_, '_>, dir: Direction) -> Result<(), CodecError> {
    walk(cur, DBG_ASSERT_HEADER)?;
    cur.set_internal_pos(DBG_ASSERT_FILE_OFFSET);
    let budget = MAX_PARAM_SIZE - DBG_ASSERT_WIRE_HEADER;

    match dir {
        Direction::Pack => {
            let mut len = 0;
            while len < cur.src_remaining() && cur.peek_src(len) != Some(0) {
                len += 1;
            }
            if len > budget {
                return Err(CodecError::OutputBufferOverflow);
            }
            cur.copy(len)
        }
        Direction::Unpack => {
            let len = cur.src_remaining();
            if len > budget {
                return Err(CodecError::InputBufferOverflow);
            }
            cur.copy(len)?;
            cur.put_internal(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hci::codec::fields::internal_offset;

    fn run(s: Special, dir: Direction, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        let n = s.transcode(dir, None, Some(input))?;
        let mut out = vec![0u8; n];
        let m = s.transcode(dir, Some(&mut out), Some(input))?;
        assert_eq!(n, m, "size query must agree with transform");
        Ok(out)
    }

    #[test]
    fn max_wire_sizes() {
        assert_eq!(Special::HostNbCmpPkts.max_wire_size(), 29);
        assert_eq!(Special::WrStoredLk.max_wire_size(), 243);
        assert_eq!(Special::WrCurrIacLap.max_wire_size(), 253);
        assert_eq!(Special::SetExtFrameConfig.max_wire_size(), 253);
        assert_eq!(Special::MwsScanFreqTable.max_wire_size(), 253);
        assert_eq!(Special::MwsPatternConfig.max_wire_size(), 254);
        assert_eq!(Special::LeSetExtScanParam.max_wire_size(), 13);
        assert_eq!(Special::LeExtCreateCon.max_wire_size(), 58);
        assert_eq!(Special::LeSetExtAdvEn.max_wire_size(), 42);
        assert_eq!(Special::DbgIqgenCfg.max_wire_size(), 34);
        assert_eq!(Special::SetEvtFilter.max_wire_size(), 9);
        assert_eq!(Special::GetMwsTransportLayerConfigCmp.max_wire_size(), 104);
        assert_eq!(Special::LeAdvReport.max_wire_size(), 255);
    }

    #[test]
    fn report_layouts_fit_one_event() {
        for layout in [
            LE_ADV_REPORT,
            LE_DIR_ADV_REPORT,
            LE_EXT_ADV_REPORT,
            CONLESS_IQ_REPORT,
            CON_IQ_REPORT,
        ] {
            assert!(fields_max_wire_size(layout) <= MAX_PARAM_SIZE);
        }
    }

    #[test]
    fn host_nb_cmp_pkts() {
        let wire = [2, 0x01, 0x00, 0x03, 0x00, 0x80, 0x00, 0x01, 0x00];
        let internal = run(Special::HostNbCmpPkts, Direction::Unpack, &wire).unwrap();
        // Count byte, pad, then (handle, count) records.
        assert_eq!(internal, [2, 0, 0x01, 0x00, 0x03, 0x00, 0x80, 0x00, 0x01, 0x00]);
        assert_eq!(run(Special::HostNbCmpPkts, Direction::Pack, &internal).unwrap(), wire);
    }

    #[test]
    fn host_nb_cmp_pkts_over_count() {
        let mut wire = vec![8u8];
        wire.extend_from_slice(&[0u8; 32]);
        assert_eq!(
            run(Special::HostNbCmpPkts, Direction::Unpack, &wire),
            Err(CodecError::InputBufferOverflow)
        );
    }

    #[test]
    fn stored_link_keys() {
        let mut wire = vec![1u8];
        wire.extend_from_slice(&[0xA1; BD_ADDR_LEN]);
        wire.extend_from_slice(&[0x5C; KEY_LEN]);
        let internal = run(Special::WrStoredLk, Direction::Unpack, &wire).unwrap();
        assert_eq!(internal, wire);

        wire.truncate(10);
        assert_eq!(
            run(Special::WrStoredLk, Direction::Unpack, &wire),
            Err(CodecError::InputBufferOverflow)
        );
    }

    #[test]
    fn ext_create_con_follows_phy_mask() {
        // 1M and Coded: two 16-byte blocks.
        let mut wire = vec![0, 0, 0, 1, 2, 3, 4, 5, 6, 0b101];
        wire.extend((0..32).map(|i| i as u8));
        let internal = run(Special::LeExtCreateCon, Direction::Unpack, &wire).unwrap();
        // Mask at 9, blocks 2-aligned from 10.
        assert_eq!(internal.len(), 10 + 32);
        assert_eq!(run(Special::LeExtCreateCon, Direction::Pack, &internal).unwrap(), wire);
    }

    #[test]
    #[test]
    fn set_evt_filter_shapes() {
        // Clear all
        assert_eq!(run(Special::SetEvtFilter, Direction::Unpack, &[0]).unwrap(), [0]);
        // Inquiry, by class
        let w = [1, 1, 1, 2, 3, 4, 5, 6];
        assert_eq!(run(Special::SetEvtFilter, Direction::Unpack, &w).unwrap(), w);
        // Inquiry, all devices
        assert_eq!(run(Special::SetEvtFilter, Direction::Unpack, &[1, 0]).unwrap(), [1, 0]);
        // Connection setup, by address, auto accept
        let w = [2, 2, 1, 2, 3, 4, 5, 6, 2];
        assert_eq!(run(Special::SetEvtFilter, Direction::Unpack, &w).unwrap(), w);
        // Connection setup, all devices, missing auto accept
        assert_eq!(
            run(Special::SetEvtFilter, Direction::Unpack, &[2, 0]),
            Err(CodecError::InputBufferOverflow)
        );
    }

    #[test]
    fn dbg_iqgen_cfg() {
        let w = [2, 1, 10, 11, 20, 21];
        assert_eq!(run(Special::DbgIqgenCfg, Direction::Unpack, &w).unwrap(), w);
        assert_eq!(
            run(Special::DbgIqgenCfg, Direction::Unpack, &[17, 0]),
            Err(CodecError::InputBufferOverflow)
        );
    }

    #[test]
    fn mws_transport_layer_config() {
        // Two transports: 1 rate, 2 rates.
        let mut wire = vec![0x00, 2, 0xA0, 1, 0xB0, 2];
        for rate in 1u8..=6 {
            wire.extend_from_slice(&[rate, 0, 0, 0]);
        }
        let internal = run(Special::GetMwsTransportLayerConfigCmp, Direction::Unpack, &wire).unwrap();
        assert_eq!(internal[0], 0x00);
        assert_eq!(internal[1], 2);
        assert_eq!(&internal[4..6], &[0xA0, 1]);
        assert_eq!(internal[8], 1); // t0 r0 to
        assert_eq!(internal[12], 2); // t0 r0 from
        assert_eq!(&internal[40..42], &[0xB0, 2]);
        assert_eq!(internal[44], 3);
        assert_eq!(internal[56], 6);
        assert_eq!(internal.len(), 60);

        let packed = run(Special::GetMwsTransportLayerConfigCmp, Direction::Pack, &internal).unwrap();
        assert_eq!(packed, wire);
    }

    #[test]
    fn legacy_adv_report_packs_structured() {
        // subcode, 1 report: evt, addr type, addr, 3 data bytes, rssi.
        let mut internal = vec![0u8; 2 + 41];
        internal[0] = 0x02;
        internal[1] = 1;
        internal[2] = 0x00;
        internal[3] = 0x01;
        internal[4..10].copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        internal[10] = 3;
        internal[11..14].copy_from_slice(&[0xAA, 0xBB, 0xCC]);
        internal[42] = 0xC4;
        let wire = run(Special::LeAdvReport, Direction::Pack, &internal).unwrap();
        assert_eq!(
            wire,
            [0x02, 1, 0x00, 0x01, 1, 2, 3, 4, 5, 6, 3, 0xAA, 0xBB, 0xCC, 0xC4]
        );

        // A Host keeps the wire bytes untouched.
        let host = run(Special::LeAdvReport, Direction::Unpack, &wire).unwrap();
        assert_eq!(host, wire);
    }

    #[test]
    fn ext_adv_report_offsets() {
        let Field::Repeat { record, .. } = LE_EXT_ADV_REPORT[1] else {
            panic!("record block expected");
        };
        assert_eq!(internal_offset(record, 0).map(|o| o + 2), Some(EXT_ADV_REPORT_EVT_TYPE_OFFSET));
        assert_eq!(internal_offset(record, 3).map(|o| o + 2), Some(EXT_ADV_REPORT_PHY_OFFSET));
    }

    #[test]
    fn dbg_assert_text() {
        let mut internal = vec![0u8; DBG_ASSERT_FILE_OFFSET];
        internal[0] = 0x02;
        internal[1] = 1;
        internal[4..8].copy_from_slice(&42u32.to_le_bytes());
        internal.extend_from_slice(b"ll.c\0junk");

        let wire = run(Special::DbgAssert, Direction::Pack, &internal).unwrap();
        assert_eq!(wire.len(), DBG_ASSERT_WIRE_HEADER + 4);
        assert_eq!(&wire[2..6], &42u32.to_le_bytes());
        assert_eq!(&wire[14..], b"ll.c");

        let back = run(Special::DbgAssert, Direction::Unpack, &wire).unwrap();
        assert_eq!(&back[DBG_ASSERT_FILE_OFFSET..], b"ll.c\0");
        assert_eq!(&back[4..8], &42u32.to_le_bytes());
    }

    #[test]
    fn dbg_assert_file_name_over_budget() {
        let mut internal = vec![0u8; DBG_ASSERT_FILE_OFFSET];
        internal.extend(std::iter::repeat_n(b'a', MAX_PARAM_SIZE - DBG_ASSERT_WIRE_HEADER));
        let fits = run(Special::DbgAssert, Direction::Pack, &internal).unwrap();
        assert_eq!(fits.len(), MAX_PARAM_SIZE);

        internal.push(b'a');
        assert_eq!(
            Special::DbgAssert.transcode(Direction::Pack, None, Some(&internal)),
            Err(CodecError::OutputBufferOverflow)
        );
    }

    #[test]
    fn static_maximums() {
        assert_eq!(Special::GetMwsTransportLayerConfigCmp.transcode(Direction::Unpack, None, None), Ok(112));
        assert_eq!(Special::LeSetExtScanParam.transcode(Direction::Unpack, None, None), Ok(16));
        assert_eq!(Special::LeSetExtScanParam.transcode(Direction::Pack, None, None), Ok(13));
    }
}
