//! Advertising-report flow control.
//!
//! Scanning can produce reports faster than the transport drains them.
//! Reports queued for transmission are counted; once the ceiling is
//! reached new reports are dropped.  A report split over several
//! fragments is kept or dropped as a whole: the first fragment decides and
//! the decision sticks until the fragment that completes the chain.
//!
//! ```text
//!   first fragment ──▶ None ──(ceiling hit)──▶ Filtered ─┐
//!                        │                              │
//!                        └──(room left)───▶ Valid ──────┤
//!                                                       ▼
//!                                     last fragment ──▶ None
//! ```

use log::{debug, warn};

use super::codec::special::{EXT_ADV_REPORT_EVT_TYPE_OFFSET, EXT_ADV_REPORT_PHY_OFFSET};
use super::consts::{
    ADV_EVT_DATA_STATUS_MASK, ADV_EVT_DATA_STATUS_SHIFT, DATA_STATUS_INCOMPLETE, PHY_1MBPS_VALUE,
    le_evt,
};
use super::msg::{Message, MsgKind};
use crate::config::HciConfig;
use crate::error::Fault;

/// Internal offsets inside a periodic advertising report.
const PER_ADV_REPORT_SYNC_HDL_OFFSET: usize = 2;
const PER_ADV_REPORT_STATUS_OFFSET: usize = 7;

/// State of a fragmented report chain.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChainStatus {
    /// No chain ongoing.
    #[default]
    None,
    /// Chain ongoing, fragments forwarded.
    Valid,
    /// Chain ongoing, fragments dropped.
    Filtered,
}

impl ChainStatus {
    /// Decide one fragment; returns whether it is dropped and the new status.
    fn step(self, ceiling_hit: bool, more_data: bool) -> (bool, Self) {
        let filtered = self == Self::Filtered || (self == Self::None && ceiling_hit);
        let next = match (more_data, filtered) {
            (false, _) => Self::None,
            (true, true) => Self::Filtered,
            (true, false) => Self::Valid,
        };
        (filtered, next)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvReportFilter {
    frag_max: u8,
    iq_max: u8,
    frag_cnt: u8,
    iq_cnt: u8,
    chain_1m: ChainStatus,
    chain_coded: ChainStatus,
    /// Indexed by periodic sync handle.
    per_chain: Vec<ChainStatus>,
}

impl AdvReportFilter {
    pub fn new(config: &HciConfig) -> Self {
        Self {
            frag_max: config.adv_rep_frag_max,
            iq_max: config.iq_rep_max,
            frag_cnt: 0,
            iq_cnt: 0,
            chain_1m: ChainStatus::None,
            chain_coded: ChainStatus::None,
            per_chain: vec![ChainStatus::None; usize::from(config.max_activities)],
        }
    }

    pub fn reset(&mut self) {
        self.frag_cnt = 0;
        self.iq_cnt = 0;
        self.chain_1m = ChainStatus::None;
        self.chain_coded = ChainStatus::None;
        self.per_chain.fill(ChainStatus::None);
    }

    /// Fragments currently queued for transmission.
    pub fn queued_fragments(&self) -> u8 {
        self.frag_cnt
    }

    pub fn queued_iq_reports(&self) -> u8 {
        self.iq_cnt
    }

    /// Decide whether `msg` goes to the transmit queue.
    ///
    /// Returns `false` when the message must be dropped.
    pub fn admit(&mut self, msg: &Message) -> bool {
        if msg.kind != MsgKind::LeEvent {
            return true;
        }
        let params = msg.params();
        let ceiling_hit = self.frag_cnt >= self.frag_max;

        let filtered = match u8::try_from(msg.id).unwrap_or(0) {
            le_evt::EXT_ADV_REPORT => {
                let evt_type = read_u16(params, EXT_ADV_REPORT_EVT_TYPE_OFFSET);
                let data_status = (evt_type & ADV_EVT_DATA_STATUS_MASK) >> ADV_EVT_DATA_STATUS_SHIFT;
                let more_data = data_status == u16::from(DATA_STATUS_INCOMPLETE);
                let phy = params.get(EXT_ADV_REPORT_PHY_OFFSET).copied().unwrap_or(PHY_1MBPS_VALUE);

                let chain = if phy == PHY_1MBPS_VALUE {
                    &mut self.chain_1m
                } else {
                    &mut self.chain_coded
                };
                let (filtered, next) = chain.step(ceiling_hit, more_data);
                *chain = next;
                filtered
            }
            le_evt::ADV_REPORT => ceiling_hit,
            le_evt::PER_ADV_REPORT => {
                let sync_hdl = read_u16(params, PER_ADV_REPORT_SYNC_HDL_OFFSET);
                let more_data = params.get(PER_ADV_REPORT_STATUS_OFFSET).copied()
                    == Some(DATA_STATUS_INCOMPLETE);

                match self.per_chain.get_mut(usize::from(sync_hdl)) {
                    Some(chain) => {
                        let (filtered, next) = chain.step(ceiling_hit, more_data);
                        *chain = next;
                        filtered
                    }
                    None => {
                        warn!("periodic report on untracked sync handle {sync_hdl:#06x}");
                        ceiling_hit
                    }
                }
            }
            le_evt::CONLESS_IQ_REPORT => {
                if self.iq_cnt >= self.iq_max {
                    debug!("IQ report dropped ({} queued)", self.iq_cnt);
                    return false;
                }
                self.iq_cnt += 1;
                return true;
            }
            _ => return true,
        };

        if filtered {
            debug!("adv report {:#04x} dropped ({} queued)", msg.id, self.frag_cnt);
        } else {
            self.frag_cnt = self.frag_cnt.saturating_add(1);
        }
        !filtered
    }

    /// Account for `msg` leaving the transmit path.
    pub fn on_transmit(&mut self, msg: &Message) -> Result<(), Fault> {
        if msg.kind != MsgKind::LeEvent {
            return Ok(());
        }
        match u8::try_from(msg.id).unwrap_or(0) {
            le_evt::ADV_REPORT | le_evt::EXT_ADV_REPORT | le_evt::PER_ADV_REPORT => {
                self.frag_cnt = self.frag_cnt.checked_sub(1).ok_or(Fault::AdvReportUnderflow)?;
            }
            le_evt::CONLESS_IQ_REPORT => {
                self.iq_cnt = self.iq_cnt.checked_sub(1).ok_or(Fault::IqReportUnderflow)?;
            }
            _ => {}
        }
        Ok(())
    }
}

fn read_u16(params: &[u8], offset: usize) -> u16 {
    match params.get(offset..offset + 2) {
        Some(&[lo, hi]) => u16::from_le_bytes([lo, hi]),
        _ => 0,
    }
}
