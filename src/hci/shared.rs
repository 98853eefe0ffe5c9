//! Interrupt-safe handle to the transport layer.
//!
//! `tl_send` is called from upper-layer tasks while `tx_done` comes from
//! the transport driver, possibly in interrupt context.  Both go through
//! one critical-section mutex so the queues and the in-flight slot are
//! never observed half-updated.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::error;

use super::msg::Message;
use super::ports::HciIo;
use super::tl::HciTl;
use crate::config::HciConfig;
use crate::error::{Error, Fault, Result};

pub struct SharedHciTl {
    inner: Mutex<CriticalSectionRawMutex, RefCell<HciTl>>,
}

impl SharedHciTl {
    pub fn new(config: HciConfig) -> Result<Self> {
        Ok(Self {
            inner: Mutex::new(RefCell::new(HciTl::new(config)?)),
        })
    }

    /// Run `f` with exclusive access to the layer.
    ///
    /// Calling back into the handle from inside `f` fails with
    /// [`Fault::Reentered`] instead of running.
    pub fn with<R>(&self, f: impl FnOnce(&mut HciTl) -> R) -> Result<R> {
        self.inner.lock(|cell| match cell.try_borrow_mut() {
            Ok(mut tl) => Ok(f(&mut tl)),
            Err(_) => {
                error!("HCI fault: {}", Fault::Reentered);
                Err(Error::Fault(Fault::Reentered))
            }
        })
    }

    pub fn tl_send(&self, msg: Message, io: &mut impl HciIo) -> Result<()> {
        self.with(|tl| tl.tl_send(msg, io))?
    }

    pub fn tx_done(&self, io: &mut impl HciIo) -> Result<()> {
        self.with(|tl| tl.tx_done(io))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hci::consts::evt;
    use crate::hci::msg::{Dest, MsgKind};
    use crate::hci::test_io::TestIo;
    use crate::hci::tl::TxState;

    #[test]
    fn send_and_complete_through_lock() {
        let config = HciConfig::default();
        let mut io = TestIo::new(&config);
        let shared = SharedHciTl::new(config).unwrap();

        let overflow = |b| Message::with_params(MsgKind::Event, u16::from(evt::DATA_BUF_OVFLW), Dest::Hci, &[b]);
        shared.tl_send(overflow(1), &mut io).unwrap();
        shared.tl_send(overflow(0), &mut io).unwrap();
        assert_eq!(io.frames.len(), 1);
        assert_eq!(shared.with(|tl| tl.queue_lens()).unwrap(), (1, 0, 0));

        shared.tx_done(&mut io).unwrap();
        shared.tx_done(&mut io).unwrap();
        assert_eq!(io.frames.len(), 2);
        assert_eq!(shared.with(|tl| tl.tx_state()).unwrap(), TxState::Idle);
    }

    #[test]
    fn nested_entry_is_refused() {
        let config = HciConfig::default();
        let mut io = TestIo::new(&config);
        let shared = SharedHciTl::new(config).unwrap();

        let nested = shared.with(|_| shared.tx_done(&mut io)).unwrap();
        assert_eq!(nested, Err(Error::Fault(Fault::Reentered)));

        // The outer borrow has ended; the handle works again.
        assert_eq!(shared.with(|tl| tl.cmd_credits()).unwrap(), 5);
    }
}
