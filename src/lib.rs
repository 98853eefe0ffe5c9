//! Bluetooth HCI transport and message-codec library.
//!
//! Sits between a byte transport (UART/H4) and the link-layer or Host
//! tasks of a dual-mode Bluetooth stack.  The embedding firmware supplies
//! the environment through the traits in [`hci::ports`].

#![deny(unused_must_use)]

pub mod config;
pub mod error;
pub mod hci;

pub use config::HciConfig;
pub use error::{CodecError, ConfigError, Error, Fault, Result};
