//! Unified error types for the HCI layer.
//!
//! Wire-level problems (unknown opcode, bad handle, short frame) never show
//! up here: they are answered on the wire with a rejection event.  What is
//! left are codec statuses, configuration problems and internal consistency
//! faults.  All variants are `Copy` so they can be returned from the
//! completion path without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A codec call failed where the caller cannot turn it into a rejection.
    Codec(CodecError),
    /// Internal bookkeeping went inconsistent.  Non-recoverable.
    Fault(Fault),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "codec: {e}"),
            Self::Fault(e) => write!(f, "fault: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Codec status
// ---------------------------------------------------------------------------

/// Non-`Ok` outcomes of the two-phase codec contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Input is shorter than its own declared or implied length.
    InputBufferOverflow,
    /// Destination buffer too small.
    OutputBufferOverflow,
    /// No codec exists for this direction.
    UnsupportedFormat,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputBufferOverflow => write!(f, "input buffer overflow"),
            Self::OutputBufferOverflow => write!(f, "output buffer overflow"),
            Self::UnsupportedFormat => write!(f, "unsupported format"),
        }
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

// ---------------------------------------------------------------------------
// Internal consistency faults
// ---------------------------------------------------------------------------

/// Programming faults.  Reported through the error log and returned to the
/// caller, never through the reply protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// An outbound message failed to pack with its own descriptor.
    PackFailed { id: u16, err: CodecError },
    /// Packed parameters came out longer than the internal message.
    PackedLengthGrew { id: u16 },
    /// A Host-side command has no descriptor.
    UnknownCommand(u16),
    /// An upper layer emitted an event code with no table entry.
    UnknownEvent(u8),
    /// An upper layer emitted an LE or debug sub-event with no table entry.
    UnknownSubEvent { code: u8, subcode: u8 },
    /// A command-complete was emitted for the no-operation opcode.
    NopCompletion,
    /// The advertising-report fragment counter was decremented at zero.
    AdvReportUnderflow,
    /// The IQ-report counter was decremented at zero.
    IqReportUnderflow,
    /// `tx_done` ran without a message in flight.
    NothingInFlight,
    /// A message kind reached a queue it does not belong to.
    MisroutedKind,
    /// The shared layer was entered again while already borrowed, e.g.
    /// a transport completing a write synchronously.
    Reentered,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PackFailed { id, err } => write!(f, "pack of 0x{id:04X} failed: {err}"),
            Self::PackedLengthGrew { id } => write!(f, "packed 0x{id:04X} longer than source"),
            Self::UnknownCommand(opcode) => write!(f, "no descriptor for command 0x{opcode:04X}"),
            Self::UnknownEvent(code) => write!(f, "no descriptor for event 0x{code:02X}"),
            Self::UnknownSubEvent { code, subcode } => {
                write!(f, "no descriptor for sub-event 0x{code:02X}/0x{subcode:02X}")
            }
            Self::NopCompletion => write!(f, "command complete for NOP opcode"),
            Self::AdvReportUnderflow => write!(f, "adv report counter underflow"),
            Self::IqReportUnderflow => write!(f, "IQ report counter underflow"),
            Self::NothingInFlight => write!(f, "tx done with nothing in flight"),
            Self::MisroutedKind => write!(f, "message kind does not match queue"),
            Self::Reentered => write!(f, "transport layer re-entered"),
        }
    }
}

impl From<Fault> for Error {
    fn from(e: Fault) -> Self {
        Self::Fault(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A value is outside its legal range.
    OutOfRange(&'static str),
    /// Stored bytes could not be decoded.
    Decode,
    /// Could not encode for storage.
    Encode,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(field) => write!(f, "{field} out of range"),
            Self::Decode => write!(f, "decode failed"),
            Self::Encode => write!(f, "encode failed"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
