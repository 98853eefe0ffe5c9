//! Two-phase parameter codec.
//!
//! Every codec, generic or special, implements the same single operation:
//!
//! ```text
//!   transcode(out: Option<&mut [u8]>, input: Option<&[u8]>) -> Result<len>
//!
//!   out = None, input = Some  → size query: size of the converted form
//!   out = None, input = None  → static maximum of the converted form
//!   out = Some, input = Some  → transform, returns bytes produced
//! ```
//!
//! `Direction::Pack` converts internal (struct layout) to wire bytes,
//! `Direction::Unpack` converts wire bytes to internal layout.  A
//! controller unpacks commands and packs events; a Host does the reverse.

pub mod fields;
pub mod special;

use crate::error::CodecError;

use super::descriptor::Format;

/// Conversion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Internal layout → wire.
    Pack,
    /// Wire → internal layout.
    Unpack,
}

/// The codec contract.
pub trait Codec {
    /// Size-query (`out = None`) or transform (`out = Some`).
    ///
    /// A size query must not write anything and must agree exactly with
    /// the length a subsequent transform of the same input returns.
    fn transcode(&self, out: Option<&mut [u8]>, input: Option<&[u8]>) -> Result<usize, CodecError>;
}

/// A [`Format`] bound to a [`Direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transcoder {
    pub format: Format,
    pub dir: Direction,
}

impl Codec for Transcoder {
    fn transcode(&self, out: Option<&mut [u8]>, input: Option<&[u8]>) -> Result<usize, CodecError> {
        match self.format {
            Format::Fields(layout) => fields::transcode(layout, self.dir, out, input),
            Format::Special(special) => special.transcode(self.dir, out, input),
        }
    }
}

impl Format {
    pub const fn codec(self, dir: Direction) -> Transcoder {
        Transcoder { format: self, dir }
    }
}

// ── Convenience wrappers ─────────────────────────────────────

/// Size of the packed (wire) form of `internal`.
pub fn packed_size(format: Format, internal: &[u8]) -> Result<usize, CodecError> {
    format.codec(Direction::Pack).transcode(None, Some(internal))
}

/// Size of the unpacked (internal) form of `wire`.
pub fn unpacked_size(format: Format, wire: &[u8]) -> Result<usize, CodecError> {
    format.codec(Direction::Unpack).transcode(None, Some(wire))
}

/// Full internal size of a format with every variable field at capacity.
pub fn internal_capacity(format: Format) -> Result<usize, CodecError> {
    format.codec(Direction::Unpack).transcode(None, None)
}

/// Pack `internal` into `out`, returning the wire length.
pub fn pack(format: Format, out: &mut [u8], internal: &[u8]) -> Result<usize, CodecError> {
    format.codec(Direction::Pack).transcode(Some(out), Some(internal))
}

/// Unpack `wire` into `out`, returning the internal length.
pub fn unpack(format: Format, out: &mut [u8], wire: &[u8]) -> Result<usize, CodecError> {
    format.codec(Direction::Unpack).transcode(Some(out), Some(wire))
}

/// Optional-format variants used by the dispatch paths: a missing format
/// only accepts empty parameters.
pub fn unpacked_size_opt(format: Option<Format>, wire: &[u8]) -> Result<usize, CodecError> {
    match format {
        Some(format) => unpacked_size(format, wire),
        None if wire.is_empty() => Ok(0),
        None => Err(CodecError::UnsupportedFormat),
    }
}
