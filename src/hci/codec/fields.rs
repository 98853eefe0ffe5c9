//! Generic codec over declarative field lists.
//!
//! The engine keeps two cursors, one on the wire side and one on the
//! internal side, and moves them together field by field.  Alignment and
//! capacity slots only ever advance the internal cursor.
//!
//! ```text
//!  wire      │B│ H │B│   L   │
//!             │ ╲   ╲ ╲
//!  internal  │B│.│ H │B│...│   L   │
//!             0 1 2   4     8
//! ```
//!
//! Multi-byte scalars are little-endian on both sides.

use crate::error::CodecError;
use crate::hci::descriptor::{Count, Field, align_up, fields_align, fields_max_wire_size};

use super::Direction;

// ── Cursor ───────────────────────────────────────────────────

/// Paired wire/internal cursor shared with the special codecs.
pub(crate) struct Cursor<'i, 'o> {
    dir: Direction,
    input: &'i [u8],
    out: Option<&'o mut [u8]>,
    wire: usize,
    int: usize,
    /// End of the last internal byte read or written.
    int_end: usize,
}

impl<'i, 'o> Cursor<'i, 'o> {
    pub(crate) fn new(dir: Direction, input: &'i [u8], out: Option<&'o mut [u8]>) -> Self {
        Self {
            dir,
            input,
            out,
            wire: 0,
            int: 0,
            int_end: 0,
        }
    }

    fn src_pos(&self) -> usize {
        match self.dir {
            Direction::Pack => self.int,
            Direction::Unpack => self.wire,
        }
    }

    fn dst_pos(&self) -> usize {
        match self.dir {
            Direction::Pack => self.wire,
            Direction::Unpack => self.int,
        }
    }

    /// Copy `n` bytes from source to destination and advance both cursors.
    pub(crate) fn copy(&mut self, n: usize) -> Result<(), CodecError> {
        let src = self.src_pos();
        let dst = self.dst_pos();
        let src_end = src
            .checked_add(n)
            .filter(|&end| end <= self.input.len())
            .ok_or(CodecError::InputBufferOverflow)?;

        if let Some(out) = self.out.as_deref_mut() {
            let dst_end = dst + n;
            if dst_end > out.len() {
                return Err(CodecError::OutputBufferOverflow);
            }
            out[dst..dst_end].copy_from_slice(&self.input[src..src_end]);
        }

        self.wire += n;
        self.int += n;
        if n > 0 {
            self.int_end = self.int_end.max(self.int);
        }
        Ok(())
    }

    /// Copy one byte and return its value.
    pub(crate) fn copy_u8(&mut self) -> Result<u8, CodecError> {
        let src = self.src_pos();
        self.copy(1)?;
        Ok(self.input[src])
    }

    /// Write a byte that exists only on the internal side (unpack only).
    pub(crate) fn put_internal(&mut self, value: u8) -> Result<(), CodecError> {
        if let Some(out) = self.out.as_deref_mut() {
            let slot = out
                .get_mut(self.int)
                .ok_or(CodecError::OutputBufferOverflow)?;
            *slot = value;
        }
        self.int += 1;
        self.int_end = self.int_end.max(self.int);
        Ok(())
    }

    pub(crate) fn align(&mut self, align: usize) {
        self.int = align_up(self.int, align);
    }

    pub(crate) fn skip_internal(&mut self, n: usize) {
        self.int += n;
    }

    pub(crate) fn internal_pos(&self) -> usize {
        self.int
    }

    pub(crate) fn set_internal_pos(&mut self, pos: usize) {
        self.int = pos;
    }

    /// Source bytes left from the current position.
    pub(crate) fn src_remaining(&self) -> usize {
        self.input.len().saturating_sub(self.src_pos())
    }

    /// Look ahead at a source byte without moving.
    pub(crate) fn peek_src(&self, ahead: usize) -> Option<u8> {
        self.input.get(self.src_pos() + ahead).copied()
    }

    /// Length of the produced form.
    pub(crate) fn finish(&self) -> usize {
        match self.dir {
            Direction::Pack => self.wire,
            Direction::Unpack => self.int_end,
        }
    }
}

// ── Layout arithmetic ────────────────────────────────────────

/// Internal size of a field list with every variable part at capacity.
pub fn internal_size(fields: &[Field]) -> usize {
    let mut off = 0;
    for field in fields {
        off = align_up(off, field.align());
        off += match *field {
            Field::U8 => 1,
            Field::U16 => 2,
            Field::U32 => 4,
            Field::Bytes(n) => n,
            Field::Counted(max) => 1 + max,
            Field::Tail(max) => max,
            Field::Repeat { record, max, .. } => {
                let start = align_up(off + 1, fields_align(record));
                start - off + max * record_stride(record)
            }
        };
    }
    off
}

/// Distance between consecutive records in internal form.
pub fn record_stride(record: &[Field]) -> usize {
    align_up(internal_size(record), fields_align(record))
}

/// Internal offset of the top-level field at `index`.
pub fn internal_offset(fields: &[Field], index: usize) -> Option<usize> {
    if index >= fields.len() {
        return None;
    }
    let before = internal_size(&fields[..index]);
    Some(align_up(before, fields[index].align()))
}

/// Every top-level field paired with its internal offset.
pub fn internal_offsets(fields: &[Field]) -> impl Iterator<Item = (usize, Field)> + '_ {
    fields
        .iter()
        .enumerate()
        .filter_map(|(i, f)| internal_offset(fields, i).map(|off| (off, *f)))
}

/// Offset of the first `U16` field, where connection-oriented formats keep
/// their handle.
pub fn first_u16_offset(fields: &[Field]) -> Option<usize> {
    internal_offsets(fields)
        .find(|(_, f)| *f == Field::U16)
        .map(|(off, _)| off)
}

// ── Engine ───────────────────────────────────────────────────

/// Walk `fields` with `cur`.
pub(crate) fn walk(cur: &mut Cursor<'_, '_>, fields: &[Field]) -> Result<(), CodecError> {
    for field in fields {
        cur.align(field.align());
        match *field {
            Field::U8 => cur.copy(1)?,
            Field::U16 => cur.copy(2)?,
            Field::U32 => cur.copy(4)?,
            Field::Bytes(n) => cur.copy(n)?,
            Field::Counted(max) => {
                let len = cur.copy_u8()? as usize;
                if len > max {
                    return Err(CodecError::InputBufferOverflow);
                }
                cur.copy(len)?;
                cur.skip_internal(max - len);
            }
            Field::Repeat { count, record, max } => {
                let head = cur.copy_u8()?;
                let n = match count {
                    Count::Prefix => head as usize,
                    Count::PopCount => head.count_ones() as usize,
                };
                // Never walk past the record slots.
                if n > max {
                    return Err(CodecError::InputBufferOverflow);
                }
                let stride = record_stride(record);
                cur.align(fields_align(record));
                let base = cur.internal_pos();
                for i in 0..n {
                    cur.set_internal_pos(base + i * stride);
                    walk(cur, record)?;
                }
                cur.set_internal_pos(base + max * stride);
            }
            Field::Tail(max) => {
                let n = cur.src_remaining();
                if n > max {
                    return Err(CodecError::InputBufferOverflow);
                }
                cur.copy(n)?;
            }
        }
    }
    Ok(())
}

/// Two-phase codec entry point for a declarative format.
pub fn transcode(
    fields: &[Field],
    dir: Direction,
    out: Option<&mut [u8]>,
    input: Option<&[u8]>,
) -> Result<usize, CodecError> {
    let Some(input) = input else {
        return Ok(match dir {
            Direction::Pack => fields_max_wire_size(fields),
            Direction::Unpack => internal_size(fields),
        });
    };
    let mut cur = Cursor::new(dir, input, out);
    walk(&mut cur, fields)?;
    Ok(cur.finish())
}
