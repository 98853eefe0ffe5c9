//! Format descriptors for HCI commands and events.
//!
//! A descriptor tells the rest of the layer three things about one
//! opcode or event code: where it is routed, how large its parameters may
//! get, and how to convert them between wire and internal form.
//!
//! ```text
//!  CommandDesc ──┬── route: (LlClass, HlClass)
//!                ├── max_param_size
//!                ├── request: Option<Format>
//!                └── reply:   Option<Format>
//!
//!  Format = Fields(&[Field])   declarative field list
//!         | Special(Special)   hand-written codec
//! ```

use super::codec::special::Special;

// ───────────────────────────────────────────────────────────────
// Field kinds
// ───────────────────────────────────────────────────────────────

/// How a repeated record block learns its record count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    /// A leading byte holds the count.
    Prefix,
    /// A leading byte holds a bitmask; its population count is the count.
    PopCount,
}

/// One field of a declarative format.
///
/// Wire form is packed little-endian.  Internal form follows the
/// `#[repr(C)]` layout of the equivalent parameter struct: `U16` is
/// 2-aligned, `U32` 4-aligned, byte arrays unaligned, and variable-length
/// fields occupy their full capacity slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    U8,
    U16,
    U32,
    /// Fixed-size byte array (address, key, mask...).
    Bytes(usize),
    /// Length byte followed by up to `max` bytes.
    Counted(usize),
    /// Count or mask byte followed by up to `max` records.
    Repeat {
        count: Count,
        record: &'static [Field],
        max: usize,
    },
    /// Everything left in the buffer, up to `max` bytes.
    Tail(usize),
}

impl Field {
    /// Largest wire encoding of this field.
    pub const fn max_wire_size(&self) -> usize {
        match *self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::Bytes(n) => n,
            Self::Counted(max) => 1 + max,
            Self::Repeat { record, max, .. } => 1 + max * fields_max_wire_size(record),
            Self::Tail(max) => max,
        }
    }

    /// Alignment of this field in internal form.
    pub const fn align(&self) -> usize {
        match *self {
            Self::U16 => 2,
            Self::U32 => 4,
            Self::Repeat { .. } | Self::U8 | Self::Bytes(_) | Self::Counted(_) | Self::Tail(_) => 1,
        }
    }
}

/// Largest wire encoding of a field list.
pub const fn fields_max_wire_size(fields: &[Field]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < fields.len() {
        total += fields[i].max_wire_size();
        i += 1;
    }
    total
}

/// Alignment of a record built from `fields`.
pub const fn fields_align(fields: &[Field]) -> usize {
    let mut align = 1;
    let mut i = 0;
    while i < fields.len() {
        let a = fields[i].align();
        if a > align {
            align = a;
        }
        i += 1;
    }
    align
}

pub const fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) / align * align
}

// ───────────────────────────────────────────────────────────────
// Format
// ───────────────────────────────────────────────────────────────

/// Parameter format of one direction of a command or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Fields(&'static [Field]),
    Special(Special),
}

impl Format {
    /// Largest wire encoding this format can produce.
    pub const fn max_wire_size(&self) -> usize {
        match *self {
            Self::Fields(fields) => fields_max_wire_size(fields),
            Self::Special(special) => special.max_wire_size(),
        }
    }

    /// The declarative field list, when there is one.
    pub const fn fields(&self) -> Option<&'static [Field]> {
        match *self {
            Self::Fields(fields) => Some(fields),
            Self::Special(_) => None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Routing
// ───────────────────────────────────────────────────────────────

/// Lower-layer (controller side) destination class of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlClass {
    /// BR/EDR link manager.
    BtMng,
    /// BR/EDR broadcast manager.
    BtBcst,
    /// BR/EDR link, addressed by connection handle.
    BtCtrlConhdl,
    /// BR/EDR link, addressed by peer BD address.
    BtCtrlBdAddr,
    /// LE link-layer manager.
    BleMng,
    /// LE link, addressed by connection handle.
    BleCtrl,
    /// LE isochronous manager.
    BleIso,
    /// Either stack's manager (dual-mode management command).
    Mng,
    /// Either stack's link, addressed by connection handle.
    Ctrl,
    /// Debug / vendor task.
    Dbg,
}

/// Higher-layer (Host side) destination class of a command reply or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HlClass {
    /// No Host-side consumer.
    None,
    /// GAP manager.
    Mng,
    /// GAP controller of one connection.
    Ctrl,
    /// L2CAP controller of one connection.
    Data,
    /// Isochronous manager.
    Iso,
}

/// Routing of a command (both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub ll: LlClass,
    pub hl: HlClass,
}

// ───────────────────────────────────────────────────────────────
// Descriptors
// ───────────────────────────────────────────────────────────────

/// Descriptor of one HCI command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDesc {
    pub opcode: u16,
    pub route: Route,
    /// Bound on the wire size of the request parameters.
    pub max_param_size: u16,
    /// Request parameters (`None` = no parameters).
    pub request: Option<Format>,
    /// Command-complete return parameters (`None` = replied by command status).
    pub reply: Option<Format>,
}

impl CommandDesc {
    pub const fn new(
        opcode: u16,
        ll: LlClass,
        hl: HlClass,
        request: Option<Format>,
        reply: Option<Format>,
    ) -> Self {
        let max_param_size = match request {
            Some(format) => format.max_wire_size() as u16,
            None => 0,
        };
        Self {
            opcode,
            route: Route { ll, hl },
            max_param_size,
            request,
            reply,
        }
    }
}

/// Descriptor of one HCI event or LE/debug sub-event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDesc {
    /// Event code, or sub-code for LE and debug meta events.
    pub code: u8,
    /// Host-side destination class.
    pub hl: HlClass,
    /// Parameter format (`None` = no parameters).
    pub format: Option<Format>,
}

impl EventDesc {
    pub const fn new(code: u8, hl: HlClass, format: Option<Format>) -> Self {
        Self { code, hl, format }
    }

    /// Bound on the wire size of the parameters.
    pub const fn max_param_size(&self) -> usize {
        match self.format {
            Some(format) => format.max_wire_size(),
            None => 0,
        }
    }
}
