use core::fmt;

/// Everything that can go wrong while building, reading or writing a
/// [`Geometry`](crate::Geometry).
///
/// The original C core reports these through a non-returning error handler
/// installed by the host; this port threads them through `Result` instead
/// (see `SPEC_FULL.md`'s "Errors" section).
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A child geometry's `(hasZ, hasM)` didn't match its parent's.
    DimensionMismatch,
    /// A collection child's type code isn't permitted under its parent type
    /// (see the parent/child table in §3 of the spec).
    InvalidSubtype { parent: &'static str, found: &'static str },
    /// An accessor was asked for a point index `>= npoints`.
    OutOfRange { index: usize, len: usize },
    /// Serialized or TWKB input was structurally invalid.
    Malformed(&'static str),
    /// A varint decode ran past the end of the buffer, or a 64-bit decode
    /// consumed more than 10 bytes.
    VarintOverrun,
    /// An on-wire type code outside 1..=17.
    UnknownTypeCode(u32),
    /// An algorithm that requires at least one vertex was given none
    /// (e.g. the minimum bounding circle solver).
    EmptyInput,
    /// Two bounding boxes being compared/merged didn't carry matching
    /// dimension flags.
    FlagsMismatch,
    /// An unrecognized `key=value` token, or unrecognized key, in an option
    /// list (see §6).
    InvalidOption(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DimensionMismatch => write!(f, "dimensions mismatch"),
            Error::InvalidSubtype { parent, found } => {
                write!(f, "invalid subtype {found} for collection type {parent}")
            }
            Error::OutOfRange { index, len } => {
                write!(f, "point index {index} out of range (len {len})")
            }
            Error::Malformed(msg) => write!(f, "malformed input: {msg}"),
            Error::VarintOverrun => write!(f, "varint decode overran buffer"),
            Error::UnknownTypeCode(code) => write!(f, "unknown geometry type code {code}"),
            Error::EmptyInput => write!(f, "operation requires at least one point"),
            Error::FlagsMismatch => write!(f, "bounding box dimension flags mismatch"),
            Error::InvalidOption(opt) => write!(f, "invalid option: {opt}"),
        }
    }
}

impl std::error::Error for Error {}

/// Any short read/write against a serialized buffer surfaces as a
/// malformed-input error (byteorder's `io::Error` carries no detail worth
/// preserving here — the buffer is simply too short).
impl From<std::io::Error> for Error {
    fn from(_: std::io::Error) -> Self {
        Error::Malformed("unexpected end of serialized buffer")
    }
}

pub type Result<T> = core::result::Result<T, Error>;
