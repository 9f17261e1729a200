//! The part of §3's tagged geometry record that's common to every variant:
//! `{flags, srid, optional bbox}`. The `type` tag and `payload` live in the
//! concrete per-variant structs (`Point`, `LineString`, ...).

use crate::bbox::GBox;
use crate::flags::GFlags;

/// SRID `0` means "unknown" (§3).
pub const SRID_UNKNOWN: i32 = 0;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeomHeader {
    pub srid: i32,
    pub flags: GFlags,
    pub bbox: Option<GBox>,
}

impl GeomHeader {
    pub fn new(srid: i32, flags: GFlags) -> Self {
        GeomHeader { srid, flags, bbox: None }
    }

    pub fn empty(has_z: bool, has_m: bool) -> Self {
        GeomHeader::new(SRID_UNKNOWN, GFlags::new(has_z, has_m))
    }
}
