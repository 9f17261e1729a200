//! Packed header bits carrying dimensionality and storage mode (§4.C4).

/// 8 packed bits: `hasZ`, `hasM`, `hasBBOX`, `isGeodetic`, `readonly`,
/// `solid`, plus 2 reserved bits.
///
/// Coordinate order is always X, Y, then Z then M; `ndims()` derives the
/// coordinate width from the flags rather than storing it separately, so
/// the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GFlags(u8);

const BIT_Z: u8 = 0b0000_0001;
const BIT_M: u8 = 0b0000_0010;
const BIT_BBOX: u8 = 0b0000_0100;
const BIT_GEODETIC: u8 = 0b0000_1000;
const BIT_READONLY: u8 = 0b0001_0000;
const BIT_SOLID: u8 = 0b0010_0000;

impl GFlags {
    /// Builds flags from the only two bits that affect coordinate layout.
    pub const fn new(has_z: bool, has_m: bool) -> Self {
        let mut bits = 0u8;
        if has_z {
            bits |= BIT_Z;
        }
        if has_m {
            bits |= BIT_M;
        }
        GFlags(bits)
    }

    pub const fn from_bits(bits: u8) -> Self {
        GFlags(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn get_z(self) -> bool {
        self.0 & BIT_Z != 0
    }

    pub const fn get_m(self) -> bool {
        self.0 & BIT_M != 0
    }

    pub const fn get_bbox(self) -> bool {
        self.0 & BIT_BBOX != 0
    }

    pub const fn get_geodetic(self) -> bool {
        self.0 & BIT_GEODETIC != 0
    }

    pub const fn get_readonly(self) -> bool {
        self.0 & BIT_READONLY != 0
    }

    pub const fn get_solid(self) -> bool {
        self.0 & BIT_SOLID != 0
    }

    fn set_bit(self, bit: u8, value: bool) -> Self {
        if value {
            GFlags(self.0 | bit)
        } else {
            GFlags(self.0 & !bit)
        }
    }

    #[must_use]
    pub fn set_z(self, value: bool) -> Self {
        self.set_bit(BIT_Z, value)
    }

    #[must_use]
    pub fn set_m(self, value: bool) -> Self {
        self.set_bit(BIT_M, value)
    }

    #[must_use]
    pub fn set_bbox(self, value: bool) -> Self {
        self.set_bit(BIT_BBOX, value)
    }

    #[must_use]
    pub fn set_geodetic(self, value: bool) -> Self {
        self.set_bit(BIT_GEODETIC, value)
    }

    #[must_use]
    pub fn set_readonly(self, value: bool) -> Self {
        self.set_bit(BIT_READONLY, value)
    }

    #[must_use]
    pub fn set_solid(self, value: bool) -> Self {
        self.set_bit(BIT_SOLID, value)
    }

    /// `2 + hasZ + hasM`.
    pub const fn ndims(self) -> usize {
        2 + self.get_z() as usize + self.get_m() as usize
    }

    /// Like `ndims`, but geodetic boxes are always 3 (XYZ on the unit
    /// sphere) regardless of the M flag.
    pub const fn ndims_box(self) -> usize {
        if self.get_geodetic() {
            3
        } else {
            self.ndims()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndims_derivation() {
        assert_eq!(GFlags::new(false, false).ndims(), 2);
        assert_eq!(GFlags::new(true, false).ndims(), 3);
        assert_eq!(GFlags::new(false, true).ndims(), 3);
        assert_eq!(GFlags::new(true, true).ndims(), 4);
    }

    #[test]
    fn ndims_box_geodetic_always_three() {
        let f = GFlags::new(true, true).set_geodetic(true);
        assert_eq!(f.ndims_box(), 3);
        assert_eq!(f.ndims(), 4);
    }

    #[test]
    fn setters_are_pure() {
        let base = GFlags::new(false, false);
        let with_z = base.set_z(true);
        assert!(!base.get_z());
        assert!(with_z.get_z());
    }

    #[test]
    fn round_trip_all_bits() {
        let f = GFlags::new(true, true)
            .set_bbox(true)
            .set_geodetic(true)
            .set_readonly(true)
            .set_solid(true);
        assert!(f.get_z() && f.get_m() && f.get_bbox() && f.get_geodetic());
        assert!(f.get_readonly() && f.get_solid());
        assert_eq!(GFlags::from_bits(f.bits()), f);
    }
}
