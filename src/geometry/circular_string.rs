use crate::error::{Error, Result};
use crate::flags::GFlags;
use crate::geometry::header::GeomHeader;
use crate::geometry::types::GeometryType;
use crate::pointarray::PointArray;

/// `npoints ∈ {0} ∪ odd integers ≥ 3`; every arc is a triple
/// `(start, arc-mid, end)` where consecutive arcs share endpoints (§3).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CircularString {
    pub header: GeomHeader,
    pub points: PointArray,
}

impl CircularString {
    pub const TYPE: GeometryType = GeometryType::CircularString;

    pub fn new(srid: i32, points: PointArray) -> Result<Self> {
        let n = points.npoints();
        if n != 0 && (n < 3 || n % 2 == 0) {
            return Err(Error::Malformed(
                "circular string must have 0 points or an odd number >= 3",
            ));
        }
        Ok(CircularString { header: GeomHeader::new(srid, points.flags()), points })
    }

    pub fn construct_empty(srid: i32, has_z: bool, has_m: bool) -> Self {
        CircularString {
            header: GeomHeader::new(srid, GFlags::new(has_z, has_m)),
            points: PointArray::construct_empty(has_z, has_m, 0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn count_vertices(&self) -> usize {
        self.points.npoints()
    }

    /// Number of arcs: `(npoints - 1) / 2`.
    pub fn num_arcs(&self) -> usize {
        let n = self.points.npoints();
        if n == 0 {
            0
        } else {
            (n - 1) / 2
        }
    }

    /// `(start, mid, end)` of arc `i`.
    pub fn arc(&self, i: usize) -> Result<(usize, usize, usize)> {
        if i >= self.num_arcs() {
            return Err(Error::OutOfRange { index: i, len: self.num_arcs() });
        }
        Ok((2 * i, 2 * i + 1, 2 * i + 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointarray::Coord4D;

    fn pts(coords: &[(f64, f64)]) -> PointArray {
        let mut pa = PointArray::construct_empty(false, false, coords.len());
        for &(x, y) in coords {
            pa.append_point(Coord4D::xy(x, y), true);
        }
        pa
    }

    #[test]
    fn accepts_single_arc() {
        let pa = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let cs = CircularString::new(0, pa).unwrap();
        assert_eq!(cs.num_arcs(), 1);
        assert_eq!(cs.arc(0).unwrap(), (0, 1, 2));
    }

    #[test]
    fn rejects_even_point_count() {
        let pa = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0)]);
        assert!(CircularString::new(0, pa).is_err());
    }

    #[test]
    fn rejects_short_nonempty() {
        let pa = pts(&[(0.0, 0.0)]);
        assert!(CircularString::new(0, pa).is_err());
    }

    #[test]
    fn two_arcs_share_endpoint() {
        let pa = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0), (4.0, 0.0)]);
        let cs = CircularString::new(0, pa).unwrap();
        assert_eq!(cs.num_arcs(), 2);
        assert_eq!(cs.arc(1).unwrap(), (2, 3, 4));
    }
}
