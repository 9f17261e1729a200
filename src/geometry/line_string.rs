use crate::error::{Error, Result};
use crate::flags::GFlags;
use crate::geometry::header::GeomHeader;
use crate::geometry::types::GeometryType;
use crate::pointarray::PointArray;

/// `npoints ∈ {0, ≥2}` — single-point linestrings are forbidden (§3); they
/// must be normalized away by `make_geos_friendly` (§9).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineString {
    pub header: GeomHeader,
    pub points: PointArray,
}

impl LineString {
    pub const TYPE: GeometryType = GeometryType::LineString;

    pub fn new(srid: i32, points: PointArray) -> Result<Self> {
        if points.npoints() == 1 {
            return Err(Error::Malformed("linestring cannot have exactly one point"));
        }
        Ok(LineString { header: GeomHeader::new(srid, points.flags()), points })
    }

    pub fn construct_empty(srid: i32, has_z: bool, has_m: bool) -> Self {
        LineString {
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

    pub fn is_closed(&self) -> bool {
        self.points.is_closed_2d()
    }

    /// Drops NaN-bearing vertices in place, re-checking the "no
    /// single-point linestring" invariant (§9).
    pub fn make_geos_friendly(&mut self) {
        self.points.strip_nan();
        if self.points.npoints() == 1 {
            // A single surviving vertex can't form a valid linestring;
            // collapse to empty rather than violate the invariant.
            self.points = PointArray::construct_empty(
                self.header.flags.get_z(),
                self.header.flags.get_m(),
                0,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointarray::Coord4D;

    fn line(coords: &[(f64, f64)]) -> PointArray {
        let mut pa = PointArray::construct_empty(false, false, coords.len());
        for &(x, y) in coords {
            pa.append_point(Coord4D::xy(x, y), true);
        }
        pa
    }

    #[test]
    fn rejects_single_point() {
        let pa = line(&[(0.0, 0.0)]);
        assert!(LineString::new(0, pa).is_err());
    }

    #[test]
    fn accepts_empty_and_two_plus() {
        assert!(LineString::new(0, line(&[])).is_ok());
        assert!(LineString::new(0, line(&[(0.0, 0.0), (1.0, 1.0)])).is_ok());
    }

    #[test]
    fn make_geos_friendly_collapses_to_empty_when_one_point_survives() {
        let pa = line(&[(0.0, 0.0), (f64::NAN, 1.0)]);
        let mut ls = LineString::new(0, pa).unwrap();
        ls.make_geos_friendly();
        assert!(ls.is_empty());
    }
}
