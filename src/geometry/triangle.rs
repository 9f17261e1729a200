use crate::error::{Error, Result};
use crate::geometry::header::GeomHeader;
use crate::geometry::types::GeometryType;
use crate::pointarray::PointArray;

/// A closed ring of exactly 4 points (3 distinct vertices, first == last).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    pub header: GeomHeader,
    pub points: PointArray,
}

impl Triangle {
    pub const TYPE: GeometryType = GeometryType::Triangle;

    pub fn new(srid: i32, points: PointArray) -> Result<Self> {
        if points.npoints() != 0 && points.npoints() != 4 {
            return Err(Error::Malformed("triangle ring must have 0 or 4 points"));
        }
        if points.npoints() == 4 && !points.is_closed_2d() {
            return Err(Error::Malformed("triangle ring must be closed"));
        }
        Ok(Triangle { header: GeomHeader::new(srid, points.flags()), points })
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn count_vertices(&self) -> usize {
        self.points.npoints()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointarray::Coord4D;

    fn ring(coords: &[(f64, f64)]) -> PointArray {
        let mut pa = PointArray::construct_empty(false, false, coords.len());
        for &(x, y) in coords {
            pa.append_point(Coord4D::xy(x, y), true);
        }
        pa
    }

    #[test]
    fn accepts_closed_four_point_ring() {
        let pa = ring(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)]);
        assert!(Triangle::new(0, pa).is_ok());
    }

    #[test]
    fn rejects_unclosed_ring() {
        let pa = ring(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        assert!(Triangle::new(0, pa).is_err());
    }

    #[test]
    fn rejects_wrong_point_count() {
        let pa = ring(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        assert!(Triangle::new(0, pa).is_err());
    }
}
