use crate::error::Result;
use crate::flags::GFlags;
use crate::geometry::header::GeomHeader;
use crate::geometry::types::GeometryType;
use crate::pointarray::{Coord4D, PointArray};

/// A single point, or the empty point (`npoints == 0`) — the only leaf
/// type allowed to be empty via an empty [`PointArray`] rather than a
/// `None` payload (§3).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub header: GeomHeader,
    pub points: PointArray,
}

impl Point {
    pub const TYPE: GeometryType = GeometryType::Point;

    pub fn new(srid: i32, coord: Coord4D, has_z: bool, has_m: bool) -> Self {
        let mut points = PointArray::construct(has_z, has_m, 1);
        points.set_point_4d(0, coord).expect("index 0 of a 1-point array");
        Point { header: GeomHeader::new(srid, points.flags()), points }
    }

    pub fn construct_empty(srid: i32, has_z: bool, has_m: bool) -> Self {
        Point {
            header: GeomHeader::new(srid, GFlags::new(has_z, has_m)),
            points: PointArray::construct(has_z, has_m, 0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn count_vertices(&self) -> usize {
        self.points.npoints()
    }

    pub fn coord(&self) -> Result<Coord4D> {
        self.points.get_point_4d(0)
    }
}
