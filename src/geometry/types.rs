//! On-wire geometry type codes (§6) — a closed set of small integers. The
//! type code alone determines a geometry's recursion structure (§3): leaf,
//! polygon-shaped, or collection-shaped.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum GeometryType {
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
    CircularString = 8,
    CompoundCurve = 9,
    CurvePolygon = 10,
    MultiCurve = 11,
    MultiSurface = 12,
    PolyhedralSurface = 15,
    Tin = 16,
    Triangle = 17,
}

impl GeometryType {
    pub fn from_code(code: u32) -> Result<Self> {
        use GeometryType::*;
        Ok(match code {
            1 => Point,
            2 => LineString,
            3 => Polygon,
            4 => MultiPoint,
            5 => MultiLineString,
            6 => MultiPolygon,
            7 => GeometryCollection,
            8 => CircularString,
            9 => CompoundCurve,
            10 => CurvePolygon,
            11 => MultiCurve,
            12 => MultiSurface,
            15 => PolyhedralSurface,
            16 => Tin,
            17 => Triangle,
            other => return Err(Error::UnknownTypeCode(other)),
        })
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    /// Leaf types own exactly one [`PointArray`](crate::pointarray::PointArray).
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            GeometryType::Point
                | GeometryType::LineString
                | GeometryType::Triangle
                | GeometryType::CircularString
        )
    }

    /// Polygon-shaped types own an ordered sequence of rings.
    pub fn is_polygon_shaped(self) -> bool {
        matches!(self, GeometryType::Polygon)
    }

    /// Collection-shaped types own an ordered sequence of child geometries.
    pub fn is_collection(self) -> bool {
        matches!(
            self,
            GeometryType::MultiPoint
                | GeometryType::MultiLineString
                | GeometryType::MultiPolygon
                | GeometryType::CompoundCurve
                | GeometryType::CurvePolygon
                | GeometryType::MultiCurve
                | GeometryType::MultiSurface
                | GeometryType::PolyhedralSurface
                | GeometryType::Tin
                | GeometryType::GeometryCollection
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
            GeometryType::CircularString => "CircularString",
            GeometryType::CompoundCurve => "CompoundCurve",
            GeometryType::CurvePolygon => "CurvePolygon",
            GeometryType::MultiCurve => "MultiCurve",
            GeometryType::MultiSurface => "MultiSurface",
            GeometryType::PolyhedralSurface => "PolyhedralSurface",
            GeometryType::Tin => "Tin",
            GeometryType::Triangle => "Triangle",
        }
    }

    /// True if `child` is a permitted member of a collection of type
    /// `self`, per the parent/child table in §3.
    pub fn permits_child(self, child: GeometryType) -> bool {
        use GeometryType::*;
        match self {
            MultiPoint => child == Point,
            MultiLineString => child == LineString,
            MultiPolygon => child == Polygon,
            CompoundCurve => matches!(child, LineString | CircularString),
            CurvePolygon => matches!(child, LineString | CircularString | CompoundCurve),
            MultiCurve => matches!(child, CircularString | LineString | CompoundCurve),
            MultiSurface => matches!(child, Polygon | CurvePolygon),
            PolyhedralSurface => child == Polygon,
            Tin => child == Triangle,
            GeometryCollection => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_codes() {
        for code in [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 15, 16, 17] {
            let t = GeometryType::from_code(code).unwrap();
            assert_eq!(t.code(), code);
        }
    }

    #[test]
    fn rejects_unknown_codes() {
        for code in [0, 13, 14, 18, 100] {
            assert!(GeometryType::from_code(code).is_err());
        }
    }

    #[test]
    fn child_type_constraints() {
        assert!(GeometryType::MultiPoint.permits_child(GeometryType::Point));
        assert!(!GeometryType::MultiPoint.permits_child(GeometryType::LineString));
        assert!(GeometryType::CompoundCurve.permits_child(GeometryType::CircularString));
        assert!(!GeometryType::CompoundCurve.permits_child(GeometryType::Polygon));
        assert!(GeometryType::GeometryCollection.permits_child(GeometryType::Polygon));
    }
}
