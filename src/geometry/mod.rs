//! The tagged, recursive geometry type system (§3, §4.C6).

pub(crate) mod circular_string;
pub(crate) mod collection;
pub(crate) mod header;
pub(crate) mod line_string;
pub(crate) mod point;
pub(crate) mod polygon;
pub(crate) mod triangle;
pub(crate) mod types;

pub use circular_string::CircularString;
pub use collection::{
    CompoundCurve, CurvePolygon, GeometryCollection, MultiCurve, MultiLineString, MultiPoint,
    MultiPolygon, MultiSurface, PolyhedralSurface, Tin,
};
pub use header::{GeomHeader, SRID_UNKNOWN};
pub use line_string::LineString;
pub use point::Point;
pub use polygon::Polygon;
pub use triangle::Triangle;
pub use types::GeometryType;

use crate::bbox::GBox;
use crate::error::Result;
use crate::flags::GFlags;

/// The tagged sum type: dispatch is always on `GeometryType`, never on a
/// vtable (§9's "Inheritance-flavored typing" note).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    Triangle(Triangle),
    CircularString(CircularString),
    CompoundCurve(CompoundCurve),
    CurvePolygon(CurvePolygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    MultiCurve(MultiCurve),
    MultiSurface(MultiSurface),
    PolyhedralSurface(PolyhedralSurface),
    Tin(Tin),
    GeometryCollection(GeometryCollection),
}

/// Implements the common pattern where `Geometry` simply delegates to its
/// inner variant, mirroring `geo_types::geometry_delegate_impl!`.
macro_rules! delegate {
    ($self:expr, $g:ident => $body:expr) => {
        match $self {
            Geometry::Point($g) => $body,
            Geometry::LineString($g) => $body,
            Geometry::Polygon($g) => $body,
            Geometry::Triangle($g) => $body,
            Geometry::CircularString($g) => $body,
            Geometry::CompoundCurve($g) => $body,
            Geometry::CurvePolygon($g) => $body,
            Geometry::MultiPoint($g) => $body,
            Geometry::MultiLineString($g) => $body,
            Geometry::MultiPolygon($g) => $body,
            Geometry::MultiCurve($g) => $body,
            Geometry::MultiSurface($g) => $body,
            Geometry::PolyhedralSurface($g) => $body,
            Geometry::Tin($g) => $body,
            Geometry::GeometryCollection($g) => $body,
        }
    };
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::Triangle(_) => GeometryType::Triangle,
            Geometry::CircularString(_) => GeometryType::CircularString,
            Geometry::CompoundCurve(_) => GeometryType::CompoundCurve,
            Geometry::CurvePolygon(_) => GeometryType::CurvePolygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::MultiCurve(_) => GeometryType::MultiCurve,
            Geometry::MultiSurface(_) => GeometryType::MultiSurface,
            Geometry::PolyhedralSurface(_) => GeometryType::PolyhedralSurface,
            Geometry::Tin(_) => GeometryType::Tin,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    pub fn header(&self) -> &GeomHeader {
        delegate!(self, g => &g.header)
    }

    pub fn header_mut(&mut self) -> &mut GeomHeader {
        delegate!(self, g => &mut g.header)
    }

    pub fn flags(&self) -> GFlags {
        self.header().flags
    }

    pub fn srid(&self) -> i32 {
        self.header().srid
    }

    pub fn bbox(&self) -> Option<&GBox> {
        self.header().bbox.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        delegate!(self, g => g.is_empty())
    }

    pub fn count_vertices(&self) -> usize {
        delegate!(self, g => g.count_vertices())
    }

    /// Computes the Cartesian bounding box into `self.header.bbox`, using
    /// the flags already set on this geometry (§4.C6 `calculate_gbox`,
    /// implemented in `bbox::compute`).
    pub fn calculate_gbox(&self) -> Result<GBox> {
        crate::bbox::calculate_gbox(self)
    }

    /// Produces a deep copy with every point array forced to the
    /// requested dimensionality, zero-filling added dimensions with
    /// [`crate::pointarray::NO_VALUE`] (§4.C6).
    pub fn force_dims(&self, has_z: bool, has_m: bool) -> Geometry {
        crate::forcedims::force_dims(self, has_z, has_m)
    }

    /// Deep copy. Rust's ownership model means `clone()` is already always
    /// a deep copy (there is no aliasing "read-only" payload to share) —
    /// `clone_deep` exists to mirror the spec's naming and is a plain
    /// alias.
    pub fn clone_deep(&self) -> Geometry {
        self.clone()
    }
}

impl From<Point> for Geometry {
    fn from(g: Point) -> Self {
        Geometry::Point(g)
    }
}
impl From<LineString> for Geometry {
    fn from(g: LineString) -> Self {
        Geometry::LineString(g)
    }
}
impl From<Polygon> for Geometry {
    fn from(g: Polygon) -> Self {
        Geometry::Polygon(g)
    }
}
impl From<Triangle> for Geometry {
    fn from(g: Triangle) -> Self {
        Geometry::Triangle(g)
    }
}
impl From<CircularString> for Geometry {
    fn from(g: CircularString) -> Self {
        Geometry::CircularString(g)
    }
}
impl From<MultiPoint> for Geometry {
    fn from(g: MultiPoint) -> Self {
        Geometry::MultiPoint(g)
    }
}
impl From<MultiLineString> for Geometry {
    fn from(g: MultiLineString) -> Self {
        Geometry::MultiLineString(g)
    }
}
impl From<MultiPolygon> for Geometry {
    fn from(g: MultiPolygon) -> Self {
        Geometry::MultiPolygon(g)
    }
}
impl From<GeometryCollection> for Geometry {
    fn from(g: GeometryCollection) -> Self {
        Geometry::GeometryCollection(g)
    }
}
impl From<CompoundCurve> for Geometry {
    fn from(g: CompoundCurve) -> Self {
        Geometry::CompoundCurve(g)
    }
}
impl From<CurvePolygon> for Geometry {
    fn from(g: CurvePolygon) -> Self {
        Geometry::CurvePolygon(g)
    }
}
impl From<MultiCurve> for Geometry {
    fn from(g: MultiCurve) -> Self {
        Geometry::MultiCurve(g)
    }
}
impl From<MultiSurface> for Geometry {
    fn from(g: MultiSurface) -> Self {
        Geometry::MultiSurface(g)
    }
}
impl From<PolyhedralSurface> for Geometry {
    fn from(g: PolyhedralSurface) -> Self {
        Geometry::PolyhedralSurface(g)
    }
}
impl From<Tin> for Geometry {
    fn from(g: Tin) -> Self {
        Geometry::Tin(g)
    }
}
