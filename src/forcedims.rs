//! `force_dims` (§4.C6): produces a deep copy of a geometry tree where
//! every point array has exactly the requested dimensionality.

use crate::flags::GFlags;
use crate::geometry::*;

pub fn force_dims(geom: &Geometry, has_z: bool, has_m: bool) -> Geometry {
    match geom {
        Geometry::Point(g) => Geometry::Point(Point {
            header: retagged(&g.header, has_z, has_m),
            points: g.points.with_dims(has_z, has_m),
        }),
        Geometry::LineString(g) => Geometry::LineString(LineString {
            header: retagged(&g.header, has_z, has_m),
            points: g.points.with_dims(has_z, has_m),
        }),
        Geometry::Triangle(g) => Geometry::Triangle(Triangle {
            header: retagged(&g.header, has_z, has_m),
            points: g.points.with_dims(has_z, has_m),
        }),
        Geometry::CircularString(g) => Geometry::CircularString(CircularString {
            header: retagged(&g.header, has_z, has_m),
            points: g.points.with_dims(has_z, has_m),
        }),
        Geometry::Polygon(g) => Geometry::Polygon(Polygon {
            header: retagged(&g.header, has_z, has_m),
            rings: g.rings.iter().map(|r| r.with_dims(has_z, has_m)).collect(),
        }),
        Geometry::CompoundCurve(g) => Geometry::CompoundCurve(CompoundCurve {
            header: retagged(&g.header, has_z, has_m),
            geoms: force_dims_all(&g.geoms, has_z, has_m),
        }),
        Geometry::CurvePolygon(g) => Geometry::CurvePolygon(CurvePolygon {
            header: retagged(&g.header, has_z, has_m),
            geoms: force_dims_all(&g.geoms, has_z, has_m),
        }),
        Geometry::MultiPoint(g) => Geometry::MultiPoint(MultiPoint {
            header: retagged(&g.header, has_z, has_m),
            geoms: force_dims_all(&g.geoms, has_z, has_m),
        }),
        Geometry::MultiLineString(g) => Geometry::MultiLineString(MultiLineString {
            header: retagged(&g.header, has_z, has_m),
            geoms: force_dims_all(&g.geoms, has_z, has_m),
        }),
        Geometry::MultiPolygon(g) => Geometry::MultiPolygon(MultiPolygon {
            header: retagged(&g.header, has_z, has_m),
            geoms: force_dims_all(&g.geoms, has_z, has_m),
        }),
        Geometry::MultiCurve(g) => Geometry::MultiCurve(MultiCurve {
            header: retagged(&g.header, has_z, has_m),
            geoms: force_dims_all(&g.geoms, has_z, has_m),
        }),
        Geometry::MultiSurface(g) => Geometry::MultiSurface(MultiSurface {
            header: retagged(&g.header, has_z, has_m),
            geoms: force_dims_all(&g.geoms, has_z, has_m),
        }),
        Geometry::PolyhedralSurface(g) => Geometry::PolyhedralSurface(PolyhedralSurface {
            header: retagged(&g.header, has_z, has_m),
            geoms: force_dims_all(&g.geoms, has_z, has_m),
        }),
        Geometry::Tin(g) => Geometry::Tin(Tin {
            header: retagged(&g.header, has_z, has_m),
            geoms: force_dims_all(&g.geoms, has_z, has_m),
        }),
        Geometry::GeometryCollection(g) => Geometry::GeometryCollection(GeometryCollection {
            header: retagged(&g.header, has_z, has_m),
            geoms: force_dims_all(&g.geoms, has_z, has_m),
        }),
    }
}

fn force_dims_all(geoms: &[Geometry], has_z: bool, has_m: bool) -> Vec<Geometry> {
    geoms.iter().map(|g| force_dims(g, has_z, has_m)).collect()
}

fn retagged(header: &GeomHeader, has_z: bool, has_m: bool) -> GeomHeader {
    GeomHeader {
        srid: header.srid,
        flags: GFlags::new(has_z, has_m),
        // A bbox computed for the old dimensionality isn't valid for the
        // new one; the caller recomputes via `calculate_gbox` if needed.
        bbox: None,
    }
}
