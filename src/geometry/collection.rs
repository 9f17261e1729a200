//! The nine "collection" geometry shapes (§3): an ordered sequence of
//! child geometries under a type-constraint predicate. Structurally
//! identical, so a macro generates one distinct Rust type per spec
//! variant — the same reasoning `geo_types::geometry_delegate_impl!`
//! applies to trait impls, applied here to struct definitions.

use crate::error::{Error, Result};
use crate::flags::GFlags;
use crate::geometry::header::GeomHeader;
use crate::geometry::types::GeometryType;
use crate::geometry::Geometry;

macro_rules! define_collection {
    ($name:ident, $variant:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            pub header: GeomHeader,
            pub geoms: Vec<Geometry>,
        }

        impl $name {
            pub const TYPE: GeometryType = GeometryType::$variant;

            pub fn construct_empty(srid: i32, has_z: bool, has_m: bool) -> Self {
                $name {
                    header: GeomHeader::new(srid, GFlags::new(has_z, has_m)),
                    geoms: Vec::new(),
                }
            }

            /// Appends `child`, checking the §3 type-constraint table and
            /// that `child`'s `(hasZ, hasM)` matches this collection's.
            pub fn add_geom(&mut self, child: Geometry) -> Result<()> {
                let child_type = child.geometry_type();
                if !Self::TYPE.permits_child(child_type) {
                    return Err(Error::InvalidSubtype {
                        parent: Self::TYPE.name(),
                        found: child_type.name(),
                    });
                }
                let child_flags = child.flags();
                if child_flags.get_z() != self.header.flags.get_z()
                    || child_flags.get_m() != self.header.flags.get_m()
                {
                    return Err(Error::DimensionMismatch);
                }
                self.geoms.push(child);
                Ok(())
            }

            pub fn is_empty(&self) -> bool {
                self.geoms.is_empty()
            }

            pub fn count_vertices(&self) -> usize {
                self.geoms.iter().map(Geometry::count_vertices).sum()
            }

            pub fn len(&self) -> usize {
                self.geoms.len()
            }
        }
    };
}

define_collection!(MultiPoint, MultiPoint, "A collection of `Point`s.");
define_collection!(MultiLineString, MultiLineString, "A collection of `LineString`s.");
define_collection!(MultiPolygon, MultiPolygon, "A collection of `Polygon`s.");
define_collection!(
    CompoundCurve,
    CompoundCurve,
    "A chain of `LineString`/`CircularString` segments sharing endpoints."
);
define_collection!(
    CurvePolygon,
    CurvePolygon,
    "A polygon-like ring sequence whose rings may be curved."
);
define_collection!(MultiCurve, MultiCurve, "A collection of curve geometries.");
define_collection!(MultiSurface, MultiSurface, "A collection of surface geometries.");
define_collection!(
    PolyhedralSurface,
    PolyhedralSurface,
    "A collection of `Polygon` faces forming a (possibly non-manifold) surface."
);
define_collection!(Tin, Tin, "A collection of `Triangle`s forming a triangulated surface.");
define_collection!(
    GeometryCollection,
    GeometryCollection,
    "A collection of arbitrary geometries."
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point;
    use crate::pointarray::Coord4D;

    #[test]
    fn add_geom_enforces_type_constraint() {
        let mut mp = MultiPoint::construct_empty(0, false, false);
        let p = Point::new(0, Coord4D::xy(0.0, 0.0), false, false);
        assert!(mp.add_geom(Geometry::Point(p)).is_ok());

        let ls = crate::geometry::line_string::LineString::construct_empty(0, false, false);
        assert!(mp.add_geom(Geometry::LineString(ls)).is_err());
    }

    #[test]
    fn add_geom_enforces_dimension_match() {
        let mut mp = MultiPoint::construct_empty(0, true, false);
        let p = Point::new(0, Coord4D::xy(0.0, 0.0), false, false);
        assert!(mp.add_geom(Geometry::Point(p)).is_err());
    }

    #[test]
    fn duplicate_children_are_both_kept() {
        // Rust's ownership model means there's no "same pointer" child to
        // special-case: every `add_geom` call moves a distinct value in.
        // See DESIGN.md's note on this Open Question.
        let mut mp = MultiPoint::construct_empty(0, false, false);
        let p = Point::new(0, Coord4D::xy(1.0, 1.0), false, false);
        mp.add_geom(Geometry::Point(p.clone())).unwrap();
        mp.add_geom(Geometry::Point(p)).unwrap();
        assert_eq!(mp.len(), 2);
    }
}
