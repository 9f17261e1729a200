//! A geometry engine core: a tagged recursive geometry tree, bounding-box
//! algebra, a circular-arc-aware Cartesian bbox solver, binary and TWKB
//! wire codecs, a minimum-bounding-circle solver, and the spatial-index
//! support (ring R-tree, SP-GiST oct-tree splitters) that sits over it.
//!
//! See `SPEC_FULL.md` for the full module-by-module requirements and
//! `DESIGN.md` for how each module is grounded.

mod bbox;
mod bytebuffer;
mod error;
mod flags;
mod forcedims;
mod geometry;
mod index;
mod mbc;
mod pointarray;
mod serialize;
mod twkb;
mod util;
mod varint;

pub use bbox::{calculate_gbox, next_float_down, next_float_up, Box3D, GBox, Gidx, GIDX_MAX_DIM};
pub use bytebuffer::ByteBuffer;
pub use error::{Error, Result};
pub use flags::GFlags;
pub use geometry::{
    CircularString, CompoundCurve, CurvePolygon, GeomHeader, Geometry, GeometryCollection,
    GeometryType, LineString, MultiCurve, MultiLineString, MultiPoint, MultiPolygon, MultiSurface,
    Point, Polygon, PolyhedralSurface, Tin, Triangle, SRID_UNKNOWN,
};
pub use index::{
    choose_3d, choose_nd, inner_consistent_3d, inner_consistent_nd, leaf_consistent_3d,
    leaf_consistent_nd, octant_code_3d, octant_code_nd, picksplit_3d, picksplit_nd, Cube3D, CubeNd,
    Predicate3D, PredicateNd, RingRTree, RingRTreeCache, GIDX_MAX_NODES, NODE_COUNT_3D,
};
pub use mbc::{flatten_xy, geometry_mbc, minimum_bounding_circle, Circle};
pub use pointarray::{Coord4D, PointArray, NO_VALUE};
pub use serialize::{deserialize, serialize};
pub use twkb::{decode as twkb_decode, encode as twkb_encode, TwkbOpts};
pub use util::{OptionList, StringList};
