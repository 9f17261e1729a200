//! Spatial index support (§4.C11, §4.C13): a ring R-tree for point-in-ring
//! acceleration, plus the SP-GiST oct-tree splitter/consistency functions
//! over `BOX3D` and `GIDX` keys. There is no index host in this crate —
//! these are the algorithms a host would call into.

mod ring_rtree;
mod spgist3d;
mod spgist_nd;

pub use ring_rtree::{RingRTree, RingRTreeCache};
pub use spgist3d::{
    choose as choose_3d, inner_consistent as inner_consistent_3d,
    leaf_consistent as leaf_consistent_3d, octant_code as octant_code_3d, picksplit as picksplit_3d,
    Cube as Cube3D, Predicate as Predicate3D, NODE_COUNT_3D,
};
pub use spgist_nd::{
    choose as choose_nd, inner_consistent as inner_consistent_nd,
    leaf_consistent as leaf_consistent_nd, octant_code as octant_code_nd, picksplit as picksplit_nd,
    Cube as CubeNd, Predicate as PredicateNd, GIDX_MAX_NODES,
};
