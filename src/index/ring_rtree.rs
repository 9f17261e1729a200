//! Ring R-tree (§4.C11): accelerates point-in-polygon via horizontal
//! scan-line intersection counting.

use crate::geometry::{Geometry, LineString};
use crate::pointarray::{Coord4D, PointArray};

/// One segment of a ring, `(p0, p1)` plus its Y-interval.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    p0: Coord4D,
    p1: Coord4D,
}

enum Node {
    Leaf { ymin: f64, ymax: f64, segment: Segment },
    Branch { ymin: f64, ymax: f64, children: Vec<Node> },
}

impl Node {
    fn ymin(&self) -> f64 {
        match self {
            Node::Leaf { ymin, .. } => *ymin,
            Node::Branch { ymin, .. } => *ymin,
        }
    }

    fn ymax(&self) -> f64 {
        match self {
            Node::Leaf { ymax, .. } => *ymax,
            Node::Branch { ymax, .. } => *ymax,
        }
    }

    fn contains_y(&self, y: f64) -> bool {
        y >= self.ymin() && y <= self.ymax()
    }
}

/// A built ring R-tree: an in-order binary grouping of a ring's segments
/// by Y-interval.
pub struct RingRTree {
    root: Option<Node>,
}

impl RingRTree {
    /// Builds the tree for a ring with `N` points, producing `N-1` leaf
    /// segments grouped pairwise (unioning Y-intervals) until one root
    /// remains. An odd child count promotes its last member unchanged.
    pub fn build(ring: &PointArray) -> Self {
        let n = ring.npoints();
        if n < 2 {
            return RingRTree { root: None };
        }
        let mut level: Vec<Node> = (0..n - 1)
            .map(|i| {
                let p0 = ring.get_point_4d(i).unwrap();
                let p1 = ring.get_point_4d(i + 1).unwrap();
                let ymin = p0.y.min(p1.y);
                let ymax = p0.y.max(p1.y);
                Node::Leaf { ymin, ymax, segment: Segment { p0, p1 } }
            })
            .collect();

        while level.len() > 1 {
            let mut next = Vec::with_capacity((level.len() + 1) / 2);
            let mut it = level.into_iter();
            loop {
                let a = match it.next() {
                    Some(a) => a,
                    None => break,
                };
                match it.next() {
                    Some(b) => {
                        let ymin = a.ymin().min(b.ymin());
                        let ymax = a.ymax().max(b.ymax());
                        next.push(Node::Branch { ymin, ymax, children: vec![a, b] });
                    }
                    None => next.push(a),
                }
            }
            level = next;
        }
        RingRTree { root: level.into_iter().next() }
    }

    /// Segments whose Y-interval contains the scan-line `y`, as a
    /// `MultiLineString` of 2-point candidates.
    pub fn find_segments_crossing(&self, y: f64) -> Geometry {
        let mut segs = Vec::new();
        if let Some(root) = &self.root {
            collect(root, y, &mut segs);
        }
        let mut mls = crate::geometry::MultiLineString::construct_empty(0, false, false);
        for seg in segs {
            let mut pa = PointArray::construct_empty(false, false, 2);
            pa.append_point(seg.p0, true);
            pa.append_point(seg.p1, true);
            let ls = LineString::new(0, pa).expect("2-point segment is always a valid linestring");
            mls.add_geom(ls.into()).expect("LineString is always a permitted MultiLineString child");
        }
        mls.into()
    }
}

fn collect(node: &Node, y: f64, out: &mut Vec<Segment>) {
    if !node.contains_y(y) {
        return;
    }
    match node {
        Node::Leaf { segment, .. } => out.push(*segment),
        Node::Branch { children, .. } => {
            for c in children {
                collect(c, y, out);
            }
        }
    }
}

/// Per-polygon cache keyed by a byte-identity comparison of the serialized
/// ring. Rebuilds on mismatch rather than trying to diff the old and new
/// rings (§4.C11's "cache" note). Ownership is the host's per-call
/// context, never a process-global (§5).
#[derive(Default)]
pub struct RingRTreeCache {
    entry: Option<(Vec<u8>, RingRTree)>,
}

impl RingRTreeCache {
    pub fn new() -> Self {
        RingRTreeCache::default()
    }

    /// Returns the cached tree for `ring` if its serialized bytes still
    /// match what's cached, rebuilding and replacing the cache otherwise.
    pub fn get_or_build(&mut self, ring: &PointArray, ring_bytes: &[u8]) -> &RingRTree {
        let stale = match &self.entry {
            Some((cached_bytes, _)) => cached_bytes.as_slice() != ring_bytes,
            None => true,
        };
        if stale {
            self.entry = Some((ring_bytes.to_vec(), RingRTree::build(ring)));
        }
        &self.entry.as_ref().unwrap().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_ring() -> PointArray {
        let mut pa = PointArray::construct_empty(false, false, 5);
        for (x, y) in [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)] {
            pa.append_point(Coord4D::xy(x, y), true);
        }
        pa
    }

    #[test]
    fn build_produces_n_minus_one_leaves() {
        let ring = square_ring();
        let tree = RingRTree::build(&ring);
        // A horizontal scan through the middle crosses exactly 2 of the
        // square's 4 edges (the two vertical sides).
        let crossing = tree.find_segments_crossing(2.0);
        if let Geometry::MultiLineString(mls) = crossing {
            assert_eq!(mls.len(), 2);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn scan_line_outside_ring_crosses_nothing() {
        let ring = square_ring();
        let tree = RingRTree::build(&ring);
        let crossing = tree.find_segments_crossing(10.0);
        if let Geometry::MultiLineString(mls) = crossing {
            assert!(mls.is_empty());
        } else {
            unreachable!();
        }
    }

    #[test]
    fn cache_rebuilds_on_byte_mismatch() {
        let mut cache = RingRTreeCache::new();
        let ring_a = square_ring();
        cache.get_or_build(&ring_a, b"ring-a");
        assert_eq!(cache.entry.as_ref().unwrap().0, b"ring-a");

        let mut ring_b = square_ring();
        ring_b.reverse();
        cache.get_or_build(&ring_b, b"ring-b");
        assert_eq!(cache.entry.as_ref().unwrap().0, b"ring-b");
    }
}
