//! BOX3D: always-3D double-precision bounding box used at the outer
//! interface (§4.C7), e.g. as the centroid type fed to the 3D SP-GiST
//! splitter.

use crate::bbox::GBox;
use crate::flags::GFlags;
use crate::util::print_double;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Box3D {
    pub srid: i32,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
}

impl Box3D {
    pub fn new(srid: i32) -> Self {
        Box3D {
            srid,
            xmin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymin: f64::INFINITY,
            ymax: f64::NEG_INFINITY,
            zmin: f64::INFINITY,
            zmax: f64::NEG_INFINITY,
        }
    }

    /// Converts a [`GBox`] into a BOX3D, treating an absent Z range as
    /// `[0, 0]` (grounded on `lwgeom_box3d.c`'s `box3d_from_gbox`).
    pub fn from_gbox(srid: i32, b: &GBox) -> Self {
        let (zmin, zmax) = if b.flags.get_z() || b.flags.get_geodetic() {
            (b.zmin, b.zmax)
        } else {
            (0.0, 0.0)
        };
        Box3D { srid, xmin: b.xmin, xmax: b.xmax, ymin: b.ymin, ymax: b.ymax, zmin, zmax }
    }

    pub fn to_gbox(&self, has_m: bool) -> GBox {
        let flags = GFlags::new(true, has_m);
        let mut b = GBox::empty(flags);
        b.xmin = self.xmin;
        b.xmax = self.xmax;
        b.ymin = self.ymin;
        b.ymax = self.ymax;
        b.zmin = self.zmin;
        b.zmax = self.zmax;
        b
    }

    /// Pure union, grounded on `lwgeom_box3d.c`'s `box3d_union`.
    pub fn union(&self, other: &Box3D) -> Box3D {
        Box3D {
            srid: self.srid,
            xmin: self.xmin.min(other.xmin),
            xmax: self.xmax.max(other.xmax),
            ymin: self.ymin.min(other.ymin),
            ymax: self.ymax.max(other.ymax),
            zmin: self.zmin.min(other.zmin),
            zmax: self.zmax.max(other.zmax),
        }
    }

    fn overlaps_1d(min_a: f64, max_a: f64, min_b: f64, max_b: f64) -> bool {
        min_a <= max_b && min_b <= max_a
    }

    pub fn overlaps(&self, other: &Box3D) -> bool {
        Self::overlaps_1d(self.xmin, self.xmax, other.xmin, other.xmax)
            && Self::overlaps_1d(self.ymin, self.ymax, other.ymin, other.ymax)
            && Self::overlaps_1d(self.zmin, self.zmax, other.zmin, other.zmax)
    }

    pub fn contains(&self, other: &Box3D) -> bool {
        self.xmin <= other.xmin
            && other.xmax <= self.xmax
            && self.ymin <= other.ymin
            && other.ymax <= self.ymax
            && self.zmin <= other.zmin
            && other.zmax <= self.zmax
    }

    pub fn contained(&self, other: &Box3D) -> bool {
        other.contains(self)
    }

    pub fn same(&self, other: &Box3D) -> bool {
        self.xmin == other.xmin
            && self.xmax == other.xmax
            && self.ymin == other.ymin
            && self.ymax == other.ymax
            && self.zmin == other.zmin
            && self.zmax == other.zmax
    }

    // --- the 27 interval-relation predicates (left/right/above/below/
    // front/back, each strict or "over", plus contains/contained/overlaps/
    // same already above, plus distance). ---

    pub fn left(&self, other: &Box3D) -> bool {
        self.xmax < other.xmin
    }
    pub fn overleft(&self, other: &Box3D) -> bool {
        self.xmax <= other.xmax
    }
    pub fn right(&self, other: &Box3D) -> bool {
        self.xmin > other.xmax
    }
    pub fn overright(&self, other: &Box3D) -> bool {
        self.xmin >= other.xmin
    }
    pub fn below(&self, other: &Box3D) -> bool {
        self.ymax < other.ymin
    }
    pub fn overbelow(&self, other: &Box3D) -> bool {
        self.ymax <= other.ymax
    }
    pub fn above(&self, other: &Box3D) -> bool {
        self.ymin > other.ymax
    }
    pub fn overabove(&self, other: &Box3D) -> bool {
        self.ymin >= other.ymin
    }
    pub fn front(&self, other: &Box3D) -> bool {
        self.zmax < other.zmin
    }
    pub fn overfront(&self, other: &Box3D) -> bool {
        self.zmax <= other.zmax
    }
    pub fn back(&self, other: &Box3D) -> bool {
        self.zmin > other.zmax
    }
    pub fn overback(&self, other: &Box3D) -> bool {
        self.zmin >= other.zmin
    }

    /// Euclidean distance between the closest points of the two boxes, 0
    /// if they overlap.
    pub fn distance(&self, other: &Box3D) -> f64 {
        let d = |amin: f64, amax: f64, bmin: f64, bmax: f64| -> f64 {
            if amax < bmin {
                bmin - amax
            } else if bmax < amin {
                amin - bmax
            } else {
                0.0
            }
        };
        let dx = d(self.xmin, self.xmax, other.xmin, other.xmax);
        let dy = d(self.ymin, self.ymax, other.ymin, other.ymax);
        let dz = d(self.zmin, self.zmax, other.zmin, other.zmax);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// `"BOX3D(xmin ymin zmin,xmax ymax zmax)"` with `%.15g`-style digits.
    pub fn to_box3d_string(&self) -> String {
        format!(
            "BOX3D({} {} {},{} {} {})",
            print_double(self.xmin, 15),
            print_double(self.ymin, 15),
            print_double(self.zmin, 15),
            print_double(self.xmax, 15),
            print_double(self.ymax, 15),
            print_double(self.zmax, 15),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(xmin: f64, xmax: f64, ymin: f64, ymax: f64, zmin: f64, zmax: f64) -> Box3D {
        Box3D { srid: 0, xmin, xmax, ymin, ymax, zmin, zmax }
    }

    #[test]
    fn overlaps_requires_every_axis() {
        let a = b(0.0, 1.0, 0.0, 1.0, 0.0, 1.0);
        let touching = b(1.0, 2.0, 0.0, 1.0, 0.0, 1.0);
        let disjoint_z = b(0.0, 1.0, 0.0, 1.0, 2.0, 3.0);
        assert!(a.overlaps(&touching));
        assert!(!a.overlaps(&disjoint_z));
    }

    #[test]
    fn left_right_above_below_front_back() {
        let a = b(0.0, 1.0, 0.0, 1.0, 0.0, 1.0);
        let right_of_a = b(2.0, 3.0, 0.0, 1.0, 0.0, 1.0);
        assert!(a.left(&right_of_a));
        assert!(right_of_a.right(&a));
        assert!(!a.above(&right_of_a));
    }

    #[test]
    fn distance_zero_when_overlapping() {
        let a = b(0.0, 1.0, 0.0, 1.0, 0.0, 1.0);
        assert_eq!(a.distance(&a), 0.0);
        let far = b(10.0, 11.0, 0.0, 1.0, 0.0, 1.0);
        assert_eq!(a.distance(&far), 9.0);
    }

    #[test]
    fn text_form() {
        let a = b(0.0, 1.0, 0.0, 1.0, 0.0, 1.0);
        assert_eq!(a.to_box3d_string(), "BOX3D(0 0 0,1 1 1)");
    }
}
