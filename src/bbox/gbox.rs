//! GBOX: double-precision Cartesian or geodetic axis-aligned bounding box,
//! up to 4D (§4.C7).

use crate::error::{Error, Result};
use crate::flags::GFlags;
use crate::pointarray::Coord4D;
use crate::util::print_double;

/// A double-precision bounding box. `z`/`m` ranges are only meaningful when
/// `flags.get_z()`/`flags.get_m()` say so; geodetic boxes always carry XYZ
/// (points are projected onto the unit sphere before the box is computed,
/// see `bbox::compute`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GBox {
    pub flags: GFlags,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
    pub mmin: f64,
    pub mmax: f64,
}

impl GBox {
    /// A box covering nothing; `flags` only affects which
    /// dimensions `merge`/`overlaps`/etc. consider.
    pub fn empty(flags: GFlags) -> Self {
        GBox {
            flags,
            xmin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymin: f64::INFINITY,
            ymax: f64::NEG_INFINITY,
            zmin: f64::INFINITY,
            zmax: f64::NEG_INFINITY,
            mmin: f64::INFINITY,
            mmax: f64::NEG_INFINITY,
        }
    }

    pub fn from_point(flags: GFlags, p: Coord4D) -> Self {
        let mut b = GBox::empty(flags);
        b.merge_point(p);
        b
    }

    fn same_flags(&self, other: &GBox) -> bool {
        self.flags.get_z() == other.flags.get_z()
            && self.flags.get_m() == other.flags.get_m()
            && self.flags.get_geodetic() == other.flags.get_geodetic()
    }

    /// Grows `self` to enclose `p` on every dimension present in `self`'s
    /// flags (the spec's `gbox_merge_point3d`, generalized to whatever
    /// dimensions this box actually carries).
    pub fn merge_point(&mut self, p: Coord4D) {
        self.xmin = self.xmin.min(p.x);
        self.xmax = self.xmax.max(p.x);
        self.ymin = self.ymin.min(p.y);
        self.ymax = self.ymax.max(p.y);
        if self.flags.get_z() || self.flags.get_geodetic() {
            self.zmin = self.zmin.min(p.z);
            self.zmax = self.zmax.max(p.z);
        }
        if self.flags.get_m() {
            self.mmin = self.mmin.min(p.m);
            self.mmax = self.mmax.max(p.m);
        }
    }

    /// Grows `self` to enclose `other` (the spec's `gbox_merge(other,
    /// self)` — `self` plays the role of the box being grown). Errors if
    /// the two boxes don't carry the same dimension flags.
    pub fn merge(&mut self, other: &GBox) -> Result<()> {
        if !self.same_flags(other) {
            return Err(Error::FlagsMismatch);
        }
        self.xmin = self.xmin.min(other.xmin);
        self.xmax = self.xmax.max(other.xmax);
        self.ymin = self.ymin.min(other.ymin);
        self.ymax = self.ymax.max(other.ymax);
        if self.flags.get_z() || self.flags.get_geodetic() {
            self.zmin = self.zmin.min(other.zmin);
            self.zmax = self.zmax.max(other.zmax);
        }
        if self.flags.get_m() {
            self.mmin = self.mmin.min(other.mmin);
            self.mmax = self.mmax.max(other.mmax);
        }
        Ok(())
    }

    /// Pure variant of `merge`: returns a new box rather than mutating.
    /// Grounded on `lwgeom_box3d.c`'s `box3d_union` (see `SPEC_FULL.md`).
    pub fn union(&self, other: &GBox) -> Result<GBox> {
        let mut out = *self;
        out.merge(other)?;
        Ok(out)
    }

    /// Like `merge`, but either input may itself be absent (an empty
    /// collection child). Grounded on `g_box.c`'s `gbox_union_opt`.
    pub fn merge_opt(a: Option<&GBox>, b: Option<&GBox>) -> Option<GBox> {
        match (a, b) {
            (Some(a), Some(b)) => a.union(b).ok(),
            (Some(a), None) => Some(*a),
            (None, Some(b)) => Some(*b),
            (None, None) => None,
        }
    }

    pub fn contains_point(&self, p: Coord4D) -> bool {
        if p.x < self.xmin || p.x > self.xmax || p.y < self.ymin || p.y > self.ymax {
            return false;
        }
        if (self.flags.get_z() || self.flags.get_geodetic())
            && (p.z < self.zmin || p.z > self.zmax)
        {
            return false;
        }
        if self.flags.get_m() && (p.m < self.mmin || p.m > self.mmax) {
            return false;
        }
        true
    }

    /// True iff the intervals overlap on every dimension present in both
    /// boxes. Errors on mismatched dimension flags.
    pub fn overlaps(&self, other: &GBox) -> Result<bool> {
        if !self.same_flags(other) {
            return Err(Error::FlagsMismatch);
        }
        let mut ok = self.xmin <= other.xmax && other.xmin <= self.xmax;
        ok &= self.ymin <= other.ymax && other.ymin <= self.ymax;
        if self.flags.get_z() || self.flags.get_geodetic() {
            ok &= self.zmin <= other.zmax && other.zmin <= self.zmax;
        }
        if self.flags.get_m() {
            ok &= self.mmin <= other.mmax && other.mmin <= self.mmax;
        }
        Ok(ok)
    }

    /// Exact equality on present dimensions.
    pub fn same(&self, other: &GBox) -> Result<bool> {
        if !self.same_flags(other) {
            return Err(Error::FlagsMismatch);
        }
        let mut eq = self.xmin == other.xmin && self.xmax == other.xmax;
        eq &= self.ymin == other.ymin && self.ymax == other.ymax;
        if self.flags.get_z() || self.flags.get_geodetic() {
            eq &= self.zmin == other.zmin && self.zmax == other.zmax;
        }
        if self.flags.get_m() {
            eq &= self.mmin == other.mmin && self.mmax == other.mmax;
        }
        Ok(eq)
    }

    /// Expands every present dimension's range by `±d`.
    pub fn expand(&mut self, d: f64) {
        self.xmin -= d;
        self.xmax += d;
        self.ymin -= d;
        self.ymax += d;
        if self.flags.get_z() || self.flags.get_geodetic() {
            self.zmin -= d;
            self.zmax += d;
        }
        if self.flags.get_m() {
            self.mmin -= d;
            self.mmax += d;
        }
    }

    /// `"GBOX((min…),(max…))"` with `%.8g`-style digit counts.
    pub fn to_gbox_string(&self) -> String {
        let nd = self.flags.ndims_box();
        let mut mins = vec![print_double(self.xmin, 8), print_double(self.ymin, 8)];
        let mut maxs = vec![print_double(self.xmax, 8), print_double(self.ymax, 8)];
        if nd >= 3 {
            mins.push(print_double(self.zmin, 8));
            maxs.push(print_double(self.zmax, 8));
        }
        if self.flags.get_m() && !self.flags.get_geodetic() && nd >= 4 {
            mins.push(print_double(self.mmin, 8));
            maxs.push(print_double(self.mmax, 8));
        }
        format!("GBOX(({}),({}))", mins.join(","), maxs.join(","))
    }

    /// Parses the text form produced by `to_gbox_string`.
    pub fn from_gbox_string(s: &str, flags: GFlags) -> Result<GBox> {
        let inner = s
            .strip_prefix("GBOX(")
            .and_then(|s| s.strip_suffix(")"))
            .ok_or(Error::Malformed("expected GBOX(...)"))?;
        let (min_part, max_part) = inner
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .and_then(|s| s.split_once("),("))
            .ok_or(Error::Malformed("expected (min),(max)"))?;
        let parse_list = |part: &str| -> Result<Vec<f64>> {
            part.split(',')
                .map(|v| v.trim().parse::<f64>().map_err(|_| Error::Malformed("bad float in GBOX")))
                .collect()
        };
        let mins = parse_list(min_part)?;
        let maxs = parse_list(max_part)?;
        let mut b = GBox::empty(flags);
        b.xmin = mins[0];
        b.ymin = mins[1];
        b.xmax = maxs[0];
        b.ymax = maxs[1];
        let nd = flags.ndims_box();
        if nd >= 3 {
            b.zmin = *mins.get(2).ok_or(Error::Malformed("missing z in GBOX"))?;
            b.zmax = *maxs.get(2).ok_or(Error::Malformed("missing z in GBOX"))?;
        }
        if flags.get_m() && !flags.get_geodetic() && nd >= 4 {
            b.mmin = *mins.get(3).ok_or(Error::Malformed("missing m in GBOX"))?;
            b.mmax = *maxs.get(3).ok_or(Error::Malformed("missing m in GBOX"))?;
        }
        Ok(b)
    }

    /// Number of 32-bit floats used by the serialized bbox: 6 when
    /// geodetic, else `2 * ndims`.
    pub fn serialized_size(flags: GFlags) -> usize {
        if flags.get_geodetic() {
            6
        } else {
            2 * flags.ndims()
        }
    }
}

#[cfg(any(feature = "approx", test))]
impl approx::AbsDiffEq for GBox {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.flags == other.flags
            && self.xmin.abs_diff_eq(&other.xmin, epsilon)
            && self.xmax.abs_diff_eq(&other.xmax, epsilon)
            && self.ymin.abs_diff_eq(&other.ymin, epsilon)
            && self.ymax.abs_diff_eq(&other.ymax, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_gbox_has_zero_extent() {
        let flags = GFlags::new(false, false);
        let b = GBox::from_point(flags, Coord4D::xy(0.0, 0.0));
        assert_eq!(b.xmin, 0.0);
        assert_eq!(b.xmax, 0.0);
        assert_eq!(b.ymin, 0.0);
        assert_eq!(b.ymax, 0.0);
    }

    #[test]
    fn merge_grows_to_enclose() {
        let flags = GFlags::new(false, false);
        let mut b = GBox::from_point(flags, Coord4D::xy(0.0, 0.0));
        let other = GBox::from_point(flags, Coord4D::xy(5.0, -5.0));
        b.merge(&other).unwrap();
        assert_eq!((b.xmin, b.xmax, b.ymin, b.ymax), (0.0, 5.0, -5.0, 0.0));
    }

    #[test]
    fn merge_rejects_mismatched_flags() {
        let mut a = GBox::empty(GFlags::new(true, false));
        let b = GBox::empty(GFlags::new(false, false));
        assert!(a.merge(&b).is_err());
    }

    #[test]
    fn overlaps_and_same() {
        let flags = GFlags::new(false, false);
        let a = GBox::from_point(flags, Coord4D::xy(0.0, 0.0)).union(&GBox::from_point(flags, Coord4D::xy(2.0, 2.0))).unwrap();
        let b = GBox::from_point(flags, Coord4D::xy(1.0, 1.0)).union(&GBox::from_point(flags, Coord4D::xy(3.0, 3.0))).unwrap();
        assert!(a.overlaps(&b).unwrap());
        assert!(a.same(&a).unwrap());
        assert!(!a.same(&b).unwrap());
    }

    #[test]
    fn expand_grows_every_present_dimension() {
        let flags = GFlags::new(true, false);
        let mut b = GBox::from_point(flags, Coord4D::xyz(1.0, 1.0, 1.0));
        b.expand(1.0);
        assert_eq!(b.xmin, 0.0);
        assert_eq!(b.zmax, 2.0);
    }

    #[test]
    fn text_round_trip() {
        let flags = GFlags::new(false, false);
        let b = GBox::from_point(flags, Coord4D::xy(0.0, 0.0))
            .union(&GBox::from_point(flags, Coord4D::xy(1.0, 1.0)))
            .unwrap();
        let s = b.to_gbox_string();
        let parsed = GBox::from_gbox_string(&s, flags).unwrap();
        assert_eq!(b, parsed);
    }

    #[test]
    fn serialized_size_matches_dims() {
        assert_eq!(GBox::serialized_size(GFlags::new(false, false)), 4);
        assert_eq!(GBox::serialized_size(GFlags::new(true, true)), 8);
        assert_eq!(
            GBox::serialized_size(GFlags::new(true, true).set_geodetic(true)),
            6
        );
    }
}
