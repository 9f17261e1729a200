//! Flat packed array of 2D/3D/3DM/4D coordinate tuples (§4.C5).

use crate::error::{Error, Result};
use crate::flags::GFlags;

/// A single coordinate with up to four ordinates, always stored X, Y, then
/// Z then M. Ordinates not present per the owning array's flags are left
/// at [`NO_VALUE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord4D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub m: f64,
}

/// Sentinel fill value for dimensions a point doesn't carry (§4.C6
/// `force_dims`).
pub const NO_VALUE: f64 = 0.0;

impl Coord4D {
    pub const fn xy(x: f64, y: f64) -> Self {
        Coord4D { x, y, z: NO_VALUE, m: NO_VALUE }
    }

    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Coord4D { x, y, z, m: NO_VALUE }
    }

    pub const fn xym(x: f64, y: f64, m: f64) -> Self {
        Coord4D { x, y, z: NO_VALUE, m }
    }

    pub const fn xyzm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Coord4D { x, y, z, m }
    }

    pub fn has_nan_xy(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
}

/// A flat array of packed coordinates sharing one dimensionality.
///
/// The C original distinguishes owning arrays from "read-only" arrays that
/// alias a serialized buffer. This port always owns its coordinates
/// (see `DESIGN.md`'s note on the zero-copy deserialize tradeoff); the
/// `readonly` bit is retained purely so flags round-trip on the wire and so
/// `clone` vs `clone_deep` remain meaningfully distinct operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointArray {
    flags: GFlags,
    /// Flattened coordinates, `ndims()` values per point.
    data: Vec<f64>,
}

impl PointArray {
    /// Owning constructor: `npoints` zero-initialized points.
    pub fn construct(has_z: bool, has_m: bool, npoints: usize) -> Self {
        let flags = GFlags::new(has_z, has_m);
        PointArray { flags, data: vec![NO_VALUE; npoints * flags.ndims()] }
    }

    /// Owning, empty, but pre-allocated for `initial_capacity` points.
    pub fn construct_empty(has_z: bool, has_m: bool, initial_capacity: usize) -> Self {
        let flags = GFlags::new(has_z, has_m);
        PointArray {
            flags,
            data: Vec::with_capacity(initial_capacity * flags.ndims()),
        }
    }

    /// Builds an array from already-flattened coordinate data (the
    /// `construct_reference_data` entry point of the spec). See the module
    /// doc comment for why this copies rather than aliases.
    pub fn construct_reference_data(has_z: bool, has_m: bool, data: Vec<f64>) -> Self {
        let flags = GFlags::new(has_z, has_m).set_readonly(true);
        debug_assert_eq!(data.len() % flags.ndims(), 0);
        PointArray { flags, data }
    }

    pub fn flags(&self) -> GFlags {
        self.flags
    }

    pub fn npoints(&self) -> usize {
        self.data.len() / self.flags.ndims()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn ndims(&self) -> usize {
        self.flags.ndims()
    }

    fn check_index(&self, i: usize) -> Result<()> {
        let len = self.npoints();
        if i >= len {
            Err(Error::OutOfRange { index: i, len })
        } else {
            Ok(())
        }
    }

    /// Direct view onto the flattened coordinates of point `i`.
    pub fn get_point_internal(&self, i: usize) -> Result<&[f64]> {
        self.check_index(i)?;
        let nd = self.ndims();
        Ok(&self.data[i * nd..(i + 1) * nd])
    }

    pub fn get_point_2d(&self, i: usize) -> Result<(f64, f64)> {
        let p = self.get_point_internal(i)?;
        Ok((p[0], p[1]))
    }

    pub fn get_point_3d(&self, i: usize) -> Result<(f64, f64, f64)> {
        let p = self.get_point_internal(i)?;
        let z = if self.flags.get_z() { p[2] } else { NO_VALUE };
        Ok((p[0], p[1], z))
    }

    pub fn get_point_4d(&self, i: usize) -> Result<Coord4D> {
        let p = self.get_point_internal(i)?;
        let mut idx = 2;
        let z = if self.flags.get_z() {
            let v = p[idx];
            idx += 1;
            v
        } else {
            NO_VALUE
        };
        let m = if self.flags.get_m() { p[idx] } else { NO_VALUE };
        Ok(Coord4D { x: p[0], y: p[1], z, m })
    }

    /// Writes only the ordinates present per this array's flags.
    pub fn set_point_4d(&mut self, i: usize, p: Coord4D) -> Result<()> {
        self.check_index(i)?;
        let nd = self.ndims();
        let has_z = self.flags.get_z();
        let has_m = self.flags.get_m();
        let base = i * nd;
        self.data[base] = p.x;
        self.data[base + 1] = p.y;
        let mut idx = base + 2;
        if has_z {
            self.data[idx] = p.z;
            idx += 1;
        }
        if has_m {
            self.data[idx] = p.m;
        }
        Ok(())
    }

    fn push_coord(&mut self, p: Coord4D) {
        self.data.push(p.x);
        self.data.push(p.y);
        if self.flags.get_z() {
            self.data.push(p.z);
        }
        if self.flags.get_m() {
            self.data.push(p.m);
        }
    }

    /// Appends a point; if `allow_duplicates` is false and the new point
    /// equals the current last point, it is silently dropped.
    pub fn append_point(&mut self, p: Coord4D, allow_duplicates: bool) {
        if !allow_duplicates {
            if let Some(last) = (self.npoints() > 0)
                .then(|| self.get_point_4d(self.npoints() - 1).unwrap())
            {
                if last == p {
                    return;
                }
            }
        }
        self.push_coord(p);
    }

    pub fn remove_point(&mut self, i: usize) -> Result<()> {
        self.check_index(i)?;
        let nd = self.ndims();
        let base = i * nd;
        self.data.drain(base..base + nd);
        Ok(())
    }

    pub fn insert_point(&mut self, i: usize, p: Coord4D) -> Result<()> {
        let len = self.npoints();
        if i > len {
            return Err(Error::OutOfRange { index: i, len });
        }
        let nd = self.ndims();
        let base = i * nd;
        let mut tmp = PointArray {
            flags: self.flags,
            data: Vec::new(),
        };
        tmp.push_coord(p);
        self.data.splice(base..base, tmp.data);
        Ok(())
    }

    pub fn reverse(&mut self) {
        let nd = self.ndims();
        let n = self.npoints();
        for i in 0..n / 2 {
            let j = n - 1 - i;
            for k in 0..nd {
                self.data.swap(i * nd + k, j * nd + k);
            }
        }
    }

    /// Deep copy, regardless of the `readonly` flag.
    pub fn clone_deep(&self) -> Self {
        self.clone()
    }

    pub fn is_closed_2d(&self) -> bool {
        let n = self.npoints();
        if n == 0 {
            return false;
        }
        let (x0, y0) = self.get_point_2d(0).unwrap();
        let (x1, y1) = self.get_point_2d(n - 1).unwrap();
        x0 == x1 && y0 == y1
    }

    pub fn is_closed_3d(&self) -> bool {
        let n = self.npoints();
        if n == 0 {
            return false;
        }
        let a = self.get_point_4d(0).unwrap();
        let b = self.get_point_4d(n - 1).unwrap();
        a.x == b.x && a.y == b.y && a.z == b.z
    }

    /// Sign of the XY-projected shoelace area; `true` means
    /// counterclockwise winding.
    pub fn is_counterclockwise(&self) -> bool {
        let n = self.npoints();
        if n < 3 {
            return false;
        }
        let mut area = 0.0;
        for i in 0..n {
            let (x0, y0) = self.get_point_2d(i).unwrap();
            let (x1, y1) = self.get_point_2d((i + 1) % n).unwrap();
            area += x0 * y1 - x1 * y0;
        }
        area > 0.0
    }

    /// Builds a copy with exactly the requested dimensionality, zero-filling
    /// added ordinates with [`NO_VALUE`] and dropping ordinates that aren't
    /// requested (§4.C6 `force_dims`).
    pub fn with_dims(&self, has_z: bool, has_m: bool) -> PointArray {
        let mut out = PointArray::construct_empty(has_z, has_m, self.npoints());
        for p in self.iter_points() {
            out.push_coord(p);
        }
        out
    }

    /// Strips points whose X or Y is NaN, compacting in place
    /// (§9 "GEOS friendliness"). Returns the number of points dropped.
    pub fn strip_nan(&mut self) -> usize {
        let nd = self.ndims();
        let n = self.npoints();
        let mut kept = Vec::with_capacity(self.data.len());
        let mut dropped = 0;
        for i in 0..n {
            let p = &self.data[i * nd..(i + 1) * nd];
            if p[0].is_nan() || p[1].is_nan() {
                dropped += 1;
            } else {
                kept.extend_from_slice(p);
            }
        }
        self.data = kept;
        if dropped > 0 {
            log::warn!("strip_nan: dropped {dropped} NaN-bearing point(s) of {n}");
        }
        dropped
    }

    pub fn iter_points(&self) -> impl Iterator<Item = Coord4D> + '_ {
        (0..self.npoints()).map(move |i| self.get_point_4d(i).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_zero_fills() {
        let pa = PointArray::construct(true, false, 2);
        assert_eq!(pa.npoints(), 2);
        assert_eq!(pa.get_point_4d(0).unwrap(), Coord4D::xyz(0.0, 0.0, 0.0));
    }

    #[test]
    fn get_point_out_of_range_errors() {
        let pa = PointArray::construct(false, false, 1);
        assert!(pa.get_point_2d(1).is_err());
    }

    #[test]
    fn set_point_4d_writes_only_present_dims() {
        let mut pa = PointArray::construct(false, true, 1);
        pa.set_point_4d(0, Coord4D::xyzm(1.0, 2.0, 99.0, 3.0)).unwrap();
        let got = pa.get_point_4d(0).unwrap();
        assert_eq!(got, Coord4D::xym(1.0, 2.0, 3.0));
    }

    #[test]
    fn append_point_dedups_when_disallowed() {
        let mut pa = PointArray::construct_empty(false, false, 4);
        pa.append_point(Coord4D::xy(0.0, 0.0), false);
        pa.append_point(Coord4D::xy(0.0, 0.0), false);
        assert_eq!(pa.npoints(), 1);
        pa.append_point(Coord4D::xy(0.0, 0.0), true);
        assert_eq!(pa.npoints(), 2);
    }

    #[test]
    fn reverse_flips_order() {
        let mut pa = PointArray::construct_empty(false, false, 2);
        pa.append_point(Coord4D::xy(0.0, 0.0), true);
        pa.append_point(Coord4D::xy(1.0, 1.0), true);
        pa.reverse();
        assert_eq!(pa.get_point_2d(0).unwrap(), (1.0, 1.0));
        assert_eq!(pa.get_point_2d(1).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn is_closed_2d_checks_endpoints() {
        let mut pa = PointArray::construct_empty(false, false, 4);
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)] {
            pa.append_point(Coord4D::xy(x, y), true);
        }
        assert!(pa.is_closed_2d());
    }

    #[test]
    fn counterclockwise_sign() {
        let mut ccw = PointArray::construct_empty(false, false, 4);
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)] {
            ccw.append_point(Coord4D::xy(x, y), true);
        }
        assert!(ccw.is_counterclockwise());

        let mut cw = PointArray::construct_empty(false, false, 4);
        for (x, y) in [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 0.0)] {
            cw.append_point(Coord4D::xy(x, y), true);
        }
        assert!(!cw.is_counterclockwise());
    }

    #[test]
    fn strip_nan_compacts() {
        let mut pa = PointArray::construct_empty(false, false, 3);
        pa.append_point(Coord4D::xy(0.0, 0.0), true);
        pa.append_point(Coord4D::xy(f64::NAN, 1.0), true);
        pa.append_point(Coord4D::xy(2.0, 2.0), true);
        let dropped = pa.strip_nan();
        assert_eq!(dropped, 1);
        assert_eq!(pa.npoints(), 2);
    }

    #[test]
    fn insert_and_remove_point() {
        let mut pa = PointArray::construct_empty(false, false, 2);
        pa.append_point(Coord4D::xy(0.0, 0.0), true);
        pa.append_point(Coord4D::xy(2.0, 2.0), true);
        pa.insert_point(1, Coord4D::xy(1.0, 1.0)).unwrap();
        assert_eq!(pa.npoints(), 3);
        assert_eq!(pa.get_point_2d(1).unwrap(), (1.0, 1.0));
        pa.remove_point(1).unwrap();
        assert_eq!(pa.npoints(), 2);
        assert_eq!(pa.get_point_2d(1).unwrap(), (2.0, 2.0));
    }
}
