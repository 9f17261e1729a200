//! Per-geometry Cartesian bounding box computation (§4.C8), including the
//! circular-arc center/sweep/bbox algorithm.

use crate::bbox::GBox;
use crate::error::{Error, Result};
use crate::flags::GFlags;
use crate::geometry::{CircularString, Geometry, Polygon};
use crate::pointarray::{Coord4D, PointArray};

/// Tolerance below which three arc-defining points are treated as collinear.
const COLLINEAR_EPS: f64 = 1e-10;

pub fn calculate_gbox(geom: &Geometry) -> Result<GBox> {
    let flags = geom.flags();
    match geom {
        Geometry::Point(g) => Ok(points_bbox(flags, &g.points)),
        Geometry::LineString(g) => Ok(points_bbox(flags, &g.points)),
        Geometry::Triangle(g) => Ok(points_bbox(flags, &g.points)),
        Geometry::Polygon(g) => polygon_bbox(flags, g),
        Geometry::CircularString(g) => circular_string_bbox(flags, g),
        Geometry::CompoundCurve(g) => children_bbox(flags, &g.geoms),
        Geometry::CurvePolygon(g) => children_bbox(flags, &g.geoms),
        Geometry::MultiPoint(g) => children_bbox(flags, &g.geoms),
        Geometry::MultiLineString(g) => children_bbox(flags, &g.geoms),
        Geometry::MultiPolygon(g) => children_bbox(flags, &g.geoms),
        Geometry::MultiCurve(g) => children_bbox(flags, &g.geoms),
        Geometry::MultiSurface(g) => children_bbox(flags, &g.geoms),
        Geometry::PolyhedralSurface(g) => children_bbox(flags, &g.geoms),
        Geometry::Tin(g) => children_bbox(flags, &g.geoms),
        Geometry::GeometryCollection(g) => children_bbox(flags, &g.geoms),
    }
}

fn points_bbox(flags: GFlags, pa: &PointArray) -> GBox {
    let mut b = GBox::empty(flags);
    for p in pa.iter_points() {
        b.merge_point(p);
    }
    b
}

/// Only the outer ring matters: holes are invariantly inside it.
fn polygon_bbox(flags: GFlags, poly: &Polygon) -> Result<GBox> {
    match poly.exterior() {
        Some(ring) => Ok(points_bbox(flags, ring)),
        None => Err(Error::EmptyInput),
    }
}

fn children_bbox(flags: GFlags, children: &[Geometry]) -> Result<GBox> {
    if children.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut out: Option<GBox> = None;
    for child in children {
        if child.is_empty() {
            continue;
        }
        let child_box = calculate_gbox(child)?;
        out = Some(match out {
            Some(acc) => acc.union(&child_box)?,
            None => child_box,
        });
    }
    out.ok_or(Error::EmptyInput)
}

fn circular_string_bbox(flags: GFlags, cs: &CircularString) -> Result<GBox> {
    if cs.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut b = GBox::empty(flags);
    for i in 0..cs.num_arcs() {
        let (i1, i2, i3) = cs.arc(i)?;
        let p1 = cs.points.get_point_4d(i1)?;
        let p2 = cs.points.get_point_4d(i2)?;
        let p3 = cs.points.get_point_4d(i3)?;
        arc_bbox(p1, p2, p3, &mut b);
    }
    Ok(b)
}

/// Grows `b` to enclose the arc through `p1, p2, p3` (§4.C8 steps 1-5).
fn arc_bbox(p1: Coord4D, p2: Coord4D, p3: Coord4D, b: &mut GBox) {
    b.merge_point(p1);
    b.merge_point(p3);
    // Z/M vary linearly along the arc parameterization; endpoints already
    // bound them, only X/Y need the circular treatment.
    match arc_center_radius(p1, p2, p3) {
        None => {
            // Collinear: the "arc" degenerates to the p1-p3 segment.
            b.merge_point(p2);
        }
        Some((cx, cy, r)) => {
            let a1 = (p1.y - cy).atan2(p1.x - cx);
            let a2 = (p2.y - cy).atan2(p2.x - cx);
            let a3 = (p3.y - cy).atan2(p3.x - cx);
            let sweep = signed_sweep(a1, a2, a3);
            for k in 0..4 {
                let theta = k as f64 * std::f64::consts::FRAC_PI_2;
                if angle_in_sweep(theta - a1, sweep) {
                    let x = cx + r * (a1 + (theta - a1)).cos();
                    let y = cy + r * (a1 + (theta - a1)).sin();
                    b.merge_point(Coord4D { x, y, z: p1.z, m: p1.m });
                }
            }
        }
    }
}

/// Solves the perpendicular-bisector intersection for the circle through
/// `p1, p2, p3`. When `p1 == p3` this is a full circle with center at the
/// midpoint of `p1, p2`. Returns `None` when the three points are collinear.
fn arc_center_radius(p1: Coord4D, p2: Coord4D, p3: Coord4D) -> Option<(f64, f64, f64)> {
    if p1.x == p3.x && p1.y == p3.y {
        let cx = (p1.x + p2.x) / 2.0;
        let cy = (p1.y + p2.y) / 2.0;
        let r = ((p1.x - cx).powi(2) + (p1.y - cy).powi(2)).sqrt();
        return Some((cx, cy, r));
    }
    let ax = p1.x;
    let ay = p1.y;
    let bx = p2.x;
    let by = p2.y;
    let cx_ = p3.x;
    let cy_ = p3.y;
    let d = 2.0 * (ax * (by - cy_) + bx * (cy_ - ay) + cx_ * (ay - by));
    if d.abs() < COLLINEAR_EPS {
        return None;
    }
    let ux = ((ax * ax + ay * ay) * (by - cy_)
        + (bx * bx + by * by) * (cy_ - ay)
        + (cx_ * cx_ + cy_ * cy_) * (ay - by))
        / d;
    let uy = ((ax * ax + ay * ay) * (cx_ - bx)
        + (bx * bx + by * by) * (ax - cx_)
        + (cx_ * cx_ + cy_ * cy_) * (bx - ax))
        / d;
    let r = ((ax - ux).powi(2) + (ay - uy).powi(2)).sqrt();
    Some((ux, uy, r))
}

/// Signed sweep angle from `a1` to `a3` passing through `a2` (§4.C8 step 3),
/// normalized so `a1` is treated as zero.
fn signed_sweep(a1: f64, a2: f64, a3: f64) -> f64 {
    let r2 = normalize_angle(a2 - a1);
    let r3 = normalize_angle(a3 - a1);
    // p2 lies on the shorter arc from 0 to r3 iff r2 is between 0 and r3
    // (both taken in the same rotational sense). If not, the true sweep
    // goes the long way around.
    if r3 >= 0.0 {
        if r2 >= 0.0 && r2 <= r3 {
            r3
        } else {
            r3 - 2.0 * std::f64::consts::PI
        }
    } else if r2 <= 0.0 && r2 >= r3 {
        r3
    } else {
        r3 + 2.0 * std::f64::consts::PI
    }
}

/// Normalizes to `(-pi, pi]`.
fn normalize_angle(mut a: f64) -> f64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    while a <= -std::f64::consts::PI {
        a += two_pi;
    }
    while a > std::f64::consts::PI {
        a -= two_pi;
    }
    a
}

/// Whether the offset angle `rel` (already measured from `a1=0`) lies
/// within `[0, sweep]` or `[sweep, 0]`, depending on sweep's sign.
fn angle_in_sweep(rel: f64, sweep: f64) -> bool {
    let rel = normalize_angle(rel);
    // Candidate cardinal angles are tried at rel in {-pi, -pi/2, 0, pi/2},
    // any of which may need a full-turn shift to land in the sweep's range.
    let candidates = [rel, rel - 2.0 * std::f64::consts::PI, rel + 2.0 * std::f64::consts::PI];
    candidates.iter().any(|&r| {
        if sweep >= 0.0 {
            r >= -COLLINEAR_EPS && r <= sweep + COLLINEAR_EPS
        } else {
            r <= COLLINEAR_EPS && r >= sweep - COLLINEAR_EPS
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::GFlags;
    use crate::pointarray::PointArray;

    fn pa(coords: &[(f64, f64)]) -> PointArray {
        let mut pa = PointArray::construct_empty(false, false, coords.len());
        for &(x, y) in coords {
            pa.append_point(Coord4D::xy(x, y), true);
        }
        pa
    }

    #[test]
    fn linestring_bbox_is_axis_aligned_extent() {
        let ls: Geometry =
            crate::geometry::LineString::new(0, pa(&[(0.0, -1.0), (3.0, 2.0)])).unwrap().into();
        let b = calculate_gbox(&ls).unwrap();
        assert_eq!((b.xmin, b.xmax, b.ymin, b.ymax), (0.0, 3.0, -1.0, 2.0));
    }

    #[test]
    fn polygon_bbox_uses_outer_ring_only() {
        let outer = pa(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        let poly: Geometry = crate::geometry::Polygon::new(0, vec![outer]).unwrap().into();
        let b = calculate_gbox(&poly).unwrap();
        assert_eq!((b.xmin, b.xmax, b.ymin, b.ymax), (0.0, 4.0, 0.0, 4.0));
    }

    #[test]
    fn empty_collection_bbox_errors() {
        let mp: Geometry =
            crate::geometry::MultiPoint::construct_empty(0, false, false).into();
        assert!(calculate_gbox(&mp).is_err());
    }

    #[test]
    fn quarter_circle_arc_bbox_includes_cardinal_extreme() {
        // Arc from (1,0) through (0.707,0.707) to (0,1): a quarter circle
        // of radius 1 centered at the origin. The bbox must be [0,1]x[0,1].
        let p1 = Coord4D::xy(1.0, 0.0);
        let p2 = Coord4D::xy(std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2);
        let p3 = Coord4D::xy(0.0, 1.0);
        let mut b = GBox::empty(GFlags::new(false, false));
        arc_bbox(p1, p2, p3, &mut b);
        assert!((b.xmin - 0.0).abs() < 1e-9);
        assert!((b.xmax - 1.0).abs() < 1e-9);
        assert!((b.ymin - 0.0).abs() < 1e-9);
        assert!((b.ymax - 1.0).abs() < 1e-9);
    }

    #[test]
    fn half_circle_arc_bbox_spans_full_diameter() {
        // Arc from (-1,0) through (0,1) to (1,0): upper half of the unit
        // circle. Must include the y=1 cardinal extreme.
        let p1 = Coord4D::xy(-1.0, 0.0);
        let p2 = Coord4D::xy(0.0, 1.0);
        let p3 = Coord4D::xy(1.0, 0.0);
        let mut b = GBox::empty(GFlags::new(false, false));
        arc_bbox(p1, p2, p3, &mut b);
        assert!((b.ymax - 1.0).abs() < 1e-9);
        assert!((b.xmin + 1.0).abs() < 1e-9);
        assert!((b.xmax - 1.0).abs() < 1e-9);
    }

    #[test]
    fn collinear_points_fall_back_to_segment_bbox() {
        let p1 = Coord4D::xy(0.0, 0.0);
        let p2 = Coord4D::xy(1.0, 1.0);
        let p3 = Coord4D::xy(2.0, 2.0);
        let mut b = GBox::empty(GFlags::new(false, false));
        arc_bbox(p1, p2, p3, &mut b);
        assert_eq!((b.xmin, b.xmax, b.ymin, b.ymax), (0.0, 2.0, 0.0, 2.0));
    }
}
