//! Minimum bounding circle via Welzl's algorithm, over the flattened 2D
//! vertex stream of any geometry (3D geometries project to XY) (§4.C12).

use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::pointarray::Coord4D;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl Circle {
    fn contains(&self, p: (f64, f64), tolerance: f64) -> bool {
        let dx = p.0 - self.center_x;
        let dy = p.1 - self.center_y;
        (dx * dx + dy * dy).sqrt() <= self.radius + tolerance
    }
}

/// A small epsilon against which "is this point already inside the
/// circle" is tested, to absorb floating-point error the way the original
/// does with its own tolerance constant.
const TOLERANCE: f64 = 1e-12;

/// 0, 1, 2, or 3 boundary points currently constraining the circle.
#[derive(Debug, Clone, Copy, Default)]
struct Support {
    points: [(f64, f64); 3],
    len: usize,
}

impl Support {
    fn push(&self, p: (f64, f64)) -> Support {
        let mut next = *self;
        next.points[next.len] = p;
        next.len += 1;
        next
    }
}

/// Computes the circle implied by a support set (§4.C12 `calc_mbc_from_support`).
fn calc_from_support(s: &Support) -> Circle {
    match s.len {
        0 => Circle { center_x: 0.0, center_y: 0.0, radius: 0.0 },
        1 => Circle { center_x: s.points[0].0, center_y: s.points[0].1, radius: 0.0 },
        2 => {
            let (ax, ay) = s.points[0];
            let (bx, by) = s.points[1];
            let cx = (ax + bx) / 2.0;
            let cy = (ay + by) / 2.0;
            let r = ((ax - cx).powi(2) + (ay - cy).powi(2)).sqrt();
            Circle { center_x: cx, center_y: cy, radius: r }
        }
        3 => circumcircle(s.points[0], s.points[1], s.points[2]),
        _ => unreachable!("support set never exceeds 3 points"),
    }
}

/// Circumcircle of a triangle via the standard 2x2 determinant
/// formulation.
fn circumcircle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Circle {
    let ax = a.0;
    let ay = a.1;
    let bx = b.0 - ax;
    let by = b.1 - ay;
    let cx = c.0 - ax;
    let cy = c.1 - ay;
    let d = 2.0 * (bx * cy - by * cx);
    if d.abs() < 1e-300 {
        // Degenerate (collinear) triangle: fall back to the two-point
        // circle spanning the pair of points farthest apart.
        let pairs = [(a, b), (a, c), (b, c)];
        let (p, q) = pairs
            .iter()
            .max_by(|(p0, p1), (q0, q1)| dist2(*p0, *p1).total_cmp(&dist2(*q0, *q1)))
            .copied()
            .unwrap();
        let cx_ = (p.0 + q.0) / 2.0;
        let cy_ = (p.1 + q.1) / 2.0;
        let r = ((p.0 - cx_).powi(2) + (p.1 - cy_).powi(2)).sqrt();
        return Circle { center_x: cx_, center_y: cy_, radius: r };
    }
    let ux = (cy * (bx * bx + by * by) - by * (cx * cx + cy * cy)) / d;
    let uy = (bx * (cx * cx + cy * cy) - cx * (bx * bx + by * by)) / d;
    let center_x = ax + ux;
    let center_y = ay + uy;
    let radius = (ux * ux + uy * uy).sqrt();
    Circle { center_x, center_y, radius }
}

fn dist2(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)
}

/// Recursive move-to-front welzl pass over `points[0..=end]`.
fn welzl(points: &[(f64, f64)], end: usize, support: Support) -> Circle {
    if end == usize::MAX || support.len == 3 {
        return calc_from_support(&support);
    }
    let mut circle = calc_from_support(&support);
    for i in 0..=end {
        if !circle.contains(points[i], TOLERANCE) {
            log::trace!("welzl: point {i} outside current circle, adding to support set");
            let next_support = support.push(points[i]);
            circle = if i == 0 {
                welzl(points, usize::MAX, next_support)
            } else {
                welzl(points, i - 1, next_support)
            };
        }
    }
    circle
}

/// Smallest enclosing circle of `points`. Empty input fails.
pub fn minimum_bounding_circle(points: &[(f64, f64)]) -> Result<Circle> {
    if points.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(welzl(points, points.len() - 1, Support::default()))
}

/// Flattens a geometry tree to its 2D vertex stream, projecting away Z/M
/// (§4.C12's "3D geometries project to XY").
pub fn flatten_xy(geom: &Geometry) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    flatten_into(geom, &mut out);
    out
}

fn flatten_into(geom: &Geometry, out: &mut Vec<(f64, f64)>) {
    match geom {
        Geometry::Point(g) => push_points(&g.points, out),
        Geometry::LineString(g) => push_points(&g.points, out),
        Geometry::Triangle(g) => push_points(&g.points, out),
        Geometry::CircularString(g) => push_points(&g.points, out),
        Geometry::Polygon(g) => {
            for ring in &g.rings {
                push_points(ring, out);
            }
        }
        Geometry::CompoundCurve(g) => g.geoms.iter().for_each(|c| flatten_into(c, out)),
        Geometry::CurvePolygon(g) => g.geoms.iter().for_each(|c| flatten_into(c, out)),
        Geometry::MultiPoint(g) => g.geoms.iter().for_each(|c| flatten_into(c, out)),
        Geometry::MultiLineString(g) => g.geoms.iter().for_each(|c| flatten_into(c, out)),
        Geometry::MultiPolygon(g) => g.geoms.iter().for_each(|c| flatten_into(c, out)),
        Geometry::MultiCurve(g) => g.geoms.iter().for_each(|c| flatten_into(c, out)),
        Geometry::MultiSurface(g) => g.geoms.iter().for_each(|c| flatten_into(c, out)),
        Geometry::PolyhedralSurface(g) => g.geoms.iter().for_each(|c| flatten_into(c, out)),
        Geometry::Tin(g) => g.geoms.iter().for_each(|c| flatten_into(c, out)),
        Geometry::GeometryCollection(g) => g.geoms.iter().for_each(|c| flatten_into(c, out)),
    }
}

fn push_points(pa: &crate::pointarray::PointArray, out: &mut Vec<(f64, f64)>) {
    for p in pa.iter_points() {
        out.push((p.x, p.y));
    }
}

/// Convenience entry point: MBC of an entire geometry tree.
pub fn geometry_mbc(geom: &Geometry) -> Result<Circle> {
    minimum_bounding_circle(&flatten_xy(geom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LineString;
    use crate::pointarray::PointArray;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn single_point_has_zero_radius() {
        let c = minimum_bounding_circle(&[(1.0, 1.0)]).unwrap();
        assert_eq!(c.radius, 0.0);
        assert_eq!((c.center_x, c.center_y), (1.0, 1.0));
    }

    #[test]
    fn two_points_circle_through_midpoint() {
        let c = minimum_bounding_circle(&[(0.0, 0.0), (2.0, 0.0)]).unwrap();
        assert!(approx_eq(c.center_x, 1.0, 1e-9));
        assert!(approx_eq(c.radius, 1.0, 1e-9));
    }

    #[test]
    fn square_circle_covers_all_corners() {
        let pts = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];
        let c = minimum_bounding_circle(&pts).unwrap();
        for p in pts {
            assert!(c.contains(p, 1e-6));
        }
        assert!(approx_eq(c.center_x, 1.0, 1e-6));
        assert!(approx_eq(c.center_y, 1.0, 1e-6));
    }

    #[test]
    fn empty_input_errors() {
        assert!(minimum_bounding_circle(&[]).is_err());
    }

    #[test]
    fn geometry_mbc_flattens_linestring() {
        let mut pa = PointArray::construct_empty(false, false, 3);
        for (x, y) in [(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)] {
            pa.append_point(Coord4D::xy(x, y), true);
        }
        let ls: Geometry = LineString::new(0, pa).unwrap().into();
        let c = geometry_mbc(&ls).unwrap();
        assert!(c.radius > 0.0);
    }
}
