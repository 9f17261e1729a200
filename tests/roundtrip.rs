//! Integration-level round-trip coverage for the two wire codecs, in the
//! style of `geo`'s `tests/jts_tests.rs`: exercised only through the public
//! API, one file per concern rather than folded into the unit `#[cfg(test)]`
//! modules next to the code they cover.

use geocore::{
    deserialize, serialize, twkb_decode, twkb_encode, Coord4D, Geometry, LineString, MultiPoint,
    MultiPolygon, Point, PointArray, Polygon, TwkbOpts,
};

fn ring(coords: &[(f64, f64)]) -> PointArray {
    let mut pa = PointArray::construct_empty(false, false, coords.len());
    for &(x, y) in coords {
        pa.append_point(Coord4D::xy(x, y), true);
    }
    pa
}

fn square_polygon(srid: i32, origin: (f64, f64), side: f64) -> Geometry {
    let (x, y) = origin;
    let outer = ring(&[
        (x, y),
        (x + side, y),
        (x + side, y + side),
        (x, y + side),
        (x, y),
    ]);
    Polygon::new(srid, vec![outer]).unwrap().into()
}

#[test]
fn binary_envelope_round_trips_a_polygon_with_a_hole() {
    let outer = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
    let hole = ring(&[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0), (2.0, 2.0)]);
    let poly: Geometry = Polygon::new(4326, vec![outer, hole]).unwrap().into();

    let bytes = serialize(&poly, true).unwrap();
    let back = deserialize(&bytes).unwrap();

    assert_eq!(back.srid(), 4326);
    let bbox = back.bbox().expect("bbox was requested at serialize time");
    assert_eq!((bbox.xmin, bbox.xmax, bbox.ymin, bbox.ymax), (0.0, 10.0, 0.0, 10.0));
    if let Geometry::Polygon(p) = back {
        assert_eq!(p.rings.len(), 2);
        assert_eq!(p.rings[1].npoints(), 5);
    } else {
        panic!("expected a polygon back");
    }
}

#[test]
fn binary_envelope_round_trips_nested_multipolygon() {
    let mut mp = MultiPolygon::construct_empty(0, false, false);
    if let Geometry::Polygon(a) = square_polygon(0, (0.0, 0.0), 2.0) {
        mp.add_geom(a.into()).unwrap();
    }
    if let Geometry::Polygon(b) = square_polygon(0, (10.0, 10.0), 3.0) {
        mp.add_geom(b.into()).unwrap();
    }
    let geom: Geometry = mp.into();

    let bytes = serialize(&geom, true).unwrap();
    let back = deserialize(&bytes).unwrap();
    if let Geometry::MultiPolygon(inner) = back {
        assert_eq!(inner.geoms.len(), 2);
    } else {
        panic!("expected a multipolygon back");
    }
}

#[test]
fn binary_envelope_rejects_unknown_type_code() {
    let geom: Geometry = Point::new(0, Coord4D::xy(1.0, 2.0), false, false).into();
    let mut bytes = serialize(&geom, false).unwrap();

    // Envelope is 4 (size) + 3 (srid) + 1 (flags) = 8 bytes, then the
    // little-endian u32 type code starts the payload; no bbox was
    // requested, so offset 8 is exactly the type code's first byte.
    assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()), 1);
    bytes[8] = 99;

    assert!(deserialize(&bytes).is_err());
}

#[test]
fn twkb_round_trips_a_linestring_within_quantization_tolerance() {
    let mut pa = PointArray::construct_empty(false, false, 4);
    for (x, y) in [(0.0, 0.0), (1.23456, 2.3456), (5.0, -5.0), (10.0, 0.0)] {
        pa.append_point(Coord4D::xy(x, y), true);
    }
    let line: Geometry = LineString::new(0, pa).unwrap().into();

    let opts = TwkbOpts { xy_precision: 5, ..TwkbOpts::default() };
    let bytes = twkb_encode(&line, &opts).unwrap();
    let (back, consumed) = twkb_decode(&bytes).unwrap();
    assert_eq!(consumed, bytes.len());

    if let Geometry::LineString(decoded) = back {
        assert_eq!(decoded.points.npoints(), 4);
        let (x, y) = decoded.points.get_point_2d(1).unwrap();
        assert!((x - 1.23456).abs() < 1e-5);
        assert!((y - 2.3456).abs() < 1e-5);
    } else {
        panic!("expected a linestring back");
    }
}

#[test]
fn twkb_round_trips_a_multipolygon_with_bbox() {
    let mut mp = MultiPolygon::construct_empty(0, false, false);
    if let Geometry::Polygon(a) = square_polygon(0, (0.0, 0.0), 4.0) {
        mp.add_geom(a.into()).unwrap();
    }
    let geom: Geometry = mp.into();

    let opts = TwkbOpts { include_bbox: true, ..TwkbOpts::default() };
    let bytes = twkb_encode(&geom, &opts).unwrap();
    let (back, _) = twkb_decode(&bytes).unwrap();
    if let Geometry::MultiPolygon(inner) = back {
        assert_eq!(inner.geoms.len(), 1);
    } else {
        panic!("expected a multipolygon back");
    }
}

#[test]
fn binary_then_twkb_agree_on_the_same_geometry_bbox() {
    let poly = square_polygon(3857, (-1.0, -1.0), 6.5);
    let bbox_direct = poly.calculate_gbox().unwrap();

    let bytes = serialize(&poly, true).unwrap();
    let back = deserialize(&bytes).unwrap();
    let bbox_wire = back.bbox().unwrap();

    assert!((bbox_direct.xmax - bbox_wire.xmax).abs() < 1e-5);
    assert!((bbox_direct.ymax - bbox_wire.ymax).abs() < 1e-5);
}
