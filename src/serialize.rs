//! The self-describing binary serialized form (§4.C9): a little-endian
//! envelope (size, packed SRID, flags, optional bbox) wrapping a recursive
//! typed payload.
//!
//! The original aliases a serialized buffer's coordinate bytes directly
//! into the deserialized point arrays (`ptarray_construct_reference_data`
//! with a borrowed pointer). Since [`PointArray`] always owns its data in
//! this port (see `DESIGN.md`), deserializing here copies the coordinate
//! doubles out of the input slice instead of borrowing them.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use crate::bbox::{next_float_down, next_float_up, GBox};
use crate::error::{Error, Result};
use crate::flags::GFlags;
use crate::geometry::*;
use crate::pointarray::{Coord4D, PointArray};

fn pack_srid(srid: i32) -> [u8; 3] {
    let s = srid as u32;
    [(s >> 16) as u8, (s >> 8) as u8, s as u8]
}

fn unpack_srid(b: &[u8]) -> i32 {
    ((b[0] as u32) << 16 | (b[1] as u32) << 8 | b[2] as u32) as i32
}

/// Serializes `geom` into its envelope form. `include_bbox` controls
/// whether the precomputed-bbox fast path is written to the wire; when
/// `true` and `geom` carries no cached bbox, one is computed on the fly.
pub fn serialize(geom: &Geometry, include_bbox: bool) -> Result<Vec<u8>> {
    let header = geom.header();
    let mut flags = header.flags.set_bbox(include_bbox);

    let bbox = if include_bbox {
        Some(match &header.bbox {
            Some(b) => b.clone(),
            None => geom.calculate_gbox()?,
        })
    } else {
        None
    };
    if let Some(b) = &bbox {
        flags = flags.set_geodetic(b.flags.get_geodetic());
    }

    let mut out = Vec::new();
    // Placeholder for the 4-byte size word, patched once the true length is
    // known.
    out.write_u32::<LittleEndian>(0)?;
    out.extend_from_slice(&pack_srid(header.srid));
    out.push(flags.bits());
    if let Some(b) = &bbox {
        write_bbox_f32(&mut out, flags, b)?;
    }
    write_payload(&mut out, geom)?;

    let word_count = ((out.len() + 3) / 4) as u32;
    let size_word = (word_count << 2) | (out.len() as u32 & 0b11);
    LittleEndian::write_u32(&mut out[0..4], size_word);
    Ok(out)
}

fn write_bbox_f32(out: &mut Vec<u8>, flags: GFlags, b: &GBox) -> Result<()> {
    let nd = flags.ndims_box();
    out.write_f32::<LittleEndian>(next_float_down(b.xmin))?;
    out.write_f32::<LittleEndian>(next_float_up(b.xmax))?;
    out.write_f32::<LittleEndian>(next_float_down(b.ymin))?;
    out.write_f32::<LittleEndian>(next_float_up(b.ymax))?;
    if nd >= 3 {
        out.write_f32::<LittleEndian>(next_float_down(b.zmin))?;
        out.write_f32::<LittleEndian>(next_float_up(b.zmax))?;
    }
    if flags.get_m() && !flags.get_geodetic() && nd >= 4 {
        out.write_f32::<LittleEndian>(next_float_down(b.mmin))?;
        out.write_f32::<LittleEndian>(next_float_up(b.mmax))?;
    }
    Ok(())
}

fn read_bbox_f32(cur: &mut Cursor<&[u8]>, flags: GFlags) -> Result<GBox> {
    let nd = flags.ndims_box();
    let mut b = GBox::empty(flags);
    b.xmin = cur.read_f32::<LittleEndian>()? as f64;
    b.xmax = cur.read_f32::<LittleEndian>()? as f64;
    b.ymin = cur.read_f32::<LittleEndian>()? as f64;
    b.ymax = cur.read_f32::<LittleEndian>()? as f64;
    if nd >= 3 {
        b.zmin = cur.read_f32::<LittleEndian>()? as f64;
        b.zmax = cur.read_f32::<LittleEndian>()? as f64;
    }
    if flags.get_m() && !flags.get_geodetic() && nd >= 4 {
        b.mmin = cur.read_f32::<LittleEndian>()? as f64;
        b.mmax = cur.read_f32::<LittleEndian>()? as f64;
    }
    Ok(b)
}

fn write_points(out: &mut Vec<u8>, points: &PointArray) -> Result<()> {
    for p in points.iter_points() {
        write_coord(out, points.flags(), p)?;
    }
    Ok(())
}

fn write_coord(out: &mut Vec<u8>, flags: GFlags, p: Coord4D) -> Result<()> {
    out.write_f64::<LittleEndian>(p.x)?;
    out.write_f64::<LittleEndian>(p.y)?;
    if flags.get_z() {
        out.write_f64::<LittleEndian>(p.z)?;
    }
    if flags.get_m() {
        out.write_f64::<LittleEndian>(p.m)?;
    }
    Ok(())
}

fn read_points(cur: &mut Cursor<&[u8]>, flags: GFlags, npoints: usize) -> Result<PointArray> {
    let nd = flags.ndims();
    let mut data = Vec::with_capacity(npoints * nd);
    for _ in 0..npoints {
        data.push(cur.read_f64::<LittleEndian>()?);
        data.push(cur.read_f64::<LittleEndian>()?);
        if flags.get_z() {
            data.push(cur.read_f64::<LittleEndian>()?);
        }
        if flags.get_m() {
            data.push(cur.read_f64::<LittleEndian>()?);
        }
    }
    Ok(PointArray::construct_reference_data(flags.get_z(), flags.get_m(), data))
}

fn write_payload(out: &mut Vec<u8>, geom: &Geometry) -> Result<()> {
    out.write_u32::<LittleEndian>(geom.geometry_type().code())?;
    match geom {
        Geometry::Point(g) => {
            out.write_u32::<LittleEndian>(g.points.npoints() as u32)?;
            write_points(out, &g.points)?;
        }
        Geometry::LineString(g) => {
            out.write_u32::<LittleEndian>(g.points.npoints() as u32)?;
            write_points(out, &g.points)?;
        }
        Geometry::CircularString(g) => {
            out.write_u32::<LittleEndian>(g.points.npoints() as u32)?;
            write_points(out, &g.points)?;
        }
        Geometry::Triangle(g) => {
            out.write_u32::<LittleEndian>(g.points.npoints() as u32)?;
            write_points(out, &g.points)?;
        }
        Geometry::Polygon(g) => {
            out.write_u32::<LittleEndian>(g.rings.len() as u32)?;
            for ring in &g.rings {
                out.write_u32::<LittleEndian>(ring.npoints() as u32)?;
            }
            if g.rings.len() % 2 == 1 {
                out.write_u32::<LittleEndian>(0)?;
            }
            for ring in &g.rings {
                write_points(out, ring)?;
            }
        }
        Geometry::CompoundCurve(g) => write_children(out, &g.geoms)?,
        Geometry::CurvePolygon(g) => write_children(out, &g.geoms)?,
        Geometry::MultiPoint(g) => write_children(out, &g.geoms)?,
        Geometry::MultiLineString(g) => write_children(out, &g.geoms)?,
        Geometry::MultiPolygon(g) => write_children(out, &g.geoms)?,
        Geometry::MultiCurve(g) => write_children(out, &g.geoms)?,
        Geometry::MultiSurface(g) => write_children(out, &g.geoms)?,
        Geometry::PolyhedralSurface(g) => write_children(out, &g.geoms)?,
        Geometry::Tin(g) => write_children(out, &g.geoms)?,
        Geometry::GeometryCollection(g) => write_children(out, &g.geoms)?,
    }
    Ok(())
}

fn write_children(out: &mut Vec<u8>, children: &[Geometry]) -> Result<()> {
    out.write_u32::<LittleEndian>(children.len() as u32)?;
    for child in children {
        write_payload(out, child)?;
    }
    Ok(())
}

/// Reads one recursive typed payload, given the dimension flags in force
/// for the whole serialized tree (flags are carried once, at the envelope).
fn read_payload(cur: &mut Cursor<&[u8]>, srid: i32, flags: GFlags) -> Result<Geometry> {
    let code = cur.read_u32::<LittleEndian>()?;
    let gtype = GeometryType::from_code(code)?;
    let header = GeomHeader::new(srid, flags);
    match gtype {
        GeometryType::Point => {
            let npoints = cur.read_u32::<LittleEndian>()? as usize;
            let points = read_points(cur, flags, npoints)?;
            Ok(Geometry::Point(Point { header, points }))
        }
        GeometryType::LineString => {
            let npoints = cur.read_u32::<LittleEndian>()? as usize;
            let points = read_points(cur, flags, npoints)?;
            let ls = LineString::new(srid, points)?;
            Ok(Geometry::LineString(ls))
        }
        GeometryType::CircularString => {
            let npoints = cur.read_u32::<LittleEndian>()? as usize;
            let points = read_points(cur, flags, npoints)?;
            let cs = CircularString::new(srid, points)?;
            Ok(Geometry::CircularString(cs))
        }
        GeometryType::Triangle => {
            let npoints = cur.read_u32::<LittleEndian>()? as usize;
            let points = read_points(cur, flags, npoints)?;
            let tri = Triangle::new(srid, points)?;
            Ok(Geometry::Triangle(tri))
        }
        GeometryType::Polygon => {
            let nrings = cur.read_u32::<LittleEndian>()? as usize;
            let mut counts = Vec::with_capacity(nrings);
            for _ in 0..nrings {
                counts.push(cur.read_u32::<LittleEndian>()? as usize);
            }
            if nrings % 2 == 1 {
                cur.read_u32::<LittleEndian>()?;
            }
            let mut rings = Vec::with_capacity(nrings);
            for n in counts {
                rings.push(read_points(cur, flags, n)?);
            }
            let poly = Polygon::new(srid, rings)?;
            Ok(Geometry::Polygon(poly))
        }
        GeometryType::MultiPoint => {
            build_collection::<MultiPoint>(cur, srid, flags, GeometryType::MultiPoint)
                .map(Geometry::MultiPoint)
        }
        GeometryType::MultiLineString => {
            build_collection::<MultiLineString>(cur, srid, flags, GeometryType::MultiLineString)
                .map(Geometry::MultiLineString)
        }
        GeometryType::MultiPolygon => {
            build_collection::<MultiPolygon>(cur, srid, flags, GeometryType::MultiPolygon)
                .map(Geometry::MultiPolygon)
        }
        GeometryType::CompoundCurve => {
            build_collection::<CompoundCurve>(cur, srid, flags, GeometryType::CompoundCurve)
                .map(Geometry::CompoundCurve)
        }
        GeometryType::CurvePolygon => {
            build_collection::<CurvePolygon>(cur, srid, flags, GeometryType::CurvePolygon)
                .map(Geometry::CurvePolygon)
        }
        GeometryType::MultiCurve => {
            build_collection::<MultiCurve>(cur, srid, flags, GeometryType::MultiCurve)
                .map(Geometry::MultiCurve)
        }
        GeometryType::MultiSurface => {
            build_collection::<MultiSurface>(cur, srid, flags, GeometryType::MultiSurface)
                .map(Geometry::MultiSurface)
        }
        GeometryType::PolyhedralSurface => build_collection::<PolyhedralSurface>(
            cur,
            srid,
            flags,
            GeometryType::PolyhedralSurface,
        )
        .map(Geometry::PolyhedralSurface),
        GeometryType::Tin => {
            build_collection::<Tin>(cur, srid, flags, GeometryType::Tin).map(Geometry::Tin)
        }
        GeometryType::GeometryCollection => build_collection::<GeometryCollection>(
            cur,
            srid,
            flags,
            GeometryType::GeometryCollection,
        )
        .map(Geometry::GeometryCollection),
    }
}

/// Shared recursive-children reader for every collection-shaped type. The
/// dimension and subtype checks happen inside `add_geom` itself, so a
/// malformed child surfaces as the same error the in-memory API would give.
fn build_collection<C>(
    cur: &mut Cursor<&[u8]>,
    srid: i32,
    flags: GFlags,
    _parent_type: GeometryType,
) -> Result<C>
where
    C: CollectionLike,
{
    let ngeoms = cur.read_u32::<LittleEndian>()? as usize;
    let mut coll = C::construct_empty(srid, flags.get_z(), flags.get_m());
    for _ in 0..ngeoms {
        let child = read_payload(cur, srid, flags)?;
        coll.add_geom(child)?;
    }
    Ok(coll)
}

/// Lets `build_collection` stay generic over the ten structurally-identical
/// collection types generated by `define_collection!`.
trait CollectionLike {
    fn construct_empty(srid: i32, has_z: bool, has_m: bool) -> Self;
    fn add_geom(&mut self, child: Geometry) -> Result<()>;
}

macro_rules! impl_collection_like {
    ($($t:ty),* $(,)?) => {
        $(impl CollectionLike for $t {
            fn construct_empty(srid: i32, has_z: bool, has_m: bool) -> Self {
                <$t>::construct_empty(srid, has_z, has_m)
            }
            fn add_geom(&mut self, child: Geometry) -> Result<()> {
                <$t>::add_geom(self, child)
            }
        })*
    };
}

impl_collection_like!(
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    CompoundCurve,
    CurvePolygon,
    MultiCurve,
    MultiSurface,
    PolyhedralSurface,
    Tin,
    GeometryCollection,
);

pub fn deserialize(bytes: &[u8]) -> Result<Geometry> {
    if bytes.len() < 8 {
        return Err(Error::Malformed("serialized geometry shorter than envelope"));
    }
    let mut cur = Cursor::new(bytes);
    let size_word = cur.read_u32::<LittleEndian>()?;
    let word_count = (size_word >> 2) as usize;
    let expected_len = word_count * 4;
    if expected_len != 0 && expected_len != bytes.len() {
        return Err(Error::Malformed("declared size disagrees with buffer length"));
    }
    let srid_bytes = cur.read_bytes3()?;
    let srid = unpack_srid(&srid_bytes);
    let flags = GFlags::from_bits(cur.read_u8()?);

    let bbox = if flags.get_bbox() { Some(read_bbox_f32(&mut cur, flags)?) } else { None };
    let mut geom = read_payload(&mut cur, srid, flags)?;
    if let Some(b) = bbox {
        geom.header_mut().bbox = Some(b);
    }
    Ok(geom)
}

/// Small helper trait so `deserialize` can read the 3-byte packed SRID with
/// the same `Cursor` the rest of the reader uses.
trait ReadSrid {
    fn read_bytes3(&mut self) -> Result<[u8; 3]>;
}

impl ReadSrid for Cursor<&[u8]> {
    fn read_bytes3(&mut self) -> Result<[u8; 3]> {
        let mut buf = [0u8; 3];
        std::io::Read::read_exact(self, &mut buf)
            .map_err(|_| Error::Malformed("truncated SRID"))?;
        Ok(buf)
    }
}
