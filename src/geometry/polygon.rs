use crate::error::{Error, Result};
use crate::flags::GFlags;
use crate::geometry::header::GeomHeader;
use crate::geometry::types::GeometryType;
use crate::pointarray::PointArray;

/// An ordered sequence of rings: ring 0 is the outer ring, rings `1..N` are
/// holes (§3). A non-empty ring must have `npoints >= 4` and be 2D-closed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    pub header: GeomHeader,
    pub rings: Vec<PointArray>,
}

fn validate_ring(ring: &PointArray) -> Result<()> {
    if ring.is_empty() {
        return Ok(());
    }
    if ring.npoints() < 4 {
        return Err(Error::Malformed("polygon ring must have >= 4 points"));
    }
    if !ring.is_closed_2d() {
        return Err(Error::Malformed("polygon ring must be closed"));
    }
    Ok(())
}

impl Polygon {
    pub const TYPE: GeometryType = GeometryType::Polygon;

    pub fn new(srid: i32, rings: Vec<PointArray>) -> Result<Self> {
        for ring in &rings {
            validate_ring(ring)?;
        }
        let flags = rings
            .first()
            .map(PointArray::flags)
            .unwrap_or_else(|| GFlags::new(false, false));
        for ring in &rings {
            if ring.flags().get_z() != flags.get_z() || ring.flags().get_m() != flags.get_m() {
                return Err(Error::DimensionMismatch);
            }
        }
        Ok(Polygon { header: GeomHeader::new(srid, flags), rings })
    }

    pub fn construct_empty(srid: i32, has_z: bool, has_m: bool) -> Self {
        Polygon { header: GeomHeader::new(srid, GFlags::new(has_z, has_m)), rings: Vec::new() }
    }

    /// Appends a ring, checking it matches this polygon's dimensionality
    /// and closure invariant.
    pub fn add_ring(&mut self, ring: PointArray) -> Result<()> {
        validate_ring(&ring)?;
        if ring.flags().get_z() != self.header.flags.get_z()
            || ring.flags().get_m() != self.header.flags.get_m()
        {
            return Err(Error::DimensionMismatch);
        }
        self.rings.push(ring);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty() || self.rings[0].is_empty()
    }

    pub fn exterior(&self) -> Option<&PointArray> {
        self.rings.first()
    }

    pub fn interiors(&self) -> &[PointArray] {
        if self.rings.len() > 1 {
            &self.rings[1..]
        } else {
            &[]
        }
    }

    pub fn count_vertices(&self) -> usize {
        self.rings.iter().map(PointArray::npoints).sum()
    }
}
