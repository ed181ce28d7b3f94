use std::error::Error;
use std::fs;
use std::path::Path;

use super::flags::TileFlags;

/// Number of entries in the legacy flag table.
pub const TILE_TABLE_LEN: usize = 0x800;
/// Tile ids index the table through the low 11 bits.
pub const TILE_ID_MASK: u16 = 0x07ff;

/// Read-only tile id -> attribute mask lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileFlagTable {
    masks: Vec<u8>,
}

impl Default for TileFlagTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TileFlagTable {
    pub fn new() -> Self {
        Self {
            masks: vec![0; TILE_TABLE_LEN],
        }
    }

    /// Builds a table from a raw dump. Extra trailing bytes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Box<dyn Error>> {
        if bytes.len() < TILE_TABLE_LEN {
            return Err(format!(
                "tile flag table needs {} bytes, got {}",
                TILE_TABLE_LEN,
                bytes.len()
            )
            .into());
        }
        Ok(Self {
            masks: bytes[..TILE_TABLE_LEN].to_vec(),
        })
    }

    pub fn load_raw(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    #[inline]
    fn slot(tile: u16) -> usize {
        (tile & TILE_ID_MASK) as usize
    }

    #[inline]
    pub fn raw(&self, tile: u16) -> u8 {
        self.masks.get(Self::slot(tile)).copied().unwrap_or(0)
    }

    #[inline]
    pub fn get(&self, tile: u16) -> TileFlags {
        TileFlags::from_bits_retain(self.raw(tile))
    }

    pub fn set(&mut self, tile: u16, flags: TileFlags) {
        let slot = Self::slot(tile);
        self.masks[slot] = flags.bits();
    }

    pub fn set_raw(&mut self, tile: u16, mask: u8) {
        let slot = Self::slot(tile);
        self.masks[slot] = mask;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.masks
    }
}

/// Terrain classification consumed by the engine and the compositor.
pub trait WallTerrain {
    fn has_wall_terrain(&self, tile: u16) -> bool;
}

impl<F> WallTerrain for F
where
    F: Fn(u16) -> bool,
{
    #[inline]
    fn has_wall_terrain(&self, tile: u16) -> bool {
        self(tile)
    }
}

/// Inclusive tile id ranges classified as wall terrain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WallRanges {
    ranges: Vec<(u16, u16)>,
}

impl WallRanges {
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    pub fn push(&mut self, start: u16, end: u16) {
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        self.ranges.push((lo, hi));
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[(u16, u16)] {
        &self.ranges
    }
}

impl WallTerrain for WallRanges {
    fn has_wall_terrain(&self, tile: u16) -> bool {
        self.ranges.iter().any(|&(lo, hi)| tile >= lo && tile <= hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_alias_through_eleven_bit_mask() {
        let mut t = TileFlagTable::new();
        t.set(0x1ff, TileFlags::OPAQUE);
        assert!(t.get(0x1ff).is_opaque());
        assert!(t.get(0x1ff | 0x0800).is_opaque());
        assert!(!t.get(0x200).is_opaque());
    }

    #[test]
    fn from_bytes_rejects_short_dumps() {
        assert!(TileFlagTable::from_bytes(&[0u8; 16]).is_err());
        let mut raw = vec![0u8; TILE_TABLE_LEN + 4];
        raw[0x10] = 0x10;
        let t = TileFlagTable::from_bytes(&raw).unwrap();
        assert!(t.get(0x10).is_floor());
        assert_eq!(t.as_bytes().len(), TILE_TABLE_LEN);
    }

    #[test]
    fn wall_ranges_are_inclusive_and_order_free() {
        let mut w = WallRanges::new();
        w.push(0x17f, 0x140);
        assert!(w.has_wall_terrain(0x140));
        assert!(w.has_wall_terrain(0x17f));
        assert!(!w.has_wall_terrain(0x180));
        let closure = |t: u16| t == 7;
        assert!(closure.has_wall_terrain(7));
    }
}
