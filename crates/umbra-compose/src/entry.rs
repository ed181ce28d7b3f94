use std::fmt;

use umbra_tiles::{TileFlagTable, WallTerrain};

/// Which part of an object produced an overlay entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Main,
    SpillLeft,
    SpillUp,
    SpillUpLeft,
    LegacySpecial,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Main => "main",
            SourceKind::SpillLeft => "spill-left",
            SourceKind::SpillUp => "spill-up",
            SourceKind::SpillUpLeft => "spill-up-left",
            SourceKind::LegacySpecial => "legacy-special",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an entry joins a cell list.
///
/// Mirrors the legacy draw-priority byte: `Anchor` (0) goes to the head
/// unless the tile is a floor, `Spill` (1) floors append to the tail, and
/// `FloorChain` (2) always splices before the first floor entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Placement {
    #[default]
    Anchor,
    Spill,
    FloorChain,
}

impl Placement {
    pub fn from_bp06(bp06: u8) -> Self {
        match bp06 {
            1 => Placement::Spill,
            2 => Placement::FloorChain,
            _ => Placement::Anchor,
        }
    }

    pub fn bp06(self) -> u8 {
        match self {
            Placement::Anchor => 0,
            Placement::Spill => 1,
            Placement::FloorChain => 2,
        }
    }
}

/// World cell and object that an entry came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OverlaySource {
    pub x: i32,
    pub y: i32,
    pub kind: SourceKind,
    pub obj_type: u16,
}

impl OverlaySource {
    pub fn new(x: i32, y: i32, kind: SourceKind, obj_type: u16) -> Self {
        Self { x, y, kind, obj_type }
    }

    /// Synthetic source for a tile injected at (`x`, `y`).
    pub fn special(x: i32, y: i32) -> Self {
        Self::new(x, y, SourceKind::LegacySpecial, 0)
    }
}

/// One tile in a cell's overlay list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OverlayEntry {
    pub tile_id: u16,
    pub is_floor: bool,
    pub is_occluder: bool,
    pub source_x: i32,
    pub source_y: i32,
    pub source_kind: SourceKind,
    pub source_obj_type: u16,
    pub debug_label: String,
}

impl OverlayEntry {
    #[inline]
    pub fn is_main_from(&self, wx: i32, wy: i32) -> bool {
        self.source_kind == SourceKind::Main && self.source_x == wx && self.source_y == wy
    }
}

/// Derives floor and occluder bits for entry tiles.
#[derive(Clone, Copy)]
pub struct EntryClassifier<'a> {
    pub tiles: &'a TileFlagTable,
    pub walls: &'a dyn WallTerrain,
}

impl<'a> EntryClassifier<'a> {
    pub fn new(tiles: &'a TileFlagTable, walls: &'a dyn WallTerrain) -> Self {
        Self { tiles, walls }
    }

    pub fn is_floor(&self, tile: u16) -> bool {
        self.tiles.get(tile).is_floor()
    }

    /// Opaque or window tiles, and anything on wall terrain.
    pub fn is_occluder(&self, tile: u16) -> bool {
        self.tiles.get(tile).occludes() || self.walls.has_wall_terrain(tile)
    }

    /// Builds an entry for `tile`, truncated to 16 bits the way the legacy
    /// list stores it. An empty label becomes the tile id in hex.
    pub fn entry(&self, tile: i32, source: OverlaySource, label: &str) -> OverlayEntry {
        let tile_id = tile as u16;
        let debug_label = if label.is_empty() {
            format!("{:#x}", tile_id)
        } else {
            label.to_string()
        };
        OverlayEntry {
            tile_id,
            is_floor: self.is_floor(tile_id),
            is_occluder: self.is_occluder(tile_id),
            source_x: source.x,
            source_y: source.y,
            source_kind: source.kind,
            source_obj_type: source.obj_type,
            debug_label,
        }
    }
}
