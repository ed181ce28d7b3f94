//! Tile attribute flags, wall terrain, and legacy transparency rules.
#![forbid(unsafe_code)]

pub mod config;
pub mod flags;
pub mod table;
pub mod transparency;

// Re-exports for convenience
pub use config::{TileDef, TileSet, TilesConfig};
pub use flags::TileFlags;
pub use table::{TILE_ID_MASK, TILE_TABLE_LEN, TileFlagTable, WallRanges, WallTerrain};
pub use transparency::is_legacy_pixel_transparent;
