//! Viewer visibility flood fill and ambient/point lighting on a padded grid.
#![forbid(unsafe_code)]

mod engine;
mod falloff;
mod grid;
mod visit;

pub use engine::{AmbientLightInput, LightingSources, MAX_AMBIENT, compute_visibility};
pub use falloff::{FALLOFF, falloff};
pub use grid::{AllVisible, CellFlags, GridCell, PAD, VisibilityGrid, VisibilityQuery};
