//! Map, object layer, and viewport seams shared by the engine crates.
#![forbid(unsafe_code)]

pub mod door;
pub mod layer;
pub mod map;
pub mod object;
pub mod view;

pub use door::DoorStates;
pub use layer::{ObjectLayer, ObjectLookup, ObjectStore};
pub use map::{MapSampler, TileMap};
pub use object::{CoordUse, ObjectId, ObjectStatus, RenderableObject};
pub use view::ViewRect;
