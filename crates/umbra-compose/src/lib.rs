//! Per-cell overlay lists for the viewport, in legacy draw order.
#![forbid(unsafe_code)]

pub mod cells;
pub mod compose;
pub mod entry;
pub mod inject;
pub mod query;

pub use cells::OverlayCells;
pub use compose::{ComposeResult, OverlayCompositor, ParityCounters};
pub use entry::{EntryClassifier, OverlayEntry, OverlaySource, Placement, SourceKind};
pub use inject::{InjectContext, InjectorChain, MagicLens, ObscurityGlyphs, OverlayInjector};
pub use query::{measure_actor_occlusion_parity, top_interactive_overlay_at};
