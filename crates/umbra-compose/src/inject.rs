use umbra_lighting::VisibilityQuery;
use umbra_world::{RenderableObject, ViewRect};

use crate::cells::OverlayCells;
use crate::compose::ParityCounters;
use crate::entry::{EntryClassifier, OverlayEntry, OverlaySource, Placement, SourceKind};

/// What an injector sees after normal object processing.
pub struct InjectContext<'a> {
    pub view: ViewRect,
    pub visibility: &'a dyn VisibilityQuery,
    /// Window stream that was consumed, if the layer supplied one.
    pub stream: Option<&'a [&'a RenderableObject]>,
    pub(crate) cells: &'a mut OverlayCells,
    pub(crate) parity: &'a mut ParityCounters,
    pub(crate) classify: EntryClassifier<'a>,
}

impl InjectContext<'_> {
    /// Inserts a synthetic tile at a world cell with the usual insertion
    /// policy. `source` defaults to a legacy-special entry at that cell.
    /// Returns false (and counts a spill out of bounds) if the cell is
    /// outside the viewport.
    pub fn insert_world_tile(
        &mut self,
        wx: i32,
        wy: i32,
        tile: i32,
        placement: Placement,
        source: Option<OverlaySource>,
        label: &str,
    ) -> bool {
        let source = source.unwrap_or_else(|| OverlaySource::special(wx, wy));
        let entry = self.classify.entry(tile, source, label);
        let gx = wx - self.view.start_x;
        let gy = wy - self.view.start_y;
        if self.cells.insert(gx, gy, entry, placement) {
            true
        } else {
            self.parity.spill_out_of_bounds += 1;
            false
        }
    }

    /// Overlay list currently built for a world cell.
    pub fn list_at_world(&self, wx: i32, wy: i32) -> Option<&[OverlayEntry]> {
        self.cells.list_at_world(wx, wy)
    }
}

/// Adds engine-specific synthetic entries. Returns how many it added.
pub trait OverlayInjector {
    fn inject(&self, ctx: &mut InjectContext<'_>) -> usize;
}

impl<F> OverlayInjector for F
where
    F: Fn(&mut InjectContext<'_>) -> usize,
{
    fn inject(&self, ctx: &mut InjectContext<'_>) -> usize {
        self(ctx)
    }
}

/// Two-tile lens drawn over every visible object of one type: `base_tile`
/// on the object's cell and `base_tile + 1` on the cell east of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MagicLens {
    pub obj_type: u16,
    pub base_tile: u16,
}

impl OverlayInjector for MagicLens {
    fn inject(&self, ctx: &mut InjectContext<'_>) -> usize {
        let Some(stream) = ctx.stream else {
            return 0;
        };
        let mut added = 0;
        for obj in stream {
            if !obj.renderable || obj.obj_type != self.obj_type {
                continue;
            }
            if !ctx.visibility.visible_at_world(obj.x, obj.y) {
                continue;
            }
            let source = OverlaySource::new(obj.x, obj.y, SourceKind::LegacySpecial, obj.obj_type);
            for dx in 0..2 {
                let tile = self.base_tile as i32 + dx;
                if ctx.insert_world_tile(obj.x + dx, obj.y, tile, Placement::Anchor, Some(source), "") {
                    added += 1;
                }
            }
        }
        added
    }
}

/// Darkness glyph over visible viewport cells lit below `threshold`; the
/// glyph is `glyph_base + light`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObscurityGlyphs {
    pub glyph_base: u16,
    pub threshold: i32,
}

impl OverlayInjector for ObscurityGlyphs {
    fn inject(&self, ctx: &mut InjectContext<'_>) -> usize {
        let view = ctx.view;
        let mut added = 0;
        for (wx, wy) in view.cells() {
            if !ctx.visibility.visible_at_world(wx, wy) {
                continue;
            }
            let light = ctx.visibility.area_light_at_world(wx, wy).max(0);
            if light >= self.threshold {
                continue;
            }
            let tile = self.glyph_base as i32 + light;
            if ctx.insert_world_tile(wx, wy, tile, Placement::Anchor, None, "obscurity") {
                added += 1;
            }
        }
        added
    }
}

/// Runs injectors in order and sums their counts.
#[derive(Default)]
pub struct InjectorChain<'a> {
    injectors: Vec<Box<dyn OverlayInjector + 'a>>,
}

impl<'a> InjectorChain<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, injector: impl OverlayInjector + 'a) -> Self {
        self.injectors.push(Box::new(injector));
        self
    }

    pub fn push(&mut self, injector: impl OverlayInjector + 'a) {
        self.injectors.push(Box::new(injector));
    }

    pub fn is_empty(&self) -> bool {
        self.injectors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.injectors.len()
    }
}

impl OverlayInjector for InjectorChain<'_> {
    fn inject(&self, ctx: &mut InjectContext<'_>) -> usize {
        self.injectors.iter().map(|i| i.inject(ctx)).sum()
    }
}
