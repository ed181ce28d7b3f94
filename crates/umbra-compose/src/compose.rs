use std::cmp::Ordering;
use std::time::Instant;

use umbra_lighting::VisibilityQuery;
use umbra_order::{compare_position, sort_legacy};
use umbra_tiles::{TileFlagTable, WallTerrain};
use umbra_world::{ObjectLayer, RenderableObject, ViewRect};

use crate::cells::OverlayCells;
use crate::entry::{EntryClassifier, OverlaySource, Placement, SourceKind};
use crate::inject::{InjectContext, OverlayInjector};

/// Diagnostics gathered while composing. None of them change the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParityCounters {
    /// Objects skipped because their own cell is not visible.
    pub hidden_suppressed: usize,
    /// Entries that landed outside the viewport and were dropped.
    pub spill_out_of_bounds: usize,
    /// Stream inversions against the (y, x, -z) position key.
    pub unsorted_source: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposeResult {
    pub cells: OverlayCells,
    /// Objects processed plus entries reported by the injector.
    pub overlay_count: usize,
    pub parity: ParityCounters,
}

type TileResolver<'a> = Box<dyn Fn(&RenderableObject) -> i32 + 'a>;
type BackgroundPredicate<'a> = Box<dyn Fn(u16, &RenderableObject) -> bool + 'a>;

/// Builds per-cell overlay lists from an object layer.
///
/// The animated resolver defaults to the object's `tile_id`; the footprint
/// resolver defaults to the animated tile.
pub struct OverlayCompositor<'a> {
    tiles: &'a TileFlagTable,
    walls: &'a dyn WallTerrain,
    animated: Option<TileResolver<'a>>,
    footprint: Option<TileResolver<'a>>,
    background: Option<BackgroundPredicate<'a>>,
    injector: Option<Box<dyn OverlayInjector + 'a>>,
}

impl<'a> OverlayCompositor<'a> {
    pub fn new(tiles: &'a TileFlagTable, walls: &'a dyn WallTerrain) -> Self {
        Self {
            tiles,
            walls,
            animated: None,
            footprint: None,
            background: None,
            injector: None,
        }
    }

    /// Current display tile; a negative result suppresses the object.
    pub fn with_animated_tiles(mut self, f: impl Fn(&RenderableObject) -> i32 + 'a) -> Self {
        self.animated = Some(Box::new(f));
        self
    }

    /// Tile whose spill bits decide the footprint (door frames and such).
    pub fn with_footprint_tiles(mut self, f: impl Fn(&RenderableObject) -> i32 + 'a) -> Self {
        self.footprint = Some(Box::new(f));
        self
    }

    /// Tiles accepted here are drawn into the base map, not the overlay.
    pub fn with_background_tiles(mut self, f: impl Fn(u16, &RenderableObject) -> bool + 'a) -> Self {
        self.background = Some(Box::new(f));
        self
    }

    pub fn with_injector(mut self, injector: impl OverlayInjector + 'a) -> Self {
        self.injector = Some(Box::new(injector));
        self
    }

    fn classifier(&self) -> EntryClassifier<'a> {
        EntryClassifier::new(self.tiles, self.walls)
    }

    fn animated_tile(&self, obj: &RenderableObject) -> i32 {
        match &self.animated {
            Some(f) => f(obj),
            None => obj.tile_id as i32,
        }
    }

    pub fn compose(
        &self,
        view: ViewRect,
        visibility: &dyn VisibilityQuery,
        layer: &dyn ObjectLayer,
    ) -> ComposeResult {
        let t0 = Instant::now();
        let mut run = Run {
            view,
            classify: self.classifier(),
            cells: OverlayCells::new(view),
            parity: ParityCounters::default(),
            overlay_count: 0,
        };
        // Spills reach one cell west/north, so anchors one past the
        // trailing edges still matter.
        let window = view.grow_trailing(1);
        let stream =
            layer.objects_in_window_legacy_order(window.start_x, window.start_y, window.width, window.height, view.z);

        match &stream {
            Some(stream) => {
                let mut prev: Option<&RenderableObject> = None;
                for &obj in stream {
                    if !obj.renderable {
                        continue;
                    }
                    if prev.is_some_and(|p| compare_position(p, obj) == Ordering::Greater) {
                        run.parity.unsorted_source += 1;
                    }
                    prev = Some(obj);
                    if !visibility.visible_at_world(obj.x, obj.y) {
                        run.parity.hidden_suppressed += 1;
                        continue;
                    }
                    self.process(&mut run, obj);
                }
            }
            None => {
                for (wx, wy) in window.cells() {
                    let mut objs = layer.objects_at(wx, wy, view.z);
                    if objs.is_empty() {
                        continue;
                    }
                    sort_legacy(layer, &mut objs);
                    // A hidden cell suppresses its objects before they take part
                    // in order validation.
                    let hidden = !visibility.visible_at_world(wx, wy);
                    let mut prev: Option<&RenderableObject> = None;
                    for obj in objs {
                        if !obj.renderable {
                            continue;
                        }
                        if hidden {
                            run.parity.hidden_suppressed += 1;
                            continue;
                        }
                        if prev.is_some_and(|p| compare_position(p, obj) == Ordering::Greater) {
                            run.parity.unsorted_source += 1;
                        }
                        prev = Some(obj);
                        self.process(&mut run, obj);
                    }
                }
            }
        }

        if let Some(injector) = &self.injector {
            let mut ctx = InjectContext {
                view,
                visibility,
                stream: stream.as_deref(),
                cells: &mut run.cells,
                parity: &mut run.parity,
                classify: run.classify,
            };
            let added = injector.inject(&mut ctx);
            run.overlay_count += added;
        }

        let ms = t0.elapsed().as_millis();
        log::debug!(
            target: "perf",
            "ms={} overlay_compose view={}x{} stream={} overlays={} entries={} hidden={} spill_oob={} unsorted={}",
            ms,
            view.width,
            view.height,
            stream.is_some(),
            run.overlay_count,
            run.cells.entry_count(),
            run.parity.hidden_suppressed,
            run.parity.spill_out_of_bounds,
            run.parity.unsorted_source
        );
        if run.parity.unsorted_source > 0 {
            log::warn!(
                "object stream out of legacy order: {} inversion(s) in window at ({}, {}, {})",
                run.parity.unsorted_source,
                view.start_x,
                view.start_y,
                view.z
            );
        }

        ComposeResult {
            cells: run.cells,
            overlay_count: run.overlay_count,
            parity: run.parity,
        }
    }

    // Callers have already dropped objects anchored in hidden cells, so walls
    // of an unseen room cannot spill into the visible one.
    fn process(&self, run: &mut Run<'a>, obj: &RenderableObject) {
        let (wx, wy) = (obj.x, obj.y);
        let anim = self.animated_tile(obj);
        if anim < 0 {
            return;
        }
        if self.background.as_ref().is_some_and(|is_bg| is_bg(anim as u16, obj)) {
            return;
        }
        let footprint = match &self.footprint {
            Some(f) => f(obj),
            None => anim,
        };
        let (gx, gy) = (wx - run.view.start_x, wy - run.view.start_y);
        let src = |kind| OverlaySource::new(wx, wy, kind, obj.obj_type);

        run.insert(gx, gy, anim, Placement::Anchor, src(SourceKind::Main));

        let tf = self.tiles.get(footprint as u16);
        if tf.double_width() {
            run.insert(gx - 1, gy, footprint - 1, Placement::Spill, src(SourceKind::SpillLeft));
            if tf.double_height() {
                run.insert(gx, gy - 1, footprint - 2, Placement::Spill, src(SourceKind::SpillUp));
                run.insert(gx - 1, gy - 1, footprint - 3, Placement::Spill, src(SourceKind::SpillUpLeft));
            }
        } else if tf.double_height() {
            run.insert(gx, gy - 1, footprint - 1, Placement::Spill, src(SourceKind::SpillUp));
        }
        run.overlay_count += 1;
    }
}

// Mutable state of one compose call.
struct Run<'a> {
    view: ViewRect,
    classify: EntryClassifier<'a>,
    cells: OverlayCells,
    parity: ParityCounters,
    overlay_count: usize,
}

impl Run<'_> {
    fn insert(&mut self, gx: i32, gy: i32, tile: i32, placement: Placement, source: OverlaySource) {
        let entry = self.classify.entry(tile, source, "");
        if !self.cells.insert(gx, gy, entry, placement) {
            self.parity.spill_out_of_bounds += 1;
        }
    }
}
