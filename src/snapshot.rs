use std::fmt;

use umbra_compose::{
    ComposeResult, InjectorChain, OverlayCompositor, SourceKind, measure_actor_occlusion_parity,
};
use umbra_lighting::{LightingSources, VisibilityGrid};
use umbra_world::door::is_closeable_door_type;

use crate::scene::Scene;

/// Injectors switched on from the command line.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapshotOptions {
    pub lens: bool,
    pub obscurity: bool,
}

/// One frame of engine and compositor output for a scene.
pub struct Snapshot {
    pub grid: VisibilityGrid,
    pub overlays: ComposeResult,
    pub actor_occlusion: usize,
}

impl Snapshot {
    pub fn capture(scene: &Scene, opts: SnapshotOptions) -> Self {
        let src = LightingSources {
            map: &scene.map,
            tiles: &scene.tiles.flags,
            walls: &scene.tiles.walls,
            objects: Some(&scene.objects),
        };
        let grid = VisibilityGrid::compute(scene.view, scene.ambient, &src);

        let mut injectors = InjectorChain::new();
        if opts.lens {
            injectors.push(scene.lens);
        }
        if opts.obscurity {
            injectors.push(scene.obscurity);
        }
        let doors = &scene.doors;
        let mut compositor = OverlayCompositor::new(&scene.tiles.flags, &scene.tiles.walls)
            .with_footprint_tiles(move |o| {
                if is_closeable_door_type(o.obj_type) {
                    doors.resolve_door_tile(o) as i32
                } else {
                    o.tile_id as i32
                }
            });
        if !injectors.is_empty() {
            compositor = compositor.with_injector(injectors);
        }
        let overlays = compositor.compose(scene.view, &grid, &scene.objects);
        let actor_occlusion = measure_actor_occlusion_parity(&overlays.cells, &grid, scene.actors.iter().copied());
        if actor_occlusion > 0 {
            log::warn!("{} actor(s) drawn under an occluding overlay", actor_occlusion);
        }
        Self {
            grid,
            overlays,
            actor_occlusion,
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.grid.view();
        writeln!(
            f,
            "view {}x{} at ({}, {}) z={} ambient={}",
            view.width,
            view.height,
            view.start_x,
            view.start_y,
            view.z,
            self.grid.ambient().level
        )?;
        writeln!(f, "-- visibility")?;
        f.write_str(&self.grid.render_visibility())?;
        writeln!(f, "-- light")?;
        f.write_str(&self.grid.render_light())?;
        writeln!(f, "-- overlays")?;
        let cells = &self.overlays.cells;
        for (i, list) in cells.lists().iter().enumerate() {
            if list.is_empty() {
                continue;
            }
            let (wx, wy) = view.world_of_index(i);
            write!(f, "({}, {}):", wx, wy)?;
            for e in list {
                write!(f, " {:#05x} {}", e.tile_id, e.source_kind)?;
                if e.source_kind != SourceKind::Main {
                    write!(f, "@({}, {})", e.source_x, e.source_y)?;
                }
                if e.is_floor {
                    f.write_str(" floor")?;
                }
                if e.is_occluder {
                    f.write_str(" occluder")?;
                }
                f.write_str(";")?;
            }
            writeln!(f)?;
        }
        let p = self.overlays.parity;
        writeln!(f, "-- parity")?;
        writeln!(
            f,
            "overlays={} entries={} hidden_suppressed={} spill_out_of_bounds={} unsorted_source={} actor_occlusion={}",
            self.overlays.overlay_count,
            cells.entry_count(),
            p.hidden_suppressed,
            p.spill_out_of_bounds,
            p.unsorted_source,
            self.actor_occlusion
        )
    }
}
