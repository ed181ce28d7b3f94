use std::collections::VecDeque;
use std::time::Instant;

use umbra_tiles::{TileFlagTable, WallTerrain};
use umbra_world::{MapSampler, ObjectLayer, RenderableObject, ViewRect};

use crate::falloff::falloff;
use crate::grid::{CellFlags, GridCell, VisibilityGrid};
use crate::visit::VisitBits;

/// Brightest ambient level; point sources are skipped at this level.
pub const MAX_AMBIENT: u8 = 7;

// Per-pass light contribution is clamped to 0..=PASS_LIGHT_MAX.
const PASS_LIGHT_MAX: i32 = 4;
const AMBIENT_BASE: i32 = 4;
// Half-extent of the box a point source lights.
const SOURCE_REACH: i32 = 3;
// A window is see-through only straight along the viewer's row/column.
const WINDOW_REACH: i32 = 2;

// N, NE, E, SE, S, SW, W, NW
const WALK: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Externally computed ambient light (time of day, underground, eclipse).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmbientLightInput {
    pub level: u8,
}

impl AmbientLightInput {
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(MAX_AMBIENT),
        }
    }

    pub fn daylight() -> Self {
        Self::new(MAX_AMBIENT)
    }

    pub fn darkness() -> Self {
        Self::new(0)
    }

    #[inline]
    pub fn point_sources_active(self) -> bool {
        self.level < MAX_AMBIENT
    }
}

/// External collaborators read by the engine.
#[derive(Clone, Copy)]
pub struct LightingSources<'a> {
    pub map: &'a dyn MapSampler,
    pub tiles: &'a TileFlagTable,
    pub walls: &'a dyn WallTerrain,
    pub objects: Option<&'a dyn ObjectLayer>,
}

/// Visibility and light around a viewer standing at (`center_x`, `center_y`).
pub fn compute_visibility(
    center_x: i32,
    center_y: i32,
    z: i32,
    view_w: usize,
    view_h: usize,
    ambient: AmbientLightInput,
    src: &LightingSources<'_>,
) -> VisibilityGrid {
    let view = ViewRect::centered(center_x, center_y, z, view_w, view_h);
    VisibilityGrid::compute(view, ambient, src)
}

impl VisibilityGrid {
    pub fn compute(view: ViewRect, ambient: AmbientLightInput, src: &LightingSources<'_>) -> Self {
        let t0 = Instant::now();
        let mut grid = Self::new(view, ambient);
        grid.sample_map(src);
        grid.fold_objects(src);
        let eligible = grid.eligibility();
        grid.flood(&eligible);
        grid.ambient_pass();
        if ambient.point_sources_active() {
            grid.point_source_pass();
        }
        let ms = t0.elapsed().as_millis();
        log::debug!(
            target: "perf",
            "ms={} visibility_compute view={}x{} padded={}x{} visible={} open={} ambient={}",
            ms,
            view.width,
            view.height,
            grid.padded.width,
            grid.padded.height,
            grid.visible_count(),
            grid.open_count(),
            ambient.level
        );
        grid
    }

    fn sample_map(&mut self, src: &LightingSources<'_>) {
        let p = self.padded;
        for i in 0..self.cells.len() {
            let (wx, wy) = p.world_of_index(i);
            let tile = src.map.tile_at(wx, wy, p.z);
            let cell = &mut self.cells[i];
            cell.tile = tile;
            fold_tile(cell, tile, src);
        }
    }

    fn fold_objects(&mut self, src: &LightingSources<'_>) {
        let Some(layer) = src.objects else {
            return;
        };
        let p = self.padded;
        // Anchors one cell past the trailing edges can still spill into the grid.
        let window = p.grow_trailing(1);
        let objs: Vec<&RenderableObject> = match layer.objects_in_window_legacy_order(
            window.start_x,
            window.start_y,
            window.width,
            window.height,
            window.z,
        ) {
            Some(stream) => stream,
            None => window
                .cells()
                .flat_map(|(wx, wy)| layer.objects_at(wx, wy, p.z))
                .collect(),
        };
        for obj in objs {
            if !obj.renderable || obj.z != p.z || !window.contains_world(obj.x, obj.y) {
                continue;
            }
            let tile = obj.tile_id;
            let (gx, gy) = (obj.x - p.start_x, obj.y - p.start_y);
            if let Some((lx, ly)) = p.local(obj.x, obj.y) {
                let i = self.idx(lx, ly);
                fold_tile(&mut self.cells[i], tile, src);
            }

            let flags = src.tiles.get(tile);
            if !flags.spills() {
                continue;
            }
            let neighbor_opaque = src.tiles.get(tile.wrapping_sub(1)).is_opaque();
            let wall = src.walls.has_wall_terrain(tile);
            if flags.double_width() {
                self.mark_spill(gx - 1, gy, neighbor_opaque, wall);
            }
            if flags.double_height() {
                self.mark_spill(gx, gy - 1, neighbor_opaque, wall);
            }
        }
    }

    fn mark_spill(&mut self, gx: i32, gy: i32, opaque: bool, wall: bool) {
        if !self.in_bounds(gx, gy) {
            return;
        }
        let i = self.idx(gx as usize, gy as usize);
        let cell = &mut self.cells[i];
        if opaque {
            cell.flags |= CellFlags::OPAQUE;
        }
        if wall {
            cell.flags |= CellFlags::WALL;
        }
    }

    fn eligibility(&self) -> Vec<bool> {
        let (cx, cy) = self.center_grid();
        let w = self.padded.width;
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let dx = (i % w) as i32 - cx as i32;
                let dy = (i / w) as i32 - cy as i32;
                cell_eligible(cell, dx, dy)
            })
            .collect()
    }

    fn flood(&mut self, eligible: &[bool]) {
        let (w, h) = (self.padded.width, self.padded.height);
        let (cx, cy) = self.center_grid();
        let mut visited = VisitBits::new(w * h);
        let mut queue: VecDeque<usize> = VecDeque::with_capacity(w * h);

        let ci = self.idx(cx, cy);
        visited.insert(ci);
        self.cells[ci].flags |= CellFlags::VISITED;
        if eligible[ci] {
            queue.push_back(ci);
        } else {
            // Viewer stands on an opaque tile: seed east and south instead.
            self.cells[ci].open = true;
            log::trace!("visibility seed recovery at center tile {:#05x}", self.cells[ci].tile);
            for (dx, dy) in [(1, 0), (0, 1)] {
                self.enqueue(cx as i32 + dx, cy as i32 + dy, &mut visited, &mut queue);
            }
        }

        while let Some(i) = queue.pop_front() {
            self.cells[i].open = true;
            if !eligible[i] {
                continue;
            }
            self.cells[i].flags |= CellFlags::VISIBLE;
            let (gx, gy) = ((i % w) as i32, (i / w) as i32);
            for (dx, dy) in WALK {
                self.enqueue(gx + dx, gy + dy, &mut visited, &mut queue);
            }
        }
        debug_assert_eq!(visited.count(), self.cells.iter().filter(|c| c.flags.contains(CellFlags::VISITED)).count());
    }

    #[inline]
    fn enqueue(&mut self, gx: i32, gy: i32, visited: &mut VisitBits, queue: &mut VecDeque<usize>) {
        if !self.in_bounds(gx, gy) {
            return;
        }
        let i = self.idx(gx as usize, gy as usize);
        if visited.insert(i) {
            self.cells[i].flags |= CellFlags::VISITED;
            queue.push_back(i);
        }
    }

    fn ambient_pass(&mut self) {
        let (cx, cy) = self.center_grid();
        let w = self.padded.width;
        let ambient = self.ambient.level as i32;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            if !cell.is_visible() {
                continue;
            }
            let dx = (i % w) as i32 - cx as i32;
            let dy = (i / w) as i32 - cy as i32;
            cell.light += (AMBIENT_BASE - falloff(dx, dy) + ambient).clamp(0, PASS_LIGHT_MAX);
        }
    }

    fn point_source_pass(&mut self) {
        let w = self.padded.width;
        let sources: Vec<(i32, i32, i32)> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_visible() && c.light_source > 0)
            .map(|(i, c)| ((i % w) as i32, (i / w) as i32, c.light_source as i32))
            .collect();
        for (sx, sy, strength) in sources {
            for dy in -SOURCE_REACH..=SOURCE_REACH {
                for dx in -SOURCE_REACH..=SOURCE_REACH {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let (tx, ty) = (sx + dx, sy + dy);
                    if !self.in_bounds(tx, ty) {
                        continue;
                    }
                    let i = self.idx(tx as usize, ty as usize);
                    let cell = &mut self.cells[i];
                    if !cell.is_visible() {
                        continue;
                    }
                    cell.light += (strength - falloff(dx, dy)).clamp(0, PASS_LIGHT_MAX);
                }
            }
        }
    }
}

/// Folds one tile's attributes into a cell. Window wins over opaque; a
/// background tile only marks background when neither applies.
fn fold_tile(cell: &mut GridCell, tile: u16, src: &LightingSources<'_>) {
    let f = src.tiles.get(tile);
    if f.is_window() {
        cell.flags |= CellFlags::WINDOW;
    } else if f.is_opaque() {
        cell.flags |= CellFlags::OPAQUE;
    } else if f.is_background() {
        cell.flags |= CellFlags::BACKGROUND;
    }
    if src.walls.has_wall_terrain(tile) {
        cell.flags |= CellFlags::WALL;
    }
    let strength = f.light_strength();
    if strength > cell.light_source {
        cell.light_source = strength;
    }
}

/// Whether the flood fill may pass through a cell at offset (dx, dy) from
/// the viewer.
fn cell_eligible(cell: &GridCell, dx: i32, dy: i32) -> bool {
    if cell.flags.contains(CellFlags::WINDOW) {
        return (dx == 0 && dy.abs() <= WINDOW_REACH) || (dy == 0 && dx.abs() <= WINDOW_REACH);
    }
    if cell.flags.contains(CellFlags::OPAQUE) {
        return false;
    }
    if cell.flags.contains(CellFlags::WALL) && !cell.flags.contains(CellFlags::BACKGROUND) {
        return false;
    }
    true
}
