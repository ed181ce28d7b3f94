use bitflags::bitflags;
use umbra_world::ViewRect;

use crate::engine::AmbientLightInput;

/// Cells of margin around the viewport on every side.
pub const PAD: usize = 4;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CellFlags: u8 {
        const BACKGROUND = 0x01;
        const WALL = 0x02;
        const WINDOW = 0x04;
        const OPAQUE = 0x08;
        const VISITED = 0x10;
        const VISIBLE = 0x20;
    }
}

/// One cell of the padded working grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    /// Raw map tile sampled for this cell.
    pub tile: u16,
    pub flags: CellFlags,
    /// Strongest light-source strength folded into the cell (0..=3).
    pub light_source: u8,
    /// Accumulated light, not clamped.
    pub light: i32,
    /// Reached by the flood fill, visible or not.
    pub open: bool,
}

impl Default for GridCell {
    fn default() -> Self {
        Self {
            tile: 0,
            flags: CellFlags::empty(),
            light_source: 0,
            light: 0,
            open: false,
        }
    }
}

impl GridCell {
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.flags.contains(CellFlags::VISIBLE)
    }

    #[inline]
    pub fn is_wall(&self) -> bool {
        self.flags.contains(CellFlags::WALL)
    }
}

/// Read-only view queries in world coordinates.
pub trait VisibilityQuery {
    fn visible_at_world(&self, x: i32, y: i32) -> bool;
    fn open_at_world(&self, x: i32, y: i32) -> bool;
    fn wall_at_world(&self, x: i32, y: i32) -> bool;
    fn area_light_at_world(&self, x: i32, y: i32) -> i32;
}

/// Everything visible, open, wall-free, and fully lit.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllVisible;

impl VisibilityQuery for AllVisible {
    fn visible_at_world(&self, _x: i32, _y: i32) -> bool {
        true
    }
    fn open_at_world(&self, _x: i32, _y: i32) -> bool {
        true
    }
    fn wall_at_world(&self, _x: i32, _y: i32) -> bool {
        false
    }
    fn area_light_at_world(&self, _x: i32, _y: i32) -> i32 {
        4
    }
}

/// Result of one visibility/lighting computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityGrid {
    pub(crate) view: ViewRect,
    pub(crate) padded: ViewRect,
    pub(crate) ambient: AmbientLightInput,
    pub(crate) cells: Vec<GridCell>,
}

impl VisibilityGrid {
    pub(crate) fn new(view: ViewRect, ambient: AmbientLightInput) -> Self {
        let padded = view.padded(PAD);
        Self {
            view,
            padded,
            ambient,
            cells: vec![GridCell::default(); padded.len()],
        }
    }

    #[inline]
    pub(crate) fn idx(&self, gx: usize, gy: usize) -> usize {
        gy * self.padded.width + gx
    }

    #[inline]
    pub(crate) fn in_bounds(&self, gx: i32, gy: i32) -> bool {
        gx >= 0 && gy >= 0 && gx < self.padded.width as i32 && gy < self.padded.height as i32
    }

    pub fn view(&self) -> ViewRect {
        self.view
    }

    pub fn padded(&self) -> ViewRect {
        self.padded
    }

    pub fn ambient(&self) -> AmbientLightInput {
        self.ambient
    }

    /// Viewer position in padded-grid space.
    #[inline]
    pub fn center_grid(&self) -> (usize, usize) {
        (PAD + self.view.width / 2, PAD + self.view.height / 2)
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn cell(&self, gx: usize, gy: usize) -> Option<&GridCell> {
        if gx >= self.padded.width || gy >= self.padded.height {
            return None;
        }
        self.cells.get(self.idx(gx, gy))
    }

    pub fn cell_at_world(&self, wx: i32, wy: i32) -> Option<&GridCell> {
        self.padded.index_of_world(wx, wy).map(|i| &self.cells[i])
    }

    pub fn visible_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_visible()).count()
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|c| c.open).count()
    }

    /// Viewport rows: `@` viewer, `.` visible, `#` reached wall or opaque,
    /// `+` reached window, `?` reached but hidden, blank unreached.
    pub fn render_visibility(&self) -> String {
        let center = self.view.center();
        self.render_rows(|wx, wy, cell| {
            if (wx, wy) == center {
                return '@';
            }
            if !cell.open {
                return ' ';
            }
            if cell.flags.contains(CellFlags::WINDOW) {
                '+'
            } else if cell.flags.intersects(CellFlags::OPAQUE | CellFlags::WALL) {
                '#'
            } else if cell.is_visible() {
                '.'
            } else {
                '?'
            }
        })
    }

    /// Viewport rows of light levels, capped at 9; blank where not visible.
    pub fn render_light(&self) -> String {
        self.render_rows(|_, _, cell| {
            if !cell.is_visible() {
                return ' ';
            }
            char::from_digit(cell.light.clamp(0, 9) as u32, 10).unwrap_or('9')
        })
    }

    fn render_rows(&self, glyph: impl Fn(i32, i32, &GridCell) -> char) -> String {
        let mut out = String::with_capacity((self.view.width + 1) * self.view.height);
        for y in 0..self.view.height as i32 {
            for x in 0..self.view.width as i32 {
                let (wx, wy) = (self.view.start_x + x, self.view.start_y + y);
                let ch = self
                    .cell_at_world(wx, wy)
                    .map(|c| glyph(wx, wy, c))
                    .unwrap_or(' ');
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

impl VisibilityQuery for VisibilityGrid {
    fn visible_at_world(&self, x: i32, y: i32) -> bool {
        self.cell_at_world(x, y).map(|c| c.is_visible()).unwrap_or(true)
    }

    fn open_at_world(&self, x: i32, y: i32) -> bool {
        self.cell_at_world(x, y).map(|c| c.open).unwrap_or(false)
    }

    fn wall_at_world(&self, x: i32, y: i32) -> bool {
        self.cell_at_world(x, y).map(|c| c.is_wall()).unwrap_or(false)
    }

    fn area_light_at_world(&self, x: i32, y: i32) -> i32 {
        self.cell_at_world(x, y).map(|c| c.light).unwrap_or(0)
    }
}
