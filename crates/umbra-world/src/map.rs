/// Raw map tile lookup.
pub trait MapSampler {
    fn tile_at(&self, x: i32, y: i32, z: i32) -> u16;
}

impl<F> MapSampler for F
where
    F: Fn(i32, i32, i32) -> u16,
{
    #[inline]
    fn tile_at(&self, x: i32, y: i32, z: i32) -> u16 {
        self(x, y, z)
    }
}

/// A rectangular patch of one z-level; everything else reads as `fill`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    pub origin_x: i32,
    pub origin_y: i32,
    pub z: i32,
    pub sx: usize,
    pub sy: usize,
    pub fill: u16,
    pub tiles: Vec<u16>,
}

impl TileMap {
    pub fn filled(origin_x: i32, origin_y: i32, z: i32, sx: usize, sy: usize, fill: u16) -> Self {
        Self {
            origin_x,
            origin_y,
            z,
            sx,
            sy,
            fill,
            tiles: vec![fill; sx * sy],
        }
    }

    /// Builds from row-major rows; short rows and missing rows pad with `fill`.
    pub fn from_rows(origin_x: i32, origin_y: i32, z: i32, fill: u16, rows: &[Vec<u16>]) -> Self {
        let sy = rows.len();
        let sx = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut map = Self::filled(origin_x, origin_y, z, sx, sy, fill);
        for (y, row) in rows.iter().enumerate() {
            for (x, &t) in row.iter().enumerate() {
                let i = map.idx(x, y);
                map.tiles[i] = t;
            }
        }
        map
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.sx + x
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        if wz != self.z {
            return false;
        }
        wx >= self.origin_x
            && wx < self.origin_x + self.sx as i32
            && wy >= self.origin_y
            && wy < self.origin_y + self.sy as i32
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<u16> {
        if !self.contains_world(wx, wy, wz) {
            return None;
        }
        let lx = (wx - self.origin_x) as usize;
        let ly = (wy - self.origin_y) as usize;
        Some(self.tiles[self.idx(lx, ly)])
    }

    pub fn set_world(&mut self, wx: i32, wy: i32, tile: u16) -> bool {
        if !self.contains_world(wx, wy, self.z) {
            return false;
        }
        let i = self.idx((wx - self.origin_x) as usize, (wy - self.origin_y) as usize);
        self.tiles[i] = tile;
        true
    }
}

impl MapSampler for TileMap {
    fn tile_at(&self, x: i32, y: i32, z: i32) -> u16 {
        self.get_world(x, y, z).unwrap_or(self.fill)
    }
}
