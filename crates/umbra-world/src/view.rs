/// A rectangular window of world cells on one z-level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewRect {
    pub start_x: i32,
    pub start_y: i32,
    pub width: usize,
    pub height: usize,
    pub z: i32,
}

impl ViewRect {
    pub const fn new(start_x: i32, start_y: i32, width: usize, height: usize, z: i32) -> Self {
        Self {
            start_x,
            start_y,
            width,
            height,
            z,
        }
    }

    /// Window whose center cell (`width/2`, `height/2`) is the given world cell.
    pub fn centered(center_x: i32, center_y: i32, z: i32, width: usize, height: usize) -> Self {
        Self::new(
            center_x - (width / 2) as i32,
            center_y - (height / 2) as i32,
            width,
            height,
            z,
        )
    }

    #[inline]
    pub fn center(&self) -> (i32, i32) {
        (
            self.start_x + (self.width / 2) as i32,
            self.start_y + (self.height / 2) as i32,
        )
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32) -> bool {
        self.local(wx, wy).is_some()
    }

    /// World -> local cell offset, if inside.
    #[inline]
    pub fn local(&self, wx: i32, wy: i32) -> Option<(usize, usize)> {
        let gx = wx - self.start_x;
        let gy = wy - self.start_y;
        if gx < 0 || gy < 0 || gx >= self.width as i32 || gy >= self.height as i32 {
            return None;
        }
        Some((gx as usize, gy as usize))
    }

    /// Row-major index of a world cell, if inside.
    #[inline]
    pub fn index_of_world(&self, wx: i32, wy: i32) -> Option<usize> {
        self.local(wx, wy).map(|(gx, gy)| gy * self.width + gx)
    }

    #[inline]
    pub fn world_of_index(&self, idx: usize) -> (i32, i32) {
        (
            self.start_x + (idx % self.width) as i32,
            self.start_y + (idx / self.width) as i32,
        )
    }

    /// Same origin, grown by `n` cells on the east and south edges.
    pub fn grow_trailing(&self, n: usize) -> Self {
        Self::new(self.start_x, self.start_y, self.width + n, self.height + n, self.z)
    }

    /// Grown by `pad` cells on every side.
    pub fn padded(&self, pad: usize) -> Self {
        Self::new(
            self.start_x - pad as i32,
            self.start_y - pad as i32,
            self.width + 2 * pad,
            self.height + 2 * pad,
            self.z,
        )
    }

    /// World cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.len()).map(move |i| self.world_of_index(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_puts_center_at_half_extent() {
        let v = ViewRect::centered(302, 342, 0, 5, 5);
        assert_eq!((v.start_x, v.start_y), (300, 340));
        assert_eq!(v.center(), (302, 342));
        let even = ViewRect::centered(10, 10, 0, 4, 6);
        assert_eq!(even.center(), (10, 10));
    }

    #[test]
    fn index_roundtrips_inside_only() {
        let v = ViewRect::new(300, 340, 5, 5, 0);
        assert_eq!(v.index_of_world(301, 342), Some(11));
        assert_eq!(v.world_of_index(11), (301, 342));
        assert_eq!(v.index_of_world(305, 342), None);
        assert_eq!(v.index_of_world(299, 342), None);
    }

    #[test]
    fn grow_and_pad() {
        let v = ViewRect::new(300, 340, 5, 5, 2);
        let g = v.grow_trailing(1);
        assert!(g.contains_world(305, 345));
        assert!(!g.contains_world(299, 340));
        let p = v.padded(4);
        assert_eq!((p.start_x, p.start_y, p.width, p.height, p.z), (296, 336, 13, 13, 2));
    }
}
