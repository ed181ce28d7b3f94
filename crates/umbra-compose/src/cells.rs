use umbra_world::ViewRect;

use crate::entry::{OverlayEntry, Placement};

/// Row-major overlay lists, one per viewport cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayCells {
    view: ViewRect,
    lists: Vec<Vec<OverlayEntry>>,
}

impl OverlayCells {
    pub fn new(view: ViewRect) -> Self {
        Self {
            view,
            lists: vec![Vec::new(); view.len()],
        }
    }

    pub fn view(&self) -> ViewRect {
        self.view
    }

    pub fn lists(&self) -> &[Vec<OverlayEntry>] {
        &self.lists
    }

    /// List at a viewport-local cell.
    pub fn list(&self, gx: usize, gy: usize) -> Option<&[OverlayEntry]> {
        if gx >= self.view.width || gy >= self.view.height {
            return None;
        }
        self.lists.get(gy * self.view.width + gx).map(Vec::as_slice)
    }

    pub fn list_at_world(&self, wx: i32, wy: i32) -> Option<&[OverlayEntry]> {
        self.view
            .index_of_world(wx, wy)
            .map(|i| self.lists[i].as_slice())
    }

    pub fn entry_count(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    /// Places `entry` at viewport-local (`gx`, `gy`). Returns false and
    /// drops the entry when the cell is outside the viewport.
    ///
    /// Non-floor anchors go to the head. Floor entries (and `FloorChain`
    /// entries) splice in before the first floor already present, which
    /// leaves them after the leading non-floor run; a floor `Spill` appends.
    pub fn insert(&mut self, gx: i32, gy: i32, entry: OverlayEntry, placement: Placement) -> bool {
        if gx < 0 || gy < 0 || gx >= self.view.width as i32 || gy >= self.view.height as i32 {
            return false;
        }
        let list = &mut self.lists[gy as usize * self.view.width + gx as usize];
        if entry.is_floor || placement == Placement::FloorChain {
            if placement == Placement::Spill {
                list.push(entry);
                return true;
            }
            match list.iter().position(|e| e.is_floor) {
                Some(at) => list.insert(at, entry),
                None => list.push(entry),
            }
            return true;
        }
        list.insert(0, entry);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::SourceKind;

    fn entry(tile: u16, floor: bool) -> OverlayEntry {
        OverlayEntry {
            tile_id: tile,
            is_floor: floor,
            is_occluder: false,
            source_x: 0,
            source_y: 0,
            source_kind: SourceKind::Main,
            source_obj_type: 0,
            debug_label: String::new(),
        }
    }

    fn tiles(c: &OverlayCells) -> Vec<u16> {
        c.list(0, 0).unwrap().iter().map(|e| e.tile_id).collect()
    }

    #[test]
    fn anchors_push_to_head() {
        let mut c = OverlayCells::new(ViewRect::new(0, 0, 1, 1, 0));
        c.insert(0, 0, entry(1, false), Placement::Anchor);
        c.insert(0, 0, entry(2, false), Placement::Anchor);
        assert_eq!(tiles(&c), vec![2, 1]);
    }

    #[test]
    fn floors_splice_after_non_floor_run() {
        let mut c = OverlayCells::new(ViewRect::new(0, 0, 1, 1, 0));
        c.insert(0, 0, entry(0x10, true), Placement::Anchor);
        c.insert(0, 0, entry(1, false), Placement::Anchor);
        c.insert(0, 0, entry(2, false), Placement::Anchor);
        c.insert(0, 0, entry(0x11, true), Placement::Anchor);
        // newest floor lands before the older floor, after both non-floors
        assert_eq!(tiles(&c), vec![2, 1, 0x11, 0x10]);
    }

    #[test]
    fn floor_spill_appends_and_floor_chain_splices() {
        let mut c = OverlayCells::new(ViewRect::new(0, 0, 1, 1, 0));
        c.insert(0, 0, entry(0x10, true), Placement::Anchor);
        c.insert(0, 0, entry(0x12, true), Placement::Spill);
        c.insert(0, 0, entry(3, false), Placement::FloorChain);
        c.insert(0, 0, entry(4, false), Placement::Spill);
        assert_eq!(tiles(&c), vec![4, 3, 0x10, 0x12]);
    }

    #[test]
    fn out_of_view_is_dropped() {
        let mut c = OverlayCells::new(ViewRect::new(10, 10, 2, 2, 0));
        assert!(!c.insert(-1, 0, entry(1, false), Placement::Anchor));
        assert!(!c.insert(2, 1, entry(1, false), Placement::Anchor));
        assert!(c.insert(1, 1, entry(1, false), Placement::Anchor));
        assert_eq!(c.entry_count(), 1);
        assert_eq!(c.list_at_world(11, 11).map(|l| l.len()), Some(1));
        assert_eq!(c.list_at_world(12, 11), None);
    }
}
