use proptest::prelude::*;
use umbra_compose::{OverlayCompositor, SourceKind};
use umbra_lighting::VisibilityQuery;
use umbra_tiles::{TileFlagTable, TileFlags, WallRanges};
use umbra_world::{ObjectStore, RenderableObject, ViewRect};

const VIEW: ViewRect = ViewRect::new(300, 340, 5, 5, 0);

/// Visibility from a bitmask over a 7x7 patch starting at (299, 339).
struct MaskVisibility(u64);

impl MaskVisibility {
    fn bit(&self, x: i32, y: i32) -> bool {
        let (gx, gy) = (x - 299, y - 339);
        if !(0..7).contains(&gx) || !(0..7).contains(&gy) {
            return true;
        }
        (self.0 >> (gy * 7 + gx)) & 1 != 0
    }
}

impl VisibilityQuery for MaskVisibility {
    fn visible_at_world(&self, x: i32, y: i32) -> bool {
        self.bit(x, y)
    }
    fn open_at_world(&self, x: i32, y: i32) -> bool {
        self.bit(x, y)
    }
    fn wall_at_world(&self, _x: i32, _y: i32) -> bool {
        false
    }
    fn area_light_at_world(&self, _x: i32, _y: i32) -> i32 {
        4
    }
}

// Tiles 0x100..0x110 get random flags; objects pick from that range.
fn tiles_strategy() -> impl Strategy<Value = TileFlagTable> {
    prop::collection::vec(any::<u8>(), 16).prop_map(|masks| {
        let mut t = TileFlagTable::new();
        for (i, m) in masks.into_iter().enumerate() {
            t.set(0x100 + i as u16, TileFlags::from_bits_retain(m & 0xdc));
        }
        t
    })
}

fn objects_strategy() -> impl Strategy<Value = Vec<(i32, i32, u16, u32)>> {
    prop::collection::vec((299i32..307, 339i32..347, 0x103u16..0x110, 0u32..8), 0..24)
}

fn build(objs: &[(i32, i32, u16, u32)], stream: bool) -> ObjectStore {
    let mut store = if stream { ObjectStore::new() } else { ObjectStore::new().without_stream() };
    for &(x, y, tile, idx) in objs {
        store.push(RenderableObject::new(x, y, 0, tile).with_source(0, idx));
    }
    store
}

proptest! {
    #[test]
    fn compose_is_deterministic(tiles in tiles_strategy(), objs in objects_strategy(), mask in any::<u64>()) {
        let walls = WallRanges::new();
        let vis = MaskVisibility(mask);
        let store = build(&objs, true);
        let c = OverlayCompositor::new(&tiles, &walls);
        let a = c.compose(VIEW, &vis, &store);
        let b = c.compose(VIEW, &vis, &store);
        prop_assert_eq!(a, b);
    }

    // Each list is a run of non-floor entries followed only by floors.
    #[test]
    fn floors_never_precede_non_floor_entries(tiles in tiles_strategy(), objs in objects_strategy()) {
        let walls = WallRanges::new();
        let store = build(&objs, true);
        let out = OverlayCompositor::new(&tiles, &walls).compose(VIEW, &MaskVisibility(u64::MAX), &store);
        for list in out.cells.lists() {
            let head = list.iter().take_while(|e| !e.is_floor).count();
            prop_assert!(list[head..].iter().all(|e| e.is_floor));
        }
    }

    #[test]
    fn main_entries_never_come_from_hidden_cells(
        tiles in tiles_strategy(), objs in objects_strategy(), mask in any::<u64>(),
    ) {
        let walls = WallRanges::new();
        let vis = MaskVisibility(mask);
        let store = build(&objs, true);
        let out = OverlayCompositor::new(&tiles, &walls).compose(VIEW, &vis, &store);
        let mut hidden = 0;
        for o in store.iter() {
            let in_window = o.x >= 300 && o.x < 306 && o.y >= 340 && o.y < 346;
            if in_window && !vis.visible_at_world(o.x, o.y) {
                hidden += 1;
            }
        }
        prop_assert_eq!(out.parity.hidden_suppressed, hidden);
        for list in out.cells.lists() {
            for e in list {
                prop_assert!(vis.visible_at_world(e.source_x, e.source_y));
                if e.source_kind == SourceKind::Main {
                    prop_assert!(VIEW.contains_world(e.source_x, e.source_y));
                }
            }
        }
    }

    #[test]
    fn per_cell_scan_matches_window_stream(tiles in tiles_strategy(), objs in objects_strategy(), mask in any::<u64>()) {
        let walls = WallRanges::new();
        let vis = MaskVisibility(mask);
        let c = OverlayCompositor::new(&tiles, &walls);
        let a = c.compose(VIEW, &vis, &build(&objs, true));
        let b = c.compose(VIEW, &vis, &build(&objs, false));
        prop_assert_eq!(a, b);
    }
}
