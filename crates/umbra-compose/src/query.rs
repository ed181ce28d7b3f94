use umbra_lighting::VisibilityQuery;

use crate::cells::OverlayCells;
use crate::entry::OverlayEntry;

/// Topmost `main` entry anchored at (`wx`, `wy`), i.e. what a click on that
/// cell interacts with. Scans from the tail of the cell's list.
pub fn top_interactive_overlay_at(cells: &OverlayCells, wx: i32, wy: i32) -> Option<&OverlayEntry> {
    cells
        .list_at_world(wx, wy)?
        .iter()
        .rev()
        .find(|e| e.is_main_from(wx, wy))
}

/// Counts actors that stand visible in an open viewport cell whose overlay
/// list holds an occluder. A nonzero result means overlays would draw over
/// an actor the player should see.
pub fn measure_actor_occlusion_parity<I>(cells: &OverlayCells, visibility: &dyn VisibilityQuery, actors: I) -> usize
where
    I: IntoIterator<Item = (i32, i32)>,
{
    actors
        .into_iter()
        .filter(|&(x, y)| visibility.visible_at_world(x, y))
        .filter(|&(x, y)| {
            cells
                .list_at_world(x, y)
                .is_some_and(|list| list.iter().any(|e| e.is_occluder))
        })
        .filter(|&(x, y)| visibility.open_at_world(x, y))
        .count()
}
