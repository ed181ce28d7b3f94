//! Closeable door frames.
//!
//! A toggled door shows a different frame than the one stored in the object
//! record. The footprint (spill) tile follows the toggled frame even while
//! the display tile is still animating.

use hashbrown::HashSet;

use crate::object::RenderableObject;

const TYPE_MASK: u16 = 0x03ff;
const PORTCULLIS: u16 = 0x14e;
const CLOSEABLE_DOORS: [u16; 5] = [0x129, 0x12a, 0x12b, 0x12c, PORTCULLIS];

#[inline]
pub fn is_closeable_door_type(obj_type: u16) -> bool {
    CLOSEABLE_DOORS.contains(&(obj_type & TYPE_MASK))
}

/// Frame bit flipped when a door of this type is toggled.
#[inline]
pub fn door_toggle_mask(obj_type: u16) -> u16 {
    if obj_type & TYPE_MASK == PORTCULLIS { 1 } else { 4 }
}

pub fn is_door_frame_open(obj_type: u16, frame: u16) -> bool {
    if !is_closeable_door_type(obj_type) {
        return false;
    }
    if obj_type & TYPE_MASK == PORTCULLIS {
        return frame & 1 != 0;
    }
    frame < 4
}

type DoorKey = (i32, i32, i32, u32);

#[inline]
fn door_key(obj: &RenderableObject) -> DoorKey {
    (obj.x & 0x3ff, obj.y & 0x3ff, obj.z & 0x0f, obj.order & 0xffff)
}

/// Set of doors toggled away from their stored frame.
#[derive(Clone, Debug, Default)]
pub struct DoorStates {
    toggled: HashSet<DoorKey>,
}

impl DoorStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_toggled(&self, obj: &RenderableObject) -> bool {
        is_closeable_door_type(obj.obj_type) && self.toggled.contains(&door_key(obj))
    }

    /// Flips a door; returns the new toggled state. Non-doors stay untoggled.
    pub fn toggle(&mut self, obj: &RenderableObject) -> bool {
        if !is_closeable_door_type(obj.obj_type) {
            return false;
        }
        let key = door_key(obj);
        if self.toggled.remove(&key) {
            return false;
        }
        self.toggled.insert(key);
        true
    }

    pub fn resolved_frame(&self, obj: &RenderableObject) -> u16 {
        if !self.is_toggled(obj) {
            return obj.frame;
        }
        obj.frame ^ door_toggle_mask(obj.obj_type)
    }

    /// Static tile for the current door state.
    pub fn resolve_door_tile(&self, obj: &RenderableObject) -> u16 {
        obj.base_tile.wrapping_add(self.resolved_frame(obj))
    }
}
