use std::cmp::Reverse;

use hashbrown::HashMap;

use crate::object::{ObjectId, RenderableObject};

/// Resolves association targets by handle.
pub trait ObjectLookup {
    fn object(&self, id: ObjectId) -> Option<&RenderableObject>;
}

/// Source of positioned overlay objects.
pub trait ObjectLayer: ObjectLookup {
    /// Objects anchored at one cell, in the layer's native order.
    fn objects_at(&self, x: i32, y: i32, z: i32) -> Vec<&RenderableObject>;

    /// Objects anchored inside a window, already in legacy stream order.
    /// `None` means the layer has no precomputed stream.
    fn objects_in_window_legacy_order(
        &self,
        _start_x: i32,
        _start_y: i32,
        _width: usize,
        _height: usize,
        _z: i32,
    ) -> Option<Vec<&RenderableObject>> {
        None
    }
}

/// In-memory object layer keyed by map cell.
#[derive(Clone, Debug)]
pub struct ObjectStore {
    objects: Vec<RenderableObject>,
    by_cell: HashMap<(i32, i32, i32), Vec<usize>>,
    stream: bool,
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            by_cell: HashMap::new(),
            stream: true,
        }
    }

    /// Disables the precomputed window stream so callers take the per-cell path.
    pub fn without_stream(mut self) -> Self {
        self.stream = false;
        self
    }

    pub fn has_stream(&self) -> bool {
        self.stream
    }

    /// Adds an object; its `id` is overwritten with the assigned handle.
    pub fn push(&mut self, mut obj: RenderableObject) -> ObjectId {
        let slot = self.objects.len();
        let id = ObjectId(slot as u32);
        obj.id = id;
        if obj.is_on_map() {
            self.by_cell.entry((obj.x, obj.y, obj.z)).or_default().push(slot);
        }
        self.objects.push(obj);
        id
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderableObject> {
        self.objects.iter()
    }
}

impl ObjectLookup for ObjectStore {
    fn object(&self, id: ObjectId) -> Option<&RenderableObject> {
        self.objects.get(id.0 as usize)
    }
}

impl ObjectLayer for ObjectStore {
    fn objects_at(&self, x: i32, y: i32, z: i32) -> Vec<&RenderableObject> {
        self.by_cell
            .get(&(x, y, z))
            .map(|slots| slots.iter().map(|&s| &self.objects[s]).collect())
            .unwrap_or_default()
    }

    fn objects_in_window_legacy_order(
        &self,
        start_x: i32,
        start_y: i32,
        width: usize,
        height: usize,
        z: i32,
    ) -> Option<Vec<&RenderableObject>> {
        if !self.stream {
            return None;
        }
        let end_x = start_x + width as i32;
        let end_y = start_y + height as i32;
        let mut out: Vec<&RenderableObject> = self
            .objects
            .iter()
            .filter(|o| {
                o.is_on_map()
                    && o.z == z
                    && o.x >= start_x
                    && o.x < end_x
                    && o.y >= start_y
                    && o.y < end_y
            })
            .collect();
        // Rows top to bottom, then columns, higher z first; ties keep source order.
        out.sort_by_key(|o| (o.y, o.x, Reverse(o.z), o.source_area, o.stream_index()));
        Some(out)
    }
}
