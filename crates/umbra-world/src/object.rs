/// Stable handle of an object inside its layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// Where an object's coordinates live, from status bits 3-4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoordUse {
    /// Placed on the map at (x, y, z).
    LocXyz,
    /// Inside another object; coordinates are meaningless.
    Contained,
    /// Carried by an actor.
    Inventory,
    /// Worn or wielded by an actor.
    Equipped,
}

/// Legacy object status byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjectStatus(pub u8);

impl ObjectStatus {
    pub const COORD_USE_MASK: u8 = 0x18;
    pub const COORD_LOCXYZ: u8 = 0x00;
    pub const COORD_CONTAINED: u8 = 0x08;
    pub const COORD_INVEN: u8 = 0x10;
    pub const COORD_EQUIP: u8 = 0x18;
    /// Anchor is one more association hop away (shares the inventory bit).
    pub const ANCHOR_HOP: u8 = 0x10;

    #[inline]
    pub fn coord_use(self) -> CoordUse {
        match self.0 & Self::COORD_USE_MASK {
            Self::COORD_CONTAINED => CoordUse::Contained,
            Self::COORD_INVEN => CoordUse::Inventory,
            Self::COORD_EQUIP => CoordUse::Equipped,
            _ => CoordUse::LocXyz,
        }
    }

    #[inline]
    pub fn is_on_map(self) -> bool {
        self.coord_use() == CoordUse::LocXyz
    }

    #[inline]
    pub fn needs_anchor_hop(self) -> bool {
        self.0 & Self::ANCHOR_HOP != 0
    }

    pub fn with_coord_use(self, coord: CoordUse) -> Self {
        let bits = match coord {
            CoordUse::LocXyz => Self::COORD_LOCXYZ,
            CoordUse::Contained => Self::COORD_CONTAINED,
            CoordUse::Inventory => Self::COORD_INVEN,
            CoordUse::Equipped => Self::COORD_EQUIP,
        };
        Self((self.0 & !Self::COORD_USE_MASK) | bits)
    }
}

/// An overlay object as the renderer sees it.
///
/// `tile_id` is the resolved (animated) tile; `base_tile + frame` is the
/// static tile before animation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableObject {
    pub id: ObjectId,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub obj_type: u16,
    pub frame: u16,
    pub base_tile: u16,
    pub tile_id: u16,
    pub renderable: bool,
    pub status: ObjectStatus,
    /// Association target: container, holder, or owner.
    pub assoc: Option<ObjectId>,
    pub order: u32,
    pub source_area: u32,
    pub source_index: Option<u32>,
}

impl RenderableObject {
    /// A renderable, map-placed object showing `tile_id`.
    pub fn new(x: i32, y: i32, z: i32, tile_id: u16) -> Self {
        Self {
            id: ObjectId(0),
            x,
            y,
            z,
            obj_type: 0,
            frame: 0,
            base_tile: tile_id,
            tile_id,
            renderable: true,
            status: ObjectStatus::default(),
            assoc: None,
            order: 0,
            source_area: 0,
            source_index: None,
        }
    }

    pub fn with_type(mut self, obj_type: u16) -> Self {
        self.obj_type = obj_type;
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn with_source(mut self, area: u32, index: u32) -> Self {
        self.source_area = area;
        self.source_index = Some(index);
        self
    }

    pub fn with_frame(mut self, base_tile: u16, frame: u16) -> Self {
        self.base_tile = base_tile;
        self.frame = frame;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.renderable = false;
        self
    }

    pub fn contained_in(mut self, holder: ObjectId) -> Self {
        self.status = self.status.with_coord_use(CoordUse::Contained);
        self.assoc = Some(holder);
        self
    }

    pub fn with_status(mut self, status: u8) -> Self {
        self.status = ObjectStatus(status);
        self
    }

    pub fn with_assoc(mut self, assoc: ObjectId) -> Self {
        self.assoc = Some(assoc);
        self
    }

    #[inline]
    pub fn is_on_map(&self) -> bool {
        self.status.is_on_map()
    }

    /// Position within the source stream; falls back to `order`.
    #[inline]
    pub fn stream_index(&self) -> u32 {
        self.source_index.unwrap_or(self.order)
    }
}
