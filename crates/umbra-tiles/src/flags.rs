use bitflags::bitflags;

bitflags! {
    /// Per-tile attribute mask, one byte per tile id in the legacy table.
    ///
    /// Bits 0-1 together hold the light-source strength (0..=3); the rest
    /// are independent attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TileFlags: u8 {
        const LIGHT_LOW = 0x01;
        const LIGHT_HIGH = 0x02;
        const OPAQUE = 0x04;
        const WINDOW = 0x08;
        const FLOOR = 0x10;
        const BACKGROUND = 0x20;
        const DOUBLE_HEIGHT = 0x40;
        const DOUBLE_WIDTH = 0x80;
    }
}

impl TileFlags {
    pub const LIGHT_MASK: u8 = 0x03;

    #[inline]
    pub fn light_strength(self) -> u8 {
        self.bits() & Self::LIGHT_MASK
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.contains(Self::OPAQUE)
    }

    #[inline]
    pub fn is_window(self) -> bool {
        self.contains(Self::WINDOW)
    }

    #[inline]
    pub fn is_floor(self) -> bool {
        self.contains(Self::FLOOR)
    }

    #[inline]
    pub fn is_background(self) -> bool {
        self.contains(Self::BACKGROUND)
    }

    #[inline]
    pub fn double_height(self) -> bool {
        self.contains(Self::DOUBLE_HEIGHT)
    }

    #[inline]
    pub fn double_width(self) -> bool {
        self.contains(Self::DOUBLE_WIDTH)
    }

    /// Object spans more than its anchor cell.
    #[inline]
    pub fn spills(self) -> bool {
        self.intersects(Self::DOUBLE_HEIGHT | Self::DOUBLE_WIDTH)
    }

    /// Blocks sight when drawn over an actor (opaque or window glass).
    #[inline]
    pub fn occludes(self) -> bool {
        self.intersects(Self::OPAQUE | Self::WINDOW)
    }

    pub fn with_light(self, strength: u8) -> Self {
        let bits = (self.bits() & !Self::LIGHT_MASK) | (strength & Self::LIGHT_MASK);
        Self::from_bits_retain(bits)
    }
}
