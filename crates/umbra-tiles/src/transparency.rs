/// Transparency masks that key out palette indices when blitting.
const MASK_KEYED_HIGH: u8 = 10;
const MASK_KEYED_LOW: u8 = 5;

/// Highest tile id whose palette index 0 is also keyed out.
const ZERO_KEY_MAX_TILE: u16 = 0x01ff;

/// Whether a pixel of `tile_id` with palette index `pal_idx` is see-through
/// under transparency `mask`.
///
/// Index 0xff is always keyed for the two keyed masks; index 0x00 only for
/// the low tile range.
pub fn is_legacy_pixel_transparent(mask: u8, tile_id: u16, pal_idx: u8) -> bool {
    if mask != MASK_KEYED_HIGH && mask != MASK_KEYED_LOW {
        return false;
    }
    pal_idx == 0xff || (tile_id <= ZERO_KEY_MAX_TILE && pal_idx == 0x00)
}
