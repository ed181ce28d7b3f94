use proptest::prelude::*;
use umbra_tiles::{TILE_ID_MASK, TileFlagTable, TileFlags, TileSet, WallTerrain};

#[test]
fn toml_config_builds_flags_and_walls() {
    let set = TileSet::from_toml_str(
        r#"
        wall_ranges = [[0x140, 0x17f]]

        [[tile]]
        id = 0x200
        name = "wide_table"
        double_width = true
        double_height = true

        [[tile]]
        id = 0x1ff
        opaque = true

        [[tile]]
        id = 0x0fe
        raw = 0x25
        opaque = false

        [[tile]]
        id = 0x0a0
        light = 3
        floor = true
    "#,
    )
    .unwrap();

    assert_eq!(set.flags.raw(0x200), 0xc0);
    assert_eq!(set.id_by_name("wide_table"), Some(0x200));
    assert!(set.flags.get(0x1ff).is_opaque());
    // raw wins over named booleans
    assert_eq!(set.flags.raw(0x0fe), 0x25);
    assert_eq!(set.flags.get(0x0a0).light_strength(), 3);
    assert!(set.flags.get(0x0a0).is_floor());
    assert!(set.walls.has_wall_terrain(0x150));
    assert!(!set.walls.has_wall_terrain(0x200));
    assert_eq!(set.flags.raw(0x001), 0);
}

#[test]
fn malformed_config_is_an_error() {
    assert!(TileSet::from_toml_str("[[tile]]\nid = \"nope\"").is_err());
    assert!(TileSet::load_from_path("/definitely/not/here.toml").is_err());
}

proptest! {
    // Every id aliases onto its 11-bit slot
    #[test]
    fn lookup_aliases_by_mask(tile in any::<u16>(), mask in any::<u8>()) {
        let mut t = TileFlagTable::new();
        t.set_raw(tile, mask);
        prop_assert_eq!(t.raw(tile & TILE_ID_MASK), mask);
        prop_assert_eq!(t.get(tile).bits(), mask);
    }

    #[test]
    fn light_strength_never_exceeds_three(mask in any::<u8>(), s in any::<u8>()) {
        let f = TileFlags::from_bits_retain(mask).with_light(s);
        prop_assert!(f.light_strength() <= 3);
        prop_assert_eq!(f.bits() & !TileFlags::LIGHT_MASK, mask & !TileFlags::LIGHT_MASK);
    }
}
