use gba_bridge::{
    hardware::{
        compose_color,
        map::{self, Keys, OBJECT_PALETTE, SCREEN_WIDTH, VRAM},
        Bus, Memory, Registers,
    },
    host::{CallError, CallSurface, HostCalls, Operation, Value},
};

use pretty_assertions::assert_eq;

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|v| Value::Integer(*v)).collect()
}

#[test]
fn test_bitmap_pixel() {
    let mut registers = Registers::new(Memory::new());
    registers.set_video_mode_and_layers(3, 4);
    registers.write_pixel(115, 80, compose_color(31, 0, 0));

    let pixel = VRAM.element_address(80 * SCREEN_WIDTH + 115);
    assert_eq!(registers.bus().read_halfword(pixel), 0x001F);
    assert_eq!(registers.display_register(), 0x0403);
}

#[test]
fn test_position_after_attributes() {
    let tests = vec![
        // attrs, position, expected attr0 and attr1
        ((0x8000, 0x4000, 1), (5, 96), (0x8060, 0x4005)),
        ((0x20FF, 0xC1FF, 0), (0, 0), (0x2000, 0xC000)),
        ((0x0000, 0x0000, 0), (0x1FF, 0xFF), (0x00FF, 0x01FF)),
        // Coordinates wider than the field lose their high bits
        ((0x1234, 0x5678, 9), (0xFFFF, 0xFFFF), (0x12FF, 0x57FF)),
    ];
    for ((a0, a1, a2), (x, y), (expected0, expected1)) in tests {
        let mut host = HostCalls::simulated();
        host.call("set_obj_attrs", &ints(&[7, a0, a1, a2])).unwrap();
        host.call("set_object_position", &ints(&[7, x, y])).unwrap();

        let attributes = host.registers().object_attributes(7);
        assert_eq!(
            (attributes.attr0, attributes.attr1, attributes.attr2),
            (expected0, expected1, a2 as u16)
        );
    }
}

#[test]
fn test_rejected_calls_store_nothing() {
    let tests = vec![
        ("set_obj_attrs", ints(&[0, 1, 2])),
        ("set_obj_attrs", ints(&[-1, 1, 2, 3])),
        ("set_object_palette_memory", ints(&[256, 31, 31, 31])),
        ("set_tile_memory", ints(&[510, 3, 0xFFFF])),
        ("set_short_memory", ints(&[-2, 0, 0xFFFF])),
        ("set_char_memory", ints(&[0x1_0000_0000, 0, 0xFF])),
        ("set_short_memory", ints(&[0x0600_0001, 0, 0xFFFF])),
        (
            "set_object_position",
            vec![Value::Integer(0), Value::Float(1.0), Value::Integer(1)],
        ),
        ("display_register=", vec![Value::Str("0x1000".to_string())]),
    ];
    for (name, args) in tests {
        let mut host = HostCalls::simulated();
        assert!(host.call(name, &args).is_err(), "{} {:?}", name, args);

        let bus = host.registers().bus();
        for region in [&map::PALETTE, &VRAM, &map::OAM] {
            assert!(
                bus.region(region).iter().all(|byte| *byte == 0),
                "{} wrote to {}",
                name,
                region
            );
        }
        assert_eq!(host.registers().display_register(), 0);
    }
}

#[test]
fn test_palette_and_tiles() {
    let mut host = HostCalls::simulated();
    host.call("set_object_palette_memory", &ints(&[255, 0, 31, 0]))
        .unwrap();
    host.call("set_tile_memory", &ints(&[508, 4, 0xABCD])).unwrap();
    host.call("set_tile_memory", &ints(&[0, 0, 0xFFFF])).unwrap();

    let bus = host.registers().bus();
    assert_eq!(
        bus.read_halfword(OBJECT_PALETTE.element_address(255)),
        0x03E0
    );

    let block = map::tile_address(map::SPRITE_TILE_BLOCK, 0);
    let before = map::tile_address(map::SPRITE_TILE_BLOCK, 508);
    assert_eq!(bus.read_halfword(block), 0);
    assert_eq!(bus.read_halfword(before - 2), 0);
    assert_eq!(bus.read_halfword(before), 0xABCD);
    assert_eq!(bus.read_halfword(block + map::TILE_BLOCK_SIZE - 2), 0xABCD);
    assert_eq!(bus.read_halfword(block + map::TILE_BLOCK_SIZE), 0);
}

#[test]
fn test_inputs() {
    let mut host = HostCalls::simulated();
    assert_eq!(host.call("key_states", &[]), Ok(Value::Integer(0)));

    host.registers_mut()
        .bus_mut()
        .set_keys_held(Keys::START | Keys::LEFT);
    host.registers_mut().bus_mut().set_scanline(161);

    assert_eq!(host.call("key_states", &[]), Ok(Value::Integer(0x0028)));
    assert_eq!(host.call("display_vcount", &[]), Ok(Value::Integer(161)));
    assert_eq!(host.call("reg_display_vcount", &[]), Ok(Value::Integer(161)));
}

#[test]
fn test_unknown_operation() {
    let mut host = HostCalls::simulated();
    assert_eq!(
        host.call("set_bg_palette_memory", &ints(&[0, 0, 0, 0])),
        Err(CallError::UnknownOperation(
            "set_bg_palette_memory".to_string()
        ))
    );
    assert_eq!(
        host.dispatch(Operation::EnableConsole, &ints(&[1])),
        Err(CallError::ArityMismatch {
            operation: Operation::EnableConsole,
            expected: 0,
            got: 1,
        })
    );
}

#[test]
fn test_raw_stores_reach_any_address() {
    let tests = vec![
        ("set_short_memory", ints(&[0x0200_0000, 0, 1])),
        ("set_char_memory", ints(&[0x0300_7FF0, 3, 0xAB])),
        ("set_short_memory", ints(&[0x0400_0000, 0x200, 0x1234])),
    ];
    for (name, args) in tests {
        let mut host = HostCalls::simulated();
        assert_eq!(host.call(name, &args), Ok(Value::Nil), "{} {:?}", name, args);
    }
}

#[test]
fn test_empty_tile_run_after_last_tile() {
    let mut host = HostCalls::simulated();
    host.call("set_tile_memory", &ints(&[512, 0, 0x1111])).unwrap();
    assert!(host
        .registers()
        .bus()
        .region(&VRAM)
        .iter()
        .all(|byte| *byte == 0));
}
