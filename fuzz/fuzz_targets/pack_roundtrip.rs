#![no_main]

use framepack::Context;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, arbitrary::Arbitrary)]
struct Frame {
    w: u8,
    h: u8,
    tw: u8,
    th: u8,
    pixels: Vec<u16>,
}

fuzz_target!(|frame: Frame| {
    let width = (frame.w as usize % 32) + 1;
    let height = ((frame.h as usize % 8) + 1) * 4;
    let twidth = (frame.tw as usize % width) + 1;
    let theight = (((frame.th as usize % (height / 4)) + 1) * 4).min(height);

    if width % twidth != 0 || height % theight != 0 {
        return;
    }

    let Ok(mut ctx) = Context::new(width, height, 12, twidth, theight) else {
        return;
    };

    let mut src = vec![0u16; width * height];
    for (i, slot) in src.iter_mut().enumerate() {
        *slot = frame.pixels.get(i).copied().unwrap_or(0) & 0xFFF;
    }

    let mut packed = vec![0u8; ctx.max_packed_size()];
    let written = ctx.pack(&src, &mut packed, 1, width as isize);
    assert!(written > 0, "pack must succeed for an in-domain frame");
    packed.truncate(written);

    let mut out = vec![0u16; width * height];
    assert!(ctx.unpack(&packed, &mut out, 1, width as isize));
    assert_eq!(out, src);
});
