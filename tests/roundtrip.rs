use framepack::Context;

fn round_trip_check(width: usize, height: usize, twidth: usize, theight: usize, src: &[u16]) -> Vec<u8> {
    let mut ctx = Context::new(width, height, 12, twidth, theight).unwrap();
    let mut dest = vec![0u8; ctx.max_packed_size()];
    let written = ctx.pack(src, &mut dest, 1, width as isize);
    assert!(written > 0, "pack should have succeeded");
    dest.truncate(written);

    let mut out = vec![0u16; width * height];
    assert!(ctx.unpack(&dest, &mut out, 1, width as isize), "unpack should have succeeded");
    assert_eq!(out, src, "round-trip mismatch");
    dest
}

#[test]
fn test_4x4_all_zero_is_rle_14_bytes() {
    let src = vec![0u16; 16];
    let dest = round_trip_check(4, 4, 4, 4, &src);
    assert_eq!(dest.len(), 14);
    assert_eq!(&dest[0..4], &[10, 0, 0, 0]);
    assert_eq!(&dest[4..12], &[0u8; 8]);
    assert_eq!(&dest[12..14], &[0u8; 2]);
}

#[test]
fn test_8x8_modular_pattern_bounded_size_and_exact() {
    let src: Vec<u16> = (0..64)
        .map(|i| {
            let x = i % 8;
            let y = i / 8;
            (((x + y * 8) % 16) * 16) as u16
        })
        .collect();
    let dest = round_trip_check(8, 8, 4, 4, &src);
    assert!(dest.len() <= 16 + 4 * 8 * 4 * 2);
}

#[test]
fn test_4x4_ramp_is_fse_compressed_between_headers_and_raw() {
    let src: Vec<u16> = (0..16u16).collect();
    let dest = round_trip_check(4, 4, 4, 4, &src);
    assert!(dest.len() > 10, "should not collapse to the RLE shape");
    assert!(dest.len() < 32, "should be smaller than the raw fallback");
}

#[test]
fn test_two_tile_table_has_two_entries() {
    let (w, h, tw, th) = (16usize, 8usize, 8usize, 4usize);
    let src: Vec<u16> = (0..w * h).map(|i| (i * 53 % 4096) as u16).collect();
    let mut ctx = Context::new(w, h, 12, tw, th).unwrap();
    let mut dest = vec![0u8; ctx.max_packed_size()];
    let written = ctx.pack(&src, &mut dest, 1, w as isize);
    assert!(written > 0);
    dest.truncate(written);

    let tiles_x = w / tw;
    let tiles_y = h / th;
    assert_eq!(tiles_x * tiles_y, 2);

    let mut sizes = Vec::new();
    for t in 0..2 {
        let mut b = [0u8; 4];
        b.copy_from_slice(&dest[4 * t..4 * t + 4]);
        sizes.push(u32::from_le_bytes(b) as usize);
    }
    assert_eq!(8 + sizes.iter().sum::<usize>(), written);

    let mut out = vec![0u16; w * h];
    assert!(ctx.unpack(&dest, &mut out, 1, w as isize));
    assert_eq!(out, src);
}

#[test]
fn test_uniform_random_64x64_has_raw_fallback_tile() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let (w, h, tw, th) = (64usize, 64usize, 8usize, 8usize);
    let src: Vec<u16> = (0..w * h).map(|_| rng.gen_range(0..4096)).collect();

    let mut ctx = Context::new(w, h, 12, tw, th).unwrap();
    let mut dest = vec![0u8; ctx.max_packed_size()];
    let written = ctx.pack(&src, &mut dest, 1, w as isize);
    assert!(written > 0);
    dest.truncate(written);

    let tiles_x = w / tw;
    let tiles_y = h / th;
    let table_bytes = 4 * tiles_x * tiles_y;
    let raw_tile_len = 2 * tw * th;
    let has_raw_tile = (0..tiles_x * tiles_y).any(|t| {
        let mut b = [0u8; 4];
        b.copy_from_slice(&dest[4 * t..4 * t + 4]);
        u32::from_le_bytes(b) as usize == raw_tile_len
    });
    assert!(has_raw_tile, "expected at least one tile on the raw-fallback path");
    assert!(table_bytes < dest.len());

    let mut out = vec![0u16; w * h];
    assert!(ctx.unpack(&dest, &mut out, 1, w as isize));
    assert_eq!(out, src);
}

#[test]
fn test_oob_symbol_rejected() {
    let mut ctx = Context::new(4, 4, 12, 4, 4).unwrap();
    let mut src = vec![0u16; 16];
    src[3] = 4096;
    let mut dest = vec![0u8; ctx.max_packed_size()];
    assert_eq!(ctx.pack(&src, &mut dest, 1, 4), 0);
}

#[test]
fn test_smallest_legal_tile_th4_tw1() {
    let src: Vec<u16> = vec![1, 2, 3, 4];
    let dest = round_trip_check(1, 4, 1, 4, &src);
    assert!(dest.len() == 8 || dest.len() == 10);
}

#[test]
fn test_single_tile_frame_has_4_byte_table() {
    let src: Vec<u16> = (0..16).map(|i| (i * 19 % 4096) as u16).collect();
    let dest = round_trip_check(4, 4, 4, 4, &src);
    let mut b = [0u8; 4];
    b.copy_from_slice(&dest[0..4]);
    assert_eq!(u32::from_le_bytes(b) as usize, dest.len() - 4);
}

#[test]
fn test_round_trip_random_frames_various_tile_shapes() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(1234);

    let shapes: [(usize, usize, usize, usize); 4] =
        [(16, 16, 4, 4), (32, 16, 8, 8), (16, 32, 16, 4), (8, 8, 8, 8)];

    for (w, h, tw, th) in shapes {
        let src: Vec<u16> = (0..w * h).map(|_| rng.gen_range(0..4096)).collect();
        round_trip_check(w, h, tw, th, &src);
    }
}

#[test]
fn test_round_trip_skewed_gaussian_frame() {
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    let mut rng = rand::rngs::StdRng::seed_from_u64(99);
    let normal = Normal::new(2048.0_f32, 200.0_f32).unwrap();
    let (w, h, tw, th) = (32usize, 32usize, 8usize, 8usize);
    let src: Vec<u16> = (0..w * h)
        .map(|_| normal.sample(&mut rng).clamp(0.0, 4095.0) as u16)
        .collect();
    round_trip_check(w, h, tw, th, &src);
}

#[test]
fn test_max_packed_size_is_an_upper_bound() {
    let (w, h, tw, th) = (32usize, 16usize, 8usize, 4usize);
    let mut ctx = Context::new(w, h, 12, tw, th).unwrap();
    let src: Vec<u16> = (0..w * h).map(|i| (i * 71 % 4096) as u16).collect();
    let mut dest = vec![0u8; ctx.max_packed_size()];
    let written = ctx.pack(&src, &mut dest, 1, w as isize);
    assert!(written > 0);
    assert!(written <= ctx.max_packed_size());
}
