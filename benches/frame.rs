//! Benchmark for whole-frame pack/unpack throughput at a few tile sizes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use framepack::Context;

fn gradient_frame(width: usize, height: usize) -> Vec<u16> {
    (0..width * height).map(|i| (i * 37 % 4096) as u16).collect()
}

fn pack_unpack(width: usize, height: usize, twidth: usize, theight: usize) {
    let mut ctx = Context::new(width, height, 12, twidth, theight).unwrap();
    let src = gradient_frame(width, height);
    let mut packed = vec![0u8; ctx.max_packed_size()];

    let written = ctx.pack(&src, &mut packed, 1, width as isize);
    packed.truncate(written);

    let mut out = vec![0u16; width * height];
    ctx.unpack(&packed, &mut out, 1, width as isize);
    black_box(out);
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("256x256 frame, 16x16 tiles", |b| {
        b.iter(|| pack_unpack(256, 256, 16, 16))
    });
    c.bench_function("256x256 frame, 64x64 tiles", |b| {
        b.iter(|| pack_unpack(256, 256, 64, 64))
    });
    c.bench_function("512x512 frame, 32x32 tiles", |b| {
        b.iter(|| pack_unpack(512, 512, 32, 32))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
