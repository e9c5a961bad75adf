//! A benchmark for the BitStream push/pop primitives.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use framepack::bitstream::{BitReader, BitWriter};

const FIELD_BITS: u32 = 12;

fn write_1m_fields() -> Vec<u8> {
    let mut bw = BitWriter::new();
    let mut out = Vec::new();
    for i in 0..1_000_000u64 {
        if !bw.has_room_for(FIELD_BITS) {
            bw.flush(&mut out);
        }
        bw.write_bits(i & 0xFFF, FIELD_BITS);
    }
    bw.close(&mut out);
    out
}

fn read_back(data: &[u8]) {
    let mut br = BitReader::new(data).unwrap();
    for _ in 0..1_000_000u64 {
        let _ = br.read_bits(FIELD_BITS).unwrap();
        br.reload();
    }
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("bitwriter 1M fixed-width fields", |b| {
        b.iter(|| black_box(write_1m_fields()))
    });

    let data = write_1m_fields();
    c.bench_function("bitreader drain 1M fields", |b| {
        b.iter(|| read_back(black_box(&data)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
