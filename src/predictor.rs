//! Per-tile neighborhood prediction and residual coding.
//!
//! Four horizontal slices of a tile are predicted and reconstructed in
//! lockstep so the four streams can be advanced together in one loop,
//! mirroring `pack_12bit_average`/`unpack_12bit_average` in `vidpak/pack.c`
//! pixel-for-pixel - with one deliberate correction: residuals wrap modulo
//! `0x1000` (12 bits), not `0x10000`, since these are 12-bit pixels and the
//! `FSE_compressU16` call the original makes right below its `& 0xFFFF`
//! masking passes `65535` as `maxSymbolValue`, which is inconsistent with a
//! 12-bit pixel domain. This rewrite is consistent throughout: residuals
//! and reconstructed pixels are masked to `0xFFF`, and FSE is driven with
//! `maxSymbolValue = 4095`.

use crate::error::PackError;
use crate::fse::codec::{compress, decompress, FseOutcome};

const MASK: u32 = 0xFFF;

#[inline]
fn idx(origin: isize, dx: isize, dy: isize, x: isize, y: isize) -> usize {
    (origin + x * dx + y * dy) as usize
}

/// Predict and residual-code one `tw x th` tile rooted at `origin` in `src`
/// (strides `dx`, `dy` in u16 units), writing the packed payload to `dest`
/// and returning its length. `scratch` must hold at least `tw*th` u16s;
/// only `scratch[4..tw*th]` is used (the first four slots mirror the seed
/// pixels, as in the original's `diff` buffer, and stay unused).
pub fn pack_tile(
    tw: usize,
    th: usize,
    src: &[u16],
    origin: isize,
    dx: isize,
    dy: isize,
    scratch: &mut [u16],
    dest: &mut [u8],
) -> Result<usize, PackError> {
    debug_assert_eq!(th % 4, 0);
    let sheight = th / 4;
    let slice_origin = |k: isize| origin + k * dy * sheight as isize;

    for y in 0..th as isize {
        for x in 0..tw as isize {
            let v = src[idx(origin, dx, dy, x, y)];
            if v > MASK as u16 {
                return Err(PackError::InvalidArgument {
                    reason: "pixel value exceeds 12-bit domain",
                });
            }
        }
    }

    let seeds: [u16; 4] = core::array::from_fn(|k| src[idx(slice_origin(k as isize), dx, dy, 0, 0)]);
    for (k, &v) in seeds.iter().enumerate() {
        dest[2 * k] = (v & 0xFF) as u8;
        dest[2 * k + 1] = (v >> 8) as u8;
    }

    let mut o = 4usize;
    for x in 1..tw as isize {
        for k in 0..4isize {
            let base = slice_origin(k);
            let cur = src[idx(base, dx, dy, x, 0)] as u32;
            let left = src[idx(base, dx, dy, x - 1, 0)] as u32;
            scratch[o] = (cur.wrapping_sub(left) & MASK) as u16;
            o += 1;
        }
    }
    for y in 1..sheight as isize {
        for k in 0..4isize {
            let base = slice_origin(k);
            let cur = src[idx(base, dx, dy, 0, y)] as u32;
            let top = src[idx(base, dx, dy, 0, y - 1)] as u32;
            scratch[o] = (cur.wrapping_sub(top) & MASK) as u16;
            o += 1;
        }
        for x in 1..tw as isize {
            for k in 0..4isize {
                let base = slice_origin(k);
                let cur = src[idx(base, dx, dy, x, y)] as u32;
                let left = src[idx(base, dx, dy, x - 1, y)] as u32;
                let top = src[idx(base, dx, dy, x, y - 1)] as u32;
                let prediction = (left + top) >> 1;
                scratch[o] = (cur.wrapping_sub(prediction) & MASK) as u16;
                o += 1;
            }
        }
    }

    let residuals = &scratch[4..tw * th];
    match compress(residuals)? {
        FseOutcome::NotCompressible => write_raw_tile(tw, th, src, origin, dx, dy, dest),
        FseOutcome::SingleSymbol(v) => {
            dest[8] = (v & 0xFF) as u8;
            dest[9] = (v >> 8) as u8;
            Ok(10)
        }
        FseOutcome::Compressed(bytes) => {
            dest[8..8 + bytes.len()].copy_from_slice(&bytes);
            Ok(8 + bytes.len())
        }
    }
}

fn write_raw_tile(
    tw: usize,
    th: usize,
    src: &[u16],
    origin: isize,
    dx: isize,
    dy: isize,
    dest: &mut [u8],
) -> Result<usize, PackError> {
    let mut o = 0usize;
    for y in 0..th as isize {
        for x in 0..tw as isize {
            let v = src[idx(origin, dx, dy, x, y)];
            dest[o] = (v & 0xFF) as u8;
            dest[o + 1] = (v >> 8) as u8;
            o += 2;
        }
    }
    Ok(2 * tw * th)
}

/// Reverse of [`pack_tile`]. `dest` must cover the same `tw x th` tile at
/// `origin` with the same strides used to pack it.
pub fn unpack_tile(
    tw: usize,
    th: usize,
    src: &[u8],
    dest: &mut [u16],
    origin: isize,
    dx: isize,
    dy: isize,
    scratch: &mut [u16],
) -> Result<(), PackError> {
    debug_assert_eq!(th % 4, 0);
    let raw_len = 2 * tw * th;

    if src.len() == raw_len {
        let mut o = 0usize;
        for y in 0..th as isize {
            for x in 0..tw as isize {
                let v = (src[o] as u16) | ((src[o + 1] as u16) << 8);
                dest[idx(origin, dx, dy, x, y)] = v;
                o += 2;
            }
        }
        return Ok(());
    }

    if src.len() < 8 {
        return Err(PackError::Corruption { reason: "tile payload shorter than seed header" });
    }

    if src.len() == 10 {
        let v = (src[8] as u16) | ((src[9] as u16) << 8);
        for slot in scratch.iter_mut().take(tw * th).skip(4) {
            *slot = v;
        }
    } else {
        let residuals = decompress(&src[8..], tw * th - 4)?;
        scratch[4..tw * th].copy_from_slice(&residuals);
    }

    let sheight = th / 4;
    let slice_origin = |k: isize| origin + k * dy * sheight as isize;

    let mut lefts = [0u16; 4];
    for (k, left) in lefts.iter_mut().enumerate() {
        let v = (src[2 * k] as u16) | ((src[2 * k + 1] as u16) << 8);
        dest[idx(slice_origin(k as isize), dx, dy, 0, 0)] = v;
        *left = v;
    }

    let mut o = 4usize;
    for x in 1..tw as isize {
        for (k, left) in lefts.iter_mut().enumerate() {
            let v = ((scratch[o] as u32 + *left as u32) & MASK) as u16;
            dest[idx(slice_origin(k as isize), dx, dy, x, 0)] = v;
            *left = v;
            o += 1;
        }
    }
    for y in 1..sheight as isize {
        for k in 0..4isize {
            let base = slice_origin(k);
            let top = dest[idx(base, dx, dy, 0, y - 1)] as u32;
            let v = ((scratch[o] as u32 + top) & MASK) as u16;
            dest[idx(base, dx, dy, 0, y)] = v;
            lefts[k as usize] = v;
            o += 1;
        }
        for x in 1..tw as isize {
            for k in 0..4isize {
                let base = slice_origin(k);
                let top = dest[idx(base, dx, dy, x, y - 1)] as u32;
                let left = lefts[k as usize] as u32;
                let prediction = (left + top) >> 1;
                let v = ((scratch[o] as u32 + prediction) & MASK) as u16;
                dest[idx(base, dx, dy, x, y)] = v;
                lefts[k as usize] = v;
                o += 1;
            }
        }
    }

    Ok(())
}
