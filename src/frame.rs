//! Tiling loop over a full frame: the tile-size table header, raster-order
//! iteration, and dispatch into [`crate::predictor`] per tile. This is this
//! crate's analogue of `PagerEncoder`/`PagerDecoder`
//! (`examples/nadavrot-compressor/src/pager.rs`) splitting a byte stream
//! into independently-coded pages, specialized to a 2D raster of tiles
//! instead of a 1D run of byte pages - grounded directly on
//! `pack_with_context`/`unpack_with_context` in `vidpak/pack.c`.

use crate::error::PackError;
use crate::predictor::{pack_tile, unpack_tile};

pub fn tile_counts(width: usize, height: usize, twidth: usize, theight: usize) -> (usize, usize) {
    (width / twidth, height / theight)
}

/// Pack a `width x height` frame, tiled `twidth x theight`, from `src` (the
/// view into the caller's buffer with strides `dx`, `dy` in u16 units) into
/// `dest`. Returns the total bytes written.
#[allow(clippy::too_many_arguments)]
pub fn pack_frame(
    width: usize,
    height: usize,
    twidth: usize,
    theight: usize,
    src: &[u16],
    dest: &mut [u8],
    dx: isize,
    dy: isize,
    scratch: &mut [u16],
) -> Result<usize, PackError> {
    let (tiles_x, tiles_y) = tile_counts(width, height, twidth, theight);
    let table_bytes = 4 * tiles_x * tiles_y;
    if dest.len() < table_bytes {
        return Err(PackError::BufferTooSmall { needed: table_bytes, available: dest.len() });
    }

    let mut dest_pos = table_bytes;
    let mut tile = 0usize;
    for ty in (0..height).step_by(theight) {
        for tx in (0..width).step_by(twidth) {
            let origin = (ty as isize) * dy + (tx as isize) * dx;
            let size = pack_tile(
                twidth,
                theight,
                src,
                origin,
                dx,
                dy,
                scratch,
                &mut dest[dest_pos..],
            )?;
            dest[4 * tile..4 * tile + 4].copy_from_slice(&(size as u32).to_le_bytes());
            dest_pos += size;
            tile += 1;
        }
    }
    Ok(dest_pos)
}

/// Reverse of [`pack_frame`]. `src` must be exactly the slice `pack_frame`
/// returned (i.e. `src.len()` equals its return value).
#[allow(clippy::too_many_arguments)]
pub fn unpack_frame(
    width: usize,
    height: usize,
    twidth: usize,
    theight: usize,
    src: &[u8],
    dest: &mut [u16],
    dx: isize,
    dy: isize,
    scratch: &mut [u16],
) -> Result<(), PackError> {
    let (tiles_x, tiles_y) = tile_counts(width, height, twidth, theight);
    let table_bytes = 4 * tiles_x * tiles_y;
    if src.len() < table_bytes {
        return Err(PackError::BufferTooSmall { needed: table_bytes, available: src.len() });
    }

    let mut src_pos = table_bytes;
    let mut tile = 0usize;
    for ty in (0..height).step_by(theight) {
        for tx in (0..width).step_by(twidth) {
            let mut len_bytes = [0u8; 4];
            len_bytes.copy_from_slice(&src[4 * tile..4 * tile + 4]);
            let size = u32::from_le_bytes(len_bytes) as usize;
            if size > src.len() - src_pos {
                return Err(PackError::BufferTooSmall {
                    needed: src_pos + size,
                    available: src.len(),
                });
            }
            let origin = (ty as isize) * dy + (tx as isize) * dx;
            unpack_tile(
                twidth,
                theight,
                &src[src_pos..src_pos + size],
                dest,
                origin,
                dx,
                dy,
                scratch,
            )?;
            src_pos += size;
            tile += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_tile_frame_round_trips() {
        let (w, h, tw, th) = (8usize, 8usize, 8usize, 8usize);
        let src: Vec<u16> = (0..w * h).map(|i| (i % 4096) as u16).collect();
        let mut scratch = vec![0u16; tw * th];
        let mut dest = vec![0u8; w * h * 2 + 4];

        let len = pack_frame(w, h, tw, th, &src, &mut dest, 1, w as isize, &mut scratch).unwrap();
        dest.truncate(len);

        let mut out = vec![0u16; w * h];
        unpack_frame(w, h, tw, th, &dest, &mut out, 1, w as isize, &mut scratch).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn multi_tile_frame_has_one_table_entry_per_tile() {
        let (w, h, tw, th) = (8usize, 8usize, 4usize, 4usize);
        let src: Vec<u16> = (0..w * h).map(|i| (i * 37 % 4096) as u16).collect();
        let mut scratch = vec![0u16; tw * th];
        let mut dest = vec![0u8; w * h * 2 + 64];

        let len = pack_frame(w, h, tw, th, &src, &mut dest, 1, w as isize, &mut scratch).unwrap();

        let (tiles_x, tiles_y) = tile_counts(w, h, tw, th);
        assert_eq!(tiles_x * tiles_y, 4);
        let table_bytes = 4 * tiles_x * tiles_y;
        let sum_payload: usize = (0..tiles_x * tiles_y)
            .map(|t| {
                let mut b = [0u8; 4];
                b.copy_from_slice(&dest[4 * t..4 * t + 4]);
                u32::from_le_bytes(b) as usize
            })
            .sum();
        assert_eq!(table_bytes + sum_payload, len);

        let mut out = vec![0u16; w * h];
        unpack_frame(w, h, tw, th, &dest[..len], &mut out, 1, w as isize, &mut scratch).unwrap();
        assert_eq!(out, src);
    }
}
