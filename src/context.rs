//! Public entry point: `Context` owns the scratch buffer and the frame
//! dimensions a pack/unpack pair needs, playing the role
//! `pack_create_context`/`pack_destroy_context`/`pack_calc_max_packed_size`/
//! `pack_with_context`/`unpack_with_context` play in
//! `examples/original_source/vidpak/pack.h`/`pack.c`. Rust's ownership rules
//! replace the C API's "not thread-safe, don't call concurrently" comment
//! with a compile-time guarantee: `pack`/`unpack` take `&mut self`, so two
//! calls on the same `Context` can never overlap.

use crate::error::{PackError, PackResult};
use crate::frame::{pack_frame, tile_counts, unpack_frame};
use log::warn;

/// Owns the scratch buffer a tile's predictor/FSE pipeline needs. Immutable
/// after construction except for that scratch buffer, which is reused across
/// every tile of every `pack`/`unpack` call.
pub struct Context {
    width: usize,
    height: usize,
    bpp: u8,
    twidth: usize,
    theight: usize,
    scratch: Vec<u16>,
}

impl Context {
    /// Validates and creates a context for frames shaped `width x height`,
    /// tiled `twidth x theight`. Mirrors `pack_create_context`'s checks,
    /// plus the two Open Questions spec.md §9 resolves in the strict
    /// direction: tile dims must evenly divide the frame (no clipping), and
    /// `theight` must be a multiple of 4 (no variable-active-slice logic).
    pub fn new(
        width: usize,
        height: usize,
        bpp: u8,
        twidth: usize,
        theight: usize,
    ) -> PackResult<Context> {
        if width == 0 || height == 0 {
            return Err(PackError::InvalidArgument { reason: "frame dimensions must be nonzero" });
        }
        if bpp != 12 {
            return Err(PackError::InvalidArgument { reason: "bpp must be 12" });
        }
        if twidth == 0 || theight == 0 {
            return Err(PackError::InvalidArgument { reason: "tile dimensions must be nonzero" });
        }
        if theight % 4 != 0 {
            return Err(PackError::InvalidArgument { reason: "theight must be a multiple of 4" });
        }
        if twidth > width || theight > height {
            return Err(PackError::InvalidArgument {
                reason: "tile dimensions must not exceed the frame",
            });
        }
        if width % twidth != 0 || height % theight != 0 {
            return Err(PackError::InvalidArgument {
                reason: "tile dimensions must evenly divide the frame",
            });
        }

        Ok(Context {
            width,
            height,
            bpp,
            twidth,
            theight,
            scratch: vec![0u16; twidth * theight],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bpp(&self) -> u8 {
        self.bpp
    }

    pub fn twidth(&self) -> usize {
        self.twidth
    }

    pub fn theight(&self) -> usize {
        self.theight
    }

    /// Upper bound on a packed frame's size: the worst case where every tile
    /// falls back to the raw encoding, plus the tile-size table. Mirrors
    /// `pack_calc_max_packed_size`.
    pub fn max_packed_size(&self) -> usize {
        let (tiles_x, tiles_y) = tile_counts(self.width, self.height, self.twidth, self.theight);
        self.width * self.height * 2 + 4 * tiles_x * tiles_y
    }

    /// Fallible pack: returns the byte length written to `dest`, or the
    /// `PackError` that stopped the operation. `src` must cover the whole
    /// frame under strides `(dx, dy)` (u16 units); `dest` must be at least
    /// [`Context::max_packed_size`] bytes.
    pub fn try_pack(
        &mut self,
        src: &[u16],
        dest: &mut [u8],
        dx: isize,
        dy: isize,
    ) -> PackResult<usize> {
        if dx == 0 || dy == 0 {
            return Err(PackError::InvalidArgument { reason: "dx and dy must be nonzero" });
        }
        pack_frame(
            self.width,
            self.height,
            self.twidth,
            self.theight,
            src,
            dest,
            dx,
            dy,
            &mut self.scratch,
        )
    }

    /// Fallible unpack: `src` must be exactly the slice `try_pack`/`pack`
    /// returned (same length, same contents).
    pub fn try_unpack(
        &mut self,
        src: &[u8],
        dest: &mut [u16],
        dx: isize,
        dy: isize,
    ) -> PackResult<()> {
        if dx == 0 || dy == 0 {
            return Err(PackError::InvalidArgument { reason: "dx and dy must be nonzero" });
        }
        unpack_frame(
            self.width,
            self.height,
            self.twidth,
            self.theight,
            src,
            dest,
            dx,
            dy,
            &mut self.scratch,
        )
    }

    /// Spec-shaped entry point: bytes written, or 0 on any failure. The
    /// failure's detail is logged at `warn!` rather than surfaced, matching
    /// spec.md §7's "no partial success, no detail on the sentinel path"
    /// policy.
    pub fn pack(&mut self, src: &[u16], dest: &mut [u8], dx: isize, dy: isize) -> usize {
        match self.try_pack(src, dest, dx, dy) {
            Ok(written) => written,
            Err(e) => {
                warn!("pack failed: {e}");
                0
            }
        }
    }

    /// Spec-shaped entry point: `true` on success, `false` on any failure.
    /// `src.len()` must equal the value `pack` returned for this context.
    pub fn unpack(&mut self, src: &[u8], dest: &mut [u16], dx: isize, dy: isize) -> bool {
        match self.try_unpack(src, dest, dx, dy) {
            Ok(()) => true,
            Err(e) => {
                warn!("unpack failed: {e}");
                false
            }
        }
    }
}
