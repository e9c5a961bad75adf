//! Forward-writing / backward-reading bit I/O for the FSE codec.
//!
//! `BitWriter` accumulates bits LSB-first into a 64-bit container and flushes
//! whole bytes forward into the output buffer as they fill up. `BitReader`
//! does the mirror image starting from the tail of a byte slice, so that
//! symbols pushed in forward order come back out in reverse - which is
//! exactly what the two-state FSE codec in `fse::codec` needs, since it
//! walks its input backward and wants to hand symbols back to the caller in
//! their original order.
//!
//! `BitWriter::close` appends a single sentinel "1" bit after the payload so
//! `BitReader::new` can tell how many low bits of the final byte are real
//! data versus padding, the same trick `fseU16.c`'s `BIT_CStream_t` /
//! `BIT_DStream_t` pair uses.

use crate::error::PackError;

/// Bits accumulate LSB-first; `flush` drains whole bytes out to `out`.
pub struct BitWriter {
    container: u64,
    bit_count: u32,
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter { container: 0, bit_count: 0 }
    }

    /// Push the lowest `n` bits of `value` (n <= 25). The caller must make
    /// sure there's room - check [`BitWriter::has_room_for`] and `flush`
    /// first if not, since this won't flush on its own.
    pub fn write_bits(&mut self, value: u64, n: u32) {
        debug_assert!(n <= 25, "single write_bits call can't exceed 25 bits");
        debug_assert!(
            self.has_room_for(n),
            "write_bits would overflow the 64-bit accumulator - flush first"
        );
        if n == 0 {
            return;
        }
        let mask = (1u64 << n) - 1;
        self.container |= (value & mask) << self.bit_count;
        self.bit_count += n;
    }

    /// Whether an `n`-bit write can land in the accumulator without
    /// overflowing it. Fixed-width callers with small, known field widths
    /// can get away with the coarser [`BitWriter::should_flush`]; anything
    /// whose width depends on a runtime `tableLog` (FSE symbol writes) must
    /// check this before every `write_bits` instead.
    pub fn has_room_for(&self, n: u32) -> bool {
        self.bit_count + n <= 64
    }

    /// True once there's enough buffered to be worth draining - safe only
    /// for callers with a narrow, fixed field width known not to overflow
    /// the accumulator between checks (see [`BitWriter::has_room_for`] for
    /// the general case).
    pub fn should_flush(&self) -> bool {
        self.bit_count >= 56
    }

    /// Drain whole bytes from the container into `out`.
    pub fn flush(&mut self, out: &mut Vec<u8>) {
        while self.bit_count >= 8 {
            out.push((self.container & 0xff) as u8);
            self.container >>= 8;
            self.bit_count -= 8;
        }
    }

    /// Append the sentinel bit, flush everything, and return the total
    /// number of bytes written to `out` (for convenience at the call site).
    pub fn close(mut self, out: &mut Vec<u8>) -> usize {
        if !self.has_room_for(1) {
            self.flush(out);
        }
        self.write_bits(1, 1);
        self.flush(out);
        if self.bit_count > 0 {
            out.push((self.container & 0xff) as u8);
            self.bit_count = 0;
        }
        out.len()
    }

    /// Flush everything and zero-pad the final partial byte, without a
    /// sentinel bit. For framing where the reader already knows exactly
    /// how many bits to expect (the NCount header), so there's nothing to
    /// align on.
    pub fn pad_to_byte(mut self, out: &mut Vec<u8>) {
        self.flush(out);
        if self.bit_count > 0 {
            out.push((self.container & 0xff) as u8);
            self.bit_count = 0;
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ReloadStatus {
    /// Plenty of bits left, keep going.
    Unfinished,
    /// Fewer than a full reload's worth of bytes remain to pull in.
    EndOfBuffer,
    /// The sentinel bit has been consumed; decoding is done.
    Completed,
    /// The reader ran past the sentinel without the caller stopping - the
    /// bitstream is corrupt.
    Overflow,
}

/// Reads bits back out in the reverse order they were written, starting
/// from the tail of `data`.
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Index of the next (earlier) byte to pull into the container.
    pos: usize,
    container: u64,
    bit_count: u32,
    /// Set once `reload` has reported `Completed`; a second such hit means
    /// the caller kept reading past the end, which is corruption.
    completed: bool,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, PackError> {
        let last = *data.last().ok_or(PackError::Corruption {
            reason: "empty bitstream",
        })?;
        if last == 0 {
            return Err(PackError::Corruption {
                reason: "final byte has no sentinel bit",
            });
        }
        let sentinel_bit = 7 - last.leading_zeros();
        let mut reader = BitReader {
            data,
            pos: data.len() - 1,
            container: (last as u64) & ((1u64 << sentinel_bit) - 1),
            bit_count: sentinel_bit,
            completed: false,
        };
        reader.reload();
        Ok(reader)
    }

    /// Pull earlier bytes into the container until it's full or the buffer
    /// is exhausted. Returns `Completed` the first time every bit (including
    /// the sentinel) has been consumed and `pos` has reached the front of
    /// the buffer; any call after that reports `Overflow`, since there is
    /// nothing left for a well-formed stream to still be reading.
    pub fn reload(&mut self) -> ReloadStatus {
        if self.bit_count == 0 && self.pos == 0 {
            return if self.completed {
                ReloadStatus::Overflow
            } else {
                self.completed = true;
                ReloadStatus::Completed
            };
        }
        while self.bit_count <= 56 {
            if self.pos == 0 {
                return ReloadStatus::EndOfBuffer;
            }
            self.pos -= 1;
            self.container |= (self.data[self.pos] as u64) << self.bit_count;
            self.bit_count += 8;
        }
        ReloadStatus::Unfinished
    }

    /// Read the lowest `n` buffered bits (n <= 25). Errors rather than
    /// underflowing `bit_count` if the caller didn't reload enough bits
    /// first - this is the actual bounds check, not a `debug_assert!`, since
    /// a truncated or corrupted FSE body must be caught in release builds.
    pub fn read_bits(&mut self, n: u32) -> Result<u64, PackError> {
        debug_assert!(n <= 25);
        if self.bit_count < n {
            return Err(PackError::Corruption {
                reason: "bitstream truncated: not enough buffered bits to satisfy read",
            });
        }
        let mask = (1u64 << n) - 1;
        let value = self.container & mask;
        self.container >>= n;
        self.bit_count -= n;
        Ok(value)
    }

    pub fn is_finished(&self) -> bool {
        self.completed
    }
}
