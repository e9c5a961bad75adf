//! Two interleaved FSE state machines sharing one table and one
//! [`BitStream`](crate::bitstream), generalized from `coding/simple.rs`'s
//! single-state `SimpleEncoder`/`SimpleDecoder` the way
//! `FSE_compressU16_usingCTable`/`FSE_decompressU16_usingDTable` generalize
//! a single-state coder in `fseU16.c`.

use super::hist::count_residuals;
use super::tables::{build_dec_table, build_enc_table, normalize_for_fse, read_ncount, write_ncount};
use super::MAX_SYMBOL_VALUE;
use crate::bitstream::{BitReader, BitWriter, ReloadStatus};
use crate::error::PackError;

/// What happened when compressing a run of residuals.
pub enum FseOutcome {
    /// Compression wouldn't have helped; caller should store the input raw.
    NotCompressible,
    /// Every residual was the same value; caller should store it once (RLE).
    SingleSymbol(u16),
    /// `bytes.len()` bytes of FSE-compressed output.
    Compressed(Vec<u8>),
}

/// The chronological sequence of (state role, symbol index) transition
/// events the two-state loop performs, shared between encode and decode so
/// the decoder can replay it in reverse. `true` selects the "A" lineage
/// (seeded from the last symbol), `false` the "B" lineage (seeded from the
/// second-to-last).
fn event_sequence(n: usize) -> Vec<(bool, usize)> {
    let mut events = Vec::new();
    let mut i = n as isize - 3;
    while i >= 1 {
        events.push((false, i as usize));
        events.push((true, (i - 1) as usize));
        i -= 2;
    }
    if i == 0 {
        events.push((false, 0usize));
    }
    events
}

/// Compress `residuals` (each `<= MAX_SYMBOL_VALUE`). Returns
/// [`FseOutcome::NotCompressible`] for inputs of length <= 2 or where the
/// FSE output would not be smaller than storing the values raw.
pub fn compress(residuals: &[u16]) -> Result<FseOutcome, PackError> {
    let n = residuals.len();
    if n <= 2 {
        return Ok(FseOutcome::NotCompressible);
    }

    let first = residuals[0];
    if residuals.iter().all(|&v| v == first) {
        return Ok(FseOutcome::SingleSymbol(first));
    }

    let hist = count_residuals(residuals)?;
    let max_symbol_value = hist
        .iter()
        .rposition(|&c| c != 0)
        .unwrap_or(0)
        .max(1)
        .min(MAX_SYMBOL_VALUE);

    let table_log = super::hist::optimal_table_log(n, max_symbol_value);
    let counts = normalize_for_fse(&hist, max_symbol_value, table_log);

    let mut header = Vec::new();
    write_ncount(&counts, table_log, max_symbol_value, &mut header);

    let enc = build_enc_table(&counts, table_log)?;
    let mut body = Vec::new();
    encode_states(&enc, residuals, &mut body);

    let mut out = header;
    out.extend_from_slice(&body);

    if out.len() >= n * 2 {
        return Ok(FseOutcome::NotCompressible);
    }
    Ok(FseOutcome::Compressed(out))
}

/// Decompress `data` (as produced by [`compress`]'s `Compressed` variant)
/// into exactly `expected_len` residuals.
pub fn decompress(data: &[u8], expected_len: usize) -> Result<Vec<u16>, PackError> {
    let (table_log, max_symbol_value, counts, header_len) = read_ncount(data)?;
    if max_symbol_value > MAX_SYMBOL_VALUE {
        return Err(PackError::Corruption { reason: "decoded maxSymbolValue too large" });
    }
    let dec = build_dec_table(&counts, table_log)?;
    let body = data.get(header_len..).ok_or(PackError::Corruption {
        reason: "NCount header longer than payload",
    })?;
    decode_states(&dec, body, expected_len)
}

/// Each write costs at most `table_log` bits. The accumulator can absorb 4
/// such writes between flushes only if it's wide enough for `4*tableLog+7`
/// bits; otherwise drop to flushing every 2 writes instead - the same
/// static capacity check `fseU16.c`'s `BIT_FLUSHBITS_1`/`BIT_FLUSHBITS_2`
/// split makes, so a run of count-1 symbols at `table_log = 15` can never
/// push the 64-bit container past its limit before a flush runs.
fn flush_group_size(table_log: u32) -> usize {
    if 4 * table_log as u64 + 7 <= 64 {
        4
    } else {
        2
    }
}

fn encode_states(enc: &super::tables::EncTable, residuals: &[u16], out: &mut Vec<u8>) {
    let n = residuals.len();
    let table_log = enc.table_log();
    let mut bw = BitWriter::new();

    let mut state_a = enc.init_state(residuals[n - 1]);
    let mut state_b = enc.init_state(residuals[n - 2]);

    let group_size = flush_group_size(table_log);
    for (i, (is_a, idx)) in event_sequence(n).into_iter().enumerate() {
        let state = if is_a { &mut state_a } else { &mut state_b };
        let (nb_bits, bits, new_state) = enc.encode(*state, residuals[idx]);
        if !bw.has_room_for(nb_bits) {
            bw.flush(out);
        }
        bw.write_bits(bits as u64, nb_bits);
        *state = new_state;
        if (i + 1) % group_size == 0 {
            bw.flush(out);
        }
    }

    if !bw.has_room_for(table_log) {
        bw.flush(out);
    }
    bw.write_bits(state_b as u64, table_log);
    if !bw.has_room_for(table_log) {
        bw.flush(out);
    }
    bw.write_bits(state_a as u64, table_log);
    bw.close(out);
}

fn decode_states(
    dec: &super::tables::DecTable,
    data: &[u8],
    expected_len: usize,
) -> Result<Vec<u16>, PackError> {
    let n = expected_len;
    if n <= 2 {
        return Err(PackError::Internal {
            reason: "decode_states called with too few residuals for two-state FSE",
        });
    }
    let table_log = dec.table_log();
    let mut br = BitReader::new(data)?;

    let mut state_a = br.read_bits(table_log)? as usize;
    let mut state_b = br.read_bits(table_log)? as usize;
    if br.reload() == ReloadStatus::Overflow {
        return Err(PackError::Corruption {
            reason: "FSE body too short to hold its own state headers",
        });
    }

    let events: Vec<(bool, usize)> = event_sequence(n).into_iter().rev().collect();
    let last_event = events.len() - 1;
    let mut out = vec![0u16; n];

    for (i, (is_a, idx)) in events.into_iter().enumerate() {
        let state = if is_a { &mut state_a } else { &mut state_b };
        let entry = dec.entry(*state);
        out[idx] = entry.symbol;
        let bits = br.read_bits(entry.nb_bits as u32)? as usize;
        *state = entry.new_state as usize + bits;

        let status = br.reload();
        if i == last_event {
            if status != ReloadStatus::Completed {
                return Err(PackError::Corruption {
                    reason: "FSE body did not terminate exactly at the sentinel bit",
                });
            }
        } else if status == ReloadStatus::Overflow {
            return Err(PackError::Corruption {
                reason: "FSE body ran out of bits before all symbols were decoded",
            });
        }
    }

    out[n - 1] = dec.entry(state_a).symbol;
    out[n - 2] = dec.entry(state_b).symbol;

    Ok(out)
}
