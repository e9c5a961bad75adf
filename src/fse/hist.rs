//! Histogram and table-log selection for the residual alphabet.
//!
//! The actual count-to-table-size normalization lives in
//! [`super::tables::normalize_for_fse`], which adds the low-probability
//! threshold test an NCount-header-serializing encoder needs; this module
//! only builds the raw histogram and picks `table_log`.

use super::{ALPHABET_SIZE, MAX_SYMBOL_VALUE};
use crate::error::PackError;

/// Count occurrences of each residual value. Four-way unrolled the way
/// `Histogram::from_data` is, so the compiler has a shot at pipelining the
/// increments.
pub fn count_residuals(residuals: &[u16]) -> Result<[u32; ALPHABET_SIZE], PackError> {
    let mut hist0 = [0u32; ALPHABET_SIZE];
    let mut hist1 = [0u32; ALPHABET_SIZE];
    let mut hist2 = [0u32; ALPHABET_SIZE];
    let mut hist3 = [0u32; ALPHABET_SIZE];

    let check = |v: u16| -> Result<usize, PackError> {
        let v = v as usize;
        if v > MAX_SYMBOL_VALUE {
            return Err(PackError::Internal {
                reason: "residual exceeds maxSymbolValue",
            });
        }
        Ok(v)
    };

    let mut i = 0;
    while i + 3 < residuals.len() {
        hist0[check(residuals[i])?] += 1;
        hist1[check(residuals[i + 1])?] += 1;
        hist2[check(residuals[i + 2])?] += 1;
        hist3[check(residuals[i + 3])?] += 1;
        i += 4;
    }
    while i < residuals.len() {
        hist0[check(residuals[i])?] += 1;
        i += 1;
    }

    let mut hist = [0u32; ALPHABET_SIZE];
    for i in 0..ALPHABET_SIZE {
        hist[i] = hist0[i] + hist1[i] + hist2[i] + hist3[i];
    }
    Ok(hist)
}

/// `floor(0.5*log2(srcSize)) + 2`, clamped to `[MIN_TABLE_LOG, MAX_TABLE_LOG]`
/// and never wider than the alphabet actually needs, mirroring
/// `FSE_optimalTableLog`.
pub fn optimal_table_log(src_size: usize, max_symbol_value: usize) -> u32 {
    use super::{DEFAULT_TABLE_LOG, MAX_TABLE_LOG, MIN_TABLE_LOG};

    let max_bits_src = num_bits(src_size.max(1) as u32).saturating_sub(1);
    let min_bits_alphabet = num_bits((max_symbol_value + 1) as u32);

    let mut table_log = DEFAULT_TABLE_LOG.min(max_bits_src.max(MIN_TABLE_LOG));
    table_log = table_log.max(min_bits_alphabet);
    table_log.clamp(MIN_TABLE_LOG, MAX_TABLE_LOG)
}

fn num_bits(num: u32) -> u32 {
    32 - num.leading_zeros()
}
