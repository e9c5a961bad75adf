#![no_main]

use framepack::Context;
use libfuzzer_sys::fuzz_target;

/// `unpack` must never panic, no matter how garbled `data` is - it should
/// just report failure via its boolean return value.
fuzz_target!(|data: &[u8]| {
    let Ok(mut ctx) = Context::new(16, 16, 12, 4, 4) else {
        return;
    };
    let mut out = vec![0u16; 16 * 16];
    let _ = ctx.unpack(data, &mut out, 1, 16);
});
