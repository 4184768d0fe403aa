//! Fuzz target: `execute_call`
//!
//! Drives arbitrary byte sequences through the full call pipeline for
//! both key profiles and asserts that the engine never panics, never
//! reports more bytes than the buffer holds, and that every nonzero
//! response is one complete, self-delimiting CBOR item.
//!
//! cargo fuzz run fuzz_execute_call

#![no_main]

use cborpc::{
    ArgKind, COMPACT, DESCRIPTIVE, Entry, HandlerError, Registry, ResultSink, builtin,
    execute_call,
};
use libfuzzer_sys::fuzz_target;
use minicbor::Decoder;

fn sum(
    _: &Registry<'_>,
    args: &mut Decoder<'_>,
    result: &mut ResultSink<'_, '_>,
) -> Result<(), HandlerError> {
    let a = args.u64()?;
    let b = args.u64()?;
    result.u64(a.wrapping_add(b))?;
    Ok(())
}

static TABLE: [Entry; 4] = [
    Entry::new("version", &[], builtin::version),
    Entry::new("ping", &[], builtin::ping),
    Entry::new("lookup", &[ArgKind::ByteString], builtin::lookup),
    Entry::new(
        "sum",
        &[ArgKind::UnsignedInteger, ArgKind::UnsignedInteger],
        sum,
    ),
];

fuzz_target!(|data: &[u8]| {
    let registry = Registry::new(&TABLE);

    // First input byte picks the output capacity so the degraded paths
    // (fallback substitution, zero-byte give-up) get fuzzed too.
    let cap = data.first().copied().unwrap_or(64) as usize;
    let input = data.get(1..).unwrap_or(&[]);
    let mut out = [0u8; 256];

    for profile in [&COMPACT, &DESCRIPTIVE] {
        let outcome = execute_call(&registry, profile, input, &mut out[..cap]);
        assert!(outcome.written <= cap, "write count exceeds buffer");

        if outcome.written > 0 {
            let mut dec = Decoder::new(&out[..outcome.written]);
            dec.skip().expect("response must be valid CBOR");
            assert_eq!(
                dec.position(),
                outcome.written,
                "response must be exactly one CBOR item"
            );
        }
    }
});
