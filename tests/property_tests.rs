//! Property tests for engine robustness.
//!
//! The engine's core promise is total behavior: any byte sequence fed
//! to `execute_call` yields a well-formed outcome without panicking,
//! and `written` never exceeds the output buffer. These properties are
//! checked over arbitrary inputs for both key profiles.

use cborpc::{
    ArgKind, CallStatus, COMPACT, DESCRIPTIVE, Entry, HandlerError, KeyProfile, KeyToken,
    Registry, ResultSink, RpcError, builtin, execute_call,
};
use minicbor::encode::write::Cursor;
use minicbor::{Decoder, Encoder};
use proptest::prelude::*;

fn echo_sum(
    _: &Registry<'_>,
    args: &mut Decoder<'_>,
    result: &mut ResultSink<'_, '_>,
) -> Result<(), HandlerError> {
    let a = args.u64()?;
    let b = args.u64()?;
    result.u64(a.wrapping_add(b))?;
    Ok(())
}

static TABLE: [Entry; 3] = [
    Entry::new("ping", &[], builtin::ping),
    Entry::new(
        "sum",
        &[ArgKind::UnsignedInteger, ArgKind::UnsignedInteger],
        echo_sum,
    ),
    Entry::new("lookup", &[ArgKind::ByteString], builtin::lookup),
];

fn ping_request(profile: &KeyProfile, txid: u64, buf: &mut [u8]) -> usize {
    let mut cur = Cursor::new(buf);
    let mut e = Encoder::new(&mut cur);
    let pairs = 1 + u64::from(txid != 0) + u64::from(profile.version_key.is_some());
    e.map(pairs).unwrap();
    if let Some(ver) = profile.version_key {
        e.str(ver).unwrap().u64(cborpc::PROTOCOL_VERSION).unwrap();
    }
    if txid != 0 {
        match profile.token {
            KeyToken::Bytes => e.bytes(profile.id_key.as_bytes()).unwrap(),
            KeyToken::Text => e.str(profile.id_key).unwrap(),
        };
        e.u64(txid).unwrap();
    }
    match profile.token {
        KeyToken::Bytes => {
            e.bytes(profile.method_key.as_bytes())
                .unwrap()
                .bytes(b"ping")
                .unwrap();
        }
        KeyToken::Text => {
            e.str(profile.method_key).unwrap().str("ping").unwrap();
        }
    }
    cur.position()
}

/// Pull the echoed id back out of a successful response.
fn response_txid(profile: &KeyProfile, wire: &[u8]) -> u64 {
    let mut dec = Decoder::new(wire);
    let pairs = dec.map().unwrap().unwrap();
    let mut txid = 0;
    for _ in 0..pairs {
        let key = match profile.token {
            KeyToken::Bytes => dec.bytes().unwrap(),
            KeyToken::Text => dec.str().unwrap().as_bytes(),
        };
        if key == profile.id_key.as_bytes() {
            txid = dec.u64().unwrap();
        } else {
            dec.skip().unwrap();
        }
    }
    txid
}

proptest! {
    /// Arbitrary bytes never panic the engine, and the reported write
    /// count is always within the buffer. Whatever verdict comes back,
    /// a nonzero `written` means the buffer holds one complete, valid
    /// CBOR item and nothing else.
    #[test]
    fn arbitrary_input_is_always_answered(
        input in proptest::collection::vec(any::<u8>(), 0..=256),
        cap in 0usize..=128,
    ) {
        let registry = Registry::new(&TABLE);
        for profile in [&COMPACT, &DESCRIPTIVE] {
            let mut out = vec![0u8; cap];
            let outcome = execute_call(&registry, profile, &input, &mut out);

            prop_assert!(outcome.written <= cap);
            if outcome.written > 0 {
                let mut dec = Decoder::new(&out[..outcome.written]);
                prop_assert!(dec.skip().is_ok());
                prop_assert_eq!(dec.position(), outcome.written);
            }
        }
    }

    /// Any transaction id round-trips through a successful call.
    #[test]
    fn txid_round_trips(txid in any::<u64>()) {
        let registry = Registry::new(&TABLE);
        for profile in [&COMPACT, &DESCRIPTIVE] {
            let mut req = [0u8; 64];
            let len = ping_request(profile, txid, &mut req);

            let mut out = [0u8; 64];
            let outcome = execute_call(&registry, profile, &req[..len], &mut out);

            prop_assert_eq!(outcome.status, CallStatus::Ok);
            prop_assert_eq!(response_txid(profile, &out[..outcome.written]), txid);
        }
    }

    /// Wrong argument counts are invalid-args no matter what the
    /// values are.
    #[test]
    fn arity_mismatch_is_rejected(
        args in proptest::collection::vec(any::<u64>(), 0..=6),
    ) {
        prop_assume!(args.len() != 2);

        let mut req = [0u8; 128];
        let len = {
            let mut cur = Cursor::new(&mut req[..]);
            let mut e = Encoder::new(&mut cur);
            e.map(2).unwrap();
            e.bytes(b"m").unwrap().bytes(b"sum").unwrap();
            e.bytes(b"p").unwrap().array(args.len() as u64).unwrap();
            for &a in &args {
                e.u64(a).unwrap();
            }
            cur.position()
        };

        let registry = Registry::new(&TABLE);
        let mut out = [0u8; 64];
        let outcome = execute_call(&registry, &COMPACT, &req[..len], &mut out);
        prop_assert_eq!(outcome.status, CallStatus::Failed(RpcError::InvalidArgs));
    }

    /// Well-formed two-argument calls always dispatch and answer with
    /// the wrapping sum.
    #[test]
    fn valid_sum_calls_always_succeed(a in any::<u64>(), b in any::<u64>()) {
        let mut req = [0u8; 64];
        let len = {
            let mut cur = Cursor::new(&mut req[..]);
            let mut e = Encoder::new(&mut cur);
            e.map(2).unwrap();
            e.bytes(b"m").unwrap().bytes(b"sum").unwrap();
            e.bytes(b"p").unwrap().array(2).unwrap();
            e.u64(a).unwrap().u64(b).unwrap();
            cur.position()
        };

        let registry = Registry::new(&TABLE);
        let mut out = [0u8; 64];
        let outcome = execute_call(&registry, &COMPACT, &req[..len], &mut out);
        prop_assert_eq!(outcome.status, CallStatus::Ok);

        let mut dec = Decoder::new(&out[..outcome.written]);
        dec.map().unwrap();
        dec.bytes().unwrap(); // result key
        prop_assert_eq!(dec.u64().unwrap(), a.wrapping_add(b));
    }
}
