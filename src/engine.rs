//! Call engine — decode, resolve, validate, dispatch, encode.
//!
//! **Transport-decoupled**: the engine does not own a transport.
//! Callers hand in one request frame and one output buffer and get back
//! a status plus the number of response bytes produced. Every input —
//! including unparseable garbage — yields a response, with a single
//! exception: when the output buffer cannot hold even the precomputed
//! fallback error encoding, the engine reports zero bytes and an encode
//! failure, and the transport must send nothing.
//!
//! The pipeline is single-pass and allocation-free:
//!
//! 1. **Decode** — walk the request map once, resolve the method.
//! 2. **Validate** — arity and per-position kinds, before any handler
//!    code runs.
//! 3. **Dispatch** — the handler writes its result value directly into
//!    the response envelope through a bounded cursor.
//! 4. **Encode** — close the envelope; on overflow, rebuild as an error
//!    envelope, and failing that substitute the fallback blob.

use log::{debug, warn};
use minicbor::Encoder;
use minicbor::encode::write::{Cursor, EndOfSlice};

use crate::ERROR_TEXT_MAX;
use crate::decode::{DecodedCall, decode_request};
use crate::error::RpcError;
use crate::handler::HandlerError;
use crate::profile::KeyProfile;
use crate::registry::Registry;
use crate::validate::validate_args;

// ── Call surface ─────────────────────────────────────────────

/// Call-level status reported back to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    /// Handler completed; a success envelope is in the buffer.
    Ok,
    /// Engine-level failure; an error envelope (or the fallback) is in
    /// the buffer unless `written == 0`.
    Failed(RpcError),
    /// Handler-reported application error; the code is carried in the
    /// encoded error envelope.
    AppError(i64),
}

/// Result of one call: status plus bytes written into the output slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOutcome {
    pub status: CallStatus,
    pub written: usize,
}

/// Run one RPC exchange.
///
/// Pure function of its inputs plus the immutable registry: no I/O, no
/// allocation, no retained references past return. Concurrent calls are
/// safe as long as each uses its own buffers.
pub fn execute_call(
    registry: &Registry<'_>,
    profile: &KeyProfile,
    input: &[u8],
    output: &mut [u8],
) -> CallOutcome {
    match attempt_call(registry, profile, input, output) {
        Ok(written) => CallOutcome {
            status: CallStatus::Ok,
            written,
        },
        Err(failure) => respond_with_error(profile, output, &failure),
    }
}

// ── Failure plumbing ─────────────────────────────────────────

/// Everything the error encoder needs about a failed call.
struct Failure {
    /// Echoed iff nonzero; zero means the request never carried one
    /// (or failed before it was decoded).
    txid: u64,
    kind: FailureKind,
}

enum FailureKind {
    Engine(RpcError),
    App {
        code: i64,
        message: Option<heapless::String<ERROR_TEXT_MAX>>,
    },
}

impl Failure {
    fn engine(txid: u64, err: RpcError) -> Self {
        Self {
            txid,
            kind: FailureKind::Engine(err),
        }
    }

    fn code(&self) -> i64 {
        match &self.kind {
            FailureKind::Engine(err) => err.code(),
            FailureKind::App { code, .. } => *code,
        }
    }

    /// Handler-supplied text wins over the fixed code→text table.
    fn text(&self) -> &str {
        match &self.kind {
            FailureKind::Engine(err) => err.text(),
            FailureKind::App {
                code,
                message: None,
            } => RpcError::text_for_code(*code),
            FailureKind::App {
                message: Some(text),
                ..
            } => text,
        }
    }

    fn status(&self) -> CallStatus {
        match &self.kind {
            FailureKind::Engine(err) => CallStatus::Failed(*err),
            FailureKind::App { code, .. } => CallStatus::AppError(*code),
        }
    }
}

// ── Dispatch ─────────────────────────────────────────────────

/// Decode, validate, dispatch, and encode the success envelope.
fn attempt_call(
    registry: &Registry<'_>,
    profile: &KeyProfile,
    input: &[u8],
    output: &mut [u8],
) -> Result<usize, Failure> {
    let call = decode_request(registry, profile, input)
        .map_err(|f| Failure::engine(f.txid, f.err))?;

    validate_args(call.entry, &call.args, call.arg_count)
        .map_err(|err| Failure::engine(call.txid, err))?;

    debug!(
        "rpc: dispatch {} (index {}, {} args, txid {})",
        call.entry.name(),
        call.index,
        call.arg_count,
        call.txid
    );

    match encode_success(registry, profile, &call, output) {
        Ok(written) => Ok(written),
        Err(HandlerError::MethodNotFound) => {
            Err(Failure::engine(call.txid, RpcError::MethodNotFound))
        }
        Err(HandlerError::Rpc(err)) => Err(Failure::engine(call.txid, err)),
        Err(HandlerError::App { code, message }) => Err(Failure {
            txid: call.txid,
            kind: FailureKind::App { code, message },
        }),
    }
}

/// Build the success envelope around the handler's single result value.
///
/// The handler only ever sees the result cursor — never the id pair or
/// the outer map framing.
fn encode_success(
    registry: &Registry<'_>,
    profile: &KeyProfile,
    call: &DecodedCall<'_, '_>,
    output: &mut [u8],
) -> Result<usize, HandlerError> {
    let mut cursor = Cursor::new(output);
    let mut enc = Encoder::new(&mut cursor);

    enc.map(1 + u64::from(call.txid != 0))?;
    if call.txid != 0 {
        profile.write_key(&mut enc, profile.id_key)?;
        enc.u64(call.txid)?;
    }
    profile.write_key(&mut enc, profile.result_key)?;

    let mut args = call.args.clone();
    (call.entry.handler())(registry, &mut args, &mut enc)?;

    Ok(cursor.position())
}

// ── Error envelope & degraded mode ───────────────────────────

/// Encode the error envelope, falling back to the precomputed minimal
/// response when the buffer cannot hold it, and to zero bytes when it
/// cannot even hold that.
fn respond_with_error(profile: &KeyProfile, output: &mut [u8], failure: &Failure) -> CallOutcome {
    warn!("rpc: call failed: code {} ({})", failure.code(), failure.text());

    if let Ok(written) = encode_error_envelope(profile, failure, output) {
        return CallOutcome {
            status: failure.status(),
            written,
        };
    }

    let fallback = profile.fallback;
    if output.len() >= fallback.len() {
        output[..fallback.len()].copy_from_slice(fallback);
        warn!("rpc: error envelope overflowed output buffer, substituted fallback");
        return CallOutcome {
            status: failure.status(),
            written: fallback.len(),
        };
    }

    warn!("rpc: output buffer too small even for fallback response");
    CallOutcome {
        status: CallStatus::Failed(RpcError::EncodeError),
        written: 0,
    }
}

fn encode_error_envelope(
    profile: &KeyProfile,
    failure: &Failure,
    output: &mut [u8],
) -> Result<usize, minicbor::encode::Error<EndOfSlice>> {
    let mut cursor = Cursor::new(output);
    let mut enc = Encoder::new(&mut cursor);

    enc.map(1 + u64::from(failure.txid != 0))?;
    if failure.txid != 0 {
        profile.write_key(&mut enc, profile.id_key)?;
        enc.u64(failure.txid)?;
    }
    profile.write_key(&mut enc, profile.error_key)?;
    enc.map(2)?;
    profile.write_key(&mut enc, profile.error_code_key)?;
    enc.i64(failure.code())?;
    profile.write_key(&mut enc, profile.error_message_key)?;
    profile.write_text(&mut enc, failure.text())?;

    Ok(cursor.position())
}
