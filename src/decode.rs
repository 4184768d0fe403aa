//! Request decoder.
//!
//! Walks the top-level request map exactly once, in wire order, against
//! the closed key set of the active [`KeyProfile`]: version (where the
//! profile defines one), transaction id, method selector, argument
//! list. Anything else is a hard failure — the protocol is closed, not
//! extensible by unknown fields.
//!
//! Argument values are never copied or parsed here; only scalar fields
//! (version, transaction id) are read out. The argument array's
//! declared length is captured and a duplicate cursor into its first
//! element is retained for the validator and the handler.

use minicbor::Decoder;
use minicbor::data::Type;

use crate::error::RpcError;
use crate::profile::KeyProfile;
use crate::registry::{Entry, Registry};
use crate::{MAX_METHOD_NAME_LEN, PROTOCOL_VERSION};

// ── Decoder output ───────────────────────────────────────────

/// A fully resolved request, ready for validation and dispatch.
#[derive(Debug)]
pub struct DecodedCall<'t, 'b> {
    /// Registry position of the resolved method.
    pub index: usize,
    pub entry: &'t Entry,
    /// Transaction correlator; `0` means absent.
    pub txid: u64,
    /// Cursor positioned at the first argument value.
    pub args: Decoder<'b>,
    /// Declared length of the argument array (`0` when the list field
    /// was absent).
    pub arg_count: u64,
}

/// A rejected request, with whatever transaction id had been decoded
/// before the failure so the error envelope can still echo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeFailure {
    pub txid: u64,
    pub err: RpcError,
}

// ── Request walk ─────────────────────────────────────────────

/// Decode and resolve one request frame.
pub fn decode_request<'t, 'b>(
    registry: &Registry<'t>,
    profile: &KeyProfile,
    input: &'b [u8],
) -> Result<DecodedCall<'t, 'b>, DecodeFailure> {
    let mut dec = Decoder::new(input);
    let mut txid = 0u64;
    let fail = |txid: u64, err: RpcError| DecodeFailure { txid, err };

    // Outer container must be a definite-length map.
    match dec.datatype() {
        Ok(Type::Map) => {}
        Ok(_) | Err(_) => return Err(fail(0, RpcError::InvalidRequest)),
    }
    let pairs = match dec.map() {
        Ok(Some(n)) => n,
        Ok(None) => return Err(fail(0, RpcError::InvalidRequest)),
        Err(_) => return Err(fail(0, RpcError::ParserFailed)),
    };

    let mut resolved: Option<(usize, &Entry)> = None;
    let mut args: Option<(Decoder<'b>, u64)> = None;
    let mut seen_version = false;
    let mut seen_id = false;
    let mut seen_method = false;
    let mut seen_params = false;

    for _ in 0..pairs {
        let key = profile.read_key(&mut dec).map_err(|e| fail(txid, e))?;

        if profile.version_key.is_some_and(|k| k.as_bytes() == key) {
            if seen_version {
                return Err(fail(txid, RpcError::InvalidRequest));
            }
            seen_version = true;
            match dec.datatype() {
                Ok(Type::U8 | Type::U16 | Type::U32 | Type::U64) => {
                    let v = dec.u64().map_err(|_| fail(txid, RpcError::ParserFailed))?;
                    if v != PROTOCOL_VERSION {
                        return Err(fail(txid, RpcError::VersionMismatch));
                    }
                }
                Ok(_) => return Err(fail(txid, RpcError::InvalidRequest)),
                Err(_) => return Err(fail(txid, RpcError::ParserFailed)),
            }
        } else if key == profile.id_key.as_bytes() {
            if seen_id {
                return Err(fail(txid, RpcError::InvalidRequest));
            }
            seen_id = true;
            match dec.datatype() {
                Ok(Type::U8 | Type::U16 | Type::U32 | Type::U64) => {
                    txid = dec.u64().map_err(|_| fail(txid, RpcError::ParserFailed))?;
                }
                Ok(_) => return Err(fail(txid, RpcError::ParseError)),
                Err(_) => return Err(fail(txid, RpcError::ParserFailed)),
            }
        } else if key == profile.method_key.as_bytes() {
            if seen_method {
                return Err(fail(txid, RpcError::InvalidRequest));
            }
            seen_method = true;
            resolved = Some(resolve_selector(registry, profile, &mut dec).map_err(|e| fail(txid, e))?);
        } else if key == profile.params_key.as_bytes() {
            if seen_params {
                return Err(fail(txid, RpcError::InvalidRequest));
            }
            seen_params = true;
            match dec.datatype() {
                Ok(Type::Array) => {}
                Ok(_) => return Err(fail(txid, RpcError::InvalidRequest)),
                Err(_) => return Err(fail(txid, RpcError::ParserFailed)),
            }
            let count = match dec.array() {
                Ok(Some(n)) => n,
                Ok(None) => return Err(fail(txid, RpcError::InvalidRequest)),
                Err(_) => return Err(fail(txid, RpcError::ParserFailed)),
            };
            // Duplicate cursor stays at element 0; the walk skips past
            // the elements without inspecting them.
            args = Some((dec.clone(), count));
            for _ in 0..count {
                dec.skip().map_err(|_| fail(txid, RpcError::ParserFailed))?;
            }
        } else {
            return Err(fail(txid, RpcError::UnexpectedKey));
        }
    }

    // Trailing bytes after the envelope mean the frame is not the
    // single self-contained request the protocol demands.
    if dec.position() != input.len() {
        return Err(fail(txid, RpcError::InvalidRequest));
    }

    let Some((index, entry)) = resolved else {
        return Err(fail(txid, RpcError::InvalidRequest));
    };
    let (args, arg_count) = args.unwrap_or((Decoder::new(&[]), 0));

    Ok(DecodedCall {
        index,
        entry,
        txid,
        args,
        arg_count,
    })
}

/// Resolve the method selector: a bounded name (profile token type) or
/// a numeric table index. Exactly one form per request; no fallback
/// between forms.
fn resolve_selector<'t>(
    registry: &Registry<'t>,
    profile: &KeyProfile,
    dec: &mut Decoder<'_>,
) -> Result<(usize, &'t Entry), RpcError> {
    match dec.datatype() {
        Ok(Type::Bytes | Type::String) => {
            let name = profile.read_key(dec)?;
            if name.len() > MAX_METHOD_NAME_LEN {
                return Err(RpcError::InvalidRequest);
            }
            registry.lookup_by_name(name).ok_or(RpcError::MethodNotFound)
        }
        Ok(Type::U8 | Type::U16 | Type::U32 | Type::U64) => {
            let index = dec.u64().map_err(|_| RpcError::ParserFailed)?;
            registry
                .lookup_by_index(index)
                .map(|e| (index as usize, e))
                .ok_or(RpcError::MethodNotFound)
        }
        // A negative index can never resolve; consume it and reuse the
        // not-found path.
        Ok(Type::I8 | Type::I16 | Type::I32 | Type::I64 | Type::Int) => {
            dec.skip().map_err(|_| RpcError::ParserFailed)?;
            Err(RpcError::MethodNotFound)
        }
        Ok(_) => Err(RpcError::InvalidRequest),
        Err(_) => Err(RpcError::ParserFailed),
    }
}
