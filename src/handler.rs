//! Handler contract.
//!
//! A handler is a pure function of a validated argument cursor and a
//! result sink positioned inside the response envelope. On success it
//! writes exactly one CBOR value (possibly a nested container) through
//! the sink; it never sees the envelope framing around it. Failures are
//! returned, not panicked, and the `?` operator works on codec errors
//! via the `From` impls below.
//!
//! Handlers must not retain either cursor beyond the call.

use heapless::String;
use minicbor::Decoder;
use minicbor::Encoder;
use minicbor::encode::write::{Cursor, EndOfSlice};

use crate::ERROR_TEXT_MAX;
use crate::error::RpcError;
use crate::registry::Registry;

// ── Types ────────────────────────────────────────────────────

/// Write cursor for the handler's single result value.
///
/// Backed by the caller's output buffer; running out of space surfaces
/// as an [`EndOfSlice`] write error, which converts into
/// [`HandlerError::Rpc`]`(`[`RpcError::EncodeError`]`)`.
pub type ResultSink<'e, 'b> = Encoder<&'e mut Cursor<&'b mut [u8]>>;

/// A registered method implementation.
///
/// The argument cursor is positioned at element 0 of the argument array
/// and has already passed arity and kind validation against the entry's
/// schema. The registry is handed through read-only so handlers can
/// perform their own name/index resolution (the builtin `lookup`
/// registrant does exactly that); host state beyond it lives with the
/// host, not the engine.
pub type Handler = fn(
    &Registry<'_>,
    &mut Decoder<'_>,
    &mut ResultSink<'_, '_>,
) -> Result<(), HandlerError>;

/// Why a handler declined to produce a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The requested sub-operation does not exist; reuse the top-level
    /// method-not-found error path.
    MethodNotFound,
    /// Application-level failure. `code` is carried verbatim in the
    /// error object; `message` overrides the fixed code→text table when
    /// present.
    App {
        code: i64,
        message: Option<String<ERROR_TEXT_MAX>>,
    },
    /// Engine-level failure (codec errors, buffer exhaustion).
    Rpc(RpcError),
}

impl HandlerError {
    /// Application error with the default table text for `code`.
    pub fn app(code: i64) -> Self {
        Self::App {
            code,
            message: None,
        }
    }

    /// Application error with custom text. Text beyond
    /// [`ERROR_TEXT_MAX`] bytes is truncated at a char boundary.
    pub fn app_msg(code: i64, message: &str) -> Self {
        let mut text = String::new();
        let mut end = message.len().min(ERROR_TEXT_MAX);
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        // Cannot fail: `end` is clamped to capacity.
        let _ = text.push_str(&message[..end]);
        Self::App {
            code,
            message: Some(text),
        }
    }
}

// ── Codec error conversions ──────────────────────────────────

impl From<RpcError> for HandlerError {
    fn from(err: RpcError) -> Self {
        Self::Rpc(err)
    }
}

/// Result-sink write failures: buffer exhaustion is an encode error,
/// anything else is an internal encoder fault.
impl From<minicbor::encode::Error<EndOfSlice>> for HandlerError {
    fn from(err: minicbor::encode::Error<EndOfSlice>) -> Self {
        if err.is_write() {
            Self::Rpc(RpcError::EncodeError)
        } else {
            Self::Rpc(RpcError::InternalError)
        }
    }
}

/// Argument cursor failures inside a handler. Validation has already
/// checked kinds, so a structural failure here means the input lied
/// about its own length.
impl From<minicbor::decode::Error> for HandlerError {
    fn from(_: minicbor::decode::Error) -> Self {
        Self::Rpc(RpcError::ParserFailed)
    }
}
