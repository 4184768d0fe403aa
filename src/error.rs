//! Engine error kinds and their wire representation.
//!
//! Every way a call can fail short of the handler's own business logic
//! is one variant of [`RpcError`]. Each variant carries a fixed numeric
//! wire code (JSON-RPC compatible where a standard code exists) and a
//! fixed human-readable text, so the response encoder can always build
//! a complete error object without allocating.
//!
//! All variants are `Copy`; failures travel by value through the
//! pipeline and never by panic — the engine must survive arbitrarily
//! malformed input.

use core::fmt;

// ── Error kinds ──────────────────────────────────────────────

/// Engine-level call failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcError {
    /// Request structure is not what the protocol demands (outer value
    /// not a map, wrong key token type, bad selector, oversized name,
    /// duplicate or indefinite-length fields).
    InvalidRequest,
    /// A key outside the closed request key set was present.
    UnexpectedKey,
    /// A version field was present but did not equal the supported one.
    VersionMismatch,
    /// Method selector resolved to no registry entry.
    MethodNotFound,
    /// Argument count or per-position kind did not match the schema.
    InvalidArgs,
    /// A scalar field held a value of the wrong CBOR type.
    ParseError,
    /// The CBOR cursor failed structurally (premature end, bad item).
    ParserFailed,
    /// Internal invariant violated; should be unreachable.
    InternalError,
    /// The output buffer could not hold the response, or even the
    /// fallback error encoding.
    EncodeError,
}

impl RpcError {
    /// Numeric code carried in the error object on the wire.
    ///
    /// Standard JSON-RPC codes where one exists; implementation-defined
    /// codes in the `-32096..=-32099` block otherwise.
    pub const fn code(self) -> i64 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidArgs => -32602,
            Self::InternalError => -32603,
            Self::VersionMismatch => -32096,
            Self::UnexpectedKey => -32097,
            Self::ParserFailed => -32098,
            Self::EncodeError => -32099,
        }
    }

    /// Fixed response text for this error kind.
    pub const fn text(self) -> &'static str {
        match self {
            Self::MethodNotFound => "Method not found",
            Self::ParseError => "Parse error",
            Self::InvalidArgs => "Invalid arguments",
            Self::UnexpectedKey => "Unexpected key in request",
            Self::ParserFailed => "Internal error (parser failed)",
            Self::InvalidRequest => "Invalid request",
            Self::VersionMismatch => "Unsupported protocol version",
            Self::InternalError => "Internal error",
            Self::EncodeError => "Encode error",
        }
    }

    /// Response text for an arbitrary wire code.
    ///
    /// Total over all inputs: codes outside the engine's own set map to
    /// a generic text, so the encoder never lacks a message.
    pub const fn text_for_code(code: i64) -> &'static str {
        match code {
            -32700 => Self::ParseError.text(),
            -32600 => Self::InvalidRequest.text(),
            -32601 => Self::MethodNotFound.text(),
            -32602 => Self::InvalidArgs.text(),
            -32603 => Self::InternalError.text(),
            -32096 => Self::VersionMismatch.text(),
            -32097 => Self::UnexpectedKey.text(),
            -32098 => Self::ParserFailed.text(),
            -32099 => Self::EncodeError.text(),
            _ => "Unknown error",
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text(), self.code())
    }
}

// ── Codec error mapping ──────────────────────────────────────

/// Structural decode failures surface as [`RpcError::ParserFailed`];
/// the decoder itself reports type-level mismatches before they reach
/// this conversion.
impl From<minicbor::decode::Error> for RpcError {
    fn from(_: minicbor::decode::Error) -> Self {
        Self::ParserFailed
    }
}
