//! Wire key profiles.
//!
//! The protocol exists in two observed key-naming shapes: a compact
//! variant using single-character CBOR byte-string keys, and a
//! descriptive variant using short text keys. Execution semantics are
//! identical; only the recognized key constants and the key token type
//! differ. A [`KeyProfile`] captures that difference as configuration
//! so the decoder and encoder run one state machine, not two.
//!
//! Each profile also carries its precomputed minimal error response:
//! a fixed, known-valid CBOR blob substituted when normal error
//! encoding overflows the caller's buffer.

use minicbor::decode::Decoder;
use minicbor::encode::{Encoder, Error as EncodeError, Write};

use crate::error::RpcError;

// ── Profile definition ───────────────────────────────────────

/// How map keys (and string payloads owned by the engine) are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyToken {
    /// Keys are CBOR byte strings (compact variant).
    Bytes,
    /// Keys are CBOR text strings (descriptive variant).
    Text,
}

/// One key-naming configuration of the request/response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyProfile {
    pub token: KeyToken,
    /// Request version key; `None` means the profile has no version
    /// field and any such key is simply unknown.
    pub version_key: Option<&'static str>,
    /// Transaction id key (request and response).
    pub id_key: &'static str,
    /// Method selector key.
    pub method_key: &'static str,
    /// Argument list key.
    pub params_key: &'static str,
    /// Response result key.
    pub result_key: &'static str,
    /// Response error key; holds a nested code+message map.
    pub error_key: &'static str,
    /// Code key inside the error object.
    pub error_code_key: &'static str,
    /// Message key inside the error object.
    pub error_message_key: &'static str,
    /// Precomputed minimal error response for this profile.
    pub fallback: &'static [u8],
}

/// Compact profile: byte-string keys `"id"`/`"m"`/`"p"`, result under
/// `"v"`, errors under `"e"`. No version field.
///
/// Fallback blob: `{b"e": {b"c": -32099, b"msg": b"encode_error"}}`.
pub const COMPACT: KeyProfile = KeyProfile {
    token: KeyToken::Bytes,
    version_key: None,
    id_key: "id",
    method_key: "m",
    params_key: "p",
    result_key: "v",
    error_key: "e",
    error_code_key: "c",
    error_message_key: "msg",
    fallback: &[
        0xA1, // map(1)
        0x41, 0x65, // b"e"
        0xA2, // map(2)
        0x41, 0x63, // b"c"
        0x39, 0x7D, 0x62, // -32099
        0x43, 0x6D, 0x73, 0x67, // b"msg"
        0x4C, 0x65, 0x6E, 0x63, 0x6F, 0x64, 0x65, 0x5F, 0x65, 0x72, 0x72, 0x6F,
        0x72, // b"encode_error"
    ],
};

/// Descriptive profile: text keys `"ver"`/`"id"`/`"method"`/`"params"`,
/// result under `"res"`, errors under `"err"`. The version field, when
/// present, must equal [`crate::PROTOCOL_VERSION`].
///
/// Fallback blob: `{"err": {"c": -32099, "msg": "encode_error"}}`.
pub const DESCRIPTIVE: KeyProfile = KeyProfile {
    token: KeyToken::Text,
    version_key: Some("ver"),
    id_key: "id",
    method_key: "method",
    params_key: "params",
    result_key: "res",
    error_key: "err",
    error_code_key: "c",
    error_message_key: "msg",
    fallback: &[
        0xA1, // map(1)
        0x63, 0x65, 0x72, 0x72, // "err"
        0xA2, // map(2)
        0x61, 0x63, // "c"
        0x39, 0x7D, 0x62, // -32099
        0x63, 0x6D, 0x73, 0x67, // "msg"
        0x6C, 0x65, 0x6E, 0x63, 0x6F, 0x64, 0x65, 0x5F, 0x65, 0x72, 0x72, 0x6F,
        0x72, // "encode_error"
    ],
};

// ── Token-parameterized cursor helpers ───────────────────────

impl KeyProfile {
    /// Read one map key with the profile's token type.
    ///
    /// A key of the wrong token type is an invalid request; a cursor
    /// failure underneath it is a parser failure.
    pub(crate) fn read_key<'b>(&self, dec: &mut Decoder<'b>) -> Result<&'b [u8], RpcError> {
        let ty = dec.datatype().map_err(|_| RpcError::ParserFailed)?;
        match (self.token, ty) {
            (KeyToken::Bytes, minicbor::data::Type::Bytes) => {
                dec.bytes().map_err(|_| RpcError::ParserFailed)
            }
            (KeyToken::Text, minicbor::data::Type::String) => dec
                .str()
                .map(str::as_bytes)
                .map_err(|_| RpcError::ParserFailed),
            _ => Err(RpcError::InvalidRequest),
        }
    }

    /// Write one map key with the profile's token type.
    pub(crate) fn write_key<W: Write>(
        &self,
        enc: &mut Encoder<W>,
        key: &str,
    ) -> Result<(), EncodeError<W::Error>> {
        match self.token {
            KeyToken::Bytes => enc.bytes(key.as_bytes())?,
            KeyToken::Text => enc.str(key)?,
        };
        Ok(())
    }

    /// Write engine-owned string payloads (error messages) with the
    /// profile's token type.
    pub(crate) fn write_text<W: Write>(
        &self,
        enc: &mut Encoder<W>,
        text: &str,
    ) -> Result<(), EncodeError<W::Error>> {
        match self.token {
            KeyToken::Bytes => enc.bytes(text.as_bytes())?,
            KeyToken::Text => enc.str(text)?,
        };
        Ok(())
    }
}
