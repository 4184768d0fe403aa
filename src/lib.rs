//! Compact CBOR-RPC engine for resource-constrained devices.
//!
//! One call in, one response out — always. The engine decodes a single
//! self-contained CBOR request, resolves it against an immutable method
//! registry, validates the declared arguments, invokes the handler, and
//! encodes a response, all inside caller-supplied fixed-size buffers
//! with no heap allocation and no I/O of its own.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        Call pipeline                          │
//! │                                                               │
//! │  input bytes                                    output bytes  │
//! │      │                                                ▲       │
//! │      ▼                                                │       │
//! │  ┌────────┐  ┌──────────┐  ┌──────────┐  ┌─────────────────┐  │
//! │  │ decode │─▶│ registry │─▶│ validate │─▶│ dispatch+encode │  │
//! │  └────────┘  └──────────┘  └──────────┘  └─────────────────┘  │
//! │                                                │              │
//! │                              buffer overflow?  ▼              │
//! │                              ┌─────────────────────────────┐  │
//! │                              │ precomputed fallback error  │  │
//! │                              └─────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Malformed, hostile, or noise input never panics the engine: every
//! failure funnels into an error envelope, and when even that cannot be
//! encoded into the output buffer a fixed, precomputed minimal error
//! response is substituted (or zero bytes reported if the buffer cannot
//! hold the fallback either).
//!
//! Transport, framing, and authentication are the host's business; the
//! engine is a pure function of `(registry, profile, input, output)`.

#![no_std]
#![deny(unused_must_use)]

pub mod builtin;
pub mod decode;
pub mod engine;
pub mod error;
pub mod handler;
pub mod kind;
pub mod profile;
pub mod registry;
pub mod validate;

pub use engine::{CallOutcome, CallStatus, execute_call};
pub use error::RpcError;
pub use handler::{Handler, HandlerError, ResultSink};
pub use kind::ArgKind;
pub use profile::{COMPACT, DESCRIPTIVE, KeyProfile, KeyToken};
pub use registry::{Entry, Registry};

/// The single wire protocol version this engine understands.
///
/// Only checked by profiles that define a version key (the compact
/// profile carries no version field at all).
pub const PROTOCOL_VERSION: u64 = 1;

/// Upper bound on method selector names, registered or requested.
///
/// Selector names longer than this are rejected before any registry
/// lookup takes place.
pub const MAX_METHOD_NAME_LEN: usize = 32;

/// Capacity of handler-supplied error message text.
pub const ERROR_TEXT_MAX: usize = 96;
