//! Builtin introspection methods.
//!
//! Three small methods that every deployment tends to want and that
//! exercise the full registry/dispatch contract: an API version query,
//! a liveness check, and a name→index lookup for callers that prefer
//! compact numeric selectors after a first discovery round-trip.
//!
//! Hosts are free to splice [`ENTRIES`] into their own tables or to
//! register the handlers under different names.

use minicbor::Decoder;

use crate::handler::{HandlerError, ResultSink};
use crate::kind::ArgKind;
use crate::registry::{Entry, Registry};

/// API level reported by the `version` method.
pub const API_VERSION: u64 = 0;

/// Index reported by `lookup` for names with no registry entry.
pub const LOOKUP_NOT_FOUND: i64 = -1;

/// Ready-made table slice with all three builtin methods.
pub static ENTRIES: [Entry; 3] = [
    Entry::new("version", &[], version),
    Entry::new("ping", &[], ping),
    Entry::new("lookup", &[ArgKind::ByteString], lookup),
];

/// `version` — no arguments; result is the list of API levels this
/// engine speaks (currently just [`API_VERSION`]).
pub fn version(
    _registry: &Registry<'_>,
    _args: &mut Decoder<'_>,
    result: &mut ResultSink<'_, '_>,
) -> Result<(), HandlerError> {
    result.array(1)?.u64(API_VERSION)?;
    Ok(())
}

/// `ping` — no arguments; result is the byte string `"pong"`.
pub fn ping(
    _registry: &Registry<'_>,
    _args: &mut Decoder<'_>,
    result: &mut ResultSink<'_, '_>,
) -> Result<(), HandlerError> {
    result.bytes(b"pong")?;
    Ok(())
}

/// `lookup` — one byte-string argument naming a method; result is its
/// registry index, or [`LOOKUP_NOT_FOUND`] when the name resolves to
/// nothing. Unknown names are answered, not failed: the caller asked a
/// question and gets a sentinel, not an error envelope.
pub fn lookup(
    registry: &Registry<'_>,
    args: &mut Decoder<'_>,
    result: &mut ResultSink<'_, '_>,
) -> Result<(), HandlerError> {
    let name = args.bytes()?;
    match registry.lookup_by_name(name) {
        Some((index, _)) => result.i64(index as i64)?,
        None => result.i64(LOOKUP_NOT_FOUND)?,
    };
    Ok(())
}
