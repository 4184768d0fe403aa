//! Argument validator.
//!
//! Gates handler execution: the declared argument count must equal the
//! entry's arity exactly, and every positional value's wire kind must
//! match the schema. Checks run left to right and stop at the first
//! violation; on arity mismatch no element is inspected at all.
//!
//! The validator works on a duplicate of the argument cursor, so the
//! original cursor reaches the handler untouched at element 0.

use minicbor::Decoder;

use crate::error::RpcError;
use crate::registry::Entry;

/// Check `arg_count` and per-position kinds against `entry`'s schema.
pub fn validate_args(entry: &Entry, args: &Decoder<'_>, arg_count: u64) -> Result<(), RpcError> {
    if arg_count != entry.arity() as u64 {
        return Err(RpcError::InvalidArgs);
    }

    let mut probe = args.clone();
    for kind in entry.kinds() {
        let ty = probe.datatype().map_err(|_| RpcError::ParserFailed)?;
        if !kind.matches(ty) {
            return Err(RpcError::InvalidArgs);
        }
        probe.skip().map_err(|_| RpcError::ParserFailed)?;
    }
    Ok(())
}
