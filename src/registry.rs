//! Immutable method registry.
//!
//! The registry is a borrowed slice of [`Entry`] records, built by the
//! host before any call arrives (typically a `static` table) and never
//! mutated afterwards. An entry's index is its position in the slice;
//! both the name and the index are valid selectors on the wire.
//!
//! Lookups are linear scans over the fixed table — no allocation, no
//! hashing, table sizes on constrained targets are small.

use crate::MAX_METHOD_NAME_LEN;
use crate::handler::Handler;
use crate::kind::ArgKind;

// ── Entries ──────────────────────────────────────────────────

/// One registered method: name, argument schema, handler.
///
/// Arity is the length of `kinds`; it cannot drift out of sync with the
/// schema because there is no separate count field.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    name: &'static str,
    kinds: &'static [ArgKind],
    handler: Handler,
}

impl Entry {
    /// Build a registry entry.
    ///
    /// Panics at compile time (in const context) if `name` exceeds
    /// [`MAX_METHOD_NAME_LEN`] — such a name could never be selected.
    pub const fn new(name: &'static str, kinds: &'static [ArgKind], handler: Handler) -> Self {
        assert!(name.len() <= MAX_METHOD_NAME_LEN, "method name too long");
        Self {
            name,
            kinds,
            handler,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Exact number of arguments the method requires.
    pub fn arity(&self) -> usize {
        self.kinds.len()
    }

    pub fn kinds(&self) -> &'static [ArgKind] {
        self.kinds
    }

    pub fn handler(&self) -> Handler {
        self.handler
    }
}

// ── Registry ─────────────────────────────────────────────────

/// Read-only view over the host's method table.
#[derive(Clone, Copy)]
pub struct Registry<'t> {
    entries: &'t [Entry],
}

impl<'t> Registry<'t> {
    pub const fn new(entries: &'t [Entry]) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a selector name to `(index, entry)`.
    ///
    /// Comparison is exact and case-sensitive; the selector arrives as
    /// raw bytes because the compact profile carries names as CBOR byte
    /// strings.
    pub fn lookup_by_name(&self, name: &[u8]) -> Option<(usize, &'t Entry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.name.as_bytes() == name)
    }

    /// Resolve a numeric selector to its entry.
    pub fn lookup_by_index(&self, index: u64) -> Option<&'t Entry> {
        usize::try_from(index).ok().and_then(|i| self.entries.get(i))
    }
}
