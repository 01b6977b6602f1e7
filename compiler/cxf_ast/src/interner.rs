//! Interned identifier strings.
//!
//! Names appear many times during disambiguation (every trial resolution
//! looks the same identifier up again), so they are interned once and passed
//! around as 4-byte [`Symbol`] handles.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;

/// Interned string identifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

impl Symbol {
    /// Pre-interned empty string.
    pub const EMPTY: Symbol = Symbol(0);

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Create from raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Symbol(raw)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[derive(Default)]
struct InternerInner {
    map: FxHashMap<String, Symbol>,
    strings: Vec<String>,
}

/// String interner with interior mutability.
///
/// Interning takes `&self` so the interner can be shared freely between the
/// parser and the resolver without threading `&mut` through both.
pub struct StringInterner {
    inner: RwLock<InternerInner>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        let interner = StringInterner {
            inner: RwLock::new(InternerInner::default()),
        };
        let empty = interner.intern("");
        debug_assert_eq!(empty, Symbol::EMPTY);
        interner
    }

    /// Intern a string, returning its symbol.
    pub fn intern(&self, s: &str) -> Symbol {
        if let Some(&sym) = self.inner.read().map.get(s) {
            return sym;
        }
        let mut inner = self.inner.write();
        // Racing writers may have interned it in between.
        if let Some(&sym) = inner.map.get(s) {
            return sym;
        }
        let sym = Symbol(u32::try_from(inner.strings.len()).unwrap_or(u32::MAX));
        inner.strings.push(s.to_owned());
        inner.map.insert(s.to_owned(), sym);
        sym
    }

    /// Resolve a symbol back to its string.
    ///
    /// Returns an owned copy; symbols are resolved only for diagnostics and
    /// trace output.
    pub fn resolve(&self, sym: Symbol) -> String {
        self.inner
            .read()
            .strings
            .get(sym.0 as usize)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
