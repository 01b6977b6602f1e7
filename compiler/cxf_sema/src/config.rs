//! Resolver tuning knobs.

/// Configuration for a [`crate::Resolver`].
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Upper bound on resolution attempts for a single name. When a name's
    /// attempt counter exceeds this, it resolves to a recursion-overflow
    /// problem binding instead of looping.
    pub max_resolution_depth: u32,
    /// When true, hitting the recursion bound is reported as a hard error
    /// instead of a problem binding. Intended for the resolver's own test
    /// suites, where an overflow means a bug rather than pathological input.
    pub strict_recursion: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            max_resolution_depth: 6,
            strict_recursion: false,
        }
    }
}
