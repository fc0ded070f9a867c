/// Default maximum nesting depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Decode-time resource limits carried by every [`Cursor`](crate::Cursor).
///
/// Traversal recurses once per nested container or tag, so `max_depth` bounds
/// the call stack used by `next` on adversarial input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum nesting depth a single traversal call will descend.
    pub max_depth: usize,
}

impl DecodeLimits {
    /// Construct limits with an explicit nesting depth.
    #[must_use]
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}
