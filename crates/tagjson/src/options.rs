//! Codec configuration.

/// Knobs for `JsonCodec`.
///
/// The defaults reproduce the plain wire contract: no nesting bound beyond
/// the JSON parser's own, and sets taken as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecOptions {
    /// Maximum container nesting. Deeper values fail with `SizeLimit`.
    pub max_depth: Option<usize>,
    /// Reject duplicate set elements on both encode and decode.
    pub strict_sets: bool,
}

impl CodecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn strict_sets(mut self, strict: bool) -> Self {
        self.strict_sets = strict;
        self
    }

    pub(crate) fn exceeds(&self, depth: usize) -> bool {
        matches!(self.max_depth, Some(max) if depth > max)
    }
}
