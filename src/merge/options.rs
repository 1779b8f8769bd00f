//! Merge configuration.

use crate::object::Flags;

/// Depth that never stops recursion into nested maps.
pub const UNBOUNDED_DEPTH: u32 = u32::MAX;

/// MergeOptions controls how [`Object::merge_copy_with`] reconciles trees.
///
/// The default skips entries flagged [`Flags::STATIC_DATA`] and recurses
/// without a depth limit.
///
/// [`Object::merge_copy_with`]: crate::object::Object::merge_copy_with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    skip_mask: Flags,
    max_depth: u32,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            skip_mask: Flags::STATIC_DATA,
            max_depth: UNBOUNDED_DEPTH,
        }
    }
}

impl MergeOptions {
    /// Creates options with the default skip mask and no depth limit.
    pub fn new() -> Self {
        MergeOptions::default()
    }

    /// Sets the flags that protect an entry from being merged.
    pub fn skip_mask(mut self, mask: impl Into<Flags>) -> Self {
        self.skip_mask = mask.into();
        self
    }

    /// Merges every entry regardless of its flags.
    pub fn no_skip(mut self) -> Self {
        self.skip_mask = Flags::NONE;
        self
    }

    /// Limits how many levels of nested maps are merged instead of replaced.
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.max_depth = UNBOUNDED_DEPTH;
        self
    }

    pub fn get_skip_mask(&self) -> Flags {
        self.skip_mask
    }

    pub fn get_max_depth(&self) -> u32 {
        self.max_depth
    }
}
