//! Configuration options for bplist decoding.
//!
//! The encoder has no options: its integer, real, reference and offset
//! widths are a fixed policy documented in [`crate::format`]. The decoder
//! exposes two knobs for dealing with hostile or sloppy input.
//!
//! ## Examples
//!
//! ```rust
//! use serde_bplist::{DecodeOptions, DuplicateKeys};
//!
//! let options = DecodeOptions::new()
//!     .with_max_depth(64)
//!     .with_duplicate_keys(DuplicateKeys::LastWins);
//! assert_eq!(options.max_depth, 64);
//! ```

/// What to do when a dictionary contains the same key twice.
///
/// # Examples
///
/// ```rust
/// use serde_bplist::DuplicateKeys;
///
/// assert_eq!(DuplicateKeys::default(), DuplicateKeys::Reject);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Fail with a format error naming the key.
    #[default]
    Reject,
    /// Keep decoding; the value bound last replaces earlier ones.
    LastWins,
}

/// Configuration options for decoding.
///
/// # Examples
///
/// ```rust
/// use serde_bplist::DecodeOptions;
///
/// let options = DecodeOptions::default();
/// assert_eq!(options.max_depth, 128);
/// ```
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Maximum nesting of reference resolutions before decoding fails.
    ///
    /// The format is acyclic by convention only; this bounds the recursion a
    /// crafted reference cycle can cause.
    pub max_depth: usize,
    pub duplicate_keys: DuplicateKeys,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: 128,
            duplicate_keys: DuplicateKeys::default(),
        }
    }
}

impl DecodeOptions {
    /// Creates default options (depth limit 128, duplicate keys rejected).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum reference resolution depth.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bplist::DecodeOptions;
    ///
    /// let options = DecodeOptions::new().with_max_depth(16);
    /// assert_eq!(options.max_depth, 16);
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the duplicate key policy.
    #[must_use]
    pub fn with_duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }
}
