//! Byte budget for compressed output.

use std::fmt;
use std::num::NonZeroUsize;

use crate::error::CompressError;

/// Default budget: browser `storage.sync` caps each entry at 8 KiB.
pub const DEFAULT_BUDGET: usize = 8 * 1024;

/// A positive byte ceiling the compressed output must not exceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Budget(NonZeroUsize);

impl Budget {
    /// Create a budget, returning `None` for zero.
    pub fn new(bytes: usize) -> Option<Self> {
        NonZeroUsize::new(bytes).map(Budget)
    }

    /// Validate a caller-supplied signed byte count.
    ///
    /// # Errors
    ///
    /// Returns `CompressError::InvalidBudget` for zero or negative values.
    pub fn from_signed(bytes: i64) -> Result<Self, CompressError> {
        usize::try_from(bytes)
            .ok()
            .and_then(Budget::new)
            .ok_or(CompressError::InvalidBudget(bytes))
    }

    /// The ceiling in bytes.
    #[inline]
    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Whether `size` fits within this budget.
    #[inline]
    pub fn admits(self, size: usize) -> bool {
        size <= self.get()
    }

    /// How many times larger `size` is than the budget.
    pub fn overshoot(self, size: usize) -> f64 {
        size as f64 / self.get() as f64
    }
}

impl Default for Budget {
    fn default() -> Self {
        Budget(NonZeroUsize::new(DEFAULT_BUDGET).unwrap_or(NonZeroUsize::MIN))
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.get())
    }
}
