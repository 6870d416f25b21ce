//! Budget search: find an encoding whose size fits the byte budget.
//!
//! The decision logic lives in [`BudgetSearch`], a pure state machine with no
//! I/O. [`search_with`] drives it against any encoder closure, which keeps
//! the algorithm testable without real codecs; [`search`] plugs in the real
//! encoder.
//!
//! # Policy
//!
//! - Start at native dimensions and the format's top quality rung.
//! - The first attempt that fits is accepted; there is no refinement pass.
//! - JPEG lowers quality first (fine-grained, cheap visually), then halves.
//! - PNG halves first (its only quality lever is coarse), then posterizes.
//! - Overshoot ratios skip rungs and halvings that cannot possibly suffice.
//! - The final permitted attempt jumps to the cheapest point of the lattice.

mod plan;

use crate::budget::Budget;
use crate::config::CompressOptions;
use crate::decode::Bitmap;
use crate::encode::{self, EncodeError, EncodeParams};
use crate::error::CompressError;
use crate::format::ImageFormat;

pub use plan::{BudgetSearch, Fidelity, LeverOrder, Step};

/// The accepted encoding.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub params: EncodeParams,
    /// Encoder invocations spent, including the accepted one.
    pub attempts: u32,
}

/// Search for an encoding of `bitmap` in `format` that fits `budget`.
///
/// # Errors
///
/// Returns `CompressError::BudgetUnreachable` when no attempt within the
/// search bounds fits, or `CompressError::EncodeFailed` if the encoder
/// rejects its input.
pub fn search(
    bitmap: &Bitmap,
    format: ImageFormat,
    budget: Budget,
    options: &CompressOptions,
) -> Result<Encoded, CompressError> {
    let filter = options.resize_filter;
    search_with(bitmap, format, budget, options, |bitmap, params| {
        encode::encode(bitmap, params, filter)
    })
}

/// Run the search with a caller-supplied encoder.
pub fn search_with<F>(
    bitmap: &Bitmap,
    format: ImageFormat,
    budget: Budget,
    options: &CompressOptions,
    mut encode: F,
) -> Result<Encoded, CompressError>
where
    F: FnMut(&Bitmap, &EncodeParams) -> Result<Vec<u8>, EncodeError>,
{
    let mut plan = BudgetSearch::new(bitmap.width, bitmap.height, format, budget, options);
    let mut params = plan.current();

    loop {
        let bytes = encode(bitmap, &params)?;
        log::debug!(
            "Attempt {}: {}x{} {} q={:.3} -> {} bytes (budget {})",
            plan.attempts(),
            params.width,
            params.height,
            format,
            params.quality,
            bytes.len(),
            budget.get()
        );

        match plan.observe(bytes.len()) {
            Step::Accept => {
                return Ok(Encoded {
                    bytes,
                    params,
                    attempts: plan.attempts(),
                })
            }
            Step::Try(next) => params = next,
            Step::Exhausted => {
                let smallest = plan.smallest().unwrap_or(bytes.len());
                log::warn!(
                    "Budget of {} unreachable after {} attempts (smallest {} bytes)",
                    budget,
                    plan.attempts(),
                    smallest
                );
                return Err(CompressError::BudgetUnreachable {
                    budget: budget.get(),
                    smallest,
                });
            }
        }
    }
}
