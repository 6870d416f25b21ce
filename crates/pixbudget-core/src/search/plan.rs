//! Pure step function for the budget search.
//!
//! [`BudgetSearch`] never touches pixels. It proposes [`EncodeParams`], is
//! told the resulting byte size, and answers with the next [`Step`]. Every
//! proposal strictly lowers the [`Fidelity`], so no parameter tuple is ever
//! tried twice and the search always terminates.

use std::cmp::Ordering;

use crate::budget::Budget;
use crate::config::CompressOptions;
use crate::decode::{halved_dimensions, max_halvings};
use crate::encode::EncodeParams;
use crate::format::ImageFormat;

/// Position on the `(scale, quality)` lattice.
///
/// Ordered so that `a > b` means `a` is more faithful: fewer halvings win,
/// and at equal scale the higher quality rung wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fidelity {
    /// Number of times both edges have been halved.
    pub shift: u32,
    /// Index into the format's descending quality ladder.
    pub rung: usize,
}

impl Ord for Fidelity {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .shift
            .cmp(&self.shift)
            .then_with(|| other.rung.cmp(&self.rung))
    }
}

impl PartialOrd for Fidelity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Which lever is pulled first when an attempt overshoots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeverOrder {
    /// Walk the quality ladder to its floor, then halve. Used for JPEG.
    QualityFirst,
    /// Halve down to the minimum dimension, then walk the ladder. Used for PNG.
    ResolutionFirst,
}

impl LeverOrder {
    pub fn for_format(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => LeverOrder::QualityFirst,
            ImageFormat::Png => LeverOrder::ResolutionFirst,
        }
    }
}

/// What to do after observing an attempt's size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// The last attempt fits the budget.
    Accept,
    /// Encode with these parameters next.
    Try(EncodeParams),
    /// No remaining candidate; the budget cannot be met.
    Exhausted,
}

/// Search state for one invocation.
#[derive(Debug, Clone)]
pub struct BudgetSearch {
    width: u32,
    height: u32,
    format: ImageFormat,
    budget: Budget,
    ladder: Vec<f32>,
    order: LeverOrder,
    quality_reach: f64,
    max_shift: u32,
    max_attempts: u32,
    current: Fidelity,
    attempts: u32,
    smallest: Option<usize>,
}

impl BudgetSearch {
    /// Start a search at native dimensions and the top quality rung.
    ///
    /// `options` must have passed [`CompressOptions::validate`].
    pub fn new(
        width: u32,
        height: u32,
        format: ImageFormat,
        budget: Budget,
        options: &CompressOptions,
    ) -> Self {
        Self {
            width,
            height,
            format,
            budget,
            ladder: options.quality_steps(format).to_vec(),
            order: LeverOrder::for_format(format),
            quality_reach: f64::from(options.quality_reach),
            max_shift: max_halvings(width, height, options.min_dimension),
            max_attempts: options.max_attempts.max(1),
            current: Fidelity { shift: 0, rung: 0 },
            attempts: 1,
            smallest: None,
        }
    }

    /// Parameters for the attempt currently awaiting observation.
    pub fn current(&self) -> EncodeParams {
        let (width, height) = halved_dimensions(self.width, self.height, self.current.shift);
        EncodeParams {
            format: self.format,
            quality: self.quality_at(self.current.rung),
            width,
            height,
        }
    }

    pub fn fidelity(&self) -> Fidelity {
        self.current
    }

    /// Encoder invocations issued so far, including the pending one.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Smallest size observed so far.
    pub fn smallest(&self) -> Option<usize> {
        self.smallest
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    /// The least faithful point of the lattice.
    pub fn floor(&self) -> Fidelity {
        Fidelity {
            shift: self.max_shift,
            rung: self.floor_rung(),
        }
    }

    /// Record the size of the pending attempt and decide what comes next.
    pub fn observe(&mut self, size: usize) -> Step {
        self.smallest = Some(self.smallest.map_or(size, |s| s.min(size)));

        if self.budget.admits(size) {
            return Step::Accept;
        }
        if self.current == self.floor() || self.attempts >= self.max_attempts {
            return Step::Exhausted;
        }

        let next = if self.attempts + 1 == self.max_attempts {
            // Last chance: go straight to the cheapest encoding
            self.floor()
        } else {
            self.next_after(size)
        };
        debug_assert!(next < self.current, "fidelity must strictly decrease");

        self.current = next;
        self.attempts += 1;
        Step::Try(self.current())
    }

    fn next_after(&self, size: usize) -> Fidelity {
        let overshoot = self.budget.overshoot(size);
        let Fidelity { shift, rung } = self.current;
        let floor_rung = self.floor_rung();

        let lower_quality = rung < floor_rung
            && (self.order == LeverOrder::QualityFirst || shift == self.max_shift);

        if lower_quality {
            let rung = if overshoot >= self.quality_reach {
                floor_rung
            } else {
                rung + 1
            };
            Fidelity { shift, rung }
        } else {
            Fidelity {
                shift: (shift + halvings_for(overshoot)).min(self.max_shift),
                rung,
            }
        }
    }

    fn floor_rung(&self) -> usize {
        self.ladder.len().saturating_sub(1)
    }

    fn quality_at(&self, rung: usize) -> f32 {
        self.ladder.get(rung).copied().unwrap_or(1.0)
    }
}

/// Halvings expected to bring the size under budget.
///
/// Output size scales roughly with pixel count, and one halving quarters
/// the pixels, so `ceil(log4(overshoot))`, at least one.
fn halvings_for(overshoot: f64) -> u32 {
    let estimate = (overshoot.log2() / 2.0).ceil();
    if estimate.is_finite() && estimate > 1.0 {
        estimate as u32
    } else {
        1
    }
}
