use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::group::CyclicGroup;

/// Iteration cap used when none is configured.
pub const DEFAULT_MAX_ITERATIONS: u64 = 1_000_000;

/// How far the discrete-log search may go.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Largest exponent that is a legitimate answer, e.g. the number of voters.
    pub bound: u64,
    /// Hard cap on group operations, guarding against a misconfigured `bound`.
    pub max_iterations: u64,
}

impl SearchLimits {
    pub fn new(bound: u64) -> Self {
        Self {
            bound,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(self, max_iterations: u64) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }
}

/// Find the smallest `i <= bound` with `base^i == target` by walking
/// `1, base, base^2, ...`.
///
/// Votes are 0/1 and the total is at most the ballot count, so the search
/// space is small. Running past the bound or the iteration cap is a
/// `TallyOverflow`: the caller must never see a truncated count.
pub fn solve<G: CyclicGroup>(
    group: &G,
    base: &G::Element,
    target: &G::Element,
    limits: &SearchLimits,
) -> Result<u64> {
    let mut current = group.identity();
    for i in 0..=limits.bound {
        if i >= limits.max_iterations {
            break;
        }
        if &current == target {
            debug!("Discrete log found at {i}");
            return Ok(i);
        }
        current = group.operate(&current, base);
    }
    Err(Error::TallyOverflow {
        bound: limits.bound,
    })
}
