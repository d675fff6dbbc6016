use rand::Rng;

use crate::error::CoveredBondsError;
use crate::CoveredBondsResult;

/// Weighted discrete distribution over a fixed set of outcomes.
///
/// Weights are normalized on construction and need not sum to one. A draw is a
/// single uniform variate located in the cumulative weight array by binary
/// search, so each outcome is chosen with probability `w_i / sum(w)`.
#[derive(Debug, Clone)]
pub struct DiscreteSampler<T> {
    outcomes: Vec<T>,
    /// Normalized cumulative weights; the last entry is exactly 1.0.
    cumulative: Vec<f64>,
}

impl<T> DiscreteSampler<T> {
    pub fn new(weighted: impl IntoIterator<Item = (T, f64)>) -> CoveredBondsResult<Self> {
        let mut outcomes = Vec::new();
        let mut cumulative = Vec::new();
        let mut total = 0.0_f64;

        for (outcome, weight) in weighted {
            if !weight.is_finite() || weight < 0.0 {
                return Err(CoveredBondsError::InvalidInput {
                    field: "weights".into(),
                    reason: format!("weight {weight} must be finite and non-negative"),
                });
            }
            total += weight;
            outcomes.push(outcome);
            cumulative.push(total);
        }

        if outcomes.is_empty() {
            return Err(CoveredBondsError::InvalidInput {
                field: "weights".into(),
                reason: "At least one outcome is required".into(),
            });
        }
        if total <= 0.0 {
            return Err(CoveredBondsError::InvalidInput {
                field: "weights".into(),
                reason: "Weights must sum to a positive value".into(),
            });
        }

        for c in &mut cumulative {
            *c /= total;
        }
        if let Some(last) = cumulative.last_mut() {
            *last = 1.0;
        }

        Ok(Self { outcomes, cumulative })
    }

    /// Draw one outcome.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        let u: f64 = rng.gen();
        &self.outcomes[self.index_of(u)]
    }

    /// Outcome index for a uniform variate `u` in `[0, 1)`.
    ///
    /// Zero-weight outcomes share their cumulative value with the previous
    /// entry and are never selected.
    fn index_of(&self, u: f64) -> usize {
        let idx = self.cumulative.partition_point(|&c| c <= u);
        idx.min(self.outcomes.len() - 1)
    }

    /// Normalized probability of each outcome, in construction order.
    pub fn probabilities(&self) -> Vec<f64> {
        let mut prev = 0.0;
        self.cumulative
            .iter()
            .map(|&c| {
                let p = c - prev;
                prev = c;
                p
            })
            .collect()
    }

    pub fn outcomes(&self) -> &[T] {
        &self.outcomes
    }
}
