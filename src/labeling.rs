//! Binary label generation for spread residual series.
//!
//! The fold assembler treats labeling as a pluggable policy: anything that
//! maps a residual series to an aligned 0/1 sequence. The policy is a
//! strategy object with its parameters as fields, not a captured closure, so
//! configurations serialize and runs reproduce.
//!
//! The reference policy, [`DrawdownLabeler`], marks timestep `t` with 1 when
//! the residual is about to drop by more than `threshold` within the next
//! `lookahead` steps:
//!
//! ```text
//! forward_min[t] = min(residual[t .. t+lookahead])   (full window)
//! label[t]       = 1  iff  residual[t] − forward_min[t] > threshold
//! ```
//!
//! The final `lookahead` entries lack enough forward data; they fall back to
//! using the residual at the same index as its own forward minimum, which
//! yields a zero comparison and hence label 0 for any positive threshold.
//!
//! The forward minimum is computed with a monotonic-queue sliding minimum in
//! O(n), instead of reversing the series and applying a rolling window.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A pluggable labeling policy.
///
/// Implementations must return exactly one 0/1 label per input residual.
/// `Send + Sync` so the fold assembler can share a policy across the rayon
/// pool when folds are processed in parallel.
pub trait LabelPolicy: Send + Sync {
    /// Map a residual series to an aligned sequence of 0/1 labels.
    fn label(&self, residuals: &[f64]) -> Vec<u8>;
}

/// Forward-looking drawdown labeler.
///
/// # Example
///
/// ```
/// use spread_splitter::labeling::{DrawdownLabeler, LabelPolicy};
///
/// let labeler = DrawdownLabeler::new(0.5, 2);
/// // residual[0] = 3.0, forward min over [3.0, 1.0] = 1.0, drop 2.0 > 0.5
/// let labels = labeler.label(&[3.0, 1.0, 2.0, 2.0]);
/// assert_eq!(labels, vec![1, 0, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownLabeler {
    /// Minimum forward drop that earns label 1.
    pub threshold: f64,
    /// Width of the forward-looking window, in timesteps.
    pub lookahead: usize,
}

impl DrawdownLabeler {
    pub fn new(threshold: f64, lookahead: usize) -> Self {
        Self {
            threshold,
            lookahead,
        }
    }
}

impl LabelPolicy for DrawdownLabeler {
    fn label(&self, residuals: &[f64]) -> Vec<u8> {
        let forward_min = sliding_forward_min(residuals, self.lookahead);
        residuals
            .iter()
            .zip(forward_min.iter())
            .map(|(&r, &m)| u8::from(r - m > self.threshold))
            .collect()
    }
}

/// `out[t] = min(values[t .. t+window])` where a full forward window exists,
/// `values[t]` otherwise (the last `window` positions).
///
/// Monotonic queue: indices whose values are strictly increasing front to
/// back; the front is always the window minimum. Each index enters and
/// leaves the queue once, so the whole pass is O(n).
fn sliding_forward_min(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    if window == 0 {
        return values.to_vec();
    }
    let mut out = vec![0.0; n];
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut next = 0; // next index to feed into the queue

    for t in 0..n {
        let end = (t + window).min(n);
        while next < end {
            while queue
                .back()
                .is_some_and(|&back| values[back] >= values[next])
            {
                queue.pop_back();
            }
            queue.push_back(next);
            next += 1;
        }
        while queue.front().is_some_and(|&front| front < t) {
            queue.pop_front();
        }
        out[t] = if t + window < n {
            values[queue[0]]
        } else {
            // Tail entries lack a full forward window.
            values[t]
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_min_matches_naive_scan() {
        let values = [5.0, 3.0, 4.0, 1.0, 2.0, 6.0, 0.5, 3.5, 2.5, 4.5];
        for window in 1..=5 {
            let fast = sliding_forward_min(&values, window);
            for t in 0..values.len() {
                let expected = if t + window < values.len() {
                    values[t..t + window]
                        .iter()
                        .cloned()
                        .fold(f64::INFINITY, f64::min)
                } else {
                    values[t]
                };
                assert_eq!(fast[t], expected, "t = {t}, window = {window}");
            }
        }
    }

    #[test]
    fn test_label_boundary_behavior() {
        // Length 10, lookahead 5, threshold 0.001: the last 5 entries must be
        // labeled 0 for any positive threshold, and earlier entries labeled 1
        // exactly when residual[t] − min(residual[t..t+5]) > 0.001.
        let residuals = [1.0, 0.5, 0.8, 0.2, 0.9, 0.1, 0.05, 0.3, 0.0, 0.4];
        let labeler = DrawdownLabeler::new(0.001, 5);
        let labels = labeler.label(&residuals);
        assert_eq!(labels.len(), 10);
        assert_eq!(&labels[5..], &[0, 0, 0, 0, 0]);
        for t in 0..5 {
            let fwd_min = residuals[t..t + 5]
                .iter()
                .cloned()
                .fold(f64::INFINITY, f64::min);
            let expected = u8::from(residuals[t] - fwd_min > 0.001);
            assert_eq!(labels[t], expected, "t = {t}");
        }
    }

    #[test]
    fn test_non_positive_threshold_labels_tail_one() {
        // Zero comparison in the tail beats a negative threshold.
        let labeler = DrawdownLabeler::new(-0.1, 3);
        let labels = labeler.label(&[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(labels, vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_flat_series_labels_zero() {
        let labeler = DrawdownLabeler::new(0.001, 5);
        let labels = labeler.label(&[2.0; 20]);
        assert_eq!(labels, vec![0; 20]);
    }

    #[test]
    fn test_empty_residuals() {
        let labeler = DrawdownLabeler::new(0.001, 5);
        assert!(labeler.label(&[]).is_empty());
    }

    #[test]
    fn test_single_drop_detected() {
        // One sharp drop at index 5: entries within 4 steps before it (with a
        // full forward window) see the drop.
        let mut residuals = vec![1.0; 12];
        residuals[5] = 0.0;
        let labeler = DrawdownLabeler::new(0.5, 4);
        let labels = labeler.label(&residuals);
        // Full windows exist for t where t + 4 < 12, i.e. t <= 7.
        // Windows [t, t+4) covering index 5: t in 2..=5.
        assert_eq!(labels, vec![0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0]);
    }
}
