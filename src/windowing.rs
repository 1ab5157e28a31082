//! Windowing planner: train/test fold boundaries over an aligned series.
//!
//! The planner is a pure function from `(total_length, m_size, e_size, mode)`
//! to an ordered sequence of [`FoldBounds`]. Two modes are supported:
//!
//! - **Sliding**: a fixed-width training window of `m_size` rows that shifts
//!   forward by the evaluation width `e_size` each fold.
//! - **Expanding**: the training window always starts at row 0 and grows by
//!   `e_size` per fold (`m_size` is ignored).
//!
//! In both modes the test window immediately follows the training window
//! (`train_end == test_start`) and is `e_size` rows wide. Folds are emitted
//! while the test window still fits inside the series.
//!
//! ```text
//! Sliding (m_size = 4, e_size = 2, total = 10):
//!
//!   fold 0   [TTTT][ee]
//!   fold 1     [TTTT][ee]
//!   fold 2       [TTTT][ee]
//!
//! Expanding (e_size = 2, total = 10):
//!
//!   fold 0   [TT][ee]
//!   fold 1   [TTTT][ee]
//!   fold 2   [TTTTTT][ee]
//! ```

use crate::error::{Result, SplitError};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Window-sizing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    /// Fixed-width training window shifting forward by `e_size` per fold.
    Sliding,
    /// Training window anchored at 0 and growing by `e_size` per fold.
    Expanding,
}

/// Half-open train/test index ranges for one fold.
///
/// Invariants: `train_start < train_end == test_start < test_end`, and
/// successive folds' ranges are monotonically increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldBounds {
    pub train_start: usize,
    pub train_end: usize,
    pub test_start: usize,
    pub test_end: usize,
}

impl FoldBounds {
    /// Training range, half-open.
    pub fn train_range(&self) -> Range<usize> {
        self.train_start..self.train_end
    }

    /// Test range, half-open.
    pub fn test_range(&self) -> Range<usize> {
        self.test_start..self.test_end
    }

    /// Number of training rows.
    pub fn train_len(&self) -> usize {
        self.train_end - self.train_start
    }

    /// Number of test rows.
    pub fn test_len(&self) -> usize {
        self.test_end - self.test_start
    }
}

/// Compute the ordered fold boundaries for a series of `total_length` rows.
///
/// # Errors
///
/// - [`SplitError::InvalidWindowConfig`] when `m_size`/`e_size` are zero or
///   exceed `total_length` (the offending parameter is named).
/// - [`SplitError::EmptyPlan`] when the parameters are individually valid but
///   no fold fits. An empty plan is an error rather than an empty vector
///   because downstream assembly assumes at least one fold.
pub fn plan(
    total_length: usize,
    m_size: usize,
    e_size: usize,
    mode: WindowMode,
) -> Result<Vec<FoldBounds>> {
    if e_size == 0 {
        return Err(SplitError::InvalidWindowConfig {
            param: "e_size",
            value: e_size,
            reason: "must be positive".to_string(),
        });
    }

    let folds = match mode {
        WindowMode::Sliding => {
            if m_size == 0 {
                return Err(SplitError::InvalidWindowConfig {
                    param: "m_size",
                    value: m_size,
                    reason: "must be positive".to_string(),
                });
            }
            if m_size + e_size > total_length {
                return Err(SplitError::InvalidWindowConfig {
                    param: "m_size",
                    value: m_size,
                    reason: format!(
                        "m_size + e_size = {} exceeds total_length = {}",
                        m_size + e_size,
                        total_length
                    ),
                });
            }
            plan_sliding(total_length, m_size, e_size)
        }
        WindowMode::Expanding => {
            if e_size > total_length {
                return Err(SplitError::InvalidWindowConfig {
                    param: "e_size",
                    value: e_size,
                    reason: format!("exceeds total_length = {total_length}"),
                });
            }
            plan_expanding(total_length, e_size)
        }
    };

    if folds.is_empty() {
        return Err(SplitError::EmptyPlan {
            total_length,
            m_size,
            e_size,
        });
    }
    log::debug!(
        "planned {} {:?} folds over {} rows (m_size = {}, e_size = {})",
        folds.len(),
        mode,
        total_length,
        m_size,
        e_size
    );
    Ok(folds)
}

/// Fold k: train = [k*e, k*e + m), test = [k*e + m, k*e + m + e).
fn plan_sliding(total_length: usize, m_size: usize, e_size: usize) -> Vec<FoldBounds> {
    let mut folds = Vec::new();
    let mut offset = 0;
    while offset + m_size + e_size <= total_length {
        folds.push(FoldBounds {
            train_start: offset,
            train_end: offset + m_size,
            test_start: offset + m_size,
            test_end: offset + m_size + e_size,
        });
        offset += e_size;
    }
    folds
}

/// Fold k: train = [0, e*(k+1)), test = [e*(k+1), e*(k+2)).
fn plan_expanding(total_length: usize, e_size: usize) -> Vec<FoldBounds> {
    let mut folds = Vec::new();
    let mut train_end = e_size;
    while train_end + e_size <= total_length {
        folds.push(FoldBounds {
            train_start: 0,
            train_end,
            test_start: train_end,
            test_end: train_end + e_size,
        });
        train_end += e_size;
    }
    folds
}
