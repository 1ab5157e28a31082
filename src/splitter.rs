//! Fold assembly: fit-on-train, score-on-both, scale, label, package.
//!
//! [`SpreadSplitter`] drives the whole pipeline for one [`PricePair`]:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      SpreadSplitter                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │ windowing::plan ─► fold boundaries                           │
//! │ for each fold, for each feature:                             │
//! │   PricePair::spread ─► train / test spread                   │
//! │   OuModel::fit (train) ─► OuModel::score (train + test)      │
//! │ optional per-segment min-max rescaling                       │
//! │ LabelPolicy on the price spread ─► labels                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A fitting failure in one (fold, feature) cell marks that cell as failed
//! and the fold's other features proceed; the run never aborts on a cell
//! failure. Every failure is logged and stays queryable on the fold record.
//!
//! Folds are independent: each reads only the shared immutable pair and its
//! own boundaries. With `parallel` enabled the folds are mapped over the
//! rayon pool and merged back in fold order; there is no shared mutable
//! accumulator.

use crate::config::SplitConfig;
use crate::data::{FeatureColumn, PricePair};
use crate::error::{FitError, Result};
use crate::labeling::LabelPolicy;
use crate::ou::OuModel;
use crate::scaling;
use crate::windowing::{self, FoldBounds, WindowMode};
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Train or test half of a fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Train,
    Test,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Train => "train",
            Segment::Test => "test",
        }
    }
}

/// Outcome of fitting one (fold, feature) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CellStatus {
    /// The model fit and both segments were scored.
    Fitted { model: OuModel },
    /// Fitting or scoring failed; the score column is absent for this fold.
    Failed { error: FitError },
}

impl CellStatus {
    pub fn is_fitted(&self) -> bool {
        matches!(self, CellStatus::Fitted { .. })
    }
}

/// Per-feature fit status within one fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCell {
    pub feature: FeatureColumn,
    pub status: CellStatus,
}

/// One segment's data bundle: score table, raw residuals, labels.
///
/// `features` fixes the column order; `scores` and `residuals` are parallel
/// to it. A `None` score column marks a cell whose fit failed; the column
/// is absent rather than silently dropped, so downstream consumers can keep
/// their matrix shapes consistent across folds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentBundle {
    /// Requested features, in request order.
    pub features: Vec<FeatureColumn>,
    /// Per-feature score series; `None` when the cell failed.
    pub scores: Vec<Option<Vec<f64>>>,
    /// Per-feature raw spread over this segment, kept for diagnostics.
    pub residuals: Vec<Vec<f64>>,
    /// Binary labels aligned to this segment. Always present for the test
    /// segment; present for train only when `label_train` is configured.
    pub labels: Option<Vec<u8>>,
    /// Number of rows in this segment.
    pub rows: usize,
}

impl SegmentBundle {
    /// Score series for one feature, if it was requested and fit.
    pub fn score(&self, feature: FeatureColumn) -> Option<&[f64]> {
        let idx = self.features.iter().position(|&f| f == feature)?;
        self.scores[idx].as_deref()
    }

    /// Raw residual (spread) series for one feature, if requested.
    pub fn residual(&self, feature: FeatureColumn) -> Option<&[f64]> {
        let idx = self.features.iter().position(|&f| f == feature)?;
        Some(&self.residuals[idx])
    }

    /// Features whose score columns are present.
    pub fn fitted_features(&self) -> Vec<FeatureColumn> {
        self.features
            .iter()
            .zip(self.scores.iter())
            .filter_map(|(&f, s)| s.is_some().then_some(f))
            .collect()
    }
}

/// The unit of output: one fold's boundaries, cell statuses, and segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldRecord {
    /// Zero-based fold index within the plan.
    pub index: usize,
    /// Train/test boundaries of this fold.
    pub bounds: FoldBounds,
    /// Per-feature fit status, in request order.
    pub cells: Vec<FeatureCell>,
    pub train: SegmentBundle,
    pub test: SegmentBundle,
}

impl FoldRecord {
    /// Fit status for one feature, if it was requested.
    pub fn cell(&self, feature: FeatureColumn) -> Option<&CellStatus> {
        self.cells
            .iter()
            .find(|c| c.feature == feature)
            .map(|c| &c.status)
    }

    /// The (feature, error) pairs that failed in this fold.
    pub fn failed_cells(&self) -> Vec<(FeatureColumn, &FitError)> {
        self.cells
            .iter()
            .filter_map(|c| match &c.status {
                CellStatus::Failed { error } => Some((c.feature, error)),
                CellStatus::Fitted { .. } => None,
            })
            .collect()
    }

    /// Segment accessor by tag.
    pub fn segment(&self, segment: Segment) -> &SegmentBundle {
        match segment {
            Segment::Train => &self.train,
            Segment::Test => &self.test,
        }
    }
}

/// Sliding-window cross-validation engine over one price pair.
#[derive(Debug)]
pub struct SpreadSplitter {
    pair: PricePair,
    config: SplitConfig,
}

impl SpreadSplitter {
    /// Build a splitter, validating the configuration up front.
    pub fn new(pair: PricePair, config: SplitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { pair, config })
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn pair(&self) -> &PricePair {
        &self.pair
    }

    /// Produce the full ordered collection of per-fold datasets.
    ///
    /// Planning errors abort immediately; per-cell fitting errors are
    /// recorded in the fold records and the run continues.
    pub fn get_splits(&self, label_policy: &dyn LabelPolicy) -> Result<Vec<FoldRecord>> {
        let mode = if self.config.expanding {
            WindowMode::Expanding
        } else {
            WindowMode::Sliding
        };
        let plan = windowing::plan(
            self.pair.len(),
            self.config.m_size,
            self.config.e_size,
            mode,
        )?;

        let records = if self.config.parallel {
            // Folds are embarrassingly parallel: each worker reads the shared
            // immutable pair and its own boundaries. Collecting preserves
            // fold order.
            plan.par_iter()
                .enumerate()
                .map(|(index, bounds)| self.build_fold(index, *bounds, label_policy))
                .collect()
        } else {
            plan.iter()
                .enumerate()
                .map(|(index, bounds)| self.build_fold(index, *bounds, label_policy))
                .collect()
        };
        debug!("assembled {} folds", plan.len());
        records
    }

    fn build_fold(
        &self,
        index: usize,
        bounds: FoldBounds,
        label_policy: &dyn LabelPolicy,
    ) -> Result<FoldRecord> {
        let features = &self.config.features;
        let mut cells = Vec::with_capacity(features.len());
        let mut train_scores = Vec::with_capacity(features.len());
        let mut test_scores = Vec::with_capacity(features.len());
        let mut train_residuals = Vec::with_capacity(features.len());
        let mut test_residuals = Vec::with_capacity(features.len());

        for &feature in features {
            let train_spread = self.pair.spread(feature, bounds.train_range());
            let test_spread = self.pair.spread(feature, bounds.test_range());

            let fitted = OuModel::fit(&train_spread).and_then(|model| {
                let train = model.score(&train_spread)?;
                let test = model.score(&test_spread)?;
                Ok((model, train, test))
            });
            match fitted {
                Ok((model, train, test)) => {
                    train_scores.push(Some(train));
                    test_scores.push(Some(test));
                    cells.push(FeatureCell {
                        feature,
                        status: CellStatus::Fitted { model },
                    });
                }
                Err(error) => {
                    warn!("fold {index}: feature '{feature}' failed to fit: {error}");
                    train_scores.push(None);
                    test_scores.push(None);
                    cells.push(FeatureCell {
                        feature,
                        status: CellStatus::Failed { error },
                    });
                }
            }
            train_residuals.push(train_spread);
            test_residuals.push(test_spread);
        }

        if self.config.scale {
            // Train and test are rescaled independently: no leakage of test
            // statistics into training scaling, and vice versa.
            for column in train_scores.iter_mut().flatten() {
                scaling::min_max_scale(column);
            }
            for column in test_scores.iter_mut().flatten() {
                scaling::min_max_scale(column);
            }
        }

        // Labels always come from the price feature's raw spread, pre-scaling,
        // whether or not price is among the requested score features.
        let test_labels = label_policy.label(&self.price_residual(
            features,
            &test_residuals,
            bounds.test_range(),
        ));
        let train_labels = self.config.label_train.then(|| {
            label_policy.label(&self.price_residual(
                features,
                &train_residuals,
                bounds.train_range(),
            ))
        });

        let train = SegmentBundle {
            features: features.clone(),
            scores: train_scores,
            residuals: train_residuals,
            labels: train_labels,
            rows: bounds.train_len(),
        };
        let test = SegmentBundle {
            features: features.clone(),
            scores: test_scores,
            residuals: test_residuals,
            labels: Some(test_labels),
            rows: bounds.test_len(),
        };

        Ok(FoldRecord {
            index,
            bounds,
            cells,
            train,
            test,
        })
    }

    /// Price spread for a segment, reusing the residual already built when
    /// price is among the requested features.
    fn price_residual(
        &self,
        features: &[FeatureColumn],
        residuals: &[Vec<f64>],
        range: std::ops::Range<usize>,
    ) -> Vec<f64> {
        match features.iter().position(|&f| f == FeatureColumn::Price) {
            Some(idx) => residuals[idx].clone(),
            None => self.pair.spread(FeatureColumn::Price, range),
        }
    }
}
