//! Spread Splitter
//!
//! Sliding-window cross-validation and mean-reversion modeling for pairs
//! trading datasets.
//!
//! # Overview
//!
//! This library turns one aligned pair of instrument feature series into an
//! ordered collection of train/test folds, ready for a binary classifier.
//! Per fold and per feature column it:
//!
//! 1. Computes the A-minus-B spread over the fold's windows.
//! 2. Fits a discrete Ornstein-Uhlenbeck model to the training spread.
//! 3. Scores both windows as standardized deviations from the fitted mean.
//! 4. Optionally rescales each segment's scores into [0, 1].
//! 5. Labels timesteps by forward drawdown of the price spread.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Spread Splitter                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  data/       - Instrument series, aligned pair, spreads         │
//! │  windowing/  - Sliding and expanding fold planning              │
//! │  ou/         - Ornstein-Uhlenbeck fit and t-score transform     │
//! │  scaling/    - Per-segment min-max rescaling                    │
//! │  labeling/   - Forward-drawdown binary labels                   │
//! │  splitter/   - Fold assembly, optionally on the rayon pool      │
//! │  export/     - NumPy export plus JSON manifest                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use spread_splitter::prelude::*;
//!
//! let pair = PricePair::new(series_a, series_b)?;
//! let config = SplitConfig::default()
//!     .with_window(30, 10)
//!     .with_features(vec![FeatureColumn::Price, FeatureColumn::RsiPct]);
//! let splitter = SpreadSplitter::new(pair, config)?;
//! let folds = splitter.get_splits(&DrawdownLabeler::new(0.001, 5))?;
//!
//! FoldExporter::new("output")?.export(&folds, splitter.config())?;
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod labeling;
pub mod ou;
pub mod prelude;
pub mod scaling;
pub mod splitter;
pub mod windowing;

// Re-exports - Errors
pub use error::{FitError, Result, SplitError};

// Re-exports - Config
pub use config::{ExperimentMetadata, SplitConfig};

// Re-exports - Data
pub use data::{FeatureColumn, InstrumentSeries, PricePair};

// Re-exports - Windowing
pub use windowing::{FoldBounds, WindowMode};

// Re-exports - Modeling
pub use ou::OuModel;

// Re-exports - Labeling
pub use labeling::{DrawdownLabeler, LabelPolicy};

// Re-exports - Splitting
pub use splitter::{
    CellStatus, FeatureCell, FoldRecord, Segment, SegmentBundle, SpreadSplitter,
};

// Re-exports - Export
pub use export::{ExportManifest, FoldExporter, FoldManifest, SegmentManifest};
