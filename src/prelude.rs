//! Prelude module for convenient imports.
//!
//! Re-exports the types most callers need to run a split end to end.
//!
//! # Usage
//!
//! ```ignore
//! use spread_splitter::prelude::*;
//!
//! let splitter = SpreadSplitter::new(pair, SplitConfig::default())?;
//! let folds = splitter.get_splits(&DrawdownLabeler::new(0.001, 5))?;
//! ```

pub use crate::config::{ExperimentMetadata, SplitConfig};
pub use crate::data::{FeatureColumn, InstrumentSeries, PricePair};
pub use crate::error::{FitError, Result, SplitError};
pub use crate::export::{ExportManifest, FoldExporter};
pub use crate::labeling::{DrawdownLabeler, LabelPolicy};
pub use crate::ou::OuModel;
pub use crate::splitter::{CellStatus, FoldRecord, Segment, SpreadSplitter};
pub use crate::windowing::{FoldBounds, WindowMode};
