//! Error taxonomy for planning, fitting, and export.
//!
//! Errors come in two layers with very different blast radii:
//!
//! - [`SplitError`] is fatal to a run: an invalid window configuration, a plan
//!   that produces no folds, mismatched input series, or an I/O failure while
//!   reading configuration or writing exports. These abort immediately and
//!   name the offending parameter.
//! - [`FitError`] is scoped to a single (fold, feature) cell: the training
//!   spread was too short, showed no mean reversion, or produced a degenerate
//!   model. These are recorded in the fold record's cell status and the run
//!   continues with the remaining features.
//!
//! No error is silently swallowed: every cell failure is both logged at
//! `warn!` level and queryable on the emitted [`FoldRecord`].
//!
//! [`FoldRecord`]: crate::splitter::FoldRecord

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate-wide result alias for fatal errors.
pub type Result<T, E = SplitError> = std::result::Result<T, E>;

/// Fatal errors: planning, input validation, configuration, and export I/O.
#[derive(Debug, Error)]
pub enum SplitError {
    /// A window-sizing parameter is non-positive or exceeds the series length.
    #[error("invalid window config: {param} = {value} ({reason})")]
    InvalidWindowConfig {
        /// Name of the offending parameter (`m_size` or `e_size`).
        param: &'static str,
        /// The rejected value.
        value: usize,
        /// Why the value was rejected.
        reason: String,
    },

    /// The window parameters are individually valid but no fold fits.
    ///
    /// Reported as an error rather than an empty plan because downstream
    /// consumers assume at least one fold.
    #[error(
        "no fold fits: total_length = {total_length}, m_size = {m_size}, e_size = {e_size}"
    )]
    EmptyPlan {
        total_length: usize,
        m_size: usize,
        e_size: usize,
    },

    /// The two instrument series are not index-aligned.
    #[error("instrument series length mismatch: {left} rows vs {right} rows")]
    LengthMismatch { left: usize, right: usize },

    /// A column inside one instrument series has the wrong length.
    #[error("column '{column}' of '{symbol}' has {got} rows, expected {expected}")]
    ColumnLengthMismatch {
        symbol: String,
        column: &'static str,
        got: usize,
        expected: usize,
    },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("npy write error: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),
}

/// Per-(fold, feature) fitting and transform errors.
///
/// These never abort a run. The fold assembler converts them into a
/// `CellStatus::Failed` marker so callers can inspect exactly which cells
/// failed and why.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum FitError {
    /// The training window holds fewer observations than the OU fit needs.
    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The estimated AR(1) coefficient falls outside (0, 1): the training
    /// spread shows no detectable mean reversion.
    #[error("no mean reversion detected: AR(1) coefficient {ar_coeff} outside (0, 1)")]
    NonMeanReverting { ar_coeff: f64 },

    /// The fitted noise standard deviation is zero or non-finite, so scores
    /// cannot be computed.
    #[error("degenerate model: noise_std = {noise_std}")]
    DegenerateModel { noise_std: f64 },
}
