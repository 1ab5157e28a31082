//! Input data model: engineered feature columns and the aligned instrument pair.
//!
//! The splitter consumes already-engineered indicator columns; it never
//! computes indicators itself. Each instrument carries its open/close prices
//! plus five percent-change feature columns, and a [`PricePair`] holds two
//! instruments validated to identical length and index alignment (timestep
//! *i* in series A corresponds to timestep *i* in series B).
//!
//! The *spread* of a feature is the elementwise A-minus-B difference of that
//! feature's column over a contiguous index range. Spreads are ephemeral:
//! recomputed per (feature, window) pair, never cached or mutated, which keeps
//! concurrent fold processing free of shared state.

use crate::error::{Result, SplitError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// An engineered feature column available for spread modeling.
///
/// The variants mirror the columns the upstream indicator stage produces:
/// percent changes of a simple moving average, exponential moving average,
/// money-flow index, relative-strength index, and the close price itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureColumn {
    /// Close-price percent change.
    Price,
    /// Simple moving average, percent change.
    SmaPct,
    /// Exponential moving average, percent change.
    EmaPct,
    /// Money-flow index, percent change.
    MfiPct,
    /// Relative-strength index, percent change.
    RsiPct,
}

impl FeatureColumn {
    /// All feature columns in canonical order.
    pub const ALL: [FeatureColumn; 5] = [
        FeatureColumn::Price,
        FeatureColumn::SmaPct,
        FeatureColumn::EmaPct,
        FeatureColumn::MfiPct,
        FeatureColumn::RsiPct,
    ];

    /// Stable string name, used in config files and export manifests.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureColumn::Price => "price",
            FeatureColumn::SmaPct => "sma_pct",
            FeatureColumn::EmaPct => "ema_pct",
            FeatureColumn::MfiPct => "mfi_pct",
            FeatureColumn::RsiPct => "rsi_pct",
        }
    }

    /// Parse a column name as written by [`as_str`](Self::as_str).
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One instrument's per-timestep records.
///
/// Every column must have the same length; [`PricePair::new`] enforces this.
/// The struct is plain data so upstream loaders can fill it column by column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentSeries {
    /// Instrument identifier, used in diagnostics and manifests.
    pub symbol: String,
    /// Open prices.
    pub open: Vec<f64>,
    /// Close prices.
    pub close: Vec<f64>,
    /// Close-price percent change.
    pub price: Vec<f64>,
    /// Simple moving average, percent change.
    pub sma_pct: Vec<f64>,
    /// Exponential moving average, percent change.
    pub ema_pct: Vec<f64>,
    /// Money-flow index, percent change.
    pub mfi_pct: Vec<f64>,
    /// Relative-strength index, percent change.
    pub rsi_pct: Vec<f64>,
}

impl InstrumentSeries {
    /// Number of timesteps, taken from the close column.
    pub fn len(&self) -> usize {
        self.close.len()
    }

    /// True when the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// The raw column for a feature.
    pub fn column(&self, feature: FeatureColumn) -> &[f64] {
        match feature {
            FeatureColumn::Price => &self.price,
            FeatureColumn::SmaPct => &self.sma_pct,
            FeatureColumn::EmaPct => &self.ema_pct,
            FeatureColumn::MfiPct => &self.mfi_pct,
            FeatureColumn::RsiPct => &self.rsi_pct,
        }
    }

    fn check_columns(&self) -> Result<()> {
        let expected = self.close.len();
        let columns: [(&'static str, &Vec<f64>); 7] = [
            ("open", &self.open),
            ("close", &self.close),
            ("price", &self.price),
            ("sma_pct", &self.sma_pct),
            ("ema_pct", &self.ema_pct),
            ("mfi_pct", &self.mfi_pct),
            ("rsi_pct", &self.rsi_pct),
        ];
        for (name, column) in columns {
            if column.len() != expected {
                return Err(SplitError::ColumnLengthMismatch {
                    symbol: self.symbol.clone(),
                    column: name,
                    got: column.len(),
                    expected,
                });
            }
        }
        Ok(())
    }
}

/// Two aligned instrument series, immutable for the duration of a run.
///
/// Invariant: both series have identical length and index alignment. The pair
/// is constructed once from upstream data and only read afterwards, so fold
/// workers can share it by reference.
#[derive(Debug, Clone)]
pub struct PricePair {
    a: InstrumentSeries,
    b: InstrumentSeries,
}

impl PricePair {
    /// Build a pair, validating column lengths and cross-instrument alignment.
    pub fn new(a: InstrumentSeries, b: InstrumentSeries) -> Result<Self> {
        a.check_columns()?;
        b.check_columns()?;
        if a.len() != b.len() {
            return Err(SplitError::LengthMismatch {
                left: a.len(),
                right: b.len(),
            });
        }
        Ok(Self { a, b })
    }

    /// Number of aligned timesteps.
    pub fn len(&self) -> usize {
        self.a.len()
    }

    /// True when the pair has no rows.
    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// First instrument.
    pub fn instrument_a(&self) -> &InstrumentSeries {
        &self.a
    }

    /// Second instrument.
    pub fn instrument_b(&self) -> &InstrumentSeries {
        &self.b
    }

    /// Elementwise A-minus-B spread of a feature over a half-open index range.
    ///
    /// The range must lie within the pair; the windowing planner guarantees
    /// this for all fold boundaries it emits.
    pub fn spread(&self, feature: FeatureColumn, range: Range<usize>) -> Vec<f64> {
        let a = &self.a.column(feature)[range.clone()];
        let b = &self.b.column(feature)[range];
        a.iter().zip(b.iter()).map(|(x, y)| x - y).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn flat_series(symbol: &str, n: usize, level: f64) -> InstrumentSeries {
        InstrumentSeries {
            symbol: symbol.to_string(),
            open: vec![level; n],
            close: vec![level; n],
            price: vec![level; n],
            sma_pct: vec![level; n],
            ema_pct: vec![level; n],
            mfi_pct: vec![level; n],
            rsi_pct: vec![level; n],
        }
    }

    #[test]
    fn test_feature_column_roundtrip() {
        for column in FeatureColumn::ALL {
            assert_eq!(FeatureColumn::parse(column.as_str()), Some(column));
        }
        assert_eq!(FeatureColumn::parse("volume"), None);
    }

    #[test]
    fn test_feature_column_serde_names() {
        let json = serde_json::to_string(&FeatureColumn::SmaPct).unwrap();
        assert_eq!(json, "\"sma_pct\"");
        let back: FeatureColumn = serde_json::from_str("\"price\"").unwrap();
        assert_eq!(back, FeatureColumn::Price);
    }

    #[test]
    fn test_pair_rejects_misaligned_series() {
        let a = flat_series("AAA", 10, 1.0);
        let b = flat_series("BBB", 9, 1.0);
        let err = PricePair::new(a, b).unwrap_err();
        assert!(matches!(
            err,
            SplitError::LengthMismatch { left: 10, right: 9 }
        ));
    }

    #[test]
    fn test_pair_rejects_ragged_columns() {
        let mut a = flat_series("AAA", 10, 1.0);
        a.rsi_pct.pop();
        let b = flat_series("BBB", 10, 1.0);
        let err = PricePair::new(a, b).unwrap_err();
        assert!(matches!(err, SplitError::ColumnLengthMismatch { .. }));
    }

    #[test]
    fn test_spread_is_elementwise_difference() {
        let a = flat_series("AAA", 5, 3.0);
        let b = flat_series("BBB", 5, 1.0);
        let pair = PricePair::new(a, b).unwrap();
        let spread = pair.spread(FeatureColumn::Price, 1..4);
        assert_eq!(spread, vec![2.0, 2.0, 2.0]);
    }
}
