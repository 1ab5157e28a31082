//! Tests for `.npy` export and the JSON manifest.

use ndarray::{Array1, Array2};
use ndarray_npy::read_npy;
use spread_splitter::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

fn ar1_path(a: f64, b: f64, x0: f64, n: usize, noise_scale: f64) -> Vec<f64> {
    let mut series = Vec::with_capacity(n);
    series.push(x0);
    for i in 1..n {
        let eps = noise_scale * (((i * 7) % 13) as f64 - 6.0) / 6.0;
        let prev = series[i - 1];
        series.push(a + b * prev + eps);
    }
    series
}

fn series_with_price(symbol: &str, price: Vec<f64>) -> InstrumentSeries {
    let n = price.len();
    InstrumentSeries {
        symbol: symbol.to_string(),
        open: vec![100.0; n],
        close: vec![100.0; n],
        sma_pct: (0..n).map(|i| i as f64).collect(),
        ema_pct: price.clone(),
        mfi_pct: vec![0.0; n],
        rsi_pct: vec![0.0; n],
        price,
    }
}

fn run_split(config: SplitConfig) -> (Vec<FoldRecord>, SplitConfig) {
    let a = series_with_price("AAA", ar1_path(0.1, 0.85, 1.0, 99, 0.05));
    let b = series_with_price("BBB", vec![0.0; 99]);
    let pair = PricePair::new(a, b).unwrap();
    let splitter = SpreadSplitter::new(pair, config).unwrap();
    let folds = splitter.get_splits(&DrawdownLabeler::new(0.001, 5)).unwrap();
    let config = splitter.config().clone();
    (folds, config)
}

// ============================================================================
// Export Tests
// ============================================================================

#[test]
fn test_export_writes_arrays_and_manifest() {
    let dir = TempDir::new().unwrap();
    let (folds, config) = run_split(SplitConfig::default().with_window(30, 10));

    let exporter = FoldExporter::new(dir.path().join("out")).unwrap();
    let manifest = exporter.export(&folds, &config).unwrap();

    assert_eq!(manifest.n_folds, 6);
    assert_eq!(manifest.features, vec!["price".to_string()]);
    assert!(exporter.root().join("manifest.json").exists());

    for fold in &manifest.folds {
        let test = &fold.test;
        assert_eq!(test.rows, 10);
        assert_eq!(test.score_columns, vec!["price".to_string()]);

        let scores: Array2<f64> = read_npy(
            exporter.root().join(test.scores_file.as_ref().unwrap()),
        )
        .unwrap();
        assert_eq!(scores.shape(), &[10, 1]);

        let residuals: Array2<f64> =
            read_npy(exporter.root().join(&test.residuals_file)).unwrap();
        assert_eq!(residuals.shape(), &[10, 1]);

        let labels: Array1<u8> = read_npy(
            exporter.root().join(test.labels_file.as_ref().unwrap()),
        )
        .unwrap();
        assert_eq!(labels.len(), 10);
    }
}

#[test]
fn test_exported_arrays_match_fold_records() {
    let dir = TempDir::new().unwrap();
    let (folds, config) = run_split(SplitConfig::default().with_window(30, 10));

    let exporter = FoldExporter::new(dir.path()).unwrap();
    exporter.export(&folds, &config).unwrap();

    let scores: Array2<f64> = read_npy(dir.path().join("fold_000_test_scores.npy")).unwrap();
    let expected = folds[0].test.score(FeatureColumn::Price).unwrap();
    for (i, &v) in expected.iter().enumerate() {
        assert_eq!(scores[[i, 0]], v);
    }

    let labels: Array1<u8> = read_npy(dir.path().join("fold_000_test_labels.npy")).unwrap();
    assert_eq!(labels.to_vec(), *folds[0].test.labels.as_ref().unwrap());
}

#[test]
fn test_failed_cells_recorded_in_manifest() {
    // sma column is a monotone trend: its spread never fits.
    let dir = TempDir::new().unwrap();
    let config = SplitConfig::default()
        .with_window(30, 10)
        .with_features(vec![FeatureColumn::Price, FeatureColumn::SmaPct]);
    let (folds, config) = run_split(config);

    let exporter = FoldExporter::new(dir.path()).unwrap();
    let manifest = exporter.export(&folds, &config).unwrap();

    for fold in &manifest.folds {
        assert_eq!(fold.failed.len(), 1);
        assert_eq!(fold.failed[0].feature, "sma_pct");
        assert!(fold.failed[0].error.contains("mean reversion"));
        // Only the price column made it into the score matrix.
        assert_eq!(fold.test.score_columns, vec!["price".to_string()]);
        let scores: Array2<f64> = read_npy(
            dir.path().join(fold.test.scores_file.as_ref().unwrap()),
        )
        .unwrap();
        assert_eq!(scores.shape(), &[10, 1]);
        // Residuals keep every requested column, fitted or not.
        let residuals: Array2<f64> =
            read_npy(dir.path().join(&fold.test.residuals_file)).unwrap();
        assert_eq!(residuals.shape(), &[10, 2]);
    }
}

#[test]
fn test_train_labels_exported_when_requested() {
    let dir = TempDir::new().unwrap();
    let (folds, config) =
        run_split(SplitConfig::default().with_window(30, 10).with_label_train(true));

    let exporter = FoldExporter::new(dir.path()).unwrap();
    let manifest = exporter.export(&folds, &config).unwrap();

    for fold in &manifest.folds {
        let name = fold.train.labels_file.as_ref().unwrap();
        let labels: Array1<u8> = read_npy(dir.path().join(name)).unwrap();
        assert_eq!(labels.len(), 30);
    }
}

#[test]
fn test_train_labels_absent_by_default() {
    let dir = TempDir::new().unwrap();
    let (folds, config) = run_split(SplitConfig::default().with_window(30, 10));

    let exporter = FoldExporter::new(dir.path()).unwrap();
    let manifest = exporter.export(&folds, &config).unwrap();

    for fold in &manifest.folds {
        assert!(fold.train.labels_file.is_none());
        assert!(fold.test.labels_file.is_some());
    }
}

#[test]
fn test_manifest_json_roundtrip() {
    let dir = TempDir::new().unwrap();
    let (folds, config) = run_split(SplitConfig::default().with_window(30, 10));

    let exporter = FoldExporter::new(dir.path()).unwrap();
    let written = exporter.export(&folds, &config).unwrap();

    let text = std::fs::read_to_string(dir.path().join("manifest.json")).unwrap();
    let loaded: ExportManifest = serde_json::from_str(&text).unwrap();
    assert_eq!(loaded.n_folds, written.n_folds);
    assert_eq!(loaded.features, written.features);
    assert_eq!(loaded.folds.len(), written.folds.len());
    assert_eq!(loaded.config, config);
}
