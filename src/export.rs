//! Dataset export: `.npy` arrays plus a JSON manifest.
//!
//! Each fold segment becomes up to three files under the output directory:
//!
//! ```text
//! output/
//! ├── fold_000_train_scores.npy      float64, rows × fitted columns
//! ├── fold_000_train_residuals.npy   float64, rows × requested columns
//! ├── fold_000_test_scores.npy
//! ├── fold_000_test_residuals.npy
//! ├── fold_000_test_labels.npy       uint8, rows
//! ├── ...
//! └── manifest.json
//! ```
//!
//! Score matrices contain only the columns that fit, in request order, so a
//! failed cell narrows the matrix instead of injecting NaN padding. The
//! manifest records, per fold, which columns are present and which cells
//! failed with what error, so a loader never has to guess at shapes.

use crate::config::SplitConfig;
use crate::error::Result;
use crate::splitter::{FoldRecord, Segment};
use log::info;
use ndarray::{Array1, Array2};
use ndarray_npy::write_npy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level manifest written as `manifest.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportManifest {
    /// Number of folds exported.
    pub n_folds: usize,
    /// Requested feature columns, in output order.
    pub features: Vec<String>,
    /// The configuration the run used.
    pub config: SplitConfig,
    /// Per-fold entries in fold order.
    pub folds: Vec<FoldManifest>,
}

/// Manifest entry for one fold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldManifest {
    pub index: usize,
    pub train_start: usize,
    pub train_end: usize,
    pub test_start: usize,
    pub test_end: usize,
    pub train: SegmentManifest,
    pub test: SegmentManifest,
    /// Cells whose fit failed, with the error message.
    pub failed: Vec<FailedCellManifest>,
}

/// Manifest entry for one segment's files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentManifest {
    pub rows: usize,
    /// Columns present in the scores file, in order. Empty when every
    /// requested cell failed, in which case `scores_file` is absent too.
    pub score_columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores_file: Option<String>,
    pub residuals_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels_file: Option<String>,
}

/// A failed (fold, feature) cell as recorded in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedCellManifest {
    pub feature: String,
    pub error: String,
}

/// Writes fold records to disk as `.npy` arrays plus a manifest.
pub struct FoldExporter {
    root: PathBuf,
}

impl FoldExporter {
    /// Create an exporter rooted at `path`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write every fold's arrays and the manifest, returning the manifest.
    pub fn export(&self, folds: &[FoldRecord], config: &SplitConfig) -> Result<ExportManifest> {
        let mut fold_manifests = Vec::with_capacity(folds.len());
        for fold in folds {
            let train = self.write_segment(fold, Segment::Train)?;
            let test = self.write_segment(fold, Segment::Test)?;
            fold_manifests.push(FoldManifest {
                index: fold.index,
                train_start: fold.bounds.train_start,
                train_end: fold.bounds.train_end,
                test_start: fold.bounds.test_start,
                test_end: fold.bounds.test_end,
                train,
                test,
                failed: fold
                    .failed_cells()
                    .into_iter()
                    .map(|(feature, error)| FailedCellManifest {
                        feature: feature.as_str().to_string(),
                        error: error.to_string(),
                    })
                    .collect(),
            });
        }

        let manifest = ExportManifest {
            n_folds: folds.len(),
            features: config.features.iter().map(|f| f.as_str().to_string()).collect(),
            config: config.clone(),
            folds: fold_manifests,
        };
        let file = std::fs::File::create(self.root.join("manifest.json"))?;
        serde_json::to_writer_pretty(file, &manifest)?;
        info!(
            "exported {} folds to {}",
            folds.len(),
            self.root.display()
        );
        Ok(manifest)
    }

    fn write_segment(&self, fold: &FoldRecord, segment: Segment) -> Result<SegmentManifest> {
        let bundle = fold.segment(segment);
        let prefix = format!("fold_{:03}_{}", fold.index, segment.as_str());

        let fitted = bundle.fitted_features();
        let scores_file = if fitted.is_empty() {
            None
        } else {
            let name = format!("{prefix}_scores.npy");
            let matrix = column_matrix(
                bundle.rows,
                &fitted
                    .iter()
                    .map(|&f| {
                        // fitted_features only lists features with Some scores
                        bundle.score(f).unwrap_or(&[])
                    })
                    .collect::<Vec<_>>(),
            );
            write_npy(self.root.join(&name), &matrix)?;
            Some(name)
        };

        let residuals_name = format!("{prefix}_residuals.npy");
        let residual_columns: Vec<&[f64]> =
            bundle.residuals.iter().map(Vec::as_slice).collect();
        let residuals = column_matrix(bundle.rows, &residual_columns);
        write_npy(self.root.join(&residuals_name), &residuals)?;

        let labels_file = match &bundle.labels {
            Some(labels) => {
                let name = format!("{prefix}_labels.npy");
                let array = Array1::from_vec(labels.clone());
                write_npy(self.root.join(&name), &array)?;
                Some(name)
            }
            None => None,
        };

        Ok(SegmentManifest {
            rows: bundle.rows,
            score_columns: fitted.iter().map(|f| f.as_str().to_string()).collect(),
            scores_file,
            residuals_file: residuals_name,
            labels_file,
        })
    }
}

/// Stack per-feature column slices into a rows × columns matrix.
fn column_matrix(rows: usize, columns: &[&[f64]]) -> Array2<f64> {
    let mut matrix = Array2::zeros((rows, columns.len()));
    for (j, column) in columns.iter().enumerate() {
        for (i, &v) in column.iter().enumerate() {
            matrix[[i, j]] = v;
        }
    }
    matrix
}
