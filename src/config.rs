//! Run configuration: window sizes, feature selection, and run options.
//!
//! [`SplitConfig`] is plain serde data with builder-style `with_*` setters,
//! an explicit [`validate`](SplitConfig::validate) step, and TOML/JSON
//! persistence so an experiment's exact settings can be stored next to its
//! exported datasets. Validation happens when a splitter is constructed, not
//! at field-set time, so partially built configs are fine.

use crate::data::FeatureColumn;
use crate::error::{Result, SplitError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one cross-validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Training window width in rows (ignored in expanding mode).
    pub m_size: usize,
    /// Test window width in rows, also the per-fold step.
    pub e_size: usize,
    /// Use an expanding training window anchored at row 0.
    pub expanding: bool,
    /// Feature columns to model, in output order.
    pub features: Vec<FeatureColumn>,
    /// Rescale each segment's score columns into [0, 1].
    pub scale: bool,
    /// Also generate labels for training segments.
    pub label_train: bool,
    /// Process folds on the rayon pool.
    pub parallel: bool,
    /// Optional free-form experiment annotations, carried into the manifest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExperimentMetadata>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            m_size: 30,
            e_size: 10,
            expanding: false,
            features: vec![FeatureColumn::Price],
            scale: true,
            label_train: false,
            parallel: false,
            metadata: None,
        }
    }
}

impl SplitConfig {
    /// Set the training and test window widths.
    pub fn with_window(mut self, m_size: usize, e_size: usize) -> Self {
        self.m_size = m_size;
        self.e_size = e_size;
        self
    }

    /// Switch between expanding and sliding training windows.
    pub fn with_expanding(mut self, expanding: bool) -> Self {
        self.expanding = expanding;
        self
    }

    /// Set the feature columns to model.
    pub fn with_features(mut self, features: Vec<FeatureColumn>) -> Self {
        self.features = features;
        self
    }

    /// Enable or disable per-segment min-max rescaling.
    pub fn with_scale(mut self, scale: bool) -> Self {
        self.scale = scale;
        self
    }

    /// Enable or disable training-segment labels.
    pub fn with_label_train(mut self, label_train: bool) -> Self {
        self.label_train = label_train;
        self
    }

    /// Enable or disable parallel fold processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Attach experiment annotations.
    pub fn with_metadata(mut self, metadata: ExperimentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Check internal consistency.
    ///
    /// Window sizes are checked against the series length later, at planning
    /// time, because the config does not know the series.
    pub fn validate(&self) -> Result<()> {
        if self.e_size == 0 {
            return Err(SplitError::InvalidConfig(
                "e_size must be positive".to_string(),
            ));
        }
        if !self.expanding && self.m_size == 0 {
            return Err(SplitError::InvalidConfig(
                "m_size must be positive in sliding mode".to_string(),
            ));
        }
        if self.features.is_empty() {
            return Err(SplitError::InvalidConfig(
                "at least one feature column is required".to_string(),
            ));
        }
        for (i, feature) in self.features.iter().enumerate() {
            if self.features[..i].contains(feature) {
                return Err(SplitError::InvalidConfig(format!(
                    "duplicate feature column '{feature}'"
                )));
            }
        }
        Ok(())
    }

    /// Write the configuration as TOML.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Load a configuration from a TOML file and validate it.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }
}

/// Free-form annotations describing the experiment a run belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation timestamp, ISO 8601, filled by the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
}
