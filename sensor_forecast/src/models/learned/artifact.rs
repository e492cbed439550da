//! Pre-trained regression artifacts consumed by the learned model
//!
//! An artifact maps a feature frame to one output column per tracked
//! channel. [`TreeEnsembleArtifact`] reads a boosted regression tree ensemble
//! from JSON; any other implementation of [`RegressionArtifact`] can be
//! handed to the learned model instead.

use crate::error::{ForecastError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::fs;
use std::path::Path;

/// Opaque multi-output regression model
pub trait RegressionArtifact: Debug + Send + Sync {
    /// Predict one row of outputs per feature row; output columns are named
    /// after the channels they predict.
    fn predict(&self, features: &DataFrame) -> Result<DataFrame>;
}

/// A single regression tree in flattened node-array form.
///
/// Internal node `i` splits on `split_feature[i]` at `threshold[i]`: rows with
/// a value `<=` the threshold go to `left_child[i]`, others (including NaN)
/// to `right_child[i]`. A negative child `c` points at leaf `-c - 1`. A tree
/// without internal nodes is a single leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    #[serde(default)]
    pub split_feature: Vec<usize>,
    #[serde(default)]
    pub threshold: Vec<f64>,
    #[serde(default)]
    pub left_child: Vec<i32>,
    #[serde(default)]
    pub right_child: Vec<i32>,
    pub leaf_value: Vec<f64>,
}

impl RegressionTree {
    fn validate(&self, feature_count: usize) -> std::result::Result<(), String> {
        let internal_nodes = self.split_feature.len();
        if self.threshold.len() != internal_nodes
            || self.left_child.len() != internal_nodes
            || self.right_child.len() != internal_nodes
        {
            return Err("split/child/threshold length mismatch".to_string());
        }
        if self.leaf_value.is_empty() {
            return Err("tree has no leaves".to_string());
        }
        if let Some(feature) = self.split_feature.iter().find(|&&f| f >= feature_count) {
            return Err(format!(
                "split feature {} out of range for {} features",
                feature, feature_count
            ));
        }

        let leaves = self.leaf_value.len() as i64;
        for &child in self.left_child.iter().chain(&self.right_child) {
            let child = child as i64;
            let valid = if child >= 0 {
                child < internal_nodes as i64
            } else {
                -child - 1 < leaves
            };
            if !valid {
                return Err(format!("child reference {} out of range", child));
            }
        }

        Ok(())
    }

    fn predict(&self, row: &[f64]) -> Option<f64> {
        if self.split_feature.is_empty() {
            return self.leaf_value.first().copied();
        }

        let mut node = 0usize;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..=self.split_feature.len() {
            let value = *row.get(self.split_feature[node])?;
            let child = if value <= self.threshold[node] {
                self.left_child[node]
            } else {
                self.right_child[node]
            };

            if child < 0 {
                return self.leaf_value.get((-child - 1) as usize).copied();
            }
            node = child as usize;
        }

        None
    }
}

/// Additive tree ensemble for one output channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEnsemble {
    /// Output column name
    pub name: String,
    /// Constant added to the sum of tree outputs
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<RegressionTree>,
}

/// Boosted regression trees with one ensemble per output channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsembleArtifact {
    /// Feature column names, in the order trees index them
    feature_names: Vec<String>,
    outputs: Vec<OutputEnsemble>,
}

impl TreeEnsembleArtifact {
    /// Create an artifact, checking every tree against the feature schema
    pub fn new(feature_names: Vec<String>, outputs: Vec<OutputEnsemble>) -> Result<Self> {
        let artifact = Self {
            feature_names,
            outputs,
        };
        artifact.validate().map_err(ForecastError::InvalidParameter)?;
        Ok(artifact)
    }

    /// Load an artifact from a JSON file.
    ///
    /// Any failure (missing file, malformed JSON, inconsistent trees) is an
    /// [`ForecastError::ArtifactLoad`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let load_error = |reason: String| ForecastError::ArtifactLoad {
            path: path.to_path_buf(),
            reason,
        };

        let text = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        let artifact: Self = serde_json::from_str(&text).map_err(|e| load_error(e.to_string()))?;
        artifact.validate().map_err(load_error)?;

        tracing::debug!(
            path = %path.display(),
            features = artifact.feature_names.len(),
            outputs = artifact.outputs.len(),
            "Loaded tree ensemble artifact"
        );
        Ok(artifact)
    }

    /// Feature column names expected in the input frame
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Output column names produced
    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.iter().map(|o| o.name.as_str()).collect()
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.feature_names.is_empty() {
            return Err("artifact declares no features".to_string());
        }
        if self.outputs.is_empty() {
            return Err("artifact declares no outputs".to_string());
        }
        for output in &self.outputs {
            for (i, tree) in output.trees.iter().enumerate() {
                tree.validate(self.feature_names.len())
                    .map_err(|reason| format!("output {} tree {}: {}", output.name, i, reason))?;
            }
        }
        Ok(())
    }
}

impl RegressionArtifact for TreeEnsembleArtifact {
    fn predict(&self, features: &DataFrame) -> Result<DataFrame> {
        let mut inputs = Vec::with_capacity(self.feature_names.len());
        for name in &self.feature_names {
            let column = features.column(name).map_err(|_| {
                ForecastError::Artifact(format!("Feature column {} missing from input", name))
            })?;
            let values: Vec<f64> = column
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            inputs.push(values);
        }

        let rows = features.height();
        let mut columns = Vec::with_capacity(self.outputs.len());
        for output in &self.outputs {
            let mut predictions = Vec::with_capacity(rows);
            for row in 0..rows {
                let feature_row: Vec<f64> = inputs.iter().map(|column| column[row]).collect();
                let mut score = output.base_score;
                for tree in &output.trees {
                    score += tree.predict(&feature_row).ok_or_else(|| {
                        ForecastError::Artifact(format!(
                            "Tree traversal for output {} did not reach a leaf",
                            output.name
                        ))
                    })?;
                }
                predictions.push(score);
            }
            columns.push(Series::new(&output.name, predictions));
        }

        Ok(DataFrame::new(columns)?)
    }
}
