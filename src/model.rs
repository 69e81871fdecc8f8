use std::fs;
use std::path::Path;

use linfa::prelude::*;
use linfa_logistic::FittedLogisticRegression;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

pub const FEATURE_COUNT: usize = 3;

/// Column order the classifier was trained with.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["time_spent", "score", "chapter"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub time_spent: f64,
    pub score: f64,
    pub chapter: u32,
}

impl FeatureVector {
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [self.time_spent, self.score, f64::from(self.chapter)]
    }

    /// A single-row matrix ready for the classifier.
    pub fn to_array(&self) -> Array2<f64> {
        let row = self.to_row();
        Array2::from_shape_fn((1, FEATURE_COUNT), |(_, j)| row[j])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionClass {
    NotCompleted = 0,
    Completed = 1,
}

impl CompletionClass {
    pub fn label(self) -> u8 {
        self as u8
    }
}

impl From<bool> for CompletionClass {
    fn from(completed: bool) -> Self {
        if completed {
            CompletionClass::Completed
        } else {
            CompletionClass::NotCompleted
        }
    }
}

/// Probability mass per class, indexed by class label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbabilities([f64; 2]);

impl ClassProbabilities {
    pub fn from_completed(p: f64) -> Self {
        Self([1.0 - p, p])
    }

    pub fn of(&self, class: CompletionClass) -> f64 {
        self.0[class.label() as usize]
    }

    pub fn completed(&self) -> f64 {
        self.of(CompletionClass::Completed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub algorithm: String,
    pub features: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Chapter column of a feature matrix back to a chapter number.
fn chapter_from_column(value: f64) -> Result<u32> {
    if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Ok(value as u32)
    } else {
        Err(DashboardError::Inference(format!(
            "chapter column holds {value}, not a chapter number"
        )))
    }
}

/// Capability set of an already-fitted completion classifier.
pub trait CompletionModel: Send + Sync {
    fn classify(&self, features: &FeatureVector) -> Result<CompletionClass>;

    fn classify_proba(&self, features: &FeatureVector) -> Result<ClassProbabilities>;

    /// Completion probability for every row of a feature matrix.
    fn completion_probabilities(&self, rows: &Array2<f64>) -> Result<Vec<f64>> {
        if rows.ncols() != FEATURE_COUNT {
            return Err(DashboardError::Inference(format!(
                "expected {FEATURE_COUNT} feature columns, got {}",
                rows.ncols()
            )));
        }
        rows.outer_iter()
            .map(|row| {
                let features = FeatureVector {
                    time_spent: row[0],
                    score: row[1],
                    chapter: chapter_from_column(row[2])?,
                };
                self.classify_proba(&features).map(|p| p.completed())
            })
            .collect()
    }

    fn describe(&self) -> ModelInfo;
}

/// Logistic regression fitted offline and shipped as a serde JSON artifact.
#[derive(Debug, Clone)]
pub struct LogisticCompletionModel {
    inner: FittedLogisticRegression<f64, bool>,
}

impl LogisticCompletionModel {
    pub fn new(inner: FittedLogisticRegression<f64, bool>) -> Result<Self> {
        let found = inner.params().len();
        if found != FEATURE_COUNT {
            return Err(DashboardError::IncompatibleModel {
                expected: FEATURE_COUNT,
                found,
            });
        }
        Ok(Self { inner })
    }

    /// linfa reports the probability of its positive label, which is the
    /// majority class of the training set. Map it onto "completed".
    fn completed_probability(&self, p: f64) -> f64 {
        if self.inner.labels().pos.class {
            p
        } else {
            1.0 - p
        }
    }

    fn checked_input(&self, features: &FeatureVector) -> Result<Array2<f64>> {
        let x = features.to_array();
        if x.ncols() != self.inner.params().len() {
            return Err(DashboardError::Inference(format!(
                "expected {} features, got {}",
                self.inner.params().len(),
                x.ncols()
            )));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(DashboardError::Inference(
                "feature vector contains non-finite values".to_string(),
            ));
        }
        Ok(x)
    }
}

impl CompletionModel for LogisticCompletionModel {
    fn classify(&self, features: &FeatureVector) -> Result<CompletionClass> {
        let x = self.checked_input(features)?;
        let prediction = self.inner.predict(&x);
        prediction
            .get(0)
            .map(|&completed| CompletionClass::from(completed))
            .ok_or_else(|| DashboardError::Inference("model returned no prediction".to_string()))
    }

    fn classify_proba(&self, features: &FeatureVector) -> Result<ClassProbabilities> {
        let x = self.checked_input(features)?;
        let probabilities = self.inner.predict_probabilities(&x);
        match probabilities.get(0) {
            Some(&p) if p.is_finite() => Ok(ClassProbabilities::from_completed(
                self.completed_probability(p),
            )),
            Some(&p) => Err(DashboardError::Inference(format!(
                "model returned probability {p}"
            ))),
            None => Err(DashboardError::Inference(
                "model returned no probability".to_string(),
            )),
        }
    }

    fn completion_probabilities(&self, rows: &Array2<f64>) -> Result<Vec<f64>> {
        if rows.ncols() != self.inner.params().len() {
            return Err(DashboardError::Inference(format!(
                "expected {} feature columns, got {}",
                self.inner.params().len(),
                rows.ncols()
            )));
        }
        Ok(self
            .inner
            .predict_probabilities(rows)
            .iter()
            .map(|&p| self.completed_probability(p))
            .collect())
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            algorithm: "Logistic Regression".to_string(),
            features: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            coefficients: self.inner.params().to_vec(),
            intercept: self.inner.intercept(),
        }
    }
}

pub fn load_model(path: impl AsRef<Path>) -> Result<LogisticCompletionModel> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| DashboardError::ModelLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let fitted: FittedLogisticRegression<f64, bool> =
        serde_json::from_str(&raw).map_err(|source| DashboardError::ModelFormat {
            path: path.to_path_buf(),
            source,
        })?;
    LogisticCompletionModel::new(fitted)
}
