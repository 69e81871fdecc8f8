//! Fixtures shared by unit tests.

use std::sync::Arc;

use linfa::prelude::*;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2};

use crate::context::AppContext;
use crate::data::{Dataset, LearningRecord};
use crate::error::{DashboardError, Result};
use crate::model::{
    ClassProbabilities, CompletionClass, CompletionModel, FeatureVector, LogisticCompletionModel,
    ModelInfo,
};

pub fn record(student: &str, chapter: u32, time_spent: f64, score: f64, completed: bool) -> LearningRecord {
    LearningRecord {
        student_id: student.to_string(),
        course_id: "C1".to_string(),
        chapter,
        time_spent,
        score,
        completed,
    }
}

pub fn sample_dataset() -> Dataset {
    Dataset::from_records(vec![
        record("S1", 1, 30.0, 70.0, true),
        record("S2", 1, 10.0, 35.0, false),
        record("S1", 2, 50.0, 90.0, true),
        record("S3", 2, 5.0, 20.0, false),
        record("S2", 3, 20.0, 55.0, true),
    ])
}

pub fn fitted_regression() -> FittedLogisticRegression<f64, bool> {
    // Overlapping classes keep the fit bounded.
    let rows: Vec<(f64, f64, f64, bool)> = vec![
        (5.0, 10.0, 1.0, false),
        (10.0, 25.0, 2.0, false),
        (20.0, 30.0, 4.0, false),
        (15.0, 45.0, 3.0, false),
        (60.0, 50.0, 5.0, false),
        (30.0, 55.0, 2.0, true),
        (25.0, 40.0, 6.0, true),
        (70.0, 65.0, 4.0, true),
        (90.0, 80.0, 3.0, true),
        (110.0, 92.0, 7.0, true),
        (40.0, 60.0, 8.0, false),
        (80.0, 75.0, 2.0, true),
    ];
    let features = Array2::from_shape_fn((rows.len(), 3), |(i, j)| match j {
        0 => rows[i].0,
        1 => rows[i].1,
        _ => rows[i].2,
    });
    let targets: Array1<bool> = rows.iter().map(|r| r.3).collect();
    LogisticRegression::default()
        .max_iterations(100)
        .fit(&linfa::Dataset::new(features, targets))
        .expect("Failed to train model")
}

/// Twice as many non-completions as completions, so linfa's positive label
/// is `false`.
pub fn fitted_mostly_incomplete_regression() -> FittedLogisticRegression<f64, bool> {
    let rows: Vec<(f64, f64, f64, bool)> = vec![
        (5.0, 10.0, 1.0, false),
        (10.0, 25.0, 2.0, false),
        (20.0, 30.0, 4.0, false),
        (15.0, 45.0, 3.0, false),
        (60.0, 50.0, 5.0, false),
        (40.0, 60.0, 8.0, false),
        (35.0, 35.0, 2.0, false),
        (12.0, 20.0, 6.0, false),
        (50.0, 60.0, 4.0, false),
        (25.0, 40.0, 6.0, false),
        (50.0, 60.0, 4.0, true),
        (90.0, 80.0, 3.0, true),
        (110.0, 92.0, 7.0, true),
        (80.0, 75.0, 2.0, true),
        (30.0, 55.0, 2.0, true),
    ];
    let features = Array2::from_shape_fn((rows.len(), 3), |(i, j)| match j {
        0 => rows[i].0,
        1 => rows[i].1,
        _ => rows[i].2,
    });
    let targets: Array1<bool> = rows.iter().map(|r| r.3).collect();
    LogisticRegression::default()
        .max_iterations(100)
        .fit(&linfa::Dataset::new(features, targets))
        .expect("Failed to train model")
}

pub fn fitted_two_feature_regression() -> FittedLogisticRegression<f64, bool> {
    let features = Array2::from_shape_vec(
        (4, 2),
        vec![1.0, 40.0, 2.0, 50.0, 8.0, 95.0, 9.0, 70.0],
    )
    .unwrap();
    let targets = Array1::from_vec(vec![false, true, true, false]);
    LogisticRegression::default()
        .max_iterations(100)
        .fit(&linfa::Dataset::new(features, targets))
        .expect("Failed to train model")
}

/// Returns a fixed class and probability regardless of input.
pub struct FixedModel {
    pub class: CompletionClass,
    pub completed: f64,
}

impl CompletionModel for FixedModel {
    fn classify(&self, _features: &FeatureVector) -> Result<CompletionClass> {
        Ok(self.class)
    }

    fn classify_proba(&self, _features: &FeatureVector) -> Result<ClassProbabilities> {
        Ok(ClassProbabilities::from_completed(self.completed))
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            algorithm: "Fixed".to_string(),
            features: Vec::new(),
            coefficients: Vec::new(),
            intercept: 0.0,
        }
    }
}

/// Rejects every feature vector.
pub struct RejectingModel;

impl CompletionModel for RejectingModel {
    fn classify(&self, _features: &FeatureVector) -> Result<CompletionClass> {
        Err(DashboardError::Inference("shape mismatch".to_string()))
    }

    fn classify_proba(&self, _features: &FeatureVector) -> Result<ClassProbabilities> {
        Err(DashboardError::Inference("shape mismatch".to_string()))
    }

    fn describe(&self) -> ModelInfo {
        FixedModel {
            class: CompletionClass::NotCompleted,
            completed: 0.0,
        }
        .describe()
    }
}

pub fn sample_context() -> AppContext {
    let model = LogisticCompletionModel::new(fitted_regression()).expect("three-feature fit");
    AppContext::new(sample_dataset(), Arc::new(model))
}
