#![allow(dead_code)]

use std::fs;
use std::sync::Arc;

use learning_dashboard::config::Config;
use learning_dashboard::data::Dataset;
use learning_dashboard::model::{
    ClassProbabilities, CompletionClass, CompletionModel, FeatureVector, ModelInfo,
};
use learning_dashboard::{AppContext, DashboardError, Result};
use linfa::prelude::*;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2};
use tempfile::TempDir;

pub const SAMPLE_CSV: &str = "\
student_id,course_id,chapter,time_spent,score,completed
S1,C1,1,30.0,70.0,1
S2,C1,1,10.0,35.0,0
S1,C1,2,50.0,90.0,1
S3,C2,2,5.0,20.0,0
S2,C1,3,20.0,55.0,1
S1,C2,1,12.5,64.5,0
";

pub fn fitted_regression() -> FittedLogisticRegression<f64, bool> {
    let features = Array2::from_shape_vec(
        (10, 3),
        vec![
            5.0, 10.0, 1.0, //
            10.0, 25.0, 2.0, //
            20.0, 30.0, 4.0, //
            15.0, 45.0, 3.0, //
            60.0, 50.0, 5.0, //
            30.0, 55.0, 2.0, //
            25.0, 40.0, 6.0, //
            70.0, 65.0, 4.0, //
            90.0, 80.0, 3.0, //
            110.0, 92.0, 7.0,
        ],
    )
    .unwrap();
    let targets = Array1::from_vec(vec![
        false, false, false, false, false, true, true, true, true, true,
    ]);
    LogisticRegression::default()
        .max_iterations(100)
        .fit(&linfa::Dataset::new(features, targets))
        .expect("Failed to train model")
}

/// Probability of completion for a single feature row, independent of which
/// label linfa picked as positive.
pub fn completed_probability(fitted: &FittedLogisticRegression<f64, bool>, x: &Array2<f64>) -> f64 {
    let positive = fitted.predict_probabilities(x)[0];
    if fitted.labels().pos.class {
        positive
    } else {
        1.0 - positive
    }
}

/// Dataset and model artifact written to a temporary directory.
pub struct Fixture {
    pub dir: TempDir,
    pub config: Config,
    pub fitted: FittedLogisticRegression<f64, bool>,
}

pub fn fixture_with_csv(csv: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("activity.csv");
    let model = dir.path().join("model.json");
    let fitted = fitted_regression();

    fs::write(&data, csv).unwrap();
    fs::write(&model, serde_json::to_string(&fitted).unwrap()).unwrap();

    let config = Config {
        data,
        model,
        host: "127.0.0.1".to_string(),
        port: 0,
        workers: Some(1),
    };
    Fixture { dir, config, fitted }
}

pub fn fixture() -> Fixture {
    fixture_with_csv(SAMPLE_CSV)
}

pub fn context() -> (Fixture, AppContext) {
    let fixture = fixture();
    let ctx = AppContext::load(&fixture.config).expect("fixture loads");
    (fixture, ctx)
}

/// A model that refuses every feature vector.
pub struct RejectingModel;

impl CompletionModel for RejectingModel {
    fn classify(&self, _features: &FeatureVector) -> Result<CompletionClass> {
        Err(DashboardError::Inference("feature shape rejected".to_string()))
    }

    fn classify_proba(&self, _features: &FeatureVector) -> Result<ClassProbabilities> {
        Err(DashboardError::Inference("feature shape rejected".to_string()))
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            algorithm: "Rejecting".to_string(),
            features: Vec::new(),
            coefficients: Vec::new(),
            intercept: 0.0,
        }
    }
}

pub fn rejecting_context() -> AppContext {
    let dataset = Dataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
    AppContext::new(dataset, Arc::new(RejectingModel))
}
