mod common;

use std::fs;

use clap::Parser;
use learning_dashboard::config::Config;
use learning_dashboard::model::FEATURE_COUNT;
use learning_dashboard::prediction::{self, PredictionInput};
use learning_dashboard::{AppContext, DashboardError};

#[test]
fn context_loads_dataset_and_model_from_disk() {
    let (fixture, ctx) = common::context();
    assert_eq!(ctx.dataset.len(), 6);
    assert_eq!(ctx.dataset.student_ids(), vec!["S1", "S2", "S3"]);

    let info = ctx.model.describe();
    assert_eq!(info.algorithm, "Logistic Regression");
    assert_eq!(info.features, vec!["time_spent", "score", "chapter"]);
    assert_eq!(info.coefficients.len(), FEATURE_COUNT);
    assert!((info.intercept - fixture.fitted.intercept()).abs() < 1e-9);
}

#[test]
fn missing_dataset_is_fatal() {
    let fixture = common::fixture();
    fs::remove_file(&fixture.config.data).unwrap();
    match AppContext::load(&fixture.config) {
        Err(DashboardError::DatasetLoad { path, .. }) => assert_eq!(path, fixture.config.data),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("load should fail without a dataset"),
    }
}

#[test]
fn malformed_dataset_is_fatal() {
    let fixture = common::fixture_with_csv(
        "student_id,course_id,chapter,time_spent,score,completed\nS1,C1,one,1.0,2.0,1\n",
    );
    assert!(matches!(
        AppContext::load(&fixture.config),
        Err(DashboardError::DatasetParse { line: 2, .. })
    ));
}

#[test]
fn missing_model_is_fatal() {
    let fixture = common::fixture();
    fs::remove_file(&fixture.config.model).unwrap();
    assert!(matches!(
        AppContext::load(&fixture.config),
        Err(DashboardError::ModelLoad { .. })
    ));
}

#[test]
fn incompatible_model_artifact_is_fatal() {
    let fixture = common::fixture();
    fs::write(&fixture.config.model, "{\"weights\": [1, 2, 3]}").unwrap();
    assert!(matches!(
        AppContext::load(&fixture.config),
        Err(DashboardError::ModelFormat { .. })
    ));
}

#[test]
fn header_only_dataset_loads_empty() {
    let fixture =
        common::fixture_with_csv("student_id,course_id,chapter,time_spent,score,completed\n");
    let ctx = AppContext::load(&fixture.config).unwrap();
    assert!(ctx.dataset.is_empty());
}

#[test]
fn bundled_inputs_load_with_default_config() {
    let config = Config::try_parse_from(["learning-dashboard"]).unwrap();
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let config = Config {
        data: root.join(&config.data),
        model: root.join(&config.model),
        ..config
    };

    let ctx = AppContext::load(&config).unwrap();
    assert_eq!(ctx.dataset.len(), 95);
    assert_eq!(ctx.dataset.student_ids().len(), 10);
    assert_eq!(ctx.model.describe().coefficients.len(), FEATURE_COUNT);

    let outcome = prediction::predict(ctx.model.as_ref(), &PredictionInput::default()).unwrap();
    assert!((0.0..=100.0).contains(&outcome.completion_probability));

    let strong = PredictionInput {
        chapter: 3,
        time_spent: 120.0,
        score: 95.0,
        ..PredictionInput::default()
    };
    let weak = PredictionInput {
        chapter: 3,
        time_spent: 5.0,
        score: 10.0,
        ..PredictionInput::default()
    };
    let strong = prediction::predict(ctx.model.as_ref(), &strong).unwrap();
    let weak = prediction::predict(ctx.model.as_ref(), &weak).unwrap();
    assert!(strong.completion_probability > weak.completion_probability);
}
