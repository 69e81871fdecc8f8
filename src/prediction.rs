use std::ops::RangeInclusive;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::data::LearningRecord;
use crate::model::{CompletionClass, CompletionModel, FeatureVector};

pub const CHAPTER_RANGE: RangeInclusive<u32> = 1..=20;
pub const TIME_SPENT_RANGE: RangeInclusive<f64> = 0.0..=200.0;
pub const SCORE_RANGE: RangeInclusive<f64> = 0.0..=100.0;
pub const INPUT_STEP: f64 = 0.5;

/// Percent at or above which the recommendation switches to reinforcement.
pub const RECOMMENDATION_THRESHOLD: f64 = 50.0;

fn default_student_id() -> String {
    "S_TEST".to_string()
}

fn default_course_id() -> String {
    "C1".to_string()
}

fn default_chapter() -> u32 {
    *CHAPTER_RANGE.start()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    #[serde(default = "default_student_id")]
    pub student_id: String,
    #[serde(default = "default_course_id")]
    pub course_id: String,
    #[serde(default = "default_chapter")]
    pub chapter: u32,
    #[serde(default)]
    pub time_spent: f64,
    #[serde(default)]
    pub score: f64,
}

impl Default for PredictionInput {
    fn default() -> Self {
        Self {
            student_id: default_student_id(),
            course_id: default_course_id(),
            chapter: default_chapter(),
            time_spent: *TIME_SPENT_RANGE.start(),
            score: *SCORE_RANGE.start(),
        }
    }
}

fn check_range(field: &'static str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if value.is_finite() && range.contains(&value) {
        Ok(())
    } else {
        Err(DashboardError::InvalidInput {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

impl PredictionInput {
    /// Rejects values the form controls would not have allowed.
    pub fn validate(&self) -> Result<()> {
        let chapters = f64::from(*CHAPTER_RANGE.start())..=f64::from(*CHAPTER_RANGE.end());
        check_range("chapter", f64::from(self.chapter), &chapters)?;
        check_range("time_spent", self.time_spent, &TIME_SPENT_RANGE)?;
        check_range("score", self.score, &SCORE_RANGE)
    }

    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            time_spent: self.time_spent,
            score: self.score,
            chapter: self.chapter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    LikelyToComplete,
    AtRisk,
}

impl Verdict {
    pub fn message(self, probability: f64) -> String {
        match self {
            Verdict::LikelyToComplete => {
                format!("Student likely to COMPLETE the course ({probability:.2}%)")
            }
            Verdict::AtRisk => format!("High risk of NOT completing ({probability:.2}%)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    NeedsSupport,
    PerformingWell,
}

impl Recommendation {
    pub fn from_probability(probability: f64) -> Self {
        if probability < RECOMMENDATION_THRESHOLD {
            Recommendation::NeedsSupport
        } else {
            Recommendation::PerformingWell
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Recommendation::NeedsSupport => "Suggested support:",
            Recommendation::PerformingWell => "Student is performing well. Keep them motivated!",
        }
    }

    pub fn actions(self) -> &'static [&'static str] {
        match self {
            Recommendation::NeedsSupport => &[
                "Provide mentor assistance",
                "Encourage more engagement",
                "Monitor learning behavior closely",
            ],
            Recommendation::PerformingWell => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    pub student_id: String,
    pub course_id: String,
    pub predicted: CompletionClass,
    /// Probability of completion as a percentage.
    pub completion_probability: f64,
    pub verdict: Verdict,
    pub recommendation: Recommendation,
}

/// Verdict follows the model's own class; the recommendation follows the
/// 50% cut on probability. The two are computed independently.
pub fn predict(model: &dyn CompletionModel, input: &PredictionInput) -> Result<PredictionOutcome> {
    let features = input.features();
    let predicted = model.classify(&features)?;
    let completion_probability = model.classify_proba(&features)?.completed() * 100.0;

    let verdict = match predicted {
        CompletionClass::Completed => Verdict::LikelyToComplete,
        CompletionClass::NotCompleted => Verdict::AtRisk,
    };
    let recommendation = Recommendation::from_probability(completion_probability);

    debug!(
        student_id = %input.student_id,
        course_id = %input.course_id,
        ?predicted,
        completion_probability,
        "prediction"
    );

    Ok(PredictionOutcome {
        student_id: input.student_id.clone(),
        course_id: input.course_id.clone(),
        predicted,
        completion_probability,
        verdict,
        recommendation,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchPrediction {
    pub student_id: String,
    pub course_id: String,
    pub chapter: u32,
    pub completion_probability: f64,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total_records: usize,
    /// Records whose recommendation is `PerformingWell`.
    pub performing_well: usize,
    pub avg_completion_probability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub predictions: Vec<BatchPrediction>,
    pub summary: BatchSummary,
}

/// Scores every record of the dataset in one pass over its feature matrix.
pub fn predict_batch(
    model: &dyn CompletionModel,
    records: &[LearningRecord],
    features: &Array2<f64>,
) -> Result<BatchResult> {
    let probabilities = model.completion_probabilities(features)?;
    if probabilities.len() != records.len() {
        return Err(DashboardError::Inference(format!(
            "{} probabilities for {} records",
            probabilities.len(),
            records.len()
        )));
    }

    let predictions: Vec<BatchPrediction> = records
        .iter()
        .zip(probabilities)
        .map(|(record, p)| {
            let completion_probability = p * 100.0;
            BatchPrediction {
                student_id: record.student_id.clone(),
                course_id: record.course_id.clone(),
                chapter: record.chapter,
                completion_probability,
                recommendation: Recommendation::from_probability(completion_probability),
            }
        })
        .collect();

    let total_records = predictions.len();
    let performing_well = predictions
        .iter()
        .filter(|p| p.recommendation == Recommendation::PerformingWell)
        .count();
    let avg_completion_probability = if total_records > 0 {
        predictions.iter().map(|p| p.completion_probability).sum::<f64>() / total_records as f64
    } else {
        0.0
    };

    Ok(BatchResult {
        predictions,
        summary: BatchSummary {
            total_records,
            performing_well,
            avg_completion_probability,
        },
    })
}
