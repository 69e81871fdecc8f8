use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::data::LearningRecord;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DashboardSummary {
    pub total_students: usize,
    /// `None` when there are no records to average over.
    pub completion_rate: Option<f64>,
    pub dropout_risk: Option<f64>,
    pub avg_score: Option<f64>,
    pub avg_time_spent: Option<f64>,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletionDistribution {
    pub completed: usize,
    pub not_completed: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChapterCompletion {
    pub chapter: u32,
    pub records: usize,
    /// Fraction in 0..=1.
    pub completion_rate: f64,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct ScorePoint {
    pub time_spent: f64,
    pub score: f64,
    pub completed: bool,
}

// Chart data for one student's rows, source order
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct StudentTrend {
    pub chapters: Vec<u32>,
    pub scores: Vec<f64>,
    pub time_spent: Vec<f64>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub fn summarize(records: &[LearningRecord]) -> DashboardSummary {
    let total_students = records
        .iter()
        .map(|r| r.student_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let completion_rate =
        mean(records.iter().map(|r| if r.completed { 1.0 } else { 0.0 })).map(|m| round2(m * 100.0));

    DashboardSummary {
        total_students,
        completion_rate,
        dropout_risk: completion_rate.map(|rate| round2(100.0 - rate)),
        avg_score: mean(records.iter().map(|r| r.score)).map(round2),
        avg_time_spent: mean(records.iter().map(|r| r.time_spent)).map(round2),
    }
}

pub fn completion_distribution(records: &[LearningRecord]) -> CompletionDistribution {
    let completed = records.iter().filter(|r| r.completed).count();
    CompletionDistribution {
        completed,
        not_completed: records.len() - completed,
    }
}

pub fn chapter_completion(records: &[LearningRecord]) -> Vec<ChapterCompletion> {
    let mut by_chapter: BTreeMap<u32, (usize, usize)> = BTreeMap::new();

    for record in records {
        let entry = by_chapter.entry(record.chapter).or_insert((0, 0));
        entry.0 += 1;
        if record.completed {
            entry.1 += 1;
        }
    }

    by_chapter
        .into_iter()
        .map(|(chapter, (count, completed))| ChapterCompletion {
            chapter,
            records: count,
            completion_rate: completed as f64 / count as f64,
        })
        .collect()
}

pub fn score_time_points(records: &[LearningRecord]) -> Vec<ScorePoint> {
    records
        .iter()
        .map(|r| ScorePoint {
            time_spent: r.time_spent,
            score: r.score,
            completed: r.completed,
        })
        .collect()
}

pub fn student_trend<'a>(rows: impl IntoIterator<Item = &'a LearningRecord>) -> StudentTrend {
    let mut trend = StudentTrend::default();
    for row in rows {
        trend.chapters.push(row.chapter);
        trend.scores.push(row.score);
        trend.time_spent.push(row.time_spent);
    }
    trend
}
