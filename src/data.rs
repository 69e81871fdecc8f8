use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::Reader;
use ndarray::Array2;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{DashboardError, Result};
use crate::model::{FeatureVector, FEATURE_COUNT};

/// One (student, course, chapter) observation from the activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningRecord {
    pub student_id: String,
    pub course_id: String,
    pub chapter: u32,
    pub time_spent: f64,
    pub score: f64,
    #[serde(deserialize_with = "deserialize_flag")]
    pub completed: bool,
}

impl LearningRecord {
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            time_spent: self.time_spent,
            score: self.score,
            chapter: self.chapter,
        }
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "1" | "1.0" | "true" | "True" | "TRUE" => Ok(true),
        "0" | "0.0" | "false" | "False" | "FALSE" => Ok(false),
        other => Err(de::Error::custom(format!("invalid completion flag {other:?}"))),
    }
}

/// The activity log, loaded once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<LearningRecord>,
}

impl Dataset {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let rdr = Reader::from_path(path).map_err(|source| DashboardError::DatasetLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Self::read_all(rdr, path)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::read_all(Reader::from_reader(reader), Path::new("<reader>"))
    }

    pub fn from_records(records: Vec<LearningRecord>) -> Self {
        Self { records }
    }

    fn read_all<R: Read>(mut rdr: Reader<R>, path: &Path) -> Result<Self> {
        let mut records = Vec::new();

        for result in rdr.deserialize() {
            let record: LearningRecord = result.map_err(|err| DashboardError::DatasetParse {
                path: path.to_path_buf(),
                line: err.position().map(|pos| pos.line()).unwrap_or(0),
                message: err.to_string(),
            })?;
            records.push(record);
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[LearningRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct student ids in order of first appearance.
    pub fn student_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.student_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Rows whose student id equals `student_id` exactly, in source order.
    pub fn filter_by_student(&self, student_id: &str) -> Vec<&LearningRecord> {
        self.records
            .iter()
            .filter(|r| r.student_id == student_id)
            .collect()
    }

    /// All records as model input rows, columns in feature order.
    pub fn feature_matrix(&self) -> Array2<f64> {
        let rows: Vec<[f64; FEATURE_COUNT]> = self
            .records
            .iter()
            .map(|r| r.features().to_row())
            .collect();
        Array2::from_shape_fn((rows.len(), FEATURE_COUNT), |(i, j)| rows[i][j])
    }
}
