use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::data::Dataset;
use crate::error::Result;
use crate::model::{self, CompletionModel};

/// Read-only state shared by every handler for the life of the process.
#[derive(Clone)]
pub struct AppContext {
    pub dataset: Arc<Dataset>,
    pub model: Arc<dyn CompletionModel>,
}

impl AppContext {
    pub fn new(dataset: Dataset, model: Arc<dyn CompletionModel>) -> Self {
        Self {
            dataset: Arc::new(dataset),
            model,
        }
    }

    pub fn load(config: &Config) -> Result<Self> {
        let dataset = Dataset::load(&config.data)?;
        info!(
            path = %config.data.display(),
            rows = dataset.len(),
            students = dataset.student_ids().len(),
            "dataset loaded"
        );

        let model = model::load_model(&config.model)?;
        info!(
            path = %config.model.display(),
            features = model.describe().features.len(),
            "completion model loaded"
        );

        Ok(Self::new(dataset, Arc::new(model)))
    }
}
