use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "learning-dashboard")]
#[command(about = "Student learning analytics dashboard with completion prediction", long_about = None)]
pub struct Config {
    /// Learning activity CSV
    #[arg(long, env = "DASHBOARD_DATA", default_value = "data/learning_activity.csv")]
    pub data: PathBuf,

    /// Serialized completion model (JSON)
    #[arg(long, env = "DASHBOARD_MODEL", default_value = "data/student_completion_model.json")]
    pub model: PathBuf,

    #[arg(long, env = "DASHBOARD_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "DASHBOARD_PORT", default_value_t = 8080)]
    pub port: u16,

    /// HTTP worker threads; defaults to the number of physical cores
    #[arg(long, env = "DASHBOARD_WORKERS")]
    pub workers: Option<usize>,
}

impl Config {
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}
