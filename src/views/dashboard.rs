use tracing::warn;

use crate::analytics;
use crate::charts;
use crate::context::AppContext;
use crate::error::Result;

const PLACEHOLDER: &str = "—";

fn metric_value(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{v}{suffix}"),
        None => PLACEHOLDER.to_string(),
    }
}

fn metric(label: &str, value: &str) -> String {
    format!(
        "<div class=\"metric\"><div class=\"label\">{label}</div><div class=\"value\">{value}</div></div>\n"
    )
}

pub(super) fn render(ctx: &AppContext) -> Result<String> {
    let records = ctx.dataset.records();
    if records.is_empty() {
        warn!("dataset is empty; rendering placeholder metrics");
    }

    let summary = analytics::summarize(records);
    let pie = charts::completion_pie(&analytics::completion_distribution(records))?;
    let scatter = charts::score_time_scatter(&analytics::score_time_points(records))?;
    let chapters = charts::chapter_completion_bars(&analytics::chapter_completion(records))?;

    let metrics = [
        metric("Total Students", &summary.total_students.to_string()),
        metric("Completion Rate", &metric_value(summary.completion_rate, "%")),
        metric("Dropout Risk", &metric_value(summary.dropout_risk, "%")),
        metric("Avg Score", &metric_value(summary.avg_score, "")),
        metric("Avg Time Spent", &metric_value(summary.avg_time_spent, "")),
    ]
    .concat();

    Ok(format!(
        r#"<h1>Student Learning Analytics Dashboard</h1>
<div class="metrics">
{metrics}</div>
<hr>
<div class="row">
<div>{pie}</div>
<div>{scatter}</div>
</div>
<hr>
<h2>Chapter Wise Performance</h2>
<div>{chapters}</div>
"#
    ))
}
