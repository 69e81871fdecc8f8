use super::escape;
use crate::analytics;
use crate::charts;
use crate::context::AppContext;
use crate::error::Result;

const TABLE_HEADER: &str = "<tr><th>student_id</th><th>course_id</th><th>chapter</th><th>time_spent</th><th>score</th><th>completed</th></tr>";

pub(super) fn render(ctx: &AppContext, selected: Option<&str>) -> Result<String> {
    let students = ctx.dataset.student_ids();
    let selected = selected.or_else(|| students.first().copied());
    let rows = selected
        .map(|id| ctx.dataset.filter_by_student(id))
        .unwrap_or_default();

    let trend = analytics::student_trend(rows.iter().copied());
    let score_chart = charts::score_trend_line(&trend)?;
    let time_chart = charts::time_spent_bars(&trend)?;

    let options: String = students
        .iter()
        .map(|&id| {
            let mark = if Some(id) == selected { " selected" } else { "" };
            let id = escape(id);
            format!("<option value=\"{id}\"{mark}>{id}</option>\n")
        })
        .collect();

    let table_rows: String = rows
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&row.student_id),
                escape(&row.course_id),
                row.chapter,
                row.time_spent,
                row.score,
                u8::from(row.completed)
            )
        })
        .collect();

    Ok(format!(
        r#"<h1>Student Insights Explorer</h1>
<form method="get" action="/insights">
<label for="student">Select Student</label>
<select id="student" name="student" onchange="this.form.submit()">
{options}</select>
<noscript><button type="submit">Show</button></noscript>
</form>
<table>
{TABLE_HEADER}
{table_rows}</table>
<h2>Performance Trend</h2>
<div>{score_chart}</div>
<h2>Time Spent Trend</h2>
<div>{time_chart}</div>
"#
    ))
}
