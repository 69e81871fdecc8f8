use super::escape;
use crate::prediction::{
    PredictionInput, PredictionOutcome, Recommendation, Verdict, CHAPTER_RANGE, INPUT_STEP,
    SCORE_RANGE, TIME_SPENT_RANGE,
};

const REQUIREMENTS: &str = r#"
<h3>Input Requirements</h3>
<p>The prediction model expects inputs similar to the training dataset:</p>
<ul>
  <li><strong>Student ID</strong> (new student allowed)</li>
  <li><strong>Course ID</strong></li>
  <li><strong>Chapter Order</strong></li>
  <li><strong>Time Spent</strong></li>
  <li><strong>Score</strong></li>
</ul>
<p><em>Completion status is NOT required here because this page predicts it.</em></p>
"#;

fn form(input: &PredictionInput) -> String {
    format!(
        r#"<p>Enter student learning details below:</p>
<form method="post" action="/prediction">
<div class="form-row">
<div><label for="student_id">Student ID</label><input type="text" id="student_id" name="student_id" value="{student_id}"></div>
<div><label for="course_id">Course ID</label><input type="text" id="course_id" name="course_id" value="{course_id}"></div>
<div><label for="chapter">Chapter Order</label><input type="number" id="chapter" name="chapter" min="{chapter_min}" max="{chapter_max}" step="1" value="{chapter}" required></div>
<div><label for="time_spent">Time Spent</label><input type="number" id="time_spent" name="time_spent" min="{time_min:.1}" max="{time_max:.1}" step="{INPUT_STEP}" value="{time_spent:.1}" required></div>
<div><label for="score">Score</label><input type="number" id="score" name="score" min="{score_min:.1}" max="{score_max:.1}" step="{INPUT_STEP}" value="{score:.1}" required></div>
</div>
<button type="submit">Predict</button>
</form>
"#,
        student_id = escape(&input.student_id),
        course_id = escape(&input.course_id),
        chapter_min = CHAPTER_RANGE.start(),
        chapter_max = CHAPTER_RANGE.end(),
        chapter = input.chapter,
        time_min = TIME_SPENT_RANGE.start(),
        time_max = TIME_SPENT_RANGE.end(),
        time_spent = input.time_spent,
        score_min = SCORE_RANGE.start(),
        score_max = SCORE_RANGE.end(),
        score = input.score,
    )
}

fn recommendation_block(recommendation: Recommendation) -> String {
    let class = match recommendation {
        Recommendation::NeedsSupport => "warning",
        Recommendation::PerformingWell => "success",
    };
    let actions = recommendation.actions();
    let list = if actions.is_empty() {
        String::new()
    } else {
        let items: String = actions
            .iter()
            .map(|action| format!("<li>{action}</li>\n"))
            .collect();
        format!("<ul>\n{items}</ul>\n")
    };
    format!(
        "<div class=\"alert {class}\">\n<p>{}</p>\n{list}</div>\n",
        recommendation.headline()
    )
}

fn outcome(outcome: &PredictionOutcome) -> String {
    let verdict_class = match outcome.verdict {
        Verdict::LikelyToComplete => "success",
        Verdict::AtRisk => "error",
    };
    format!(
        r#"<h3>Prediction Details</h3>
<div class="alert info-box"><strong>Student ID:</strong> {} | <strong>Course ID:</strong> {}</div>
<div class="alert {verdict_class}">{}</div>
<h3>Recommendation</h3>
{}"#,
        escape(&outcome.student_id),
        escape(&outcome.course_id),
        outcome.verdict.message(outcome.completion_probability),
        recommendation_block(outcome.recommendation)
    )
}

pub(super) fn render(
    input: &PredictionInput,
    result: Option<&std::result::Result<PredictionOutcome, String>>,
) -> String {
    let mut html = String::from("<h1>Student Completion Prediction</h1>\n");
    html.push_str(REQUIREMENTS);
    html.push_str(&form(input));

    match result {
        Some(Ok(o)) => html.push_str(&outcome(o)),
        Some(Err(message)) => html.push_str(&format!(
            "<div class=\"alert error\">Prediction failed: {}</div>\n",
            escape(message)
        )),
        None => {}
    }

    html
}
