//! HTML rendering for the three dashboard views.
//!
//! `render` is a pure function of the shared [`AppContext`] and the explicit
//! [`ViewState`] built by a handler. Only the selected view's body is computed.

mod dashboard;
mod insights;
mod prediction;

use crate::context::AppContext;
use crate::error::Result;
use crate::prediction::{PredictionInput, PredictionOutcome};

pub const APP_TITLE: &str = "Student Learning Analytics Dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Prediction,
    Insights,
}

impl View {
    pub const ALL: [View; 3] = [View::Dashboard, View::Prediction, View::Insights];

    pub fn path(self) -> &'static str {
        match self {
            View::Dashboard => "/dashboard",
            View::Prediction => "/prediction",
            View::Insights => "/insights",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Prediction => "Prediction",
            View::Insights => "Student Insights",
        }
    }
}

/// UI state for one render pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Dashboard,
    Prediction {
        input: PredictionInput,
        /// `None` until the form is submitted.
        result: Option<std::result::Result<PredictionOutcome, String>>,
    },
    Insights {
        selected: Option<String>,
    },
}

impl ViewState {
    pub fn view(&self) -> View {
        match self {
            ViewState::Dashboard => View::Dashboard,
            ViewState::Prediction { .. } => View::Prediction,
            ViewState::Insights { .. } => View::Insights,
        }
    }
}

pub fn render(ctx: &AppContext, state: &ViewState) -> Result<String> {
    let body = match state {
        ViewState::Dashboard => dashboard::render(ctx)?,
        ViewState::Prediction { input, result } => prediction::render(input, result.as_ref()),
        ViewState::Insights { selected } => insights::render(ctx, selected.as_deref())?,
    };
    Ok(layout(state.view(), &body))
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; margin: 0; display: flex; min-height: 100vh; }
    nav { width: 220px; background: #f0f2f6; padding: 20px; box-sizing: border-box; }
    nav h2 { font-size: 18px; }
    nav a { display: block; padding: 8px 10px; margin: 4px 0; border-radius: 4px; color: #262730; text-decoration: none; }
    nav a.active { background: #007bff; color: white; }
    nav .info { background: #d1ecf1; color: #0c5460; padding: 10px; border-radius: 5px; margin-top: 20px; font-size: 13px; }
    main { flex: 1; padding: 25px 40px; }
    .metrics { display: grid; grid-template-columns: repeat(5, 1fr); gap: 15px; }
    .metric { background: white; padding: 15px; border-radius: 8px; border-left: 4px solid #007bff; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
    .metric .label { color: #555; font-size: 14px; }
    .metric .value { font-size: 26px; margin-top: 6px; }
    .row { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; }
    .form-row { display: grid; grid-template-columns: repeat(5, 1fr); gap: 12px; }
    label { display: block; margin-bottom: 5px; font-weight: bold; }
    input, select { width: 100%; padding: 8px; border: 1px solid #ddd; border-radius: 4px; box-sizing: border-box; }
    button { background: #007bff; color: white; padding: 10px 22px; border: none; border-radius: 4px; cursor: pointer; margin-top: 15px; }
    .alert { margin: 12px 0; padding: 15px; border-radius: 5px; }
    .success { background: #d4edda; color: #155724; border: 1px solid #c3e6cb; }
    .error { background: #f8d7da; color: #721c24; border: 1px solid #f5c6cb; }
    .warning { background: #fff3cd; color: #856404; border: 1px solid #ffeaa7; }
    .info-box { background: #d1ecf1; color: #0c5460; border: 1px solid #bee5eb; }
    table { width: 100%; border-collapse: collapse; margin: 15px 0; }
    th, td { padding: 8px; text-align: left; border-bottom: 1px solid #ddd; }
    th { background: #f8f9fa; }
    svg { max-width: 100%; height: auto; }
"#;

fn layout(active: View, body: &str) -> String {
    let nav: String = View::ALL
        .iter()
        .map(|&view| {
            let class = if view == active { " class=\"active\"" } else { "" };
            format!("<a href=\"{}\"{class}>{}</a>\n", view.path(), view.title())
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{APP_TITLE}</title>
<style>{STYLE}</style>
</head>
<body>
<nav>
<h2>Navigation</h2>
{nav}<hr>
<div class="info">Built with Smart Learning AI System</div>
</nav>
<main>
{body}</main>
</body>
</html>
"#
    )
}
