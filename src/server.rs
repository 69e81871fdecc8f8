use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::analytics::{self, ChapterCompletion, CompletionDistribution, DashboardSummary, StudentTrend};
use crate::config::Config;
use crate::context::AppContext;
use crate::data::LearningRecord;
use crate::error::Result;
use crate::prediction::{self, PredictionInput};
use crate::views::{self, ViewState};

#[derive(Deserialize)]
struct InsightsQuery {
    student: Option<String>,
}

#[derive(Serialize)]
struct DashboardData {
    summary: DashboardSummary,
    distribution: CompletionDistribution,
    chapters: Vec<ChapterCompletion>,
}

#[derive(Serialize)]
struct StudentInsights<'a> {
    student_id: String,
    records: Vec<&'a LearningRecord>,
    trend: StudentTrend,
}

fn html_page(ctx: &AppContext, state: &ViewState) -> Result<HttpResponse> {
    let page = views::render(ctx, state)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page))
}

// Navigation: dashboard
async fn dashboard(ctx: web::Data<AppContext>) -> Result<HttpResponse> {
    html_page(&ctx, &ViewState::Dashboard)
}

// Navigation: prediction form with default inputs
async fn prediction_form(ctx: web::Data<AppContext>) -> Result<HttpResponse> {
    html_page(
        &ctx,
        &ViewState::Prediction {
            input: PredictionInput::default(),
            result: None,
        },
    )
}

// Form submission
async fn prediction_submit(
    ctx: web::Data<AppContext>,
    form: web::Form<PredictionInput>,
) -> Result<HttpResponse> {
    let input = form.into_inner();
    let outcome = input
        .validate()
        .and_then(|_| prediction::predict(ctx.model.as_ref(), &input));

    let status = match &outcome {
        Ok(_) => actix_web::http::StatusCode::OK,
        Err(err) => {
            error!(student_id = %input.student_id, "prediction failed: {err}");
            err.status_code()
        }
    };

    let state = ViewState::Prediction {
        input,
        result: Some(outcome.map_err(|err| err.to_string())),
    };
    let page = views::render(&ctx, &state)?;
    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(page))
}

// Selector change
async fn insights(
    ctx: web::Data<AppContext>,
    query: web::Query<InsightsQuery>,
) -> Result<HttpResponse> {
    html_page(
        &ctx,
        &ViewState::Insights {
            selected: query.into_inner().student,
        },
    )
}

async fn api_dashboard(ctx: web::Data<AppContext>) -> HttpResponse {
    let records = ctx.dataset.records();
    HttpResponse::Ok().json(DashboardData {
        summary: analytics::summarize(records),
        distribution: analytics::completion_distribution(records),
        chapters: analytics::chapter_completion(records),
    })
}

async fn api_predict(
    ctx: web::Data<AppContext>,
    req: web::Json<PredictionInput>,
) -> Result<HttpResponse> {
    req.validate()?;
    let outcome = prediction::predict(ctx.model.as_ref(), &req).map_err(|err| {
        error!(student_id = %req.student_id, "prediction failed: {err}");
        err
    })?;
    Ok(HttpResponse::Ok().json(outcome))
}

async fn api_predict_batch(ctx: web::Data<AppContext>) -> Result<HttpResponse> {
    let dataset = &ctx.dataset;
    let result = prediction::predict_batch(
        ctx.model.as_ref(),
        dataset.records(),
        &dataset.feature_matrix(),
    )?;
    Ok(HttpResponse::Ok().json(result))
}

async fn api_students(ctx: web::Data<AppContext>) -> HttpResponse {
    HttpResponse::Ok().json(ctx.dataset.student_ids())
}

async fn api_student(ctx: web::Data<AppContext>, path: web::Path<String>) -> HttpResponse {
    let student_id = path.into_inner();
    let records = ctx.dataset.filter_by_student(&student_id);
    let trend = analytics::student_trend(records.iter().copied());
    HttpResponse::Ok().json(StudentInsights {
        student_id,
        records,
        trend,
    })
}

async fn api_model(ctx: web::Data<AppContext>) -> HttpResponse {
    HttpResponse::Ok().json(ctx.model.describe())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("Learning dashboard is running!")
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(dashboard))
        .route("/dashboard", web::get().to(dashboard))
        .route("/prediction", web::get().to(prediction_form))
        .route("/prediction", web::post().to(prediction_submit))
        .route("/insights", web::get().to(insights))
        .route("/api/dashboard", web::get().to(api_dashboard))
        .route("/api/predict", web::post().to(api_predict))
        .route("/api/predict/batch", web::get().to(api_predict_batch))
        .route("/api/students", web::get().to(api_students))
        .route("/api/students/{student_id}", web::get().to(api_student))
        .route("/api/model", web::get().to(api_model))
        .route("/health", web::get().to(health_check));
}

pub async fn run(ctx: AppContext, config: &Config) -> std::io::Result<()> {
    let data = web::Data::new(ctx);
    let (host, port) = config.bind_addr();
    info!("Starting dashboard on http://{host}:{port}");

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(data.clone())
            .configure(configure)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    server.bind((host, port))?.run().await
}
