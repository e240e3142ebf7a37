use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use reports::{
    dashboard::{self, DashboardStats},
    risk::{self, RiskReport},
    standup::{self, DailyStandup},
    tone::{self, RewriteResult},
    weekly::{self, WeeklyReport},
};
use serde::Deserialize;
use utils_core::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError, extract::JsonBody};

/// A missing or `null` tone reads as client.
#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl RewriteRequest {
    fn tone(&self) -> &str {
        self.tone.as_deref().unwrap_or(DEFAULT_TONE)
    }
}

const DEFAULT_TONE: &str = "client";

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub async fn daily_standup(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<DailyStandup>>, ApiError> {
    let data = deployment.report_source().load().await?;
    tracing::info!(live = data.is_live(), "Generating daily standup");
    Ok(ResponseJson(ApiResponse::success(standup::build(&data))))
}

pub async fn weekly_client(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<WeeklyReport>>, ApiError> {
    let data = deployment.report_source().load().await?;
    tracing::info!(live = data.is_live(), "Generating weekly client report");
    Ok(ResponseJson(ApiResponse::success(weekly::build(
        &data,
        today(),
    ))))
}

pub async fn risk_analysis(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<RiskReport>>, ApiError> {
    let data = deployment.report_source().load().await?;
    let report = risk::analyze(&data, today());
    tracing::info!(
        live = data.is_live(),
        total = report.summary.total,
        "Generated risk analysis"
    );
    Ok(ResponseJson(ApiResponse::success(report)))
}

pub async fn rewrite(
    JsonBody(payload): JsonBody<RewriteRequest>,
) -> Result<ResponseJson<ApiResponse<RewriteResult>>, ApiError> {
    let result = tone::rewrite_summary(payload.tone(), payload.text.as_deref());
    Ok(ResponseJson(ApiResponse::success(result)))
}

pub async fn dashboard_stats(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<DashboardStats>>, ApiError> {
    let data = deployment.report_source().load().await?;
    Ok(ResponseJson(ApiResponse::success(dashboard::build(
        &data,
        today(),
    ))))
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new()
        .route("/daily-standup/", post(daily_standup))
        .route("/weekly-client/", post(weekly_client))
        .route("/risk-analysis/", post(risk_analysis))
        .route("/rewrite/", post(rewrite))
        .route("/dashboard/", get(dashboard_stats))
}
