use axum::{
    Router, extract::State, http::StatusCode, response::Json as ResponseJson, routing::get,
};
use db::{
    TransactionTrait,
    models::pull_request::{CreatePullRequest, PullRequest},
};
use utils_core::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError, extract::JsonBody};

pub async fn get_pull_requests(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<PullRequest>>>, ApiError> {
    let prs = PullRequest::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(prs)))
}

pub async fn create_pull_request(
    State(deployment): State<DeploymentImpl>,
    JsonBody(payload): JsonBody<CreatePullRequest>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<PullRequest>>), ApiError> {
    let tx = deployment.db().pool.begin().await?;
    let pr = PullRequest::create(&tx, &payload).await?;
    tx.commit().await?;
    tracing::debug!(pr_id = pr.id, "Created pull request");
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(pr))))
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new().route("/prs/", get(get_pull_requests).post(create_pull_request))
}
