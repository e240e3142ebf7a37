use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{delete, get},
};
use db::{
    TransactionTrait,
    models::team::{CreateTeam, Team},
};
use utils_core::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError, extract::JsonBody};

pub async fn get_teams(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<Team>>>, ApiError> {
    let teams = Team::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(teams)))
}

pub async fn create_team(
    State(deployment): State<DeploymentImpl>,
    JsonBody(payload): JsonBody<CreateTeam>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Team>>), ApiError> {
    let team = Team::create(&deployment.db().pool, &payload).await?;
    tracing::debug!(team_id = team.id, "Created team");
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(team))))
}

pub async fn delete_team(
    State(deployment): State<DeploymentImpl>,
    Path(team_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let tx = deployment.db().pool.begin().await?;
    let rows_affected = Team::delete(&tx, team_id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Team not found".to_string()));
    }
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new()
        .route("/teams/", get(get_teams).post(create_team))
        .route("/teams/{team_id}/", delete(delete_team))
}
