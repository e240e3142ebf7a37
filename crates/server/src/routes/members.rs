use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{delete, get},
};
use db::{
    TransactionTrait,
    models::member::{CreateMember, Member},
};
use utils_core::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError, extract::JsonBody};

pub async fn get_members(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<Member>>>, ApiError> {
    let members = Member::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(members)))
}

pub async fn create_member(
    State(deployment): State<DeploymentImpl>,
    JsonBody(payload): JsonBody<CreateMember>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Member>>), ApiError> {
    let member = Member::create(&deployment.db().pool, &payload).await?;
    tracing::debug!(member_id = member.id, "Created member");
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(member))))
}

/// Tickets and pull requests that referenced the member keep existing without it.
pub async fn delete_member(
    State(deployment): State<DeploymentImpl>,
    Path(member_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let tx = deployment.db().pool.begin().await?;
    let rows_affected = Member::delete(&tx, member_id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new()
        .route("/members/", get(get_members).post(create_member))
        .route("/members/{member_id}/", delete(delete_member))
}
