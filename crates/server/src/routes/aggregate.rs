use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use reports::{
    Snapshot,
    views::{self, Aggregate, TicketStatusDump},
};
use utils_core::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

pub async fn get_aggregate(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Aggregate>>, ApiError> {
    let snapshot = Snapshot::load(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(views::aggregate(&snapshot))))
}

pub async fn get_ticket_statuses(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<TicketStatusDump>>>, ApiError> {
    let snapshot = Snapshot::load(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(views::ticket_statuses(
        &snapshot,
    ))))
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new()
        .route("/aggregate/", get(get_aggregate))
        .route("/debug/ticket_statuses/", get(get_ticket_statuses))
}
