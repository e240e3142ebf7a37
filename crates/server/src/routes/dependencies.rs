use axum::{
    Router, extract::State, http::StatusCode, response::Json as ResponseJson, routing::get,
};
use db::models::dependency::{CreateDependency, Dependency};
use utils_core::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError, extract::JsonBody};

pub async fn get_dependencies(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<Dependency>>>, ApiError> {
    let dependencies = Dependency::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(dependencies)))
}

pub async fn create_dependency(
    State(deployment): State<DeploymentImpl>,
    JsonBody(payload): JsonBody<CreateDependency>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Dependency>>), ApiError> {
    let dependency = Dependency::create(&deployment.db().pool, &payload).await?;
    tracing::debug!(
        ticket_id = dependency.ticket,
        depends_on_id = dependency.depends_on,
        "Created dependency"
    );
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(dependency)),
    ))
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new().route("/dependencies/", get(get_dependencies).post(create_dependency))
}
