use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{DeploymentImpl, routes};

pub fn router(deployment: DeploymentImpl) -> Router {
    let workboard_routes = Router::new()
        .merge(routes::teams::router())
        .merge(routes::members::router())
        .merge(routes::tickets::router(&deployment))
        .merge(routes::pull_requests::router())
        .merge(routes::dependencies::router())
        .merge(routes::aggregate::router());

    // The dashboard frontend is served from its own origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/workboard", workboard_routes)
        .nest("/api/reports", routes::reports::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(deployment)
}
