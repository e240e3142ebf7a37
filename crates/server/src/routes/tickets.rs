use axum::{
    Extension, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::get,
};
use db::{
    TransactionTrait,
    models::{
        dependency::Dependency,
        ticket::{CreateTicket, Ticket, TicketFilter, UpdateTicket},
    },
};
use serde::Serialize;
use utils_core::response::ApiResponse;

use crate::{
    DeploymentImpl, error::ApiError, extract::JsonBody, middleware::load_ticket_middleware,
};

#[derive(Debug, Serialize)]
pub struct TicketDependencies {
    pub outgoing: Vec<Dependency>,
    pub incoming: Vec<Dependency>,
}

pub async fn get_tickets(
    State(deployment): State<DeploymentImpl>,
    Query(filter): Query<TicketFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<Ticket>>>, ApiError> {
    let tickets = Ticket::find_filtered(&deployment.db().pool, &filter).await?;
    Ok(ResponseJson(ApiResponse::success(tickets)))
}

pub async fn get_ticket(
    Extension(ticket): Extension<Ticket>,
) -> Result<ResponseJson<ApiResponse<Ticket>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(ticket)))
}

pub async fn create_ticket(
    State(deployment): State<DeploymentImpl>,
    JsonBody(payload): JsonBody<CreateTicket>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Ticket>>), ApiError> {
    let tx = deployment.db().pool.begin().await?;
    let ticket = Ticket::create(&tx, &payload).await?;
    tx.commit().await?;

    tracing::info!(ticket_id = ticket.id, key = %ticket.key, "Created ticket");
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(ticket))))
}

/// Serves both PUT and PATCH; only the fields present in the body change.
pub async fn update_ticket(
    Extension(existing): Extension<Ticket>,
    State(deployment): State<DeploymentImpl>,
    JsonBody(payload): JsonBody<UpdateTicket>,
) -> Result<ResponseJson<ApiResponse<Ticket>>, ApiError> {
    let tx = deployment.db().pool.begin().await?;
    let ticket = Ticket::update(&tx, existing.id, &payload).await?;
    tx.commit().await?;

    Ok(ResponseJson(ApiResponse::success(ticket)))
}

pub async fn delete_ticket(
    Extension(existing): Extension<Ticket>,
    State(deployment): State<DeploymentImpl>,
) -> Result<StatusCode, ApiError> {
    let tx = deployment.db().pool.begin().await?;
    Ticket::delete(&tx, existing.id).await?;
    tx.commit().await?;

    tracing::info!(ticket_id = existing.id, key = %existing.key, "Deleted ticket");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_ticket_dependencies(
    Extension(ticket): Extension<Ticket>,
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<TicketDependencies>>, ApiError> {
    let pool = &deployment.db().pool;
    let outgoing = Dependency::find_outgoing(pool, ticket.id).await?;
    let incoming = Dependency::find_incoming(pool, ticket.id).await?;
    Ok(ResponseJson(ApiResponse::success(TicketDependencies {
        outgoing,
        incoming,
    })))
}

pub fn router(deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    let ticket_router = Router::new()
        .route(
            "/tickets/{ticket_id}/",
            get(get_ticket)
                .put(update_ticket)
                .patch(update_ticket)
                .delete(delete_ticket),
        )
        .route(
            "/tickets/{ticket_id}/dependencies/",
            get(get_ticket_dependencies),
        )
        .route_layer(from_fn_with_state(
            deployment.clone(),
            load_ticket_middleware::<DeploymentImpl>,
        ));

    Router::new()
        .route("/tickets/", get(get_tickets).post(create_ticket))
        .merge(ticket_router)
}
