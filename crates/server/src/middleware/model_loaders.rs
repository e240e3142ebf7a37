use std::{fmt::Display, future::Future};

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use db::{DBService, models::ticket::Ticket};

use crate::DeploymentImpl;

pub trait ModelLoaderDeps {
    fn db_service(&self) -> &DBService;
}

impl ModelLoaderDeps for DeploymentImpl {
    fn db_service(&self) -> &DBService {
        self.db()
    }
}

async fn fetch_model_or_status<M, E, Fut>(
    model_name: &'static str,
    model_id: i64,
    load_future: Fut,
) -> Result<M, StatusCode>
where
    E: Display,
    Fut: Future<Output = Result<Option<M>, E>>,
{
    match load_future.await {
        Ok(Some(model)) => Ok(model),
        Ok(None) => {
            tracing::warn!("{model_name} {model_id} not found");
            Err(StatusCode::NOT_FOUND)
        }
        Err(error) => {
            tracing::error!("Failed to fetch {model_name} {model_id}: {error}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Looks up `{ticket_id}` and inserts the hydrated [`Ticket`] as a request extension.
pub async fn load_ticket_middleware<S>(
    State(deployment): State<S>,
    Path(ticket_id): Path<i64>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode>
where
    S: ModelLoaderDeps,
{
    let ticket = fetch_model_or_status(
        "Ticket",
        ticket_id,
        Ticket::find_by_id(&deployment.db_service().pool, ticket_id),
    )
    .await?;
    request.extensions_mut().insert(ticket);
    Ok(next.run(request).await)
}
