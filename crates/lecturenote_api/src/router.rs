//! HTTP routing for the GraphQL endpoint.
//!
//! # Responsibility
//! - Serve GraphQL over `POST /api/graphql` and GraphiQL on `GET`.
//! - Expose a liveness probe at `/health`.

use crate::schema::NotesSchema;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use log::debug;
use serde_json::json;

pub const GRAPHQL_PATH: &str = "/api/graphql";
pub const HEALTH_PATH: &str = "/health";

/// Builds the application router around a ready schema.
pub fn router(schema: NotesSchema) -> Router {
    Router::new()
        .route(GRAPHQL_PATH, get(graphiql).post(graphql_handler))
        .route(HEALTH_PATH, get(health))
        .with_state(schema)
}

async fn graphql_handler(State(schema): State<NotesSchema>, req: GraphQLRequest) -> GraphQLResponse {
    let request = req.into_inner();
    debug!(
        "event=graphql_request module=api status=start operation={}",
        request.operation_name.as_deref().unwrap_or("-")
    );
    schema.execute(request).await.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": lecturenote_core::core_version(),
    }))
}
