//! GraphQL API over the todo document store.
//!
//! - `POST /graphql`: GraphQL over HTTP
//! - `GET /graphql`: GraphiQL page
//! - `GET /health`: liveness check
//!
//! Schema: query `todos`; mutations `add`, `toggle`, `toggleAll`, `destroy`,
//! `clearCompleted`, `save`.

pub mod resolvers;
pub mod schema;
pub mod types;

pub use schema::{build_schema, MutationRoot, QueryRoot, TodoSchema};

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::GraphQL;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Serialize;

pub const GRAPHQL_PATH: &str = "/graphql";

/// Builds the HTTP router around an assembled schema.
pub fn app(schema: TodoSchema) -> Router {
    Router::new()
        .route(
            GRAPHQL_PATH,
            get(graphiql).post_service(GraphQL::new(schema)),
        )
        .route("/health", get(health))
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthBody { status: "ok" }))
}
