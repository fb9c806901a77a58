use crate::db::Store;
use crate::schema::{Context, Schema, schema};
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use futures::future::join_all;
use juniper::http::{GraphQLBatchRequest, GraphQLBatchResponse, GraphQLRequest, GraphQLResponse};
use juniper_axum::extract::JuniperRequest;
use juniper_axum::graphiql;
use juniper_axum::response::JuniperResponse;
use juniper_relay_loaders::PaginationConfig;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    schema: Arc<Schema>,
    store: Arc<Store>,
    pagination: PaginationConfig,
}

/// `/graphql` accepts queries on POST and serves GraphiQL on GET.
pub fn app(store: Arc<Store>, pagination: PaginationConfig) -> Router {
    let state = AppState {
        schema: Arc::new(schema()),
        store,
        pagination,
    };

    Router::new()
        .route("/graphql", get(graphiql("/graphql", None)).post(graphql))
        .with_state(state)
}

async fn graphql(
    State(state): State<AppState>,
    JuniperRequest(request): JuniperRequest,
) -> JuniperResponse {
    let response = match request {
        GraphQLBatchRequest::Single(request) => {
            GraphQLBatchResponse::Single(execute(&state, &request).await)
        }
        GraphQLBatchRequest::Batch(requests) => {
            debug!(operations = requests.len(), "Executing batched request");
            GraphQLBatchResponse::Batch(
                join_all(requests.iter().map(|request| execute(&state, request))).await,
            )
        }
    };
    JuniperResponse(response)
}

/// Runs one operation with its own context, and therefore its own loaders.
async fn execute(state: &AppState, request: &GraphQLRequest) -> GraphQLResponse {
    let context = Context::new(state.store.clone(), state.pagination);
    request.execute(&*state.schema, &context).await
}
