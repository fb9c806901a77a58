#![allow(dead_code)]

use axum_test::TestServer;
use juniper_relay_loaders::PaginationConfig;
use juniper_relay_loaders_test::db::Store;
use juniper_relay_loaders_test::server;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse {
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub path: Vec<Value>,
    #[serde(default)]
    pub extensions: Value,
}

impl GraphQLError {
    pub fn code(&self) -> Option<&str> {
        self.extensions.get("code")?.as_str()
    }
}

pub struct TestApp {
    pub store: Arc<Store>,
    pub server: TestServer,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_pagination(PaginationConfig::default())
    }

    pub fn with_pagination(pagination: PaginationConfig) -> Self {
        let store = Arc::new(Store::seeded());
        let server = TestServer::new(server::app(store.clone(), pagination)).unwrap();
        TestApp { store, server }
    }

    pub async fn query(&self, query: &str) -> GraphQLResponse {
        self.server
            .post("/graphql")
            .json(&json!({ "query": query }))
            .await
            .json::<GraphQLResponse>()
    }

    /// Grouped relationship queries run so far.
    pub fn batch_statements(&self) -> Vec<String> {
        self.store
            .statements()
            .into_iter()
            .filter(|sql| sql.contains("__batch_key"))
            .collect()
    }
}

pub fn names(connection: &Value) -> Vec<String> {
    connection["edges"]
        .as_array()
        .map(|edges| {
            edges
                .iter()
                .filter_map(|edge| edge["node"]["name"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}
