use crate::config::LoaderOptions;
use crate::errors::RelayError;
use crate::loader::{BatchSession, RelationshipLoader};
use crate::relationships::{KeyValue, RelationshipDescriptor, RelationshipKey};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The relationship loaders of a single query execution.
///
/// Build one when a request starts and keep it in that request's Juniper context. Dropping the
/// context drops every loader with it, so batches and cached rows never cross requests.
pub struct LoaderRegistry<S: BatchSession> {
    session: Arc<S>,
    loaders: HashMap<RelationshipKey, RelationshipLoader<S>>,
}

impl<S: BatchSession> LoaderRegistry<S> {
    /// Creates one loader for every relationship whose parent type is in `entity_types`.
    pub fn new(
        session: Arc<S>,
        relationships: &[RelationshipDescriptor],
        entity_types: &[&str],
    ) -> Self {
        Self::with_options(session, relationships, entity_types, LoaderOptions::default())
    }

    pub fn with_options(
        session: Arc<S>,
        relationships: &[RelationshipDescriptor],
        entity_types: &[&str],
        options: LoaderOptions,
    ) -> Self {
        let loaders: HashMap<RelationshipKey, RelationshipLoader<S>> = relationships
            .iter()
            .filter(|descriptor| entity_types.contains(&descriptor.key.parent_type))
            .map(|descriptor| {
                (
                    descriptor.key,
                    RelationshipLoader::new(*descriptor, session.clone(), options),
                )
            })
            .collect();

        debug!(loaders = loaders.len(), "Built loader registry");

        LoaderRegistry { session, loaders }
    }

    /// The data-access session every loader in this registry reads through.
    pub fn session(&self) -> &Arc<S> {
        &self.session
    }

    pub fn loader(&self, key: &RelationshipKey) -> Result<&RelationshipLoader<S>, RelayError> {
        self.loaders
            .get(key)
            .ok_or(RelayError::UnknownRelationship(*key))
    }

    pub fn contains(&self, key: &RelationshipKey) -> bool {
        self.loaders.contains_key(key)
    }

    /// Shortcut for `loader(key)?.load(parent)`.
    pub async fn load_many(
        &self,
        key: &RelationshipKey,
        parent: impl Into<KeyValue>,
    ) -> Result<Vec<S::Row>, RelayError> {
        self.loader(key)?.load(parent.into()).await
    }

    /// Shortcut for `loader(key)?.load_one(parent)`.
    pub async fn load_one(
        &self,
        key: &RelationshipKey,
        parent: impl Into<KeyValue>,
    ) -> Result<Option<S::Row>, RelayError> {
        self.loader(key)?.load_one(parent.into()).await
    }
}
