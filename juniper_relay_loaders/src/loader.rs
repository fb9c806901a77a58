//! Batched relationship loading.
//!
//! Every `load` call enqueues its parent key into the loader's pending batch and then yields
//! once to the executor. Resolvers that run before that yield returns (all the sibling list
//! items Juniper is polling at the same time) land in the same batch. The first caller to come
//! back from the yield takes the batch, runs one grouped query for all of its keys and hands each
//! caller its slice of the rows.

use crate::config::LoaderOptions;
use crate::errors::{DataAccessError, RelayError};
use crate::relationships::{
    BatchQuery, Cardinality, KeyValue, RelationshipDescriptor, RelationshipKey,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// The data-access session the loaders of one request share.
#[async_trait]
pub trait BatchSession: Send + Sync + 'static {
    /// Row type the session produces.
    type Row: Clone + Send + Sync + 'static;

    /// Executes one grouped query. Every returned row is paired with the key in `query.keys`
    /// it matched; keys without rows are simply absent.
    async fn fetch_batch(
        &self,
        query: &BatchQuery,
    ) -> Result<Vec<(KeyValue, Self::Row)>, DataAccessError>;
}

type Waiter<R> = oneshot::Sender<Result<Vec<R>, RelayError>>;

struct LoaderState<R> {
    /// Bumped every time a batch is taken, so late callers can tell theirs already fired.
    generation: u64,
    pending: BTreeMap<KeyValue, Vec<Waiter<R>>>,
    cache: HashMap<KeyValue, Vec<R>>,
}

/// Batches lookups for one relationship within one request.
pub struct RelationshipLoader<S: BatchSession> {
    descriptor: RelationshipDescriptor,
    session: Arc<S>,
    options: LoaderOptions,
    state: Mutex<LoaderState<S::Row>>,
}

impl<S: BatchSession> RelationshipLoader<S> {
    pub fn new(descriptor: RelationshipDescriptor, session: Arc<S>, options: LoaderOptions) -> Self {
        RelationshipLoader {
            descriptor,
            session,
            options,
            state: Mutex::new(LoaderState {
                generation: 0,
                pending: BTreeMap::new(),
                cache: HashMap::new(),
            }),
        }
    }

    pub fn key(&self) -> RelationshipKey {
        self.descriptor.key
    }

    pub fn descriptor(&self) -> &RelationshipDescriptor {
        &self.descriptor
    }

    /// All children of `parent`. A parent without children gets an empty `Vec`.
    pub async fn load(&self, parent: KeyValue) -> Result<Vec<S::Row>, RelayError> {
        let (receiver, generation) = {
            let mut state = self.state.lock();
            if self.options.cache
                && let Some(rows) = state.cache.get(&parent)
            {
                return Ok(rows.clone());
            }

            let (sender, receiver) = oneshot::channel();
            state.pending.entry(parent).or_default().push(sender);
            (receiver, state.generation)
        };

        tokio::task::yield_now().await;
        self.dispatch(generation).await;

        receiver
            .await
            .unwrap_or_else(|_| Err(RelayError::Cancelled(self.key())))
    }

    /// The single child of `parent`, for to-one relationships.
    ///
    /// Fails with `InvalidRelationshipUse` on a to-many relationship and with
    /// `CardinalityViolation` when the parent matched more than one row.
    pub async fn load_one(&self, parent: KeyValue) -> Result<Option<S::Row>, RelayError> {
        if self.descriptor.cardinality == Cardinality::ToMany {
            return Err(RelayError::InvalidRelationshipUse(self.key()));
        }

        let rows = self.load(parent.clone()).await?;
        if rows.len() > 1 {
            warn!(
                relationship = %self.key(),
                %parent,
                rows = rows.len(),
                "To-one relationship matched several rows"
            );
            return Err(RelayError::CardinalityViolation {
                relationship: self.key(),
                parent,
                rows: rows.len(),
            });
        }
        Ok(rows.into_iter().next())
    }

    /// Fires the batch opened in `generation` unless another caller already did.
    async fn dispatch(&self, generation: u64) {
        let mut pending = {
            let mut state = self.state.lock();
            if state.generation != generation {
                return;
            }
            state.generation += 1;
            std::mem::take(&mut state.pending)
        };

        pending.retain(|_, waiters| {
            waiters.retain(|waiter| !waiter.is_closed());
            !waiters.is_empty()
        });
        if pending.is_empty() {
            return;
        }

        let query = self.descriptor.batch_query(pending.keys().cloned().collect());
        debug!(
            relationship = %self.key(),
            parent_column = self.descriptor.join.parent_column(),
            parent_count = query.keys.len(),
            "Batch loading {} for {} parents",
            self.key().child_type,
            query.keys.len()
        );

        match self.session.fetch_batch(&query).await {
            Ok(rows) => {
                let total_loaded = rows.len();
                let mut grouped: HashMap<KeyValue, Vec<S::Row>> = HashMap::new();
                for (key, row) in rows {
                    grouped.entry(key).or_default().push(row);
                }

                for (key, waiters) in pending {
                    let rows = grouped.remove(&key).unwrap_or_default();
                    for waiter in waiters {
                        // The receiver may have been dropped; nothing left to tell it.
                        let _ = waiter.send(Ok(rows.clone()));
                    }
                    if self.options.cache {
                        self.state.lock().cache.insert(key, rows);
                    }
                }

                debug!(
                    relationship = %self.key(),
                    total_loaded,
                    "Batch load complete"
                );
            }
            Err(source) => {
                warn!(
                    relationship = %self.key(),
                    error = %source,
                    "Batch load failed"
                );
                let error = RelayError::BatchFetchFailure {
                    relationship: self.key(),
                    source,
                };
                for waiter in pending.into_values().flatten() {
                    let _ = waiter.send(Err(error.clone()));
                }
            }
        }
    }
}
