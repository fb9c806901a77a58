//! A small in-memory relational store standing in for a real database.
//!
//! Every statement the store runs is rendered as SQL and recorded, so tests can assert how many
//! queries a GraphQL operation cost.

use async_trait::async_trait;
use juniper_relay_loaders::{
    BatchQuery, BatchSession, DataAccessError, JoinCondition, KeyValue, RelayError,
};
use parking_lot::{Mutex, RwLock};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

mod query;
mod seed;

pub use query::{Filter, SortKey, TableQuery};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("table `{0}` does not exist")]
    UnknownTable(String),

    #[error("column `{column}` is missing")]
    MissingColumn { column: String },

    #[error("column `{column}` is not {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
    },

    #[error("table `{0}` is unavailable")]
    Unavailable(String),
}

impl From<StoreError> for RelayError {
    fn from(error: StoreError) -> Self {
        RelayError::DataAccessFailure(DataAccessError::new(error))
    }
}

/// A single column value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
}

impl Value {
    /// The value as a loader key. `NULL` never matches anything.
    pub fn as_key(&self) -> Option<KeyValue> {
        match self {
            Value::Null => None,
            Value::Int(value) => Some(KeyValue::Int(*value)),
            Value::Text(value) => Some(KeyValue::Text(value.clone())),
        }
    }

    /// SQL-ish ordering: `NULL`s sort last, integers before text.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Int(_), Value::Text(_)) => Ordering::Less,
            (Value::Text(_), Value::Int(_)) => Ordering::Greater,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// One row: column name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    columns: BTreeMap<&'static str, Value>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    pub fn with(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.columns.insert(column, value.into());
        self
    }

    pub fn value(&self, column: &str) -> Result<&Value, StoreError> {
        self.columns
            .get(column)
            .ok_or_else(|| StoreError::MissingColumn {
                column: column.to_owned(),
            })
    }

    pub fn opt_int(&self, column: &str) -> Result<Option<i32>, StoreError> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::Int(value) => {
                i32::try_from(*value)
                    .map(Some)
                    .map_err(|_| StoreError::TypeMismatch {
                        column: column.to_owned(),
                        expected: "a 32-bit integer",
                    })
            }
            Value::Text(_) => Err(StoreError::TypeMismatch {
                column: column.to_owned(),
                expected: "an integer",
            }),
        }
    }

    pub fn int(&self, column: &str) -> Result<i32, StoreError> {
        self.opt_int(column)?.ok_or_else(|| StoreError::TypeMismatch {
            column: column.to_owned(),
            expected: "non-null",
        })
    }

    pub fn text(&self, column: &str) -> Result<&str, StoreError> {
        match self.value(column)? {
            Value::Text(value) => Ok(value),
            _ => Err(StoreError::TypeMismatch {
                column: column.to_owned(),
                expected: "text",
            }),
        }
    }

    /// Orders two rows by `columns`, ascending. Missing columns compare as `NULL`.
    fn cmp_by(&self, other: &Record, columns: &[&str]) -> Ordering {
        columns
            .iter()
            .map(|column| {
                let a = self.columns.get(*column).unwrap_or(&Value::Null);
                let b = other.columns.get(*column).unwrap_or(&Value::Null);
                a.sort_cmp(b)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// The in-memory database.
#[derive(Default)]
pub struct Store {
    tables: RwLock<HashMap<&'static str, Vec<Record>>>,
    statements: Mutex<Vec<String>>,
    unavailable: RwLock<HashSet<&'static str>>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    /// A store filled with the demo data set.
    pub fn seeded() -> Self {
        let store = Store::new();
        seed::populate(&store);
        store
    }

    pub fn create_table(&self, table: &'static str) {
        self.tables.write().entry(table).or_default();
    }

    pub fn insert(&self, table: &'static str, record: Record) {
        self.tables.write().entry(table).or_default().push(record);
    }

    /// Starts a query against `table`.
    pub fn table(self: &Arc<Self>, table: &'static str) -> TableQuery {
        TableQuery::new(self.clone(), table)
    }

    /// Every statement run so far, oldest first.
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().clone()
    }

    pub fn clear_statements(&self) {
        self.statements.lock().clear();
    }

    /// Makes every statement touching `table` fail until `restore` is called.
    pub fn make_unavailable(&self, table: &'static str) {
        self.unavailable.write().insert(table);
    }

    pub fn restore(&self, table: &str) {
        self.unavailable.write().remove(table);
    }

    /// Records `sql` and returns a snapshot of `table`'s rows. `joined` tables are only checked
    /// for availability.
    pub(crate) fn execute(
        &self,
        sql: String,
        table: &str,
        joined: &[&str],
    ) -> Result<Vec<Record>, StoreError> {
        trace!(%sql, "Executing statement");
        self.statements.lock().push(sql);

        let unavailable = self.unavailable.read();
        if let Some(name) = std::iter::once(table)
            .chain(joined.iter().copied())
            .find(|name| unavailable.contains(*name))
        {
            return Err(StoreError::Unavailable(name.to_owned()));
        }

        self.rows(table)
    }

    fn rows(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        self.tables
            .read()
            .get(table)
            .cloned()
            .ok_or_else(|| StoreError::UnknownTable(table.to_owned()))
    }

    fn fetch_grouped(&self, query: &BatchQuery) -> Result<Vec<(KeyValue, Record)>, StoreError> {
        let children = match query.join {
            JoinCondition::ForeignKey { .. } => {
                self.execute(query.to_sql(), query.child_table, &[])?
            }
            JoinCondition::Association { table, .. } => {
                self.execute(query.to_sql(), query.child_table, &[table])?
            }
        };

        let mut matched: Vec<(KeyValue, Record)> = match query.join {
            JoinCondition::ForeignKey { child_column, .. } => children
                .into_iter()
                .filter_map(|child| {
                    let key = child.value(child_column).ok()?.as_key()?;
                    query.keys.contains(&key).then_some((key, child))
                })
                .collect(),
            JoinCondition::Association {
                table,
                association_parent_column,
                association_child_column,
                child_column,
                ..
            } => {
                let links = self.rows(table)?;
                let mut matched = Vec::new();
                for link in &links {
                    let Some(key) = link.value(association_parent_column)?.as_key() else {
                        continue;
                    };
                    if !query.keys.contains(&key) {
                        continue;
                    }
                    let target = link.value(association_child_column)?;
                    matched.extend(
                        children
                            .iter()
                            .filter(|child| child.columns.get(child_column) == Some(target))
                            .map(|child| (key.clone(), child.clone())),
                    );
                }
                matched
            }
        };

        matched.sort_by(|(_, a), (_, b)| a.cmp_by(b, query.order_by));
        Ok(matched)
    }
}

#[async_trait]
impl BatchSession for Store {
    type Row = Record;

    async fn fetch_batch(
        &self,
        query: &BatchQuery,
    ) -> Result<Vec<(KeyValue, Record)>, DataAccessError> {
        self.fetch_grouped(query).map_err(DataAccessError::new)
    }
}
