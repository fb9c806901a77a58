use super::{Record, Store, StoreError, Value};
use async_trait::async_trait;
use juniper_relay_loaders::{DataAccessError, OrderedQuery};
use std::cmp::Ordering;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq(&'static str, Value),

    /// Case-insensitive match anywhere in the column. `%` matches any run of characters.
    ILike(&'static str, String),
}

impl Filter {
    fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::Eq(column, expected) => record.value(column).is_ok_and(|v| v == expected),
            Filter::ILike(column, pattern) => record
                .text(column)
                .is_ok_and(|text| ilike(&text.to_lowercase(), &pattern.to_lowercase())),
        }
    }

    fn to_sql(&self) -> String {
        match self {
            Filter::Eq(column, _) => format!("{column} = ?"),
            Filter::ILike(column, _) => format!("{column} ILIKE ?"),
        }
    }
}

fn ilike(text: &str, pattern: &str) -> bool {
    let mut rest = text;
    for part in pattern.split('%').filter(|part| !part.is_empty()) {
        match rest.find(part) {
            Some(idx) => rest = &rest[idx + part.len()..],
            None => return false,
        }
    }
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: &'static str,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(column: &'static str) -> Self {
        SortKey {
            column,
            descending: false,
        }
    }

    pub fn desc(column: &'static str) -> Self {
        SortKey {
            column,
            descending: true,
        }
    }
}

/// A filtered, sorted `SELECT` over one table, windowable as a connection.
#[derive(Clone)]
pub struct TableQuery {
    store: Arc<Store>,
    table: &'static str,
    filters: Vec<Filter>,
    sort: Vec<SortKey>,
    tiebreaker: Option<&'static str>,
}

impl TableQuery {
    pub(crate) fn new(store: Arc<Store>, table: &'static str) -> Self {
        TableQuery {
            store,
            table,
            filters: Vec::new(),
            sort: Vec::new(),
            tiebreaker: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    /// Appends a unique column to the ordering so every row has a fixed position.
    pub fn tiebreaker(mut self, column: &'static str) -> Self {
        self.tiebreaker = Some(column);
        self
    }

    pub fn to_sql(&self) -> String {
        let mut sql = format!("SELECT * FROM {}", self.table);
        if !self.filters.is_empty() {
            let conditions: Vec<String> = self.filters.iter().map(Filter::to_sql).collect();
            sql.push_str(&format!(" WHERE {}", conditions.join(" AND ")));
        }

        let mut order: Vec<String> = self
            .sort
            .iter()
            .map(|key| {
                let direction = if key.descending { "DESC" } else { "ASC" };
                format!("{} {direction}", key.column)
            })
            .collect();
        if let Some(tiebreaker) = self.tiebreaker {
            order.push(format!("{tiebreaker} ASC"));
        }
        if !order.is_empty() {
            sql.push_str(&format!(" ORDER BY {}", order.join(", ")));
        }
        sql
    }

    /// Every matching row, unwindowed.
    pub fn all(&self) -> Result<Vec<Record>, StoreError> {
        self.run(self.to_sql())
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let tiebreaker = self.tiebreaker.map(SortKey::asc);
        self.sort
            .iter()
            .chain(tiebreaker.iter())
            .map(|key| {
                let a = a.value(key.column).unwrap_or(&Value::Null);
                let b = b.value(key.column).unwrap_or(&Value::Null);
                let ordering = a.sort_cmp(b);
                if key.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    fn run(&self, sql: String) -> Result<Vec<Record>, StoreError> {
        let mut rows = self.store.execute(sql, self.table, &[])?;
        rows.retain(|row| self.filters.iter().all(|filter| filter.matches(row)));
        rows.sort_by(|a, b| self.compare(a, b));
        Ok(rows)
    }
}

#[async_trait]
impl OrderedQuery for TableQuery {
    type Row = Record;

    fn is_totally_ordered(&self) -> bool {
        self.tiebreaker.is_some()
    }

    async fn count(&self) -> Result<usize, DataAccessError> {
        let sql = format!("SELECT COUNT(*) FROM ({})", self.to_sql());
        self.run(sql)
            .map(|rows| rows.len())
            .map_err(DataAccessError::new)
    }

    async fn fetch(&self, offset: usize, limit: usize) -> Result<Vec<Record>, DataAccessError> {
        let sql = format!("{} LIMIT {limit} OFFSET {offset}", self.to_sql());
        self.run(sql)
            .map(|rows| rows.into_iter().skip(offset).take(limit).collect())
            .map_err(DataAccessError::new)
    }
}
