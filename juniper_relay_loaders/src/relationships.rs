use std::fmt::{Display, Formatter};

/// Identifies one relationship loader: (parent type, child type, relationship name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationshipKey {
    pub parent_type: &'static str,
    pub child_type: &'static str,
    pub name: &'static str,
}

impl RelationshipKey {
    pub const fn new(
        parent_type: &'static str,
        child_type: &'static str,
        name: &'static str,
    ) -> Self {
        RelationshipKey {
            parent_type,
            child_type,
            name,
        }
    }
}

impl Display for RelationshipKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{} -> {}", self.parent_type, self.name, self.child_type)
    }
}

/// Whether a parent has at most one related row or any number of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ToOne,
    ToMany,
}

/// How child rows are matched to the parent key handed to the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinCondition {
    /// `child.child_column = parent.parent_column`.
    ///
    /// Covers both one-to-many (the foreign key lives on the child) and many-to-one (the parent
    /// passes its own foreign key value and `child_column` is the child's primary key).
    ForeignKey {
        parent_column: &'static str,
        child_column: &'static str,
    },

    /// Many-to-many through an association table:
    /// `parent.parent_column = link.association_parent_column` and
    /// `link.association_child_column = child.child_column`.
    Association {
        table: &'static str,
        parent_column: &'static str,
        association_parent_column: &'static str,
        association_child_column: &'static str,
        child_column: &'static str,
    },
}

impl JoinCondition {
    /// Column on the parent whose value is used as the loader key.
    pub fn parent_column(&self) -> &'static str {
        match *self {
            JoinCondition::ForeignKey { parent_column, .. } => parent_column,
            JoinCondition::Association { parent_column, .. } => parent_column,
        }
    }
}

/// Relationship metadata for one edge of the schema, declared up front instead of being
/// discovered from the ORM at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipDescriptor {
    pub key: RelationshipKey,
    /// Table the child rows live in.
    pub child_table: &'static str,
    pub join: JoinCondition,
    pub cardinality: Cardinality,
    /// Columns of the child table the grouped query orders by, ascending. The per-parent slices
    /// keep this order.
    pub order_by: &'static [&'static str],
}

impl RelationshipDescriptor {
    /// Builds the grouped query for one batch of distinct parent keys.
    pub fn batch_query(&self, keys: Vec<KeyValue>) -> BatchQuery {
        BatchQuery {
            relationship: self.key,
            child_table: self.child_table,
            join: self.join,
            order_by: self.order_by,
            keys,
        }
    }
}

/// Value of a parent key column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyValue {
    Int(i64),
    Text(String),
}

impl Display for KeyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyValue::Int(value) => write!(f, "{value}"),
            KeyValue::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<i32> for KeyValue {
    fn from(value: i32) -> Self {
        KeyValue::Int(value.into())
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        KeyValue::Int(value)
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        KeyValue::Text(value)
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        KeyValue::Text(value.to_owned())
    }
}

/// One grouped query: all children of `relationship` whose join column is in `keys`.
///
/// Sessions are expected to execute this as a single statement and tag every returned row with
/// the key it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchQuery {
    pub relationship: RelationshipKey,
    pub child_table: &'static str,
    pub join: JoinCondition,
    pub order_by: &'static [&'static str],
    /// Distinct parent keys, in ascending order.
    pub keys: Vec<KeyValue>,
}

impl BatchQuery {
    /// Alias the matched key is selected under by `to_sql`.
    pub const KEY_ALIAS: &'static str = "__batch_key";

    /// Renders the query with one positional `?` placeholder per key.
    pub fn to_sql(&self) -> String {
        let placeholders = vec!["?"; self.keys.len()].join(", ");
        let order_by = if self.order_by.is_empty() {
            String::new()
        } else {
            let columns: Vec<String> = self
                .order_by
                .iter()
                .map(|column| format!("c.{column}"))
                .collect();
            format!(" ORDER BY {}", columns.join(", "))
        };

        match self.join {
            JoinCondition::ForeignKey { child_column, .. } => format!(
                "SELECT c.*, c.{child_column} AS {alias} FROM {table} c WHERE c.{child_column} IN ({placeholders}){order_by}",
                alias = Self::KEY_ALIAS,
                table = self.child_table,
            ),
            JoinCondition::Association {
                table,
                association_parent_column,
                association_child_column,
                child_column,
                ..
            } => format!(
                "SELECT c.*, a.{association_parent_column} AS {alias} FROM {child} c JOIN {table} a ON a.{association_child_column} = c.{child_column} WHERE a.{association_parent_column} IN ({placeholders}){order_by}",
                alias = Self::KEY_ALIAS,
                child = self.child_table,
            ),
        }
    }
}
