use crate::db::{Record, SortKey, StoreError};
use juniper::{GraphQLEnum, GraphQLObject};
use juniper_relay_loaders::RelayConnection;

/// GraphQL type for an editor.
#[derive(GraphQLObject, RelayConnection, Debug, Eq, PartialEq, Clone)]
pub struct Editor {
    pub id: i32,
    pub name: String,
}

impl TryFrom<&Record> for Editor {
    type Error = StoreError;

    fn try_from(row: &Record) -> Result<Self, Self::Error> {
        Ok(Editor {
            id: row.int("id")?,
            name: row.text("name")?.to_owned(),
        })
    }
}

#[derive(GraphQLEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorSort {
    IdAsc,
    IdDesc,
    NameAsc,
    NameDesc,
}

impl From<EditorSort> for SortKey {
    fn from(sort: EditorSort) -> Self {
        match sort {
            EditorSort::IdAsc => SortKey::asc("id"),
            EditorSort::IdDesc => SortKey::desc("id"),
            EditorSort::NameAsc => SortKey::asc("name"),
            EditorSort::NameDesc => SortKey::desc("name"),
        }
    }
}
