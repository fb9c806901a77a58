use crate::db::{Record, StoreError};
use crate::schema::Context;
use juniper::GraphQLObject;

#[derive(GraphQLObject, Debug, Eq, PartialEq, Clone)]
#[graphql(context = Context)]
pub struct Project {
    pub id: i32,
    pub name: String,
}

impl TryFrom<&Record> for Project {
    type Error = StoreError;

    fn try_from(row: &Record) -> Result<Self, Self::Error> {
        Ok(Project {
            id: row.int("id")?,
            name: row.text("name")?.to_owned(),
        })
    }
}
