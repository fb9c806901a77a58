use crate::db::{Record, StoreError};
use crate::schema::{Context, Employee, ROLE_EMPLOYEES};
use juniper::graphql_object;
use juniper_relay_loaders::RelayError;

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Role {
    pub id: i32,
    pub name: String,
}

impl TryFrom<&Record> for Role {
    type Error = StoreError;

    fn try_from(row: &Record) -> Result<Self, Self::Error> {
        Ok(Role {
            id: row.int("id")?,
            name: row.text("name")?.to_owned(),
        })
    }
}

#[graphql_object(context = Context)]
impl Role {
    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// Everyone holding this role, as a plain list.
    async fn employees(&self, ctx: &Context) -> Result<Option<Vec<Employee>>, RelayError> {
        let rows = ctx.loaders.load_many(&ROLE_EMPLOYEES.key, self.id).await?;
        Ok(Some(
            rows.iter()
                .map(Employee::try_from)
                .collect::<Result<_, _>>()?,
        ))
    }
}
