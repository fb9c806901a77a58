use crate::db::{Record, StoreError};
use crate::schema::{Context, DEPARTMENT_EMPLOYEES, Employee, EmployeeRelayConnection};
use juniper::graphql_object;
use juniper_relay_loaders::{ConnectionArgs, RelayConnection, RelayError};

#[derive(RelayConnection, Debug, Eq, PartialEq, Clone)]
#[relay(context = Context)]
pub struct Department {
    pub id: i32,
    pub name: String,
}

impl TryFrom<&Record> for Department {
    type Error = StoreError;

    fn try_from(row: &Record) -> Result<Self, Self::Error> {
        Ok(Department {
            id: row.int("id")?,
            name: row.text("name")?.to_owned(),
        })
    }
}

#[graphql_object(context = Context)]
impl Department {
    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// Employees of this department. Loaded together with the employees of every other
    /// department in the response, then windowed per department.
    async fn employees(
        &self,
        first: Option<i32>,
        last: Option<i32>,
        before: Option<String>,
        after: Option<String>,
        ctx: &Context,
    ) -> Result<Option<EmployeeRelayConnection>, RelayError> {
        let args = ConnectionArgs::new(first, last, before, after);
        ctx.windower.validate(&args, true)?;

        let rows = ctx
            .loaders
            .load_many(&DEPARTMENT_EMPLOYEES.key, self.id)
            .await?;
        let employees = rows
            .iter()
            .map(Employee::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(EmployeeRelayConnection::from_page(
            ctx.windower.slice(employees, &args)?,
        )))
    }
}
