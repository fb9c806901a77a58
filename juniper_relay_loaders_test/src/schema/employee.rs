use crate::db::{Record, StoreError};
use crate::schema::{
    Context, Department, EMPLOYEE_DEPARTMENT, EMPLOYEE_PROJECTS, EMPLOYEE_ROLE, Project, Role,
};
use juniper::graphql_object;
use juniper_relay_loaders::{RelayConnection, RelayError};

#[derive(RelayConnection, Debug, Eq, PartialEq, Clone)]
#[relay(context = Context)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub department_id: Option<i32>,
    pub role_id: Option<i32>,
}

impl TryFrom<&Record> for Employee {
    type Error = StoreError;

    fn try_from(row: &Record) -> Result<Self, Self::Error> {
        Ok(Employee {
            id: row.int("id")?,
            name: row.text("name")?.to_owned(),
            department_id: row.opt_int("department_id")?,
            role_id: row.opt_int("role_id")?,
        })
    }
}

#[graphql_object(context = Context)]
impl Employee {
    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn department(&self, ctx: &Context) -> Result<Option<Department>, RelayError> {
        let Some(department_id) = self.department_id else {
            return Ok(None);
        };
        let row = ctx
            .loaders
            .load_one(&EMPLOYEE_DEPARTMENT.key, department_id)
            .await?;
        Ok(row.as_ref().map(Department::try_from).transpose()?)
    }

    async fn role(&self, ctx: &Context) -> Result<Option<Role>, RelayError> {
        let Some(role_id) = self.role_id else {
            return Ok(None);
        };
        let row = ctx.loaders.load_one(&EMPLOYEE_ROLE.key, role_id).await?;
        Ok(row.as_ref().map(Role::try_from).transpose()?)
    }

    /// Projects through the `employee_projects` association table.
    async fn projects(&self, ctx: &Context) -> Result<Option<Vec<Project>>, RelayError> {
        let rows = ctx
            .loaders
            .load_many(&EMPLOYEE_PROJECTS.key, self.id)
            .await?;
        Ok(Some(
            rows.iter()
                .map(Project::try_from)
                .collect::<Result<_, _>>()?,
        ))
    }
}
