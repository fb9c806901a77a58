pub use crate::schema::department::{Department, DepartmentRelayConnection};
pub use crate::schema::editor::{Editor, EditorRelayConnection, EditorSort};
pub use crate::schema::employee::{Employee, EmployeeRelayConnection};
pub use crate::schema::project::Project;
pub use crate::schema::role::Role;
use crate::db::{Filter, SortKey, Store};
use juniper::{EmptyMutation, EmptySubscription, RootNode};
use juniper_relay_loaders::{
    Cardinality, ConnectionArgs, ConnectionWindower, JoinCondition, LoaderRegistry,
    PaginationConfig, RelationshipDescriptor, RelationshipKey, RelayConnection, RelayError,
};
use std::sync::Arc;

mod department;
mod editor;
mod employee;
mod project;
mod role;

// ---------- Relationships -------------

pub const DEPARTMENT_EMPLOYEES: RelationshipDescriptor = RelationshipDescriptor {
    key: RelationshipKey::new("Department", "Employee", "employees"),
    child_table: "employees",
    join: JoinCondition::ForeignKey {
        parent_column: "id",
        child_column: "department_id",
    },
    cardinality: Cardinality::ToMany,
    order_by: &["id"],
};

pub const ROLE_EMPLOYEES: RelationshipDescriptor = RelationshipDescriptor {
    key: RelationshipKey::new("Role", "Employee", "employees"),
    child_table: "employees",
    join: JoinCondition::ForeignKey {
        parent_column: "id",
        child_column: "role_id",
    },
    cardinality: Cardinality::ToMany,
    order_by: &["id"],
};

pub const EMPLOYEE_DEPARTMENT: RelationshipDescriptor = RelationshipDescriptor {
    key: RelationshipKey::new("Employee", "Department", "department"),
    child_table: "departments",
    join: JoinCondition::ForeignKey {
        parent_column: "department_id",
        child_column: "id",
    },
    cardinality: Cardinality::ToOne,
    order_by: &[],
};

pub const EMPLOYEE_ROLE: RelationshipDescriptor = RelationshipDescriptor {
    key: RelationshipKey::new("Employee", "Role", "role"),
    child_table: "roles",
    join: JoinCondition::ForeignKey {
        parent_column: "role_id",
        child_column: "id",
    },
    cardinality: Cardinality::ToOne,
    order_by: &[],
};

pub const EMPLOYEE_PROJECTS: RelationshipDescriptor = RelationshipDescriptor {
    key: RelationshipKey::new("Employee", "Project", "projects"),
    child_table: "projects",
    join: JoinCondition::Association {
        table: "employee_projects",
        parent_column: "id",
        association_parent_column: "employee_id",
        association_child_column: "project_id",
        child_column: "id",
    },
    cardinality: Cardinality::ToMany,
    order_by: &["id"],
};

pub const RELATIONSHIPS: &[RelationshipDescriptor] = &[
    DEPARTMENT_EMPLOYEES,
    ROLE_EMPLOYEES,
    EMPLOYEE_DEPARTMENT,
    EMPLOYEE_ROLE,
    EMPLOYEE_PROJECTS,
];

/// Entity types that get relationship loaders.
pub const ENTITY_TYPES: &[&str] = &["Editor", "Department", "Role", "Employee", "Project"];

// ---------- Context -------------

/// Per-operation context. Build a new one for every executed operation so loaders never batch
/// or cache across requests.
pub struct Context {
    pub store: Arc<Store>,
    pub loaders: LoaderRegistry<Store>,
    pub windower: ConnectionWindower,
}
impl juniper::Context for Context {}

impl Context {
    pub fn new(store: Arc<Store>, pagination: PaginationConfig) -> Self {
        Context {
            loaders: LoaderRegistry::new(store.clone(), RELATIONSHIPS, ENTITY_TYPES),
            windower: ConnectionWindower::new(pagination),
            store,
        }
    }
}

// --------- QueryRoot ------------

pub struct QueryRoot;

#[juniper::graphql_object(context = Context)]
impl QueryRoot {
    /// Editors, filtered by name and ordered by `sort` (`ID_ASC` when omitted). The id is always
    /// appended as a tiebreaker, so every argument combination is supported.
    async fn editors(
        first: Option<i32>,
        last: Option<i32>,
        before: Option<String>,
        after: Option<String>,
        name_ilike: Option<String>,
        sort: Option<Vec<EditorSort>>,
        ctx: &Context,
    ) -> Result<Option<EditorRelayConnection>, RelayError> {
        let mut query = ctx.store.table("editors");
        if let Some(pattern) = name_ilike {
            query = query.filter(Filter::ILike("name", pattern));
        }
        for key in sort.unwrap_or_else(|| vec![EditorSort::IdAsc]) {
            query = query.order_by(key.into());
        }
        let query = query.tiebreaker("id");

        let page = ctx
            .windower
            .paginate(&query, &ConnectionArgs::new(first, last, before, after))
            .await?;
        Ok(Some(EditorRelayConnection::from_page(
            page.try_map(|row| Editor::try_from(&row))?,
        )))
    }

    /// Editors in storage order. Without a stable ordering only `first` is accepted.
    async fn all_editors(
        first: Option<i32>,
        last: Option<i32>,
        before: Option<String>,
        after: Option<String>,
        ctx: &Context,
    ) -> Result<Option<EditorRelayConnection>, RelayError> {
        let query = ctx.store.table("editors");
        let page = ctx
            .windower
            .paginate(&query, &ConnectionArgs::new(first, last, before, after))
            .await?;
        Ok(Some(EditorRelayConnection::from_page(
            page.try_map(|row| Editor::try_from(&row))?,
        )))
    }

    /// Every department. Their `employees` are loaded with one query for the whole list.
    async fn departments(ctx: &Context) -> Result<Vec<Department>, RelayError> {
        let rows = ctx
            .store
            .table("departments")
            .order_by(SortKey::asc("id"))
            .all()?;
        Ok(rows
            .iter()
            .map(Department::try_from)
            .collect::<Result<_, _>>()?)
    }

    async fn roles(ctx: &Context) -> Result<Vec<Role>, RelayError> {
        let rows = ctx
            .store
            .table("roles")
            .order_by(SortKey::asc("id"))
            .all()?;
        Ok(rows.iter().map(Role::try_from).collect::<Result<_, _>>()?)
    }

    async fn employees(
        first: Option<i32>,
        last: Option<i32>,
        before: Option<String>,
        after: Option<String>,
        ctx: &Context,
    ) -> Result<Option<EmployeeRelayConnection>, RelayError> {
        let query = ctx.store.table("employees").tiebreaker("id");
        let page = ctx
            .windower
            .paginate(&query, &ConnectionArgs::new(first, last, before, after))
            .await?;
        Ok(Some(EmployeeRelayConnection::from_page(
            page.try_map(|row| Employee::try_from(&row))?,
        )))
    }
}

// ---------- Schema -------------

pub type Schema = RootNode<QueryRoot, EmptyMutation<Context>, EmptySubscription<Context>>;

pub fn schema() -> Schema {
    Schema::new(QueryRoot, EmptyMutation::new(), EmptySubscription::new())
}

#[cfg(test)]
mod tests {
    use super::{Context, ENTITY_TYPES, RELATIONSHIPS, schema};
    use crate::db::Store;
    use juniper::{Variables, graphql_value};
    use juniper_relay_loaders::PaginationConfig;
    use std::sync::Arc;

    #[test]
    fn test_every_relationship_gets_a_loader() {
        let context = Context::new(Arc::new(Store::new()), PaginationConfig::default());
        for descriptor in RELATIONSHIPS {
            assert!(ENTITY_TYPES.contains(&descriptor.key.parent_type));
            assert!(context.loaders.contains(&descriptor.key));
        }
    }

    #[test]
    fn test_sdl_has_connection_types() {
        let sdl = schema().as_sdl();
        assert!(sdl.contains("type EditorConnection"));
        assert!(sdl.contains("type EmployeeEdge"));
        assert!(sdl.contains("hasPreviousPage: Boolean!"));
        assert!(sdl.contains("nameIlike: String"));
    }

    #[tokio::test]
    async fn test_execute_with_fresh_context() {
        let store = Arc::new(Store::seeded());
        let context = Context::new(store, PaginationConfig::default());

        let (res, errors) = juniper::execute(
            "{ departments { name employees(first: 1) { totalCount edges { node { name } } } } }",
            None,
            &schema(),
            &Variables::new(),
            &context,
        )
        .await
        .unwrap();

        assert!(errors.is_empty());
        assert_eq!(
            res,
            graphql_value!({
                "departments": [
                    {"name": "Engineering", "employees": {"totalCount": 3, "edges": [{"node": {"name": "Peter"}}]}},
                    {"name": "Human Resources", "employees": {"totalCount": 1, "edges": [{"node": {"name": "Tracy"}}]}},
                    {"name": "Sales", "employees": {"totalCount": 0, "edges": []}},
                ]
            })
        );
    }
}
