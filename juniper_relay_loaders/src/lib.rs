//! Library to serve relational data through Relay style GraphQL connections with Juniper, without
//! falling into the N+1 query problem.
//!
//! It provides two pieces that are meant to be used together:
//!
//! - a **connection windower** that turns `first`/`last`/`before`/`after` into an offset/limit
//!   slice of an ordered base query and builds the `PageInfo` for it, and
//! - **relationship loaders** that collect every "children of parent X" lookup issued while one
//!   query is being resolved and answer them with one grouped query per relationship.
//!
//! # Connections and Edges
//!
//! Define your normal entity struct (the `node` in Relay parlance) and then use the
//! `#[derive(RelayConnection)]` macro to generate the `Connection` and `Edge` structs, wired into
//! the `GraphQLObject` etc macros.
//!
//! ```rust
//! use juniper::GraphQLObject;
//! use juniper_relay_loaders::RelayConnection;
//!
//! #[derive(Debug, GraphQLObject, RelayConnection, Clone)]
//! pub struct Editor {
//!     pub id: i32,
//!     pub name: String,
//! }
//! ```
//!
//! With the following types generated for the GraphQL schema:
//!
//! ```graphql
//! type EditorConnection {
//!     totalCount: Int!
//!     edges: [EditorEdge!]!
//!     pageInfo: PageInfo!
//! }
//!
//! type EditorEdge {
//!     node: Editor!
//!     cursor: String!
//! }
//! ```
//!
//! **Notes**:
//! - The structs have `RelayConnection` and `RelayEdge` as the suffix to help avoid collisions
//!   with your code.
//! - GraphQL types have `Connection` and `Edge` as the suffix to conform to the spec.
//! - If the node is a `graphql_object` with a context, pass it along with
//!   `#[relay(context = MyContext)]`.
//!
//! # Pagination
//!
//! Implement `OrderedQuery` for your base query (filters and sort applied, ending in a unique
//! tiebreaker such as the primary key) and hand it to a `ConnectionWindower`:
//!
//! ```nocompile
//! async fn editors(first: Option<i32>, last: Option<i32>, before: Option<String>, after: Option<String>, ctx: &Context)
//!     -> Result<EditorRelayConnection, RelayError>
//! {
//!     let query = ctx.store.editors().order_by("name").tiebreaker("id");
//!     let page = ctx.windower
//!         .paginate(&query, &ConnectionArgs::new(first, last, before, after))
//!         .await?;
//!     Ok(EditorRelayConnection::from_page(page.try_map(Editor::try_from)?))
//! }
//! ```
//!
//! The windower counts the base query, decides the slice, fetches it and mints a cursor for every
//! edge. `after` and `before` are exclusive; `first` counts forward from `after`, `last` counts
//! back from `before`. Without either, `PaginationConfig::default_page_size` applies.
//!
//! Cursors are opaque offsets and are only meaningful under the ordering they were minted with.
//! For that reason `last`, `before` and `after` are refused on a query that reports it is not
//! totally ordered.
//!
//! # Relationship loaders
//!
//! Declare your relationships up front as `RelationshipDescriptor`s, implement `BatchSession`
//! for your data access session, and build a `LoaderRegistry` for every request:
//!
//! ```nocompile
//! const EMPLOYEES: RelationshipDescriptor = RelationshipDescriptor {
//!     key: RelationshipKey::new("Department", "Employee", "employees"),
//!     child_table: "employees",
//!     join: JoinCondition::ForeignKey { parent_column: "id", child_column: "department_id" },
//!     cardinality: Cardinality::ToMany,
//!     order_by: &["id"],
//! };
//!
//! let loaders = LoaderRegistry::new(session.clone(), &[EMPLOYEES], &["Department", "Employee"]);
//!
//! // In the Department.employees resolver:
//! let rows = ctx.loaders.load_many(&EMPLOYEES.key, self.id).await?;
//! ```
//!
//! Every department resolved in the same pass shares one
//! `SELECT ... FROM employees c WHERE c.department_id IN (?, ?, ...)`.
//!
//! # Errors
//!
//! Everything fails with `RelayError`, which implements Juniper's `IntoFieldError`. Errors are
//! attached to the field that failed with an `extensions.code`, and the rest of the response
//! still resolves.
//!
//! # Example App
//!
//! You can see the library in action in the example app in `/juniper_relay_loaders_test`.
//!
//! This app is also what's used for the integration tests, so it should be a strong representation
//! of the capabilities of the library.
//!

extern crate self as juniper_relay_loaders;

mod config;
mod connections;
mod cursor_errors;
mod cursors;
mod edges;
mod errors;
mod loader;
mod pagination;
mod registry;
mod relationships;
mod windower;

// From other crates in the workspace:
pub use juniper_relay_loaders_codegen::RelayConnection;

// From this crate:
pub use config::*;
pub use connections::*;
pub use cursor_errors::*;
pub use cursors::*;
pub use edges::*;
pub use errors::*;
pub use loader::*;
pub use pagination::*;
pub use registry::*;
pub use relationships::*;
pub use windower::*;
