use crate::errors::RelayError;
use crate::{Edge, decode_cursor, encode_cursor};
use juniper::GraphQLObject;

/// Represents the Relay spec pagination object
/// <https://relay.dev/docs/guides/graphql-server-specification/>
///
#[derive(Debug, Default, GraphQLObject, Eq, PartialEq, Clone)]
#[graphql(description = "Pagination information")]
pub struct PageInfo {
    /// Indicates whether there is a page following this current one
    #[graphql(description = "Indicates whether there is a page following this current one")]
    pub has_next_page: bool,

    /// Indicates whether there is a page preceding this one
    #[graphql(description = "Indicates whether there is a page preceding this one")]
    pub has_previous_page: bool,

    /// An opaque cursor that when passed to before: in a query will return the previous page of
    /// results.
    #[graphql(
        description = "An opaque cursor that when passed to before: in a query will return the previous page of results."
    )]
    pub start_cursor: Option<String>,

    /// An opaque cursor that when passed to after: in a query will return the following page of
    /// results.
    #[graphql(
        description = "An opaque cursor that when passed to after: in a query will return the following page of results."
    )]
    pub end_cursor: Option<String>,
}

/// The four Relay connection arguments, as they arrive in a resolver.
///
/// ```graphql
///  query {
///      editors(first: 10, after: "b2Zmc2V0fHw5") {
///          edges { node { name } }
///     }
///  }
/// ```
///
/// Cursors are kept as raw strings so a malformed one is reported on the field as
/// `INVALID_CURSOR` instead of failing input coercion for the whole operation.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct ConnectionArgs {
    pub first: Option<i32>,
    pub last: Option<i32>,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// `first`/`last` after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageSize {
    First(usize),
    Last(usize),
    Default,
}

impl ConnectionArgs {
    /// Helper method to build from the component parts from a query resolver
    pub fn new(
        first: Option<i32>,
        last: Option<i32>,
        before: Option<String>,
        after: Option<String>,
    ) -> Self {
        ConnectionArgs {
            first,
            last,
            before,
            after,
        }
    }

    pub fn first(first: i32) -> Self {
        ConnectionArgs {
            first: Some(first),
            ..Default::default()
        }
    }

    pub fn last(last: i32) -> Self {
        ConnectionArgs {
            last: Some(last),
            ..Default::default()
        }
    }

    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn with_before(mut self, before: impl Into<String>) -> Self {
        self.before = Some(before.into());
        self
    }

    /// Whether any argument needs a deterministic ordering to mean anything.
    pub(crate) fn is_position_dependent(&self) -> bool {
        self.last.is_some() || self.before.is_some() || self.after.is_some()
    }

    pub(crate) fn page_size(&self) -> Result<PageSize, RelayError> {
        match (self.first, self.last) {
            (Some(_), Some(_)) => Err(RelayError::invalid_pagination(
                "`first` and `last` cannot be combined",
            )),
            (Some(first), None) => usize::try_from(first)
                .map(PageSize::First)
                .map_err(|_| RelayError::invalid_pagination("`first` must not be negative")),
            (None, Some(last)) => usize::try_from(last)
                .map(PageSize::Last)
                .map_err(|_| RelayError::invalid_pagination("`last` must not be negative")),
            (None, None) => Ok(PageSize::Default),
        }
    }

    /// Offset the `after` cursor points at, if any.
    pub fn after_offset(&self) -> Result<Option<usize>, RelayError> {
        Ok(self.after.as_deref().map(decode_cursor).transpose()?)
    }

    /// Offset the `before` cursor points at, if any.
    pub fn before_offset(&self) -> Result<Option<usize>, RelayError> {
        Ok(self.before.as_deref().map(decode_cursor).transpose()?)
    }
}

/// Concrete slice of an ordered result set: `limit` rows starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

/// One resolved connection: the edges of the window, its `PageInfo`, and the row count of the
/// whole base query.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    pub total_count: usize,
}

impl<T> Page<T> {
    /// Pairs the rows fetched for `window` with their cursors.
    pub fn from_window(rows: Vec<T>, window: PageWindow, total_count: usize) -> Self {
        let edges: Vec<Edge<T>> = rows
            .into_iter()
            .enumerate()
            .map(|(idx, node)| Edge::new(node, encode_cursor(window.offset + idx)))
            .collect();

        let page_info = PageInfo {
            has_next_page: window.has_next_page,
            has_previous_page: window.has_previous_page,
            start_cursor: edges.first().map(|edge| edge.cursor.clone()),
            end_cursor: edges.last().map(|edge| edge.cursor.clone()),
        };

        Page {
            edges,
            page_info,
            total_count,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    /// Converts every node, keeping cursors and page info.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            edges: self
                .edges
                .into_iter()
                .map(|edge| Edge::new(f(edge.node), edge.cursor))
                .collect(),
            page_info: self.page_info,
            total_count: self.total_count,
        }
    }

    /// Like `map`, stopping at the first failed conversion.
    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        let edges = self
            .edges
            .into_iter()
            .map(|edge| Ok(Edge::new(f(edge.node)?, edge.cursor)))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Page {
            edges,
            page_info: self.page_info,
            total_count: self.total_count,
        })
    }
}
