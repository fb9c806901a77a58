use crate::config::PaginationConfig;
use crate::errors::{DataAccessError, RelayError};
use crate::pagination::PageSize;
use crate::{ConnectionArgs, Page, PageWindow};
use async_trait::async_trait;
use tracing::debug;

/// A filtered and ordered base query that a connection can be windowed over.
///
/// `count` and `fetch` must both run against the same filters and ordering, otherwise the
/// page info and the returned rows can disagree.
#[async_trait]
pub trait OrderedQuery: Send + Sync {
    type Row: Send;

    /// True when the ordering ends in a unique tiebreaker, so every row has exactly one
    /// position. Tail-anchored and cursor-based windows are refused when this is false.
    fn is_totally_ordered(&self) -> bool;

    /// Number of rows the base query returns.
    async fn count(&self) -> Result<usize, DataAccessError>;

    /// `limit` rows of the base query starting at `offset`.
    async fn fetch(&self, offset: usize, limit: usize) -> Result<Vec<Self::Row>, DataAccessError>;
}

/// Turns connection arguments into an offset/limit slice and resolves it into a `Page`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionWindower {
    config: PaginationConfig,
}

impl ConnectionWindower {
    pub fn new(config: PaginationConfig) -> Self {
        ConnectionWindower { config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Checks everything that can be checked without knowing the row count.
    pub fn validate(&self, args: &ConnectionArgs, totally_ordered: bool) -> Result<(), RelayError> {
        args.page_size()?;

        if !totally_ordered && args.is_position_dependent() {
            return Err(RelayError::invalid_pagination(
                "`last`, `before` and `after` need an ordering with a unique tiebreaker",
            ));
        }

        if let (Some(after), Some(before)) = (args.after_offset()?, args.before_offset()?)
            && before.saturating_sub(after) <= 1
        {
            return Err(RelayError::invalid_pagination(
                "no rows lie between `after` and `before`",
            ));
        }

        Ok(())
    }

    /// Computes the slice of a result set of `total` rows selected by `args`.
    ///
    /// `after` and `before` are exclusive bounds. `first` counts forward from `after`, `last`
    /// counts back from `before`, and without either the default page size applies from
    /// `after`. Page flags look at the whole result set, not just the bounded window.
    pub fn compute_window(
        &self,
        args: &ConnectionArgs,
        total: usize,
        totally_ordered: bool,
    ) -> Result<PageWindow, RelayError> {
        self.validate(args, totally_ordered)?;

        let after = args.after_offset()?;
        let before = args.before_offset()?;

        let start = after.map_or(0, |after| after.saturating_add(1)).min(total);
        let end = before.map_or(total, |before| before.min(total)).max(start);
        let available = end - start;

        let (offset, limit) = match args.page_size()? {
            PageSize::First(first) => (start, first.min(self.config.max_page_size).min(available)),
            PageSize::Last(last) => {
                let limit = last.min(self.config.max_page_size).min(available);
                (end - limit, limit)
            }
            PageSize::Default => (start, self.config.default_page_size.min(available)),
        };

        let window = PageWindow {
            offset,
            limit,
            has_previous_page: offset > 0,
            has_next_page: offset + limit < total,
        };

        debug!(
            total,
            offset = window.offset,
            limit = window.limit,
            has_previous_page = window.has_previous_page,
            has_next_page = window.has_next_page,
            "Computed connection window"
        );

        Ok(window)
    }

    /// Counts the base query, computes the window and fetches its rows.
    pub async fn paginate<Q>(
        &self,
        query: &Q,
        args: &ConnectionArgs,
    ) -> Result<Page<Q::Row>, RelayError>
    where
        Q: OrderedQuery + ?Sized,
    {
        let totally_ordered = query.is_totally_ordered();
        self.validate(args, totally_ordered)?;

        let total = query.count().await?;
        let window = self.compute_window(args, total, totally_ordered)?;

        let rows = if window.limit == 0 {
            Vec::new()
        } else {
            query.fetch(window.offset, window.limit).await?
        };

        Ok(Page::from_window(rows, window, total))
    }

    /// Windows an already materialized list, e.g. the rows a relationship loader returned.
    pub fn slice<T>(&self, rows: Vec<T>, args: &ConnectionArgs) -> Result<Page<T>, RelayError> {
        let total = rows.len();
        let window = self.compute_window(args, total, true)?;
        let rows = rows
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .collect();
        Ok(Page::from_window(rows, window, total))
    }
}
