/// Page size limits applied by the `ConnectionWindower`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Rows returned when neither `first` nor `last` is given.
    pub default_page_size: usize,

    /// Upper bound for `first`/`last`; larger requests are truncated to it.
    pub max_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        PaginationConfig {
            default_page_size: 100,
            max_page_size: 1000,
        }
    }
}

/// Behaviour switches for a `RelationshipLoader`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Keep each key's rows for the rest of the request so repeated lookups skip the store.
    pub cache: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions { cache: true }
    }
}
