use crate::cursor_errors::CursorError;
use crate::relationships::{KeyValue, RelationshipKey};
use juniper::{FieldError, IntoFieldError, Object, ScalarValue, Value};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by the backing store.
///
/// Wrapped in an `Arc` so one failed grouped query can be handed to every caller that was
/// waiting on it.
#[derive(Clone)]
pub struct DataAccessError(Arc<dyn Error + Send + Sync>);

impl DataAccessError {
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        DataAccessError(Arc::new(error))
    }

    /// The store's own error.
    pub fn inner(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

impl Display for DataAccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Debug for DataAccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DataAccessError").field(&self.0).finish()
    }
}

impl Error for DataAccessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.0.as_ref())
    }
}

/// Every way a connection or relationship field can fail.
///
/// All of these are attached to the field being resolved; sibling fields keep resolving.
/// Nothing here is retried.
#[derive(Debug, Clone, Error)]
pub enum RelayError {
    /// Conflicting or out of range `first`/`last`/`before`/`after`.
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    /// An `after`/`before` cursor that could not be decoded.
    #[error("invalid cursor: {0}")]
    InvalidCursor(#[from] CursorError),

    /// The grouped query for a relationship failed. Every caller in the batch gets this.
    #[error("loading {relationship} failed: {source}")]
    BatchFetchFailure {
        relationship: RelationshipKey,
        source: DataAccessError,
    },

    /// The backing store failed outside of a relationship batch.
    #[error("data access failed: {0}")]
    DataAccessFailure(DataAccessError),

    /// No loader was registered for this relationship in the current request.
    #[error("no loader registered for {0}")]
    UnknownRelationship(RelationshipKey),

    /// `load_one` was called on a to-many relationship.
    #[error("{0} is to-many and has to be loaded as a list")]
    InvalidRelationshipUse(RelationshipKey),

    /// A to-one relationship matched more than one row for a parent.
    #[error("{relationship} is to-one but matched {rows} rows for parent {parent}")]
    CardinalityViolation {
        relationship: RelationshipKey,
        parent: KeyValue,
        rows: usize,
    },

    /// The batch this caller was waiting on was dropped before it resolved.
    #[error("loading {0} was cancelled")]
    Cancelled(RelationshipKey),
}

impl RelayError {
    pub fn invalid_pagination(message: impl Into<String>) -> Self {
        RelayError::InvalidPagination(message.into())
    }

    /// Machine readable code placed in the GraphQL error's `extensions`.
    pub fn code(&self) -> &'static str {
        match self {
            RelayError::InvalidPagination(_) => "INVALID_PAGINATION",
            RelayError::InvalidCursor(_) => "INVALID_CURSOR",
            RelayError::BatchFetchFailure { .. } => "BATCH_FETCH_FAILURE",
            RelayError::DataAccessFailure(_) => "DATA_ACCESS_FAILURE",
            RelayError::UnknownRelationship(_) => "UNKNOWN_RELATIONSHIP",
            RelayError::InvalidRelationshipUse(_) => "INVALID_RELATIONSHIP_USE",
            RelayError::CardinalityViolation { .. } => "CARDINALITY_VIOLATION",
            RelayError::Cancelled(_) => "CANCELLED",
        }
    }
}

impl From<DataAccessError> for RelayError {
    fn from(error: DataAccessError) -> Self {
        RelayError::DataAccessFailure(error)
    }
}

impl<S: ScalarValue> IntoFieldError<S> for RelayError {
    fn into_field_error(self) -> FieldError<S> {
        let mut extensions = Object::with_capacity(1);
        extensions.add_field("code", Value::scalar(self.code().to_owned()));
        FieldError::new(self, Value::Object(extensions))
    }
}

#[cfg(test)]
mod tests {
    use crate::{CursorError, DataAccessError, KeyValue, RelationshipKey, RelayError};
    use juniper::{DefaultScalarValue, IntoFieldError};
    use std::io;

    #[test]
    fn test_field_error_carries_code() {
        let error: juniper::FieldError<DefaultScalarValue> =
            RelayError::invalid_pagination("first and last are mutually exclusive")
                .into_field_error();

        assert_eq!(
            error.message(),
            "invalid pagination: first and last are mutually exclusive"
        );
        let code = error
            .extensions()
            .as_object_value()
            .and_then(|o| o.get_field_value("code"))
            .and_then(|v| v.as_scalar())
            .map(|s| s.to_string());
        assert_eq!(code.as_deref(), Some("INVALID_PAGINATION"));
    }

    #[test]
    fn test_cursor_errors_convert() {
        let error: RelayError = CursorError::InvalidCursor.into();
        assert_eq!(error.code(), "INVALID_CURSOR");
    }

    #[test]
    fn test_batch_failure_message_names_relationship() {
        let error = RelayError::BatchFetchFailure {
            relationship: RelationshipKey::new("Department", "Employee", "employees"),
            source: DataAccessError::new(io::Error::other("connection reset")),
        };
        assert_eq!(
            error.to_string(),
            "loading Department.employees -> Employee failed: connection reset"
        );
    }

    #[test]
    fn test_cardinality_errors_have_codes() {
        let players = RelationshipKey::new("Team", "Player", "players");
        let team = RelationshipKey::new("Player", "Team", "team");

        assert_eq!(
            RelayError::InvalidRelationshipUse(players).code(),
            "INVALID_RELATIONSHIP_USE"
        );
        let violation = RelayError::CardinalityViolation {
            relationship: team,
            parent: KeyValue::from(7),
            rows: 2,
        };
        assert_eq!(violation.code(), "CARDINALITY_VIOLATION");
        assert_eq!(
            violation.to_string(),
            "Player.team -> Team is to-one but matched 2 rows for parent 7"
        );
    }
}
