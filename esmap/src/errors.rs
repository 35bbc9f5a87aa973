use thiserror::Error;

/// Errors raised while deriving a schema or resolving field paths against it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Unknown configuration key, invalid value, or a conflicting combination of options.
    #[error("invalid mapping option {key}={value}")]
    InvalidOption { key: String, value: String },

    /// A logical path segment has no counterpart in the schema.
    #[error("no mapping for field `{segment}` (path `{path}`)")]
    UnresolvedField { segment: String, path: String },

    /// An object/nested field whose type does not reduce to a record.
    #[error("field `{field}` is mapped as an object but `{type_name}` is not a record type")]
    MalformedRecordType { field: String, type_name: String },

    /// A record type that contains itself, directly or transitively.
    #[error("record `{record}` nests itself through field `{field}`")]
    RecursiveRecord { record: String, field: String },
}

impl MappingError {
    pub fn invalid_option(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn unresolved(segment: impl Into<String>, path: impl Into<String>) -> Self {
        Self::UnresolvedField {
            segment: segment.into(),
            path: path.into(),
        }
    }
}

/// A best-effort value paired with the first error hit while producing it.
///
/// Schema construction keeps going after a bad field so callers can still inspect (or
/// serialize) everything that was derived; `into_result` turns it back into a plain
/// `Result` when the partial value is not wanted.
#[derive(Debug, Clone)]
pub struct Partial<T> {
    value: T,
    error: Option<MappingError>,
}

impl<T> Partial<T> {
    pub fn ok(value: T) -> Self {
        Self { value, error: None }
    }

    pub fn with_error(value: T, error: Option<MappingError>) -> Self {
        Self { value, error }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn error(&self) -> Option<&MappingError> {
        self.error.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_parts(self) -> (T, Option<MappingError>) {
        (self.value, self.error)
    }

    /// Discards the error, keeping whatever was built.
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_result(self) -> Result<T, MappingError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Partial<U> {
        Partial {
            value: f(self.value),
            error: self.error,
        }
    }

    /// Records `error` unless an earlier one is already held.
    pub(crate) fn record(&mut self, error: Option<MappingError>) {
        if self.error.is_none() {
            self.error = error;
        }
    }

    pub(crate) fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

/// Errors from the index lifecycle helpers in [`crate::store`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// The search service rejected or failed the request.
    #[error("search backend error: {message}")]
    Backend { message: String },

    #[error("index name must not be empty")]
    MissingIndexName,

    #[error("creating index {index} was not acknowledged - {body}")]
    NotAcknowledged { index: String, body: String },

    #[error("serializing index definition failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
