use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// The broad class an [ErrorKind] belongs to.
///
/// Callers branch on the class rather than on individual kinds:
///
/// * [ErrorClass::Usage] - the caller passed an argument of the wrong shape,
///   e.g. a scalar where a document was expected or a document where a key
///   was expected. These are programming mistakes and are never retried.
/// * [ErrorClass::Validity] - a well-typed document failed domain validation
///   (missing or unusable `id`). These are expected, recoverable conditions.
/// * [ErrorClass::Operational] - everything else: closed stores, missing
///   collections, backend failures.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorClass {
    Usage,
    Validity,
    Operational,
}

/// Error kinds for persist operations.
///
/// # Examples
///
/// ```rust
/// use persist::errors::{ErrorClass, ErrorKind, PersistError, PersistResult};
///
/// fn example() -> PersistResult<()> {
///     Err(PersistError::new("Document has no id field", ErrorKind::MissingId))
/// }
///
/// let err = example().unwrap_err();
/// assert_eq!(err.kind().class(), ErrorClass::Validity);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Usage errors
    /// A value of the wrong variant was supplied, or a native value could not
    /// be mapped to any [crate::common::Value] variant
    TypeMismatch,
    /// A key argument is not a string or integer
    InvalidKey,
    /// A collection name is empty or reserved
    InvalidName,

    // Validity errors
    /// The document has no `id` field
    MissingId,
    /// The document `id` is negative or of an unsupported type
    InvalidId,

    // Operational errors
    /// Collection does not exist
    CollectionNotFound,
    /// The store has already been closed
    StoreClosed,
    /// The operation is not valid in the current state
    InvalidOperation,
    /// Error from the storage backend
    BackendError,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl ErrorKind {
    /// Returns the [ErrorClass] of this kind.
    pub fn class(&self) -> ErrorClass {
        match self {
            ErrorKind::TypeMismatch | ErrorKind::InvalidKey | ErrorKind::InvalidName => {
                ErrorClass::Usage
            }
            ErrorKind::MissingId | ErrorKind::InvalidId => ErrorClass::Validity,
            ErrorKind::CollectionNotFound
            | ErrorKind::StoreClosed
            | ErrorKind::InvalidOperation
            | ErrorKind::BackendError
            | ErrorKind::InternalError => ErrorClass::Operational,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::TypeMismatch => write!(f, "Type mismatch"),
            ErrorKind::InvalidKey => write!(f, "Invalid key"),
            ErrorKind::InvalidName => write!(f, "Invalid name"),
            ErrorKind::MissingId => write!(f, "Missing id"),
            ErrorKind::InvalidId => write!(f, "Invalid id"),
            ErrorKind::CollectionNotFound => write!(f, "Collection not found"),
            ErrorKind::StoreClosed => write!(f, "Store closed"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type for every fallible persist operation.
///
/// `PersistError` carries a message, an [ErrorKind], an optional cause and the
/// backtrace captured where it was created.
///
/// # Examples
///
/// ```rust
/// use persist::errors::{ErrorKind, PersistError};
///
/// let cause = PersistError::new("map is closed", ErrorKind::InvalidOperation);
/// let err = PersistError::new_with_cause("Failed to write", ErrorKind::BackendError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct PersistError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<PersistError>>,
    backtrace: Atomic<Backtrace>,
}

impl PersistError {
    /// Creates a new `PersistError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        PersistError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `PersistError` wrapping the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: PersistError) -> Self {
        PersistError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&PersistError> {
        self.cause.as_deref()
    }

    /// True when the caller passed an argument of the wrong type or shape.
    pub fn is_usage_error(&self) -> bool {
        self.error_kind.class() == ErrorClass::Usage
    }

    /// True when a document failed domain validation.
    pub fn is_validity_error(&self) -> bool {
        self.error_kind.class() == ErrorClass::Validity
    }
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// Shorthand for `Result<T, PersistError>`.
pub type PersistResult<T> = Result<T, PersistError>;

impl From<std::fmt::Error> for PersistError {
    fn from(err: std::fmt::Error) -> Self {
        PersistError::new(
            &format!("Formatting error: {}", err),
            ErrorKind::InternalError,
        )
    }
}

impl From<String> for PersistError {
    fn from(msg: String) -> Self {
        PersistError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for PersistError {
    fn from(msg: &str) -> Self {
        PersistError::new(msg, ErrorKind::InternalError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_error_new_creates_error() {
        let error = PersistError::new("An error occurred", ErrorKind::BackendError);
        assert_eq!(error.message(), "An error occurred");
        assert_eq!(error.kind(), &ErrorKind::BackendError);
        assert!(error.cause().is_none());
    }

    #[test]
    fn persist_error_new_with_cause_creates_error() {
        let cause = PersistError::new("map closed", ErrorKind::InvalidOperation);
        let error = PersistError::new_with_cause("write failed", ErrorKind::BackendError, cause);
        assert_eq!(error.message(), "write failed");
        assert_eq!(error.cause().map(|c| c.kind().clone()), Some(ErrorKind::InvalidOperation));
        assert!(error.source().is_some());
    }

    #[test]
    fn debug_includes_cause_chain() {
        let cause = PersistError::new("inner", ErrorKind::InternalError);
        let error = PersistError::new_with_cause("outer", ErrorKind::BackendError, cause);
        let debug = format!("{:?}", error);
        assert!(debug.starts_with("outer"));
        assert!(debug.contains("Caused by: inner"));
    }

    #[test]
    fn display_is_message_only() {
        let error = PersistError::new("Document has no id field", ErrorKind::MissingId);
        assert_eq!(error.to_string(), "Document has no id field");
    }

    #[test]
    fn kinds_map_to_classes() {
        assert_eq!(ErrorKind::TypeMismatch.class(), ErrorClass::Usage);
        assert_eq!(ErrorKind::InvalidKey.class(), ErrorClass::Usage);
        assert_eq!(ErrorKind::InvalidName.class(), ErrorClass::Usage);
        assert_eq!(ErrorKind::MissingId.class(), ErrorClass::Validity);
        assert_eq!(ErrorKind::InvalidId.class(), ErrorClass::Validity);
        assert_eq!(ErrorKind::StoreClosed.class(), ErrorClass::Operational);
        assert_eq!(ErrorKind::CollectionNotFound.class(), ErrorClass::Operational);
    }

    #[test]
    fn usage_and_validity_predicates_are_disjoint() {
        let usage = PersistError::new("not a dictionary", ErrorKind::TypeMismatch);
        assert!(usage.is_usage_error());
        assert!(!usage.is_validity_error());

        let validity = PersistError::new("negative id", ErrorKind::InvalidId);
        assert!(validity.is_validity_error());
        assert!(!validity.is_usage_error());

        let other = PersistError::new("closed", ErrorKind::StoreClosed);
        assert!(!other.is_usage_error());
        assert!(!other.is_validity_error());
    }

    #[test]
    fn from_string_is_internal() {
        let error: PersistError = "boom".into();
        assert_eq!(error.kind(), &ErrorKind::InternalError);
        let error: PersistError = String::from("boom").into();
        assert_eq!(error.message(), "boom");
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::MissingId.to_string(), "Missing id");
        assert_eq!(ErrorKind::TypeMismatch.to_string(), "Type mismatch");
    }
}
