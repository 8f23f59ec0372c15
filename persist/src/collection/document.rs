use crate::common::{Dictionary, FieldNames, Value, DOC_ID};
use crate::errors::{ErrorKind, PersistError, PersistResult};
use std::fmt::{Debug, Display, Formatter};

/// The identifier of a stored document.
///
/// Only strings and 64-bit integers can identify a document. Identifiers are
/// compared by exact variant and value, so `Int64(5)` and `UInt64(5)` name two
/// different documents. Ordering groups identifiers by variant (signed, then
/// unsigned, then strings) and orders by value inside each group.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DocumentId {
    Int64(i64),
    UInt64(u64),
    String(String),
}

impl DocumentId {
    /// Interprets `value` as a lookup key.
    ///
    /// Any string or integer is a valid key, including negative integers,
    /// which simply never match a stored document.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::InvalidKey] when `value` is not a string or an
    /// integer.
    pub fn from_key(value: Value) -> PersistResult<DocumentId> {
        match value {
            Value::String(v) => Ok(DocumentId::String(v)),
            Value::Int64(v) => Ok(DocumentId::Int64(v)),
            Value::UInt64(v) => Ok(DocumentId::UInt64(v)),
            other => {
                log::error!("A {} cannot be used as a document key", other.type_name());
                Err(PersistError::new(
                    &format!("A {} cannot be used as a document key", other.type_name()),
                    ErrorKind::InvalidKey,
                ))
            }
        }
    }

    /// Interprets the `id` field of a document.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::InvalidId] when `value` is a negative integer or
    /// not a string or integer at all.
    pub(crate) fn from_field(value: &Value) -> PersistResult<DocumentId> {
        match value {
            Value::String(v) => Ok(DocumentId::String(v.clone())),
            Value::UInt64(v) => Ok(DocumentId::UInt64(*v)),
            Value::Int64(v) if *v >= 0 => Ok(DocumentId::Int64(*v)),
            Value::Int64(v) => {
                log::error!("Document id {} is negative", v);
                Err(PersistError::new(
                    &format!("Document id {} is negative", v),
                    ErrorKind::InvalidId,
                ))
            }
            other => {
                log::error!("Document id of type {} is not supported", other.type_name());
                Err(PersistError::new(
                    &format!("Document id of type {} is not supported", other.type_name()),
                    ErrorKind::InvalidId,
                ))
            }
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            DocumentId::Int64(v) => Value::Int64(*v),
            DocumentId::UInt64(v) => Value::UInt64(*v),
            DocumentId::String(v) => Value::String(v.clone()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocumentId::String(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentId::Int64(v) => write!(f, "{}", v),
            DocumentId::UInt64(v) => write!(f, "{}", v),
            DocumentId::String(v) => write!(f, "\"{}\"", v.escape_default()),
        }
    }
}

impl Debug for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentId::Int64(v) => write!(f, "int64({})", v),
            DocumentId::UInt64(v) => write!(f, "uint64({})", v),
            DocumentId::String(v) => write!(f, "string(\"{}\")", v.escape_default()),
        }
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        DocumentId::String(value.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        DocumentId::String(value)
    }
}

impl From<i64> for DocumentId {
    fn from(value: i64) -> Self {
        DocumentId::Int64(value)
    }
}

impl From<u64> for DocumentId {
    fn from(value: u64) -> Self {
        DocumentId::UInt64(value)
    }
}

impl From<DocumentId> for Value {
    fn from(value: DocumentId) -> Self {
        match value {
            DocumentId::Int64(v) => Value::Int64(v),
            DocumentId::UInt64(v) => Value::UInt64(v),
            DocumentId::String(v) => Value::String(v),
        }
    }
}

impl From<&DocumentId> for Value {
    fn from(value: &DocumentId) -> Self {
        value.to_value()
    }
}

/// A validated dictionary that carries a usable `id` field.
///
/// A `Document` can only be obtained through [Document::validate] (or the
/// equivalent `TryFrom` conversions), so every instance is known to be
/// storable. The body keeps the `id` field; [Document::id] returns it in its
/// extracted form.
///
/// # Examples
///
/// ```rust
/// use persist::collection::{Document, DocumentId};
/// use persist::common::Value;
/// use persist::{dict, val};
///
/// let document = Document::validate(val!(dict! { id: "alice", age: 30 })).unwrap();
/// assert_eq!(document.id(), &DocumentId::from("alice"));
/// assert_eq!(document.get("age"), Some(&Value::Int64(30)));
///
/// // scalars are not documents
/// let err = Document::validate(val!(5)).unwrap_err();
/// assert!(err.is_usage_error());
///
/// // dictionaries without a usable id are invalid documents
/// let err = Document::validate(val!(dict! { id: (-1) })).unwrap_err();
/// assert!(err.is_validity_error());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    id: DocumentId,
    body: Dictionary,
}

impl Document {
    /// Validates `value` as a document.
    ///
    /// # Errors
    ///
    /// * [ErrorKind::TypeMismatch] if `value` is not a dictionary.
    /// * [ErrorKind::MissingId] if the dictionary has no `id` field.
    /// * [ErrorKind::InvalidId] if the `id` is a negative integer or not a
    ///   string or integer.
    pub fn validate(value: Value) -> PersistResult<Document> {
        match value {
            Value::Dictionary(body) => Document::from_dictionary(body),
            other => {
                log::error!("Expected a dictionary, found {}", other.type_name());
                Err(PersistError::new(
                    &format!("Expected a dictionary, found {}", other.type_name()),
                    ErrorKind::TypeMismatch,
                ))
            }
        }
    }

    fn from_dictionary(body: Dictionary) -> PersistResult<Document> {
        let id = match body.get(DOC_ID) {
            Some(id) => DocumentId::from_field(id)?,
            None => {
                log::error!("Document has no {} field", DOC_ID);
                return Err(PersistError::new(
                    &format!("Document has no {} field", DOC_ID),
                    ErrorKind::MissingId,
                ));
            }
        };
        Ok(Document { id, body })
    }

    /// Rebuilds a document read back from storage, where it was validated
    /// on the way in.
    pub(crate) fn from_stored(id: DocumentId, body: Dictionary) -> Document {
        Document { id, body }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn body(&self) -> &Dictionary {
        &self.body
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }

    /// Returns the top-level field names, `id` included.
    pub fn fields(&self) -> FieldNames {
        self.body.keys()
    }

    pub fn into_body(self) -> Dictionary {
        self.body
    }

    pub fn into_value(self) -> Value {
        Value::Dictionary(self.body)
    }

    pub fn to_value(&self) -> Value {
        Value::Dictionary(self.body.clone())
    }
}

impl TryFrom<Value> for Document {
    type Error = PersistError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Document::validate(value)
    }
}

impl TryFrom<Dictionary> for Document {
    type Error = PersistError;

    fn try_from(value: Dictionary) -> Result<Self, Self::Error> {
        Document::from_dictionary(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        value.into_value()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.body)
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "document({:?})", self.body)
    }
}
