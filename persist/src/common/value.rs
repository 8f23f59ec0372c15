use crate::collection::Document;
use crate::common::Dictionary;
use crate::errors::{ErrorKind, PersistError, PersistResult};
use itertools::Itertools;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Debug, Display, Formatter};

/// Compare two floats for equality with NaN equal to itself.
#[inline]
fn num_eq_float(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        true
    } else {
        a == b
    }
}

/// A typed, possibly nested unit of data.
///
/// `Value` is a closed set of variants. Equality is structural and
/// type-sensitive: an [Value::Int64] never equals a [Value::UInt64], even when
/// both hold the same number. [Value::Dictionary] equality ignores insertion
/// order, [Value::Array] equality does not.
///
/// # Usage
///
/// ```rust
/// use persist::common::Value;
/// use persist::{dict, val};
///
/// let number = val!(42);
/// assert_eq!(number, Value::Int64(42));
/// assert_ne!(number, val!(42u64));
///
/// let user = val!(dict! { id: "alice", age: 30 });
/// assert!(user.is_dictionary());
/// ```
///
/// Cloning produces an independent value graph. Dictionaries are persistent
/// maps, so a clone shares structure with its source until either side is
/// modified.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// A boolean value.
    Bool(bool),
    /// A signed 64-bit integer.
    Int64(i64),
    /// An unsigned 64-bit integer.
    UInt64(u64),
    /// A 64-bit floating point value.
    Double(f64),
    /// A UTF-8 string.
    String(String),
    /// An opaque byte sequence, compared byte by byte.
    Binary(Vec<u8>),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// A string-keyed mapping of values.
    Dictionary(Dictionary),
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string(0))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pretty_json(0))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::UInt64(a), Value::UInt64(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => num_eq_float(*a, *b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Dictionary(a), Value::Dictionary(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

/// Returns the first successful downcast of `$any` to one of the listed
/// types, converted with `$convert`.
macro_rules! convert_any {
    ($any:expr, $convert:path, [$($t:ty),* $(,)?]) => {
        $(
            if let Some(v) = $any.downcast_ref::<$t>() {
                return Some($convert(v.clone()));
            }
        )*
    };
}

/// Like `convert_any!` for `Option`s and string-keyed maps of each type.
macro_rules! convert_wrapped {
    ($any:expr, [$($t:ty),* $(,)?]) => {
        $(
            convert_any!($any, Value::from, [
                Option<$t>,
                BTreeMap<String, $t>,
                HashMap<String, $t>,
            ]);
        )*
    };
}

impl Value {
    /// Creates a [Value] from a native value using runtime type inspection.
    ///
    /// Scalars map to their variant (signed integers to [Value::Int64],
    /// unsigned integers to [Value::UInt64], floats to [Value::Double]),
    /// `Vec<u8>` maps to [Value::Binary], `()` maps to [Value::Null]. Values,
    /// dictionaries and documents are taken as they are. Vectors, options and
    /// string-keyed `BTreeMap`/`HashMap`s of those types map to
    /// [Value::Array], the wrapped value or [Value::Null], and
    /// [Value::Dictionary], converting each element.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::TypeMismatch] for any other type, including
    /// 128-bit integers, which do not fit the value model.
    ///
    /// ```rust
    /// use persist::common::Value;
    /// use std::collections::HashMap;
    ///
    /// assert_eq!(Value::new(5u8).unwrap(), Value::UInt64(5));
    /// assert_eq!(Value::new(vec![1i64, 2]).unwrap(), Value::from_vec(vec![1, 2]));
    /// assert!(Value::new(HashMap::<String, bool>::new()).unwrap().is_dictionary());
    /// assert!(Value::new(std::time::Instant::now()).is_err());
    /// ```
    pub fn new<T: Any>(value: T) -> PersistResult<Value> {
        match Value::from_any(&value) {
            Some(converted) => Ok(converted),
            None => {
                log::error!(
                    "Cannot convert {} to a Value",
                    std::any::type_name::<T>()
                );
                Err(PersistError::new(
                    &format!("Cannot convert {} to a Value", std::any::type_name::<T>()),
                    ErrorKind::TypeMismatch,
                ))
            }
        }
    }

    fn from_any(any: &dyn Any) -> Option<Value> {
        convert_any!(any, Value::from, [
            (), bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
            String, &'static str, Vec<u8>, Vec<Value>, Dictionary, Document, Value,
        ]);
        convert_any!(any, Value::from_vec, [
            Vec<bool>, Vec<i8>, Vec<i16>, Vec<i32>, Vec<i64>, Vec<isize>,
            Vec<u16>, Vec<u32>, Vec<u64>, Vec<usize>, Vec<f32>, Vec<f64>,
            Vec<String>, Vec<&'static str>, Vec<Dictionary>, Vec<Document>,
        ]);
        convert_wrapped!(any, [
            bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
            String, &'static str, Dictionary, Document, Value,
        ]);
        None
    }

    /// Creates a [Value::Array] from a vector of convertible values.
    pub fn from_vec<T: Into<Value>>(values: Vec<T>) -> Value {
        Value::Array(values.into_iter().map(|v| v.into()).collect())
    }

    /// Returns the name of this value's variant, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int64(_) => "int64",
            Value::UInt64(_) => "uint64",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Binary(_) => "binary",
            Value::Array(_) => "array",
            Value::Dictionary(_) => "dictionary",
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_dictionary_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            Value::Dictionary(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    pub fn is_int64(&self) -> bool {
        matches!(self, Value::Int64(_))
    }

    #[inline]
    pub fn is_uint64(&self) -> bool {
        matches!(self, Value::UInt64(_))
    }

    /// Checks if the [Value] is either integer variant.
    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Int64(_) | Value::UInt64(_))
    }

    #[inline]
    pub fn is_double(&self) -> bool {
        matches!(self, Value::Double(_))
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    pub fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(_))
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    pub fn is_dictionary(&self) -> bool {
        matches!(self, Value::Dictionary(_))
    }

    /// Takes the value, leaving [Value::Null] in its place.
    pub fn take(&mut self) -> Value {
        std::mem::replace(self, Value::Null)
    }

    pub(crate) fn to_pretty_json(&self, indent: usize) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Int64(v) => v.to_string(),
            Value::UInt64(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            Value::String(v) => format!("\"{}\"", v.escape_default()),
            Value::Binary(v) => format!("b\"{}\"", v.escape_ascii()),
            Value::Array(v) => {
                if v.is_empty() {
                    return "[]".to_string();
                }

                let indent_str = " ".repeat(indent + 2);
                let items = v
                    .iter()
                    .map(|value| format!("{}{}", indent_str, value.to_pretty_json(indent + 2)))
                    .join(",\n");
                format!("[\n{}\n{}]", items, " ".repeat(indent))
            }
            Value::Dictionary(v) => v.to_pretty_json(indent),
        }
    }

    pub(crate) fn to_debug_string(&self, indent: usize) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(v) => format!("bool({})", v),
            Value::Int64(v) => format!("int64({})", v),
            Value::UInt64(v) => format!("uint64({})", v),
            Value::Double(v) => format!("double({})", v),
            Value::String(v) => format!("string(\"{}\")", v.escape_default()),
            Value::Binary(v) => format!("binary(b\"{}\")", v.escape_ascii()),
            Value::Array(v) => {
                if v.is_empty() {
                    return "array([])".to_string();
                }

                let indent_str = " ".repeat(indent + 2);
                let items = v
                    .iter()
                    .map(|value| format!("{}{}", indent_str, value.to_debug_string(indent + 2)))
                    .join(",\n");
                format!("array([\n{}\n{}])", items, " ".repeat(indent))
            }
            Value::Dictionary(v) => format!("dictionary({})", v.to_debug_string(indent)),
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                #[inline]
                fn from(value: $t) -> Self {
                    Value::Int64(value as i64)
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                #[inline]
                fn from(value: $t) -> Self {
                    Value::UInt64(value as u64)
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(value: f32) -> Self {
        Value::Double(value as f64)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Binary(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Binary(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(value: &[u8; N]) -> Self {
        Value::Binary(value.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Dictionary> for Value {
    fn from(value: Dictionary) -> Self {
        Value::Dictionary(value)
    }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for Value {
    fn from(value: BTreeMap<String, V>) -> Self {
        Value::Dictionary(value.into_iter().collect())
    }
}

impl<V: Into<Value>> From<HashMap<String, V>> for Value {
    fn from(value: HashMap<String, V>) -> Self {
        Value::Dictionary(value.into_iter().collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

/// Creates a [Value] from any expression convertible with `From`.
///
/// ```rust
/// use persist::common::Value;
/// use persist::val;
///
/// assert_eq!(val!(42), Value::Int64(42));
/// assert_eq!(val!(5u32), Value::UInt64(5));
/// assert_eq!(val!("hello"), Value::String("hello".to_string()));
/// assert_eq!(val!(b"blah"), Value::Binary(b"blah".to_vec()));
/// ```
#[macro_export]
macro_rules! val {
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
