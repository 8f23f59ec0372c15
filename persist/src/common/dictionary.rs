use crate::common::Value;
use im::OrdMap;
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::{Debug, Display, Formatter};

/// Inline-allocated list of field names, sized for typical documents.
pub type FieldNames = SmallVec<[String; 8]>;

/// A string-keyed mapping of [Value]s.
///
/// Backed by a persistent ordered map: cloning is O(1) and the clone shares
/// structure with its source until one of them is modified. Keys iterate in
/// lexicographic order, which makes equality and rendering independent of
/// insertion order.
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dictionary {
    data: OrdMap<String, Value>,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary {
            data: OrdMap::new(),
        }
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the top-level field names in sorted order.
    pub fn keys(&self) -> FieldNames {
        self.data.keys().cloned().collect()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> + '_ {
        self.data.iter()
    }

    pub(crate) fn to_pretty_json(&self, indent: usize) -> String {
        if self.data.is_empty() {
            return "{}".to_string();
        }

        let indent_str = " ".repeat(indent + 2);
        let fields = self
            .data
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}\"{}\": {}",
                    indent_str,
                    key.escape_default(),
                    value.to_pretty_json(indent + 2)
                )
            })
            .join(",\n");
        format!("{{\n{}\n{}}}", fields, " ".repeat(indent))
    }

    pub(crate) fn to_debug_string(&self, indent: usize) -> String {
        if self.data.is_empty() {
            return "{}".to_string();
        }

        let indent_str = " ".repeat(indent + 2);
        let fields = self
            .data
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}\"{}\": {}",
                    indent_str,
                    key.escape_default(),
                    value.to_debug_string(indent + 2)
                )
            })
            .join(",\n");
        format!("{{\n{}\n{}}}", fields, " ".repeat(indent))
    }
}

impl Display for Dictionary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pretty_json(0))
    }
}

impl Debug for Dictionary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string(0))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Dictionary {
            data: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Dictionary {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter().collect::<Vec<_>>().into_iter()
    }
}

#[doc(hidden)]
pub fn normalize(key: &str) -> String {
    key.trim_matches('"').to_string()
}

/// Creates a [Dictionary] with JSON-like syntax.
///
/// Keys may be bare identifiers or string literals. Values may be literals,
/// nested `{ .. }` dictionaries, `[ .. ]` arrays, or any expression wrapped
/// in parentheses.
///
/// ```rust
/// use persist::common::Value;
/// use persist::dict;
///
/// let limit = 10;
/// let config = dict! {
///     id: "settings",
///     "page-size": (limit * 2),
///     owner: { name: "alice", roles: ["admin", "dev"] },
///     checksum: b"\x01\x02",
/// };
///
/// assert_eq!(config.get("page-size"), Some(&Value::Int64(20)));
/// assert_eq!(config.len(), 4);
/// ```
#[macro_export]
macro_rules! dict {
    () => {
        $crate::common::Dictionary::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut dict = $crate::common::Dictionary::new();
            $(
                dict.insert(
                    $crate::common::normalize(stringify!($key)),
                    $crate::dict_value!($value),
                );
            )*
            dict
        }
    };
}

/// Converts a single `dict!` value token tree into a [Value].
#[doc(hidden)]
#[macro_export]
macro_rules! dict_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Dictionary($crate::dict!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::dict_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
