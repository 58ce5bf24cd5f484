//! Query string encoding.
//!
//! [`QueryParams`] is an ordered mapping from parameter name to a
//! [`ParamValue`]. Encoding follows `application/x-www-form-urlencoded`:
//!
//! - absent values are skipped and their key never appears;
//! - a single value encodes as one `key=value` pair;
//! - a list encodes as one pair per element, repeating the key in list order.
//!
//! Keys are emitted in the order they were first declared, never sorted.
//!
//! ```
//! use skygraph_net::http::QueryParams;
//!
//! let params = QueryParams::new()
//!     .single("sourceDid", "did:plc:a")
//!     .list("ignoreDid", ["did:plc:x", "did:plc:y"])
//!     .optional("maxMutuals", None::<String>);
//!
//! assert_eq!(
//!     params.encode(),
//!     "sourceDid=did%3Aplc%3Aa&ignoreDid=did%3Aplc%3Ax&ignoreDid=did%3Aplc%3Ay"
//! );
//! ```

use std::fmt;

use url::form_urlencoded;

/// The value of one logical query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParamValue {
    /// No value. The key is left out of the encoded query.
    #[default]
    Absent,
    /// A single value.
    Single(String),
    /// An ordered list of values, one pair per element.
    List(Vec<String>),
}

impl ParamValue {
    /// The values this parameter encodes to, in order.
    pub fn values(&self) -> &[String] {
        match self {
            Self::Absent => &[],
            Self::Single(value) => std::slice::from_ref(value),
            Self::List(values) => values,
        }
    }

    /// True if the parameter contributes nothing to the encoded query.
    pub fn is_absent(&self) -> bool {
        self.values().is_empty()
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Single(value.clone())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// An ordered mapping of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, ParamValue)>,
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`.
    ///
    /// A key that is already present keeps its position and has its value
    /// replaced.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Set `key` to a single value.
    pub fn single(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, ParamValue::Single(value.into()))
    }

    /// Set `key` to a list of values.
    pub fn list<I, V>(self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.set(
            key,
            ParamValue::List(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Set `key` to a value that may be missing.
    pub fn optional<V: Into<String>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        self.set(key, value.map_or(ParamValue::Absent, |v| ParamValue::Single(v.into())))
    }

    /// Declare `key` without a value.
    pub fn absent(self, key: impl Into<String>) -> Self {
        self.set(key, ParamValue::Absent)
    }

    /// Append one value to `key`, turning it into a list if needed.
    pub fn append(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => {
                let mut values = std::mem::take(slot).values().to_vec();
                values.push(value);
                *slot = ParamValue::List(values);
            }
            None => self.entries.push((key, ParamValue::Single(value))),
        }
        self
    }

    /// Look up the value declared for `key`.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Number of declared keys, including absent ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no keys are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `(key, value)` pairs this set encodes to, in order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(key, value)| {
            value
                .values()
                .iter()
                .map(move |v| (key.as_str(), v.as_str()))
        })
    }

    /// Encode as a query string without the leading `?`.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
