//! Query-string serialization for list and filter endpoints.
//!
//! Keys are rewritten to snake_case and pairs keep the order they were added
//! in. Array values become repeated keys (`foo=1&foo=2`), which is what the
//! backend's list filters expect; they are never comma-joined.

use serde_json::Value;
use url::form_urlencoded;

use crate::case::to_snake_case;
use crate::error::ApiError;

/// A single query value: a scalar or a list of scalars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Scalar(String),
    List(Vec<String>),
}

macro_rules! scalar_from {
    ($($t:ty),*) => {
        $(impl From<$t> for QueryValue {
            fn from(v: $t) -> Self {
                QueryValue::Scalar(v.to_string())
            }
        })*
    };
}

scalar_from!(i32, i64, u32, u64, usize, bool, &str, String);

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item.into() {
                QueryValue::Scalar(s) => out.push(s),
                QueryValue::List(inner) => out.extend(inner),
            }
        }
        QueryValue::List(out)
    }
}

impl<T: Into<QueryValue> + Clone> From<&[T]> for QueryValue {
    fn from(items: &[T]) -> Self {
        items.to_vec().into()
    }
}

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. Keys may be given in camelCase.
    pub fn push(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Build parameters from a JSON object, keeping its key order.
    ///
    /// `null` members are skipped. Nested objects and arrays of non-scalars
    /// are rejected.
    pub fn from_value(value: &Value) -> Result<Self, ApiError> {
        let map = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(map) => map,
            other => {
                return Err(ApiError::InvalidQuery(format!(
                    "expected an object, got {other}"
                )))
            }
        };

        let mut params = Self::new();
        for (key, v) in map {
            let value = match v {
                Value::Null => continue,
                Value::Array(items) => {
                    let mut list = Vec::with_capacity(items.len());
                    for item in items {
                        match scalar_text(item) {
                            Some(s) => list.push(s),
                            None if item.is_null() => {}
                            None => {
                                return Err(ApiError::InvalidQuery(format!(
                                    "{key}: array elements must be scalars"
                                )))
                            }
                        }
                    }
                    QueryValue::List(list)
                }
                scalar => match scalar_text(scalar) {
                    Some(s) => QueryValue::Scalar(s),
                    None => {
                        return Err(ApiError::InvalidQuery(format!(
                            "{key}: nested objects are not supported"
                        )))
                    }
                },
            };
            params.pairs.push((key.clone(), value));
        }
        Ok(params)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.iter().all(|(_, v)| matches!(v, QueryValue::List(l) if l.is_empty()))
    }

    /// Serialize to `application/x-www-form-urlencoded` text without the
    /// leading `?`.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            let key = to_snake_case(key);
            match value {
                QueryValue::Scalar(s) => {
                    serializer.append_pair(&key, s);
                }
                QueryValue::List(items) => {
                    for item in items {
                        serializer.append_pair(&key, item);
                    }
                }
            }
        }
        serializer.finish()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arrays_become_repeated_snake_case_keys() {
        let params = QueryParams::new()
            .push("offset", 0)
            .push("foo", vec![1, 2, 3])
            .push("fooBar", vec![2, 3])
            .push("fizzBuzz", 1);
        assert_eq!(
            params.encode(),
            "offset=0&foo=1&foo=2&foo=3&foo_bar=2&foo_bar=3&fizz_buzz=1"
        );
    }

    #[test]
    fn from_value_keeps_object_order() {
        let params = QueryParams::from_value(&json!({
            "limit": 10,
            "dispositionBy": ["analyst", "admin"],
            "sort": "event_time|desc"
        }))
        .unwrap();
        assert_eq!(
            params.encode(),
            "limit=10&disposition_by=analyst&disposition_by=admin&sort=event_time%7Cdesc"
        );
    }

    #[test]
    fn values_are_percent_encoded() {
        let params = QueryParams::new().push("name", "a&b c");
        assert_eq!(params.encode(), "name=a%26b+c");
    }

    #[test]
    fn null_members_are_skipped() {
        let params = QueryParams::from_value(&json!({"owner": null, "queue": "default"})).unwrap();
        assert_eq!(params.encode(), "queue=default");
    }

    #[test]
    fn nested_objects_are_rejected() {
        let err = QueryParams::from_value(&json!({"filter": {"a": 1}})).unwrap_err();
        assert!(matches!(err, ApiError::InvalidQuery(_)));
    }

    #[test]
    fn empty_params() {
        assert!(QueryParams::new().is_empty());
        assert!(QueryParams::new().push("tags", Vec::<String>::new()).is_empty());
        assert!(!QueryParams::new().push("offset", 0).is_empty());
        assert_eq!(QueryParams::from_value(&Value::Null).unwrap().encode(), "");
    }
}
