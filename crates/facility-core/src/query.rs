//! Convenience builder for HTTP query parameters.
//!
//! Optional values that are `None` are skipped, which is how an undefined query
//! parameter is left out of the URL. An explicit null is kept as
//! [`ParamValue::Null`] so URL rendering can reject it.

/// A supplied parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Explicit null; rejected for both path and query parameters.
    Null,
    /// String form of the value, not yet encoded.
    Value(String),
}

impl ParamValue {
    /// Returns the string value, if not null.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Null => None,
            Self::Value(value) => Some(value),
        }
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::String(text) => Self::Value(text),
            other => Self::Value(other.to_string()),
        }
    }
}

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, ParamValue)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, ParamValue::Value(value.to_string())));
        }
    }

    /// Append a raw [`ParamValue`].
    pub fn push_value(&mut self, key: &'static str, value: ParamValue) {
        self.pairs.push((key, value));
    }

    /// Last value supplied for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.pairs
            .iter()
            .rev()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }

    /// Names of all supplied parameters, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pairs.iter().map(|(name, _)| *name)
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{ParamValue, QueryParams};

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("Folder", Option::<String>::None);
        assert!(params.is_empty());
    }

    #[test]
    fn push_opt_renders_with_display() {
        let mut params = QueryParams::new();
        params.push_opt("PageSize", Some(5u32));
        assert_eq!(params.get("PageSize"), Some(&ParamValue::Value("5".to_string())));
    }

    #[test]
    fn null_is_kept_in_order() {
        let mut params = QueryParams::new();
        params.push_value("Status", ParamValue::Null);
        params.push_opt("PageNumber", Some(1));

        assert_eq!(params.get("Status"), Some(&ParamValue::Null));
        assert_eq!(params.get("PageNumber").and_then(ParamValue::as_str), Some("1"));
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["Status", "PageNumber"]);
    }

    #[test]
    fn later_values_win() {
        let mut params = QueryParams::new();
        params.push_opt("PageSize", Some(10));
        params.push_opt("PageSize", Some(20));
        assert_eq!(
            params.get("PageSize"),
            Some(&ParamValue::Value("20".to_string()))
        );
    }

    #[test]
    fn json_values_convert() {
        assert_eq!(ParamValue::from(serde_json::Value::Null), ParamValue::Null);
        assert_eq!(
            ParamValue::from(serde_json::json!("b1")),
            ParamValue::Value("b1".to_string())
        );
        assert_eq!(
            ParamValue::from(serde_json::json!(42)),
            ParamValue::Value("42".to_string())
        );
    }
}
