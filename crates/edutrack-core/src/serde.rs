use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Deserializes an optional query-string value through [`FromStr`].
///
/// Query parameters reach flattened structs as strings, so numeric, boolean
/// and id filters are parsed here. Empty strings are treated as `None`.
pub fn deserialize_optional_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Wraps any present value in `Some`, so `Option<Option<T>>` update fields can
/// tell an explicit `null` (`Some(None)`) apart from an absent key (`None`).
///
/// Use together with `#[serde(default)]`.
pub fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "deserialize_optional_from_str")]
        id: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_optional_from_str")]
        unread: Option<bool>,
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_some")]
        phone: Option<Option<String>>,
    }

    #[test]
    fn test_from_str_parses_values() {
        let filter: Filter = serde_json::from_str(r#"{"id":"42","unread":"true"}"#).unwrap();
        assert_eq!(filter.id, Some(42));
        assert_eq!(filter.unread, Some(true));
    }

    #[test]
    fn test_from_str_empty_is_none() {
        let filter: Filter = serde_json::from_str(r#"{"id":"","unread":" "}"#).unwrap();
        assert_eq!(filter.id, None);
        assert_eq!(filter.unread, None);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!(serde_json::from_str::<Filter>(r#"{"id":"abc"}"#).is_err());
    }

    #[test]
    fn test_deserialize_some_distinguishes_null_from_absent() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.phone, None);

        let null: Patch = serde_json::from_str(r#"{"phone":null}"#).unwrap();
        assert_eq!(null.phone, Some(None));

        let value: Patch = serde_json::from_str(r#"{"phone":"555-0100"}"#).unwrap();
        assert_eq!(value.phone, Some(Some("555-0100".to_string())));
    }
}
