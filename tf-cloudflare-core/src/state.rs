//! Conversion between JSON state and typed models

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

pub(crate) fn decode<T: DeserializeOwned>(type_name: &str, value: &Value) -> CoreResult<T> {
    T::deserialize(value).map_err(|source| CoreError::InvalidState {
        type_name: type_name.to_string(),
        source,
    })
}

pub(crate) fn encode<T: Serialize>(type_name: &str, model: &T) -> CoreResult<Value> {
    serde_json::to_value(model).map_err(|source| CoreError::InvalidState {
        type_name: type_name.to_string(),
        source,
    })
}

/// `Some` only for a non-blank string.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Model {
        #[allow(dead_code)]
        zone_id: String,
    }

    #[test]
    fn decode_reports_type_name() {
        let err = decode::<Model>("cloudflare_test", &json!({ "zone_id": 7 })).unwrap_err();
        assert!(err.to_string().starts_with("Malformed state for cloudflare_test"));
    }

    #[test]
    fn blank_is_absent() {
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some("p1")), Some("p1"));
    }
}
