use serde::Deserialize;

/// Envelope wrapped around every controller response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub error_code: i32,
    pub msg: Option<String>,
    pub result: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn successful(&self) -> bool {
        self.error_code == 0
    }
}

/// List payloads come back either bare or paged under `data`.
pub fn result_items(result: Option<serde_json::Value>) -> Vec<serde_json::Value> {
    match result {
        Some(serde_json::Value::Array(items)) => items,
        Some(serde_json::Value::Object(mut obj)) => match obj.remove("data") {
            Some(serde_json::Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_envelope() {
        let response: ApiResponse =
            serde_json::from_value(json!({"errorCode": -30109, "msg": "Invalid username or password."}))
                .unwrap();
        assert!(!response.successful());
        assert!(response.result.is_none());
    }

    #[test]
    fn test_result_items_bare_and_paged() {
        assert_eq!(result_items(Some(json!([1, 2]))).len(), 2);
        assert_eq!(result_items(Some(json!({"totalRows": 1, "data": [{"id": "a"}]}))).len(), 1);
        assert!(result_items(Some(json!({"other": []}))).is_empty());
        assert!(result_items(None).is_empty());
    }
}
