use serde::{Deserialize, Serialize};

/// Envelope returned by every JSON endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response, with `data` and no message.
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_success_serializes_data() {
        let response = ApiResponse::success(7);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "success": true, "data": 7, "message": null })
        );
    }

    #[test]
    fn test_nested_payload_is_kept_verbatim() {
        let response = ApiResponse::success(json!({ "error": "nonsensical" }));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["data"], json!({ "error": "nonsensical" }));
        assert_eq!(value["success"], true);
    }
}
