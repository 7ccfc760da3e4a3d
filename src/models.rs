use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Empty,
    Error,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Metadata {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Uniform response envelope: `{ "metadata": {...}, "data": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub metadata: Metadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub const EMPTY_MESSAGE: &str = "No items available";

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            metadata: Metadata {
                status: ResponseStatus::Success,
                message: None,
            },
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            metadata: Metadata {
                status: ResponseStatus::Error,
                message: Some(message.into()),
            },
            data: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success with a message and no `data` key.
    pub fn acknowledged(message: impl Into<String>) -> Self {
        Self {
            metadata: Metadata {
                status: ResponseStatus::Success,
                message: Some(message.into()),
            },
            data: None,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// `success` for a non-empty list, `empty` (not an error) otherwise.
    pub fn list(items: Vec<T>) -> Self {
        if items.is_empty() {
            return Self {
                metadata: Metadata {
                    status: ResponseStatus::Empty,
                    message: Some(EMPTY_MESSAGE.to_string()),
                },
                data: Some(items),
            };
        }
        Self::success(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_list_is_not_an_error() {
        let value = serde_json::to_value(ApiResponse::<Vec<u8>>::list(vec![])).unwrap();
        assert_eq!(
            value,
            json!({ "metadata": { "status": "empty", "message": EMPTY_MESSAGE }, "data": [] })
        );
    }

    #[test]
    fn success_omits_message() {
        let value = serde_json::to_value(ApiResponse::list(vec![1, 2])).unwrap();
        assert_eq!(value, json!({ "metadata": { "status": "success" }, "data": [1, 2] }));
    }

    #[test]
    fn acknowledged_omits_data() {
        let value = serde_json::to_value(ApiResponse::acknowledged("Item deleted")).unwrap();
        assert_eq!(
            value,
            json!({ "metadata": { "status": "success", "message": "Item deleted" } })
        );
    }
}
