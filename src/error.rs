use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use tracing::{debug, error};

use crate::models::ApiResponse;

#[derive(Debug, Display)]
pub enum PresensiError {
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "{}", _0)]
    Unexpected(String),
}

impl std::error::Error for PresensiError {}

impl PresensiError {
    pub fn item_not_found() -> Self {
        PresensiError::NotFound("Item not found".to_string())
    }
}

/// Every failure is reported inside the envelope with HTTP 200; clients
/// branch on `metadata.status`, never on the status line.
impl ResponseError for PresensiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            PresensiError::Unexpected(_) => error!(error = %self, "unexpected error"),
            _ => debug!(error = %self, "request rejected"),
        }

        HttpResponse::Ok().json(ApiResponse::<()>::error(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn renders_error_envelope_with_ok_status() {
        let resp = PresensiError::item_not_found().error_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "metadata": { "status": "error", "message": "Item not found" } })
        );
    }
}
