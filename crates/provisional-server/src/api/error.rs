use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use provisional_ai::LlmError;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.status.as_u16(),
                "message": self.message,
            }
        }));
        (self.status, body).into_response()
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::RateLimited { retry_after_secs } => {
                tracing::warn!(?retry_after_secs, "upstream rate limit");
                Self::rate_limited("request limit reached")
            }
            other => {
                tracing::error!(error = %other, "upstream completion failed");
                Self::bad_gateway(other.to_string())
            }
        }
    }
}
