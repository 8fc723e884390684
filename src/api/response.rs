/// Success envelope for API responses
///
/// Every successful endpoint returns `{statusCode, data, message, success}`
/// with the envelope's statusCode matching the HTTP status.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    status_code: u16,
    data: T,
    message: String,
    success: bool,
}

/// A successful API response
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    data: T,
    message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status,
            data,
            message: message.into(),
        }
    }

    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, data, message)
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, data, message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Json(Envelope {
            status_code: self.status.as_u16(),
            data: self.data,
            message: self.message,
            success: true,
        });

        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_status_matches_http_status() {
        let response = ApiResponse::created(serde_json::json!({"id": 1}), "created").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = ApiResponse::ok((), "done").into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_envelope_serialization() {
        let envelope = Envelope {
            status_code: 200,
            data: serde_json::json!({"liked": true}),
            message: "Liked the video".to_string(),
            success: true,
        };

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["data"]["liked"], true);
        assert_eq!(json["success"], true);
    }
}
