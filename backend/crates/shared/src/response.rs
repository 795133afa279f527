//! Response Envelope
//!
//! Every successful endpoint answers with the same shape:
//! `{ "statusCode": 200, "data": ..., "message": "...", "success": true }`.
//! Errors use the matching envelope rendered by [`AppError`](crate::error::app_error::AppError).

use std::borrow::Cow;

use serde::Serialize;

/// Uniform success envelope
///
/// `success` is derived from the status code and is `true` only below 400.
///
/// ## Examples
/// ```rust
/// use kernel::response::ApiResponse;
///
/// let res = ApiResponse::ok(42, "Answer fetched");
/// assert!(res.success);
/// assert_eq!(res.status_code, 200);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: Cow<'static, str>,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, data: T, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status_code,
            data,
            message: message.into(),
            success: status_code < 400,
        }
    }

    /// 200 OK
    pub fn ok(data: T, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(200, data, message)
    }

    /// 201 Created
    pub fn created(data: T, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(201, data, message)
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_flag_follows_status() {
        assert!(ApiResponse::ok((), "fine").success);
        assert!(ApiResponse::created((), "made").success);
        assert!(!ApiResponse::new(404, (), "missing").success);
        assert!(ApiResponse::new(399, (), "edge").success);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(ApiResponse::ok(
            serde_json::json!({ "id": 1 }),
            "User fetched successfully",
        ))
        .unwrap();

        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["data"]["id"], 1);
        assert_eq!(json["message"], "User fetched successfully");
        assert_eq!(json["success"], true);
    }
}
