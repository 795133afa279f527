//! Error conversions
//!
//! Rendering of [`AppError`] as the error envelope. Crates map their own
//! error types into [`AppError`] before it reaches this point.

#[cfg(feature = "axum")]
use super::app_error::AppError;

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::json!({
            "statusCode": self.status_code(),
            "message": self.message(),
            "errors": self.errors(),
            "data": serde_json::Value::Null,
            "success": false,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(all(test, feature = "axum"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_error_envelope_shape() {
        use axum::response::IntoResponse;

        let response = AppError::conflict("User with email or username already exists")
            .into_response();
        assert_eq!(response.status().as_u16(), 409);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["statusCode"], 409);
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"], serde_json::json!([]));
        assert!(body["data"].is_null());
        assert_eq!(
            body["message"],
            "User with email or username already exists"
        );
    }
}
