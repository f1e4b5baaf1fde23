//! HTTP error type shared by every service.
//!
//! Every failure leaves a service as a JSON body with at least a `message`
//! field. Internal detail is only sent by routers layered with
//! [`expose_error_detail`] for a development environment.

use crate::config::RunEnvironment;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use log::error;
use serde_json::{json, Value};
use std::fmt::Display;
use thiserror::Error;
use trading::{FieldError, ValidationErrors};

/// Body with internal detail, carried on the response until a router
/// decides whether to send it.
#[derive(Debug, Clone)]
struct DetailedBody(Value);

#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed payload, one entry per rejected field.
    #[error("Validation error")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    /// Missing, invalid or expired credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Valid credentials without the required broker scope.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Anything the caller cannot fix. `detail` never leaves the process
    /// outside development mode.
    #[error("{message}")]
    Internal { message: String, detail: String },
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>, cause: impl Display) -> Self {
        Self::Internal {
            message: msg.into(),
            detail: cause.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The JSON body sent to the client.
    pub fn body(&self, development: bool) -> Value {
        let mut body = json!({
            "status": "error",
            "message": self.to_string(),
            "timestamp": Utc::now().to_rfc3339(),
        });

        match self {
            ApiError::Validation(errors) => {
                body["errors"] = json!(errors.errors().iter().collect::<Vec<&FieldError>>());
            }
            ApiError::Internal { detail, .. } if development => {
                body["detail"] = json!(detail);
            }
            _ => {}
        }
        body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), Json(self.body(false))).into_response();
        if let ApiError::Internal { message, detail } = &self {
            error!("{}: {}", message, detail);
            response.extensions_mut().insert(DetailedBody(self.body(true)));
        }
        response
    }
}

/// Response mapper swapping in the detailed error body in development.
///
/// Installed with
/// `axum::middleware::map_response_with_state(environment, expose_error_detail)`.
pub async fn expose_error_detail(
    State(environment): State<RunEnvironment>,
    mut response: Response,
) -> Response {
    match response.extensions_mut().remove::<DetailedBody>() {
        Some(DetailedBody(body)) if environment.is_development() => {
            (response.status(), Json(body)).into_response()
        }
        _ => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_lists_fields() {
        let err = ApiError::from(ValidationErrors::new(vec![
            FieldError::new("price", "Required"),
            FieldError::new("quantity", "Number must be greater than 0"),
        ]));

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let body = err.body(false);
        assert_eq!(body["message"], "Validation error");
        assert_eq!(body["errors"][0]["path"], "price");
        assert_eq!(body["errors"][1]["message"], "Number must be greater than 0");
    }

    #[test]
    fn test_internal_detail_only_in_development() {
        let err = ApiError::internal("Failed to generate insights", "connection refused");

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.body(false).get("detail").is_none());
        assert_eq!(err.body(true)["detail"], "connection refused");
        assert_eq!(err.body(true)["message"], "Failed to generate insights");
    }

    async fn failing_route(environment: RunEnvironment) -> Value {
        use axum::body::{to_bytes, Body};
        use axum::http::Request;
        use axum::routing::get;
        use axum::Router;
        use tower::ServiceExt;

        let app = Router::new()
            .route(
                "/",
                get(|| async { Err::<(), _>(ApiError::internal("Storage failure", "pool timed out")) }),
            )
            .layer(axum::middleware::map_response_with_state(
                environment,
                expose_error_detail,
            ));

        let res = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_router_environment_controls_detail() {
        let body = failing_route(RunEnvironment::Development).await;
        assert_eq!(body["message"], "Storage failure");
        assert_eq!(body["detail"], "pool timed out");

        let body = failing_route(RunEnvironment::Production).await;
        assert_eq!(body["message"], "Storage failure");
        assert!(body.get("detail").is_none());
    }

    #[test]
    fn test_auth_statuses() {
        assert_eq!(ApiError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
    }
}
