//! Unified error handling for the storefront API.
//!
//! Every storefront handler returns `Result<T, StorefrontError>`. Bodies are
//! always JSON carrying an `error` field.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::domain::aggregates::ProductError;
use crate::domain::value_objects::{QuantityError, SessionIdError, SizeError};

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("Invalid session: {0}")]
    InvalidSession(#[from] SessionIdError),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error(transparent)]
    Size(#[from] SizeError),

    #[error(transparent)]
    Quantity(#[from] QuantityError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Body did not parse.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for StorefrontError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        if let Self::Checkout(err) = &self {
            let status = match err {
                CheckoutError::Rejected(_) => StatusCode::BAD_REQUEST,
                CheckoutError::AlreadySubmitting => StatusCode::CONFLICT,
                CheckoutError::Failed { reason } => {
                    tracing::error!(%reason, "Checkout failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            return (status, Json(err.to_state())).into_response();
        }

        let status = match &self {
            Self::Size(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
