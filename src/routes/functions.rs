//! Notification functions: `send-order-email` and `send-whatsapp-order`.
//!
//! Both take an `OrderNotification` and are callable from any origin.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{Datelike, Utc};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

use crate::notifications::email::{self, EmailError};
use crate::notifications::whatsapp;
use crate::notifications::OrderNotification;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum FunctionError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error("Failed to send WhatsApp notification: {0}")]
    WhatsApp(#[from] reqwest::Error),
}

impl IntoResponse for FunctionError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Email(_) | Self::WhatsApp(_) => {
                tracing::error!(error = %self, "Notification function failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-order-email", post(send_order_email))
        .route("/send-whatsapp-order", post(send_whatsapp_order))
        .layer(cors())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

fn parse(body: &Bytes) -> Result<OrderNotification, FunctionError> {
    serde_json::from_slice(body).map_err(|e| FunctionError::BadRequest(format!("Invalid order payload: {e}")))
}

async fn send_order_email(State(state): State<AppState>, body: Bytes) -> Result<Json<serde_json::Value>, FunctionError> {
    let order = parse(&body)?;
    tracing::info!(items = order.items.len(), total = order.total_price, "Processing order email");

    if order.email.trim().is_empty() {
        return Err(FunctionError::BadRequest("Email is required".into()));
    }
    let mailer = state.mailer().ok_or_else(|| {
        tracing::error!("RESEND_API_KEY is not set");
        EmailError::NotConfigured
    })?;

    let data = email::send_order_email(mailer, &order, Utc::now().year()).await?;
    Ok(Json(data))
}

async fn send_whatsapp_order(State(state): State<AppState>, body: Bytes) -> Result<Json<serde_json::Value>, FunctionError> {
    let order = parse(&body)?;
    tracing::info!(customer = %order.full_name, "Processing WhatsApp order notification");

    whatsapp::send_order_alert(state.whatsapp(), &order, Utc::now()).await?;
    Ok(Json(json!({ "success": true, "message": "Order notification sent" })))
}
