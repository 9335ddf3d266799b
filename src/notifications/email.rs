//! Order confirmation email, sent through the Resend API.

use askama::Template;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;

use super::OrderNotification;
use crate::domain::value_objects::Money;

pub const SUBJECT: &str = "Order Confirmation - Urban Athletics";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("failed to render email: {0}")]
    Render(#[from] askama::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to send email: {message}")]
    Api { status: u16, message: String },

    #[error("email delivery is not configured")]
    NotConfigured,
}

#[derive(Template)]
#[template(path = "order_email.html")]
struct OrderEmailTemplate<'a> {
    full_name: &'a str,
    rows: Vec<EmailRow<'a>>,
    total: String,
    address: &'a str,
    city: &'a str,
    state: &'a str,
    pincode: &'a str,
    year: i32,
}

struct EmailRow<'a> {
    name: &'a str,
    size: String,
    quantity: u32,
    price: String,
}

/// Renders the confirmation HTML. Every interpolated value is HTML-escaped.
pub fn render_order_email(order: &OrderNotification, year: i32) -> Result<String, EmailError> {
    let template = OrderEmailTemplate {
        full_name: &order.full_name,
        rows: order
            .items
            .iter()
            .map(|item| EmailRow {
                name: &item.name,
                size: item.size.to_string(),
                quantity: item.quantity,
                price: Money::rupees(item.price).grouped(),
            })
            .collect(),
        total: Money::rupees(order.total_price).grouped(),
        address: &order.address,
        city: &order.city,
        state: &order.state,
        pincode: &order.pincode,
        year,
    };
    Ok(template.render()?)
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Minimal Resend client: one endpoint, bearer auth.
#[derive(Clone)]
pub struct ResendClient {
    client: reqwest::Client,
    api_url: String,
    api_key: SecretString,
    from: String,
}

impl ResendClient {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>, api_key: SecretString, from: impl Into<String>) -> Self {
        Self { client, api_url: api_url.into(), api_key, from: from.into() }
    }

    /// Sends one message and returns Resend's JSON response.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Api` on a non-success status, `EmailError::Http`
    /// when the request fails or the body is not JSON.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<serde_json::Value, EmailError> {
        let url = format!("{}/emails", self.api_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&SendEmailRequest { from: &self.from, to: [to], subject, html })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %message, "Resend API error");
            return Err(EmailError::Api { status: status.as_u16(), message });
        }
        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for ResendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendClient")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("from", &self.from)
            .finish()
    }
}

/// Renders and sends the confirmation for `order` to `order.email`.
#[tracing::instrument(skip_all, fields(to = %order.email))]
pub async fn send_order_email(mailer: &ResendClient, order: &OrderNotification, year: i32) -> Result<serde_json::Value, EmailError> {
    let html = render_order_email(order, year)?;
    tracing::info!("Sending order email");
    let data = mailer.send(&order.email, SUBJECT, &html).await?;
    tracing::info!(response = %data, "Email sent successfully");
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::{NotificationItem, SizeLabel};
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn order() -> OrderNotification {
        OrderNotification {
            full_name: "Asha <Patel>".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
            address: "12 MG Road".into(),
            city: "Ahmedabad".into(),
            state: "Gujarat".into(),
            pincode: "380001".into(),
            items: vec![NotificationItem { name: "Urban Athletics Series".into(), size: SizeLabel::Eu(40), quantity: 2, price: 3700 }],
            total_price: 7400,
        }
    }

    #[test]
    fn test_render_escapes_and_groups() {
        let html = render_order_email(&order(), 2026).unwrap();
        assert!(html.contains("Thank you for your order, Asha &lt;Patel&gt;!"));
        assert!(!html.contains("<Patel>"));
        assert!(html.contains("₹3,700"));
        assert!(html.contains("Total: ₹7,400"));
        assert!(html.contains("Ahmedabad, Gujarat - 380001"));
        assert!(html.contains("2026 Urban Athletics"));
    }

    #[tokio::test]
    async fn test_send_posts_to_resend() {
        let seen: Arc<Mutex<Option<(String, serde_json::Value)>>> = Arc::default();
        let sink = seen.clone();
        let app = Router::new().route(
            "/emails",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let sink = sink.clone();
                async move {
                    let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
                    *sink.lock().unwrap() = Some((auth, body));
                    Json(json!({ "id": "email_123" }))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let mailer = ResendClient::new(
            reqwest::Client::new(),
            format!("http://{addr}"),
            SecretString::from("re_test".to_string()),
            "Urban Athletics <onboarding@resend.dev>",
        );
        let data = send_order_email(&mailer, &order(), 2026).await.unwrap();
        assert_eq!(data, json!({ "id": "email_123" }));

        let (auth, body) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(auth, "Bearer re_test");
        assert_eq!(body["to"], json!(["asha@example.com"]));
        assert_eq!(body["subject"], SUBJECT);
        assert_eq!(body["from"], "Urban Athletics <onboarding@resend.dev>");
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let app = Router::new().route(
            "/emails",
            post(|| async { (axum::http::StatusCode::UNPROCESSABLE_ENTITY, "invalid from") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let mailer = ResendClient::new(reqwest::Client::new(), format!("http://{addr}"), SecretString::from("k".to_string()), "x@y.z");
        let err = mailer.send("a@b.c", SUBJECT, "<p></p>").await.unwrap_err();
        assert!(matches!(err, EmailError::Api { status: 422, .. }));
        assert_eq!(err.to_string(), "Failed to send email: invalid from");
    }
}
