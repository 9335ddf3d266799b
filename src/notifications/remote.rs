//! HTTP client side of the notification functions.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::{ChannelKind, NotificationChannel, NotifyError, OrderNotification};

/// Posts the order payload to `{base_url}/functions/v1/{function}`.
#[derive(Clone)]
pub struct FunctionChannel {
    kind: ChannelKind,
    endpoint: String,
    api_key: Option<SecretString>,
    client: reqwest::Client,
}

impl FunctionChannel {
    pub fn new(kind: ChannelKind, base_url: &str, api_key: Option<SecretString>, client: reqwest::Client) -> Self {
        let endpoint = format!("{}/functions/v1/{}", base_url.trim_end_matches('/'), kind.function_name());
        Self { kind, endpoint, api_key, client }
    }

    pub fn endpoint(&self) -> &str { &self.endpoint }
}

impl std::fmt::Debug for FunctionChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionChannel")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[async_trait]
impl NotificationChannel for FunctionChannel {
    fn kind(&self) -> ChannelKind { self.kind }

    async fn notify(&self, order: &OrderNotification) -> Result<(), NotifyError> {
        let channel = self.kind;
        let mut builder = self.client.post(&self.endpoint).json(order);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret()).header("apikey", key.expose_secret());
        }
        let request = builder
            .build()
            .map_err(|e| NotifyError::Request { channel, reason: e.to_string() })?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| NotifyError::Transport { channel, reason: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { channel, status: status.as_u16(), body });
        }
        tracing::debug!(%channel, status = status.as_u16(), "notification function accepted order");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use std::sync::{Arc, Mutex};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    fn order() -> OrderNotification {
        OrderNotification { full_name: "Ravi".into(), total_price: 3700, ..Default::default() }
    }

    #[tokio::test]
    async fn test_posts_payload_with_key() {
        let seen: Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>> = Arc::default();
        let sink = seen.clone();
        let app = Router::new().route(
            "/functions/v1/send-whatsapp-order",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let sink = sink.clone();
                async move {
                    let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).map(String::from);
                    sink.lock().unwrap().push((auth, body));
                    StatusCode::OK
                }
            }),
        );
        let base = serve(app).await;
        let channel = FunctionChannel::new(
            ChannelKind::WhatsApp,
            &format!("{base}/"),
            Some(SecretString::from("anon-key".to_string())),
            reqwest::Client::new(),
        );

        channel.notify(&order()).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("Bearer anon-key"));
        assert_eq!(seen[0].1["fullName"], "Ravi");
        assert_eq!(seen[0].1["totalPrice"], 3700);
    }

    #[tokio::test]
    async fn test_non_success_is_rejected() {
        let app = Router::new().route(
            "/functions/v1/send-order-email",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = serve(app).await;
        let channel = FunctionChannel::new(ChannelKind::Email, &base, None, reqwest::Client::new());

        let err = channel.notify(&order()).await.unwrap_err();
        assert_eq!(err, NotifyError::Rejected { channel: ChannelKind::Email, status: 500, body: "boom".into() });
    }

    #[tokio::test]
    async fn test_unreachable_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let channel = FunctionChannel::new(ChannelKind::WhatsApp, &format!("http://{addr}"), None, reqwest::Client::new());

        let err = channel.notify(&order()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Transport { channel: ChannelKind::WhatsApp, .. }));
    }

    #[tokio::test]
    async fn test_bad_endpoint_is_request_error() {
        let channel = FunctionChannel::new(ChannelKind::WhatsApp, "not a url", None, reqwest::Client::new());
        let err = channel.notify(&order()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Request { .. }));
        assert_eq!(err.channel(), ChannelKind::WhatsApp);
    }
}
