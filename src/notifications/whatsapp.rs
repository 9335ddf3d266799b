//! WhatsApp order alert for the shop owner, sent through TextMeBot.

use chrono::{DateTime, FixedOffset, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::fmt::Write as _;

use super::OrderNotification;

/// India Standard Time, UTC+05:30. No DST, so a fixed offset is exact.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Order time as `en-IN` renders it in Asia/Kolkata, e.g. `16/10/2026, 3:45:12 pm`.
pub fn order_time_ist(at: DateTime<Utc>) -> String {
    FixedOffset::east_opt(IST_OFFSET_SECS).map_or_else(
        || at.to_rfc3339(),
        |ist| at.with_timezone(&ist).format("%-d/%-m/%Y, %-I:%M:%S %P").to_string(),
    )
}

pub fn format_order_message(order: &OrderNotification, at: DateTime<Utc>) -> String {
    let items = order
        .items
        .iter()
        .map(|i| format!("• {} (Size: EU {}) x{} - ₹{}", i.name, i.size, i.quantity, i.line_total()))
        .collect::<Vec<_>>()
        .join("\n");

    let mut message = String::new();
    let _ = write!(
        message,
        "🛒 *NEW ORDER RECEIVED!*\n\n\
         👤 *Customer Details:*\n\
         Name: {name}\n\
         Phone: {phone}\n\
         Email: {email}\n\n\
         📍 *Delivery Address:*\n\
         {address}\n\
         {city}, {state} - {pincode}\n\n\
         📦 *Order Items:*\n\
         {items}\n\n\
         💰 *Total: ₹{total}*\n\n\
         📅 Order Time: {time}",
        name = order.full_name,
        phone = order.phone,
        email = order.email,
        address = order.address,
        city = order.city,
        state = order.state,
        pincode = order.pincode,
        total = order.total_price,
        time = order_time_ist(at),
    );
    message
}

/// What TextMeBot said back. Its status is logged, not acted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMeBotReply {
    pub status: u16,
    pub body: String,
}

impl TextMeBotReply {
    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}

#[derive(Clone)]
pub struct TextMeBotClient {
    client: reqwest::Client,
    api_url: String,
    api_key: SecretString,
    recipient: String,
}

impl TextMeBotClient {
    /// `recipient` is the full number including country code, digits only.
    pub fn new(client: reqwest::Client, api_url: impl Into<String>, api_key: SecretString, recipient: impl Into<String>) -> Self {
        Self { client, api_url: api_url.into(), api_key, recipient: recipient.into() }
    }

    pub fn recipient(&self) -> &str { &self.recipient }

    /// # Errors
    ///
    /// Only transport failures are errors; any HTTP status comes back as a reply.
    pub async fn send(&self, text: &str) -> Result<TextMeBotReply, reqwest::Error> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("recipient", self.recipient.as_str()),
                ("apikey", self.api_key.expose_secret()),
                ("text", text),
            ])
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TextMeBotReply { status, body })
    }
}

impl std::fmt::Debug for TextMeBotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextMeBotClient")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// Sends the alert, or logs it for manual processing when no client is configured.
///
/// # Errors
///
/// Returns the transport error if TextMeBot could not be reached.
#[tracing::instrument(skip_all, fields(customer = %order.full_name))]
pub async fn send_order_alert(
    client: Option<&TextMeBotClient>,
    order: &OrderNotification,
    at: DateTime<Utc>,
) -> Result<Option<TextMeBotReply>, reqwest::Error> {
    let message = format_order_message(order, at);
    let Some(client) = client else {
        tracing::info!("TEXTMEBOT_API_KEY not set, skipping WhatsApp notification");
        tracing::info!(%message, "Order details logged for manual processing");
        return Ok(None);
    };

    tracing::info!(recipient = client.recipient(), "Sending WhatsApp notification via TextMeBot");
    let reply = client.send(&message).await?;
    tracing::info!(status = reply.status, body = %reply.body, "TextMeBot API response");
    if !reply.is_success() {
        tracing::error!(body = %reply.body, "Failed to send WhatsApp message");
    }
    Ok(Some(reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::{NotificationItem, SizeLabel};
    use axum::{extract::Query, http::StatusCode, routing::get, Router};
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn order() -> OrderNotification {
        OrderNotification {
            full_name: "Asha Patel".into(),
            email: String::new(),
            phone: "9876543210".into(),
            address: "12 MG Road".into(),
            city: "Ahmedabad".into(),
            state: "Gujarat".into(),
            pincode: "380001".into(),
            items: vec![
                NotificationItem { name: "Urban Athletics Series".into(), size: SizeLabel::Eu(40), quantity: 2, price: 3700 },
                NotificationItem { name: "Urban Athletics Series".into(), size: SizeLabel::Text("38".into()), quantity: 1, price: 3700 },
            ],
            total_price: 11100,
        }
    }

    #[test]
    fn test_order_time_is_ist() {
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 10, 15, 30).unwrap();
        assert_eq!(order_time_ist(at), "5/1/2026, 3:45:30 pm");
        let late = Utc.with_ymd_and_hms(2026, 10, 16, 19, 0, 0).unwrap();
        assert_eq!(order_time_ist(late), "17/10/2026, 12:30:00 am");
    }

    #[test]
    fn test_message_layout() {
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 10, 15, 30).unwrap();
        let message = format_order_message(&order(), at);
        assert!(message.starts_with("🛒 *NEW ORDER RECEIVED!*\n\n👤 *Customer Details:*\nName: Asha Patel\n"));
        assert!(message.contains("\nAhmedabad, Gujarat - 380001\n"));
        assert!(message.contains("• Urban Athletics Series (Size: EU 40) x2 - ₹7400\n• Urban Athletics Series (Size: EU 38) x1 - ₹3700"));
        assert!(message.contains("💰 *Total: ₹11100*"));
        assert!(message.ends_with("📅 Order Time: 5/1/2026, 3:45:30 pm"));
    }

    #[tokio::test]
    async fn test_without_client_only_logs() {
        let reply = send_order_alert(None, &order(), Utc::now()).await.unwrap();
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn test_sends_query_to_textmebot() {
        let seen: Arc<Mutex<Option<HashMap<String, String>>>> = Arc::default();
        let sink = seen.clone();
        let app = Router::new().route(
            "/send.php",
            get(move |Query(q): Query<HashMap<String, String>>| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = Some(q);
                    (StatusCode::FORBIDDEN, "bad key")
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let client = TextMeBotClient::new(
            reqwest::Client::new(),
            format!("http://{addr}/send.php"),
            SecretString::from("tmb-key".to_string()),
            "916352947066",
        );
        let reply = send_order_alert(Some(&client), &order(), Utc::now()).await.unwrap().unwrap();
        assert_eq!(reply, TextMeBotReply { status: 403, body: "bad key".into() });

        let q = seen.lock().unwrap().clone().unwrap();
        assert_eq!(q["recipient"], "916352947066");
        assert_eq!(q["apikey"], "tmb-key");
        assert!(q["text"].contains("Name: Asha Patel"));
    }
}
