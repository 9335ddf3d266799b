//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional.
//! - `STOREFRONT_HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8083)
//! - `FUNCTIONS_BASE_URL` - Where checkout reaches the notification functions
//!   (default: this server at `STOREFRONT_HOST:PORT`, loopback when the host is
//!   unspecified)
//! - `FUNCTIONS_API_KEY` - Bearer key sent to the functions
//! - `RESEND_API_KEY` - Resend key; without it the email function answers 500
//! - `RESEND_API_URL` - (default: https://api.resend.com)
//! - `ORDER_EMAIL_FROM` - Sender (default: `Urban Athletics <onboarding@resend.dev>`)
//! - `TEXTMEBOT_API_KEY` - TextMeBot key; without it orders are only logged
//! - `TEXTMEBOT_API_URL` - (default: https://api.textmebot.com/send.php)
//! - `WHATSAPP_BUSINESS_PHONE` - Shop owner's number (default: 6352947066)
//! - `WHATSAPP_COUNTRY_CODE` - (default: 91)

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Clone)]
pub struct StorefrontConfig {
    pub host: IpAddr,
    pub port: u16,
    pub functions_base_url: String,
    pub functions_api_key: Option<SecretString>,
    pub resend: ResendConfig,
    pub textmebot: TextMeBotConfig,
}

#[derive(Clone)]
pub struct ResendConfig {
    pub api_key: Option<SecretString>,
    pub api_url: String,
    pub from: String,
}

#[derive(Clone)]
pub struct TextMeBotConfig {
    pub api_key: Option<SecretString>,
    pub api_url: String,
    pub business_phone: String,
    pub country_code: String,
}

impl TextMeBotConfig {
    /// Destination number as TextMeBot wants it: country code then number.
    pub fn recipient(&self) -> String { format!("{}{}", self.country_code, self.business_phone) }
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("functions_base_url", &self.functions_base_url)
            .field("functions_api_key", &redacted(self.functions_api_key.as_ref()))
            .field("resend_api_key", &redacted(self.resend.api_key.as_ref()))
            .field("resend_api_url", &self.resend.api_url)
            .field("order_email_from", &self.resend.from)
            .field("textmebot_api_key", &redacted(self.textmebot.api_key.as_ref()))
            .field("textmebot_api_url", &self.textmebot.api_url)
            .field("whatsapp_recipient", &self.textmebot.recipient())
            .finish()
    }
}

/// This server as seen from itself: the bind address, or loopback when bound
/// to every interface.
fn local_functions_url(host: IpAddr, port: u16) -> String {
    let reachable = match host {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    format!("http://{}", SocketAddr::new(reachable, port))
}

fn redacted(secret: Option<&SecretString>) -> &'static str {
    if secret.is_some() { "[REDACTED]" } else { "<unset>" }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let secret = |key: &str| get(key).map(SecretString::from);

        let host = or("STOREFRONT_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_HOST".into(), e.to_string()))?;
        let port = or("PORT", "8083")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".into(), e.to_string()))?;
        let functions_base_url = or("FUNCTIONS_BASE_URL", &local_functions_url(host, port));

        let business_phone = or("WHATSAPP_BUSINESS_PHONE", "6352947066");
        if !business_phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidEnvVar("WHATSAPP_BUSINESS_PHONE".into(), "digits only".into()));
        }

        Ok(Self {
            host,
            port,
            functions_base_url,
            functions_api_key: secret("FUNCTIONS_API_KEY"),
            resend: ResendConfig {
                api_key: secret("RESEND_API_KEY"),
                api_url: or("RESEND_API_URL", "https://api.resend.com"),
                from: or("ORDER_EMAIL_FROM", "Urban Athletics <onboarding@resend.dev>"),
            },
            textmebot: TextMeBotConfig {
                api_key: secret("TEXTMEBOT_API_KEY"),
                api_url: or("TEXTMEBOT_API_URL", "https://api.textmebot.com/send.php"),
                business_phone,
                country_code: or("WHATSAPP_COUNTRY_CODE", "91"),
            },
        })
    }

    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
