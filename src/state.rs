//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::checkout::{CheckoutService, NotificationPipeline};
use crate::config::StorefrontConfig;
use crate::domain::aggregates::Product;
use crate::notifications::email::ResendClient;
use crate::notifications::whatsapp::TextMeBotClient;
use crate::notifications::{ChannelKind, FunctionChannel};
use crate::store::{CartStore, InMemoryCartStore};

/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    product: Product,
    carts: Arc<dyn CartStore>,
    checkout: CheckoutService,
    mailer: Option<ResendClient>,
    whatsapp: Option<TextMeBotClient>,
}

impl AppState {
    /// Wires the in-memory cart store, the checkout pipeline pointed at the
    /// notification functions, and the outbound Resend/TextMeBot clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(Duration::from_secs(15)).build()?;

        let pipeline = NotificationPipeline::new(
            Arc::new(FunctionChannel::new(
                ChannelKind::WhatsApp,
                &config.functions_base_url,
                config.functions_api_key.clone(),
                client.clone(),
            )),
            Arc::new(FunctionChannel::new(
                ChannelKind::Email,
                &config.functions_base_url,
                config.functions_api_key.clone(),
                client.clone(),
            )),
        );

        let mailer = config.resend.api_key.clone().map(|key| {
            ResendClient::new(client.clone(), config.resend.api_url.clone(), key, config.resend.from.clone())
        });
        let whatsapp = config.textmebot.api_key.clone().map(|key| {
            TextMeBotClient::new(client.clone(), config.textmebot.api_url.clone(), key, config.textmebot.recipient())
        });

        Ok(Self::new(Arc::new(InMemoryCartStore::new()), pipeline, mailer, whatsapp))
    }

    pub fn new(
        carts: Arc<dyn CartStore>,
        pipeline: NotificationPipeline,
        mailer: Option<ResendClient>,
        whatsapp: Option<TextMeBotClient>,
    ) -> Self {
        let checkout = CheckoutService::new(carts.clone(), pipeline);
        Self {
            inner: Arc::new(AppStateInner { product: Product::urban_athletics(), carts, checkout, mailer, whatsapp }),
        }
    }

    #[must_use]
    pub fn product(&self) -> &Product { &self.inner.product }

    #[must_use]
    pub fn carts(&self) -> &dyn CartStore { self.inner.carts.as_ref() }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutService { &self.inner.checkout }

    /// `None` when `RESEND_API_KEY` is unset.
    #[must_use]
    pub fn mailer(&self) -> Option<&ResendClient> { self.inner.mailer.as_ref() }

    /// `None` when `TEXTMEBOT_API_KEY` is unset.
    #[must_use]
    pub fn whatsapp(&self) -> Option<&TextMeBotClient> { self.inner.whatsapp.as_ref() }
}
