//! Two-step notification fan-out with a per-channel result.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::aggregates::OrderSubmission;
use crate::notifications::{NotificationChannel, NotifyError, OrderNotification};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum ChannelOutcome {
    Delivered,
    Failed(String),
    Skipped,
}

impl ChannelOutcome {
    pub fn is_delivered(&self) -> bool { matches!(self, Self::Delivered) }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NotificationReport {
    pub whatsapp: ChannelOutcome,
    pub email: ChannelOutcome,
}

/// WhatsApp first, then email if the customer gave an address.
///
/// A WhatsApp delivery failure is recorded and the pipeline carries on; only a
/// WhatsApp request that cannot be built at all escapes as an error. The email
/// step never escapes.
#[derive(Clone)]
pub struct NotificationPipeline {
    whatsapp: Arc<dyn NotificationChannel>,
    email: Arc<dyn NotificationChannel>,
}

impl NotificationPipeline {
    pub fn new(whatsapp: Arc<dyn NotificationChannel>, email: Arc<dyn NotificationChannel>) -> Self {
        Self { whatsapp, email }
    }

    #[tracing::instrument(skip_all, fields(order = %submission.reference()))]
    pub async fn dispatch(&self, submission: &OrderSubmission) -> Result<NotificationReport, NotifyError> {
        let payload = OrderNotification::from(submission);

        let whatsapp = match self.whatsapp.notify(&payload).await {
            Ok(()) => ChannelOutcome::Delivered,
            Err(e @ NotifyError::Request { .. }) => return Err(e),
            Err(e) => {
                tracing::error!(error = %e, "WhatsApp notification error");
                ChannelOutcome::Failed(e.to_string())
            }
        };

        let email = if submission.has_email() {
            match self.email.notify(&payload).await {
                Ok(()) => ChannelOutcome::Delivered,
                Err(e) => {
                    tracing::warn!(error = %e, "Email notification failed (non-critical)");
                    ChannelOutcome::Failed(e.to_string())
                }
            }
        } else {
            ChannelOutcome::Skipped
        };

        Ok(NotificationReport { whatsapp, email })
    }
}
