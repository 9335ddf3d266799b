//! Checkout orchestration
//!
//! `Idle → Submitting → { Confirmed | Idle(with error) }`. Validation failures
//! leave the flow in `Idle` before anything leaves the process. Once
//! submitting, the order is confirmed and the ordered lines taken out of the
//! cart no matter how the individual notifications fared. Lines added while
//! the notifications were in flight stay in the cart. Only an error escaping the pipeline sends
//! the flow back to `Idle`, and then the cart is kept so the shopper can retry.

pub mod pipeline;

use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::aggregates::{Cart, CustomerDetails, OrderError, OrderSubmission};
use crate::domain::value_objects::{Money, SessionId};
use crate::store::CartStore;

pub use pipeline::{ChannelOutcome, NotificationPipeline, NotificationReport};

pub const ORDER_PLACED: &str = "Order placed successfully!";
pub const ORDER_FAILED: &str = "Failed to place order. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub reference: Uuid,
    pub total_items: u64,
    pub total_price: Money,
    pub payment_method: String,
    pub expected_delivery: String,
    pub message: String,
    pub notifications: NotificationReport,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum CheckoutState {
    Idle { error: Option<String> },
    Submitting,
    Confirmed { receipt: OrderReceipt },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Rejected(#[from] OrderError),

    #[error("An order is already being placed for this session")]
    AlreadySubmitting,

    #[error("{}", ORDER_FAILED)]
    Failed { reason: String },
}

impl CheckoutError {
    /// The message shown to the shopper.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(OrderError::TotalOverflow) | Self::Failed { .. } => ORDER_FAILED.to_string(),
            other => other.to_string(),
        }
    }

    /// Where the flow sits after this error.
    pub fn to_state(&self) -> CheckoutState {
        CheckoutState::Idle { error: Some(self.user_message()) }
    }
}

/// One pass through the checkout state machine.
///
/// A flow covers a single attempt. `CheckoutService` starts a fresh one per
/// submission, so concurrent submissions for a session are stopped by its
/// in-flight guard; the `AlreadySubmitting` check here only guards reuse of
/// one flow value.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    state: CheckoutState,
}

impl Default for CheckoutFlow {
    fn default() -> Self { Self { state: CheckoutState::Idle { error: None } } }
}

impl CheckoutFlow {
    pub fn new() -> Self { Self::default() }

    pub fn state(&self) -> &CheckoutState { &self.state }

    /// Guards and snapshot. On success the flow is `Submitting`.
    pub fn begin(&mut self, cart: &Cart, details: CustomerDetails) -> Result<OrderSubmission, CheckoutError> {
        if matches!(self.state, CheckoutState::Submitting) {
            return Err(CheckoutError::AlreadySubmitting);
        }
        let result = Self::prepare(cart, details);
        match &result {
            Ok(_) => self.state = CheckoutState::Submitting,
            Err(e) => self.state = e.to_state(),
        }
        result
    }

    fn prepare(cart: &Cart, details: CustomerDetails) -> Result<OrderSubmission, CheckoutError> {
        if cart.is_empty() {
            return Err(OrderError::NoItems.into());
        }
        let details = details.validated()?;
        Ok(OrderSubmission::snapshot(cart, details)?)
    }

    pub fn confirm(&mut self, submission: &OrderSubmission, notifications: NotificationReport) -> OrderReceipt {
        let receipt = OrderReceipt {
            reference: submission.reference(),
            total_items: submission.total_items(),
            total_price: submission.total_price(),
            payment_method: "Cash on Delivery".into(),
            expected_delivery: "5-7 business days".into(),
            message: ORDER_PLACED.into(),
            notifications,
        };
        self.state = CheckoutState::Confirmed { receipt: receipt.clone() };
        receipt
    }

    pub fn fail(&mut self, error: &CheckoutError) {
        self.state = error.to_state();
    }
}

/// Runs checkouts against a `CartStore`, one at a time per session.
pub struct CheckoutService {
    carts: Arc<dyn CartStore>,
    pipeline: NotificationPipeline,
    in_flight: Mutex<HashSet<SessionId>>,
}

impl CheckoutService {
    pub fn new(carts: Arc<dyn CartStore>, pipeline: NotificationPipeline) -> Self {
        Self { carts, pipeline, in_flight: Mutex::new(HashSet::new()) }
    }

    /// # Errors
    ///
    /// `Rejected` for an empty cart or bad details (no notification is sent),
    /// `AlreadySubmitting` if this session has a checkout running, `Failed`
    /// if the notification pipeline could not run. The cart survives all three.
    #[tracing::instrument(skip_all, fields(%session))]
    pub async fn submit(&self, session: &SessionId, details: CustomerDetails) -> Result<OrderReceipt, CheckoutError> {
        let _claim = self.claim(session)?;
        let mut flow = CheckoutFlow::new();

        let cart = self.carts.snapshot(session);
        let submission = flow.begin(&cart, details).inspect_err(|e| {
            tracing::info!(error = %e, "checkout rejected");
        })?;
        tracing::info!(order = %submission.reference(), total = %submission.total_price(), "submitting order");

        match self.pipeline.dispatch(&submission).await {
            Ok(report) => {
                self.carts.mutate(session, &mut |cart| {
                    for line in submission.lines() {
                        cart.deduct(&line.name, line.size, line.quantity);
                    }
                    cart.close_drawer();
                });
                let receipt = flow.confirm(&submission, report);
                tracing::info!(order = %receipt.reference, notifications = ?receipt.notifications, "order confirmed");
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!(order = %submission.reference(), error = %e, "Order error");
                let error = CheckoutError::Failed { reason: e.to_string() };
                flow.fail(&error);
                Err(error)
            }
        }
    }

    fn claim(&self, session: &SessionId) -> Result<InFlight<'_>, CheckoutError> {
        let mut sessions = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !sessions.insert(session.clone()) {
            return Err(CheckoutError::AlreadySubmitting);
        }
        Ok(InFlight { sessions: &self.in_flight, session: session.clone() })
    }
}

/// Releases the session's checkout slot on drop.
struct InFlight<'a> {
    sessions: &'a Mutex<HashSet<SessionId>>,
    session: SessionId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner).remove(&self.session);
    }
}
