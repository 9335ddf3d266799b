//! Checkout submission.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::checkout::CheckoutState;
use crate::domain::aggregates::CustomerDetails;
use crate::domain::value_objects::SessionId;
use crate::error::Result;
use crate::state::AppState;

/// Answers with the flow's end state: `confirmed` with the receipt, or
/// `idle` with the error (see `StorefrontError`).
pub async fn submit(
    State(state): State<AppState>,
    Path(session): Path<String>,
    body: std::result::Result<Json<CustomerDetails>, JsonRejection>,
) -> Result<Json<CheckoutState>> {
    let session = SessionId::new(session)?;
    let Json(details) = body?;
    let receipt = state.checkout().submit(&session, details).await?;
    Ok(Json(CheckoutState::Confirmed { receipt }))
}
