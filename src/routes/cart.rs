//! Cart drawer routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{Cart, CartItem};
use crate::domain::value_objects::{LineItemId, Money, Quantity, SessionId, ShoeSize};
use crate::error::{Result, StorefrontError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total_items: u64,
    pub total_price: Money,
    pub is_open: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: CartItem,
    pub line_total: Money,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartLineView { line_total: item.line_total(), item: item.clone() })
                .collect(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            is_open: cart.is_open(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub size: Option<u8>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct DrawerRequest {
    pub open: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemResponse {
    pub item_id: LineItemId,
    pub cart: CartView,
}

pub async fn show(State(state): State<AppState>, Path(session): Path<String>) -> Result<Json<CartView>> {
    let session = SessionId::new(session)?;
    Ok(Json(CartView::from(&state.carts().snapshot(&session))))
}

pub async fn clear(State(state): State<AppState>, Path(session): Path<String>) -> Result<Json<CartView>> {
    let session = SessionId::new(session)?;
    let cart = state.carts().mutate(&session, &mut |cart| cart.clear());
    Ok(Json(CartView::from(&cart)))
}

/// Adds the product in the chosen size and opens the drawer.
pub async fn add_item(
    State(state): State<AppState>,
    Path(session): Path<String>,
    body: std::result::Result<Json<AddItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AddItemResponse>)> {
    let session = SessionId::new(session)?;
    let Json(req) = body?;
    let size = req.size.map(ShoeSize::try_from).transpose()?;
    let quantity = req.quantity.map(Quantity::new).transpose()?;
    let line = state.product().line_for(size, quantity)?;

    let mut item_id = None;
    let cart = state.carts().mutate(&session, &mut |cart| {
        item_id = Some(cart.add_item(line.clone()));
        cart.open_drawer();
    });
    let item_id = item_id.ok_or_else(|| StorefrontError::BadRequest("cart was not updated".into()))?;
    tracing::info!(%session, %item_id, size = %line.size, "Added to cart");
    Ok((StatusCode::CREATED, Json(AddItemResponse { item_id, cart: CartView::from(&cart) })))
}

/// Zero or a negative quantity removes the line; an unknown id changes nothing.
pub async fn update_item(
    State(state): State<AppState>,
    Path((session, id)): Path<(String, String)>,
    body: std::result::Result<Json<UpdateQuantityRequest>, JsonRejection>,
) -> Result<Json<CartView>> {
    let session = SessionId::new(session)?;
    let Json(req) = body?;
    let id = LineItemId::from(id);
    let cart = state.carts().mutate(&session, &mut |cart| cart.update_quantity(&id, req.quantity));
    Ok(Json(CartView::from(&cart)))
}

pub async fn remove_item(
    State(state): State<AppState>,
    Path((session, id)): Path<(String, String)>,
) -> Result<Json<CartView>> {
    let session = SessionId::new(session)?;
    let id = LineItemId::from(id);
    let cart = state.carts().mutate(&session, &mut |cart| {
        cart.remove_item(&id);
    });
    Ok(Json(CartView::from(&cart)))
}

pub async fn set_drawer(
    State(state): State<AppState>,
    Path(session): Path<String>,
    body: std::result::Result<Json<DrawerRequest>, JsonRejection>,
) -> Result<Json<CartView>> {
    let session = SessionId::new(session)?;
    let Json(req) = body?;
    let cart = state.carts().mutate(&session, &mut |cart| cart.set_drawer_open(req.open));
    Ok(Json(CartView::from(&cart)))
}

/// "Proceed to checkout": closes the drawer, cart contents untouched.
pub async fn proceed(State(state): State<AppState>, Path(session): Path<String>) -> Result<Json<CartView>> {
    let session = SessionId::new(session)?;
    let cart = state.carts().mutate(&session, &mut |cart| cart.close_drawer());
    Ok(Json(CartView::from(&cart)))
}
