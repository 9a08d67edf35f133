//! Quote cart route handlers.
//!
//! The cart itself is a pure state container ([`QuoteCart`]); these
//! handlers are its session plumbing. Every mutation loads the cart from
//! the session, applies one mutator, and writes it back. Last write
//! wins, which is acceptable for a single shopper's cart.

use axum::{Json, extract::Path, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use crate::cart::{BlankItemInput, CustomItemInput, LineItem, QuoteCart, SizeRun};
use crate::error::{AppError, Result};
use crate::models::session_keys;

/// Cart summary returned from every cart endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<LineItem>,
    pub total_items: u32,
    pub subtotal: Decimal,
    pub item_count: usize,
}

impl From<&QuoteCart> for CartSummary {
    fn from(cart: &QuoteCart) -> Self {
        Self {
            items: cart.items().to_vec(),
            total_items: cart.total_items(),
            subtotal: cart.subtotal(),
            item_count: cart.item_count(),
        }
    }
}

/// Response for item-adding endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAddedResponse {
    pub item_id: Uuid,
    pub cart: CartSummary,
}

/// Request to set an item's quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

/// Request to replace an item's size run.
///
/// `unit_price` accompanies blank items whose tier breakpoint moved with
/// the new quantity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSizesRequest {
    pub sizes: SizeRun,
    pub unit_price: Option<Decimal>,
}

/// Load the cart from the session, empty if none is stored.
async fn load_cart(session: &Session) -> Result<QuoteCart> {
    let cart = session
        .get::<QuoteCart>(session_keys::QUOTE_CART)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?
        .unwrap_or_default();
    Ok(cart)
}

/// Write the cart back to the session.
async fn save_cart(session: &Session, cart: &QuoteCart) -> Result<()> {
    session
        .insert(session_keys::QUOTE_CART, cart)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))
}

/// Show the cart.
///
/// GET /cart
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartSummary>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartSummary::from(&cart)))
}

/// Add a custom print item.
///
/// POST /cart/items/custom
#[instrument(skip(session, input))]
pub async fn add_custom(
    session: Session,
    Json(input): Json<CustomItemInput>,
) -> Result<impl IntoResponse> {
    let mut cart = load_cart(&session).await?;
    let item_id = cart.add_custom_item(input);
    save_cart(&session, &cart).await?;

    Ok((
        StatusCode::CREATED,
        Json(ItemAddedResponse {
            item_id,
            cart: CartSummary::from(&cart),
        }),
    ))
}

/// Add a blank garment item.
///
/// POST /cart/items/blank
#[instrument(skip(session, input))]
pub async fn add_blank(
    session: Session,
    Json(input): Json<BlankItemInput>,
) -> Result<impl IntoResponse> {
    let mut cart = load_cart(&session).await?;
    let item_id = cart.add_blank_item(input);
    save_cart(&session, &cart).await?;

    Ok((
        StatusCode::CREATED,
        Json(ItemAddedResponse {
            item_id,
            cart: CartSummary::from(&cart),
        }),
    ))
}

/// Set an item's quantity, scaling its size run proportionally.
///
/// POST /cart/items/{id}/quantity
#[instrument(skip(session))]
pub async fn update_quantity(
    session: Session,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<CartSummary>> {
    let mut cart = load_cart(&session).await?;
    if !cart.update_quantity(id, req.quantity) {
        return Err(AppError::NotFound(format!("cart item {id}")));
    }
    save_cart(&session, &cart).await?;
    Ok(Json(CartSummary::from(&cart)))
}

/// Replace an item's size run, optionally re-tiering the unit price.
///
/// POST /cart/items/{id}/sizes
#[instrument(skip(session, req))]
pub async fn update_sizes(
    session: Session,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSizesRequest>,
) -> Result<Json<CartSummary>> {
    let mut cart = load_cart(&session).await?;
    let found = match req.unit_price {
        Some(unit_price) => cart.update_blank_item_sizes(id, req.sizes, unit_price),
        None => cart.update_sizes(id, req.sizes),
    };
    if !found {
        return Err(AppError::NotFound(format!("cart item {id}")));
    }
    save_cart(&session, &cart).await?;
    Ok(Json(CartSummary::from(&cart)))
}

/// Remove an item. No-op if the id is unknown.
///
/// DELETE /cart/items/{id}
#[instrument(skip(session))]
pub async fn remove(session: Session, Path(id): Path<Uuid>) -> Result<Json<CartSummary>> {
    let mut cart = load_cart(&session).await?;
    cart.remove_item(id);
    save_cart(&session, &cart).await?;
    Ok(Json(CartSummary::from(&cart)))
}

/// Empty the cart.
///
/// POST /cart/clear
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartSummary>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;
    Ok(Json(CartSummary::from(&cart)))
}
