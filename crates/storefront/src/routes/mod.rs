//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Liveness check
//! GET    /health/ready              - Readiness check (pings database)
//!
//! # Designs (JSON API)
//! GET    /designs/share/{share_id}  - Resolve a public share link (no auth)
//! POST   /designs/{share_id}/fork   - Fork a shared design (auth optional)
//! POST   /designs                   - Save a design (auth required)
//! GET    /designs                   - List own designs, newest first (auth required)
//! DELETE /designs?id={id}           - Delete an owned design (auth required)
//!
//! # Quote cart (session-backed JSON API)
//! GET    /cart                      - Cart summary
//! POST   /cart/items/custom         - Add a custom print item
//! POST   /cart/items/blank          - Add a blank garment item
//! POST   /cart/items/{id}/quantity  - Set quantity (scales size run)
//! POST   /cart/items/{id}/sizes     - Replace size run (optionally re-tier price)
//! DELETE /cart/items/{id}           - Remove an item
//! POST   /cart/clear                - Empty the cart
//! ```

pub mod cart;
pub mod designs;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the design routes router.
pub fn design_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(designs::create)
                .get(designs::list)
                .delete(designs::remove),
        )
        .route("/share/{share_id}", get(designs::share))
        .route("/{share_id}/fork", post(designs::fork))
}

/// Create the quote cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items/custom", post(cart::add_custom))
        .route("/items/blank", post(cart::add_blank))
        .route(
            "/items/{id}",
            axum::routing::delete(cart::remove),
        )
        .route("/items/{id}/quantity", post(cart::update_quantity))
        .route("/items/{id}/sizes", post(cart::update_sizes))
        .route("/clear", post(cart::clear))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/designs", design_routes())
        .nest("/cart", cart_routes())
}
