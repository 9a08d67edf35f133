//! Shared domain types.

pub mod id;
pub mod price;
pub mod share_id;

pub use id::{DesignId, UserId};
pub use price::{PriceTier, tier_unit_price};
pub use share_id::{SHARE_ID_LEN, ShareId, ShareIdError};
