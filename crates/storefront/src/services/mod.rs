//! Business logic services for storefront.
//!
//! # Services
//!
//! - `designs` - Design creation, share resolution, and forking
//! - `share_link` - Shareable URL construction from request headers

pub mod designs;
pub mod share_link;

pub use designs::{CreateDesign, DesignError, DesignService, MAX_MINT_ATTEMPTS};
pub use share_link::{share_base_url, share_url};
