//! Domain models for storefront.

pub mod design;
pub mod session;

pub use design::{DEFAULT_DESIGN_NAME, Design, DesignPatch, DesignView, NewDesign, fork_name};
pub use session::{CurrentUser, keys as session_keys};
