//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::{DesignStore, PgDesignStore};
use crate::services::DesignService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    designs: DesignService,
}

impl AppState {
    /// Create a new application state over the Postgres design store.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let store: Arc<dyn DesignStore> = Arc::new(PgDesignStore::new(pool.clone()));
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                designs: DesignService::new(store),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the design service.
    #[must_use]
    pub fn designs(&self) -> &DesignService {
        &self.inner.designs
    }
}
