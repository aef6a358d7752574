//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::config::MiniShopConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and gives access to the
/// configuration and the shop API client (with its query cache).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: MiniShopConfig,
    api: ApiClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the API HTTP client cannot be built.
    pub fn new(config: MiniShopConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    /// Get a reference to the console configuration.
    #[must_use]
    pub fn config(&self) -> &MiniShopConfig {
        &self.inner.config
    }

    /// Get a reference to the shop API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}
