//! Bridge state.
//!
//! Collaborators are injected explicitly; an absent one means it was not
//! configured and requests needing it fail with `BackendUnavailable`.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Collaborator};
use crate::identity::IdentityBackend;
use crate::store::TokenStore;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct BridgeSettings {
    /// Public base URL of this service
    pub base_url: Url,
    /// Provider name passed to the identity backend (e.g. "github")
    pub provider: String,
    /// Lifetime in seconds used when the backend omits `expires_in`
    pub default_expires_in: i64,
    pub backend_timeout: Duration,
    pub store_timeout: Duration,
}

impl BridgeSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            provider: "github".to_string(),
            default_expires_in: 3600,
            backend_timeout: Duration::from_secs(10),
            store_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&BridgeConfig> for BridgeSettings {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            provider: config.provider.clone(),
            default_expires_in: config.default_expires_in,
            backend_timeout: config.backend_timeout(),
            store_timeout: config.store_timeout(),
        }
    }
}

#[derive(Clone)]
pub struct BridgeState {
    pub backend: Option<Arc<dyn IdentityBackend>>,
    pub store: Option<Arc<dyn TokenStore>>,
    pub settings: Arc<BridgeSettings>,
}

impl BridgeState {
    pub fn new(settings: BridgeSettings) -> Self {
        Self {
            backend: None,
            store: None,
            settings: Arc::new(settings),
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn IdentityBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub(crate) fn backend(&self) -> Result<&dyn IdentityBackend, BridgeError> {
        self.backend
            .as_deref()
            .ok_or(BridgeError::BackendUnavailable(Collaborator::IdentityBackend))
    }

    pub(crate) fn store(&self) -> Result<&dyn TokenStore, BridgeError> {
        self.store
            .as_deref()
            .ok_or(BridgeError::BackendUnavailable(Collaborator::TokenStore))
    }
}

impl std::fmt::Debug for BridgeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeState")
            .field("backend_configured", &self.backend.is_some())
            .field("store_configured", &self.store.is_some())
            .field("settings", &self.settings)
            .finish()
    }
}
