//! Shared application state.

use std::sync::Arc;

use crate::broadcast::BroadcastHub;
use crate::catalog::Catalog;
use crate::config::ServerConfig;
use crate::directory::UserDirectory;
use crate::service::CartService;
use crate::store::CartStore;

/// Application state shared across all request handlers.
///
/// Cloning is cheap; the inner state lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    catalog: Arc<Catalog>,
    directory: Arc<UserDirectory>,
    hub: Arc<BroadcastHub>,
    service: CartService,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn CartStore>) -> Self {
        let catalog = Arc::new(Catalog::seeded());
        let directory = Arc::new(UserDirectory::seeded());
        let hub = Arc::new(BroadcastHub::new());
        let service = CartService::new(
            store,
            Arc::clone(&catalog),
            Arc::clone(&directory),
            Arc::clone(&hub),
        );
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                directory,
                hub,
                service,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn directory(&self) -> &UserDirectory {
        &self.inner.directory
    }

    #[must_use]
    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.inner.hub
    }

    #[must_use]
    pub fn service(&self) -> &CartService {
        &self.inner.service
    }
}
