//! Integration tests for `SwarmCart`.
//!
//! Everything runs in-process: the cart service is built against the
//! in-memory store (or a temp-file JSON store for persistence tests) and
//! the axum router is driven through `tower::ServiceExt::oneshot`, so no
//! network or external service is needed.
//!
//! # Test Categories
//!
//! - `cart_flow` - Collaborative shopping scenarios through the service
//! - `rest_api` - HTTP surface, status codes, and wire shapes
//! - `persistence` - JSON file store across restarts
//! - `realtime` - Broadcast ordering and topic isolation

use std::sync::Arc;

use swarmcart_server::broadcast::BroadcastHub;
use swarmcart_server::catalog::Catalog;
use swarmcart_server::directory::UserDirectory;
use swarmcart_server::service::CartService;
use swarmcart_server::store::{CartStore, MemoryStore};

/// Shared handles for one in-process test environment.
pub struct TestContext {
    pub service: CartService,
    pub hub: Arc<BroadcastHub>,
    pub catalog: Arc<Catalog>,
}

impl TestContext {
    /// Build a context over a fresh in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Build a context over an arbitrary store.
    #[must_use]
    pub fn with_store(store: Arc<dyn CartStore>) -> Self {
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
            service,
            hub,
            catalog,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
