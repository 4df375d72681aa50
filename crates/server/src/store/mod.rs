//! The cart store: single source of truth for carts.
//!
//! The service depends only on the [`CartStore`] capability trait, keeping
//! it pure of storage concerns. Two backends ship here:
//!
//! - [`MemoryStore`] - in-process map, used when no data path is configured
//!   and throughout the test suite
//! - [`JsonFileStore`] - memory map snapshotted to a JSON file after every
//!   write, so the embedded item/activity arrays round-trip losslessly
//!   across restarts
//!
//! The unit of atomicity is one cart record: `put` replaces the whole cart.
//! Per-cart write serialization is the service's job, not the store's.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use swarmcart_core::{CartId, UserId};

use crate::models::Cart;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Capability interface over cart persistence.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Fetch a cart by ID.
    async fn get(&self, id: &CartId) -> Result<Option<Cart>, StoreError>;

    /// Insert or replace a cart. The whole record is the unit of atomicity.
    async fn put(&self, cart: Cart) -> Result<(), StoreError>;

    /// Fetch the cart holding a given invite code.
    async fn get_by_invite_code(&self, code: &str) -> Result<Option<Cart>, StoreError>;

    /// All carts where the user is a member, oldest first.
    async fn list_by_member(&self, user_id: &UserId) -> Result<Vec<Cart>, StoreError>;
}
