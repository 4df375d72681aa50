//! JSON file-backed cart store.
//!
//! Keeps the full cart table in memory and writes a whole-file JSON
//! snapshot on every mutation, before the in-memory table is updated. The
//! snapshot is written to a temporary sibling file and renamed into place,
//! so a crash mid-write leaves the previous snapshot intact, and a failed
//! write surfaces as `StoreError` with reads still on the previous state.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use swarmcart_core::{CartId, UserId};

use crate::models::Cart;

use super::{CartStore, MemoryStore, StoreError};

/// Cart store persisted as a single JSON snapshot file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open a file store, loading the existing snapshot if one exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the existing snapshot cannot be read or
    /// parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let carts = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Vec<Cart>>(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };

        tracing::info!(path = %path.display(), carts = carts.len(), "Loaded cart snapshot");

        Ok(Self {
            path,
            inner: MemoryStore::with_carts(carts),
        })
    }

    /// Snapshot file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_snapshot(&self, snapshot: &[Cart]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CartStore for JsonFileStore {
    async fn get(&self, id: &CartId) -> Result<Option<Cart>, StoreError> {
        self.inner.get(id).await
    }

    async fn put(&self, cart: Cart) -> Result<(), StoreError> {
        // Write the snapshot with the new state first; the live table is
        // only updated once the file is durably in place, so a failed
        // write leaves reads on the previous state.
        let mut snapshot = self.inner.snapshot().await;
        match snapshot.iter_mut().find(|existing| existing.id == cart.id) {
            Some(slot) => *slot = cart.clone(),
            None => snapshot.push(cart.clone()),
        }
        self.write_snapshot(&snapshot).await?;
        self.inner.put(cart).await
    }

    async fn get_by_invite_code(&self, code: &str) -> Result<Option<Cart>, StoreError> {
        self.inner.get_by_invite_code(code).await
    }

    async fn list_by_member(&self, user_id: &UserId) -> Result<Vec<Cart>, StoreError> {
        self.inner.list_by_member(user_id).await
    }
}
