//! The cart service: mutation orchestration.
//!
//! Every mutation follows the same shape: validate input, lock the cart,
//! mutate, recompute suggestions and the health score, persist, then
//! broadcast the enriched cart. Persistence failures abort before any
//! broadcast; broadcast failures never surface to the caller.
//!
//! All mutating operations against one cart are serialized through a
//! per-cart mutex so two simultaneous adds cannot lose an update. Reads
//! take a plain snapshot from the store and never hold a cart lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::Utc;
use rand::Rng;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{info, instrument};
use uuid::Uuid;

use swarmcart_core::{CartId, ItemId, ProductId, SuggestionId, UserId};

use crate::broadcast::{BroadcastHub, ServerEvent};
use crate::catalog::Catalog;
use crate::directory::UserDirectory;
use crate::engine;
use crate::error::{AppError, Result};
use crate::models::cart::{ActivityEntry, ActivityKind, Cart, CartItem};
use crate::models::suggestion::Suggestion;
use crate::models::view::CartView;
use crate::store::CartStore;

/// Invite-code alphabet; ambiguous glyphs (0/O, 1/I) left out.
const INVITE_CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const INVITE_CODE_LEN: usize = 6;

/// Orchestrates all cart mutations.
pub struct CartService {
    store: Arc<dyn CartStore>,
    catalog: Arc<Catalog>,
    directory: Arc<UserDirectory>,
    hub: Arc<BroadcastHub>,
    locks: StdMutex<HashMap<CartId, Arc<AsyncMutex<()>>>>,
}

impl CartService {
    /// Create a new cart service.
    #[must_use]
    pub fn new(
        store: Arc<dyn CartStore>,
        catalog: Arc<Catalog>,
        directory: Arc<UserDirectory>,
        hub: Arc<BroadcastHub>,
    ) -> Self {
        Self {
            store,
            catalog,
            directory,
            hub,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Create a cart owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty name, `NotFound` for an unknown owner.
    #[instrument(skip(self))]
    pub async fn create_cart(&self, owner_id: UserId, name: &str) -> Result<CartView> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("cart name is required".to_owned()));
        }
        let owner = self
            .directory
            .get(&owner_id)
            .ok_or_else(|| AppError::NotFound(format!("user {owner_id}")))?;

        let cart_id = CartId::new(Uuid::new_v4().to_string());
        let invite_code = self.unique_invite_code().await?;

        let mut cart = Cart {
            id: cart_id.clone(),
            name: name.to_owned(),
            owner_id: owner_id.clone(),
            members: vec![owner_id.clone()],
            items: Vec::new(),
            invite_code,
            created_at: Utc::now(),
            activity: Vec::new(),
            suggestions: Vec::new(),
            optimization_score: 100,
        };
        cart.push_activity(activity(
            ActivityKind::CartCreated,
            &owner_id,
            format!("{} created the cart", owner.name),
            None,
        ));

        info!(cart_id = %cart_id, owner = %owner_id, "Cart created");
        self.persist_and_broadcast(cart).await
    }

    /// Fetch one enriched cart.
    ///
    /// # Errors
    ///
    /// `NotFound` if the cart does not exist.
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<CartView> {
        let cart = self.fetch(cart_id).await?;
        Ok(self.enrich(&cart))
    }

    /// Join a cart via invite code. Idempotent for existing members.
    ///
    /// # Errors
    ///
    /// `NotFound` if the code matches no cart or the user is unknown.
    #[instrument(skip(self))]
    pub async fn join_cart(&self, invite_code: &str, user_id: UserId) -> Result<CartView> {
        let code = invite_code.trim();
        if code.is_empty() {
            return Err(AppError::InvalidInput("invite code is required".to_owned()));
        }
        let user = self
            .directory
            .get(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user {user_id}")))?
            .clone();

        let found = self
            .store
            .get_by_invite_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("invite code {code}")))?;

        let _guard = self.lock_cart(&found.id).await;
        let mut cart = self.fetch(&found.id).await?;

        if cart.is_member(&user_id) {
            // Already in: no duplicate membership, activity, or broadcast.
            return Ok(self.enrich(&cart));
        }

        cart.members.push(user_id.clone());
        cart.push_activity(activity(
            ActivityKind::MemberJoined,
            &user_id,
            format!("{} joined the cart", user.name),
            None,
        ));

        info!(cart_id = %cart.id, user = %user_id, "Member joined");
        let member_count = cart.members.len();
        let cart_id = cart.id.clone();
        let view = self.persist_and_broadcast(cart).await?;

        let joined = ServerEvent::MemberJoined {
            cart_id: cart_id.clone(),
            user_id,
            member_count,
        };
        self.hub.publish_cart(&cart_id, &joined);
        self.hub.publish_global(&joined);

        Ok(view)
    }

    /// Add a product to a cart.
    ///
    /// Adding a product already in the cart increments that line's quantity;
    /// no new line is created and duplicate detection stays silent (it is
    /// about *different* products sharing a category). A genuinely new line
    /// runs the immediate duplicate check and pushes its result to
    /// subscribers, separate from the recomputed suggestion list.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a zero quantity, `NotFound` for an unknown cart or
    /// product.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        cart_id: &CartId,
        product_id: &ProductId,
        quantity: u32,
        user_id: UserId,
    ) -> Result<CartView> {
        if quantity == 0 {
            return Err(AppError::InvalidInput(
                "quantity must be positive".to_owned(),
            ));
        }
        let product = self
            .catalog
            .get(product_id)
            .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?
            .clone();

        let _guard = self.lock_cart(cart_id).await;
        let mut cart = self.fetch(cart_id).await?;

        let duplicate = if let Some(existing) = cart.find_item_by_product(product_id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            None
        } else {
            let notice = engine::detect_duplicate(&cart.items, &product, &self.catalog);
            cart.items.push(CartItem {
                id: ItemId::new(Uuid::new_v4().to_string()),
                product_id: product_id.clone(),
                quantity,
                added_by: user_id.clone(),
                added_at: Utc::now(),
                merged: false,
            });
            notice
        };

        cart.push_activity(activity(
            ActivityKind::ItemAdded,
            &user_id,
            format!(
                "{} added {quantity}× {}",
                self.display_name(&user_id),
                product.name
            ),
            Some(&product),
        ));
        self.refresh(&mut cart);

        info!(cart_id = %cart_id, product = %product_id, quantity, "Item added");
        let view = self.persist_and_broadcast(cart).await?;

        // Pushed only after the confirmed persist, like every other event.
        if let Some(suggestion) = duplicate {
            self.hub.publish_cart(
                cart_id,
                &ServerEvent::Suggestion {
                    cart_id: cart_id.clone(),
                    suggestion,
                },
            );
        }

        Ok(view)
    }

    /// Remove an item from a cart.
    ///
    /// The activity entry is attributed to the requesting user, falling back
    /// to whoever originally added the item.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown cart or item.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        cart_id: &CartId,
        item_id: &ItemId,
        user_id: Option<UserId>,
    ) -> Result<CartView> {
        let _guard = self.lock_cart(cart_id).await;
        let mut cart = self.fetch(cart_id).await?;

        let index = cart
            .items
            .iter()
            .position(|item| &item.id == item_id)
            .ok_or_else(|| AppError::NotFound(format!("item {item_id}")))?;
        let removed = cart.items.remove(index);

        let actor = user_id.unwrap_or_else(|| removed.added_by.clone());
        let product = self.catalog.get(&removed.product_id).cloned();
        let product_name = product
            .as_ref()
            .map_or_else(|| "an item".to_owned(), |p| p.name.clone());

        cart.push_activity(activity(
            ActivityKind::ItemRemoved,
            &actor,
            format!("{} removed {product_name}", self.display_name(&actor)),
            product.as_ref(),
        ));
        self.refresh(&mut cart);

        info!(cart_id = %cart_id, item = %item_id, "Item removed");
        self.persist_and_broadcast(cart).await
    }

    /// Consolidate every item in the accepted product's category into one
    /// merged line carrying the summed quantity (minimum 1).
    ///
    /// The whole suggestion list is recomputed afterwards; the collapsed
    /// category no longer qualifies for a merge, so the accepted suggestion
    /// cannot reappear.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown cart or accepted product.
    #[instrument(skip(self))]
    pub async fn apply_merge(
        &self,
        cart_id: &CartId,
        suggestion_id: &SuggestionId,
        accepted_product_id: &ProductId,
        user_id: UserId,
    ) -> Result<CartView> {
        let accepted = self
            .catalog
            .get(accepted_product_id)
            .ok_or_else(|| AppError::NotFound(format!("product {accepted_product_id}")))?
            .clone();

        let _guard = self.lock_cart(cart_id).await;
        let mut cart = self.fetch(cart_id).await?;

        let mut absorbed_quantity = 0u32;
        let mut absorbed_count = 0usize;
        cart.items.retain(|item| {
            let same_category = self
                .catalog
                .get(&item.product_id)
                .is_some_and(|product| product.category == accepted.category);
            if same_category {
                absorbed_quantity = absorbed_quantity.saturating_add(item.quantity);
                absorbed_count += 1;
            }
            !same_category
        });

        cart.items.push(CartItem {
            id: ItemId::new(Uuid::new_v4().to_string()),
            product_id: accepted_product_id.clone(),
            quantity: absorbed_quantity.max(1),
            added_by: user_id.clone(),
            added_at: Utc::now(),
            merged: true,
        });

        cart.suggestions.retain(|s| s.id() != suggestion_id);
        cart.push_activity(activity(
            ActivityKind::ItemsMerged,
            &user_id,
            format!(
                "{} merged {absorbed_count} {} items into {}",
                self.display_name(&user_id),
                accepted.category,
                accepted.name
            ),
            Some(&accepted),
        ));
        self.refresh(&mut cart);

        info!(
            cart_id = %cart_id,
            product = %accepted_product_id,
            absorbed = absorbed_count,
            "Merge applied"
        );
        self.persist_and_broadcast(cart).await
    }

    /// Recompute the suggestion list without mutating the cart.
    ///
    /// # Errors
    ///
    /// `NotFound` if the cart does not exist.
    pub async fn optimize(&self, cart_id: &CartId) -> Result<Vec<Suggestion>> {
        let cart = self.fetch(cart_id).await?;
        Ok(engine::recompute(&cart.items, &self.catalog))
    }

    /// All carts where the user is a member, oldest first, enriched.
    ///
    /// # Errors
    ///
    /// `Store` if the backing store fails.
    pub async fn user_carts(&self, user_id: &UserId) -> Result<Vec<CartView>> {
        let carts = self.store.list_by_member(user_id).await?;
        Ok(carts.iter().map(|cart| self.enrich(cart)).collect())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn fetch(&self, cart_id: &CartId) -> Result<Cart> {
        self.store
            .get(cart_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("cart {cart_id}")))
    }

    /// Recompute suggestions and the health score after a structural change.
    fn refresh(&self, cart: &mut Cart) {
        cart.suggestions = engine::recompute(&cart.items, &self.catalog);
        cart.optimization_score = engine::optimization_score(&cart.items, &self.catalog);
    }

    /// Persist, then enrich, then broadcast to the cart topic and the
    /// global fallback. Store failures propagate before anything is sent.
    async fn persist_and_broadcast(&self, cart: Cart) -> Result<CartView> {
        let cart_id = cart.id.clone();
        self.store.put(cart.clone()).await?;

        let view = self.enrich(&cart);
        let event = ServerEvent::CartUpdated { cart: view.clone() };
        self.hub.publish_cart(&cart_id, &event);
        self.hub.publish_global(&event);
        Ok(view)
    }

    fn enrich(&self, cart: &Cart) -> CartView {
        CartView::enrich(cart, &self.catalog, &self.directory)
    }

    fn display_name(&self, user_id: &UserId) -> String {
        self.directory
            .get(user_id)
            .map_or_else(|| user_id.to_string(), |user| user.name.clone())
    }

    /// Serialize all mutations per cart.
    async fn lock_cart(&self, cart_id: &CartId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().expect("cart lock map poisoned");
            Arc::clone(
                locks
                    .entry(cart_id.clone())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    async fn unique_invite_code(&self) -> Result<String> {
        // Collisions are negligible in a 32^6 space, but cheap to rule out.
        loop {
            let code = generate_invite_code();
            if self.store.get_by_invite_code(&code).await?.is_none() {
                return Ok(code);
            }
        }
    }
}

fn generate_invite_code() -> String {
    let mut rng = rand::rng();
    (0..INVITE_CODE_LEN)
        .map(|_| {
            let index = rng.random_range(0..INVITE_CODE_CHARSET.len());
            char::from(INVITE_CODE_CHARSET[index])
        })
        .collect()
}

fn activity(
    kind: ActivityKind,
    user_id: &UserId,
    message: String,
    product: Option<&swarmcart_core::Product>,
) -> ActivityEntry {
    ActivityEntry {
        kind,
        user_id: user_id.clone(),
        message,
        product_name: product.map(|p| p.name.clone()),
        product_emoji: product.map(|p| p.emoji.clone()),
        timestamp: Utc::now(),
    }
}
