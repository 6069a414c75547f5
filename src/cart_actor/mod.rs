//! # Cart Actor
//!
//! Single source of truth for the signed-in identity's cart. The actor owns
//! a local mirror of the user's cart lines (each joined with its menu item)
//! and mediates every read and mutation, keeping the mirror consistent with
//! the persistent store.
//!
//! # Architecture Note
//! The actor processes its mailbox sequentially, so cart mutations can never
//! interleave: two `add_item` calls racing for the same menu item are served
//! one after another, and the second merges into the line the first created
//! instead of inserting a duplicate. No locks, no lost merges.
//!
//! Mutations are store-first: the remote write happens before the mirror
//! changes, and the actor adopts the row the store returns rather than
//! trusting its own arithmetic. On a remote failure the mirror is untouched
//! and the caller sees [`CartError::Store`].
//!
//! Startup performs the initial cart fetch (one silent retry) before any
//! message is served; a doubly-failed fetch is logged and degrades to an
//! empty cart. There is no terminal error state.

use crate::clients::CartClient;
use crate::model::{CartEntry, CartLineId, CartLinePatch, MenuItemId, NewCartLine, UserId};
use crate::pricing;
use crate::store::{retry_read, with_timeout, PersistentStore, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub mod error;
pub mod message;

pub use error::CartError;
pub use message::{CartRequest, Respond};

/// The cart's owner task. Create with [`CartActor::new`], then spawn
/// [`CartActor::run`]; interact through the returned
/// [`CartClient`](crate::clients::CartClient).
pub struct CartActor {
    receiver: mpsc::Receiver<CartRequest>,
    store: Arc<dyn PersistentStore>,
    identity: Option<UserId>,
    entries: Vec<CartEntry>,
    store_timeout: Duration,
}

impl CartActor {
    /// Creates the actor and its client handle.
    ///
    /// `identity` is bound once at construction (explicit injection, no
    /// ambient lookup); `None` serves an empty read-only cart whose
    /// mutations fail with [`CartError::NotAuthenticated`].
    pub fn new(
        store: Arc<dyn PersistentStore>,
        identity: Option<UserId>,
        mailbox_capacity: usize,
        store_timeout: Duration,
    ) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(mailbox_capacity);
        let actor = Self {
            receiver,
            store,
            identity,
            entries: Vec::new(),
            store_timeout,
        };
        (actor, CartClient::new(sender))
    }

    /// Runs the actor's event loop: initial fetch first, then messages
    /// until every client handle is dropped.
    pub async fn run(mut self) {
        info!("Cart actor started");

        if let Some(user) = self.identity {
            self.load(user).await;
        } else {
            info!("No identity bound; cart is empty and rejects mutations");
        }

        while let Some(msg) = self.receiver.recv().await {
            self.handle(msg).await;
        }

        info!(lines = self.entries.len(), "Cart actor shutdown");
    }

    async fn load(&mut self, user: UserId) {
        let store = &self.store;
        let limit = self.store_timeout;
        match retry_read(|| with_timeout(limit, store.cart_list(&user))).await {
            Ok(entries) => {
                info!(user = %user, lines = entries.len(), "Cart loaded");
                self.entries = entries;
            }
            Err(e) => {
                error!(user = %user, error = %e, "Cart fetch failed twice, starting empty");
            }
        }
    }

    async fn handle(&mut self, msg: CartRequest) {
        match msg {
            CartRequest::Add {
                menu_item_id,
                quantity,
                special_instructions,
                respond_to,
            } => {
                debug!(item = %menu_item_id, quantity, "Add");
                let result = self.add(menu_item_id, quantity, special_instructions).await;
                match &result {
                    Ok(entry) => {
                        info!(line = %entry.line.id, quantity = entry.line.quantity, "Added");
                    }
                    Err(e) => warn!(item = %menu_item_id, error = %e, "Add failed"),
                }
                let _ = respond_to.send(result);
            }
            CartRequest::UpdateQuantity {
                line_id,
                quantity,
                respond_to,
            } => {
                debug!(line = %line_id, quantity, "UpdateQuantity");
                let result = self.update_quantity(line_id, quantity).await;
                match &result {
                    Ok(entry) => info!(line = %line_id, quantity = entry.line.quantity, "Updated"),
                    Err(e) => warn!(line = %line_id, error = %e, "Update failed"),
                }
                let _ = respond_to.send(result);
            }
            CartRequest::Remove { line_id, respond_to } => {
                debug!(line = %line_id, "Remove");
                let result = self.remove(line_id).await;
                match &result {
                    Ok(()) => info!(line = %line_id, lines = self.entries.len(), "Removed"),
                    Err(e) => warn!(line = %line_id, error = %e, "Remove failed"),
                }
                let _ = respond_to.send(result);
            }
            CartRequest::Clear { respond_to } => {
                debug!("Clear");
                let result = self.clear().await;
                match &result {
                    Ok(()) => info!("Cart cleared"),
                    Err(e) => warn!(error = %e, "Clear failed"),
                }
                let _ = respond_to.send(result);
            }
            CartRequest::Entries { respond_to } => {
                let _ = respond_to.send(Ok(self.entries.clone()));
            }
            CartRequest::ItemCount { respond_to } => {
                let count: u32 = self.entries.iter().map(|e| e.line.quantity).sum();
                debug!(count, "ItemCount");
                let _ = respond_to.send(Ok(count));
            }
            CartRequest::TotalPrice { respond_to } => {
                let total = pricing::cart_total(&self.entries);
                debug!(%total, "TotalPrice");
                let _ = respond_to.send(Ok(total));
            }
            CartRequest::Refresh { respond_to } => {
                debug!("Refresh");
                let result = self.refresh().await;
                if let Err(e) = &result {
                    warn!(error = %e, "Refresh failed");
                }
                let _ = respond_to.send(result);
            }
        }
    }

    async fn add(
        &mut self,
        menu_item_id: MenuItemId,
        quantity: u32,
        special_instructions: Option<String>,
    ) -> Result<CartEntry, CartError> {
        let user = self.identity.ok_or(CartError::NotAuthenticated)?;
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let limit = self.store_timeout;

        if let Some(pos) = self
            .entries
            .iter()
            .position(|e| e.line.menu_item_id == menu_item_id)
        {
            // Merge: one line per (user, menu item). The increment is
            // applied by the store against its current row.
            let line_id = self.entries[pos].line.id;
            let patch = CartLinePatch {
                add_quantity: Some(quantity),
                ..CartLinePatch::default()
            };
            let updated = with_timeout(limit, self.store.cart_update(&line_id, patch)).await?;
            self.entries[pos] = updated.clone();
            Ok(updated)
        } else {
            let store = &self.store;
            let item = retry_read(|| with_timeout(limit, store.menu_item_get(&menu_item_id)))
                .await
                .map_err(|e| match e {
                    StoreError::NotFound(_) => CartError::UnknownMenuItem(menu_item_id),
                    other => CartError::Store(other),
                })?;
            if !item.is_available {
                return Err(CartError::ItemUnavailable(menu_item_id));
            }
            let inserted = with_timeout(
                limit,
                self.store.cart_insert(NewCartLine {
                    user_id: user,
                    menu_item_id,
                    quantity,
                    special_instructions,
                }),
            )
            .await?;
            self.entries.push(inserted.clone());
            Ok(inserted)
        }
    }

    async fn update_quantity(
        &mut self,
        line_id: CartLineId,
        quantity: u32,
    ) -> Result<CartEntry, CartError> {
        if self.identity.is_none() {
            return Err(CartError::NotAuthenticated);
        }
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let pos = self
            .entries
            .iter()
            .position(|e| e.line.id == line_id)
            .ok_or(CartError::NotFound(line_id))?;
        let patch = CartLinePatch {
            set_quantity: Some(quantity),
            ..CartLinePatch::default()
        };
        match with_timeout(self.store_timeout, self.store.cart_update(&line_id, patch)).await {
            Ok(updated) => {
                self.entries[pos] = updated.clone();
                Ok(updated)
            }
            Err(StoreError::NotFound(_)) => {
                // Another session deleted the row; drop the stale mirror line.
                self.entries.remove(pos);
                Err(CartError::NotFound(line_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&mut self, line_id: CartLineId) -> Result<(), CartError> {
        if self.identity.is_none() {
            return Err(CartError::NotAuthenticated);
        }
        let Some(pos) = self.entries.iter().position(|e| e.line.id == line_id) else {
            // Already gone. Double-click races are a success, not an error.
            return Ok(());
        };
        match with_timeout(self.store_timeout, self.store.cart_delete(&line_id)).await {
            Ok(()) | Err(StoreError::NotFound(_)) => {
                self.entries.remove(pos);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&mut self) -> Result<(), CartError> {
        let user = self.identity.ok_or(CartError::NotAuthenticated)?;
        with_timeout(self.store_timeout, self.store.cart_clear(&user)).await?;
        self.entries.clear();
        Ok(())
    }

    async fn refresh(&mut self) -> Result<Vec<CartEntry>, CartError> {
        let Some(user) = self.identity else {
            return Ok(Vec::new());
        };
        let store = &self.store;
        let limit = self.store_timeout;
        let entries = retry_read(|| with_timeout(limit, store.cart_list(&user))).await?;
        self.entries = entries.clone();
        Ok(entries)
    }
}
