//! # Cart Client
//!
//! Typed async handle over the cart actor's mailbox. Cheap to clone (it
//! holds only a sender) and safe to share across tasks; the actor
//! serializes whatever arrives.

use crate::cart_actor::{CartError, CartRequest};
use crate::model::{CartEntry, CartLineId, MenuItemId};
use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Client for the cart actor.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub(crate) fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    /// Adds `quantity` of a menu item, merging into an existing line for
    /// the same item. Returns the resulting line.
    #[instrument(skip(self, special_instructions))]
    pub async fn add_item(
        &self,
        menu_item_id: MenuItemId,
        quantity: u32,
        special_instructions: Option<String>,
    ) -> Result<CartEntry, CartError> {
        debug!("Sending add_item to cart actor");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::Add {
                menu_item_id,
                quantity,
                special_instructions,
                respond_to,
            })
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)?
    }

    /// Sets a line's quantity to an absolute value >= 1. Use
    /// [`remove_item`](Self::remove_item) for deletion.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        line_id: CartLineId,
        quantity: u32,
    ) -> Result<CartEntry, CartError> {
        debug!("Sending update_quantity to cart actor");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::UpdateQuantity {
                line_id,
                quantity,
                respond_to,
            })
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)?
    }

    /// Deletes a line. Idempotent: removing an absent line is a no-op
    /// success.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, line_id: CartLineId) -> Result<(), CartError> {
        debug!("Sending remove_item to cart actor");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::Remove { line_id, respond_to })
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)?
    }

    /// Deletes every line owned by the current identity. Safe on an empty
    /// cart.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartError> {
        debug!("Sending clear to cart actor");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::Clear { respond_to })
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)?
    }

    /// Current cart contents.
    pub async fn entries(&self) -> Result<Vec<CartEntry>, CartError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::Entries { respond_to })
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)?
    }

    /// True sum of quantities across all lines (badge counts cap for
    /// display in the presentation layer, not here).
    pub async fn item_count(&self) -> Result<u32, CartError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::ItemCount { respond_to })
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)?
    }

    /// Cart total per the pricing rules.
    pub async fn total_price(&self) -> Result<Decimal, CartError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::TotalPrice { respond_to })
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)?
    }

    /// Re-fetches the cart from the store, replacing the local mirror.
    /// Reconciliation path for stale lines (e.g. after a failed
    /// post-checkout clear).
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Vec<CartEntry>, CartError> {
        debug!("Sending refresh to cart actor");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::Refresh { respond_to })
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)?
    }
}
