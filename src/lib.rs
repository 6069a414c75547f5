//! # Storefront Core
//!
//! Cart/checkout orchestration core for a mobile ordering storefront:
//! in-memory cart state owned by a single actor, synchronization with a
//! persistent remote store, exact price computation, and the multi-step
//! order-placement sequence with explicit partial-failure semantics.
//!
//! ## Core Components
//!
//! - **[cart_actor]**: the Cart Store, an actor owning the signed-in
//!   identity's cart, serializing every read and mutation.
//! - **[clients]**: the typed [`CartClient`](clients::CartClient) handle.
//! - **[checkout]**: the order-placement orchestrator, the only multi-step
//!   write sequence in the system.
//! - **[pricing]**: pure currency math (2 decimals, half-up).
//! - **[store]**: the [`PersistentStore`](store::PersistentStore) seam and
//!   the in-memory [`MemoryStore`](store::MemoryStore).
//! - **[catalog] / [history]**: read-only menu and order views.
//! - **[lifecycle]**: session wiring ([`Storefront`](lifecycle::Storefront))
//!   and tracing setup.

pub mod cart_actor;
pub mod catalog;
pub mod checkout;
pub mod clients;
pub mod history;
pub mod lifecycle;
pub mod model;
pub mod pricing;
pub mod store;
