//! # System Lifecycle
//!
//! Wires the storefront together: spawns the cart actor, hands out the
//! typed clients and readers, and coordinates graceful shutdown. Components
//! receive their dependencies (store, cart client, identity) as explicit
//! constructor parameters; nothing is discovered through ambient lookup.

pub mod system;
pub mod tracing;

pub use system::{Storefront, StorefrontConfig};
pub use tracing::setup_tracing;
