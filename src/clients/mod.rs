//! Type-safe client handles hiding the message-passing plumbing.

pub mod cart_client;

pub use cart_client::CartClient;
