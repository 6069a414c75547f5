//! Observability setup for the storefront.
//!
//! Structured logging with the `tracing` crate. Log level is configured
//! via the `RUST_LOG` environment variable:
//!
//! ```bash
//! RUST_LOG=info cargo run      # Compact logs
//! RUST_LOG=debug cargo run     # Full request payloads
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Module paths add noise; the fields carry context
        .compact()
        .init();
}
