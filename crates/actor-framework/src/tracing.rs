//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide `tracing` subscriber.
//!
//! Output is the compact fmt layer without module targets; resource actors and
//! session hubs tag their lines with `entity_type` / `session_type` instead.
//! Verbosity comes from `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run     # lifecycle: stored, updated, session opened/expired
//! RUST_LOG=debug cargo run    # full payloads of every request and event
//! ```
//!
//! With `RUST_LOG=info` a single order reads like:
//!
//! ```text
//! INFO Hub started session_type="ConversationSession" idle_timeout=600s
//! INFO Stored entity_type="CustomerProfile" id=4242 replaced=false size=1
//! INFO Stage changed chat_id=4242 from=Quantity to=AddMoreItems
//! INFO Stored entity_type="OrderRecord" id=202610191830000001 replaced=false size=1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
