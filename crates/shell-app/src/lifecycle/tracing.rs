//! # Logging setup
//!
//! Every layer logs through `tracing`:
//!
//! - the store actor logs start and stop with an `entity_type` field;
//! - actions open a span per call (`fetch_all`, `update{id=2}`, ...) and log the outcome;
//! - bus listeners run inside a `listener{topic=...}` span;
//! - the registry logs manifest fetches and failures per module;
//! - boot logs each step as it completes.
//!
//! ```bash
//! RUST_LOG=info cargo run      # boot steps and outcomes
//! RUST_LOG=debug cargo run     # plus every publish and store write
//! ```

/// Installs the global subscriber. Call once, from the binary.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
