#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Persisted CLI configuration for the `RunAgents` client.
//!
//! Layout: `model.rs` (the record, its keys and masking helpers), `store.rs`
//! (file-backed load/save), `error.rs` (error taxonomy), `defaults.rs`
//! (built-in locations and values).

pub mod defaults;
pub mod error;
pub mod model;
pub mod store;

pub use defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_ENDPOINT};
pub use error::{ConfigError, ConfigResult};
pub use model::{ConfigKey, ConfigRecord, mask_secret};
pub use store::ConfigStore;
