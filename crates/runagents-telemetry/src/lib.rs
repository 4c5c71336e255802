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

//! Logging setup shared by the `RunAgents` binaries.
//!
//! Diagnostics are written to stderr so that command output on stdout can be
//! piped or parsed without interference.

pub mod init;

pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, VERBOSE_LOG_LEVEL, init_logging};
