#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]

//! Logging primitives shared across the Sellerdesk workspace.
//!
//! Centralises tracing subscriber setup so the client library and the CLI
//! emit diagnostics the same way.

pub mod init;

pub use init::{
    DEFAULT_LOG_LEVEL, GlobalContextGuard, LogFormat, LoggingConfig, build_sha, init_logging,
};
