#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]

//! Client configuration for the Sellerdesk workspace.
//!
//! Layout: `model.rs` (typed configuration), `loader.rs` (environment
//! loading), `validate.rs` (field parsing), `defaults.rs` (fallback values).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ENV_API_URL, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_SESSION_PATH, ENV_TIMEOUT_SECS};
pub use model::{ClientConfig, LogFormatSetting};
