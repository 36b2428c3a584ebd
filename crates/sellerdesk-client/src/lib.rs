#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]

//! HTTP access to the Sellerdesk API.
//!
//! Layout:
//! - `http.rs`: the wrapper every call goes through (identity injection,
//!   bearer token, single-shot 401 refresh-and-replay)
//! - `request.rs`: replayable request descriptor
//! - `auth.rs`: session manager (login, signup, logout, session check)
//! - `bootstrap.rs`: startup sequencing and the connectivity probe
//! - `products.rs`, `markets.rs`, `export.rs`: domain calls
//! - `sequence.rs`: stale-response guard for list views

pub mod auth;
pub mod bootstrap;
pub mod endpoints;
pub mod error;
pub mod export;
pub mod http;
pub mod markets;
pub mod products;
pub mod request;
pub mod sequence;

pub use auth::SessionManager;
pub use bootstrap::Bootstrapper;
pub use error::{ApiError, ApiResult};
pub use export::default_export_name;
pub use http::ApiClient;
pub use products::{SearchResults, SearchView};
pub use request::ApiRequest;
pub use sequence::{RequestSequencer, Ticket};
