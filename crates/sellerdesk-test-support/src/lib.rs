#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]

//! Shared test helpers used across crate test suites.
//! Layout: fixtures.rs (canned server payloads), session.rs (pre-seeded session stores).

pub mod fixtures;
pub mod session;
