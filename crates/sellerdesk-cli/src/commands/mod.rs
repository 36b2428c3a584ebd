//! Command handlers grouped by concern.

pub(crate) mod auth;
pub(crate) mod markets;
pub(crate) mod products;
