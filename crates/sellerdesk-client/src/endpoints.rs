//! Paths of the remote API, relative to the configured base URL.

/// Credential exchange.
pub const LOGIN: &str = "/login";
/// Account registration.
pub const SIGNUP: &str = "/signup";
/// Access-token renewal.
pub const REFRESH_TOKEN: &str = "/refresh_token";
/// Profile of the current identity.
pub const WHO_AM_I: &str = "/user-info";
/// Connectivity probe.
pub const PING: &str = "/ping";
/// Keyword search.
pub const SEARCH: &str = "/search";
/// Persist selected items.
pub const COLLECT: &str = "/collect";
/// Products collected by the current user.
pub const COLLECTED_PRODUCTS: &str = "/get_collected_products";
/// Batch secondary-marketplace matching.
pub const BATCH_MATCH: &str = "/batch_taobao_match";
/// Single match by image.
pub const IMAGE_MATCH: &str = "/taobao_match";
/// SEO title generation.
pub const GENERATE_SEO: &str = "/generate_seo";
/// Spreadsheet export.
pub const EXPORT: &str = "/download_heyseller";
/// Market list.
pub const MARKETS: &str = "/get_market_db";
/// Market creation.
pub const ADD_MARKET: &str = "/add_market";
/// Market update.
pub const UPDATE_MARKET: &str = "/update_market";
/// Market removal.
pub const DELETE_MARKET: &str = "/delete_market";
/// Storefront scrape.
pub const REVERSE_MARKET: &str = "/market_reversing";
