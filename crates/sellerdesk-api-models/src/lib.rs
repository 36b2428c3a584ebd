#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
//! Shared HTTP DTOs for the Sellerdesk API.
//!
//! The remote service owns search, scraping, matching, SEO generation and
//! spreadsheet export. These types only describe the payloads the client
//! sends and the shapes it expects back. Product listings are kept as loose
//! JSON records because the server adds fields over time and list views merge
//! partial responses into them field by field.
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Loose JSON object used for product listings and partial updates.
pub type Record = Map<String, Value>;

/// Error document returned by the API on non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Primary error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Alternate message field used by some endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best available human-readable message, ignoring blank strings.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Generic acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Confirmation {
    /// Optional human-readable acknowledgement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Any additional fields the server chose to include.
    #[serde(flatten)]
    pub extra: Record,
}

/// `POST /login` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account e-mail.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// `POST /login` success body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    /// Opaque user identifier scoping every protected call.
    pub uid: String,
    /// Cached profile snapshot, when the server returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
    /// Access token, when the server issues one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Refresh token, when the server issues one.
    #[serde(
        default,
        alias = "refreshToken",
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_token: Option<String>,
}

/// `POST /signup` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignupRequest {
    /// Account e-mail.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Display name.
    pub name: String,
}

/// `POST /refresh_token` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshRequest {
    /// Refresh token held in durable storage.
    pub refresh_token: String,
}

/// `POST /refresh_token` success body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshResponse {
    /// Newly issued access token.
    pub token: String,
}

/// `POST /search` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text keyword.
    pub keyword: String,
    /// Requesting user.
    pub uid: String,
}

/// Any response carrying a `products` array.
///
/// The array is optional here so the client can report a missing list as a
/// data-shape failure instead of a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductListResponse {
    /// Product listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Record>>,
}

/// Origin of a collection request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CollectKind {
    /// Items picked from keyword search results.
    Product,
    /// Items picked from a market scrape.
    Market,
}

/// `POST /collect` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectRequest {
    /// Requesting user.
    pub uid: String,
    /// Selected listings (full records or bare ids).
    pub selected_items: Vec<Value>,
    /// Where the selection came from.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CollectKind>,
}

/// `POST /batch_taobao_match` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchMatchRequest {
    /// Requesting user.
    pub uid: String,
    /// Collected product ids to match.
    #[serde(rename = "productIds")]
    pub product_ids: Vec<String>,
}

/// `POST /batch_taobao_match` success body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BatchMatchResponse {
    /// Partial product records carrying match results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_products: Option<Vec<Record>>,
}

/// `POST /taobao_match` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageMatchRequest {
    /// Image to match against the secondary marketplace.
    pub image_url: String,
}

/// Listing found on the secondary marketplace.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageMatch {
    /// Listing title.
    #[serde(default)]
    pub title: Option<String>,
    /// Listing price as sent by the server.
    #[serde(default)]
    pub price: Option<Value>,
    /// Seller shop name.
    #[serde(default, rename = "shopName")]
    pub shop_name: Option<String>,
    /// Primary listing image.
    #[serde(default, rename = "mainImageUrl")]
    pub main_image_url: Option<String>,
}

/// `POST /generate_seo` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeoRequest {
    /// Requesting user.
    pub uid: String,
    /// Collected product id.
    pub product_id: String,
}

/// `POST /generate_seo` success body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeoResponse {
    /// Generated SEO title.
    #[serde(default)]
    pub seo_title: Option<String>,
}

/// Gender split reported by a market scrape, in percent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct GenderRatio {
    /// Male share.
    #[serde(default)]
    pub male: f64,
    /// Female share.
    #[serde(default)]
    pub female: f64,
}

/// Seller storefront tracked by the user.
///
/// Markets are keyed by `mall_name`; the API uses it as the market id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Market {
    /// Storefront name.
    #[serde(rename = "mallName")]
    pub mall_name: String,
    /// Storefront URL.
    #[serde(rename = "mallUrl", default)]
    pub mall_url: String,
    /// Seller grade label.
    #[serde(
        rename = "mallGrade",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub mall_grade: Option<String>,
    /// Customer count.
    #[serde(
        rename = "customerCount",
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_count: Option<u64>,
    /// Gender split.
    #[serde(
        rename = "genderRatio",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub gender_ratio: Option<GenderRatio>,
    /// Age bracket to percentage.
    #[serde(rename = "ageGroups", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub age_groups: BTreeMap<String, f64>,
}

/// Editable fields of a market.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarketDraft {
    /// Storefront name.
    #[serde(rename = "mallName")]
    pub mall_name: String,
    /// Storefront URL.
    #[serde(rename = "mallUrl")]
    pub mall_url: String,
}

/// `GET /get_market_db` success body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarketListResponse {
    /// Markets tracked by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markets: Option<Vec<Market>>,
}

/// `POST /add_market` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddMarketRequest {
    /// Requesting user.
    pub uid: String,
    /// Market to add.
    #[serde(rename = "marketData")]
    pub market_data: MarketDraft,
}

/// `PUT /update_market` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateMarketRequest {
    /// Requesting user.
    pub uid: String,
    /// Market being edited.
    #[serde(rename = "marketId")]
    pub market_id: String,
    /// Replacement values.
    #[serde(rename = "marketData")]
    pub market_data: MarketDraft,
}

/// Body shared by `DELETE /delete_market` and `POST /market_reversing`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarketRef {
    /// Requesting user.
    pub uid: String,
    /// Target market.
    #[serde(rename = "marketId")]
    pub market_id: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) => {
            let digits: String = text.chars().filter(char::is_ascii_digit).collect();
            digits.parse().ok()
        }
        _ => None,
    })
}
