//! Typed read view over a normalized product record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sellerdesk_api_models::Record;
use serde_json::Value;

use crate::normalize::record_id;

/// Borrowed accessors for the fields list views care about.
#[derive(Debug, Clone, Copy)]
pub struct ProductView<'a> {
    record: &'a Record,
}

impl<'a> ProductView<'a> {
    /// Wrap a record; call `normalize` first for canonical field names.
    #[must_use]
    pub const fn new(record: &'a Record) -> Self {
        Self { record }
    }

    fn text(&self, field: &str) -> Option<&'a str> {
        self.record.get(field).and_then(Value::as_str)
    }

    /// Record identity.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        record_id(self.record)
    }

    /// Display title, empty when absent.
    #[must_use]
    pub fn title(&self) -> &'a str {
        self.text("title").unwrap_or_default()
    }

    /// Price in whole currency units.
    #[must_use]
    pub fn price(&self) -> Option<u64> {
        self.record.get("price").and_then(|value| {
            value
                .as_u64()
                .or_else(|| value.as_f64().filter(|price| *price >= 0.0).map(|price| price as u64))
        })
    }

    /// Seller storefront.
    #[must_use]
    pub fn mall_name(&self) -> Option<&'a str> {
        self.text("mall_name")
    }

    /// Listing URL.
    #[must_use]
    pub fn product_url(&self) -> Option<&'a str> {
        self.text("product_url")
    }

    /// Generated SEO title.
    #[must_use]
    pub fn seo_title(&self) -> Option<&'a str> {
        self.text("seo_title")
    }

    /// Review counter.
    #[must_use]
    pub fn review_count(&self) -> u64 {
        self.record
            .get("review_count")
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// Purchase counter.
    #[must_use]
    pub fn purchase_count(&self) -> u64 {
        self.record
            .get("purchase_count")
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// Whether the listing is hosted on a smartstore.
    #[must_use]
    pub fn is_smartstore(&self) -> bool {
        self.record.get("is_smartstore").is_some_and(is_truthy)
    }

    /// Whether a secondary-marketplace match is attached.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.record.get("taobaoMatch").is_some_and(is_truthy)
    }

    /// When the product was collected, if the timestamp parses.
    #[must_use]
    pub fn collected_at(&self) -> Option<DateTime<Utc>> {
        self.text("collection_date").and_then(parse_timestamp)
    }
}

/// Loose truthiness used by server flags that may be bools, numbers, strings
/// or embedded documents.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|float| float != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}
