//! Canonicalising raw product records.
//!
//! Listings come from several scrapers and use inconsistent field names and
//! number formats. `normalize` rewrites the canonical fields and leaves every
//! other field untouched, so it is idempotent.

use sellerdesk_api_models::Record;
use serde_json::Value;

/// Fields that carry a record's identity.
pub(crate) const ID_FIELDS: [&str; 2] = ["id", "_id"];

const TITLE_FIELDS: [&str; 2] = ["title", "product_title"];
const IMAGE_FIELDS: [&str; 2] = ["image_url", "imageUrl"];
const COUNTER_FIELDS: [&str; 2] = ["review_count", "purchase_count"];

/// Parse an integer by discarding every non-digit character.
///
/// `"12,345원"` parses as `12345`. Returns `None` when no digits remain or the
/// value does not fit in a `u64`.
#[must_use]
pub fn parse_digits(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Identity of a record as a string: `id`, else `_id`.
///
/// Numeric ids are stringified and `{"$oid": ".."}` documents unwrapped.
#[must_use]
pub fn record_id(record: &Record) -> Option<String> {
    ID_FIELDS
        .iter()
        .filter_map(|field| record.get(*field))
        .find_map(id_text)
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Object(map) => map.get("$oid").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn first_present<'a>(record: &'a Record, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| record.get(*field))
        .find(|value| !value.is_null())
}

fn count_value(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|float| *float >= 0.0).map(|float| float as u64))
            .unwrap_or(0),
        Some(Value::String(text)) => parse_digits(text).unwrap_or(0),
        _ => 0,
    }
}

/// Canonical form of a raw product record.
///
/// - `id` ← `id` | `_id` (first present wins)
/// - `title` ← `title` | `product_title`
/// - `image_url` ← `image_url` | `imageUrl`
/// - `price`: strings are reduced to their digits; numbers are kept; a string
///   without digits removes the field
/// - `review_count`, `purchase_count`: integers, defaulting to zero
#[must_use]
pub fn normalize(raw: &Record) -> Record {
    let mut record = raw.clone();

    if let Some(id) = record_id(raw) {
        record.insert("id".into(), Value::String(id));
    }
    if let Some(title) = first_present(raw, &TITLE_FIELDS) {
        record.insert("title".into(), title.clone());
    }
    if let Some(image) = first_present(raw, &IMAGE_FIELDS) {
        record.insert("image_url".into(), image.clone());
    }

    match raw.get("price") {
        Some(Value::String(text)) => match parse_digits(text) {
            Some(price) => {
                record.insert("price".into(), Value::from(price));
            }
            None => {
                record.remove("price");
            }
        },
        Some(Value::Null) => {
            record.remove("price");
        }
        _ => {}
    }

    for field in COUNTER_FIELDS {
        record.insert(field.into(), Value::from(count_value(raw.get(field))));
    }

    record
}

/// Normalize every record in order.
#[must_use]
pub fn normalize_all(raw: &[Record]) -> Vec<Record> {
    raw.iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn price_strings_keep_only_digits() {
        let normalized = normalize(&record(json!({"id": "p", "price": "12,345원"})));
        assert_eq!(normalized["price"], json!(12345));

        let numeric = normalize(&record(json!({"id": "p", "price": 9000})));
        assert_eq!(numeric["price"], json!(9000));

        let blank = normalize(&record(json!({"id": "p", "price": "가격문의"})));
        assert!(blank.get("price").is_none());
    }

    #[test]
    fn aliased_fields_take_first_present() {
        let normalized = normalize(&record(json!({
            "_id": "m1",
            "product_title": "Mug",
            "imageUrl": "https://img.example/m.jpg"
        })));
        assert_eq!(normalized["id"], json!("m1"));
        assert_eq!(normalized["title"], json!("Mug"));
        assert_eq!(normalized["image_url"], json!("https://img.example/m.jpg"));
        assert_eq!(normalized["_id"], json!("m1"));

        let both = normalize(&record(json!({"id": "a", "_id": "b", "title": "T", "product_title": "P"})));
        assert_eq!(both["id"], json!("a"));
        assert_eq!(both["title"], json!("T"));
    }

    #[test]
    fn counters_default_to_zero() {
        let normalized = normalize(&record(json!({
            "id": "p",
            "review_count": "1,024",
            "purchase_count": null
        })));
        assert_eq!(normalized["review_count"], json!(1024));
        assert_eq!(normalized["purchase_count"], json!(0));

        let floats = normalize(&record(json!({"id": "p", "review_count": 12.7})));
        assert_eq!(floats["review_count"], json!(12));
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = record(json!({
            "_id": {"$oid": "65f0"},
            "product_title": "Lamp",
            "price": "₩ 3,900",
            "review_count": "7",
            "mall_name": "shop"
        }));
        let once = normalize(&raw);
        let twice = normalize(&once);
        assert_eq!(once, twice);
        assert_eq!(once["id"], json!("65f0"));
        assert_eq!(once["mall_name"], json!("shop"));
    }

    #[test]
    fn record_id_stringifies_numbers() {
        assert_eq!(record_id(&record(json!({"id": 42}))), Some("42".into()));
        assert_eq!(record_id(&record(json!({"id": "", "_id": "x"}))), Some("x".into()));
        assert_eq!(record_id(&record(json!({"title": "none"}))), None);
    }

    #[test]
    fn parse_digits_handles_edge_cases() {
        assert_eq!(parse_digits("1 2 3"), Some(123));
        assert_eq!(parse_digits("none"), None);
        assert_eq!(parse_digits("99999999999999999999999"), None);
    }
}
