//! Canned server payloads shaped like the live backend's responses.

use sellerdesk_api_models::Record;
use serde_json::{Value, json};

fn object(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

/// Collected products with aliased ids/titles, formatted prices, mixed match
/// state and mixed date formats.
#[must_use]
pub fn collected_products() -> Vec<Record> {
    [
        json!({
            "id": "c1",
            "title": "Blender",
            "price": "45,000원",
            "is_smartstore": true,
            "taobaoMatch": {"title": "blender", "price": "¥120"},
            "collection_date": "2024-05-02 09:00:00"
        }),
        json!({
            "id": "c2",
            "product_title": "Desk lamp",
            "price": 89000,
            "is_smartstore": false,
            "collection_date": "2024-04-30"
        }),
        json!({
            "_id": "c3",
            "title": "Cable",
            "price": 12000,
            "taobaoMatch": {"title": "cable"},
            "collection_date": "2024-05-03T12:00:00Z"
        }),
        json!({
            "id": "c4",
            "title": "Apron",
            "price": "가격문의",
            "is_smartstore": 1,
            "taobaoMatch": null
        }),
    ]
    .into_iter()
    .map(object)
    .collect()
}

/// Raw `/search` response body.
#[must_use]
pub fn search_response() -> Value {
    json!({
        "products": [
            {"_id": "s1", "product_title": "Tumbler", "price": "9,900", "imageUrl": "https://img.example/s1.jpg", "review_count": "12"},
            {"id": "s2", "title": "Thermos", "price": 21000, "image_url": "https://img.example/s2.jpg"}
        ]
    })
}

/// Raw `/get_market_db` response body.
#[must_use]
pub fn markets_response() -> Value {
    json!({
        "markets": [
            {
                "mallName": "daily-home",
                "mallUrl": "https://smartstore.example/daily-home",
                "mallGrade": "Power",
                "customerCount": "1,204",
                "genderRatio": {"male": 35.0, "female": 65.0},
                "ageGroups": {"20s": 40.0, "30s": 45.0, "40s": 15.0}
            },
            {
                "mallName": "gear-box",
                "mallUrl": "https://smartstore.example/gear-box"
            }
        ]
    })
}
