//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use sellerdesk_api_models::{ImageMatch, Market, Record};
use sellerdesk_client::SearchResults;
use sellerdesk_selection::ProductView;
use sellerdesk_session::AuthPhase;
use serde::Serialize;
use serde_json::{Value, json};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_products(records: &[Record], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(records)?,
        OutputFormat::Table => print_product_table(records),
    }
    Ok(())
}

pub(crate) fn render_search(results: &SearchResults, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({
            "smartstore": results.smartstore,
            "other": results.other,
        }))?,
        OutputFormat::Table => {
            println!("smartstore ({})", results.smartstore.len());
            print_product_table(&results.smartstore);
            println!();
            println!("other ({})", results.other.len());
            print_product_table(&results.other);
        }
    }
    Ok(())
}

fn print_product_table(records: &[Record]) {
    println!(
        "{:<24} {:>10} {:>8} {:>8} {:<5} TITLE",
        "ID", "PRICE", "REVIEWS", "SOLD", "MATCH"
    );
    for record in records {
        let product = ProductView::new(record);
        println!(
            "{:<24} {:>10} {:>8} {:>8} {:<5} {}",
            product.id().unwrap_or_else(|| "-".to_string()),
            format_price(product.price()),
            product.review_count(),
            product.purchase_count(),
            if product.is_matched() { "yes" } else { "no" },
            display_title(&product)
        );
    }
}

pub(crate) fn render_markets(markets: &[Market], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(markets)?,
        OutputFormat::Table => {
            println!(
                "{:<20} {:<12} {:>10} {:<11} URL",
                "NAME", "GRADE", "CUSTOMERS", "M/F"
            );
            for market in markets {
                let split = market.gender_ratio.map_or_else(
                    || "-".to_string(),
                    |ratio| format!("{:.0}/{:.0}", ratio.male, ratio.female),
                );
                println!(
                    "{:<20} {:<12} {:>10} {:<11} {}",
                    market.mall_name,
                    market.mall_grade.as_deref().unwrap_or("-"),
                    market
                        .customer_count
                        .map_or_else(|| "-".to_string(), group_thousands),
                    split,
                    market.mall_url
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn render_image_match(found: &ImageMatch, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(found)?,
        OutputFormat::Table => {
            println!("title: {}", found.title.as_deref().unwrap_or("-"));
            println!("price: {}", found.price.as_ref().map_or_else(|| "-".to_string(), scalar_text));
            println!("shop: {}", found.shop_name.as_deref().unwrap_or("-"));
            if let Some(image) = &found.main_image_url {
                println!("image: {image}");
            }
        }
    }
    Ok(())
}

pub(crate) fn render_status(
    phase: AuthPhase,
    uid: Option<&str>,
    profile: Option<&Value>,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({
            "phase": phase.to_string(),
            "uid": uid,
            "profile": profile,
        }))?,
        OutputFormat::Table => {
            println!("phase: {phase}");
            if let Some(uid) = uid {
                println!("uid: {uid}");
            }
            if let Some(name) = profile.and_then(profile_name) {
                println!("name: {name}");
            }
        }
    }
    Ok(())
}

fn display_title<'a>(product: &ProductView<'a>) -> &'a str {
    product.seo_title().unwrap_or_else(|| product.title())
}

fn profile_name(profile: &Value) -> Option<&str> {
    ["name", "email"]
        .into_iter()
        .find_map(|field| profile.get(field).and_then(Value::as_str))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Price with thousands separators, `-` when unknown.
pub(crate) fn format_price(price: Option<u64>) -> String {
    price.map_or_else(|| "-".to_string(), group_thousands)
}

pub(crate) fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_thousands_inserts_separators() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(45_000), "45,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(format_price(None), "-");
    }

    #[test]
    fn seo_title_wins_over_listing_title() {
        let record = json!({"title": "Blender", "seo_title": "Quiet 1L blender"});
        let record = record.as_object().expect("object");
        assert_eq!(display_title(&ProductView::new(record)), "Quiet 1L blender");
    }

    #[test]
    fn profile_name_falls_back_to_email() {
        assert_eq!(profile_name(&json!({"email": "kim@example.com"})), Some("kim@example.com"));
        assert_eq!(profile_name(&json!({"name": "Kim", "email": "k@x"})), Some("Kim"));
        assert_eq!(profile_name(&json!({})), None);
    }
}
