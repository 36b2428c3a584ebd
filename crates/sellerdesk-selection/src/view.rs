//! Client-side filter and sort for the collected-products list.

use std::cmp::Ordering;
use std::str::FromStr;

use sellerdesk_api_models::Record;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::ProductView;

/// Which rows survive the match filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchFilter {
    /// Every row.
    #[default]
    All,
    /// Rows with a secondary-marketplace match attached.
    Matched,
    /// Rows still waiting for a match.
    Unmatched,
}

impl MatchFilter {
    fn keeps(self, product: &ProductView<'_>) -> bool {
        match self {
            Self::All => true,
            Self::Matched => product.is_matched(),
            Self::Unmatched => !product.is_matched(),
        }
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest collection date first; undated rows last.
    #[default]
    Date,
    /// Highest price first; unpriced rows last.
    Price,
    /// Title ascending.
    Name,
}

impl SortKey {
    fn compare(self, left: &ProductView<'_>, right: &ProductView<'_>) -> Ordering {
        match self {
            Self::Date => descending_some_first(left.collected_at(), right.collected_at()),
            Self::Price => descending_some_first(left.price(), right.price()),
            Self::Name => left.title().cmp(right.title()),
        }
    }
}

fn descending_some_first<T: Ord>(left: Option<T>, right: Option<T>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Error returned when a filter or sort name is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownOption {
    kind: &'static str,
    value: String,
}

impl FromStr for MatchFilter {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "matched" => Ok(Self::Matched),
            "unmatched" => Ok(Self::Unmatched),
            _ => Err(UnknownOption {
                kind: "filter",
                value: value.to_string(),
            }),
        }
    }
}

impl FromStr for SortKey {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "price" => Ok(Self::Price),
            "name" => Ok(Self::Name),
            _ => Err(UnknownOption {
                kind: "sort",
                value: value.to_string(),
            }),
        }
    }
}

/// Filter plus sort for one list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Row filter.
    pub filter: MatchFilter,
    /// Row ordering.
    pub sort: SortKey,
}

impl ListQuery {
    /// Filtered and sorted copy of `records`.
    #[must_use]
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        filter_sort(
            records,
            |record| self.filter.keeps(&ProductView::new(record)),
            |left, right| {
                self.sort
                    .compare(&ProductView::new(left), &ProductView::new(right))
            },
        )
    }
}

/// Keep the items matching `keep` and stable-sort them with `compare`.
#[must_use]
pub fn filter_sort<T, P, C>(items: &[T], keep: P, compare: C) -> Vec<T>
where
    T: Clone,
    P: Fn(&T) -> bool,
    C: Fn(&T, &T) -> Ordering,
{
    let mut kept: Vec<T> = items.iter().filter(|item| keep(item)).cloned().collect();
    kept.sort_by(|left, right| compare(left, right));
    kept
}

/// Partition into `(smartstore, other)` keeping relative order.
#[must_use]
pub fn split_smartstore(records: &[Record]) -> (Vec<Record>, Vec<Record>) {
    records
        .iter()
        .cloned()
        .partition(|record| ProductView::new(record).is_smartstore())
}
