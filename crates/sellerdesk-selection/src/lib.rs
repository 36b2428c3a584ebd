#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]

//! Pure list-state helpers shared by every list view.
//!
//! Layout:
//! - `selection.rs`: multi-select set for bulk actions
//! - `merge.rs`: folding partial server results back into a held list
//! - `normalize.rs`: canonicalising raw product records
//! - `product.rs`: typed read view over a normalized record
//! - `view.rs`: client-side filter and sort

pub mod merge;
pub mod normalize;
pub mod product;
pub mod selection;
pub mod view;

pub use merge::{Mergeable, merge_updates};
pub use normalize::{normalize, normalize_all, parse_digits, record_id};
pub use product::{ProductView, is_truthy};
pub use selection::Selection;
pub use view::{ListQuery, MatchFilter, SortKey, UnknownOption, filter_sort, split_smartstore};
