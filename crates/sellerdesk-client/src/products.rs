//! Product search, collection, matching and SEO calls.

use sellerdesk_api_models::{
    BatchMatchRequest, BatchMatchResponse, CollectKind, CollectRequest, Confirmation, ImageMatch,
    ImageMatchRequest, ProductListResponse, Record, SearchRequest, SeoRequest, SeoResponse,
};
use sellerdesk_selection::{Selection, normalize_all, record_id, split_smartstore};
use serde_json::Value;
use tracing::{debug, info};

use crate::endpoints;
use crate::error::{ApiError, ApiResult};
use crate::http::ApiClient;
use crate::request::ApiRequest;
use crate::sequence::RequestSequencer;

/// Normalized search results, split by storefront type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    /// Listings hosted on a smartstore.
    pub smartstore: Vec<Record>,
    /// Every other listing.
    pub other: Vec<Record>,
}

impl SearchResults {
    fn from_products(products: &[Record]) -> Self {
        let (smartstore, other) = split_smartstore(&normalize_all(products));
        Self { smartstore, other }
    }

    /// Total number of listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.smartstore.len() + self.other.len()
    }

    /// Whether the search found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every listing, smartstore first.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.smartstore.iter().chain(&self.other)
    }

    /// Selected listings as collect payload items, in display order.
    #[must_use]
    pub fn selected_items(&self, selection: &Selection<String>) -> Vec<Value> {
        self.iter()
            .filter(|record| record_id(record).is_some_and(|id| selection.contains(&id)))
            .map(|record| Value::Object(record.clone()))
            .collect()
    }
}

/// Search screen state: only the newest search may deliver results.
#[derive(Debug, Clone)]
pub struct SearchView {
    api: ApiClient,
    sequencer: RequestSequencer,
}

impl SearchView {
    /// View issuing searches through `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            sequencer: RequestSequencer::new(),
        }
    }

    /// Run a search and return its outcome, or `Ok(None)` when a later
    /// search started on this view before this one finished.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::search`], for the newest search only.
    pub async fn search(&self, keyword: &str) -> ApiResult<Option<SearchResults>> {
        let ticket = self.sequencer.issue();
        let outcome = self.api.search(keyword).await;
        if !self.sequencer.is_current(ticket) {
            debug!(keyword, "discarding superseded search");
            return Ok(None);
        }
        outcome.map(Some)
    }
}

fn require_products(operation: &'static str, body: ProductListResponse) -> ApiResult<Vec<Record>> {
    body.products
        .ok_or_else(|| ApiError::data_shape(operation, "missing `products` list"))
}

impl ApiClient {
    /// Keyword search.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank keyword, `DataShape` when the response has no
    /// product list, or the wrapper's failure.
    pub async fn search(&self, keyword: &str) -> ApiResult<SearchResults> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ApiError::validation("search keyword must not be empty"));
        }
        let uid = self.require_uid()?;
        let request = ApiRequest::post("search", endpoints::SEARCH).json(&SearchRequest {
            keyword: keyword.to_string(),
            uid,
        })?;
        let products = require_products("search", self.send_json(&request).await?)?;
        let results = SearchResults::from_products(&products);
        info!(results = results.len(), "search finished");
        Ok(results)
    }

    /// Persist the selected listings to the user's collection.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty selection, or the wrapper's failure.
    pub async fn collect(
        &self,
        selected_items: Vec<Value>,
        kind: Option<CollectKind>,
    ) -> ApiResult<Confirmation> {
        if selected_items.is_empty() {
            return Err(ApiError::validation("select at least one item to collect"));
        }
        let count = selected_items.len();
        let request = ApiRequest::post("collect", endpoints::COLLECT).json(&CollectRequest {
            uid: self.require_uid()?,
            selected_items,
            kind,
        })?;
        let confirmation = self.send_json(&request).await?;
        info!(count, "items collected");
        Ok(confirmation)
    }

    /// Products in the user's collection, normalized.
    ///
    /// # Errors
    ///
    /// `DataShape` when the response has no product list, or the wrapper's
    /// failure.
    pub async fn collected_products(&self) -> ApiResult<Vec<Record>> {
        let request = ApiRequest::get("collected_products", endpoints::COLLECTED_PRODUCTS);
        let products = require_products("collected_products", self.send_json(&request).await?)?;
        Ok(normalize_all(&products))
    }

    /// Match collected products against the secondary marketplace.
    ///
    /// Returns partial records to fold into the held list with
    /// `merge_updates`.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty id list, `DataShape` when the response has no
    /// `matched_products`, or the wrapper's failure.
    pub async fn batch_match(&self, product_ids: Vec<String>) -> ApiResult<Vec<Record>> {
        if product_ids.is_empty() {
            return Err(ApiError::validation("select at least one product to match"));
        }
        let request = ApiRequest::post("batch_match", endpoints::BATCH_MATCH).json(
            &BatchMatchRequest {
                uid: self.require_uid()?,
                product_ids,
            },
        )?;
        let response: BatchMatchResponse = self.send_json(&request).await?;
        response
            .matched_products
            .ok_or_else(|| ApiError::data_shape("batch_match", "missing `matched_products` list"))
    }

    /// Find one listing by image.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank URL, or the wrapper's failure.
    pub async fn match_image(&self, image_url: &str) -> ApiResult<ImageMatch> {
        let image_url = image_url.trim();
        if image_url.is_empty() {
            return Err(ApiError::validation("image URL must not be empty"));
        }
        let request = ApiRequest::post("match_image", endpoints::IMAGE_MATCH).json(
            &ImageMatchRequest {
                image_url: image_url.to_string(),
            },
        )?;
        self.send_json(&request).await
    }

    /// Generate an SEO title for one collected product.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank id, `DataShape` when no title comes back, or
    /// the wrapper's failure.
    pub async fn generate_seo(&self, product_id: &str) -> ApiResult<String> {
        let product_id = product_id.trim();
        if product_id.is_empty() {
            return Err(ApiError::validation("product id must not be empty"));
        }
        let request = ApiRequest::post("generate_seo", endpoints::GENERATE_SEO).json(
            &SeoRequest {
                uid: self.require_uid()?,
                product_id: product_id.to_string(),
            },
        )?;
        let response: SeoResponse = self.send_json(&request).await?;
        response
            .seo_title
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| ApiError::data_shape("generate_seo", "missing `seo_title`"))
    }
}
