//! Market CRUD and storefront scraping.
//!
//! The API identifies a market by its `mallName`.

use sellerdesk_api_models::{
    AddMarketRequest, Confirmation, Market, MarketDraft, MarketListResponse, MarketRef,
    ProductListResponse, Record, UpdateMarketRequest,
};
use sellerdesk_selection::normalize_all;
use tracing::info;

use crate::endpoints;
use crate::error::{ApiError, ApiResult};
use crate::http::ApiClient;
use crate::request::ApiRequest;

fn check_draft(draft: &MarketDraft) -> ApiResult<MarketDraft> {
    let mall_name = draft.mall_name.trim();
    let mall_url = draft.mall_url.trim();
    match (mall_name.is_empty(), mall_url.is_empty()) {
        (false, false) => Ok(MarketDraft {
            mall_name: mall_name.to_string(),
            mall_url: mall_url.to_string(),
        }),
        (true, true) => Err(ApiError::validation("market name and URL must not be empty")),
        (true, false) => Err(ApiError::validation("market name must not be empty")),
        (false, true) => Err(ApiError::validation("market URL must not be empty")),
    }
}

fn check_market_id(market_id: &str) -> ApiResult<String> {
    let market_id = market_id.trim();
    if market_id.is_empty() {
        return Err(ApiError::validation("market id must not be empty"));
    }
    Ok(market_id.to_string())
}

impl ApiClient {
    /// Markets tracked by the user.
    ///
    /// # Errors
    ///
    /// `DataShape` when the response has no `markets` list, or the wrapper's
    /// failure.
    pub async fn markets(&self) -> ApiResult<Vec<Market>> {
        let request = ApiRequest::get("markets", endpoints::MARKETS);
        let response: MarketListResponse = self.send_json(&request).await?;
        response
            .markets
            .ok_or_else(|| ApiError::data_shape("markets", "missing `markets` list"))
    }

    /// Start tracking a market.
    ///
    /// # Errors
    ///
    /// `Validation` when the name or URL is blank, or the wrapper's failure.
    pub async fn add_market(&self, draft: &MarketDraft) -> ApiResult<Confirmation> {
        let market_data = check_draft(draft)?;
        let request = ApiRequest::post("add_market", endpoints::ADD_MARKET).json(
            &AddMarketRequest {
                uid: self.require_uid()?,
                market_data,
            },
        )?;
        let confirmation = self.send_json(&request).await?;
        info!("market added");
        Ok(confirmation)
    }

    /// Replace a market's name and URL.
    ///
    /// # Errors
    ///
    /// `Validation` for blank input, or the wrapper's failure.
    pub async fn update_market(
        &self,
        market_id: &str,
        draft: &MarketDraft,
    ) -> ApiResult<Confirmation> {
        let market_id = check_market_id(market_id)?;
        let market_data = check_draft(draft)?;
        let request = ApiRequest::put("update_market", endpoints::UPDATE_MARKET).json(
            &UpdateMarketRequest {
                uid: self.require_uid()?,
                market_id,
                market_data,
            },
        )?;
        self.send_json(&request).await
    }

    /// Stop tracking a market. The id travels in the JSON body.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank id, or the wrapper's failure.
    pub async fn delete_market(&self, market_id: &str) -> ApiResult<Confirmation> {
        let request = ApiRequest::delete("delete_market", endpoints::DELETE_MARKET).json(
            &MarketRef {
                uid: self.require_uid()?,
                market_id: check_market_id(market_id)?,
            },
        )?;
        let confirmation = self.send_json(&request).await?;
        info!("market deleted");
        Ok(confirmation)
    }

    /// Scrape a market's storefront, returning normalized listings.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank id, `DataShape` when no product list comes
    /// back, or the wrapper's failure.
    pub async fn reverse_market(&self, market_id: &str) -> ApiResult<Vec<Record>> {
        let request = ApiRequest::post("reverse_market", endpoints::REVERSE_MARKET).json(
            &MarketRef {
                uid: self.require_uid()?,
                market_id: check_market_id(market_id)?,
            },
        )?;
        let response: ProductListResponse = self.send_json(&request).await?;
        let products = response
            .products
            .ok_or_else(|| ApiError::data_shape("reverse_market", "missing `products` list"))?;
        info!(results = products.len(), "market scraped");
        Ok(normalize_all(&products))
    }
}
