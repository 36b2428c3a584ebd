//! Tracked-market commands.

use sellerdesk_api_models::{CollectKind, Confirmation, MarketDraft};
use sellerdesk_selection::record_id;
use sellerdesk_session::Route;
use serde_json::Value;

use crate::cli::{MarketDraftArgs, MarketIdArgs, MarketReverseArgs, MarketUpdateArgs};
use crate::client::{AppContext, CliResult};
use crate::commands::products::select_known;
use crate::output::{render_markets, render_products};

impl From<MarketDraftArgs> for MarketDraft {
    fn from(args: MarketDraftArgs) -> Self {
        Self {
            mall_name: args.name,
            mall_url: args.url,
        }
    }
}

fn print_confirmation(confirmation: &Confirmation, fallback: &str) {
    println!("{}", confirmation.message.as_deref().unwrap_or(fallback));
}

pub(crate) async fn handle_market_list(ctx: &AppContext) -> CliResult<()> {
    ctx.enter(Route::Markets).await?;
    let markets = ctx.api.markets().await?;
    render_markets(&markets, ctx.output)
}

pub(crate) async fn handle_market_add(ctx: &AppContext, args: MarketDraftArgs) -> CliResult<()> {
    ctx.enter(Route::Markets).await?;
    let confirmation = ctx.api.add_market(&args.into()).await?;
    print_confirmation(&confirmation, "market added");
    Ok(())
}

pub(crate) async fn handle_market_update(ctx: &AppContext, args: MarketUpdateArgs) -> CliResult<()> {
    ctx.enter(Route::Markets).await?;
    let confirmation = ctx
        .api
        .update_market(&args.market_id, &args.draft.into())
        .await?;
    print_confirmation(&confirmation, "market updated");
    Ok(())
}

pub(crate) async fn handle_market_delete(ctx: &AppContext, args: MarketIdArgs) -> CliResult<()> {
    ctx.enter(Route::Markets).await?;
    let confirmation = ctx.api.delete_market(&args.market_id).await?;
    print_confirmation(&confirmation, "market deleted");
    Ok(())
}

pub(crate) async fn handle_market_reverse(
    ctx: &AppContext,
    args: MarketReverseArgs,
) -> CliResult<()> {
    ctx.enter(Route::Markets).await?;
    let listings = ctx.api.reverse_market(&args.market_id).await?;
    render_products(&listings, ctx.output)?;

    if args.collect.is_empty() {
        return Ok(());
    }
    let selection = select_known(&listings, args.collect)?;
    let items: Vec<_> = selection
        .pick(&listings, record_id)
        .into_iter()
        .map(|record| Value::Object(record.clone()))
        .collect();
    let count = items.len();
    ctx.api.collect(items, Some(CollectKind::Market)).await?;
    println!("collected {count} listing(s)");
    Ok(())
}
