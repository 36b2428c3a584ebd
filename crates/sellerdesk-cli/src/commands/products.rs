//! Search, collection, matching, SEO and export commands.

use sellerdesk_api_models::{CollectKind, Record};
use sellerdesk_selection::{ListQuery, Selection, merge_updates, record_id};
use sellerdesk_session::Route;
use tracing::warn;

use crate::cli::{CollectedArgs, ExportArgs, MatchBatchArgs, MatchImageArgs, SearchArgs, SeoArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_image_match, render_products, render_search};

/// Selection over `records` holding the requested ids that are present.
pub(crate) fn select_known(records: &[Record], requested: Vec<String>) -> CliResult<Selection<String>> {
    let requested_count = requested.len();
    let mut selection = Selection::new();
    selection.select_all(requested);

    let known: Vec<String> = records.iter().filter_map(record_id).collect();
    selection.retain_known(&known);

    if selection.is_empty() {
        return Err(CliError::validation("none of the given ids are in the list"));
    }
    if selection.len() < requested_count {
        warn!(
            requested = requested_count,
            found = selection.len(),
            "some ids are not in the list"
        );
    }
    Ok(selection)
}

pub(crate) async fn handle_search(ctx: &AppContext, args: SearchArgs) -> CliResult<()> {
    ctx.enter(Route::Search).await?;
    let Some(results) = ctx.search.search(&args.keyword).await? else {
        return Ok(());
    };
    render_search(&results, ctx.output)?;

    if args.collect.is_empty() {
        return Ok(());
    }
    let listed: Vec<Record> = results.iter().cloned().collect();
    let selection = select_known(&listed, args.collect)?;
    let items = results.selected_items(&selection);
    let count = items.len();
    ctx.api.collect(items, Some(CollectKind::Product)).await?;
    println!("collected {count} item(s)");
    Ok(())
}

pub(crate) async fn handle_collected(ctx: &AppContext, args: CollectedArgs) -> CliResult<()> {
    ctx.enter(Route::Collected).await?;
    let products = ctx.api.collected_products().await?;
    let query = ListQuery {
        filter: args.filter,
        sort: args.sort,
    };
    render_products(&query.apply(&products), ctx.output)
}

pub(crate) async fn handle_match_batch(ctx: &AppContext, args: MatchBatchArgs) -> CliResult<()> {
    ctx.enter(Route::Collected).await?;
    let products = ctx.api.collected_products().await?;
    let selection = select_known(&products, args.ids)?;

    let ids = selection.ordered_in(&products, record_id);
    let updates = ctx.api.batch_match(ids).await?;
    let merged = merge_updates(&products, &updates, record_id);

    let picked: Vec<Record> = selection
        .pick(&merged, record_id)
        .into_iter()
        .cloned()
        .collect();
    render_products(&picked, ctx.output)
}

pub(crate) async fn handle_match_image(ctx: &AppContext, args: MatchImageArgs) -> CliResult<()> {
    ctx.enter(Route::TaobaoMatch).await?;
    let found = ctx.api.match_image(&args.image_url).await?;
    render_image_match(&found, ctx.output)
}

pub(crate) async fn handle_seo(ctx: &AppContext, args: SeoArgs) -> CliResult<()> {
    ctx.enter(Route::Collected).await?;
    let title = ctx.api.generate_seo(&args.product_id).await?;
    println!("{}: {title}", args.product_id.trim());
    Ok(())
}

pub(crate) async fn handle_export(ctx: &AppContext, args: ExportArgs) -> CliResult<()> {
    ctx.enter(Route::Collected).await?;
    let written = ctx.api.export_spreadsheet(&args.ids, &args.out).await?;
    println!("saved {}", written.display());
    Ok(())
}
