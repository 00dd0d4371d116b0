use analytics::DashboardContext;
use anyhow::{Context, Result};
use api_client::MarketDataSource;
use configuration::DisplayConfig;
use core_types::NewsItem;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Everything one refresh loaded, ready for the analytics engine and the renderer.
pub struct Refresh {
    pub ctx: DashboardContext,
    pub news: Vec<NewsItem>,
}

/// Loads metals, news and live rates concurrently and builds a fresh context.
///
/// The context is only assembled once all three fetches have finished. A
/// failed metals fetch fails the refresh. A failed news fetch leaves the news
/// section empty, and a failed rate fetch falls back to the rates shipped in
/// the metals document.
pub async fn refresh(source: &dyn MarketDataSource, display: &DisplayConfig) -> Result<Refresh> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message("Fetching prices, rates and news...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let (metals, news, rates) = tokio::join!(
        source.fetch_metals(),
        source.fetch_news(),
        source.fetch_rates()
    );
    spinner.finish_and_clear();

    let snapshot = metals.context("Failed to load metals data")?;

    let news = news.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load news; continuing without headlines.");
        Vec::new()
    });

    let live_rates = rates.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load live rates; using the bundled rate table.");
        None
    });

    let ctx = DashboardContext::new(snapshot, live_rates, &display.currency, display.window);
    if !ctx.rates.contains(&ctx.currency) {
        tracing::warn!(
            currency = %ctx.currency,
            "No exchange rate for the display currency; prices are shown unconverted."
        );
    }

    Ok(Refresh { ctx, news })
}
