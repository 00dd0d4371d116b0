use analytics::{AnalyticsEngine, DashboardReport};
use anyhow::{Context, Result};
use api_client::{DashboardClient, MarketDataSource};
use chrono::Utc;
use clap::{Parser, Subcommand};
use configuration::{Config, OutputFormat, init_tracing, load_config};
use news::TaggedNews;
use serde::Serialize;
use std::path::PathBuf;

mod refresh;
mod render;

use refresh::{Refresh, refresh};

const DEFAULT_CONFIG: &str = "config.toml";

/// The main entry point for the Bullion dashboard.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables (e.g. BULLION__DISPLAY__CURRENCY) from a .env file, if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    let _log_guard = init_tracing(&config.logging)?;

    let client = DashboardClient::new(&config.sources).context("Failed to build the data client")?;

    match &cli.command {
        Commands::Dashboard => handle_dashboard(&client, &config).await,
        Commands::Prices => handle_prices(&client, &config).await,
        Commands::History(args) => handle_history(&client, &config, args).await,
        Commands::Portfolio(args) => handle_portfolio(&client, &config, args).await,
        Commands::News(args) => handle_news(&client, &config, args).await,
        Commands::Watch => handle_watch(&client, &config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Gold and silver prices, currency conversion, analytics and market news in the terminal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Display currency (overrides `display.currency`), e.g. "EUR".
    #[arg(long, global = true)]
    currency: Option<String>,

    /// Output format (overrides `display.format`).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Loads the configuration file and applies command-line overrides.
    ///
    /// An explicitly passed `--config` must exist; the default path is optional.
    fn resolve_config(&self) -> Result<Config> {
        let (path, required) = match &self.config {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_CONFIG), false),
        };
        let mut config = load_config(&path, required)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        if let Some(currency) = &self.currency {
            configuration::settings::validate_currency(currency)?;
            config.display.currency = currency.to_ascii_uppercase();
        }
        if let Some(format) = self.format {
            config.display.format = format;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Price cards, statistics, volatility alerts, correlations and news.
    Dashboard,
    /// The latest price of every metal in the display currency.
    Prices,
    /// The price history of one metal in the display currency.
    History(HistoryArgs),
    /// How many units of a metal an amount buys at the current price.
    Portfolio(PortfolioArgs),
    /// Headlines with a digest and a sentiment tag.
    News(NewsArgs),
    /// Refresh the dashboard periodically until interrupted.
    Watch,
}

#[derive(Parser)]
struct HistoryArgs {
    /// The metal to show (e.g., "gold").
    #[arg(long)]
    metal: String,

    /// Only show the most recent N prices.
    #[arg(long)]
    last: Option<usize>,
}

#[derive(Parser)]
struct PortfolioArgs {
    /// The amount to invest, in the display currency.
    #[arg(long)]
    amount: f64,

    /// The metal to buy (e.g., "silver").
    #[arg(long)]
    metal: String,
}

#[derive(Parser)]
struct NewsArgs {
    /// Print the feed as a schema.org JSON-LD document instead.
    #[arg(long)]
    json_ld: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

#[derive(Serialize)]
struct DashboardOutput<'a> {
    report: &'a DashboardReport,
    alerts: Vec<String>,
    news: Vec<TaggedNews>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Runs the analytics engine over a freshly loaded context and prints the result.
fn render_dashboard(loaded: &Refresh, config: &Config) -> Result<()> {
    let report = AnalyticsEngine::new().calculate(&loaded.ctx)?;
    let display = &config.display;
    let alerts = render::volatility_alerts(&report, display.volatility_alert_pct);
    let news = news::tag(&loaded.news, display.summary_max_words);

    match display.format {
        OutputFormat::Json => print_json(&DashboardOutput {
            report: &report,
            alerts,
            news,
        }),
        OutputFormat::Table => {
            println!("Prices ({})", report.currency);
            println!("{}", render::price_cards(&report));
            println!("Statistics (USD, last {} points)", display.window);
            println!("{}", render::statistics(&report, display.volatility_alert_pct));
            for alert in &alerts {
                println!("⚠️  {}", alert);
            }
            if !report.correlations.is_empty() {
                println!("{}", render::correlations(&report));
            }
            if !news.is_empty() {
                println!("{}", render::news(&news));
            }
            println!("Updated {}", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
            Ok(())
        }
    }
}

async fn handle_dashboard(source: &dyn MarketDataSource, config: &Config) -> Result<()> {
    let loaded = refresh(source, &config.display).await?;
    render_dashboard(&loaded, config)
}

async fn handle_prices(source: &dyn MarketDataSource, config: &Config) -> Result<()> {
    let loaded = refresh(source, &config.display).await?;
    let report = AnalyticsEngine::new().calculate(&loaded.ctx)?;
    match config.display.format {
        OutputFormat::Json => print_json(&report.metals),
        OutputFormat::Table => {
            println!("{}", render::price_cards(&report));
            Ok(())
        }
    }
}

async fn handle_history(source: &dyn MarketDataSource, config: &Config, args: &HistoryArgs) -> Result<()> {
    let loaded = refresh(source, &config.display).await?;
    let prices = AnalyticsEngine::new().history(&loaded.ctx, &args.metal, args.last)?;
    match config.display.format {
        OutputFormat::Json => print_json(&prices),
        OutputFormat::Table => {
            for (idx, p) in prices.iter().enumerate() {
                println!("{:>6}  {:.2} {}", idx + 1, p, loaded.ctx.currency);
            }
            Ok(())
        }
    }
}

async fn handle_portfolio(source: &dyn MarketDataSource, config: &Config, args: &PortfolioArgs) -> Result<()> {
    let loaded = refresh(source, &config.display).await?;
    let quote = AnalyticsEngine::new().portfolio(&loaded.ctx, &args.metal, args.amount)?;
    match config.display.format {
        OutputFormat::Json => print_json(&quote),
        OutputFormat::Table => {
            println!("{}", render::portfolio(&quote));
            Ok(())
        }
    }
}

async fn handle_news(source: &dyn MarketDataSource, config: &Config, args: &NewsArgs) -> Result<()> {
    // Headlines do not depend on prices; a news failure is fatal only here.
    let items = source.fetch_news().await.context("Failed to load news")?;

    if args.json_ld {
        println!("{}", news::structured_data(&items, Utc::now())?);
        return Ok(());
    }

    let tagged = news::tag(&items, config.display.summary_max_words);
    match config.display.format {
        OutputFormat::Json => print_json(&tagged),
        OutputFormat::Table => {
            println!("{}", render::news(&tagged));
            Ok(())
        }
    }
}

/// Re-renders the dashboard every `refresh.interval` until Ctrl-C.
async fn handle_watch(source: &dyn MarketDataSource, config: &Config) -> Result<()> {
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C; watch runs until killed.");
            std::future::pending::<()>().await;
        }
    };
    watch(source, config, shutdown).await
}

/// The watch loop, stopped by `shutdown`.
///
/// `shutdown` is polled for the whole run, so it also interrupts a refresh in
/// flight. Each tick builds a brand-new context. A failed refresh is logged
/// and the loop waits for the next tick instead of exiting.
async fn watch(
    source: &dyn MarketDataSource,
    config: &Config,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let interval = config.refresh.interval;
    tracing::info!(?interval, "Watching for updates. Press Ctrl-C to stop.");
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            loaded = refresh(source, &config.display) => match loaded {
                Ok(loaded) => {
                    if let Err(e) = render_dashboard(&loaded, config) {
                        tracing::error!(error = %e, "Failed to render dashboard.");
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Refresh failed; keeping the previous view."),
            },
        }

        tokio::select! {
            _ = &mut shutdown => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    tracing::info!("Interrupted. Stopping watch.");
    Ok(())
}
