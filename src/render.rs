use analytics::{DashboardReport, MetalReport, PortfolioQuote};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use core_types::Trend;
use news::{Sentiment, TaggedNews};

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.2}%", v),
        None => "n/a".to_string(),
    }
}

fn price(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

fn trend_cell(trend: Trend) -> Cell {
    let color = match trend {
        Trend::Upward => Color::Green,
        Trend::Downward => Color::Red,
        Trend::Stable => Color::Grey,
    };
    Cell::new(format!("{} {}", trend.arrow(), trend)).fg(color)
}

/// The latest converted price of each metal.
pub fn price_cards(report: &DashboardReport) -> Table {
    let mut table = table();
    table.set_header(vec!["Metal", "Price", "Change", "Trend"]);
    for m in &report.metals {
        table.add_row(vec![
            Cell::new(m.metal.to_uppercase()),
            Cell::new(format!("{:.2} {}", m.latest_converted, report.currency)),
            Cell::new(pct(m.percent_change)),
            trend_cell(m.trend),
        ]);
    }
    table
}

/// USD statistics per metal, including the trailing window.
pub fn statistics(report: &DashboardReport, alert_pct: f64) -> Table {
    let mut table = table();
    table.set_header(vec![
        "Metal", "Latest", "Previous", "Volatility", "Window", "Avg", "Max", "Min", "Window chg",
    ]);
    for m in &report.metals {
        table.add_row(statistics_row(m, alert_pct));
    }
    table
}

fn statistics_row(m: &MetalReport, alert_pct: f64) -> Vec<Cell> {
    let volatility = Cell::new(format!("{:.2}%", m.volatility));
    let volatility = if m.volatility > alert_pct {
        volatility.fg(Color::Yellow)
    } else {
        volatility
    };
    vec![
        Cell::new(m.metal.to_uppercase()),
        Cell::new(format!("{:.2}", m.latest_usd)),
        Cell::new(format!("{:.2}", m.previous_usd)),
        volatility,
        Cell::new(m.window.len),
        Cell::new(price(m.window.average)),
        Cell::new(price(m.window.max)),
        Cell::new(price(m.window.min)),
        Cell::new(pct(m.window.percent_change)),
    ]
}

/// Human-readable alerts for metals above the volatility threshold.
pub fn volatility_alerts(report: &DashboardReport, alert_pct: f64) -> Vec<String> {
    report
        .volatile_metals(alert_pct)
        .map(|m| {
            format!(
                "{} volatility is {:.2}% (above {:.2}%)",
                m.metal.to_uppercase(),
                m.volatility,
                alert_pct
            )
        })
        .collect()
}

pub fn correlations(report: &DashboardReport) -> Table {
    let mut table = table();
    table.set_header(vec!["Pair", "Pearson r"]);
    for c in &report.correlations {
        let value = match (c.coefficient, c.reason) {
            (Some(r), _) => format!("{:+.4}", r),
            (None, Some(reason)) => format!("undefined ({})", reason),
            (None, None) => "undefined".to_string(),
        };
        table.add_row(vec![
            format!("{} / {}", c.left.to_uppercase(), c.right.to_uppercase()),
            value,
        ]);
    }
    table
}

pub fn news(items: &[TaggedNews]) -> Table {
    let mut table = table();
    table.set_header(vec!["Sentiment", "Headline", "Summary", "Link"]);
    for item in items {
        let color = match item.sentiment {
            Sentiment::Bullish => Color::Green,
            Sentiment::Bearish => Color::Red,
            Sentiment::Neutral => Color::Grey,
        };
        table.add_row(vec![
            Cell::new(item.sentiment).fg(color),
            Cell::new(&item.title),
            Cell::new(&item.digest),
            Cell::new(&item.link),
        ]);
    }
    table
}

pub fn portfolio(quote: &PortfolioQuote) -> String {
    format!(
        "You could buy {:.4} units of {} at current price ({:.2} {})",
        quote.units,
        quote.metal.to_uppercase(),
        quote.unit_price,
        quote.currency
    )
}
