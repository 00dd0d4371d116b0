use crate::correlation::correlation;
use crate::currency::{convert, convert_series};
use crate::error::AnalyticsError;
use crate::portfolio::PortfolioQuote;
use crate::report::{CorrelationEntry, DashboardReport, MetalReport, UndefinedCorrelation};
use crate::stats::series_stats;
use crate::volatility::volatility;
use chrono::Utc;
use core_types::{MetalsSnapshot, PriceSeries, RateTable};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// The inputs of one refresh, fully loaded before any calculation starts.
///
/// Replaced wholesale on every refresh; nothing in it is mutated afterwards.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub snapshot: MetalsSnapshot,
    /// The effective rate table: the live table when one was fetched,
    /// otherwise the one shipped with the metals document.
    pub rates: RateTable,
    pub currency: String,
    /// Trailing window length for the windowed statistics.
    pub window: usize,
}

impl DashboardContext {
    pub fn new(
        snapshot: MetalsSnapshot,
        live_rates: Option<RateTable>,
        currency: &str,
        window: usize,
    ) -> Self {
        let rates = live_rates.unwrap_or_else(|| snapshot.rates.clone());
        Self {
            snapshot,
            rates,
            currency: currency.to_ascii_uppercase(),
            window,
        }
    }

    pub fn series(&self, metal: &str) -> Result<&PriceSeries, AnalyticsError> {
        self.snapshot
            .metal(metal)
            .ok_or_else(|| AnalyticsError::InvalidInput(format!("unknown metal '{}'", metal)))
    }
}

/// A stateless calculator turning a `DashboardContext` into reports.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for a dashboard refresh.
    ///
    /// # Returns
    ///
    /// A `DashboardReport` holding one `MetalReport` per metal (alphabetical)
    /// and one `CorrelationEntry` per pair of metals.
    pub fn calculate(&self, ctx: &DashboardContext) -> Result<DashboardReport, AnalyticsError> {
        let metals = ctx
            .snapshot
            .series
            .iter()
            .map(|(metal, series)| self.metal_report(ctx, metal, series))
            .collect::<Result<Vec<_>, _>>()?;

        let correlations = self.correlations(&ctx.snapshot);

        tracing::debug!(
            metals = metals.len(),
            pairs = correlations.len(),
            currency = %ctx.currency,
            "Dashboard report calculated."
        );

        Ok(DashboardReport {
            generated_at: Utc::now(),
            currency: ctx.currency.clone(),
            rate: ctx.rates.rate(&ctx.currency),
            metals,
            correlations,
        })
    }

    /// Calculates the report for a single metal.
    fn metal_report(
        &self,
        ctx: &DashboardContext,
        metal: &str,
        series: &PriceSeries,
    ) -> Result<MetalReport, AnalyticsError> {
        // The configured window is a display preference; shorter histories use all they have.
        let k = ctx.window.min(series.len());
        if k < ctx.window {
            tracing::debug!(metal, window = ctx.window, available = k, "Window clamped to series length.");
        }
        let stats = series_stats(series, k)?;

        let converted = convert(stats.latest, &ctx.rates, &ctx.currency);
        let latest_converted = Decimal::from_f64(converted)
            .map(|d| d.round_dp(2))
            .ok_or_else(|| AnalyticsError::InvalidInput(format!("converted price of {} is not representable", metal)))?;

        Ok(MetalReport {
            metal: metal.to_string(),
            latest_usd: stats.latest,
            previous_usd: stats.previous,
            latest_converted,
            percent_change: stats.percent_change,
            trend: stats.trend,
            volatility: volatility(series)?,
            window: stats.window,
        })
    }

    /// Correlates every pair of metals over their full histories.
    fn correlations(&self, snapshot: &MetalsSnapshot) -> Vec<CorrelationEntry> {
        let metals: Vec<(&String, &PriceSeries)> = snapshot.series.iter().collect();
        let mut entries = Vec::new();

        for (i, (left, x)) in metals.iter().enumerate() {
            for (right, y) in &metals[i + 1..] {
                let (coefficient, reason) = match correlation(x, y) {
                    Ok(Some(r)) => (Some(r), None),
                    Ok(None) => (None, Some(UndefinedCorrelation::ZeroVariance)),
                    Err(e) => {
                        tracing::warn!(%left, %right, error = %e, "Correlation left undefined.");
                        let reason = match e {
                            AnalyticsError::LengthMismatch { .. } => UndefinedCorrelation::LengthMismatch,
                            AnalyticsError::NotEnoughData(_) => UndefinedCorrelation::NotEnoughData,
                            AnalyticsError::InvalidInput(_) => UndefinedCorrelation::InvalidInput,
                        };
                        (None, Some(reason))
                    }
                };
                entries.push(CorrelationEntry {
                    left: left.to_string(),
                    right: right.to_string(),
                    coefficient,
                    reason,
                });
            }
        }

        entries
    }

    /// The metal's history converted into the display currency, optionally
    /// limited to the most recent `last` points.
    pub fn history(
        &self,
        ctx: &DashboardContext,
        metal: &str,
        last: Option<usize>,
    ) -> Result<Vec<f64>, AnalyticsError> {
        let series = ctx.series(metal)?;
        let prices = match last {
            Some(n) => series.tail(n),
            None => series.as_slice(),
        };
        Ok(convert_series(prices, &ctx.rates, &ctx.currency))
    }

    /// Quotes how many units of `metal` `amount` buys in the display currency.
    pub fn portfolio(
        &self,
        ctx: &DashboardContext,
        metal: &str,
        amount: f64,
    ) -> Result<PortfolioQuote, AnalyticsError> {
        let latest = crate::stats::latest(ctx.series(metal)?)?;
        PortfolioQuote::quote(metal, amount, latest, &ctx.rates, &ctx.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core_types::Trend;
    use rstest::{fixture, rstest};
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn series(prices: &[f64]) -> PriceSeries {
        PriceSeries::new(prices.to_vec()).unwrap()
    }

    #[fixture]
    fn snapshot() -> MetalsSnapshot {
        let rates: RateTable = [("EUR".to_string(), 0.5)].into_iter().collect();
        let mut metals = BTreeMap::new();
        metals.insert("silver".to_string(), series(&[20.0, 22.0, 18.0, 19.0]));
        metals.insert("gold".to_string(), series(&[100.0, 110.0, 90.0, 95.0]));
        MetalsSnapshot::new(rates, metals).unwrap()
    }

    #[rstest]
    fn test_calculate_reports_every_metal(snapshot: MetalsSnapshot) {
        let ctx = DashboardContext::new(snapshot, None, "eur", 3);
        let report = AnalyticsEngine::new().calculate(&ctx).unwrap();

        assert_eq!(report.currency, "EUR");
        assert_eq!(report.rate, 0.5);
        assert_eq!(report.metals.len(), 2);

        let gold = report.metal("GOLD").unwrap();
        assert_eq!(gold.trend, Trend::Downward);
        assert_eq!(gold.latest_converted, Decimal::from_str("47.5").unwrap());
        assert_abs_diff_eq!(gold.volatility, 20.0, epsilon = 1e-9);
        assert_eq!(gold.window.len, 3);
    }

    #[rstest]
    fn test_calculate_correlates_pairs(snapshot: MetalsSnapshot) {
        let ctx = DashboardContext::new(snapshot, None, "USD", 4);
        let report = AnalyticsEngine::new().calculate(&ctx).unwrap();

        assert_eq!(report.correlations.len(), 1);
        let entry = &report.correlations[0];
        assert_eq!((entry.left.as_str(), entry.right.as_str()), ("gold", "silver"));
        // silver is gold scaled by 1/5, so the histories move in lockstep.
        assert_abs_diff_eq!(entry.coefficient.unwrap(), 1.0, epsilon = 1e-9);
        assert_eq!(entry.reason, None);
    }

    #[rstest]
    fn test_unequal_histories_are_not_truncated() {
        let mut metals = BTreeMap::new();
        metals.insert("gold".to_string(), series(&[1.0, 2.0, 3.0]));
        metals.insert("silver".to_string(), series(&[1.0, 2.0]));
        let snapshot = MetalsSnapshot::new(RateTable::identity(), metals).unwrap();

        let report = AnalyticsEngine::new()
            .calculate(&DashboardContext::new(snapshot, None, "USD", 30))
            .unwrap();
        assert_eq!(report.correlations[0].coefficient, None);
        assert_eq!(report.correlations[0].reason, Some(UndefinedCorrelation::LengthMismatch));
        assert_eq!(report.metal("gold").unwrap().window.len, 3);
    }

    #[rstest]
    fn test_flat_history_correlation_reports_zero_variance() {
        let mut metals = BTreeMap::new();
        metals.insert("gold".to_string(), series(&[1.0, 2.0, 3.0]));
        metals.insert("silver".to_string(), series(&[4.0, 4.0, 4.0]));
        let snapshot = MetalsSnapshot::new(RateTable::identity(), metals).unwrap();

        let report = AnalyticsEngine::new()
            .calculate(&DashboardContext::new(snapshot, None, "USD", 3))
            .unwrap();
        let entry = &report.correlations[0];
        assert_eq!(entry.coefficient, None);
        assert_eq!(entry.reason, Some(UndefinedCorrelation::ZeroVariance));

        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(json["reason"], "zero_variance");
    }

    #[rstest]
    fn test_live_rates_replace_snapshot_rates(snapshot: MetalsSnapshot) {
        let live: RateTable = [("GBP".to_string(), 0.8)].into_iter().collect();
        let ctx = DashboardContext::new(snapshot, Some(live), "EUR", 2);
        // EUR is absent from the live table, so prices stay in USD.
        assert_eq!(ctx.rates.rate("EUR"), 1.0);
        let history = AnalyticsEngine::new().history(&ctx, "gold", Some(2)).unwrap();
        assert_eq!(history, vec![90.0, 95.0]);
    }

    #[rstest]
    fn test_portfolio_uses_context_currency(snapshot: MetalsSnapshot) {
        let ctx = DashboardContext::new(snapshot, None, "EUR", 2);
        let quote = AnalyticsEngine::new().portfolio(&ctx, "silver", 95.0).unwrap();
        assert_eq!(quote.unit_price, Decimal::from_str("9.5").unwrap());
        assert_eq!(quote.units, Decimal::from(10));
    }

    #[rstest]
    fn test_unknown_metal_is_rejected(snapshot: MetalsSnapshot) {
        let ctx = DashboardContext::new(snapshot, None, "USD", 2);
        assert!(matches!(
            AnalyticsEngine::new().history(&ctx, "platinum", None),
            Err(AnalyticsError::InvalidInput(_))
        ));
    }
}
