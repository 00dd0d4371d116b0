use core_types::RateTable;

/// Converts a USD price into `currency`.
///
/// An unknown code converts at the identity rate, so a stale or partial rate
/// table degrades to showing USD figures instead of failing.
pub fn convert(price_usd: f64, rates: &RateTable, currency: &str) -> f64 {
    price_usd * rates.rate(currency)
}

/// Converts every price of a USD series into `currency`.
pub fn convert_series(prices_usd: &[f64], rates: &RateTable, currency: &str) -> Vec<f64> {
    let rate = rates.rate(currency);
    prices_usd.iter().map(|p| p * rate).collect()
}
