use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::ops::Deref;

/// The currency every price series is quoted in.
pub const BASE_CURRENCY: &str = "USD";

/// An ordered sequence of daily USD prices for one metal, oldest first.
///
/// Values are validated on construction (finite and non-negative) and the
/// series is immutable afterwards. It derefs to `[f64]` so the analytics
/// functions can borrow it, or any window of it, as a plain slice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct PriceSeries(Vec<f64>);

impl PriceSeries {
    pub fn new(prices: Vec<f64>) -> Result<Self, CoreError> {
        if let Some((idx, bad)) = prices
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p < 0.0)
        {
            return Err(CoreError::InvalidInput(
                "PriceSeries".to_string(),
                format!("price at index {} is not a finite non-negative number: {}", idx, bad),
            ));
        }
        Ok(Self(prices))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// The most recent `n` prices (or all of them when `n` exceeds the length).
    pub fn tail(&self, n: usize) -> &[f64] {
        let start = self.0.len().saturating_sub(n);
        &self.0[start..]
    }
}

impl Deref for PriceSeries {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for PriceSeries {
    type Error = CoreError;

    fn try_from(prices: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(prices)
    }
}

impl From<PriceSeries> for Vec<f64> {
    fn from(series: PriceSeries) -> Self {
        series.0
    }
}

/// Currency code to USD multiplier.
///
/// The table always holds `USD -> 1.0`. Codes are stored upper-cased, and
/// entries that are not finite and positive are dropped when the table is
/// built, so a lookup for them falls back to the identity rate like any
/// other missing code. When two codes differ only by case the first one in
/// sorted order wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct RateTable(BTreeMap<String, f64>);

impl RateTable {
    /// A table holding only the identity entry for the base currency.
    pub fn identity() -> Self {
        Self::from(BTreeMap::new())
    }

    /// The multiplier for `code`, or `1.0` when the table has no entry for it.
    pub fn rate(&self, code: &str) -> f64 {
        self.get(code).unwrap_or(1.0)
    }

    /// The multiplier for `code` if the table actually carries one.
    pub fn get(&self, code: &str) -> Option<f64> {
        self.0.get(&code.to_ascii_uppercase()).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(&code.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<BTreeMap<String, f64>> for RateTable {
    fn from(raw: BTreeMap<String, f64>) -> Self {
        let mut rates = BTreeMap::new();
        for (code, rate) in raw {
            if !rate.is_finite() || rate <= 0.0 {
                tracing::warn!(currency = %code, rate, "Dropping non-positive exchange rate.");
                continue;
            }
            match rates.entry(code.to_ascii_uppercase()) {
                Entry::Vacant(slot) => {
                    slot.insert(rate);
                }
                Entry::Occupied(kept) => {
                    tracing::warn!(
                        currency = %code,
                        rate,
                        kept = *kept.get(),
                        "Ignoring exchange rate duplicated under a different case."
                    );
                }
            }
        }
        rates.entry(BASE_CURRENCY.to_string()).or_insert(1.0);
        Self(rates)
    }
}

impl From<RateTable> for BTreeMap<String, f64> {
    fn from(table: RateTable) -> Self {
        table.0
    }
}

impl FromIterator<(String, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<BTreeMap<_, _>>())
    }
}

/// Minimum number of prices a metal needs for change and trend figures.
pub const MIN_SERIES_LEN: usize = 2;

/// The metals document as it is stored on disk: a `rates` table next to one
/// price array per metal, keyed by metal name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetalsDocument {
    #[serde(default)]
    pub rates: RateTable,
    #[serde(flatten)]
    pub series: BTreeMap<String, PriceSeries>,
}

/// Every metal's price history together with the rates shipped alongside it.
///
/// Metal names are lower-cased and kept in alphabetical order. Serializes
/// back into the on-disk document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MetalsDocument", into = "MetalsDocument")]
pub struct MetalsSnapshot {
    pub rates: RateTable,
    pub series: BTreeMap<String, PriceSeries>,
}

impl MetalsSnapshot {
    pub fn new(rates: RateTable, series: BTreeMap<String, PriceSeries>) -> Result<Self, CoreError> {
        if series.is_empty() {
            return Err(CoreError::InvalidInput(
                "MetalsSnapshot".to_string(),
                "document contains no metals".to_string(),
            ));
        }
        let mut normalized = BTreeMap::new();
        for (metal, prices) in series {
            if prices.len() < MIN_SERIES_LEN {
                return Err(CoreError::InvalidInput(
                    format!("metal '{}'", metal),
                    format!("needs at least {} prices, found {}", MIN_SERIES_LEN, prices.len()),
                ));
            }
            match normalized.entry(metal.to_ascii_lowercase()) {
                Entry::Vacant(slot) => {
                    slot.insert(prices);
                }
                Entry::Occupied(_) => {
                    return Err(CoreError::InvalidInput(
                        format!("metal '{}'", metal),
                        "appears more than once when names are compared case-insensitively".to_string(),
                    ));
                }
            }
        }
        Ok(Self {
            rates,
            series: normalized,
        })
    }

    pub fn metal(&self, name: &str) -> Option<&PriceSeries> {
        self.series.get(&name.to_ascii_lowercase())
    }

    pub fn metals(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

impl TryFrom<MetalsDocument> for MetalsSnapshot {
    type Error = CoreError;

    fn try_from(doc: MetalsDocument) -> Result<Self, Self::Error> {
        Self::new(doc.rates, doc.series)
    }
}

impl From<MetalsSnapshot> for MetalsDocument {
    fn from(snapshot: MetalsSnapshot) -> Self {
        Self {
            rates: snapshot.rates,
            series: snapshot.series,
        }
    }
}

/// A single headline from the news feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Result<Self, CoreError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "NewsItem".to_string(),
                "title must not be empty".to_string(),
            ));
        }
        Ok(Self {
            title,
            link: link.into(),
            summary: None,
        })
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Whether the record satisfies the non-empty title invariant.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Trend;
    use rstest::rstest;

    #[rstest]
    fn test_price_series_rejects_negative_prices() {
        let err = PriceSeries::new(vec![1.0, -2.0]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_, _)));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_price_series_rejects_non_finite(#[case] bad: f64) {
        assert!(PriceSeries::new(vec![1.0, bad]).is_err());
    }

    #[rstest]
    fn test_price_series_accepts_zero() {
        let series = PriceSeries::new(vec![0.0, 1.5]).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[rstest]
    fn test_price_series_tail() {
        let series = PriceSeries::new(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(series.tail(2), &[3.0, 4.0]);
        assert_eq!(series.tail(10), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[rstest]
    fn test_price_series_deserialize_validates() {
        let ok: PriceSeries = serde_json::from_str("[1860.5, 1871.25]").unwrap();
        assert_eq!(ok.as_slice(), &[1860.5, 1871.25]);
        assert!(serde_json::from_str::<PriceSeries>("[1.0, -1.0]").is_err());
    }

    #[rstest]
    fn test_rate_table_always_has_usd() {
        let table = RateTable::identity();
        assert_eq!(table.get("USD"), Some(1.0));
        assert_eq!(table.len(), 1);
    }

    #[rstest]
    fn test_rate_table_missing_code_is_identity() {
        let table: RateTable = [("EUR".to_string(), 0.9)].into_iter().collect();
        assert_eq!(table.rate("EUR"), 0.9);
        assert_eq!(table.rate("GBP"), 1.0);
        assert!(!table.contains("GBP"));
    }

    #[rstest]
    fn test_rate_table_normalizes_case_and_drops_bad_rates() {
        let table: RateTable = serde_json::from_str(r#"{"eur": 0.9, "JPY": 0, "INR": -3}"#).unwrap();
        assert_eq!(table.rate("Eur"), 0.9);
        assert!(!table.contains("JPY"));
        assert!(!table.contains("INR"));
    }

    #[rstest]
    fn test_rate_table_keeps_first_of_case_duplicates() {
        let table: RateTable = serde_json::from_str(r#"{"EUR": 0.9, "eur": 0.5}"#).unwrap();
        assert_eq!(table.rate("EUR"), 0.9);
        assert_eq!(table.len(), 2);
    }

    #[rstest]
    fn test_news_item_requires_title() {
        assert!(NewsItem::new("  ", "https://example.com").is_err());
        let item = NewsItem::new("Gold climbs", "https://example.com").unwrap();
        assert!(item.is_valid());
        assert_eq!(item.summary, None);
    }

    #[rstest]
    fn test_news_item_summary_is_optional_in_json() {
        let item: NewsItem =
            serde_json::from_str(r#"{"title": "Silver slides", "link": "https://x.test/1"}"#).unwrap();
        assert_eq!(item.summary, None);
    }

    #[rstest]
    #[case(100.0, 101.0, Trend::Upward)]
    #[case(100.0, 99.5, Trend::Downward)]
    #[case(100.0, 100.0, Trend::Stable)]
    fn test_trend_between(#[case] first: f64, #[case] last: f64, #[case] expected: Trend) {
        assert_eq!(Trend::between(first, last), expected);
    }

    #[rstest]
    fn test_metals_snapshot_from_document() {
        let json = r#"{"rates": {"USD": 1, "EUR": 0.92}, "Gold": [1800.0, 1810.5], "silver": [22.1, 22.4]}"#;
        let snapshot: MetalsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.metals().collect::<Vec<_>>(), vec!["gold", "silver"]);
        assert_eq!(snapshot.rates.rate("EUR"), 0.92);
        assert_eq!(snapshot.metal("GOLD").unwrap().as_slice(), &[1800.0, 1810.5]);
    }

    #[rstest]
    fn test_metals_snapshot_without_rates_uses_identity() {
        let snapshot: MetalsSnapshot = serde_json::from_str(r#"{"gold": [1.0, 2.0]}"#).unwrap();
        assert_eq!(snapshot.rates, RateTable::identity());
    }

    #[rstest]
    #[case(r#"{"rates": {"USD": 1}}"#)]
    #[case(r#"{"gold": [1800.0]}"#)]
    #[case(r#"{"Gold": [1.0, 2.0], "gold": [5.0, 6.0]}"#)]
    fn test_metals_snapshot_rejects_unusable_documents(#[case] json: &str) {
        assert!(serde_json::from_str::<MetalsSnapshot>(json).is_err());
    }

    #[rstest]
    fn test_metals_snapshot_serializes_as_document() {
        let snapshot: MetalsSnapshot =
            serde_json::from_str(r#"{"rates": {"EUR": 0.9}, "gold": [1.0, 2.0]}"#).unwrap();

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["gold"], serde_json::json!([1.0, 2.0]));
        assert_eq!(json["rates"]["EUR"], serde_json::json!(0.9));

        let reloaded: MetalsSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(reloaded, snapshot);
    }
}
