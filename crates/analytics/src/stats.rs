use crate::error::AnalyticsError;
use core_types::Trend;
use serde::{Deserialize, Serialize};

/// Headline figures for one price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub latest: f64,
    pub previous: f64,
    /// `None` when the first price is zero and the change is undefined.
    pub percent_change: Option<f64>,
    pub trend: Trend,
    /// Statistics over the trailing window of the same series.
    pub window: WindowedStats,
}

/// Statistics over a trailing window of a series.
///
/// Every field is `None` for an empty (`k == 0`) window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowedStats {
    pub len: usize,
    pub average: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub percent_change: Option<f64>,
}

/// Computes `latest`, `previous`, `percent_change`, `trend` and the
/// statistics of the last `window` points of one series.
pub fn series_stats(series: &[f64], window: usize) -> Result<SeriesStats, AnalyticsError> {
    Ok(SeriesStats {
        latest: latest(series)?,
        previous: previous(series)?,
        percent_change: percent_change(series)?,
        trend: trend(series)?,
        window: windowed_stats(series, window)?,
    })
}

pub fn latest(series: &[f64]) -> Result<f64, AnalyticsError> {
    series
        .last()
        .copied()
        .ok_or_else(|| AnalyticsError::NotEnoughData("latest price of an empty series".to_string()))
}

pub fn previous(series: &[f64]) -> Result<f64, AnalyticsError> {
    require_len(series, 2, "previous price")?;
    Ok(series[series.len() - 2])
}

/// Percentage change from the first to the last price.
///
/// Returns `Ok(None)` instead of an infinite or NaN value when the first
/// price is zero.
pub fn percent_change(series: &[f64]) -> Result<Option<f64>, AnalyticsError> {
    require_len(series, 2, "percent change")?;
    Ok(change_pct(series[0], series[series.len() - 1]))
}

/// Net direction from the first to the last price, compared exactly.
pub fn trend(series: &[f64]) -> Result<Trend, AnalyticsError> {
    require_len(series, 2, "trend")?;
    Ok(Trend::between(series[0], series[series.len() - 1]))
}

/// Average, extremes and percentage change over the last `k` prices.
pub fn windowed_stats(series: &[f64], k: usize) -> Result<WindowedStats, AnalyticsError> {
    if k > series.len() {
        return Err(AnalyticsError::InvalidInput(format!(
            "window of {} points is longer than the series ({} points)",
            k,
            series.len()
        )));
    }
    if k == 0 {
        return Ok(WindowedStats::default());
    }

    let window = &series[series.len() - k..];
    Ok(WindowedStats {
        len: k,
        average: mean(window),
        max: max(window),
        min: min(window),
        percent_change: change_pct(window[0], window[k - 1]),
    })
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

fn change_pct(first: f64, last: f64) -> Option<f64> {
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

fn require_len(series: &[f64], needed: usize, metric: &str) -> Result<(), AnalyticsError> {
    if series.len() < needed {
        return Err(AnalyticsError::NotEnoughData(format!(
            "{} needs at least {} prices, found {}",
            metric,
            needed,
            series.len()
        )));
    }
    Ok(())
}
