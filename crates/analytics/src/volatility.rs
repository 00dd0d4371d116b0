use crate::error::AnalyticsError;
use crate::stats::{max, min};

/// Range of the series normalized by its midrange, as a percentage.
///
/// `(max - min) / ((max + min) / 2) * 100`. A flat series yields `0.0`, and so
/// does an all-zero series, whose midrange is zero. The value is returned raw;
/// deciding what counts as "volatile" is up to the caller.
///
/// Prices must be finite and non-negative, as in a `PriceSeries`; anything
/// else is `InvalidInput`.
pub fn volatility(series: &[f64]) -> Result<f64, AnalyticsError> {
    if let Some(bad) = series.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(AnalyticsError::InvalidInput(format!(
            "volatility needs finite non-negative prices, found {}",
            bad
        )));
    }

    let (Some(lo), Some(hi)) = (min(series), max(series)) else {
        return Err(AnalyticsError::NotEnoughData(
            "volatility of an empty series".to_string(),
        ));
    };

    let midrange = (hi + lo) / 2.0;
    if midrange == 0.0 {
        return Ok(0.0);
    }
    Ok((hi - lo) / midrange * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn test_volatility_scenario() {
        assert_relative_eq!(volatility(&[100.0, 110.0, 90.0, 95.0]).unwrap(), 20.0);
    }

    #[rstest]
    #[case(&[7.5, 7.5, 7.5])]
    #[case(&[0.0, 0.0])]
    #[case(&[1932.4])]
    fn test_degenerate_series_have_zero_volatility(#[case] prices: &[f64]) {
        assert_eq!(volatility(prices).unwrap(), 0.0);
    }

    #[rstest]
    fn test_volatility_is_non_negative() {
        for prices in [[3.0, 1.0, 2.0], [0.0, 0.0, 4.0], [10.0, 9.99, 10.01]] {
            assert!(volatility(&prices).unwrap() >= 0.0);
        }
    }

    #[rstest]
    #[case(&[-3.0, 1.0])]
    #[case(&[1.0, f64::NAN])]
    #[case(&[f64::INFINITY, 1.0])]
    fn test_invalid_prices_are_rejected(#[case] prices: &[f64]) {
        assert!(matches!(volatility(prices), Err(AnalyticsError::InvalidInput(_))));
    }

    #[rstest]
    fn test_empty_series_is_rejected() {
        assert!(matches!(volatility(&[]), Err(AnalyticsError::NotEnoughData(_))));
    }
}
