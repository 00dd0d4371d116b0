use crate::error::AnalyticsError;
use crate::stats::mean;

/// Pearson correlation coefficient between two equal-length series.
///
/// # Returns
///
/// * `Ok(Some(r))` with `r` in `[-1, 1]`.
/// * `Ok(None)` when either series has zero variance and the coefficient is
///   undefined.
/// * `Err(LengthMismatch)` when the series differ in length. Nothing is
///   truncated or padded.
/// * `Err(NotEnoughData)` for fewer than two points.
pub fn correlation(x: &[f64], y: &[f64]) -> Result<Option<f64>, AnalyticsError> {
    if x.len() != y.len() {
        return Err(AnalyticsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(AnalyticsError::NotEnoughData(format!(
            "correlation needs at least 2 paired points, found {}",
            x.len()
        )));
    }

    // Both slices are non-empty here.
    let (Some(mean_x), Some(mean_y)) = (mean(x), mean(y)) else {
        return Ok(None);
    };

    let (mut covariance, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // Product of the roots, so large but finite variances do not overflow.
    let denominator = var_x.sqrt() * var_y.sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return Ok(None);
    }

    Ok(Some((covariance / denominator).clamp(-1.0, 1.0)))
}
