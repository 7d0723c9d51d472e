//! Functions for evaluating the quality of a regression fit
//!
//! This module provides the shared metric helpers used by both the regressor and the
//! validator to score predictions against observed prices.
//!
//! # Model Fit / Regression Diagnostics
//! - [`r_squared`]: Proportion of variance explained by the model. Higher is better (0 to 1).
//!
//! # Error Metrics
//! - [`mean_absolute_error`]: Average absolute difference between observed and predicted values. Lower is better.
//! - [`mean_squared_error`]: Average squared difference between observed and predicted values. Lower is better.
//! - [`root_mean_squared_error`]: Square root of MSE, giving error in same units as observed values. Lower is better.
//!
//! # Descriptive Statistics
//! - [`mean`]: Arithmetic mean of a dataset.
//!
//! # Examples
//!
//! ```rust
//! use pricefit::statistics::{r_squared, mean_absolute_error};
//!
//! let y = vec![1.0, 2.0, 3.0];
//! let y_fit = vec![1.1, 1.9, 3.05];
//!
//! let r2 = r_squared(y.iter().copied(), y_fit.iter().copied());
//! let mae = mean_absolute_error(y.into_iter(), y_fit.into_iter());
//! println!("R² = {r2}, MAE = {mae}");
//! ```

/// Computes the arithmetic mean of a sequence of values.
///
/// This is the average value, calculated as the sum of all values divided by the count.
///
/// # Parameters
/// - `data`: An iterator over `f64` values.
///
/// # Returns
/// The arithmetic mean of all elements in `data`.
/// - Returns zero if the iterator yields no elements.
///
/// # Examples
/// ```rust
/// let values = vec![1.0, 2.0, 3.0];
/// let m = pricefit::statistics::mean(values.into_iter());
/// assert_eq!(m, 2.0);
/// ```
pub fn mean(data: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0.0;
    for value in data {
        sum += value;
        count += 1.0;
    }
    if count == 0.0 {
        return 0.0;
    }
    sum / count
}

/// Calculate the R-squared value for a set of predictions.
///
/// R-squared is a number between 0 and 1 that tells you how well the model explains the data:
/// - `0` means the model explains none of the variation - no better than predicting the mean.
/// - `1` means the model explains all the variation.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// R-squared is calculated as:
/// ```math
/// R² = 1 - (SS_res / SS_tot)
/// where
///   SS_res = Σ (y_i - y_fit_i)²
///   SS_tot = Σ (y_i - y_mean)²
/// ```
///
/// Two guard rails are applied to the raw value:
/// - A constant target (`SS_tot = 0`) is defined as `R² = 0` rather than dividing by zero.
/// - The result is clamped to `[0, 1]`: a model worse than predicting the mean reports 0.
/// </div>
///
/// # Parameters
/// - `y`: The actual (observed) values.
/// - `y_fit`: The predicted values from the model.
///
/// # Returns
/// The proportion of variance explained by the model, always in `[0, 1]` and never NaN.
///
/// # Example
/// ```rust
/// # use pricefit::statistics::r_squared;
/// let y = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![1.1, 1.9, 3.05];
/// let r2 = r_squared(y.into_iter(), y_fit.into_iter());
/// assert!(r2 > 0.9 && r2 <= 1.0);
/// ```
pub fn r_squared(y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>) -> f64 {
    let y: Vec<f64> = y.collect();
    let y_fit: Vec<f64> = y_fit.collect();

    let y_mean = mean(y.iter().copied());

    //
    // Sum of (y - y_fit)^2
    // Sum of (y - y_mean)^2
    let mut ss_total = 0.0;
    let mut ss_residual = 0.0;
    for (y, y_fit) in y.into_iter().zip(y_fit) {
        ss_total += (y - y_mean).powi(2);
        ss_residual += (y - y_fit).powi(2);
    }

    if ss_total == 0.0 {
        return 0.0;
    }

    (1.0 - (ss_residual / ss_total)).clamp(0.0, 1.0)
}

/// Computes the mean absolute error (MAE) between two sets of values.
///
/// MAE measures the average absolute difference between observed (`y`)
/// and predicted (`y_fit`) values. Lower values indicate a closer fit.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// MAE = (Σ |y_i - y_fit_i|) / N
/// where
///   y_i = observed values, y_fit_i = predicted values,
///   N = number of observations
/// ```
/// </div>
///
/// # Parameters
/// - `y`: Iterator over observed values.
/// - `y_fit`: Iterator over predicted values.
///
/// # Returns
/// The mean absolute error. Returns zero for empty input.
///
/// # Example
/// ```rust
/// # use pricefit::statistics::mean_absolute_error;
/// let y = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![1.1, 1.9, 3.05];
/// let mae = mean_absolute_error(y.into_iter(), y_fit.into_iter());
/// ```
pub fn mean_absolute_error(y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>) -> f64 {
    let mut total = 0.0;
    let mut n = 0.0;
    for (y, y_fit) in y.zip(y_fit) {
        total += (y - y_fit).abs();
        n += 1.0;
    }
    if n == 0.0 {
        return 0.0;
    }
    total / n
}

/// Computes the mean squared error (MSE) between two sets of values.
///
/// MSE is a measure of the average squared difference between the
/// observed (`y`) and predicted (`y_fit`) values. Lower values indicate
/// a better fit.
///
/// For evaluating goodness-of-fit, prefer [`r_squared`].
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// MSE = (Σ (y_i - y_fit_i)²) / N
/// where
///   y_i = observed values, y_fit_i = predicted values,
///   N = number of observations
/// ```
/// </div>
///
/// # Parameters
/// - `y`: Iterator over the observed (actual) values.
/// - `y_fit`: Iterator over the predicted values from a model.
///
/// # Returns
/// The mean squared error. Returns zero for empty input.
///
/// # Example
/// ```rust
/// # use pricefit::statistics::mean_squared_error;
/// let y = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![1.1, 1.9, 3.05];
/// let mse = mean_squared_error(y.into_iter(), y_fit.into_iter());
/// ```
pub fn mean_squared_error(y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>) -> f64 {
    let mut total = 0.0;
    let mut n = 0.0;
    for (y, y_fit) in y.zip(y_fit) {
        total += (y - y_fit).powi(2);
        n += 1.0;
    }
    if n == 0.0 {
        return 0.0;
    }
    total / n
}

/// Computes the root mean squared error (RMSE) between two sets of values.
///
/// RMSE is the square root of the mean squared error, giving the error
/// in the same units as the observed values. Lower values indicate a better fit.
///
/// # Parameters
/// - `y`: Iterator over observed values.
/// - `y_fit`: Iterator over predicted values.
///
/// # Returns
/// The root mean squared error.
///
/// # Example
/// ```
/// # use pricefit::statistics::root_mean_squared_error;
/// let y = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![1.1, 1.9, 3.05];
/// let rmse = root_mean_squared_error(y.into_iter(), y_fit.into_iter());
/// ```
pub fn root_mean_squared_error(
    y: impl Iterator<Item = f64>,
    y_fit: impl Iterator<Item = f64>,
) -> f64 {
    mean_squared_error(y, y_fit).sqrt()
}

/// Rounds a value to the given number of decimal digits.
///
/// Used at the display edge only; metrics are always stored and
/// composed at full precision.
///
/// # Example
/// ```rust
/// let v = pricefit::statistics::round_to(0.123_456, 4);
/// assert_eq!(v, 0.1235);
/// ```
#[must_use]
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits.try_into().unwrap_or(i32::MAX));
    (value * factor).round() / factor
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn mean_simple() {
        let values = vec![2.0, 4.0, 6.0];
        assert_eq!(mean(values.into_iter()), 4.0);
    }

    #[test]
    fn mean_empty_is_zero() {
        assert_eq!(mean(std::iter::empty()), 0.0);
    }

    #[test]
    fn r_squared_perfect_fit() {
        let y = vec![1.0, 2.0, 3.0];
        let y_fit = vec![1.0, 2.0, 3.0];
        let r2 = r_squared(y.into_iter(), y_fit.into_iter());
        assert_eq!(r2, 1.0);
    }

    #[test]
    fn r_squared_mean_prediction() {
        // y = [1, 2, 3], y_fit = [2, 2, 2]
        // mean(y) = 2
        // SST = (1-2)² + (2-2)² + (3-2)² = 2
        // SSE = same, 2
        // R² = 1 - SSE/SST = 0
        let y = vec![1.0, 2.0, 3.0];
        let y_fit = vec![2.0, 2.0, 2.0];
        let r2 = r_squared(y.into_iter(), y_fit.into_iter());
        assert_eq!(r2, 0.0);
    }

    #[test]
    fn r_squared_worse_than_mean_clamps_to_zero() {
        // y = [1, 2, 3], y_fit = [10, 10, 10]
        // Raw R² = 1 - 194/2 = -96, reported as 0
        let y = vec![1.0, 2.0, 3.0];
        let y_fit = vec![10.0, 10.0, 10.0];
        let r2 = r_squared(y.into_iter(), y_fit.into_iter());
        assert_eq!(r2, 0.0);
    }

    #[test]
    fn r_squared_constant_target() {
        // SS_tot = 0; defined as 0 rather than NaN
        let y = vec![2.0, 2.0, 2.0];
        let y_fit = vec![2.0, 2.0, 2.0];
        let r2 = r_squared(y.into_iter(), y_fit.into_iter());
        assert_eq!(r2, 0.0);
        assert!(!r2.is_nan());
    }

    #[test]
    fn mae_simple_case() {
        // errors: [0.5, 0.5, 1.0] → MAE = 2/3
        let y = vec![1.0, 2.0, 3.0];
        let y_fit = vec![1.5, 1.5, 2.0];
        let mae = mean_absolute_error(y.into_iter(), y_fit.into_iter());
        assert!((mae - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn mse_simple_case() {
        // manual MSE: (1² + 2² + 3²) / 3 = 14/3
        let y = vec![1.0, 2.0, 3.0];
        let y_fit = vec![0.0, 0.0, 0.0];
        let mse = mean_squared_error(y.into_iter(), y_fit.into_iter());
        assert!((mse - 14.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn rmse_is_sqrt_of_mse() {
        let y = vec![1.0, 2.0, 3.0];
        let y_fit = vec![0.0, 0.0, 0.0];
        let mse = mean_squared_error(y.iter().copied(), y_fit.iter().copied());
        let rmse = root_mean_squared_error(y.into_iter(), y_fit.into_iter());
        assert!((rmse - mse.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn round_to_digits() {
        assert_eq!(round_to(1234.5678, 2), 1234.57);
        assert_eq!(round_to(0.98766, 4), 0.9877);
        assert_eq!(round_to(5.0, 0), 5.0);
    }
}
