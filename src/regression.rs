use nalgebra::{DMatrix, DVector};

use crate::{
    dataset::FEATURE_LABELS,
    error::{Error, Result},
    statistics,
};

/// Fit-quality metrics for a trained regressor, computed against its own training data.
///
/// All values are stored at full precision; rounding happens only in
/// [`FitMetrics::report`], so metrics can safely feed further computation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitMetrics {
    /// Proportion of target variance explained by the model, clamped to `[0, 1]`.
    pub r_squared: f64,
    /// Mean absolute error, in the same units as the target (USD).
    pub mae: f64,
    /// Mean squared error.
    pub mse: f64,
    /// Root mean squared error, in the same units as the target (USD).
    pub rmse: f64,
}

impl FitMetrics {
    /// Returns the model's accuracy as a percentage (`R² × 100`).
    #[must_use]
    pub fn precision_percentage(&self) -> f64 {
        self.r_squared * 100.0
    }

    /// Produces the display mapping of all metrics, rounded for presentation.
    ///
    /// Entries appear in a fixed order: R² (4 decimals), then MSE, MAE, RMSE
    /// and precision percentage (2 decimals each).
    ///
    /// The rounding here is for display purposes only - use the struct fields
    /// directly for any further computation.
    #[must_use]
    pub fn report(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("R²", statistics::round_to(self.r_squared, 4)),
            ("MSE", statistics::round_to(self.mse, 2)),
            ("MAE (USD)", statistics::round_to(self.mae, 2)),
            ("RMSE (USD)", statistics::round_to(self.rmse, 2)),
            (
                "precision_percentage",
                statistics::round_to(self.precision_percentage(), 2),
            ),
        ]
    }
}

/// Ordinary least squares multiple linear regression over a fixed set of features.
///
/// `Regressor` fits a linear price model by direct matrix solution of the
/// normal equations, and exposes prediction and metric-reporting operations.
///
/// # How it works
/// - Prepends a constant column of ones to the feature matrix, forming the
///   **design matrix**, so the intercept is solved alongside the feature coefficients.
/// - Solves `β = pinv(XᵀX) · XᵀY` using the Moore-Penrose **pseudoinverse**.
///   For small or collinear datasets `XᵀX` can be singular; the pseudoinverse
///   returns the minimum-norm least-squares solution instead of failing.
/// - Stores `β` (intercept first) and the training-set metrics R², MAE, MSE, RMSE.
///
/// The fitting algorithm works for any fixed number of feature columns ≥ 1,
/// although the surrounding dataset layer always supplies the canonical 5.
///
/// # Untrained behavior
/// Prediction on an untrained regressor returns **zeros** rather than an error.
/// This is a deliberate safe-default so display code never has to handle a
/// failure from `predict`; callers that care must check [`Regressor::is_trained`] first.
///
/// # Example
/// ```
/// use pricefit::{nalgebra::{DMatrix, DVector}, Regressor};
///
/// // price = 1000 + 2000·m²
/// let x = DMatrix::from_row_slice(4, 1, &[50.0, 80.0, 120.0, 200.0]);
/// let y = DVector::from_row_slice(&[101_000.0, 161_000.0, 241_000.0, 401_000.0]);
///
/// let mut model = Regressor::new();
/// model.fit(&x, &y).unwrap();
///
/// assert!(model.metrics().r_squared > 0.99);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Regressor {
    /// Intercept first, then one entry per feature column. `None` until trained.
    coefficients: Option<DVector<f64>>,
    metrics: FitMetrics,
}

impl Regressor {
    /// Creates a new, untrained regressor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once a fit has succeeded.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Returns the metrics from the most recent successful fit.
    ///
    /// All zeros until the model has been trained.
    #[must_use]
    pub fn metrics(&self) -> &FitMetrics {
        &self.metrics
    }

    /// Prepends the constant ones column, turning a feature matrix into a design matrix.
    fn design_matrix(x: &DMatrix<f64>) -> DMatrix<f64> {
        x.clone().insert_column(0, 1.0)
    }

    /// Solves `pinv(XᵀX) · XᵀY` for the coefficient vector.
    fn solve_normal_equations(design: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>> {
        let xt = design.transpose();
        let xtx = &xt * design;
        let xty = &xt * y;

        // Calculate the singular value decomposition of the Gram matrix
        let size = xtx.nrows().max(xtx.ncols());
        let svd = xtx.svd(true, true);

        // Calculate epsilon value
        // ~= machine_epsilon * max(size) * max_singular
        let sigma_max = svd.singular_values.max();
        let epsilon = f64::EPSILON * size as f64 * sigma_max;

        let pinv = svd.pseudo_inverse(epsilon).map_err(Error::Algebra)?;
        let beta = pinv * xty;

        // Make sure the coefficients are valid
        if beta.iter().any(|c| c.is_nan()) {
            return Err(Error::Algebra("NaN in coefficients"));
        }

        Ok(beta)
    }

    /// Fits the model to a feature matrix and target vector.
    ///
    /// Each successful call fully replaces any previous coefficients and metrics;
    /// there is no incremental update. A failed call leaves existing trained
    /// state untouched, so a previously usable model stays usable.
    ///
    /// # Parameters
    /// - `x`: `n × k` feature matrix, rows are samples. For the property domain,
    ///   columns follow the canonical order in [`crate::dataset::FEATURE_LABELS`].
    /// - `y`: length-`n` target vector; `y[i]` is the price of row `i`.
    ///
    /// # Errors
    /// - [`Error::NoData`]: `x` has no rows.
    /// - [`Error::SampleCountMismatch`]: `x` and `y` disagree on the sample count.
    /// - [`Error::Algebra`]: the solve produced no usable coefficients.
    ///
    /// # Notes
    /// `n ≥ k + 1` is recommended but not enforced; with fewer rows the system is
    /// underdetermined and the pseudoinverse yields the minimum-norm exact fit.
    /// A constant target is not an error either - it fits, and R² reports 0.
    pub fn fit(&mut self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<()> {
        if x.nrows() == 0 {
            return Err(Error::NoData);
        }
        if x.nrows() != y.len() {
            return Err(Error::SampleCountMismatch {
                x_rows: x.nrows(),
                y_len: y.len(),
            });
        }

        let design = Self::design_matrix(x);
        let beta = Self::solve_normal_equations(&design, y)?;

        let y_fit = &design * &beta;
        let metrics = FitMetrics {
            r_squared: statistics::r_squared(y.iter().copied(), y_fit.iter().copied()),
            mae: statistics::mean_absolute_error(y.iter().copied(), y_fit.iter().copied()),
            mse: statistics::mean_squared_error(y.iter().copied(), y_fit.iter().copied()),
            rmse: statistics::root_mean_squared_error(y.iter().copied(), y_fit.iter().copied()),
        };

        // Nothing fallible below this point - prior state is only replaced on success
        self.coefficients = Some(beta);
        self.metrics = metrics;
        Ok(())
    }

    /// Predicts target values for a matrix of feature rows.
    ///
    /// # Parameters
    /// - `x`: `m × k` matrix of new samples, columns in the same order the model
    ///   was fit on.
    ///
    /// # Returns
    /// A length-`m` vector of predicted prices.
    ///
    /// On an **untrained** model this returns a zero vector of length `m` for any
    /// input shape. That is a deliberate safe-default, not an error path; check
    /// [`Regressor::is_trained`] if silently-zero output would be a bug for you.
    ///
    /// # Errors
    /// - [`Error::FeatureCountMismatch`]: the model is trained and `x` has the
    ///   wrong number of columns.
    pub fn predict(&self, x: &DMatrix<f64>) -> Result<DVector<f64>> {
        let Some(beta) = &self.coefficients else {
            return Ok(DVector::zeros(x.nrows()));
        };

        if x.ncols() + 1 != beta.len() {
            return Err(Error::FeatureCountMismatch {
                expected: beta.len() - 1,
                found: x.ncols(),
            });
        }

        let design = Self::design_matrix(x);
        Ok(&design * beta)
    }

    /// Predicts the target value for a single feature row.
    ///
    /// Convenience wrapper around [`Regressor::predict`] for one sample;
    /// returns `0.0` on an untrained model.
    ///
    /// # Errors
    /// - [`Error::FeatureCountMismatch`]: the model is trained and `features` has
    ///   the wrong length.
    ///
    /// # Example
    /// ```rust
    /// # use pricefit::Regressor;
    /// let model = Regressor::new();
    /// let price = model.predict_one(&[120.0, 3.0, 10.0, 1.0, 2.0]).unwrap();
    /// assert_eq!(price, 0.0); // untrained
    /// ```
    pub fn predict_one(&self, features: &[f64]) -> Result<f64> {
        let x = DMatrix::from_row_slice(1, features.len(), features);
        let prediction = self.predict(&x)?;
        Ok(prediction[0])
    }

    /// Returns the raw coefficient vector: intercept first, then one entry per
    /// feature column in training order.
    ///
    /// # Errors
    /// - [`Error::NotTrained`]: no successful fit has happened yet.
    pub fn coefficients(&self) -> Result<&DVector<f64>> {
        self.coefficients.as_ref().ok_or(Error::NotTrained)
    }

    /// Returns the coefficients as `(label, value)` pairs for display.
    ///
    /// The intercept comes first, followed by each feature in canonical order.
    /// When the model was fit on the canonical 5 property features the labels
    /// come from [`crate::dataset::FEATURE_LABELS`]; any other width falls back
    /// to positional `x1, x2, …` labels. Values are rounded to 4 decimals.
    ///
    /// # Errors
    /// - [`Error::NotTrained`]: no successful fit has happened yet.
    pub fn labeled_coefficients(&self) -> Result<Vec<(String, f64)>> {
        let beta = self.coefficients()?;
        let n_features = beta.len() - 1;

        let mut labeled = Vec::with_capacity(beta.len());
        labeled.push(("intercept (β0)".to_string(), statistics::round_to(beta[0], 4)));
        for j in 1..beta.len() {
            let label = if n_features == FEATURE_LABELS.len() {
                format!("{} (β{j})", FEATURE_LABELS[j - 1])
            } else {
                format!("x{j} (β{j})")
            };
            labeled.push((label, statistics::round_to(beta[j], 4)));
        }

        Ok(labeled)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    /// Noise-free single-feature dataset: price = 1000 + 2000·m²
    fn linear_dataset() -> (DMatrix<f64>, DVector<f64>) {
        let m2 = [50.0, 80.0, 120.0, 150.0, 200.0];
        let x = DMatrix::from_row_slice(5, 1, &m2);
        let y = DVector::from_iterator(5, m2.iter().map(|v| 1000.0 + 2000.0 * v));
        (x, y)
    }

    #[test]
    fn test_recovers_exact_linear_relationship() {
        let (x, y) = linear_dataset();
        let mut model = Regressor::new();
        model.fit(&x, &y).unwrap();

        let beta = model.coefficients().unwrap();
        assert_eq!(beta.len(), 2);
        // Tolerance is scale-aware: the normal equations square the conditioning
        // of X, so ~1e-5 absolute error on a 1000-scale intercept is expected
        assert!((beta[0] - 1000.0).abs() < 1e-3);
        assert!((beta[1] - 2000.0).abs() < 1e-3);
        assert!((model.metrics().r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_round_trips_training_metrics() {
        let x = DMatrix::from_row_slice(
            6,
            2,
            &[
                85.0, 2.0, 150.0, 3.0, 120.0, 3.0, 95.0, 2.0, 200.0, 4.0, 70.0, 1.0,
            ],
        );
        let y = DVector::from_row_slice(&[
            320_000.0, 420_000.0, 350_000.0, 220_000.0, 520_000.0, 250_000.0,
        ]);

        let mut model = Regressor::new();
        model.fit(&x, &y).unwrap();

        // Recompute MAE/RMSE externally through predict and compare to stored values
        let y_fit = model.predict(&x).unwrap();
        let mae = statistics::mean_absolute_error(y.iter().copied(), y_fit.iter().copied());
        let rmse = statistics::root_mean_squared_error(y.iter().copied(), y_fit.iter().copied());

        assert!((mae - model.metrics().mae).abs() < 1e-9);
        assert!((rmse - model.metrics().rmse).abs() < 1e-9);
    }

    #[test]
    fn test_constant_target_reports_zero_r_squared() {
        let x = DMatrix::from_row_slice(4, 1, &[1.0, 2.0, 3.0, 4.0]);
        let y = DVector::from_row_slice(&[5.0, 5.0, 5.0, 5.0]);

        let mut model = Regressor::new();
        model.fit(&x, &y).unwrap();

        let r2 = model.metrics().r_squared;
        assert_eq!(r2, 0.0);
        assert!(!r2.is_nan());
    }

    #[test]
    fn test_untrained_predict_returns_zeros() {
        let model = Regressor::new();

        for cols in [1, 3, 5, 9] {
            let x = DMatrix::from_element(4, cols, 42.0);
            let prediction = model.predict(&x).unwrap();
            assert_eq!(prediction.len(), 4);
            assert!(prediction.iter().all(|&v| v == 0.0));
        }

        assert_eq!(model.predict_one(&[1.0, 2.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_coefficients_untrained_error() {
        let model = Regressor::new();
        assert!(matches!(model.coefficients(), Err(Error::NotTrained)));
        assert!(matches!(
            model.labeled_coefficients(),
            Err(Error::NotTrained)
        ));
    }

    #[test]
    fn test_labeled_coefficients_canonical_order() {
        let x = DMatrix::from_row_slice(
            6,
            5,
            &[
                85.0, 2.0, 5.0, 1.0, 2.0, //
                220.0, 4.0, 2.0, 1.0, 1.0, //
                180.0, 3.0, 8.0, 2.0, 1.0, //
                150.0, 3.0, 12.0, 2.0, 1.0, //
                120.0, 3.0, 15.0, 3.0, 1.0, //
                95.0, 2.0, 20.0, 3.0, 1.0,
            ],
        );
        let y = DVector::from_row_slice(&[
            320_000.0, 850_000.0, 580_000.0, 420_000.0, 350_000.0, 220_000.0,
        ]);

        let mut model = Regressor::new();
        model.fit(&x, &y).unwrap();

        let labeled = model.labeled_coefficients().unwrap();
        assert_eq!(labeled.len(), 6);
        assert!(labeled[0].0.starts_with("intercept"));
        assert!(labeled[1].0.starts_with("area_m2"));
        assert!(labeled[5].0.starts_with("property_type"));
    }

    #[test]
    fn test_sample_count_mismatch() {
        let x = DMatrix::from_element(3, 2, 1.0);
        let y = DVector::from_row_slice(&[1.0, 2.0]);

        let mut model = Regressor::new();
        let result = model.fit(&x, &y);
        assert!(matches!(
            result,
            Err(Error::SampleCountMismatch {
                x_rows: 3,
                y_len: 2
            })
        ));
    }

    #[test]
    fn test_failed_fit_preserves_trained_state() {
        let (x, y) = linear_dataset();
        let mut model = Regressor::new();
        model.fit(&x, &y).unwrap();
        let before = model.coefficients().unwrap().clone();
        let metrics_before = *model.metrics();

        // Malformed input must not clobber the working model
        let bad_y = DVector::from_row_slice(&[1.0]);
        assert!(model.fit(&x, &bad_y).is_err());

        assert_eq!(model.coefficients().unwrap(), &before);
        assert_eq!(*model.metrics(), metrics_before);
    }

    #[test]
    fn test_trained_predict_wrong_width() {
        let (x, y) = linear_dataset();
        let mut model = Regressor::new();
        model.fit(&x, &y).unwrap();

        let wide = DMatrix::from_element(2, 3, 1.0);
        assert!(matches!(
            model.predict(&wide),
            Err(Error::FeatureCountMismatch {
                expected: 1,
                found: 3
            })
        ));
    }

    #[test]
    fn test_underdetermined_two_point_exact_fit() {
        // n = 2 rows, k = 5 features: 6 parameters, underdetermined.
        // The pseudoinverse picks the minimum-norm solution, which still
        // passes through both points exactly.
        let x = DMatrix::from_row_slice(
            2,
            5,
            &[85.0, 2.0, 3.0, 1.0, 2.0, 150.0, 3.0, 8.0, 2.0, 1.0],
        );
        let y = DVector::from_row_slice(&[320_000.0, 580_000.0]);

        let mut model = Regressor::new();
        model.fit(&x, &y).unwrap();

        let prediction = model.predict(&x).unwrap();
        assert!((prediction[0] - 320_000.0).abs() < 1.0);
        assert!((prediction[1] - 580_000.0).abs() < 1.0);
        assert!((model.metrics().r_squared - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_refit_replaces_coefficients() {
        let (x, y) = linear_dataset();
        let mut model = Regressor::new();
        model.fit(&x, &y).unwrap();

        // Refit on a different relationship: price = 500·m²
        let y2 = DVector::from_iterator(5, x.column(0).iter().map(|v| 500.0 * v));
        model.fit(&x, &y2).unwrap();

        let beta = model.coefficients().unwrap();
        assert!(beta[0].abs() < 1e-3);
        assert!((beta[1] - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_metrics_report_rounding() {
        let metrics = FitMetrics {
            r_squared: 0.987_654,
            mae: 12_345.678,
            mse: 1_000_000.555,
            rmse: 1_000.274_9,
        };

        let report = metrics.report();
        let lookup = |key: &str| report.iter().find(|(k, _)| *k == key).unwrap().1;

        assert!((lookup("R²") - 0.9877).abs() < 1e-12);
        assert!((lookup("MAE (USD)") - 12_345.68).abs() < 1e-9);
        assert!((lookup("precision_percentage") - 98.77).abs() < 1e-9);
    }
}
