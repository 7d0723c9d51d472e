use std::fmt::Write;

use nalgebra::{DMatrix, DVector};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

use crate::{
    error::{Error, Result},
    regression::Regressor,
    statistics,
};

/// Default fraction of rows held out for testing.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Default seed for the split permutation, for reproducible validation runs.
pub const DEFAULT_SEED: u64 = 42;

/// The outcome of one train/test validation run.
///
/// Generalization metrics from the held-out split: R² on both partitions
/// (clamped to `[0, 1]` like all R² values in this crate) and MAE on the
/// test partition only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationReport {
    /// R² of the freshly fit model against its own training partition.
    pub train_r_squared: f64,
    /// R² against the held-out test partition.
    pub test_r_squared: f64,
    /// Mean absolute error on the test partition, in USD.
    pub test_mae: f64,
    /// Number of samples in the training partition.
    pub train_size: usize,
    /// Number of samples in the test partition.
    pub test_size: usize,
}

/// A single entry in the validator's history: either a completed run or a
/// recorded failure message.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The run completed and produced generalization metrics.
    Report(ValidationReport),
    /// The run failed; the message describes why (bad split, inner fit failure).
    Failed(String),
}

/// Estimates out-of-sample performance via a single random train/test split.
///
/// `Validator` partitions the rows of a dataset with a seeded uniform random
/// permutation, fits a **fresh, independent** [`Regressor`] on the training
/// partition only, and scores it on both partitions. The caller's production
/// regressor is never touched.
///
/// This is a single split, not k-fold cross-validation - appropriate for the
/// tens-of-rows datasets this crate targets.
///
/// # History
/// Every call to [`Validator::validate_with`] appends exactly one record to an
/// append-only history, whether it succeeded or failed. [`Validator::summary`]
/// renders the full history in call order; the history never shrinks for the
/// lifetime of the instance.
///
/// # Example
/// ```
/// use pricefit::{dataset::PropertyStore, Validator};
///
/// let (x, y) = PropertyStore::sample().training_matrices().unwrap();
///
/// let mut validator = Validator::new();
/// let report = validator.validate(&x, &y).unwrap();
///
/// assert_eq!(report.train_size + report.test_size, x.nrows());
/// println!("{}", validator.summary());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    history: Vec<ValidationOutcome>,
}

impl Validator {
    /// Creates a new validator with an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates with the default split: 20% test rows, seed 42.
    ///
    /// See [`Validator::validate_with`].
    ///
    /// # Errors
    /// Same as [`Validator::validate_with`].
    pub fn validate(&mut self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<ValidationReport> {
        self.validate_with(x, y, DEFAULT_TEST_FRACTION, DEFAULT_SEED)
    }

    /// Runs one seeded train/test validation and records the outcome.
    ///
    /// Rows are shuffled with a pseudo-random permutation seeded by `seed`, so
    /// identical inputs and seed always produce identical partitions and
    /// metrics. `ceil(test_fraction · n)` rows go to the test partition, the
    /// rest to training - pure uniform sampling, no stratification.
    ///
    /// The outcome - success or failure - is appended to the history either way.
    ///
    /// # Parameters
    /// - `x`, `y`: the full dataset; the production model's training data.
    /// - `test_fraction`: fraction of rows held out, must leave both partitions non-empty.
    /// - `seed`: seed for the row permutation.
    ///
    /// # Errors
    /// - [`Error::SampleCountMismatch`]: `x` and `y` disagree on the row count.
    /// - [`Error::EmptySplit`]: `test_fraction` leaves the train or test partition empty.
    /// - Any error from the inner [`Regressor::fit`] on the training partition.
    pub fn validate_with(
        &mut self,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        test_fraction: f64,
        seed: u64,
    ) -> Result<ValidationReport> {
        match Self::run(x, y, test_fraction, seed) {
            Ok(report) => {
                self.history.push(ValidationOutcome::Report(report));
                Ok(report)
            }
            Err(e) => {
                self.history.push(ValidationOutcome::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// The fallible body of a validation run, kept separate so the caller can
    /// record the outcome exactly once.
    fn run(
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        test_fraction: f64,
        seed: u64,
    ) -> Result<ValidationReport> {
        let n = x.nrows();
        if n != y.len() {
            return Err(Error::SampleCountMismatch {
                x_rows: n,
                y_len: y.len(),
            });
        }

        let (train_idx, test_idx) = Self::split_indices(n, test_fraction, seed)?;
        let (x_train, y_train) = Self::subset(x, y, &train_idx);
        let (x_test, y_test) = Self::subset(x, y, &test_idx);

        let mut model = Regressor::new();
        model.fit(&x_train, &y_train)?;

        let train_fit = model.predict(&x_train)?;
        let test_fit = model.predict(&x_test)?;

        Ok(ValidationReport {
            train_r_squared: statistics::r_squared(
                y_train.iter().copied(),
                train_fit.iter().copied(),
            ),
            test_r_squared: statistics::r_squared(
                y_test.iter().copied(),
                test_fit.iter().copied(),
            ),
            test_mae: statistics::mean_absolute_error(
                y_test.iter().copied(),
                test_fit.iter().copied(),
            ),
            train_size: train_idx.len(),
            test_size: test_idx.len(),
        })
    }

    /// Partitions `0..n` into shuffled (train, test) index sets.
    fn split_indices(n: usize, test_fraction: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
        let n_test = (test_fraction * n as f64).ceil() as usize;
        if n_test == 0 || n_test >= n {
            return Err(Error::EmptySplit {
                n_samples: n,
                test_fraction,
            });
        }

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = SmallRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let test_idx = indices.split_off(n - n_test);
        Ok((indices, test_idx))
    }

    /// Copies the selected rows of X/Y into a contiguous sub-dataset.
    fn subset(x: &DMatrix<f64>, y: &DVector<f64>, idx: &[usize]) -> (DMatrix<f64>, DVector<f64>) {
        let sub_x = DMatrix::from_fn(idx.len(), x.ncols(), |r, c| x[(idx[r], c)]);
        let sub_y = DVector::from_iterator(idx.len(), idx.iter().map(|&i| y[i]));
        (sub_x, sub_y)
    }

    /// Returns the full validation history, in call order.
    #[must_use]
    pub fn history(&self) -> &[ValidationOutcome] {
        &self.history
    }

    /// Renders a human-readable report of every validation run so far.
    ///
    /// One 1-indexed block per history entry, in call order, with failed runs
    /// labeled distinctly. Returns a placeholder line when nothing has been
    /// recorded yet. Read-only; never mutates the history.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.history.is_empty() {
            return "No validations have been recorded".to_string();
        }

        let mut out = String::from("MODEL VALIDATION:\n");
        for (i, outcome) in self.history.iter().enumerate() {
            let i = i + 1;
            match outcome {
                ValidationOutcome::Report(report) => {
                    let _ = writeln!(
                        out,
                        "{i}. train R²: {}",
                        statistics::round_to(report.train_r_squared, 4)
                    );
                    let _ = writeln!(
                        out,
                        "   test R²: {}",
                        statistics::round_to(report.test_r_squared, 4)
                    );
                    let _ = writeln!(out, "   test MAE: ${:.0} USD", report.test_mae);
                    let _ = writeln!(
                        out,
                        "   ({} train / {} test samples)",
                        report.train_size, report.test_size
                    );
                }
                ValidationOutcome::Failed(message) => {
                    let _ = writeln!(out, "{i}. failed: {message}");
                }
            }
        }

        out
    }
}
