//! Error types for model fitting and validation
//!
//! This module defines the common errors encountered when fitting the regression
//! model, predicting with it, or validating it, along with a convenient `Result` alias.

/// Errors that can occur during regression fitting, prediction, or validation.
///
/// This enum represents the common failure modes when working with the
/// regression model and its backing dataset.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Cannot fit or extract matrices because there is no data.
    #[error("No data available for fitting")]
    NoData,

    /// The feature matrix and target vector disagree on the number of samples.
    ///
    /// Every row of X must have exactly one corresponding price in Y.
    #[error("Feature matrix has {x_rows} rows but the target vector has {y_len} entries")]
    SampleCountMismatch {
        /// Number of rows in the feature matrix
        x_rows: usize,
        /// Number of entries in the target vector
        y_len: usize,
    },

    /// A prediction input has the wrong number of feature columns.
    ///
    /// The model was fit on a fixed number of features; new rows must match it.
    #[error("Expected {expected} features per row, found {found}")]
    FeatureCountMismatch {
        /// Feature count the model was fit on
        expected: usize,
        /// Feature count of the offending input
        found: usize,
    },

    /// Coefficients or metrics were requested before a successful fit.
    #[error("Model has not been trained; call fit() first")]
    NotTrained,

    /// The requested train/test split would leave a partition empty.
    ///
    /// Usually the dataset is too small, or the test fraction is 0 or 1.
    #[error(
        "Test fraction {test_fraction} leaves an empty train or test partition for {n_samples} samples"
    )]
    EmptySplit {
        /// Number of samples available to split
        n_samples: usize,
        /// Requested test fraction
        test_fraction: f64,
    },

    /// The dataset store has no active property with the given id.
    #[error("No active property with id {0}")]
    UnknownRecord(u64),

    /// A categorical feature code is outside its allowed range.
    #[error("{code} is not a valid {kind} code")]
    InvalidCode {
        /// The offending code
        code: u8,
        /// Which categorical feature it was meant for
        kind: &'static str,
    },

    /// Failed to solve the normal equations during fitting.
    ///
    /// Contains a static string describing the solver error.
    #[error("Failed to solve: {0}")]
    Algebra(&'static str),
}

/// Result type for regression fitting and validation
pub type Result<T> = std::result::Result<T, Error>;
