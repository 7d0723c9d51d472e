//! # Pricefit
//! ## Linear regression is made entirely out of footguns
//!
//! This library fits a multiple linear regression over a small in-memory property dataset
//! and uses it to predict sale prices; Ordinary least squares might be simple in theory,
//! but there sure is a LOT of the theory.
//!
//! It is designed for developers who need the predictive powers of a regression model
//! without needing to worry about design matrices, pseudoinverses, or what on earth a
//! sum of squares is.
//!
//! I provide a set of tools designed to help you:
//! - Fit a price model to a feature matrix with a single call
//! - Make predictions and get fit-quality metrics from it
//! - Estimate out-of-sample accuracy with a reproducible train/test split
//! - Manage the backing dataset with a simple caller-owned store
//!
//! The simplest use-case is fitting the bundled sample dataset and predicting a price:
//! ```rust
//! use pricefit::{dataset::PropertyStore, Regressor};
//!
//! let store = PropertyStore::sample();
//! let (x, y) = store.training_matrices().expect("sample data is non-empty");
//!
//! let mut model = Regressor::new();
//! model.fit(&x, &y).expect("Failed to fit model");
//!
//! // 120m², 3 rooms, 10 years old, central zone, apartment
//! let price = model.predict_one(&[120.0, 3.0, 10.0, 1.0, 2.0]).unwrap();
//! assert!(price > 0.0);
//! ```
//!
//! # Core Concepts
//! - A [`Regressor`] is a model that approximates prices as a weighted sum of features plus an intercept.
//!     - It is fit once on the full dataset for production predictions.
//!     - Its metrics ([`FitMetrics`]) describe how well it explains the data it was trained on.
//!     - An **untrained** regressor predicts zero rather than failing - check [`Regressor::is_trained`]
//!       if you need to tell the difference.
//! - A [`Validator`] estimates how the model performs on data it has *not* seen.
//!     - It fits a fresh regressor on a random subset of the rows and scores it on the rest.
//!     - The split is seeded, so the same inputs always produce the same result.
//!     - Every run is recorded; [`Validator::summary`] reports the full history.
//! - The [`dataset`] module defines the canonical feature order and an in-memory property store.
//!     - Column order is a contract: consumers must supply features in exactly that order.
//!
//! # Implementation Details
//!
//! This crate is implemented in Rust and makes use of the `nalgebra` library for linear algebra operations.
//!
//! Coefficients are solved in closed form from the normal equations, using the Moore-Penrose
//! pseudoinverse of the Gram matrix rather than a plain inverse. For small or collinear
//! datasets the Gram matrix can be singular; the pseudoinverse returns the minimum-norm
//! least-squares solution in that case instead of failing.
//!
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)] // Row counts fit comfortably in f64
#![allow(clippy::similar_names)] //       Clippy does not get to decide what names are similar

pub mod dataset;
pub mod error;
pub mod statistics;

mod regression;
mod validation;

pub use regression::{FitMetrics, Regressor};
pub use validation::{ValidationOutcome, ValidationReport, Validator};

pub use nalgebra;
