//! Seam to the external base-price model.
//!
//! The engine hands the predictor the aligned [`FeatureVector`] and treats a
//! missing or non-finite answer as a predictor fault. Implementations must be
//! deterministic so identical requests reproduce identical decisions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pricing::features::FeatureVector;

pub trait PricePredictor: Send + Sync {
    /// Base price for the aligned features, or `None` when the model has no answer.
    fn predict(&self, features: &FeatureVector) -> Option<f64>;
}

impl<F> PricePredictor for F
where
    F: Fn(&FeatureVector) -> Option<f64> + Send + Sync,
{
    fn predict(&self, features: &FeatureVector) -> Option<f64> {
        self(features)
    }
}

/// Linear model over named columns: `intercept + sum(coefficient * value)`.
///
/// Columns without a coefficient contribute nothing. Useful for embedding
/// hosts that export a regression as plain JSON, and as a deterministic
/// stand-in for tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearPricePredictor {
    pub version: String,
    pub intercept: f64,
    pub coefficients: BTreeMap<String, f64>,
}

impl LinearPricePredictor {
    pub fn new(version: impl Into<String>, intercept: f64) -> Self {
        Self { version: version.into(), intercept, coefficients: BTreeMap::new() }
    }

    pub fn with_coefficient(mut self, column: impl Into<String>, weight: f64) -> Self {
        self.coefficients.insert(column.into(), weight);
        self
    }
}

impl PricePredictor for LinearPricePredictor {
    fn predict(&self, features: &FeatureVector) -> Option<f64> {
        let weighted: f64 = features
            .iter()
            .filter_map(|(column, value)| self.coefficients.get(column).map(|weight| weight * value))
            .sum();
        Some(self.intercept + weighted)
    }
}
