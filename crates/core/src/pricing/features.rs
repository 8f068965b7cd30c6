use std::collections::HashMap;

use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use tracing::debug;

use crate::domain::request::{Categorical, PricingRequest};

pub const COST_COLUMN: &str = "costing";
pub const INSTALLATION_COST_COLUMN: &str = "Installation_Cost";
pub const COMPETITOR_COST_COLUMN: &str = "est_competitor_cost";

/// The ordered column list the prediction model was trained on. It is
/// supplied from outside (exported next to the model) and never reordered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct FeatureColumns(Vec<String>);

impl FeatureColumns {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(columns.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Model input: one value per known column, in the known-column order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(String, f64)>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Values only, positionally matching the model's column order.
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, value)| *value).collect()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|(column, _)| column == name).map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(name, value)| (name, value)))
    }
}

/// Maps a request onto the model's column layout.
///
/// Categorical fields are one-hot encoded with the first label (in
/// lexicographic order) dropped as the baseline. Columns the request does not
/// produce are zero-filled; produced columns the model does not know are
/// discarded. Neither case is an error.
pub fn align(request: &PricingRequest, columns: &FeatureColumns) -> FeatureVector {
    let mut produced: HashMap<String, f64> = HashMap::new();
    produced.insert(COST_COLUMN.to_string(), request.cost);
    produced.insert(INSTALLATION_COST_COLUMN.to_string(), request.installation_cost);
    produced.insert(COMPETITOR_COST_COLUMN.to_string(), request.estimated_competitor_cost);
    produced.extend(indicator_columns(request.demand_level));
    produced.extend(indicator_columns(request.stock_availability));
    produced.extend(indicator_columns(request.customer_type));

    let mut zero_filled = 0usize;
    let entries = columns
        .as_slice()
        .iter()
        .map(|column| {
            let value = produced.get(column).copied().unwrap_or_else(|| {
                zero_filled += 1;
                0.0
            });
            (column.clone(), value)
        })
        .collect::<Vec<_>>();

    let dropped = produced.keys().filter(|name| !columns.as_slice().contains(*name)).count();
    debug!(
        event_name = "pricing.features.aligned",
        known_columns = columns.len(),
        zero_filled,
        dropped,
        "aligned request onto model columns"
    );

    FeatureVector { entries }
}

/// `<FIELD>_<label>` indicators for every label except the baseline.
fn indicator_columns<T: Categorical>(value: T) -> Vec<(String, f64)> {
    let mut labels = T::all().iter().map(|candidate| candidate.label()).collect::<Vec<_>>();
    labels.sort_unstable();

    labels
        .into_iter()
        .skip(1)
        .map(|label| {
            let hit = if label == value.label() { 1.0 } else { 0.0 };
            (format!("{}_{}", T::FIELD, label), hit)
        })
        .collect()
}
