use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::PricingError;

pub const DEFAULT_COMPETITOR_MARKUP_PCT: f64 = 25.0;
pub const DEFAULT_MIN_MARGIN_PCT: f64 = 15.0;

/// A request field drawn from a closed set of labels.
///
/// `FIELD` is the column prefix the prediction model was trained with and
/// `label` is the value exactly as the training data spells it. Both feed the
/// indicator column names built by the feature aligner.
pub trait Categorical: Copy + Eq + fmt::Debug + 'static {
    const FIELD: &'static str;

    /// Every value, in declaration order.
    fn all() -> &'static [Self];

    fn label(self) -> &'static str;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DemandLevel {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockAvailability {
    #[serde(rename = "In Stock", alias = "in_stock")]
    InStock,
    #[serde(rename = "Low Stock", alias = "low_stock")]
    LowStock,
    #[serde(rename = "Out of Stock", alias = "out_of_stock")]
    OutOfStock,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerType {
    #[serde(alias = "corporate")]
    Corporate,
    #[serde(alias = "enterprise")]
    Enterprise,
    #[serde(alias = "government")]
    Government,
    #[serde(rename = "SME", alias = "sme")]
    Sme,
}

impl Categorical for DemandLevel {
    const FIELD: &'static str = "Demand_Level";

    fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }

    fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl Categorical for StockAvailability {
    const FIELD: &'static str = "Stock_Availability";

    fn all() -> &'static [Self] {
        &[Self::InStock, Self::LowStock, Self::OutOfStock]
    }

    fn label(self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

impl Categorical for CustomerType {
    const FIELD: &'static str = "Customer_Type";

    fn all() -> &'static [Self] {
        &[Self::Corporate, Self::Enterprise, Self::Government, Self::Sme]
    }

    fn label(self) -> &'static str {
        match self {
            Self::Corporate => "Corporate",
            Self::Enterprise => "Enterprise",
            Self::Government => "Government",
            Self::Sme => "SME",
        }
    }
}

/// Matches a label case-insensitively, treating `_`, `-` and spaces alike so
/// `"Low Stock"`, `"low_stock"` and `"LOW-STOCK"` resolve to the same value.
fn parse_label<T: Categorical>(field: &'static str, raw: &str) -> Result<T, PricingError> {
    let wanted = normalize_label(raw);
    T::all().iter().copied().find(|value| normalize_label(value.label()) == wanted).ok_or_else(
        || {
            let expected = T::all().iter().map(|value| value.label()).collect::<Vec<_>>();
            PricingError::invalid(
                field,
                format!("has unknown value `{}` (expected {})", raw.trim(), expected.join("|")),
            )
        },
    )
}

fn normalize_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|ch| if ch == '_' || ch == '-' { ' ' } else { ch.to_ascii_lowercase() })
        .collect()
}

impl FromStr for DemandLevel {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_label("demand_level", value)
    }
}

impl FromStr for StockAvailability {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_label("stock_availability", value)
    }
}

impl FromStr for CustomerType {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_label("customer_type", value)
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for StockAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Input to a single pricing decision. Percentages are plain numbers
/// (`25.0` means 25%), divided by 100 at the point of use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    #[serde(alias = "costing")]
    pub cost: f64,
    pub demand_level: DemandLevel,
    pub stock_availability: StockAvailability,
    pub installation_cost: f64,
    pub customer_type: CustomerType,
    #[serde(alias = "est_competitor_cost")]
    pub estimated_competitor_cost: f64,
    #[serde(default = "default_competitor_markup_pct", alias = "comp_markup")]
    pub competitor_markup_pct: f64,
    #[serde(default = "default_min_margin_pct", alias = "our_min_margin")]
    pub min_margin_pct: f64,
}

fn default_competitor_markup_pct() -> f64 {
    DEFAULT_COMPETITOR_MARKUP_PCT
}

fn default_min_margin_pct() -> f64 {
    DEFAULT_MIN_MARGIN_PCT
}

impl PricingRequest {
    pub fn new(
        cost: f64,
        demand_level: DemandLevel,
        stock_availability: StockAvailability,
        installation_cost: f64,
        customer_type: CustomerType,
        estimated_competitor_cost: f64,
    ) -> Self {
        Self {
            cost,
            demand_level,
            stock_availability,
            installation_cost,
            customer_type,
            estimated_competitor_cost,
            competitor_markup_pct: DEFAULT_COMPETITOR_MARKUP_PCT,
            min_margin_pct: DEFAULT_MIN_MARGIN_PCT,
        }
    }

    pub fn with_competitor_markup_pct(mut self, competitor_markup_pct: f64) -> Self {
        self.competitor_markup_pct = competitor_markup_pct;
        self
    }

    pub fn with_min_margin_pct(mut self, min_margin_pct: f64) -> Self {
        self.min_margin_pct = min_margin_pct;
        self
    }

    /// Rejects non-finite numbers and negative monetary amounts. Enum fields
    /// are already closed by construction; unknown labels fail at parse time.
    pub fn validate(&self) -> Result<(), PricingError> {
        validate_amount("cost", self.cost)?;
        validate_amount("installation_cost", self.installation_cost)?;
        validate_amount("estimated_competitor_cost", self.estimated_competitor_cost)?;
        validate_percentage("competitor_markup_pct", self.competitor_markup_pct)?;
        validate_percentage("min_margin_pct", self.min_margin_pct)?;
        Ok(())
    }

    /// `cost * (1 + min_margin_pct / 100)`: the lowest price the policy may recommend.
    pub fn margin_floor(&self) -> f64 {
        self.cost * (1.0 + self.min_margin_pct / 100.0)
    }

    /// `estimated_competitor_cost * (1 + competitor_markup_pct / 100)`.
    pub fn competitor_price(&self) -> f64 {
        self.estimated_competitor_cost * (1.0 + self.competitor_markup_pct / 100.0)
    }
}

fn validate_amount(field: &'static str, value: f64) -> Result<(), PricingError> {
    if !value.is_finite() {
        return Err(PricingError::invalid(field, format!("must be finite (got {value})")));
    }
    if value < 0.0 {
        return Err(PricingError::invalid(field, format!("must not be negative (got {value})")));
    }
    Ok(())
}

fn validate_percentage(field: &'static str, value: f64) -> Result<(), PricingError> {
    if !value.is_finite() {
        return Err(PricingError::invalid(field, format!("must be finite (got {value})")));
    }
    Ok(())
}
