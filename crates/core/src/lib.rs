//! Pricing decision engine.
//!
//! Turns a [`PricingRequest`] into a [`PricingDecision`]: the request is
//! aligned onto the prediction model's feature columns, the external model
//! supplies a base price, and the competitive policy clamps it between a
//! competitor-undercut ceiling and our minimum-margin floor. The resulting
//! [`AdvisoryContext`] is what the business advisor reads.

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod pricing;

pub use domain::advisory::{format_currency, AdvisoryContext, ChatTurn, Speaker};
pub use domain::decision::{DecisionSummary, PricingDecision, PricingTraceStep};
pub use domain::request::{
    Categorical, CustomerType, DemandLevel, PricingRequest, StockAvailability,
};
pub use errors::{InterfaceError, PricingError};
pub use pricing::features::{align, FeatureColumns, FeatureVector};
pub use pricing::policy::{decide, CompetitivePricingPolicy, PricingPolicy};
pub use pricing::predictor::{LinearPricePredictor, PricePredictor};
pub use pricing::{PricingEngine, PricingEvaluation, PricingRuntime};
