use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::PricingError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: f64,
}

/// Output of one pricing evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingDecision {
    /// Raw model output before any business rule.
    pub base_price: f64,
    pub competitor_price: f64,
    pub recommended_price: f64,
    /// Margin on price: `(recommended - cost) / recommended * 100`.
    pub margin_percent: f64,
    /// True when the margin floor lifted the price above the competitive ceiling.
    pub margin_floor_applied: bool,
    pub trace: Vec<PricingTraceStep>,
}

/// The cents-rounded report handed to API consumers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub base_price: Decimal,
    pub recommended_price: Decimal,
    pub profit_margin_percent: Decimal,
    pub competitor_price: Decimal,
}

impl PricingDecision {
    /// Fails when an amount is outside what `Decimal` can hold (about 7.9e28).
    pub fn summary(&self) -> Result<DecisionSummary, PricingError> {
        Ok(DecisionSummary {
            base_price: round_cents("base_price", self.base_price)?,
            recommended_price: round_cents("recommended_price", self.recommended_price)?,
            profit_margin_percent: round_cents("margin_percent", self.margin_percent)?,
            competitor_price: round_cents("competitor_price", self.competitor_price)?,
        })
    }
}

/// Rounds half away from zero to two places.
fn round_cents(field: &'static str, value: f64) -> Result<Decimal, PricingError> {
    Decimal::from_f64(value)
        .map(|amount| amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| PricingError::UnrepresentableAmount { field, value: value.to_string() })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::PricingDecision;
    use crate::errors::PricingError;

    #[test]
    fn summary_rounds_every_amount_to_cents() {
        let decision = PricingDecision {
            base_price: 160.004,
            competitor_price: 150.0,
            recommended_price: 142.5,
            margin_percent: 29.824_561_403_508_77,
            margin_floor_applied: false,
            trace: Vec::new(),
        };

        let summary = decision.summary().expect("summary");

        assert_eq!(summary.base_price, Decimal::new(16000, 2));
        assert_eq!(summary.competitor_price, Decimal::new(15000, 2));
        assert_eq!(summary.recommended_price, Decimal::new(14250, 2));
        assert_eq!(summary.profit_margin_percent, Decimal::new(2982, 2));
    }

    #[test]
    fn summary_serializes_with_api_field_names() {
        let decision = PricingDecision {
            base_price: 90.0,
            competitor_price: 88.0,
            recommended_price: 115.0,
            margin_percent: 13.043_478_260_869_565,
            margin_floor_applied: true,
            trace: Vec::new(),
        };

        let summary = decision.summary().expect("summary");
        let json = serde_json::to_value(summary).expect("summary should serialize");

        assert!(json.get("profit_margin_percent").is_some());
        assert!(json.get("recommended_price").is_some());
    }

    #[test]
    fn amounts_beyond_decimal_range_are_reported_not_zeroed() {
        let decision = PricingDecision {
            base_price: 2e29,
            competitor_price: 1.25e29,
            recommended_price: 1.187_5e29,
            margin_percent: 15.789,
            margin_floor_applied: false,
            trace: Vec::new(),
        };

        assert!(matches!(
            decision.summary(),
            Err(PricingError::UnrepresentableAmount { field: "base_price", .. })
        ));
    }
}
