use tracing::{debug, warn};

use crate::config::PolicyConfig;
use crate::domain::decision::{PricingDecision, PricingTraceStep};
use crate::domain::request::PricingRequest;
use crate::errors::PricingError;

pub trait PricingPolicy: Send + Sync {
    fn decide(
        &self,
        request: &PricingRequest,
        base_price: f64,
    ) -> Result<PricingDecision, PricingError>;
}

/// Blends the model's base price with the competitor price and our margin floor.
///
/// The competitive ceiling is `min(base_price, competitor_price * undercut)`.
/// The margin floor is applied after it and always wins, so the result can
/// sit above both the ceiling and the competitor price, but never above
/// `base_price` unless the floor forces it.
#[derive(Clone, Debug, Default)]
pub struct CompetitivePricingPolicy {
    config: PolicyConfig,
}

impl CompetitivePricingPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    fn warn_outside_expected_ranges(&self, request: &PricingRequest) {
        if !self.config.expected_markup_pct.contains(request.competitor_markup_pct) {
            warn!(
                event_name = "pricing.request.out_of_expected_range",
                field = "competitor_markup_pct",
                value = request.competitor_markup_pct,
                min = self.config.expected_markup_pct.min,
                max = self.config.expected_markup_pct.max,
                "competitor markup outside expected range; pricing anyway"
            );
        }
        if !self.config.expected_min_margin_pct.contains(request.min_margin_pct) {
            warn!(
                event_name = "pricing.request.out_of_expected_range",
                field = "min_margin_pct",
                value = request.min_margin_pct,
                min = self.config.expected_min_margin_pct.min,
                max = self.config.expected_min_margin_pct.max,
                "minimum margin outside expected range; pricing anyway"
            );
        }
    }
}

impl PricingPolicy for CompetitivePricingPolicy {
    fn decide(
        &self,
        request: &PricingRequest,
        base_price: f64,
    ) -> Result<PricingDecision, PricingError> {
        request.validate()?;
        if !base_price.is_finite() {
            return Err(PricingError::PredictorFault(format!(
                "base price must be finite (got {base_price})"
            )));
        }
        self.warn_outside_expected_ranges(request);

        let undercut = self.config.competitor_undercut_factor;
        let competitor_price = request.competitor_price();
        let min_acceptable_price = request.margin_floor();
        let ceiling = base_price.min(competitor_price * undercut);
        let recommended_price = ceiling.max(min_acceptable_price);
        let margin_floor_applied = min_acceptable_price > ceiling;

        if recommended_price == 0.0 {
            return Err(PricingError::DivisionByZero);
        }
        let margin_percent = (recommended_price - request.cost) / recommended_price * 100.0;

        if margin_floor_applied {
            debug!(
                event_name = "pricing.policy.margin_floor_applied",
                ceiling,
                min_acceptable_price,
                "margin floor lifted the price above the competitive ceiling"
            );
        }

        let trace = vec![
            step("base_price", "model estimate", base_price),
            step(
                "competitor_price",
                format!(
                    "estimated_competitor_cost * (1 + {}/100)",
                    request.competitor_markup_pct
                ),
                competitor_price,
            ),
            step(
                "competitive_ceiling",
                format!("min(base_price, competitor_price * {undercut})"),
                ceiling,
            ),
            step(
                "margin_floor",
                format!("cost * (1 + {}/100)", request.min_margin_pct),
                min_acceptable_price,
            ),
            step("recommended_price", "max(competitive_ceiling, margin_floor)", recommended_price),
        ];

        Ok(PricingDecision {
            base_price,
            competitor_price,
            recommended_price,
            margin_percent,
            margin_floor_applied,
            trace,
        })
    }
}

fn step(stage: &str, detail: impl Into<String>, amount: f64) -> PricingTraceStep {
    PricingTraceStep { stage: stage.to_string(), detail: detail.into(), amount }
}

/// Decides with the default policy (5% competitor undercut).
pub fn decide(request: &PricingRequest, base_price: f64) -> Result<PricingDecision, PricingError> {
    CompetitivePricingPolicy::default().decide(request, base_price)
}
