pub mod features;
pub mod policy;
pub mod predictor;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::advisory::AdvisoryContext;
use crate::domain::decision::PricingDecision;
use crate::domain::request::PricingRequest;
use crate::errors::PricingError;

use self::{
    features::{align, FeatureColumns, FeatureVector},
    policy::{CompetitivePricingPolicy, PricingPolicy},
    predictor::PricePredictor,
};

/// Everything one request produced: the model input, the decision, and the
/// advisory snapshot a session should hold from now on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PricingEvaluation {
    pub evaluation_id: Uuid,
    pub features: FeatureVector,
    pub decision: PricingDecision,
    pub context: AdvisoryContext,
}

pub trait PricingRuntime: Send + Sync {
    fn evaluate(&self, request: &PricingRequest) -> Result<PricingEvaluation, PricingError>;
}

/// request -> align -> predict -> decide -> advisory context.
///
/// Holds no mutable state; one engine can serve concurrent callers as long as
/// the predictor itself can.
pub struct PricingEngine<P, Q = CompetitivePricingPolicy> {
    columns: FeatureColumns,
    predictor: P,
    policy: Q,
}

impl<P> PricingEngine<P, CompetitivePricingPolicy> {
    pub fn with_default_policy(columns: FeatureColumns, predictor: P) -> Self {
        Self::new(columns, predictor, CompetitivePricingPolicy::default())
    }
}

impl<P, Q> PricingEngine<P, Q> {
    pub fn new(columns: FeatureColumns, predictor: P, policy: Q) -> Self {
        Self { columns, predictor, policy }
    }

    pub fn columns(&self) -> &FeatureColumns {
        &self.columns
    }
}

impl<P, Q> PricingRuntime for PricingEngine<P, Q>
where
    P: PricePredictor,
    Q: PricingPolicy,
{
    fn evaluate(&self, request: &PricingRequest) -> Result<PricingEvaluation, PricingError> {
        let evaluation_id = Uuid::new_v4();
        let result = self.evaluate_inner(evaluation_id, request);

        match &result {
            Ok(evaluation) => info!(
                event_name = "pricing.evaluation.completed",
                correlation_id = %evaluation_id,
                base_price = evaluation.decision.base_price,
                recommended_price = evaluation.decision.recommended_price,
                margin_percent = evaluation.decision.margin_percent,
                margin_floor_applied = evaluation.decision.margin_floor_applied,
                "pricing evaluation completed"
            ),
            Err(error) => warn!(
                event_name = "pricing.evaluation.failed",
                correlation_id = %evaluation_id,
                error_class = error.error_class(),
                error = %error,
                "pricing evaluation failed"
            ),
        }

        result
    }
}

impl<P, Q> PricingEngine<P, Q>
where
    P: PricePredictor,
    Q: PricingPolicy,
{
    fn evaluate_inner(
        &self,
        evaluation_id: Uuid,
        request: &PricingRequest,
    ) -> Result<PricingEvaluation, PricingError> {
        request.validate()?;

        let features = align(request, &self.columns);
        let base_price = match self.predictor.predict(&features) {
            Some(value) if value.is_finite() => value,
            Some(value) => {
                return Err(PricingError::PredictorFault(format!(
                    "model returned a non-finite base price ({value})"
                )))
            }
            None => {
                return Err(PricingError::PredictorFault(
                    "model returned no base price".to_string(),
                ))
            }
        };

        let decision = self.policy.decide(request, base_price)?;
        let context = AdvisoryContext::from_decision(evaluation_id, &decision, request.cost);

        Ok(PricingEvaluation { evaluation_id, features, decision, context })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        features::{FeatureColumns, FeatureVector},
        policy::{CompetitivePricingPolicy, PricingPolicy},
        predictor::{LinearPricePredictor, PricePredictor},
        PricingEngine, PricingRuntime,
    };
    use crate::domain::decision::PricingDecision;
    use crate::domain::request::{CustomerType, DemandLevel, PricingRequest, StockAvailability};
    use crate::errors::PricingError;

    fn columns() -> FeatureColumns {
        FeatureColumns::new(["costing", "Installation_Cost", "Demand_Level_Low"])
    }

    fn request() -> PricingRequest {
        PricingRequest::new(
            100.0,
            DemandLevel::Low,
            StockAvailability::LowStock,
            10.0,
            CustomerType::Enterprise,
            120.0,
        )
    }

    #[test]
    fn engine_runs_the_whole_pipeline() {
        let predictor = LinearPricePredictor::new("test", 50.0)
            .with_coefficient("costing", 1.0)
            .with_coefficient("Installation_Cost", 1.0);
        let engine = PricingEngine::with_default_policy(columns(), predictor);

        let evaluation = engine.evaluate(&request()).expect("evaluation");

        assert_eq!(evaluation.features.values(), vec![100.0, 10.0, 1.0]);
        assert_eq!(evaluation.decision.base_price, 160.0);
        assert!((evaluation.decision.recommended_price - 142.5).abs() < 1e-9);
        assert_eq!(evaluation.context.evaluation_id, evaluation.evaluation_id);
        assert_eq!(evaluation.context.cost, 100.0);
        assert_eq!(evaluation.context.margin_percent, evaluation.decision.margin_percent);
    }

    #[test]
    fn non_finite_prediction_is_a_predictor_fault() {
        let engine = PricingEngine::with_default_policy(columns(), |_: &FeatureVector| -> Option<f64> {
            Some(f64::INFINITY)
        });

        assert!(matches!(engine.evaluate(&request()), Err(PricingError::PredictorFault(_))));
    }

    #[test]
    fn missing_prediction_is_a_predictor_fault() {
        let engine =
            PricingEngine::with_default_policy(columns(), |_: &FeatureVector| -> Option<f64> { None });

        assert!(matches!(engine.evaluate(&request()), Err(PricingError::PredictorFault(_))));
    }

    #[test]
    fn invalid_request_never_reaches_the_predictor() {
        struct PanickingPredictor;

        impl PricePredictor for PanickingPredictor {
            fn predict(&self, _features: &FeatureVector) -> Option<f64> {
                panic!("predictor must not be called for invalid input");
            }
        }

        let engine = PricingEngine::with_default_policy(columns(), PanickingPredictor);
        let bad = PricingRequest { estimated_competitor_cost: -5.0, ..request() };

        assert!(matches!(
            engine.evaluate(&bad),
            Err(PricingError::InvalidRequest { field: "estimated_competitor_cost", .. })
        ));
    }

    #[test]
    fn engine_supports_explicit_policy_implementations() {
        struct ListPricePolicy;

        impl PricingPolicy for ListPricePolicy {
            fn decide(
                &self,
                request: &PricingRequest,
                base_price: f64,
            ) -> Result<PricingDecision, PricingError> {
                Ok(PricingDecision {
                    base_price,
                    competitor_price: request.competitor_price(),
                    recommended_price: base_price,
                    margin_percent: (base_price - request.cost) / base_price * 100.0,
                    margin_floor_applied: false,
                    trace: Vec::new(),
                })
            }
        }

        let engine =
            PricingEngine::new(columns(), |_: &FeatureVector| -> Option<f64> { Some(200.0) }, ListPricePolicy);

        let evaluation = engine.evaluate(&request()).expect("evaluation");

        assert_eq!(evaluation.decision.recommended_price, 200.0);
        assert_eq!(evaluation.context.margin_percent, 50.0);
    }

    #[test]
    fn identical_requests_reproduce_identical_decisions() {
        let engine = PricingEngine::new(
            columns(),
            LinearPricePredictor::new("test", 20.0).with_coefficient("costing", 1.1),
            CompetitivePricingPolicy::default(),
        );

        let first = engine.evaluate(&request()).expect("first");
        let second = engine.evaluate(&request()).expect("second");

        assert_eq!(first.decision, second.decision);
        assert_ne!(first.evaluation_id, second.evaluation_id);
    }
}
