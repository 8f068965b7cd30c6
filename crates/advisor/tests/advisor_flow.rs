use pricepilot_advisor::{
    AdvisorySession, BusinessAdvisor, ChatIntent, MarginTier, ADVICE_HEADING,
};
use pricepilot_core::config::AdvisorConfig;
use pricepilot_core::{
    CustomerType, DemandLevel, FeatureColumns, FeatureVector, PricingEngine, PricingRequest,
    PricingRuntime, StockAvailability,
};

fn engine(base_price: f64) -> impl PricingRuntime {
    let columns = FeatureColumns::new(vec![
        "costing".to_string(),
        "Installation_Cost".to_string(),
        "est_competitor_cost".to_string(),
    ]);
    PricingEngine::with_default_policy(columns, move |_: &FeatureVector| -> Option<f64> {
        Some(base_price)
    })
}

fn request(cost: f64, competitor_cost: f64) -> PricingRequest {
    PricingRequest::new(
        cost,
        DemandLevel::Medium,
        StockAvailability::LowStock,
        0.0,
        CustomerType::Enterprise,
        competitor_cost,
    )
}

#[test]
fn evaluation_feeds_advice_and_chat() {
    let advisor = BusinessAdvisor::default();
    let mut session = AdvisorySession::new();

    let evaluation = engine(160.0).evaluate(&request(100.0, 120.0)).expect("evaluation");
    session.record_evaluation(&evaluation);

    let advice = session.advice(&advisor);
    assert_eq!(
        advice,
        [
            ADVICE_HEADING,
            MarginTier::Strong.advice_line(),
            "- Differentiate on service, not just price.",
            "- Monitor competitor pricing weekly.",
            "- Build loyalty programs to reduce churn."
        ]
        .join("\n")
    );

    assert_eq!(session.ask(&advisor, "Is my margin OK?"), MarginTier::Strong.chat_reply());
    assert_eq!(session.transcript().len(), 2);
}

#[test]
fn typed_and_text_contexts_agree() {
    let advisor = BusinessAdvisor::default();
    let evaluation = engine(90.0)
        .evaluate(&request(100.0, 80.0).with_competitor_markup_pct(10.0))
        .expect("evaluation");

    let typed = &evaluation.context;
    let text = typed.to_context_text();

    assert_eq!(advisor.advise(typed), advisor.advise(&text));
    assert_eq!(advisor.chat("margin", typed), MarginTier::Moderate.chat_reply());
    assert_eq!(advisor.chat("margin", &text), MarginTier::Moderate.chat_reply());
}

#[test]
fn zero_competitor_cost_keeps_the_differentiation_tip() {
    let advisor = BusinessAdvisor::default();
    let request = PricingRequest::new(
        100.0,
        DemandLevel::High,
        StockAvailability::InStock,
        0.0,
        CustomerType::Corporate,
        0.0,
    );
    let evaluation = engine(160.0).evaluate(&request).expect("evaluation");

    let typed = &evaluation.context;
    let advice = advisor.advise(typed);

    assert_eq!(typed.competitor_price, 0.0);
    assert!(advice.lines().any(|line| line == "- Differentiate on service, not just price."));
    assert_eq!(advice, advisor.advise(&typed.to_context_text()));
}

#[test]
fn tier_texts_follow_the_configured_boundaries() {
    let advisor = BusinessAdvisor::default();
    let cases = [
        ("Profit margin: 9.999%", MarginTier::Low),
        ("Profit margin: 10%", MarginTier::Moderate),
        ("Profit margin: 19.999%", MarginTier::Moderate),
        ("Profit margin: 20%", MarginTier::Strong),
    ];

    for (context, tier) in cases {
        assert_eq!(advisor.chat("what about my margin?", &context), tier.chat_reply(), "{context}");
    }

    let strict = BusinessAdvisor::from_config(&AdvisorConfig {
        low_margin_below: 15.0,
        strong_margin_from: 30.0,
    });
    assert_eq!(strict.chat("margin", &"Profit margin: 20%"), MarginTier::Moderate.chat_reply());
}

#[test]
fn chat_priority_is_margin_then_competitor_then_price() {
    let advisor = BusinessAdvisor::default();
    let context = "Competitor price: $150.00\nProfit margin: 4.0%";

    assert_eq!(
        advisor.route("margin vs competitor price", &context).intent,
        ChatIntent::Margin
    );
    assert_eq!(advisor.route("competitor price?", &context).intent, ChatIntent::Competitor);
    assert_eq!(advisor.route("PRICE?", &context).intent, ChatIntent::Pricing);
    assert_eq!(advisor.route("hi", &context).intent, ChatIntent::Fallback);
}
