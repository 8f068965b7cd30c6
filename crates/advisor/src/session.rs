use pricepilot_core::{AdvisoryContext, ChatTurn, PricingEvaluation};
use tracing::info;

use crate::BusinessAdvisor;

/// One user's advisory conversation.
///
/// Holds at most one pricing context; every completed evaluation replaces
/// it. The transcript only grows.
#[derive(Clone, Debug, Default)]
pub struct AdvisorySession {
    context: Option<AdvisoryContext>,
    transcript: Vec<ChatTurn>,
}

impl AdvisorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current context, returning the one it displaced.
    pub fn set_context(&mut self, context: AdvisoryContext) -> Option<AdvisoryContext> {
        info!(
            event_name = "advisor.context.replaced",
            evaluation_id = %context.evaluation_id,
            had_previous = self.context.is_some(),
            "advisory context updated"
        );
        self.context.replace(context)
    }

    pub fn record_evaluation(&mut self, evaluation: &PricingEvaluation) -> Option<AdvisoryContext> {
        self.set_context(evaluation.context.clone())
    }

    pub fn context(&self) -> Option<&AdvisoryContext> {
        self.context.as_ref()
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Answers `question` against the current context and appends both
    /// turns to the transcript.
    pub fn ask(&mut self, advisor: &BusinessAdvisor, question: &str) -> String {
        let answer = advisor.chat(question, &self.context.as_ref());
        self.transcript.push(ChatTurn::user(question));
        self.transcript.push(ChatTurn::advisor(answer.clone()));
        answer
    }

    pub fn advice(&self, advisor: &BusinessAdvisor) -> String {
        advisor.advise(&self.context.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use pricepilot_core::{AdvisoryContext, PricingDecision, Speaker};
    use uuid::Uuid;

    use super::AdvisorySession;
    use crate::advice::{MarginTier, ADVICE_HEADING};
    use crate::chat::NO_MARGIN_REPLY;
    use crate::BusinessAdvisor;

    fn context(margin_percent: f64) -> AdvisoryContext {
        let decision = PricingDecision {
            base_price: 200.0,
            competitor_price: 180.0,
            recommended_price: 171.0,
            margin_percent,
            margin_floor_applied: false,
            trace: Vec::new(),
        };
        AdvisoryContext::from_decision(Uuid::new_v4(), &decision, 150.0)
    }

    #[test]
    fn empty_session_degrades_gracefully() {
        let advisor = BusinessAdvisor::default();
        let mut session = AdvisorySession::new();

        assert_eq!(session.ask(&advisor, "How is my margin?"), NO_MARGIN_REPLY);
        assert_eq!(
            session.advice(&advisor),
            [
                ADVICE_HEADING,
                "- Monitor competitor pricing weekly.",
                "- Build loyalty programs to reduce churn."
            ]
            .join("\n")
        );
    }

    #[test]
    fn latest_context_wins() {
        let advisor = BusinessAdvisor::default();
        let mut session = AdvisorySession::new();

        assert!(session.set_context(context(5.0)).is_none());
        let previous = session.set_context(context(25.0)).expect("previous context");

        assert_eq!(previous.margin_percent, 5.0);
        assert_eq!(session.ask(&advisor, "margin?"), MarginTier::Strong.chat_reply());
    }

    #[test]
    fn transcript_alternates_user_and_advisor_turns() {
        let advisor = BusinessAdvisor::default();
        let mut session = AdvisorySession::new();
        session.set_context(context(12.0));

        session.ask(&advisor, "What price should I quote?");
        session.ask(&advisor, "thanks");

        let speakers = session.transcript().iter().map(|turn| turn.speaker()).collect::<Vec<_>>();
        assert_eq!(speakers, vec![Speaker::User, Speaker::Advisor, Speaker::User, Speaker::Advisor]);
        assert_eq!(session.transcript()[0].text(), "What price should I quote?");
    }
}
