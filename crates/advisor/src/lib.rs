//! Business advisor for pricing decisions.
//!
//! Reads the [`AdvisoryContext`](pricepilot_core::AdvisoryContext) produced
//! by the pricing engine and answers two kinds of request:
//! - **Advice** (`advice`) - a fixed-structure summary keyed on the margin tier
//! - **Chat** (`chat`) - ordered keyword routes for free-form questions
//!
//! `session` keeps one caller-owned context and transcript per conversation.
//! The advisor never changes a price; it only explains the one it was given.

pub mod advice;
pub mod chat;
pub mod context;
pub mod session;

use pricepilot_core::config::AdvisorConfig;

pub use advice::{render_advice, MarginTier, MarginTiers, ADVICE_HEADING};
pub use chat::{ChatIntent, ChatReply, ChatRoute, ChatRouter, RouteInput};
pub use context::{extract_margin, ContextView};
pub use session::AdvisorySession;

#[derive(Debug, Default)]
pub struct BusinessAdvisor {
    tiers: MarginTiers,
    router: ChatRouter,
}

impl BusinessAdvisor {
    pub fn from_config(config: &AdvisorConfig) -> Self {
        Self { tiers: MarginTiers::from(config), router: ChatRouter::default() }
    }

    pub fn with_router(mut self, router: ChatRouter) -> Self {
        self.router = router;
        self
    }

    pub fn tiers(&self) -> &MarginTiers {
        &self.tiers
    }

    pub fn advise(&self, context: &impl ContextView) -> String {
        render_advice(&self.tiers, context)
    }

    pub fn route(&self, question: &str, context: &impl ContextView) -> ChatReply {
        self.router.route(question, context, &self.tiers)
    }

    pub fn chat(&self, question: &str, context: &impl ContextView) -> String {
        self.route(question, context).text
    }
}
