use serde::Serialize;
use tracing::debug;

use crate::advice::MarginTiers;
use crate::context::ContextView;

pub const NO_MARGIN_REPLY: &str = "I couldn't find margin information in the context.";
pub const COMPETITOR_REPLY: &str = "Monitor competitor prices regularly and add value beyond price, like better service or faster delivery.";
pub const PRICING_REPLY: &str =
    "Aim to price competitively but maintain your minimum margin for profitability.";
pub const FALLBACK_REPLY: &str = "I can help with pricing, margin analysis, and competitor strategies. Could you give me more details?";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatIntent {
    Margin,
    Competitor,
    Pricing,
    Fallback,
    /// Caller-registered route, named for logs.
    Custom(&'static str),
}

impl ChatIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Margin => "margin",
            Self::Competitor => "competitor",
            Self::Pricing => "pricing",
            Self::Fallback => "fallback",
            Self::Custom(name) => name,
        }
    }
}

/// What a handler gets to look at. `question` is already lower-cased.
pub struct RouteInput<'a> {
    pub question: &'a str,
    pub margin_percent: Option<f64>,
    pub tiers: &'a MarginTiers,
}

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;
type Handler = Box<dyn Fn(&RouteInput<'_>) -> String + Send + Sync>;

pub struct ChatRoute {
    intent: ChatIntent,
    predicate: Predicate,
    handler: Handler,
}

impl ChatRoute {
    pub fn new<P, H>(intent: ChatIntent, predicate: P, handler: H) -> Self
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
        H: Fn(&RouteInput<'_>) -> String + Send + Sync + 'static,
    {
        Self { intent, predicate: Box::new(predicate), handler: Box::new(handler) }
    }

    /// Route taken when the lower-cased question contains `keyword`.
    pub fn keyword<H>(intent: ChatIntent, keyword: &'static str, handler: H) -> Self
    where
        H: Fn(&RouteInput<'_>) -> String + Send + Sync + 'static,
    {
        Self::new(intent, move |question: &str| question.contains(keyword), handler)
    }

    pub fn intent(&self) -> ChatIntent {
        self.intent
    }
}

impl std::fmt::Debug for ChatRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatRoute").field("intent", &self.intent).finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub intent: ChatIntent,
    pub text: String,
}

/// Ordered keyword routes: the first matching route answers, otherwise the
/// fallback does. Stateless; every question is classified on its own.
#[derive(Debug)]
pub struct ChatRouter {
    routes: Vec<ChatRoute>,
}

impl Default for ChatRouter {
    fn default() -> Self {
        Self {
            routes: vec![
                ChatRoute::keyword(ChatIntent::Margin, "margin", margin_reply),
                ChatRoute::keyword(ChatIntent::Competitor, "competitor", |_| {
                    COMPETITOR_REPLY.to_string()
                }),
                ChatRoute::keyword(ChatIntent::Pricing, "price", |_| PRICING_REPLY.to_string()),
            ],
        }
    }
}

impl ChatRouter {
    pub fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    /// Appends a route with the lowest priority so far.
    pub fn with_route(mut self, route: ChatRoute) -> Self {
        self.routes.push(route);
        self
    }

    /// Inserts `route` ahead of the first route for `intent`, or last when
    /// no such route exists.
    pub fn insert_before(&mut self, intent: ChatIntent, route: ChatRoute) {
        let index = self
            .routes
            .iter()
            .position(|existing| existing.intent == intent)
            .unwrap_or(self.routes.len());
        self.routes.insert(index, route);
    }

    pub fn intents(&self) -> Vec<ChatIntent> {
        self.routes.iter().map(ChatRoute::intent).collect()
    }

    pub fn route(
        &self,
        question: &str,
        context: &impl ContextView,
        tiers: &MarginTiers,
    ) -> ChatReply {
        let lowered = question.to_lowercase();
        let input =
            RouteInput { question: &lowered, margin_percent: context.margin_percent(), tiers };

        let reply = self
            .routes
            .iter()
            .find(|route| (route.predicate)(lowered.as_str()))
            .map(|route| ChatReply { intent: route.intent, text: (route.handler)(&input) })
            .unwrap_or_else(|| ChatReply {
                intent: ChatIntent::Fallback,
                text: FALLBACK_REPLY.to_string(),
            });

        debug!(
            event_name = "advisor.chat.routed",
            intent = reply.intent.as_str(),
            margin_known = input.margin_percent.is_some(),
            "routed advisor question"
        );
        reply
    }
}

fn margin_reply(input: &RouteInput<'_>) -> String {
    match input.margin_percent {
        Some(margin) => input.tiers.classify(margin).chat_reply().to_string(),
        None => NO_MARGIN_REPLY.to_string(),
    }
}
