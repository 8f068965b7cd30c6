use pricepilot_core::config::AdvisorConfig;
use serde::{Deserialize, Serialize};

use crate::context::ContextView;

pub const ADVICE_HEADING: &str = "📊 Business Insight:";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginTier {
    Low,
    Moderate,
    Strong,
}

impl MarginTier {
    /// Bullet used in the advice summary.
    pub fn advice_line(self) -> &'static str {
        match self {
            Self::Low => "- Low margin: Negotiate vendor costs or raise price.",
            Self::Moderate => "- Moderate margin: Look for efficiency improvements.",
            Self::Strong => "- Strong margin: Consider investing in growth.",
        }
    }

    /// Direct answer used when the user asks about margin.
    pub fn chat_reply(self) -> &'static str {
        match self {
            Self::Low => {
                "Your profit margin is low. Try renegotiating vendor prices or increasing your selling price."
            }
            Self::Moderate => {
                "Your margin is moderate. Consider operational efficiencies to improve profitability."
            }
            Self::Strong => "Your margin is strong, you could invest in growth or marketing.",
        }
    }
}

/// Half-open tier boundaries: `[.., low_below)` is low, `[low_below,
/// strong_from)` moderate, `[strong_from, ..)` strong.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarginTiers {
    pub low_below: f64,
    pub strong_from: f64,
}

impl Default for MarginTiers {
    fn default() -> Self {
        Self::from(&AdvisorConfig::default())
    }
}

impl From<&AdvisorConfig> for MarginTiers {
    fn from(config: &AdvisorConfig) -> Self {
        Self { low_below: config.low_margin_below, strong_from: config.strong_margin_from }
    }
}

impl MarginTiers {
    pub fn classify(&self, margin_percent: f64) -> MarginTier {
        if margin_percent < self.low_below {
            MarginTier::Low
        } else if margin_percent < self.strong_from {
            MarginTier::Moderate
        } else {
            MarginTier::Strong
        }
    }
}

/// Fixed-structure advice: heading, margin tier (when a margin is known),
/// a differentiation tip when a competitor price is in play, and two
/// closing recommendations.
pub fn render_advice(tiers: &MarginTiers, context: &impl ContextView) -> String {
    let mut lines = vec![ADVICE_HEADING];

    if let Some(margin) = context.margin_percent() {
        lines.push(tiers.classify(margin).advice_line());
    }
    if context.mentions_competitor_price() {
        lines.push("- Differentiate on service, not just price.");
    }

    lines.push("- Monitor competitor pricing weekly.");
    lines.push("- Build loyalty programs to reduce churn.");
    lines.join("\n")
}
