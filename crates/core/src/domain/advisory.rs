use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::decision::PricingDecision;

/// Snapshot of one pricing decision plus the cost it was computed from.
///
/// The advisor only ever reads it. A session keeps exactly one and replaces
/// it whenever a new evaluation completes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryContext {
    pub evaluation_id: Uuid,
    pub base_price: f64,
    pub competitor_price: f64,
    pub recommended_price: f64,
    pub cost: f64,
    pub margin_percent: f64,
    pub created_at: DateTime<Utc>,
}

impl AdvisoryContext {
    pub fn from_decision(evaluation_id: Uuid, decision: &PricingDecision, cost: f64) -> Self {
        Self {
            evaluation_id,
            base_price: decision.base_price,
            competitor_price: decision.competitor_price,
            recommended_price: decision.recommended_price,
            cost,
            margin_percent: decision.margin_percent,
            created_at: Utc::now(),
        }
    }

    /// Renders the labelled summary the advisor's text parser understands.
    pub fn to_context_text(&self) -> String {
        [
            format!("Base model price: {}", format_currency(self.base_price)),
            format!("Competitor price: {}", format_currency(self.competitor_price)),
            format!("Recommended selling price: {}", format_currency(self.recommended_price)),
            format!("Our cost: {}", format_currency(self.cost)),
            format!("Profit margin: {:.1}%", self.margin_percent),
        ]
        .join("\n")
    }
}

/// `$1,234.56` style: two decimals, comma-grouped thousands.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Advisor,
}

/// One entry in a session transcript. Turns are appended, never edited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    speaker: Speaker,
    text: String,
}

impl ChatTurn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self { speaker, text: text.into() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn advisor(text: impl Into<String>) -> Self {
        Self::new(Speaker::Advisor, text)
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
