use once_cell::sync::Lazy;
use pricepilot_core::AdvisoryContext;
use regex::Regex;

static MARGIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Profit margin: ([\d.]+)").expect("Invalid margin pattern regex"));

/// What the advisor needs to know about a pricing snapshot.
///
/// The typed [`AdvisoryContext`] is authoritative. Free text is accepted for
/// callers that only have the rendered summary; its margin is recovered from
/// the `Profit margin: <number>` label.
pub trait ContextView {
    fn margin_percent(&self) -> Option<f64>;

    fn mentions_competitor_price(&self) -> bool;
}

impl ContextView for AdvisoryContext {
    fn margin_percent(&self) -> Option<f64> {
        self.margin_percent.is_finite().then_some(self.margin_percent)
    }

    /// A decision always carries a competitor price, even a zero one.
    fn mentions_competitor_price(&self) -> bool {
        self.competitor_price.is_finite()
    }
}

impl ContextView for str {
    fn margin_percent(&self) -> Option<f64> {
        extract_margin(self)
    }

    fn mentions_competitor_price(&self) -> bool {
        self.to_lowercase().contains("competitor price")
    }
}

impl ContextView for String {
    fn margin_percent(&self) -> Option<f64> {
        self.as_str().margin_percent()
    }

    fn mentions_competitor_price(&self) -> bool {
        self.as_str().mentions_competitor_price()
    }
}

impl<T: ContextView + ?Sized> ContextView for &T {
    fn margin_percent(&self) -> Option<f64> {
        (**self).margin_percent()
    }

    fn mentions_competitor_price(&self) -> bool {
        (**self).mentions_competitor_price()
    }
}

/// No context at all: nothing to say about margin or competitors.
impl<T: ContextView> ContextView for Option<T> {
    fn margin_percent(&self) -> Option<f64> {
        self.as_ref().and_then(ContextView::margin_percent)
    }

    fn mentions_competitor_price(&self) -> bool {
        self.as_ref().is_some_and(ContextView::mentions_competitor_price)
    }
}

/// First `Profit margin: <number>` in the text. A label followed by
/// something that is not a number (e.g. `1.2.3`) yields `None`.
pub fn extract_margin(text: &str) -> Option<f64> {
    let captures = MARGIN_PATTERN.captures(text)?;
    captures.get(1)?.as_str().parse::<f64>().ok()
}
