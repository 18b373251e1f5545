use serde::Serialize;
use tracing::debug;

use super::blurb::BlurbTemplate;
use super::domain::{FareQuoteInput, FareQuoteResult, QuoteInputError};
use crate::config::PricingConfig;

/// A validated suggestion together with the message sent to the operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareAdvice {
    #[serde(flatten)]
    pub quote: FareQuoteResult,
    pub blurb: String,
}

/// Runs the pricing rule and renders the operator blurb for each quote.
#[derive(Debug, Clone, Default)]
pub struct FareAdvisor {
    template: BlurbTemplate,
}

impl FareAdvisor {
    pub fn new(config: &PricingConfig) -> Self {
        Self {
            template: BlurbTemplate::new(config.currency_symbol.clone()),
        }
    }

    pub fn currency_symbol(&self) -> &str {
        &self.template.currency_symbol
    }

    pub fn advise(&self, input: &FareQuoteInput) -> Result<FareAdvice, QuoteInputError> {
        let quote = input.quote()?;
        debug!(
            current_fare = input.current_fare,
            suggested_price = quote.suggested_price,
            rule = ?quote.rule,
            "fare suggestion computed"
        );

        let blurb = self.template.render(
            input.current_fare,
            quote.suggested_price,
            input.occupancy_pct,
            input.demand_percentile,
        );

        Ok(FareAdvice { quote, blurb })
    }
}
