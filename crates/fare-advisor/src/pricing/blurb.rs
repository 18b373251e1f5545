use std::fmt;

use super::rules::round_currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FareDirection {
    Increase,
    Decrease,
}

impl FareDirection {
    /// A zero change counts as a decrease.
    pub fn between(current_fare: f64, suggested_fare: f64) -> Self {
        let change = round_currency(suggested_fare - current_fare);
        if change > 0.0 {
            FareDirection::Increase
        } else {
            FareDirection::Decrease
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FareDirection::Increase => "increase",
            FareDirection::Decrease => "decrease",
        }
    }
}

/// Renders the operator message with the default currency symbol.
pub fn make_blurb(
    current_fare: f64,
    suggested_fare: f64,
    occupancy_pct: f64,
    demand_percentile: f64,
) -> String {
    BlurbTemplate::default().render(
        current_fare,
        suggested_fare,
        occupancy_pct,
        demand_percentile,
    )
}

/// Operator-facing message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlurbTemplate {
    pub currency_symbol: String,
}

impl Default for BlurbTemplate {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}

impl BlurbTemplate {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn render(
        &self,
        current_fare: f64,
        suggested_fare: f64,
        occupancy_pct: f64,
        demand_percentile: f64,
    ) -> String {
        let direction = FareDirection::between(current_fare, suggested_fare);
        let symbol = &self.currency_symbol;
        format!(
            "Dear Operator,\n\n\
Based on current occupancy levels of {occ}% and a demand percentile of {dp}%, \
our pricing model recommends a fare {direction} from {symbol}{current_fare:.2} to {symbol}{suggested_fare:.2}.\n\n\
This adjustment is expected to optimize seat fill and improve revenue.\n\n\
Regards,\nPricing Intelligence Team",
            occ = Percent(occupancy_pct),
            dp = Percent(demand_percentile),
            direction = direction.label(),
        )
    }
}

/// Prints whole percentages without a fractional part.
struct Percent(f64);

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
