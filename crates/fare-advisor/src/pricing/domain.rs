use serde::{Deserialize, Serialize};

use super::rules::predict_optimal_fare;

/// The five scalars a fare suggestion is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareQuoteInput {
    pub current_fare: f64,
    pub occupancy_pct: f64,
    pub market_fare_min: f64,
    pub market_fare_max: f64,
    pub demand_percentile: f64,
}

impl FareQuoteInput {
    /// Input values used by the interactive form when nothing is supplied.
    pub fn form_defaults() -> Self {
        Self {
            current_fare: 600.0,
            occupancy_pct: 45.0,
            market_fare_min: 550.0,
            market_fare_max: 750.0,
            demand_percentile: 80.0,
        }
    }

    pub fn validate(&self) -> Result<(), QuoteInputError> {
        let fields = [
            ("current_fare", self.current_fare),
            ("occupancy_pct", self.occupancy_pct),
            ("market_fare_min", self.market_fare_min),
            ("market_fare_max", self.market_fare_max),
            ("demand_percentile", self.demand_percentile),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(QuoteInputError::NotFinite { field });
            }
        }

        if self.current_fare <= 0.0 {
            return Err(QuoteInputError::NonPositiveFare {
                value: self.current_fare,
            });
        }

        for (field, value) in [
            ("market_fare_min", self.market_fare_min),
            ("market_fare_max", self.market_fare_max),
        ] {
            if value < 0.0 {
                return Err(QuoteInputError::NegativeBound { field, value });
            }
        }

        if self.market_fare_min > self.market_fare_max {
            return Err(QuoteInputError::InvertedMarketBand {
                min: self.market_fare_min,
                max: self.market_fare_max,
            });
        }

        for (field, value) in [
            ("occupancy_pct", self.occupancy_pct),
            ("demand_percentile", self.demand_percentile),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(QuoteInputError::PercentOutOfRange { field, value });
            }
        }

        Ok(())
    }

    /// Validates the inputs and evaluates the pricing rule.
    pub fn quote(&self) -> Result<FareQuoteResult, QuoteInputError> {
        self.validate()?;
        Ok(predict_optimal_fare(
            self.current_fare,
            self.occupancy_pct,
            self.market_fare_min,
            self.market_fare_max,
            self.demand_percentile,
        ))
    }
}

/// Qualitative label attached to a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    pub fn label(&self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
        }
    }
}

/// Which branch of the pricing rule produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingRule {
    Surge,
    Discount,
    Moderate,
}

impl PricingRule {
    pub fn reason(&self) -> &'static str {
        match self {
            PricingRule::Surge => "High demand, low occupancy → surge to capture value",
            PricingRule::Discount => "Low demand, high occupancy → reduce to boost occupancy",
            PricingRule::Moderate => "Moderate demand → slight adjustment",
        }
    }

    pub fn confidence(&self) -> Confidence {
        match self {
            PricingRule::Surge => Confidence::High,
            PricingRule::Discount | PricingRule::Moderate => Confidence::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareQuoteResult {
    pub suggested_price: f64,
    pub confidence: Confidence,
    pub reason: &'static str,
    pub rule: PricingRule,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuoteInputError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("current_fare must be positive, got {value}")]
    NonPositiveFare { value: f64 },
    #[error("{field} must not be negative, got {value}")]
    NegativeBound { field: &'static str, value: f64 },
    #[error("market_fare_min {min} exceeds market_fare_max {max}")]
    InvertedMarketBand { min: f64, max: f64 },
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },
}
