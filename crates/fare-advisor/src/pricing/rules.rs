use super::domain::{FareQuoteResult, PricingRule};

const SURGE_DEMAND_FLOOR: f64 = 0.7;
const SURGE_OCCUPANCY_CEILING: f64 = 0.5;
const DISCOUNT_DEMAND_CEILING: f64 = 0.3;
const DISCOUNT_OCCUPANCY_FLOOR: f64 = 0.8;

/// Maps occupancy and demand onto a fare inside the market band.
///
/// Inputs are not range-checked here; use [`super::FareQuoteInput::quote`]
/// for validated evaluation.
pub fn predict_optimal_fare(
    current_fare: f64,
    occupancy_pct: f64,
    market_fare_min: f64,
    market_fare_max: f64,
    demand_percentile: f64,
) -> FareQuoteResult {
    let occ = occupancy_pct / 100.0;
    let demand = demand_percentile / 100.0;

    let (rule, multiplier) = select_rule(occ, demand);
    let raw_price = current_fare * multiplier;
    let clamped = raw_price.min(market_fare_max).max(market_fare_min);

    FareQuoteResult {
        suggested_price: round_currency(clamped),
        confidence: rule.confidence(),
        reason: rule.reason(),
        rule,
        multiplier,
    }
}

fn select_rule(occ: f64, demand: f64) -> (PricingRule, f64) {
    if demand >= SURGE_DEMAND_FLOOR && occ <= SURGE_OCCUPANCY_CEILING {
        (PricingRule::Surge, 1.1 + 0.2 * (1.0 - occ))
    } else if demand <= DISCOUNT_DEMAND_CEILING && occ >= DISCOUNT_OCCUPANCY_FLOOR {
        (PricingRule::Discount, 0.9 - 0.1 * occ)
    } else {
        (PricingRule::Moderate, 1.0 + (demand - 0.5) * 0.2)
    }
}

/// Two decimal places, ties to even.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::Confidence;

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn high_demand_low_occupancy_surges() {
        let result = predict_optimal_fare(600.0, 45.0, 550.0, 750.0, 80.0);
        assert_eq!(result.rule, PricingRule::Surge);
        assert!(approx(result.multiplier, 1.21));
        assert_eq!(result.suggested_price, 726.0);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(
            result.reason,
            "High demand, low occupancy → surge to capture value"
        );
    }

    #[test]
    fn low_demand_high_occupancy_discounts() {
        let result = predict_optimal_fare(600.0, 90.0, 400.0, 750.0, 20.0);
        assert_eq!(result.rule, PricingRule::Discount);
        assert!(approx(result.multiplier, 0.81));
        assert_eq!(result.suggested_price, 486.0);
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn moderate_demand_keeps_fare_inside_band() {
        let result = predict_optimal_fare(600.0, 50.0, 550.0, 750.0, 50.0);
        assert_eq!(result.rule, PricingRule::Moderate);
        assert!(approx(result.multiplier, 1.0));
        assert_eq!(result.suggested_price, 600.0);
        assert_eq!(result.reason, "Moderate demand → slight adjustment");
    }

    #[test]
    fn branch_thresholds_are_inclusive() {
        assert_eq!(
            predict_optimal_fare(100.0, 50.0, 0.0, 1000.0, 70.0).rule,
            PricingRule::Surge
        );
        assert_eq!(
            predict_optimal_fare(100.0, 80.0, 0.0, 1000.0, 30.0).rule,
            PricingRule::Discount
        );
        assert_eq!(
            predict_optimal_fare(100.0, 51.0, 0.0, 1000.0, 70.0).rule,
            PricingRule::Moderate
        );
    }

    #[test]
    fn surge_takes_priority_and_clamps_to_market_max() {
        let result = predict_optimal_fare(700.0, 0.0, 550.0, 750.0, 100.0);
        assert_eq!(result.rule, PricingRule::Surge);
        assert_eq!(result.suggested_price, 750.0);
    }

    #[test]
    fn discount_clamps_to_market_min() {
        let result = predict_optimal_fare(600.0, 100.0, 550.0, 750.0, 0.0);
        assert_eq!(result.rule, PricingRule::Discount);
        assert_eq!(result.suggested_price, 550.0);
    }

    #[test]
    fn suggestion_stays_within_band_across_grid() {
        for occupancy in (0..=100).step_by(5) {
            for demand in (0..=100).step_by(5) {
                let result =
                    predict_optimal_fare(640.0, occupancy as f64, 580.0, 700.0, demand as f64);
                assert!(
                    (580.0..=700.0).contains(&result.suggested_price),
                    "occupancy {occupancy} demand {demand} produced {}",
                    result.suggested_price
                );
            }
        }
    }

    #[test]
    fn evaluation_is_repeatable() {
        let first = predict_optimal_fare(612.5, 63.0, 500.0, 800.0, 71.0);
        let second = predict_optimal_fare(612.5, 63.0, 500.0, 800.0, 71.0);
        assert_eq!(first, second);
    }

    #[test]
    fn currency_rounding_uses_two_decimals() {
        assert_eq!(round_currency(612.3456), 612.35);
        assert_eq!(round_currency(0.125), 0.12);
        assert_eq!(round_currency(726.0000000000001), 726.0);
    }

    #[test]
    fn ties_are_decided_on_the_scaled_binary_value() {
        // 9.135 is stored just below the tie, but scaling by 100 lands exactly on 913.5.
        assert_eq!(9.135_f64 * 100.0, 913.5);
        assert_eq!(round_currency(9.135), 9.14);
        assert_eq!(round_currency(9.125), 9.12);
    }
}
