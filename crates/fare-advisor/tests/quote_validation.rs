use fare_advisor::config::PricingConfig;
use fare_advisor::pricing::{
    Confidence, FareAdvisor, FareQuoteInput, PricingRule, QuoteInputError,
};

fn input(occupancy_pct: f64, demand_percentile: f64) -> FareQuoteInput {
    FareQuoteInput {
        occupancy_pct,
        demand_percentile,
        ..FareQuoteInput::form_defaults()
    }
}

#[test]
fn form_defaults_produce_surge_quote() {
    let quote = FareQuoteInput::form_defaults()
        .quote()
        .expect("defaults are valid");
    assert_eq!(quote.rule, PricingRule::Surge);
    assert_eq!(quote.suggested_price, 726.0);
    assert_eq!(quote.confidence, Confidence::High);
}

#[test]
fn validated_quote_rejects_non_finite_values() {
    let error = input(f64::NAN, 50.0).quote().expect_err("nan rejected");
    assert_eq!(
        error,
        QuoteInputError::NotFinite {
            field: "occupancy_pct"
        }
    );

    let bad_fare = FareQuoteInput {
        current_fare: f64::INFINITY,
        ..FareQuoteInput::form_defaults()
    };
    assert!(matches!(
        bad_fare.validate(),
        Err(QuoteInputError::NotFinite {
            field: "current_fare"
        })
    ));
}

#[test]
fn validated_quote_rejects_negative_and_zero_amounts() {
    let free = FareQuoteInput {
        current_fare: 0.0,
        ..FareQuoteInput::form_defaults()
    };
    assert!(matches!(
        free.quote(),
        Err(QuoteInputError::NonPositiveFare { .. })
    ));

    let negative_floor = FareQuoteInput {
        market_fare_min: -10.0,
        ..FareQuoteInput::form_defaults()
    };
    assert!(matches!(
        negative_floor.quote(),
        Err(QuoteInputError::NegativeBound {
            field: "market_fare_min",
            ..
        })
    ));
}

#[test]
fn validated_quote_rejects_inverted_band_and_out_of_range_percentages() {
    let inverted = FareQuoteInput {
        market_fare_min: 800.0,
        market_fare_max: 700.0,
        ..FareQuoteInput::form_defaults()
    };
    assert!(matches!(
        inverted.quote(),
        Err(QuoteInputError::InvertedMarketBand { .. })
    ));

    assert!(matches!(
        input(101.0, 50.0).quote(),
        Err(QuoteInputError::PercentOutOfRange {
            field: "occupancy_pct",
            ..
        })
    ));
    assert!(matches!(
        input(50.0, -1.0).quote(),
        Err(QuoteInputError::PercentOutOfRange {
            field: "demand_percentile",
            ..
        })
    ));
}

#[test]
fn degenerate_band_pins_the_fare() {
    let pinned = FareQuoteInput {
        market_fare_min: 650.0,
        market_fare_max: 650.0,
        ..FareQuoteInput::form_defaults()
    };
    assert_eq!(pinned.quote().expect("valid").suggested_price, 650.0);
}

#[test]
fn advisor_pairs_quote_with_operator_blurb() {
    let advisor = FareAdvisor::new(&PricingConfig {
        currency_symbol: "Rs.".to_string(),
    });
    let advice = advisor
        .advise(&input(90.0, 20.0))
        .expect("valid inputs");

    assert_eq!(advice.quote.rule, PricingRule::Discount);
    assert_eq!(advice.quote.suggested_price, 550.0);
    assert!(advice
        .blurb
        .contains("recommends a fare decrease from Rs.600.00 to Rs.550.00"));
}
