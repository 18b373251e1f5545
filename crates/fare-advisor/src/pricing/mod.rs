//! Fare suggestion rule, operator messaging, and the HTTP quote endpoint.

pub mod blurb;
pub mod domain;
pub mod router;
pub mod rules;
pub mod service;

pub use blurb::{make_blurb, BlurbTemplate, FareDirection};
pub use domain::{Confidence, FareQuoteInput, FareQuoteResult, PricingRule, QuoteInputError};
pub use router::quote_router;
pub use rules::{predict_optimal_fare, round_currency};
pub use service::{FareAdvice, FareAdvisor};
