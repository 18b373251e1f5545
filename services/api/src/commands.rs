use chrono::{DateTime, Utc};
use clap::Args;
use fare_advisor::config::{AppConfig, ConfigError, PricingConfig};
use fare_advisor::error::AppError;
use fare_advisor::pricing::{FareAdvice, FareAdvisor, FareQuoteInput};
use fare_advisor::sheet::router::SheetQuoteResponse;
use fare_advisor::sheet::{
    CsvFileSource, FareSheet, FareSheetLoader, RefreshSchedule, SheetRefresher, SheetSource,
};
use fare_advisor::telemetry;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Current fare charged for the service
    #[arg(long, default_value_t = FareQuoteInput::form_defaults().current_fare)]
    pub(crate) current_fare: f64,
    /// Current occupancy (0-100)
    #[arg(long, default_value_t = FareQuoteInput::form_defaults().occupancy_pct)]
    pub(crate) occupancy: f64,
    /// Lowest fare seen in the market
    #[arg(long, default_value_t = FareQuoteInput::form_defaults().market_fare_min)]
    pub(crate) market_min: f64,
    /// Highest fare seen in the market
    #[arg(long, default_value_t = FareQuoteInput::form_defaults().market_fare_max)]
    pub(crate) market_max: f64,
    /// Demand percentile (0-100)
    #[arg(long, default_value_t = FareQuoteInput::form_defaults().demand_percentile)]
    pub(crate) demand: f64,
    /// Override the configured currency symbol
    #[arg(long)]
    pub(crate) currency: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SheetSelectionArgs {
    /// Fare sheet CSV export (defaults to FARE_SHEET_PATH)
    #[arg(long)]
    pub(crate) path: Option<PathBuf>,
    /// Operator to quote (defaults to the first operator in the sheet)
    #[arg(long)]
    pub(crate) operator: Option<String>,
    /// Service id to quote (defaults to the operator's first service)
    #[arg(long)]
    pub(crate) service_id: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct SheetShowArgs {
    #[command(flatten)]
    pub(crate) selection: SheetSelectionArgs,
    /// List every operator and service id in the sheet
    #[arg(long)]
    pub(crate) list: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SheetWatchArgs {
    #[command(flatten)]
    pub(crate) selection: SheetSelectionArgs,
    /// Seconds between reloads (defaults to FARE_SHEET_REFRESH_SECS)
    #[arg(long)]
    pub(crate) interval_secs: Option<u64>,
    /// Stop after this many reloads; runs until Ctrl-C when omitted
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) iterations: Option<u32>,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        current_fare,
        occupancy,
        market_min,
        market_max,
        demand,
        currency,
    } = args;

    let config = AppConfig::load()?;
    let advisor = advisor_for(config.pricing, currency);
    let input = FareQuoteInput {
        current_fare,
        occupancy_pct: occupancy,
        market_fare_min: market_min,
        market_fare_max: market_max,
        demand_percentile: demand,
    };

    let advice = advisor.advise(&input)?;
    println!("Fare suggestion");
    render_advice(&advisor, &advice);
    Ok(())
}

pub(crate) fn run_sheet_show(args: SheetShowArgs) -> Result<(), AppError> {
    let SheetShowArgs { selection, list } = args;
    let config = AppConfig::load()?;
    let path = resolve_path(selection.path.clone(), &config)?;
    let advisor = FareAdvisor::new(&config.pricing);

    let sheet = FareSheetLoader::from_path(&path)?;
    println!(
        "Data loaded from {} ({} rows)",
        path.display(),
        sheet.rows().len()
    );

    if list {
        render_catalog(&sheet);
    }

    let response = quote_selection(&advisor, &sheet, &selection, None)?;
    render_sheet_quote(&advisor, &response);
    Ok(())
}

pub(crate) async fn run_sheet_watch(args: SheetWatchArgs) -> Result<(), AppError> {
    let SheetWatchArgs {
        selection,
        interval_secs,
        iterations,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let path = resolve_path(selection.path.clone(), &config)?;
    let schedule = match interval_secs {
        Some(0) => {
            return Err(ConfigError::InvalidRefreshInterval {
                value: "0".to_string(),
            }
            .into())
        }
        Some(secs) => RefreshSchedule::new(Duration::from_secs(secs)),
        None => config.sheet.schedule(),
    };
    let advisor = FareAdvisor::new(&config.pricing);
    let mut refresher = SheetRefresher::new(CsvFileSource::new(path));

    info!(
        interval_secs = schedule.interval().as_secs(),
        ?iterations,
        "watching fare sheet"
    );

    let completed = watch_loop(
        &mut refresher,
        &advisor,
        &selection,
        schedule,
        iterations,
        tokio::signal::ctrl_c(),
    )
    .await;
    info!(completed, "fare sheet watch stopped");
    Ok(())
}

/// Runs reload ticks until `iterations` is reached or `shutdown` resolves.
///
/// Returns the number of ticks that ran.
async fn watch_loop<S, F>(
    refresher: &mut SheetRefresher<S>,
    advisor: &FareAdvisor,
    selection: &SheetSelectionArgs,
    schedule: RefreshSchedule,
    iterations: Option<u32>,
    shutdown: F,
) -> u32
where
    S: SheetSource,
    F: Future,
{
    let mut ticker = schedule.ticker();
    let mut completed: u32 = 0;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("fare sheet watch interrupted");
                break;
            }
            _ = ticker.tick() => {}
        }

        match watch_tick(refresher, advisor, selection) {
            Ok(response) => {
                if let Some(loaded_at) = response.loaded_at {
                    println!("\nData loaded at {}", loaded_at.to_rfc3339());
                }
                render_sheet_quote(advisor, &response);
            }
            Err(AppError::Sheet(err)) => eprintln!("Error loading sheet: {err}"),
            Err(err) => eprintln!("{err}"),
        }

        completed += 1;
        if iterations.is_some_and(|limit| completed >= limit) {
            break;
        }
    }

    completed
}

/// Reloads the sheet once and quotes the selected row from the fresh snapshot.
///
/// A failed reload leaves the refresher's previous snapshot in place.
fn watch_tick<S: SheetSource>(
    refresher: &mut SheetRefresher<S>,
    advisor: &FareAdvisor,
    selection: &SheetSelectionArgs,
) -> Result<SheetQuoteResponse, AppError> {
    let snapshot = refresher.refresh()?;
    quote_selection(advisor, &snapshot.sheet, selection, Some(snapshot.loaded_at))
}

fn advisor_for(mut pricing: PricingConfig, currency: Option<String>) -> FareAdvisor {
    if let Some(symbol) = currency {
        pricing.currency_symbol = symbol;
    }
    FareAdvisor::new(&pricing)
}

fn resolve_path(path: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf, AppError> {
    match path {
        Some(path) => Ok(path),
        None => Ok(config.sheet.require_path()?.clone()),
    }
}

fn render_catalog(sheet: &FareSheet) {
    println!("\nOperators");
    for entry in sheet.catalog() {
        println!("- {}: {}", entry.operator, entry.service_ids.join(", "));
    }
}

fn quote_selection(
    advisor: &FareAdvisor,
    sheet: &FareSheet,
    selection: &SheetSelectionArgs,
    loaded_at: Option<DateTime<Utc>>,
) -> Result<SheetQuoteResponse, AppError> {
    let row = sheet.select(selection.operator.as_deref(), selection.service_id.as_deref())?;
    Ok(SheetQuoteResponse::for_row(advisor, row, loaded_at)?)
}

fn render_sheet_quote(advisor: &FareAdvisor, response: &SheetQuoteResponse) {
    println!(
        "\nOperator {} / service {}",
        response.operator, response.service_id
    );
    render_advice(advisor, &response.advice);
}

fn render_advice(advisor: &FareAdvisor, advice: &FareAdvice) {
    let symbol = advisor.currency_symbol();
    println!(
        "Suggested Fare: {symbol}{:.2}",
        advice.quote.suggested_price
    );
    println!("Confidence: {}", advice.quote.confidence.label());
    println!("Reason: {}", advice.quote.reason);
    println!("\nOperator blurb\n{}", advice.blurb);
}
