use crate::commands::{
    run_quote, run_sheet_show, run_sheet_watch, QuoteArgs, SheetShowArgs, SheetWatchArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fare_advisor::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Fare Advisor",
    about = "Suggest bus fares from occupancy and demand, from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Suggest a fare for a single set of inputs
    Quote(QuoteArgs),
    /// Look up services in a fare sheet export
    Sheet {
        #[command(subcommand)]
        command: SheetCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SheetCommand {
    /// Load the sheet once and quote the selected service
    Show(SheetShowArgs),
    /// Reload the sheet on a fixed interval and re-quote the selected service
    Watch(SheetWatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Fare sheet CSV to serve and refresh (overrides FARE_SHEET_PATH)
    #[arg(long)]
    pub(crate) sheet: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quote(args) => run_quote(args),
        Command::Sheet {
            command: SheetCommand::Show(args),
        } => run_sheet_show(args),
        Command::Sheet {
            command: SheetCommand::Watch(args),
        } => run_sheet_watch(args).await,
    }
}
