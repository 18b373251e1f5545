mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use fare_advisor::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
