mod cli;
mod infra;
mod routes;
mod server;
mod validate;

use research_match::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
