mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use medico_activity::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
