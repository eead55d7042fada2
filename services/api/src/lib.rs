mod cli;
mod demo;
mod routes;
mod server;
mod state;

use job_board::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
