mod cli;
mod demo;
mod infra;
mod score;

use harmony::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
