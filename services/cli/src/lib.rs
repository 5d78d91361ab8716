mod cli;
mod commands;
mod render;

use matched::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
