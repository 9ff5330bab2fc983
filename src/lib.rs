pub mod car;
pub mod cli;
pub mod engine;
pub mod error;
pub mod loader;
pub mod output;
pub mod validator;

pub fn run() -> Result<(), error::CliError> {
    cli::run()
}
