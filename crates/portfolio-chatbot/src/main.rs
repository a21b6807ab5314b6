use std::process::ExitCode;

use clap::Parser;
use eyre::Result;
use portfolio_chatbot::cli::CliArgs;
use portfolio_chatbot::logging;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = CliArgs::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    runtime.block_on(async {
        logging::init()?;
        cli.execute().await
    })
}
