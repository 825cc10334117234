mod commands;
mod scenario;
mod terminal;

use anyhow::Context;
use commands::{CommandLine, Commands, meetings, schedule, simulate};
use lendr_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let mut cfg: Config = match &commands.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;
    if let Some(digits) = commands.digits {
        cfg.currency_digits = digits;
    }

    match commands.command {
        Commands::Schedule { scenario } => {
            print::header("calculating schedule");
            schedule::schedule(&scenario, &cfg).await
        }
        Commands::Simulate { scenario } => {
            print::header("simulating loan");
            simulate::simulate(&scenario, &cfg).await
        }
        Commands::Meetings(args) => meetings::meetings(args),
    }
}
