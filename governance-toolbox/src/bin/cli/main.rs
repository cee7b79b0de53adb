mod common;
mod delegates;
mod status;

use color_eyre::Report;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Cli {
    /// Default log filter, `RUST_LOG` takes precedence when set
    #[structopt(long, global = true, default_value = "warn")]
    log_level: String,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub enum Command {
    /// Rank the delegates of a snapshot and write the delegate list as csv
    Delegates(delegates::Delegates),
    /// Classify the delegation state of an account
    Status(status::Status),
}

impl Command {
    pub fn exec(self) -> Result<(), Report> {
        match self {
            Self::Delegates(cmd) => cmd.exec(),
            Self::Status(cmd) => cmd.exec(),
        }
    }
}

fn main() -> Result<(), Report> {
    color_eyre::install()?;
    let Cli { log_level, command } = Cli::from_args();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    command.exec()
}
