mod list;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Subcommand};

use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List the pipelines defined in a configuration file
    List(ListArgs),
    /// Run a pipeline against the built-in coffee machine
    Run(RunArgs),
}

#[derive(Args)]
pub(crate) struct ListArgs {
    /// Pipeline configuration file
    #[arg(long, short = 'c')]
    pub(crate) config: PathBuf,
}

#[derive(Args)]
pub(crate) struct RunArgs {
    /// Pipeline configuration file
    #[arg(long, short = 'c')]
    pub(crate) config: PathBuf,

    /// Name of the pipeline to run
    #[arg(long, short = 'p')]
    pub(crate) pipeline: String,

    /// Input value as JSON; anything that is not JSON is taken as a string
    #[arg(long, short = 'i')]
    pub(crate) input: Option<String>,

    /// Run transactional pipelines inside the in-memory journal
    #[arg(long)]
    pub(crate) transaction: bool,
}

impl Commands {
    pub(crate) fn execute(self) -> Result<ExitCode> {
        let mut stdout = std::io::stdout().lock();
        match self {
            Self::List(args) => {
                list::run(&args, &mut stdout)?;
                Ok(ExitCode::SUCCESS)
            }
            Self::Run(args) => run::run(&args, &mut stdout),
        }
    }
}
