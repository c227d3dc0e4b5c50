mod process;
mod watch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    cli::{process::ProcessArgs, watch::WatchArgs},
    model::Factors,
    prelude::*,
    reference::load_factors,
    repository::XmlRepository,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: watch the input directory and process every new generation report.
    #[clap(name = "watch")]
    Watch(Box<WatchArgs>),

    /// Process a single generation report and print the results.
    #[clap(name = "process")]
    Process(Box<ProcessArgs>),
}

impl Command {
    pub async fn run(self) -> Result {
        match self {
            Self::Watch(args) => args.run().await,
            Self::Process(args) => args.run().await,
        }
    }
}

#[derive(Parser)]
pub struct ReferenceDataArgs {
    /// XML file with the value and emissions factors.
    #[clap(long = "reference-data", env = "REFERENCE_DATA_FILE_PATH")]
    pub path: PathBuf,
}

impl ReferenceDataArgs {
    pub async fn load(&self) -> Result<Factors> {
        load_factors(&self.path).await.context("failed to load the reference data")
    }
}

#[derive(Parser)]
pub struct OutputArgs {
    /// Directory to write the `*-Results.xml` documents into.
    #[clap(long = "output-dir", env = "OUTPUT_FOLDER")]
    pub directory: PathBuf,
}

impl OutputArgs {
    pub fn new_repository(&self) -> XmlRepository {
        XmlRepository::new(&self.directory)
    }
}
