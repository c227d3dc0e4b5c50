use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tokio::sync::mpsc;

use crate::{
    cli::{OutputArgs, ReferenceDataArgs},
    prelude::*,
    processor::Processor,
    watcher::DirectoryWatcher,
};

/// Detected files waiting to be dispatched.
const EVENT_BUFFER: usize = 64;

#[derive(Parser)]
pub struct WatchArgs {
    /// Directory where the generation reports are dropped.
    #[clap(long = "input-dir", env = "INPUT_FOLDER")]
    pub input_directory: PathBuf,

    /// Only files with this extension are picked up.
    #[clap(long, env = "INPUT_EXTENSION", default_value = "xml")]
    pub extension: String,

    /// Pause between detecting a file and reading it.
    #[clap(long, env = "SETTLE_DELAY", default_value = "1s")]
    pub settle_delay: humantime::Duration,

    #[clap(long, env = "POLLING_INTERVAL", default_value = "500ms")]
    pub polling_interval: humantime::Duration,

    #[clap(flatten)]
    pub reference_data: ReferenceDataArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

impl WatchArgs {
    pub async fn run(self) -> Result {
        let factors = Arc::new(self.reference_data.load().await?);
        self.ensure_separate_directories()?;

        let processor = Arc::new(
            Processor::builder()
                .repository(Arc::new(self.output.new_repository()))
                .factors(factors)
                .settle_delay(self.settle_delay)
                .build(),
        );
        let watcher = DirectoryWatcher::try_new(
            self.input_directory,
            &self.extension,
            self.polling_interval.into(),
        )
        .await?;

        let (sender, receiver) = mpsc::channel(EVENT_BUFFER);
        tokio::select! {
            result = watcher.run(sender) => result?,
            () = processor.run(receiver) => {},
            result = shutdown_signal() => {
                result?;
                info!("shutting down…");
            }
        }
        Ok(())
    }

    /// Results written into the watched directory would be picked up as new input.
    fn ensure_separate_directories(&self) -> Result {
        let input_directory = self
            .input_directory
            .canonicalize()
            .with_context(|| format!("failed to open `{}`", self.input_directory.display()))?;
        let output_directory = self
            .output
            .directory
            .canonicalize()
            .with_context(|| format!("failed to open `{}`", self.output.directory.display()))?;
        ensure!(
            input_directory != output_directory,
            "the output directory must differ from the input directory"
        );
        Ok(())
    }
}

/// Per <https://github.com/tokio-rs/axum/blob/main/examples/graceful-shutdown/src/main.rs>.
async fn shutdown_signal() -> Result {
    #[cfg(unix)]
    {
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}
