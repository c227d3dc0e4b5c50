use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use bon::Builder;
use tokio::{sync::mpsc, time::sleep};

use crate::{
    engine::Report,
    model::Factors,
    prelude::*,
    repository::{GeneratorRepository, ParseError, PersistError},
    watcher::FileCreated,
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ProcessError {
    #[display("failed to parse the input")]
    Parse(ParseError),

    #[display("failed to persist the results")]
    Persist(PersistError),
}

#[must_use]
pub struct ProcessedFile {
    pub output_path: PathBuf,
    pub report: Report,
}

/// Turns each detected data drop into a results document.
#[derive(Builder)]
pub struct Processor {
    repository: Arc<dyn GeneratorRepository>,
    factors: Arc<Factors>,

    /// Pause before reading a freshly created file, so that its writer can finish.
    #[builder(into, default = Duration::ZERO)]
    settle_delay: Duration,
}

impl Processor {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn process(&self, path: &Path) -> Result<ProcessedFile, ProcessError> {
        let generators = self.repository.parse(path).await?;
        let report = Report::compute(&generators, &self.factors);
        info!(
            n_generators = generators.len(),
            n_totals = report.totals.len(),
            n_max_emissions = report.max_emissions.len(),
            n_heat_rates = report.heat_rates.len(),
            "computed the report",
        );
        let input_name = path.file_name().map_or_else(
            || path.to_string_lossy(),
            |file_name| file_name.to_string_lossy(),
        );
        let output_path = self.repository.persist(&input_name, &report).await?;
        Ok(ProcessedFile { output_path, report })
    }

    /// Wait for the file to settle and process it.
    ///
    /// Failures are logged and swallowed: one bad file must not affect the others.
    pub async fn settle_and_process(&self, path: PathBuf) {
        sleep(self.settle_delay).await;
        info!(path = %path.display(), "processing…");
        if let Err(error) = self.process(&path).await {
            let error = Error::from(error);
            error!(path = %path.display(), "failed to process the file: {error:#}");
        }
    }

    /// Spawn an independent task for every created file until the event channel is closed.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<FileCreated>) {
        while let Some(FileCreated { path }) = events.recv().await {
            info!(path = %path.display(), "new file detected");
            let processor = Arc::clone(&self);
            tokio::spawn(async move { processor.settle_and_process(path).await });
        }
    }
}
