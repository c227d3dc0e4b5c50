//! Detection of new data drops by periodically scanning the input directory.

use std::{
    collections::BTreeSet,
    ffi::OsStr,
    path::{Path, PathBuf},
    time::Duration,
};

use tokio::{
    sync::mpsc,
    time::{MissedTickBehavior, interval},
};

use crate::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileCreated {
    pub path: PathBuf,
}

pub struct DirectoryWatcher {
    directory: PathBuf,
    extension: String,
    poll_interval: Duration,

    /// Matching files present during the last scan.
    seen: BTreeSet<PathBuf>,
}

impl DirectoryWatcher {
    /// Take the initial snapshot of the directory.
    ///
    /// Files that already exist at this point are never reported.
    #[instrument(skip_all, fields(directory = %directory.display()))]
    pub async fn try_new(
        directory: PathBuf,
        extension: &str,
        poll_interval: Duration,
    ) -> Result<Self> {
        let mut this = Self {
            directory,
            extension: extension.trim_start_matches('.').to_owned(),
            poll_interval,
            seen: BTreeSet::new(),
        };
        this.seen = this.scan().await?;
        info!(n_existing = this.seen.len(), extension = %this.extension, "watching…");
        Ok(this)
    }

    /// Report every newly appeared file until the receiving side is gone.
    pub async fn run(mut self, events: mpsc::Sender<FileCreated>) -> Result {
        let mut interval = interval(self.poll_interval);
        interval.reset_after(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let current = match self.scan().await {
                Ok(current) => current,
                Err(error) => {
                    warn!("failed to scan the directory: {error:#}");
                    continue;
                }
            };
            for path in current.difference(&self.seen) {
                if events.send(FileCreated { path: path.clone() }).await.is_err() {
                    debug!("the receiver is gone, stopping");
                    return Ok(());
                }
            }
            self.seen = current;
        }
    }

    async fn scan(&self) -> Result<BTreeSet<PathBuf>> {
        let mut entries = tokio::fs::read_dir(&self.directory)
            .await
            .with_context(|| format!("failed to read `{}`", self.directory.display()))?;
        let mut paths = BTreeSet::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_file() && self.matches(&path) {
                paths.insert(path);
            }
        }
        Ok(paths)
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|extension| extension.eq_ignore_ascii_case(&self.extension))
    }
}
