mod input;
mod output;

use std::{
    path::{Path, PathBuf},
    process,
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use quick_xml::se::Serializer;
use serde::Serialize;

use self::{input::GenerationReport, output::GenerationOutput};
use crate::{
    engine::Report,
    model::Generator,
    prelude::*,
    repository::{GeneratorRepository, ParseError, PersistError},
};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Keeps temporary files of concurrent writes apart, even when they target the same results file.
static NEXT_WRITE_ID: AtomicU64 = AtomicU64::new(0);

/// Reads generation reports from XML files and writes the results next to each other into the
/// output directory.
pub struct XmlRepository {
    output_directory: PathBuf,
}

impl XmlRepository {
    pub fn new(output_directory: impl Into<PathBuf>) -> Self {
        Self { output_directory: output_directory.into() }
    }

    /// `<input stem>-Results.xml` in the output directory.
    fn output_path(&self, input_name: &str) -> PathBuf {
        let stem = Path::new(input_name)
            .file_stem()
            .map_or_else(|| input_name.into(), |stem| stem.to_string_lossy());
        self.output_directory.join(format!("{stem}-Results.xml"))
    }

    /// `<results file>.<pid>-<write id>.partial`: never matches the watched extension.
    fn temporary_path(path: &Path) -> PathBuf {
        let write_id = NEXT_WRITE_ID.fetch_add(1, Ordering::Relaxed);
        path.with_extension(format!("xml.{}-{write_id}.partial", process::id()))
    }

    fn serialize(report: &Report) -> Result<String, quick_xml::SeError> {
        let mut document = String::from(XML_DECLARATION);
        document.push('\n');
        let mut serializer = Serializer::new(&mut document);
        serializer.indent(' ', 2);
        GenerationOutput::from(report).serialize(serializer)?;
        document.push('\n');
        Ok(document)
    }
}

#[async_trait]
impl GeneratorRepository for XmlRepository {
    #[instrument(skip_all, fields(path = %path.display()))]
    async fn parse(&self, path: &Path) -> Result<Vec<Generator>, ParseError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ParseError::Read { path: path.to_owned(), source })?;
        let generators = quick_xml::de::from_str::<GenerationReport>(&text)
            .map_err(|source| ParseError::Format { path: path.to_owned(), source })?
            .try_into_generators()
            .map_err(|reason| ParseError::Structure { path: path.to_owned(), reason })?;
        for generator in &generators {
            trace!(name = %generator.name, kind = %generator.kind, n_days = generator.days.len());
        }
        debug!(n_generators = generators.len(), "parsed");
        Ok(generators)
    }

    #[instrument(skip_all, fields(input_name = input_name))]
    async fn persist(&self, input_name: &str, report: &Report) -> Result<PathBuf, PersistError> {
        let document = Self::serialize(report).map_err(|source| PersistError::Serialize {
            input_name: input_name.to_owned(),
            source,
        })?;

        // Write aside and rename, so that readers never observe a half-written report.
        let path = self.output_path(input_name);
        let temporary_path = Self::temporary_path(&path);
        if let Err(source) = tokio::fs::write(&temporary_path, document).await {
            let _ = tokio::fs::remove_file(&temporary_path).await;
            return Err(PersistError::Write { path: temporary_path, source });
        }
        if let Err(source) = tokio::fs::rename(&temporary_path, &path).await {
            let _ = tokio::fs::remove_file(&temporary_path).await;
            return Err(PersistError::Write { path, source });
        }

        info!(path = %path.display(), "saved the results");
        Ok(path)
    }
}
