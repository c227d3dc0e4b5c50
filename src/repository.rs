mod xml;

use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;

pub use self::xml::XmlRepository;
use crate::{engine::Report, model::Generator};

/// Reads data drops and stores the computed reports.
#[async_trait]
pub trait GeneratorRepository: Send + Sync {
    async fn parse(&self, path: &Path) -> Result<Vec<Generator>, ParseError>;

    /// Store the report under a name derived from the input file name.
    ///
    /// Either the complete report is written, or nothing at all.
    async fn persist(&self, input_name: &str, report: &Report) -> Result<PathBuf, PersistError>;
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseError {
    #[display("failed to read `{}`", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[display("`{}` is not a valid generation report", path.display())]
    Format { path: PathBuf, source: quick_xml::DeError },

    #[display("`{}`: {reason}", path.display())]
    Structure { path: PathBuf, reason: String },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PersistError {
    #[display("failed to serialize the results of `{input_name}`")]
    Serialize { input_name: String, source: quick_xml::SeError },

    #[display("failed to write `{}`", path.display())]
    Write { path: PathBuf, source: io::Error },
}
