use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A file that should be a read file could not be classified into a
    /// non-empty sample name. Scans report these and keep going.
    #[error("cannot determine sample name for \"{fastq}\": {reason}")]
    Classification { fastq: String, reason: &'static str },

    /// A fastq set name that is not among the sets discovered on disk.
    #[error("project \"{project}\" has no fastq set \"{fastq_dir}\"")]
    UnknownFastqSet { project: String, fastq_dir: String },

    /// Refusal to materialize a project over existing content.
    #[error("directory {} already exists and is not empty", .0.display())]
    DirectoryNotEmpty(PathBuf),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write metadata {}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
