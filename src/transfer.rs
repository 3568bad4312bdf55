//! How read files get into a newly materialized project.

use std::fs;
use std::path::Path;

use crate::errors::*;

/// Strategy for placing a source read file at its destination inside a
/// project's fastq directory. Project creation is parameterized over this
/// so callers can substitute linking or staged transfers.
pub trait FileTransfer {
    fn transfer(&self, src: &Path, dest: &Path) -> Result<()>;
}

/// Plain filesystem copy.
pub struct LocalFileTransfer;

impl FileTransfer for LocalFileTransfer {
    fn transfer(&self, src: &Path, dest: &Path) -> Result<()> {
        fs::copy(src, dest).map_err(|source| Error::Io {
            path: src.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}
