//! A single sample and the read files discovered for it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::fastq_attrs::{FastqAttrs, IlluminaNames, NameScheme};

/// One biological/library sample within a fastq set.
///
/// Read files are kept in a deterministic order regardless of how the
/// filesystem enumerated them: lane ascending, index reads before sequence
/// reads within a lane, then read number ascending.
pub struct Sample {
    name: String,
    read_files: Vec<PathBuf>,
    scheme: Arc<dyn NameScheme>,
}

impl Sample {
    pub fn new(name: impl Into<String>) -> Sample {
        Sample::with_scheme(name, Arc::new(IlluminaNames))
    }

    pub fn with_scheme(name: impl Into<String>, scheme: Arc<dyn NameScheme>) -> Sample {
        Sample {
            name: name.into(),
            read_files: Vec::new(),
            scheme,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn read_files(&self) -> &[PathBuf] {
        &self.read_files
    }

    /// Add a read file and restore the documented ordering.
    pub fn add_read_file(&mut self, fastq: impl Into<PathBuf>) {
        self.read_files.push(fastq.into());
        let scheme = Arc::clone(&self.scheme);
        self.read_files.sort_by_cached_key(|fq| {
            let attrs = scheme.classify(fq);
            (
                attrs.lane_number.unwrap_or(0),
                !attrs.is_index_read,
                attrs.read_number.unwrap_or(0),
            )
        });
    }

    /// Sequence read files with the given read number, in stored order.
    /// Index reads are never included; ask for those with
    /// [`index_read_files_for`](Sample::index_read_files_for).
    pub fn read_files_for(&self, read_number: u32) -> Vec<PathBuf> {
        self.subset(read_number, false)
    }

    /// Index read files with the given index-read ordinal.
    pub fn index_read_files_for(&self, read_number: u32) -> Vec<PathBuf> {
        self.subset(read_number, true)
    }

    fn subset(&self, read_number: u32, index_reads: bool) -> Vec<PathBuf> {
        self.read_files
            .iter()
            .filter(|fq| {
                let attrs = self.scheme.classify(fq);
                attrs.is_index_read == index_reads && attrs.read_number == Some(read_number)
            })
            .cloned()
            .collect()
    }

    /// True iff both read 1 and read 2 sequence files are present,
    /// regardless of any index reads. Computed from the current contents on
    /// every call.
    pub fn paired_end(&self) -> bool {
        let (mut r1, mut r2) = (false, false);
        for fq in &self.read_files {
            let attrs = self.scheme.classify(fq);
            if attrs.is_index_read {
                continue;
            }
            match attrs.read_number {
                Some(1) => r1 = true,
                Some(2) => r2 = true,
                _ => {}
            }
        }
        r1 && r2
    }

    /// True iff there is more than one fastq per read, e.g. data split
    /// across lanes.
    pub fn multiple_fastqs(&self) -> bool {
        self.read_files_for(1).len() > 1
    }

    pub(crate) fn classify(&self, fastq: &Path) -> FastqAttrs {
        self.scheme.classify(fastq)
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sample")
            .field("name", &self.name)
            .field("read_files", &self.read_files)
            .finish()
    }
}
