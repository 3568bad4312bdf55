//! One directory's worth of demultiplexed read files.

use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};

use crate::errors::*;
use crate::fastq_attrs::NameScheme;
use crate::sample::Sample;

/// A scanned fastq-bearing subdirectory: read files grouped into samples.
///
/// Samples are kept in first-seen order of the (sorted) directory listing.
/// Rebuilding after a switch re-scans from disk rather than mutating in
/// place, so stale state cannot leak across a switch.
pub struct FastqSet {
    directory_name: String,
    samples: Vec<Sample>,
    failures: Vec<Error>,
}

impl FastqSet {
    /// A set with no samples (used for projects without any fastq
    /// directory on disk yet).
    pub fn empty(directory_name: impl Into<String>) -> FastqSet {
        FastqSet {
            directory_name: directory_name.into(),
            samples: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Scan the immediate files of `dirn`, grouping recognized read files
    /// into samples. Files without a recognized fastq extension are
    /// skipped; files that classify to an empty sample name are recorded
    /// as classification failures and the scan continues.
    pub fn scan(dirn: impl AsRef<Path>, scheme: Arc<dyn NameScheme>) -> Result<FastqSet> {
        let dirn = dirn.as_ref();
        let directory_name = dirn
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut files = Vec::new();
        let entries = std::fs::read_dir(dirn).map_err(|source| Error::Io {
            path: dirn.to_path_buf(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| Error::Io {
                path: dirn.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let mut set = FastqSet::empty(directory_name);
        for fastq in files {
            let attrs = scheme.classify(&fastq);
            if attrs.extension.is_empty() {
                // not a read file
                continue;
            }
            if attrs.sample_name.is_empty() {
                warn!("{}: no sample name for {}", set.directory_name, fastq.display());
                set.failures.push(Error::Classification {
                    fastq: fastq.display().to_string(),
                    reason: "classified to an empty sample name",
                });
                continue;
            }
            match set
                .samples
                .iter()
                .position(|s| s.name() == attrs.sample_name)
            {
                Some(i) => set.samples[i].add_read_file(fastq),
                None => {
                    let mut sample = Sample::with_scheme(&attrs.sample_name, Arc::clone(&scheme));
                    sample.add_read_file(fastq);
                    set.samples.push(sample);
                }
            }
        }
        debug!(
            "scanned {}: {} sample(s), {} classification failure(s)",
            dirn.display(),
            set.samples.len(),
            set.failures.len()
        );
        Ok(set)
    }

    /// Subdirectory name this set was scanned from, relative to the
    /// project root.
    pub fn directory_name(&self) -> &str {
        &self.directory_name
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn sample(&self, name: &str) -> Option<&Sample> {
        self.samples.iter().find(|s| s.name() == name)
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Files that could not be classified during the scan. The scan itself
    /// completes; callers decide whether to surface or suppress these.
    pub fn classification_failures(&self) -> &[Error] {
        &self.failures
    }

    /// True iff any sample in the set is paired-end.
    pub fn paired_end(&self) -> bool {
        self.samples.iter().any(Sample::paired_end)
    }

    /// True iff any sample holds more read files than its pairedness
    /// requires.
    pub fn multiple_fastqs(&self) -> bool {
        self.samples.iter().any(Sample::multiple_fastqs)
    }

    /// Human-readable sample summary. This exact string is persisted into
    /// project metadata, so its format is a compatibility surface.
    pub fn summary(&self) -> String {
        if self.samples.is_empty() {
            return "No samples".to_string();
        }
        let mut names: Vec<&str> = self.samples.iter().map(Sample::name).collect();
        names.sort_unstable();
        let mut detail = names.join(", ");
        if self.multiple_fastqs() {
            detail.push_str(", multiple fastqs per sample");
        }
        format!(
            "{} sample{} ({})",
            names.len(),
            if names.len() == 1 { "" } else { "s" },
            detail
        )
    }
}
