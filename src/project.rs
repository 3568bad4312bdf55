//! A project directory holding one or more fastq sets.
//!
//! A project owns any number of fastq subdirectories. The canonical one
//! is named `fastqs`; alternates carry a dotted qualifier such as
//! `fastqs.untrimmed`. One discovered set is the *primary* (the default,
//! persisted in metadata) and one is *active* (what accessors report,
//! in-memory only). Opening a project reconciles metadata against what
//! is actually on disk; the directory always wins.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::warn;

use crate::errors::*;
use crate::fastq_attrs::{IlluminaNames, NameScheme};
use crate::fastq_set::FastqSet;
use crate::metadata::{ProjectInfo, METADATA_FILE};
use crate::sample::Sample;
use crate::transfer::{FileTransfer, LocalFileTransfer};

/// Name of the canonical fastq subdirectory.
pub const FASTQS_DIR: &str = "fastqs";

/// Where a project directory stands on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectState {
    /// The project directory does not exist yet.
    Uninitialized,
    /// The directory exists but the active fastq set has no samples.
    Empty,
    /// The active fastq set has at least one sample.
    Ready,
}

/// Options for opening a project.
pub struct ProjectOptions {
    /// Fastq set to make active instead of the primary. Must name a set
    /// that exists on disk.
    pub fastq_dir: Option<String>,
    /// Naming scheme used to classify read files.
    pub scheme: Arc<dyn NameScheme>,
}

impl Default for ProjectOptions {
    fn default() -> ProjectOptions {
        ProjectOptions {
            fastq_dir: None,
            scheme: Arc::new(IlluminaNames),
        }
    }
}

pub struct Project {
    name: String,
    dirn: PathBuf,
    scheme: Arc<dyn NameScheme>,
    fastq_dirs: Vec<String>,
    primary_fastq_dir: Option<String>,
    fastq_dir: Option<String>,
    info: ProjectInfo,
    active_set: Option<FastqSet>,
}

impl Project {
    /// Open the project at `dirn` with default options. The directory
    /// does not have to exist; see [`state`](Project::state).
    pub fn open(dirn: impl AsRef<Path>) -> Result<Project> {
        Project::open_with(dirn, ProjectOptions::default())
    }

    pub fn open_with(dirn: impl AsRef<Path>, options: ProjectOptions) -> Result<Project> {
        let dirn = dirn.as_ref().to_path_buf();
        let name = dirn
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut project = Project {
            name,
            dirn,
            scheme: options.scheme,
            fastq_dirs: Vec::new(),
            primary_fastq_dir: None,
            fastq_dir: None,
            info: ProjectInfo::default(),
            active_set: None,
        };
        if !project.dirn.is_dir() {
            // nothing to reconcile; a requested fastq set is moot
            return Ok(project);
        }

        project.reload()?;
        if let Some(requested) = options.fastq_dir {
            project.use_fastq_set(Some(&requested))?;
        }
        Ok(project)
    }

    /// Re-discover fastq sets and metadata from disk, then activate the
    /// primary set.
    fn reload(&mut self) -> Result<()> {
        self.fastq_dirs = discover_fastq_dirs(&self.dirn)?;
        self.info = ProjectInfo::load(&self.dirn.join(METADATA_FILE));

        self.primary_fastq_dir = match &self.info.primary_fastq_dir {
            Some(dirn) if self.fastq_dirs.iter().any(|d| d == dirn) => Some(dirn.clone()),
            Some(dirn) => {
                warn!(
                    "{}: metadata names fastq set \"{}\" which is not on disk",
                    self.name, dirn
                );
                self.fastq_dirs.first().cloned()
            }
            None => self.fastq_dirs.first().cloned(),
        };

        self.fastq_dir = None;
        self.active_set = None;
        if let Some(primary) = self.primary_fastq_dir.clone() {
            self.activate(&primary)?;
        }
        Ok(())
    }

    fn activate(&mut self, fastq_dir: &str) -> Result<()> {
        // scan before mutating so a failure leaves the project untouched
        let set = FastqSet::scan(self.dirn.join(fastq_dir), Arc::clone(&self.scheme))?;
        self.fastq_dir = Some(fastq_dir.to_string());
        self.active_set = Some(set);
        Ok(())
    }

    fn check_known(&self, fastq_dir: &str) -> Result<()> {
        if self.fastq_dirs.iter().any(|d| d == fastq_dir) {
            Ok(())
        } else {
            Err(Error::UnknownFastqSet {
                project: self.name.clone(),
                fastq_dir: fastq_dir.to_string(),
            })
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dirn(&self) -> &Path {
        &self.dirn
    }

    pub fn state(&self) -> ProjectState {
        if !self.dirn.is_dir() {
            ProjectState::Uninitialized
        } else if self.samples().is_empty() {
            ProjectState::Empty
        } else {
            ProjectState::Ready
        }
    }

    /// Names of all fastq sets discovered on disk, canonical set first
    /// and alternates in name order.
    pub fn fastq_dirs(&self) -> &[String] {
        &self.fastq_dirs
    }

    pub fn primary_fastq_dir(&self) -> Option<&str> {
        self.primary_fastq_dir.as_deref()
    }

    /// Name of the currently active fastq set.
    pub fn fastq_dir(&self) -> Option<&str> {
        self.fastq_dir.as_deref()
    }

    /// Absolute path of the currently active fastq set.
    pub fn fastq_dir_path(&self) -> Option<PathBuf> {
        self.fastq_dir.as_ref().map(|d| self.dirn.join(d))
    }

    /// Metadata as loaded from (or last written to) `project.info`. This
    /// reflects the persisted primary set, not the active one.
    pub fn info(&self) -> &ProjectInfo {
        &self.info
    }

    /// Samples of the active fastq set.
    pub fn samples(&self) -> &[Sample] {
        match &self.active_set {
            Some(set) => set.samples(),
            None => &[],
        }
    }

    pub fn sample(&self, name: &str) -> Option<&Sample> {
        self.active_set.as_ref().and_then(|set| set.sample(name))
    }

    pub fn paired_end(&self) -> bool {
        self.active_set.as_ref().is_some_and(FastqSet::paired_end)
    }

    pub fn multiple_fastqs(&self) -> bool {
        self.active_set
            .as_ref()
            .is_some_and(FastqSet::multiple_fastqs)
    }

    /// Live summary of the active set, regardless of what metadata says.
    pub fn sample_summary(&self) -> String {
        match &self.active_set {
            Some(set) => set.summary(),
            None => "No samples".to_string(),
        }
    }

    pub fn classification_failures(&self) -> &[Error] {
        match &self.active_set {
            Some(set) => set.classification_failures(),
            None => &[],
        }
    }

    /// Switch the active fastq set. `None` switches back to the primary
    /// set (a no-op when the project has none). The primary set and the
    /// metadata file are not touched.
    pub fn use_fastq_set(&mut self, fastq_dir: Option<&str>) -> Result<()> {
        let target = match fastq_dir {
            Some(dirn) => dirn.to_string(),
            None => match self.primary_fastq_dir.clone() {
                Some(primary) => primary,
                None => return Ok(()),
            },
        };
        self.check_known(&target)?;
        self.activate(&target)
    }

    /// Make `fastq_dir` the primary set and persist that choice, along
    /// with a fresh summary of the set's contents, to the metadata file.
    /// The active set is left as it was.
    pub fn set_primary_fastq_set(&mut self, fastq_dir: &str) -> Result<()> {
        self.check_known(fastq_dir)?;
        let set = FastqSet::scan(self.dirn.join(fastq_dir), Arc::clone(&self.scheme))?;
        self.primary_fastq_dir = Some(fastq_dir.to_string());
        self.info.primary_fastq_dir = Some(fastq_dir.to_string());
        self.info.samples = Some(set.summary());
        self.info.paired_end = Some(set.paired_end());
        self.info.save(&self.dirn.join(METADATA_FILE))
    }

    /// Materialize the project on disk: create the directory, copy the
    /// given read files into a fastq set (`fastq_dir`, or the canonical
    /// `fastqs` when `None`), scan the result and write metadata.
    ///
    /// Refuses to touch a directory that already exists with content.
    pub fn create(&mut self, fastqs: &[PathBuf], fastq_dir: Option<&str>) -> Result<()> {
        self.create_with(fastqs, fastq_dir, &LocalFileTransfer)
    }

    pub fn create_with(
        &mut self,
        fastqs: &[PathBuf],
        fastq_dir: Option<&str>,
        transfer: &dyn FileTransfer,
    ) -> Result<()> {
        if self.dirn.is_dir() {
            let mut entries =
                std::fs::read_dir(&self.dirn).map_err(|source| Error::Io {
                    path: self.dirn.clone(),
                    source,
                })?;
            if entries.next().is_some() {
                return Err(Error::DirectoryNotEmpty(self.dirn.clone()));
            }
        }
        let fastq_dir = fastq_dir.unwrap_or(FASTQS_DIR);
        let set_dir = self.dirn.join(fastq_dir);
        std::fs::create_dir_all(&set_dir).map_err(|source| Error::Io {
            path: set_dir.clone(),
            source,
        })?;
        for fastq in fastqs {
            let file_name = fastq.file_name().ok_or_else(|| Error::Io {
                path: fastq.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "not a file path",
                ),
            })?;
            transfer.transfer(fastq, &set_dir.join(file_name))?;
        }
        self.reload()?;
        self.info.primary_fastq_dir = Some(fastq_dir.to_string());
        self.info.samples = Some(self.sample_summary());
        self.info.paired_end = Some(self.paired_end());
        self.info.save(&self.dirn.join(METADATA_FILE))
    }
}

/// Fastq set names present under `dirn`: the canonical `fastqs` first if
/// it exists, then `fastqs.<qualifier>` alternates in name order.
fn discover_fastq_dirs(dirn: &Path) -> Result<Vec<String>> {
    let mut dirs = Vec::new();
    let entries = std::fs::read_dir(dirn).map_err(|source| Error::Io {
        path: dirn.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| Error::Io {
            path: dirn.to_path_buf(),
            source,
        })?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == FASTQS_DIR || name.starts_with("fastqs.") {
            dirs.push(name);
        }
    }
    dirs.sort_unstable();
    if let Some(pos) = dirs.iter().position(|d| d == FASTQS_DIR) {
        dirs.swap(pos, 0);
        dirs[1..].sort_unstable();
    }
    Ok(dirs)
}
