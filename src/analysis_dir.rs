//! Top-level view of a run's analysis directory.
//!
//! An analysis directory sits next to a sequencing run and collects the
//! per-project outputs of demultiplexing, plus bookkeeping directories
//! this crate recognizes by name: `bcl2fastq` (and qualified variants)
//! holding raw demultiplexer output, and `undetermined` holding reads
//! that could not be assigned to any project.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use crate::errors::*;
use crate::fastq_attrs::{FastqAttrs, NameScheme};
use crate::metadata::METADATA_FILE;
use crate::project::{Project, ProjectOptions};

/// Name (or dotted-qualifier prefix) of raw demultiplexer output
/// directories.
pub const SEQUENCING_DATA_DIR: &str = "bcl2fastq";

/// Name of the directory holding unassigned reads.
pub const UNDETERMINED_DIR: &str = "undetermined";

pub struct AnalysisDir {
    dirn: PathBuf,
    run_name: String,
    projects: Vec<Project>,
    sequencing_data: Vec<PathBuf>,
    undetermined: Option<Project>,
}

impl AnalysisDir {
    /// Scan `dirn` and classify its immediate subdirectories. Projects
    /// are opened with the given naming scheme; subdirectories that hold
    /// fastq sets but do not look like projects (no metadata file and no
    /// read file carrying lane or read information) are ignored.
    pub fn with_scheme(dirn: impl AsRef<Path>, scheme: Arc<dyn NameScheme>) -> Result<AnalysisDir> {
        let dirn = dirn.as_ref().to_path_buf();
        let dir_name = dirn
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let run_name = dir_name
            .strip_suffix("_analysis")
            .unwrap_or(&dir_name)
            .to_string();

        let mut subdirs = Vec::new();
        let entries = std::fs::read_dir(&dirn).map_err(|source| Error::Io {
            path: dirn.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| Error::Io {
                path: dirn.clone(),
                source,
            })?;
            if entry.path().is_dir() {
                subdirs.push(entry.path());
            }
        }
        subdirs.sort();

        let mut analysis = AnalysisDir {
            dirn,
            run_name,
            projects: Vec::new(),
            sequencing_data: Vec::new(),
            undetermined: None,
        };
        for subdir in subdirs {
            let name = subdir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if name == UNDETERMINED_DIR {
                analysis.undetermined = Some(Project::open_with(
                    &subdir,
                    ProjectOptions {
                        fastq_dir: None,
                        scheme: Arc::clone(&scheme),
                    },
                )?);
                continue;
            }
            if name == SEQUENCING_DATA_DIR || name.starts_with("bcl2fastq.") {
                analysis.sequencing_data.push(subdir);
                continue;
            }
            let project = Project::open_with(
                &subdir,
                ProjectOptions {
                    fastq_dir: None,
                    scheme: Arc::clone(&scheme),
                },
            )?;
            if is_project(&project) {
                analysis.projects.push(project);
            } else {
                debug!("skipping {}: not a project", subdir.display());
            }
        }
        Ok(analysis)
    }

    pub fn new(dirn: impl AsRef<Path>) -> Result<AnalysisDir> {
        AnalysisDir::with_scheme(dirn, ProjectOptions::default().scheme)
    }

    pub fn dirn(&self) -> &Path {
        &self.dirn
    }

    /// Run identifier, i.e. the directory name with any `_analysis`
    /// suffix stripped.
    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name() == name)
    }

    pub fn n_projects(&self) -> usize {
        self.projects.len()
    }

    /// Raw demultiplexer output directories found alongside the projects.
    pub fn sequencing_data(&self) -> &[PathBuf] {
        &self.sequencing_data
    }

    pub fn n_sequencing_data(&self) -> usize {
        self.sequencing_data.len()
    }

    /// Unassigned-reads pseudo-project, if present.
    pub fn undetermined(&self) -> Option<&Project> {
        self.undetermined.as_ref()
    }

    /// True iff any project holds paired-end data. Computed from the
    /// projects' currently active fastq sets.
    pub fn paired_end(&self) -> bool {
        self.projects.iter().any(Project::paired_end)
    }
}

/// A subdirectory with fastq sets counts as a project when it carries a
/// metadata file or at least one read file that parses with lane or read
/// information. This keeps directories of loosely named fastq files (for
/// example ad hoc `extras`) out of the project list.
fn is_project(project: &Project) -> bool {
    if project.fastq_dirs().is_empty() {
        return false;
    }
    if project.dirn().join(METADATA_FILE).is_file() {
        return true;
    }
    project.samples().iter().any(|sample| {
        sample.read_files().iter().any(|fq| {
            let attrs = FastqAttrs::parse(fq);
            attrs.lane_number.is_some() || attrs.read_number.is_some()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch_fastqs(dirn: &Path, fastq_dir: &str, files: &[&str]) {
        let set_dir = dirn.join(fastq_dir);
        std::fs::create_dir_all(&set_dir).unwrap();
        for name in files {
            File::create(set_dir.join(name)).unwrap();
        }
    }

    fn mock_analysis_dir(name: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let dirn = tmp.path().join(name);
        std::fs::create_dir(&dirn).unwrap();
        (tmp, dirn)
    }

    #[test]
    fn empty_analysis_dir() {
        let (_tmp, dirn) = mock_analysis_dir("180329_K00311_0045_ABCDEFGHXX_analysis");
        let analysis = AnalysisDir::new(&dirn).unwrap();
        assert_eq!(analysis.run_name(), "180329_K00311_0045_ABCDEFGHXX");
        assert_eq!(analysis.n_projects(), 0);
        assert_eq!(analysis.n_sequencing_data(), 0);
        assert!(analysis.undetermined().is_none());
        assert!(!analysis.paired_end());
    }

    #[test]
    fn run_name_without_analysis_suffix() {
        let (_tmp, dirn) = mock_analysis_dir("180329_K00311_0045_ABCDEFGHXX");
        let analysis = AnalysisDir::new(&dirn).unwrap();
        assert_eq!(analysis.run_name(), "180329_K00311_0045_ABCDEFGHXX");
    }

    #[test]
    fn classifies_projects_sequencing_data_and_undetermined() {
        let (_tmp, dirn) = mock_analysis_dir("180329_K00311_0045_ABCDEFGHXX_analysis");
        touch_fastqs(
            &dirn.join("AB"),
            "fastqs",
            &[
                "AB1_S1_L001_R1_001.fastq.gz",
                "AB1_S1_L001_R2_001.fastq.gz",
            ],
        );
        touch_fastqs(
            &dirn.join("CDE"),
            "fastqs",
            &["CDE1_S2_L001_R1_001.fastq.gz"],
        );
        touch_fastqs(
            &dirn.join(UNDETERMINED_DIR),
            "fastqs",
            &["Undetermined_S0_L001_R1_001.fastq.gz"],
        );
        touch_fastqs(
            &dirn.join(SEQUENCING_DATA_DIR),
            "fastqs",
            &["AB1_S1_L001_R1_001.fastq.gz"],
        );

        let analysis = AnalysisDir::new(&dirn).unwrap();
        assert_eq!(analysis.n_projects(), 2);
        assert!(analysis.project("AB").is_some());
        assert!(analysis.project("CDE").is_some());
        assert_eq!(analysis.n_sequencing_data(), 1);
        assert_eq!(
            analysis.sequencing_data(),
            [dirn.join(SEQUENCING_DATA_DIR)]
        );
        let undetermined = analysis.undetermined().unwrap();
        assert_eq!(undetermined.samples().len(), 1);
        assert!(analysis.paired_end());
    }

    #[test]
    fn loose_fastq_directories_are_not_projects() {
        let (_tmp, dirn) = mock_analysis_dir("run_analysis");
        touch_fastqs(
            &dirn.join("AB"),
            "fastqs",
            &["AB1_S1_L001_R1_001.fastq.gz"],
        );
        // names with no lane or read information and no metadata file
        touch_fastqs(&dirn.join("extras"), "fastqs", &["rag2.fastq", "hopeless.fq"]);

        let analysis = AnalysisDir::new(&dirn).unwrap();
        assert_eq!(analysis.n_projects(), 1);
        assert!(analysis.project("AB").is_some());
        assert!(analysis.project("extras").is_none());
    }

    #[test]
    fn metadata_file_marks_a_project() {
        let (_tmp, dirn) = mock_analysis_dir("run_analysis");
        let project_dir = dirn.join("extras");
        touch_fastqs(&project_dir, "fastqs", &["rag2.fastq"]);
        std::fs::write(project_dir.join(METADATA_FILE), "PrimaryFastqDir\tfastqs\n").unwrap();

        let analysis = AnalysisDir::new(&dirn).unwrap();
        assert_eq!(analysis.n_projects(), 1);
        assert!(analysis.project("extras").is_some());
    }

    #[test]
    fn qualified_sequencing_data_directories() {
        let (_tmp, dirn) = mock_analysis_dir("run_analysis");
        std::fs::create_dir(dirn.join("bcl2fastq")).unwrap();
        std::fs::create_dir(dirn.join("bcl2fastq.lanes1-4")).unwrap();
        let analysis = AnalysisDir::new(&dirn).unwrap();
        assert_eq!(analysis.n_projects(), 0);
        assert_eq!(analysis.n_sequencing_data(), 2);
    }
}
