//! Model of demultiplexed sequencing output on disk.
//!
//! # Overview
//! After a sequencing run is demultiplexed, the read files land in an
//! *analysis directory* with a conventional layout: one subdirectory per
//! project, each holding one or more *fastq sets* (subdirectories of read
//! files), plus bookkeeping directories for raw demultiplexer output and
//! unassigned reads.
//!
//! This crate models that layout without touching read data:
//! * [`FastqAttrs`] parses the components encoded in a read file name
//!   (sample name, sample number or barcode, lane, read number)
//! * [`Sample`] groups the read files belonging to one sample
//! * [`FastqSet`] scans a fastq subdirectory into samples
//! * [`Project`] manages a project's fastq sets, its primary/active set
//!   state and its persisted metadata
//! * [`AnalysisDir`] classifies the subdirectories of a run's analysis
//!   directory
//!
//! ## Naming schemes
//! File names are interpreted through the [`NameScheme`] trait. The
//! default, [`IlluminaNames`], understands canonical Illumina/bcl2fastq
//! names such as `PJB1-A_S1_L001_R1_001.fastq.gz` as well as the looser
//! underscore- and dot-separated variants that trimmed or renamed files
//! tend to carry. Any `Fn(&Path) -> FastqAttrs` closure can stand in for
//! runs with unusual conventions.
//!
//! ## Example
//! ```no_run
//! use fastq_dirs::AnalysisDir;
//!
//! let analysis = AnalysisDir::new("/runs/180329_K00311_0045_ABCDEFGHXX_analysis")?;
//! for project in analysis.projects() {
//!     println!("{}: {}", project.name(), project.sample_summary());
//! }
//! # Ok::<(), fastq_dirs::Error>(())
//! ```

pub mod analysis_dir;
pub mod errors;
pub mod fastq_attrs;
pub mod fastq_set;
pub mod metadata;
pub mod project;
pub mod sample;
pub mod transfer;

// commonly used functions and types

pub use crate::analysis_dir::{AnalysisDir, SEQUENCING_DATA_DIR, UNDETERMINED_DIR};
pub use crate::errors::{Error, Result};
pub use crate::fastq_attrs::{FastqAttrs, IlluminaNames, NameScheme, FASTQ_EXTENSIONS};
pub use crate::fastq_set::FastqSet;
pub use crate::metadata::{ProjectInfo, METADATA_FILE};
pub use crate::project::{Project, ProjectOptions, ProjectState, FASTQS_DIR};
pub use crate::sample::Sample;
pub use crate::transfer::{FileTransfer, LocalFileTransfer};
