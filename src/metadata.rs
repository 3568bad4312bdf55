//! Persisted project metadata.
//!
//! A project keeps a small tab-delimited `project.info` file in its root:
//! one `key<TAB>value` pair per line. Unknown keys are carried through a
//! load/save cycle verbatim so that external tooling can annotate a
//! project without this crate discarding the annotations.

use std::path::Path;

use log::warn;

use crate::errors::*;

/// File name of the metadata file inside a project directory.
pub const METADATA_FILE: &str = "project.info";

const KEY_PRIMARY_FASTQ_DIR: &str = "PrimaryFastqDir";
const KEY_SAMPLES: &str = "Samples";
const KEY_PAIRED_END: &str = "PairedEnd";

/// Contents of a project's metadata file.
///
/// Metadata is a cache of the last persisted scan, not the live state of
/// the directory. Loading never fails: a missing or malformed file yields
/// defaults and a warning, and the caller reconciles against disk.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ProjectInfo {
    /// Name of the fastq subdirectory the project treats as primary.
    pub primary_fastq_dir: Option<String>,
    /// Sample summary string as of the last save.
    pub samples: Option<String>,
    /// Pairedness as of the last save.
    pub paired_end: Option<bool>,
    /// Keys this crate does not interpret, in file order.
    pub extra: Vec<(String, String)>,
}

impl ProjectInfo {
    /// Load metadata from `path`. Returns defaults if the file is absent
    /// or cannot be interpreted; a malformed file is rejected as a whole
    /// rather than partially applied.
    pub fn load(path: &Path) -> ProjectInfo {
        if !path.is_file() {
            return ProjectInfo::default();
        }
        match ProjectInfo::parse(path) {
            Some(info) => info,
            None => {
                warn!("ignoring malformed metadata file {}", path.display());
                ProjectInfo::default()
            }
        }
    }

    fn parse(path: &Path) -> Option<ProjectInfo> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .ok()?;
        let mut info = ProjectInfo::default();
        for record in reader.records() {
            let record = record.ok()?;
            if record.len() < 2 {
                return None;
            }
            let key = record.get(0)?.to_string();
            // a value containing literal tabs arrives split across fields
            let value = record.iter().skip(1).collect::<Vec<_>>().join("\t");
            match key.as_str() {
                KEY_PRIMARY_FASTQ_DIR => info.primary_fastq_dir = Some(value),
                KEY_SAMPLES => info.samples = Some(value),
                KEY_PAIRED_END => info.paired_end = Some(parse_flag(&value)?),
                _ => info.extra.push((key, value)),
            }
        }
        Some(info)
    }

    /// Write metadata to `path`, replacing any previous contents. Known
    /// keys are written first (only when set), then unknown keys in their
    /// recorded order.
    pub fn save(&self, path: &Path) -> Result<()> {
        let map_err = |source| Error::Metadata {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_path(path)
            .map_err(map_err)?;
        if let Some(dirn) = &self.primary_fastq_dir {
            writer
                .write_record([KEY_PRIMARY_FASTQ_DIR, dirn])
                .map_err(map_err)?;
        }
        if let Some(samples) = &self.samples {
            writer.write_record([KEY_SAMPLES, samples]).map_err(map_err)?;
        }
        if let Some(paired) = self.paired_end {
            writer
                .write_record([KEY_PAIRED_END, if paired { "Y" } else { "N" }])
                .map_err(map_err)?;
        }
        for (key, value) in &self.extra {
            writer
                .write_record([key.as_str(), value.as_str()])
                .map_err(map_err)?;
        }
        writer.flush().map_err(|source| Error::Metadata {
            path: path.to_path_buf(),
            source: source.into(),
        })?;
        Ok(())
    }
}

// Accepts the spellings older tooling has written over the years.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn info_path(dir: &TempDir) -> std::path::PathBuf {
        dir.path().join(METADATA_FILE)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(ProjectInfo::load(&info_path(&dir)), ProjectInfo::default());
    }

    #[test]
    fn round_trip() {
        let dir = TempDir::new().unwrap();
        let info = ProjectInfo {
            primary_fastq_dir: Some("fastqs".to_string()),
            samples: Some("2 samples (PJB1-A, PJB1-B)".to_string()),
            paired_end: Some(true),
            extra: Vec::new(),
        };
        info.save(&info_path(&dir)).unwrap();
        assert_eq!(ProjectInfo::load(&info_path(&dir)), info);
    }

    #[test]
    fn unknown_keys_survive_round_trip() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            info_path(&dir),
            "PrimaryFastqDir\tfastqs\nOrganism\tHuman\nLibraryType\tRNA-seq\n",
        )
        .unwrap();
        let info = ProjectInfo::load(&info_path(&dir));
        assert_eq!(info.primary_fastq_dir.as_deref(), Some("fastqs"));
        assert_eq!(
            info.extra,
            vec![
                ("Organism".to_string(), "Human".to_string()),
                ("LibraryType".to_string(), "RNA-seq".to_string()),
            ]
        );
        info.save(&info_path(&dir)).unwrap();
        assert_eq!(ProjectInfo::load(&info_path(&dir)), info);
    }

    #[test]
    fn lenient_pairedness_spellings() {
        let dir = TempDir::new().unwrap();
        for (value, expected) in [("Y", true), ("yes", true), ("no", false), ("0", false)] {
            std::fs::write(info_path(&dir), format!("PairedEnd\t{value}\n")).unwrap();
            let info = ProjectInfo::load(&info_path(&dir));
            assert_eq!(info.paired_end, Some(expected), "value {value:?}");
        }
    }

    #[test]
    fn serializes_for_reports() {
        let info = ProjectInfo {
            primary_fastq_dir: Some("fastqs".to_string()),
            samples: Some("1 sample (S1)".to_string()),
            paired_end: Some(true),
            extra: vec![("Organism".to_string(), "Human".to_string())],
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["primary_fastq_dir"], "fastqs");
        assert_eq!(json["samples"], "1 sample (S1)");
        assert_eq!(json["paired_end"], true);
        assert_eq!(json["extra"][0][0], "Organism");
        assert_eq!(json["extra"][0][1], "Human");
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            info_path(&dir),
            "PrimaryFastqDir\tfastqs\nthis line has no value\n",
        )
        .unwrap();
        assert_eq!(ProjectInfo::load(&info_path(&dir)), ProjectInfo::default());
    }

    #[test]
    fn unparseable_flag_rejects_whole_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            info_path(&dir),
            "PrimaryFastqDir\tfastqs\nPairedEnd\tmaybe\n",
        )
        .unwrap();
        assert_eq!(ProjectInfo::load(&info_path(&dir)), ProjectInfo::default());
    }
}
