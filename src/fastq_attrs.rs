//! Classification of read-file names into semantic attributes.
//!
//! Demultiplexing software has produced several inconsistent naming schemes
//! over the years. The classifier here tries them in a fixed priority order,
//! from the most fully qualified (the five-token `bcl2fastq` convention) down
//! to a best-effort fallback that treats the whole basename as the sample
//! name. Classification is a pure function of the name and never fails.

use std::fmt;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    // <sample>_<S<n>|barcode>[_L<lane>]_<R|I><read>_<set>
    static ref CANONICAL: Regex = Regex::new(
        r"^(?P<sample>.+)_(?:S(?P<snum>\d+)|(?P<bc>[ACGT]+(?:-[ACGT]+)?))(?:_L(?P<lane>\d+))?_(?P<rtok>[RI])(?P<read>\d+)_(?P<set>\d+)$"
    )
    .unwrap();
    // <sample>[_<barcode>][_L<lane>][_<R|I><read>], at least one token required
    static ref PARTIAL: Regex = Regex::new(
        r"^(?P<sample>.+?)(?:_(?P<bc>[ACGT]+(?:-[ACGT]+)?))?(?:_L(?P<lane>\d+))?(?:_(?P<rtok>[RI])(?P<read>\d+))?$"
    )
    .unwrap();
    // dot-separated variant of the partial scheme, lowercase read token allowed
    static ref DOT_PARTIAL: Regex = Regex::new(
        r"^(?P<sample>.+?)(?:\.(?P<bc>[ACGT]+(?:-[ACGT]+)?))?(?:\.L(?P<lane>\d+))?(?:\.(?P<rtok>[rR])(?P<read>\d+))?$"
    )
    .unwrap();
}

/// File suffixes recognized as fastq data, optionally compressed.
pub const FASTQ_EXTENSIONS: [&str; 5] = [".fastq.gz", ".fastq.lz4", ".fq.gz", ".fastq", ".fq"];

fn split_extension(file_name: &str) -> (&str, &str) {
    for ext in FASTQ_EXTENSIONS {
        if let Some(stem) = file_name.strip_suffix(ext) {
            if !stem.is_empty() {
                return (stem, &file_name[stem.len()..]);
            }
        }
    }
    (file_name, "")
}

/// Attributes parsed out of a single read-file name.
///
/// The parse is lossless: concatenating `sample_name` with the detected
/// tokens in canonical order (which is what `Display` does) reproduces
/// `basename` exactly for any name the known schemes classify.
///
/// `sample_number` is only ever set by the canonical `S<n>` tag; a numeric
/// token under any other scheme stays part of the sample name. Downstream
/// consumers rely on its absence to tell which convention produced a name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FastqAttrs {
    /// File name without directory or recognized extension.
    pub basename: String,
    /// The stripped suffix, e.g. `.fastq.gz`; empty if none was recognized.
    pub extension: String,
    pub sample_name: String,
    pub sample_number: Option<u32>,
    pub barcode_sequence: Option<String>,
    pub lane_number: Option<u32>,
    pub read_number: Option<u32>,
    pub set_number: Option<u32>,
    pub is_index_read: bool,
    #[serde(skip_serializing)]
    separator: char,
    #[serde(skip_serializing)]
    read_prefix: Option<char>,
}

impl FastqAttrs {
    /// Classify a read-file name (or a full path to one).
    pub fn parse(fastq: impl AsRef<Path>) -> FastqAttrs {
        let file_name = fastq
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (basename, extension) = split_extension(&file_name);

        let mut attrs = FastqAttrs {
            basename: basename.to_string(),
            extension: extension.to_string(),
            sample_name: basename.to_string(),
            sample_number: None,
            barcode_sequence: None,
            lane_number: None,
            read_number: None,
            set_number: None,
            is_index_read: false,
            separator: '_',
            read_prefix: None,
        };

        if let Some(cap) = CANONICAL.captures(basename) {
            if let Some(parsed) = apply_canonical(&cap, &attrs) {
                return parsed;
            }
        }

        for (regex, separator) in [(&*PARTIAL, '_'), (&*DOT_PARTIAL, '.')] {
            if let Some(cap) = regex.captures(basename) {
                if cap.name("bc").is_none() && cap.name("lane").is_none() && cap.name("read").is_none()
                {
                    // the sample group swallowed the whole name; not a match
                    continue;
                }
                if let Some(parsed) = apply_partial(&cap, &attrs, separator) {
                    return parsed;
                }
            }
        }

        // fallback: the whole basename is the sample name
        attrs
    }
}

// A numeric token that does not fit u32 makes the whole scheme a non-match;
// classification falls through rather than failing.
fn numeric(cap: &regex::Captures<'_>, name: &str) -> Option<Option<u32>> {
    match cap.name(name) {
        None => Some(None),
        Some(m) => m.as_str().parse().map(Some).ok(),
    }
}

fn apply_canonical(cap: &regex::Captures<'_>, attrs: &FastqAttrs) -> Option<FastqAttrs> {
    let mut attrs = attrs.clone();
    attrs.sample_name = cap["sample"].to_string();
    attrs.sample_number = numeric(cap, "snum")?;
    attrs.barcode_sequence = cap.name("bc").map(|m| m.as_str().to_string());
    attrs.lane_number = numeric(cap, "lane")?;
    attrs.read_number = numeric(cap, "read")?;
    attrs.set_number = numeric(cap, "set")?;
    attrs.is_index_read = &cap["rtok"] == "I";
    attrs.read_prefix = cap["rtok"].chars().next();
    Some(attrs)
}

fn apply_partial(
    cap: &regex::Captures<'_>,
    attrs: &FastqAttrs,
    separator: char,
) -> Option<FastqAttrs> {
    let mut attrs = attrs.clone();
    attrs.sample_name = cap["sample"].to_string();
    attrs.barcode_sequence = cap.name("bc").map(|m| m.as_str().to_string());
    attrs.lane_number = numeric(cap, "lane")?;
    attrs.read_number = numeric(cap, "read")?;
    attrs.is_index_read = cap.name("rtok").is_some_and(|m| m.as_str() == "I");
    attrs.read_prefix = cap.name("rtok").and_then(|m| m.as_str().chars().next());
    attrs.separator = separator;
    Some(attrs)
}

impl fmt::Display for FastqAttrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = self.separator;
        write!(f, "{}", self.sample_name)?;
        if let Some(n) = self.sample_number {
            write!(f, "_S{n}")?;
        }
        if let Some(bc) = &self.barcode_sequence {
            write!(f, "{sep}{bc}")?;
        }
        if let Some(lane) = self.lane_number {
            write!(f, "{sep}L{lane:03}")?;
        }
        if let Some(read) = self.read_number {
            write!(f, "{sep}{}{read}", self.read_prefix.unwrap_or('R'))?;
        }
        if let Some(set) = self.set_number {
            write!(f, "_{set:03}")?;
        }
        Ok(())
    }
}

/// Strategy for turning read-file names into attributes.
///
/// Sites with naming conventions this crate does not recognize can supply
/// their own implementation (any `Fn(&Path) -> FastqAttrs` works too) to
/// [`Sample`](crate::Sample), [`FastqSet`](crate::FastqSet) and
/// [`Project`](crate::Project) construction.
pub trait NameScheme: Send + Sync {
    fn classify(&self, fastq: &Path) -> FastqAttrs;
}

/// The default classifier: the scheme priority order documented on
/// [`FastqAttrs::parse`].
pub struct IlluminaNames;

impl NameScheme for IlluminaNames {
    fn classify(&self, fastq: &Path) -> FastqAttrs {
        FastqAttrs::parse(fastq)
    }
}

impl<F> NameScheme for F
where
    F: Fn(&Path) -> FastqAttrs + Send + Sync,
{
    fn classify(&self, fastq: &Path) -> FastqAttrs {
        self(fastq)
    }
}
