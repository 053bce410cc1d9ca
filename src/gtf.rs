//! GTF (Gene Transfer Format) file parser
//!
//! This module provides parsing functionality for GTF format files,
//! which are commonly used to represent gene annotations.
//!
//! A GTF line has eight tab-separated fixed columns (seqname, source,
//! feature, start, end, score, strand, frame) followed by zero or more
//! `key value;` attribute groups. Lines that do not match this shape,
//! comment lines and blank lines are skipped silently.

use crate::error::{GtfToolsError, Result};
use flate2::read::GzDecoder;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

/// Sentinel score meaning the score column was `.` (no score given).
///
/// Callers should use [`GtfRecord::has_score`] instead of comparing
/// against this value directly.
pub const NO_SCORE: f64 = f64::INFINITY;

/// Line grammar for a well-formed GTF record, anchored at both ends.
///
/// Eight tab-separated fixed columns (start and end digit-only, strand a
/// single character, frame a single digit) followed by repeated
/// `<ws> key <ws> value;` attribute groups. Trailing content after the
/// last group is rejected. A quoted attribute value containing internal
/// whitespace does not match the grammar and the whole line is skipped;
/// this mirrors the strict variant of the format and is a documented
/// limitation rather than a bug.
static GTF_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\S+\t\S+\t\S+\t\d+\t\d+\t\S+\t\S\t\d(?:\s\S+\s\S+;)*$")
        .expect("GTF line pattern is valid")
});

/// A single annotation record (one valid line of a GTF file)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GtfRecord {
    /// Sequence (chromosome/contig) name
    pub seqname: String,
    /// Annotation source (e.g. Ensembl, HAVANA)
    pub source: String,
    /// Feature type (gene, transcript, exon, CDS, ...)
    pub feature: String,
    /// Start position (1-based, inclusive)
    pub start: u64,
    /// End position (1-based, inclusive); not required to be >= start
    pub end: u64,
    /// Score, or [`NO_SCORE`] if the column was `.`
    pub score: f64,
    /// Strand character, conventionally `+`, `-` or `.`
    pub strand: char,
    /// Frame (0, 1 or 2)
    pub frame: u8,
    /// Attribute key/value pairs; a repeated key keeps its last value
    pub attributes: HashMap<String, String>,
}

impl GtfRecord {
    /// Parse one raw line into a record.
    ///
    /// The line is sanitized first (comment stripping, whitespace
    /// trimming). Returns `None` for comment lines, blank lines and
    /// lines that do not match the GTF grammar; an invalid line is
    /// never an error.
    pub fn from_line(line: &str) -> Option<Self> {
        let line = sanitize_line(line);
        if !GTF_LINE.is_match(line) {
            return None;
        }

        let mut rest = line;
        let seqname = next_token(&mut rest)?.to_string();
        let source = next_token(&mut rest)?.to_string();
        let feature = next_token(&mut rest)?.to_string();
        let start = next_token(&mut rest)?.parse().ok()?;
        let end = next_token(&mut rest)?.parse().ok()?;
        let score = parse_score(next_token(&mut rest)?);
        let strand = next_token(&mut rest)?.chars().next()?;
        let frame = next_token(&mut rest)?.parse().ok()?;

        let mut attributes = HashMap::new();
        while let Some(key) = next_token(&mut rest) {
            let raw = take_until_semicolon(&mut rest);
            attributes.insert(key.to_string(), sanitize_attr_value(raw).to_string());
        }

        Some(GtfRecord {
            seqname,
            source,
            feature,
            start,
            end,
            score,
            strand,
            frame,
            attributes,
        })
    }

    /// True if the score column held a real number rather than `.`
    pub fn has_score(&self) -> bool {
        self.score.is_finite()
    }

    /// True if the record carries the named attribute
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Get an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

impl fmt::Display for GtfRecord {
    /// Render the record back into GTF line format.
    ///
    /// Fixed columns are tab-joined, `NO_SCORE` is written as `.`, and
    /// each attribute is rendered as `key "value";`. Attributes are
    /// emitted in sorted key order so output is deterministic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t",
            self.seqname, self.source, self.feature, self.start, self.end
        )?;
        if self.has_score() {
            write!(f, "{}", self.score)?;
        } else {
            f.write_str(".")?;
        }
        write!(f, "\t{}\t{}", self.strand, self.frame)?;

        let mut keys: Vec<&String> = self.attributes.keys().collect();
        keys.sort();
        for key in keys {
            write!(f, "\t{} \"{}\";", key, self.attributes[key])?;
        }
        Ok(())
    }
}

/// Strip the comment suffix and surrounding whitespace from a raw line.
///
/// Everything from the first `#` onward is discarded; the truncation is
/// not quote-aware, so a `#` inside a quoted attribute value also cuts
/// the line (known limitation of the format's common readers). The
/// result may be empty, which is not an error.
fn sanitize_line(line: &str) -> &str {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    line.trim_matches(|c| c == ' ' || c == '\t')
}

/// Trim an attribute value and strip one surrounding quote per side.
///
/// Each side is handled independently, so unbalanced quoting loses
/// exactly the one quote that is present.
fn sanitize_attr_value(raw: &str) -> &str {
    let value = raw.trim_matches(|c| c == ' ' || c == '\t');
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

/// Take the next whitespace-delimited token, advancing the cursor.
fn next_token<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        *rest = trimmed;
        return None;
    }
    let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    let (token, tail) = trimmed.split_at(end);
    *rest = tail;
    Some(token)
}

/// Consume up to and including the next `;`, returning the raw value.
///
/// Without a `;` the remainder of the line is taken, matching stream
/// readers that treat end-of-line as an implicit terminator.
fn take_until_semicolon<'a>(rest: &mut &'a str) -> &'a str {
    match rest.find(';') {
        Some(pos) => {
            let raw = &rest[..pos];
            *rest = &rest[pos + 1..];
            raw
        }
        None => {
            let raw = *rest;
            *rest = "";
            raw
        }
    }
}

/// Best-effort score parse.
///
/// A literal `.` yields [`NO_SCORE`]. Anything else is parsed as the
/// longest numeric prefix of the token (`3.5x` gives 3.5); a token with
/// no numeric prefix gives 0.0. A malformed score never rejects the
/// line. This leniency matches `atof` semantics and can surprise
/// callers expecting strict parsing.
fn parse_score(token: &str) -> f64 {
    if token == "." {
        return NO_SCORE;
    }
    let mut value = 0.0;
    for (pos, _) in token.char_indices().skip(1) {
        if let Ok(parsed) = token[..pos].parse() {
            value = parsed;
        }
    }
    if let Ok(parsed) = token.parse() {
        value = parsed;
    }
    value
}

/// An in-memory GTF file: the records of every valid line, in file order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GtfFile {
    records: Vec<GtfRecord>,
    lines_read: usize,
}

impl GtfFile {
    /// Load a GTF file from a path.
    ///
    /// Files with a `.gz` extension are decompressed transparently.
    /// Fails with [`GtfToolsError::FileOpen`] before any line is read
    /// if the path cannot be opened.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| GtfToolsError::FileOpen {
            path: path.display().to_string(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "gz") {
            Self::parse(BufReader::new(GzDecoder::new(file)))
        } else {
            Self::parse(BufReader::new(file))
        }
    }

    /// Parse GTF records from a buffered reader.
    ///
    /// Invalid, comment and blank lines are skipped without error; only
    /// IO failures propagate.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut records = Vec::new();
        let mut lines_read = 0;

        for line_result in reader.lines() {
            let line = line_result?;
            lines_read += 1;
            if let Some(record) = GtfRecord::from_line(&line) {
                records.push(record);
            }
        }

        Ok(GtfFile {
            records,
            lines_read,
        })
    }

    /// Number of records parsed
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// True if no valid record was found
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of lines read from the input
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Number of lines that yielded no record (comments, blanks and
    /// grammar-rejected lines)
    pub fn skipped_lines(&self) -> usize {
        self.lines_read - self.records.len()
    }

    /// All records, in file order
    pub fn records(&self) -> &[GtfRecord] {
        &self.records
    }

    /// Iterate over the records
    pub fn iter(&self) -> std::slice::Iter<'_, GtfRecord> {
        self.records.iter()
    }

    /// Return copies of the records satisfying the given predicate.
    ///
    /// The predicate can be a closure: `|rec| rec.feature == "exon"`.
    pub fn filter<F>(&self, predicate: F) -> Vec<GtfRecord>
    where
        F: Fn(&GtfRecord) -> bool,
    {
        self.records
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }
}

impl IntoIterator for GtfFile {
    type Item = GtfRecord;
    type IntoIter = std::vec::IntoIter<GtfRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a GtfFile {
    type Item = &'a GtfRecord;
    type IntoIter = std::slice::Iter<'a, GtfRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
