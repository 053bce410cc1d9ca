//! gtftools - GTF annotation tools
//!
//! A library for reading, filtering and summarizing GTF (Gene Transfer
//! Format) gene annotation files.
//!
//! # Features
//!
//! - Parse GTF files line by line with strict grammar validation
//! - Silent skipping of comment, blank and malformed lines
//! - Attribute key/value decoding with quote stripping
//! - Transparent reading of gzip-compressed files
//! - Predicate-based record filtering
//! - Summary statistics over parsed annotations
//!
//! # Example
//!
//! ```no_run
//! use gtftools::gtf::GtfFile;
//! use gtftools::stats::GtfStats;
//!
//! // Parse a GTF file
//! let gtf = GtfFile::from_file("annotations.gtf").unwrap();
//!
//! // Filter records with a predicate
//! let exons = gtf.filter(|rec| rec.feature == "exon");
//! println!("{} exons", exons.len());
//!
//! // Compute statistics
//! let stats = GtfStats::from_records(gtf.records());
//! println!("{}", stats.format_summary());
//! ```

pub mod cli;
pub mod error;
pub mod gtf;
pub mod stats;

pub use error::{GtfToolsError, Result};
pub use gtf::{GtfFile, GtfRecord, NO_SCORE};
pub use stats::GtfStats;
