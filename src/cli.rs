//! Command-line interface for gtftools

use crate::error::{GtfToolsError, Result};
use crate::gtf::GtfFile;
use crate::stats::GtfStats;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

/// gtftools - Tools for reading, filtering and summarizing GTF files
#[derive(Parser)]
#[command(name = "gtftools")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Display statistics about a GTF file
    Stats {
        /// Path to the GTF file (.gtf or .gtf.gz)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Filter records and print them back in GTF format
    Filter {
        /// Path to the GTF file (.gtf or .gtf.gz)
        #[arg(short, long)]
        input: PathBuf,

        /// Keep records with this feature type (e.g. exon)
        #[arg(short, long)]
        feature: Option<String>,

        /// Keep records on this sequence (e.g. chr1)
        #[arg(short, long)]
        seqname: Option<String>,

        /// Keep records from this annotation source
        #[arg(long)]
        source: Option<String>,

        /// Keep records carrying this attribute; `key` or `key=value`
        /// (repeatable)
        #[arg(short, long)]
        attribute: Vec<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a GTF file and report how many lines were kept vs skipped
    Validate {
        /// Path to the GTF file (.gtf or .gtf.gz)
        #[arg(short, long)]
        input: PathBuf,

        /// Also show a per-feature breakdown
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats {
            input,
            format,
            output,
        } => cmd_stats(&input, &format, output.as_deref()),
        Commands::Filter {
            input,
            feature,
            seqname,
            source,
            attribute,
            output,
        } => cmd_filter(&input, feature, seqname, source, &attribute, output.as_deref()),
        Commands::Validate { input, verbose } => cmd_validate(&input, verbose),
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn cmd_stats(input: &PathBuf, format: &str, output: Option<&std::path::Path>) -> Result<()> {
    let spinner = create_spinner("Reading GTF file...");
    let start = Instant::now();

    let gtf = GtfFile::from_file(input)?;
    spinner.set_message("Computing statistics...");

    let stats = GtfStats::from_records(gtf.records());
    spinner.finish_with_message(format!("Done in {:.2?}", start.elapsed()));

    let output_text = match format.to_lowercase().as_str() {
        "json" => stats.to_json()?,
        _ => stats.format_summary(),
    };

    if let Some(output_path) = output {
        std::fs::write(output_path, &output_text)?;
        println!("Statistics written to: {}", output_path.display());
    } else {
        println!("{}", output_text);
    }

    Ok(())
}

/// An attribute filter criterion: require the key, optionally with an
/// exact value.
fn parse_attribute_filter(raw: &str) -> Result<(String, Option<String>)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => {
            Ok((key.to_string(), Some(value.to_string())))
        }
        None if !raw.is_empty() => Ok((raw.to_string(), None)),
        _ => Err(GtfToolsError::InvalidInput(format!(
            "attribute filter needs the form key or key=value, got: {}",
            raw
        ))),
    }
}

fn cmd_filter(
    input: &PathBuf,
    feature: Option<String>,
    seqname: Option<String>,
    source: Option<String>,
    attributes: &[String],
    output: Option<&std::path::Path>,
) -> Result<()> {
    let attribute_filters: Vec<(String, Option<String>)> = attributes
        .iter()
        .map(|raw| parse_attribute_filter(raw))
        .collect::<Result<_>>()?;

    let spinner = create_spinner("Reading GTF file...");
    let start = Instant::now();

    let gtf = GtfFile::from_file(input)?;
    spinner.set_message("Filtering records...");

    let matches = gtf.filter(|record| {
        if let Some(ref feature) = feature {
            if record.feature != *feature {
                return false;
            }
        }
        if let Some(ref seqname) = seqname {
            if record.seqname != *seqname {
                return false;
            }
        }
        if let Some(ref source) = source {
            if record.source != *source {
                return false;
            }
        }
        attribute_filters.iter().all(|(key, value)| match value {
            Some(value) => record.attribute(key) == Some(value.as_str()),
            None => record.has_attribute(key),
        })
    });

    spinner.finish_with_message(format!(
        "Matched {} of {} records in {:.2?}",
        matches.len(),
        gtf.count(),
        start.elapsed()
    ));

    let mut lines = String::new();
    for record in &matches {
        lines.push_str(&record.to_string());
        lines.push('\n');
    }

    if let Some(output_path) = output {
        std::fs::write(output_path, &lines)?;
        println!("Records written to: {}", output_path.display());
    } else {
        print!("{}", lines);
    }

    Ok(())
}

fn cmd_validate(input: &PathBuf, verbose: bool) -> Result<()> {
    let spinner = create_spinner("Validating GTF file...");
    let start = Instant::now();

    let gtf = GtfFile::from_file(input)?;
    spinner.finish_with_message(format!("File parsed in {:.2?}", start.elapsed()));

    println!("\n=== Validation Results ===\n");
    println!("Lines read:     {}", gtf.lines_read());
    println!("Valid records:  {}", gtf.count());
    println!("Skipped lines:  {}", gtf.skipped_lines());

    if verbose && !gtf.is_empty() {
        let stats = GtfStats::from_records(gtf.records());
        println!("\nPer-feature breakdown:");
        let mut features: Vec<(&String, &usize)> = stats.feature_counts.iter().collect();
        features.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (feature, count) in features {
            println!("  {:<20} {:>10}", feature, count);
        }
    }

    if gtf.is_empty() {
        println!("\n⚠ No valid records found");
    } else {
        println!("\n✓ Validation passed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_stats() {
        let cli = Cli::try_parse_from(["gtftools", "stats", "-i", "test.gtf"]).unwrap();
        match cli.command {
            Commands::Stats { input, .. } => {
                assert_eq!(input, PathBuf::from("test.gtf"));
            }
            _ => panic!("Expected Stats command"),
        }
    }

    #[test]
    fn test_cli_parse_filter() {
        let cli = Cli::try_parse_from([
            "gtftools", "filter", "-i", "test.gtf", "-f", "exon", "-a", "gene_id=ABC",
        ])
        .unwrap();
        match cli.command {
            Commands::Filter {
                input,
                feature,
                attribute,
                ..
            } => {
                assert_eq!(input, PathBuf::from("test.gtf"));
                assert_eq!(feature.as_deref(), Some("exon"));
                assert_eq!(attribute, vec!["gene_id=ABC".to_string()]);
            }
            _ => panic!("Expected Filter command"),
        }
    }

    #[test]
    fn test_parse_attribute_filter() {
        assert_eq!(
            parse_attribute_filter("gene_id").unwrap(),
            ("gene_id".to_string(), None)
        );
        assert_eq!(
            parse_attribute_filter("gene_id=ABC").unwrap(),
            ("gene_id".to_string(), Some("ABC".to_string()))
        );
        assert!(parse_attribute_filter("").is_err());
        assert!(parse_attribute_filter("=ABC").is_err());
    }
}
