//! gtftools - GTF annotation tools CLI
//!
//! A command-line tool for reading, filtering and summarizing GTF files.

use gtftools::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
