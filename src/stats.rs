//! Statistics computation for GTF annotation files

use crate::gtf::GtfRecord;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Statistics about a set of GTF records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GtfStats {
    /// Total number of records
    pub record_count: usize,
    /// Number of distinct sequence names
    pub seqname_count: usize,
    /// Records per feature type
    pub feature_counts: HashMap<String, usize>,
    /// Records per annotation source
    pub source_counts: HashMap<String, usize>,
    /// Records per strand character
    pub strand_counts: HashMap<char, usize>,
    /// Smallest start coordinate seen (0 when empty)
    pub min_start: u64,
    /// Largest end coordinate seen (0 when empty)
    pub max_end: u64,
    /// Mean feature length in bases (end < start counts as 0)
    pub mean_feature_length: f64,
    /// Records carrying a numeric score
    pub scored_count: usize,
    /// Records whose score column was `.`
    pub no_score_count: usize,
    /// Number of distinct attribute keys across all records
    pub attribute_key_count: usize,
}

impl GtfStats {
    /// Compute statistics from a slice of records
    pub fn from_records(records: &[GtfRecord]) -> Self {
        let record_count = records.len();

        let mut seqnames = HashSet::new();
        let mut feature_counts: HashMap<String, usize> = HashMap::new();
        let mut source_counts: HashMap<String, usize> = HashMap::new();
        let mut strand_counts: HashMap<char, usize> = HashMap::new();
        let mut attribute_keys = HashSet::new();

        let mut min_start = u64::MAX;
        let mut max_end = 0;
        let mut total_length: u64 = 0;
        let mut scored_count = 0;

        for record in records {
            seqnames.insert(record.seqname.clone());
            *feature_counts.entry(record.feature.clone()).or_insert(0) += 1;
            *source_counts.entry(record.source.clone()).or_insert(0) += 1;
            *strand_counts.entry(record.strand).or_insert(0) += 1;

            for key in record.attributes.keys() {
                attribute_keys.insert(key.clone());
            }

            min_start = min_start.min(record.start);
            max_end = max_end.max(record.end);
            if record.end >= record.start {
                total_length += record.end - record.start + 1;
            }
            if record.has_score() {
                scored_count += 1;
            }
        }

        let mean_feature_length = if record_count == 0 {
            0.0
        } else {
            total_length as f64 / record_count as f64
        };

        GtfStats {
            record_count,
            seqname_count: seqnames.len(),
            feature_counts,
            source_counts,
            strand_counts,
            min_start: if record_count == 0 { 0 } else { min_start },
            max_end,
            mean_feature_length,
            scored_count,
            no_score_count: record_count - scored_count,
            attribute_key_count: attribute_keys.len(),
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut output = String::new();
        output.push_str("=== GTF Statistics ===\n\n");

        output.push_str(&format!(
            "Records:                 {:>12}\n",
            self.record_count
        ));
        output.push_str(&format!(
            "Sequences:               {:>12}\n",
            self.seqname_count
        ));
        output.push_str(&format!(
            "Coordinate span:         {:>12}\n",
            format!("{} - {}", self.min_start, self.max_end)
        ));
        output.push_str(&format!(
            "Mean feature length:     {:>12.1}\n",
            self.mean_feature_length
        ));
        output.push_str(&format!(
            "Scored records:          {:>12}\n",
            self.scored_count
        ));
        output.push_str(&format!(
            "Unscored records (.):    {:>12}\n",
            self.no_score_count
        ));
        output.push_str(&format!(
            "Distinct attribute keys: {:>12}\n",
            self.attribute_key_count
        ));

        output.push_str("\nFeatures:\n");
        for (feature, count) in sorted_by_count(&self.feature_counts) {
            output.push_str(&format!("  {:<20} {:>12}\n", feature, count));
        }

        output.push_str("\nSources:\n");
        for (source, count) in sorted_by_count(&self.source_counts) {
            output.push_str(&format!("  {:<20} {:>12}\n", source, count));
        }

        output.push_str("\nStrands:\n");
        let mut strands: Vec<(&char, &usize)> = self.strand_counts.iter().collect();
        strands.sort_by_key(|(strand, _)| **strand);
        for (strand, count) in strands {
            output.push_str(&format!("  {:<20} {:>12}\n", strand, count));
        }

        output
    }

    /// Serialize statistics to pretty-printed JSON
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Sort a count map by descending count, then name for stable output.
fn sorted_by_count(counts: &HashMap<String, usize>) -> Vec<(&String, &usize)> {
    let mut entries: Vec<(&String, &usize)> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtf::GtfFile;
    use std::io::Cursor;

    fn sample() -> Vec<GtfRecord> {
        let content = "chr1\tEnsembl\texon\t100\t200\t.\t+\t0\tgene_id \"A\";\n\
                       chr1\tEnsembl\texon\t300\t400\t1.5\t+\t0\tgene_id \"A\"; note x;\n\
                       chr2\thavana\tgene\t50\t1000\t.\t-\t0\tgene_id \"B\";\n";
        GtfFile::parse(Cursor::new(content)).unwrap().into_iter().collect()
    }

    #[test]
    fn test_basic_counts() {
        let stats = GtfStats::from_records(&sample());

        assert_eq!(stats.record_count, 3);
        assert_eq!(stats.seqname_count, 2);
        assert_eq!(stats.feature_counts["exon"], 2);
        assert_eq!(stats.feature_counts["gene"], 1);
        assert_eq!(stats.source_counts["Ensembl"], 2);
        assert_eq!(stats.strand_counts[&'+'], 2);
        assert_eq!(stats.strand_counts[&'-'], 1);
        assert_eq!(stats.min_start, 50);
        assert_eq!(stats.max_end, 1000);
        assert_eq!(stats.scored_count, 1);
        assert_eq!(stats.no_score_count, 2);
        assert_eq!(stats.attribute_key_count, 2);
    }

    #[test]
    fn test_mean_length() {
        let stats = GtfStats::from_records(&sample());
        // lengths: 101, 101, 951
        assert!((stats.mean_feature_length - 1153.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_records() {
        let stats = GtfStats::from_records(&[]);
        assert_eq!(stats.record_count, 0);
        assert_eq!(stats.min_start, 0);
        assert_eq!(stats.max_end, 0);
        assert_eq!(stats.mean_feature_length, 0.0);
    }

    #[test]
    fn test_json_output() {
        let stats = GtfStats::from_records(&sample());
        let json = stats.to_json().unwrap();
        assert!(json.contains("\"record_count\": 3"));
    }

    #[test]
    fn test_summary_contains_features() {
        let stats = GtfStats::from_records(&sample());
        let summary = stats.format_summary();
        assert!(summary.contains("exon"));
        assert!(summary.contains("gene"));
        assert!(summary.contains("Records:"));
    }
}
