use super::Preset;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of a successful compression run.
#[derive(Debug, Clone, Serialize)]
pub struct CompressionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub preset: Preset,
    pub binary: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
}

impl CompressionReport {
    /// `(1 - compressed/original) * 100`; negative when the output grew.
    pub fn reduction_percent(&self) -> Option<f64> {
        reduction_percent(self.original_size, self.compressed_size)
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Original size: {}", format_kilobytes(self.original_size)),
            format!("Compressed size: {}", format_kilobytes(self.compressed_size)),
        ];

        if let Some(reduction) = self.reduction_percent() {
            lines.push(format!("Reduction: {}", format_percent(reduction)));
        }

        lines.push(format!("Compressed PDF saved as: {}", self.output.display()));
        lines
    }
}

pub fn reduction_percent(original_size: u64, compressed_size: u64) -> Option<f64> {
    if original_size == 0 {
        return None;
    }
    Some((1.0 - compressed_size as f64 / original_size as f64) * 100.0)
}

pub fn format_kilobytes(bytes: u64) -> String {
    format!("{:.2} KB", round_half_up(bytes as f64 / 1024.0))
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", round_half_up(value))
}

// Ties go toward +inf: 1953.125 prints as 1953.13, -0.125 as -0.12.
fn round_half_up(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(original_size: u64, compressed_size: u64) -> CompressionReport {
        CompressionReport {
            input: PathBuf::from("doc.pdf"),
            output: PathBuf::from("doc_compressed.pdf"),
            preset: Preset::Ebook,
            binary: PathBuf::from("/usr/bin/gs"),
            original_size,
            compressed_size,
            duration: Duration::from_millis(1200),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_reduction_percent() {
        let pct = reduction_percent(2_000_000, 500_000).unwrap();
        assert!((pct - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_reduction_can_be_negative() {
        let pct = reduction_percent(1000, 1500).unwrap();
        assert!((pct + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_original_size_has_no_reduction() {
        assert!(reduction_percent(0, 10).is_none());
        let lines = report(0, 10).summary_lines();
        assert!(!lines.iter().any(|l| l.starts_with("Reduction")));
    }

    #[test]
    fn test_ties_round_up() {
        assert_eq!(format_kilobytes(2_000_000), "1953.13 KB");
        assert_eq!(format_kilobytes(1024), "1.00 KB");
        assert_eq!(format_kilobytes(0), "0.00 KB");
    }

    #[test]
    fn test_negative_ties_round_up() {
        assert_eq!(format_percent(-0.125), "-0.12%");
        assert_eq!(format_percent(-50.0), "-50.00%");
        assert_eq!(format_percent(0.125), "0.13%");
    }

    #[test]
    fn test_summary_lines() {
        let lines = report(2_000_000, 1_000_000).summary_lines();
        assert_eq!(lines[0], "Original size: 1953.13 KB");
        assert_eq!(lines[1], "Compressed size: 976.56 KB");
        assert_eq!(lines[2], "Reduction: 50.00%");
        assert_eq!(lines[3], "Compressed PDF saved as: doc_compressed.pdf");
    }

    #[test]
    fn test_report_serializes_to_json() {
        let json = serde_json::to_value(report(2048, 1024)).unwrap();
        assert_eq!(json["preset"], "ebook");
        assert_eq!(json["original_size"], 2048);
        assert_eq!(json["compressed_size"], 1024);
    }
}
