use crate::config::Config;
use crate::error::{GenRstError, Result};
use crate::extractor::{ExtractionProgress, PairOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub summary: ExtractionSummary,
    pub pairs: Vec<PairOutcome>,
    pub extraction_time: DateTime<Utc>,
    pub config_used: ConfigSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionSummary {
    pub pairs_processed: usize,
    pub lines_written: usize,
    pub bytes_written: u64,
    pub extraction_duration: Duration,
    pub empty_outputs: Vec<String>,
    pub unterminated: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigSnapshot {
    pub sentinel: String,
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub source_extension: String,
    pub dest_extension: String,
}

impl From<&Config> for ConfigSnapshot {
    fn from(config: &Config) -> Self {
        Self {
            sentinel: config.markers.sentinel.clone(),
            source_dir: config.paths.source_dir.clone(),
            dest_dir: config.paths.dest_dir.clone(),
            source_extension: config.paths.source_extension.clone(),
            dest_extension: config.paths.dest_extension.clone(),
        }
    }
}

impl ExtractionReport {
    pub fn new(progress: &ExtractionProgress, config: &Config) -> Self {
        let empty_outputs = progress
            .outcomes
            .iter()
            .filter(|o| o.stats.lines_written == 0)
            .map(|o| o.pair.name.clone())
            .collect();

        let summary = ExtractionSummary {
            pairs_processed: progress.pairs_processed,
            lines_written: progress.lines_written,
            bytes_written: progress.bytes_written,
            extraction_duration: progress.elapsed(),
            empty_outputs,
            unterminated: progress.unterminated().into_iter().map(String::from).collect(),
        };

        Self {
            summary,
            pairs: progress.outcomes.clone(),
            extraction_time: Utc::now(),
            config_used: ConfigSnapshot::from(config),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.summary.unterminated.is_empty()
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json_content = serde_json::to_string_pretty(self).map_err(|e| GenRstError::Config {
            message: format!("Failed to serialize report to JSON: {}", e),
        })?;

        fs::write(path, json_content)?;
        tracing::debug!(path = %path.display(), "saved extraction report");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::PairStats;
    use crate::planner::FilePair;
    use tempfile::TempDir;

    fn sample_progress(config: &Config) -> ExtractionProgress {
        let mut progress = ExtractionProgress::new(2);
        progress.record(
            &FilePair::from_name("weekday", &config.paths),
            PairStats {
                lines_read: 10,
                lines_written: 4,
                bytes_written: 40,
                markers: 2,
                unterminated: false,
            },
        );
        progress.record(
            &FilePair::from_name("gap", &config.paths),
            PairStats {
                lines_read: 3,
                markers: 1,
                unterminated: true,
                ..PairStats::default()
            },
        );
        progress
    }

    #[test]
    fn test_report_summary() {
        let config = Config::default();
        let report = ExtractionReport::new(&sample_progress(&config), &config);

        assert_eq!(report.summary.pairs_processed, 2);
        assert_eq!(report.summary.lines_written, 4);
        assert_eq!(report.summary.empty_outputs, vec!["gap"]);
        assert_eq!(report.summary.unterminated, vec!["gap"]);
        assert!(report.has_warnings());
        assert_eq!(report.config_used.sentinel, "!!sphinx");
    }

    #[test]
    fn test_save_json() {
        let config = Config::default();
        let report = ExtractionReport::new(&sample_progress(&config), &config);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        report.save_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["pairs_processed"], 2);
        assert_eq!(value["pairs"][0]["pair"]["name"], "weekday");
        assert_eq!(value["pairs"][1]["stats"]["unterminated"], true);
    }
}
