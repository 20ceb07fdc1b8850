use crate::config::Config;
use crate::error::{GenRstError, Result};
use crate::extractor::marker_scanner::{extract_stream, PairStats, StreamError};
use crate::planner::FilePair;
use serde::Serialize;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize)]
pub struct PairOutcome {
    pub pair: FilePair,
    pub stats: PairStats,
}

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub pairs_processed: usize,
    pub total_pairs: usize,
    pub lines_written: usize,
    pub bytes_written: u64,
    pub current_pair: Option<String>,
    pub start_time: Instant,
    pub outcomes: Vec<PairOutcome>,
}

impl ExtractionProgress {
    pub fn new(total_pairs: usize) -> Self {
        Self {
            pairs_processed: 0,
            total_pairs,
            lines_written: 0,
            bytes_written: 0,
            current_pair: None,
            start_time: Instant::now(),
            outcomes: Vec::with_capacity(total_pairs),
        }
    }

    pub fn record(&mut self, pair: &FilePair, stats: PairStats) {
        self.pairs_processed += 1;
        self.lines_written += stats.lines_written;
        self.bytes_written += stats.bytes_written;
        self.current_pair = Some(pair.name.clone());
        self.outcomes.push(PairOutcome {
            pair: pair.clone(),
            stats,
        });
    }

    /// Names of pairs whose input ended inside an extraction window.
    pub fn unterminated(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.stats.unterminated)
            .map(|o| o.pair.name.as_str())
            .collect()
    }

    pub fn percentage(&self) -> f64 {
        if self.total_pairs == 0 {
            0.0
        } else {
            (self.pairs_processed as f64 / self.total_pairs as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

pub struct Extractor {
    sentinel: String,
    create_missing_dirs: bool,
    buffer_size: usize,
}

impl Extractor {
    pub fn new<S: Into<String>>(sentinel: S) -> Self {
        Self {
            sentinel: sentinel.into(),
            create_missing_dirs: false,
            buffer_size: 64 * 1024,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.markers.sentinel.clone())
            .with_create_missing_dirs(config.output.create_missing_dirs)
    }

    pub fn with_create_missing_dirs(mut self, create: bool) -> Self {
        self.create_missing_dirs = create;
        self
    }

    /// Processes every pair in order. The first failure stops the run and
    /// later pairs are left untouched.
    pub fn extract(
        &self,
        pairs: &[FilePair],
        progress_callback: Option<&dyn Fn(&ExtractionProgress)>,
    ) -> Result<ExtractionProgress> {
        let mut progress = ExtractionProgress::new(pairs.len());

        for pair in pairs {
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            let stats = self.extract_pair(pair)?;
            progress.record(pair, stats);
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(progress)
    }

    /// Both files are closed when this returns, on success or failure.
    pub fn extract_pair(&self, pair: &FilePair) -> Result<PairStats> {
        tracing::debug!(
            name = %pair.name,
            source = %pair.source.display(),
            destination = %pair.destination.display(),
            "extracting"
        );

        let source_file = fs::File::open(&pair.source).map_err(|e| GenRstError::SourceOpen {
            path: pair.source.clone(),
            source: e,
        })?;

        // Creating the destination would truncate the source before it is read.
        if same_file::is_same_file(&pair.source, &pair.destination).unwrap_or(false) {
            return Err(GenRstError::SameFile {
                path: pair.destination.clone(),
            });
        }

        if self.create_missing_dirs {
            if let Some(parent) = pair.destination.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent).map_err(|e| GenRstError::DestinationCreate {
                        path: pair.destination.clone(),
                        source: e,
                    })?;
                }
            }
        }

        let dest_file =
            fs::File::create(&pair.destination).map_err(|e| GenRstError::DestinationCreate {
                path: pair.destination.clone(),
                source: e,
            })?;

        let reader = BufReader::with_capacity(self.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.buffer_size, dest_file);

        let stats = extract_stream(reader, &mut writer, &self.sentinel).map_err(|e| match e {
            StreamError::Read(source) => GenRstError::Read {
                path: pair.source.clone(),
                source,
            },
            StreamError::Write(source) => GenRstError::Write {
                path: pair.destination.clone(),
                source,
            },
        })?;

        writer.flush().map_err(|e| GenRstError::Write {
            path: pair.destination.clone(),
            source: e,
        })?;

        if stats.unterminated {
            tracing::warn!(
                name = %pair.name,
                source = %pair.source.display(),
                "input ended inside an extraction window"
            );
        }

        tracing::info!(
            name = %pair.name,
            lines = stats.lines_written,
            markers = stats.markers,
            "wrote {}",
            pair.destination.display()
        );

        Ok(stats)
    }
}
