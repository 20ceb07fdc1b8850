//! Line-level marker scanning.
//!
//! A sentinel line toggles between skipping and extracting. Marker lines are
//! never emitted, and everything else is emitted only while extracting.

use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Skipping,
    Extracting,
}

impl ScanState {
    pub fn toggle(self) -> Self {
        match self {
            ScanState::Skipping => ScanState::Extracting,
            ScanState::Extracting => ScanState::Skipping,
        }
    }

    pub fn is_extracting(self) -> bool {
        self == ScanState::Extracting
    }
}

/// What to do with a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    Toggle,
    Emit,
    Skip,
}

pub struct MarkerScanner<'a> {
    sentinel: &'a [u8],
    state: ScanState,
}

impl<'a> MarkerScanner<'a> {
    pub fn new(sentinel: &'a str) -> Self {
        Self {
            sentinel: sentinel.as_bytes(),
            state: ScanState::Skipping,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn is_marker(&self, line: &[u8]) -> bool {
        line.starts_with(self.sentinel)
    }

    /// Classifies `line` and advances the state machine.
    pub fn classify(&mut self, line: &[u8]) -> LineAction {
        if self.is_marker(line) {
            self.state = self.state.toggle();
            LineAction::Toggle
        } else if self.state.is_extracting() {
            LineAction::Emit
        } else {
            LineAction::Skip
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairStats {
    pub lines_read: usize,
    pub lines_written: usize,
    pub bytes_written: u64,
    pub markers: usize,
    /// The input ended inside an extraction window.
    pub unterminated: bool,
}

/// Which side of a stream copy failed.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

/// Copies every line between sentinel pairs from `reader` to `writer`.
///
/// Lines keep their original terminators and are treated as raw bytes, so
/// CRLF endings and non-UTF-8 content pass through untouched.
pub fn extract_stream<R, W>(
    mut reader: R,
    writer: &mut W,
    sentinel: &str,
) -> Result<PairStats, StreamError>
where
    R: BufRead,
    W: Write + ?Sized,
{
    let mut scanner = MarkerScanner::new(sentinel);
    let mut stats = PairStats::default();
    let mut line = Vec::with_capacity(256);

    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(StreamError::Read)?;
        if read == 0 {
            break;
        }
        stats.lines_read += 1;

        match scanner.classify(&line) {
            LineAction::Toggle => stats.markers += 1,
            LineAction::Emit => {
                writer.write_all(&line).map_err(StreamError::Write)?;
                stats.lines_written += 1;
                stats.bytes_written += line.len() as u64;
            }
            LineAction::Skip => {}
        }
    }

    stats.unterminated = scanner.state().is_extracting();
    Ok(stats)
}

/// In-memory variant of [`extract_stream`] for text input.
pub fn extract_str(input: &str, sentinel: &str) -> String {
    let mut out = Vec::with_capacity(input.len());
    // Reading from a slice into a Vec cannot fail.
    let _ = extract_stream(input.as_bytes(), &mut out, sentinel);
    String::from_utf8_lossy(&out).into_owned()
}
