pub mod file_extractor;
pub mod marker_scanner;
pub mod report;

pub use file_extractor::{ExtractionProgress, Extractor, PairOutcome};
pub use marker_scanner::{extract_str, extract_stream, LineAction, MarkerScanner, PairStats, ScanState, StreamError};
pub use report::{ConfigSnapshot, ExtractionReport, ExtractionSummary};
