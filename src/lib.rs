pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod planner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, MarkerConfig, OutputConfig, PathConfig};
pub use error::{GenRstError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    extract_str, extract_stream, ExtractionProgress, ExtractionReport, Extractor, MarkerScanner,
    PairStats, ScanState,
};
pub use planner::{discover_names, plan_pairs, FilePair};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;

/// Main library interface for genrst
pub struct GenRst {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl GenRst {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    /// Create a GenRst instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;

        Ok(Self::new(
            config,
            cli_args.output_mode(),
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Resolve the configured names into file pairs
    pub fn plan(&self) -> Result<Vec<FilePair>> {
        plan_pairs(&self.config)
    }

    /// Run the extraction over every planned pair
    pub fn run(&self) -> Result<ExtractionReport> {
        let pairs = self.plan()?;
        self.output_formatter
            .info(&format!("Extracting {} file(s)", pairs.len()));

        let extractor = Extractor::from_config(&self.config);
        let pb = self.progress_manager.create_pair_progress(pairs.len() as u64);
        let progress_callback = {
            let pb = pb.clone();
            move |progress: &ExtractionProgress| {
                ui::progress::update_pair_progress(&pb, progress);
            }
        };

        let progress = match extractor.extract(&pairs, Some(&progress_callback)) {
            Ok(progress) => progress,
            Err(e) => {
                pb.abandon_with_message("failed");
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &pb,
            &format!("Extracted {} file(s)", progress.pairs_processed),
            progress.elapsed(),
        );

        let report = ExtractionReport::new(&progress, &self.config);

        if let Some(ref report_path) = self.config.output.report_path {
            report.save_json(report_path)?;
            self.output_formatter
                .info(&format!("Report written to {}", report_path.display()));
        }

        Ok(report)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &GenRstError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
