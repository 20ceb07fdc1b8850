use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "genrst")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract marked documentation blocks from source files into .rst fragments")]
#[command(
    long_about = "genrst scans each configured source file for sentinel lines (default `!!sphinx`) \
                  and writes the lines found between each pair of sentinels to a matching \
                  reStructuredText file."
)]
#[command(after_help = "EXAMPLES:\n  \
    genrst\n  \
    genrst weekday gap --source-dir src --dest-dir doc/_store\n  \
    genrst --discover --source-dir src --create-dirs\n  \
    genrst --config doc/genrst.toml --report extraction.json")]
pub struct Cli {
    /// Logical source names (overrides the configured list)
    pub names: Vec<String>,

    /// Directory holding the source files
    #[arg(long)]
    pub source_dir: Option<PathBuf>,

    /// Directory receiving the generated files
    #[arg(long)]
    pub dest_dir: Option<PathBuf>,

    /// Source file extension
    #[arg(long, help = "Source file extension (e.g. .cc)")]
    pub source_ext: Option<String>,

    /// Output file extension
    #[arg(long, help = "Output file extension (e.g. .rst)")]
    pub dest_ext: Option<String>,

    /// Sentinel marker recognised at the start of a line
    #[arg(short, long)]
    pub sentinel: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Use every matching file in the source directory when no names are given
    #[arg(long)]
    pub discover: bool,

    /// Create the destination directory if it is missing
    #[arg(long)]
    pub create_dirs: bool,

    /// Write a JSON extraction report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show the planned file pairs without reading or writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        // --discover without explicit names replaces the configured list.
        let names = if !self.names.is_empty() {
            Some(self.names.clone())
        } else if self.discover {
            Some(Vec::new())
        } else {
            None
        };

        CliOverrides::new()
            .with_names(names)
            .with_source_dir(self.source_dir.clone())
            .with_dest_dir(self.dest_dir.clone())
            .with_source_extension(self.source_ext.clone())
            .with_dest_extension(self.dest_ext.clone())
            .with_sentinel(self.sentinel.clone())
            .with_discover(self.discover.then_some(true))
            .with_create_missing_dirs(self.create_dirs.then_some(true))
            .with_report_path(self.report.clone())
    }

    pub fn output_mode(&self) -> OutputMode {
        match self.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["genrst"]).unwrap();
        assert!(cli.names.is_empty());
        assert!(!cli.dry_run);
        assert_eq!(cli.verbosity_level(), 0);

        let overrides = cli.create_cli_overrides();
        assert!(overrides.names.is_none());
        assert!(overrides.discover.is_none());
    }

    #[test]
    fn test_parse_names_and_paths() {
        let cli = Cli::try_parse_from([
            "genrst",
            "interp",
            "tcorr",
            "--source-dir",
            "src",
            "--dest-ext",
            "txt",
            "--create-dirs",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.names, vec!["interp", "tcorr"]);
        assert_eq!(cli.verbosity_level(), 2);

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.source_dir, Some(PathBuf::from("src")));
        assert_eq!(overrides.create_missing_dirs, Some(true));
    }

    #[test]
    fn test_discover_clears_configured_names() {
        let cli = Cli::try_parse_from(["genrst", "--discover"]).unwrap();
        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.names, Some(Vec::new()));
        assert_eq!(overrides.discover, Some(true));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["genrst", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let cli = Cli::try_parse_from([
            "genrst",
            "--config",
            "does-not-exist.toml",
        ])
        .unwrap();
        assert!(cli.load_config().is_err());
    }
}
