use clap::Parser;
use genrst::{Cli, GenRst, GenRstError, OutputFormatter, UserFriendlyError};
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbosity_level());

    let exit_code = run(&cli);
    process::exit(exit_code);
}

fn run(cli: &Cli) -> i32 {
    if cli.generate_config {
        return handle_generate_config(cli);
    }

    let genrst = match GenRst::from_cli(cli) {
        Ok(genrst) => genrst,
        Err(e) => {
            print_startup_error(cli, &e);
            return e.exit_code();
        }
    };

    if cli.dry_run {
        return handle_dry_run(&genrst);
    }

    match genrst.run() {
        Ok(report) => {
            genrst.output_formatter().print_extraction_report(&report);
            0
        }
        Err(e) => {
            tracing::debug!(error = %e, "extraction stopped");
            genrst.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "genrst.toml".to_string());

    match GenRst::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  genrst --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(genrst: &GenRst) -> i32 {
    let formatter = genrst.output_formatter();

    let pairs = match genrst.plan() {
        Ok(pairs) => pairs,
        Err(e) => {
            formatter.print_user_friendly_error(&e);
            return e.exit_code();
        }
    };

    formatter.info("DRY RUN MODE - No files will be read or written");
    formatter.print_plan(&pairs);
    formatter.info(&format!(
        "Sentinel: {}",
        genrst.config().markers.sentinel
    ));
    0
}

fn print_startup_error(cli: &Cli, error: &GenRstError) {
    let formatter = OutputFormatter::new(cli.output_mode(), 0, false);
    formatter.print_user_friendly_error(error);
}

/// Logs go to stderr. `-v`/`-vv` override `RUST_LOG` for this crate.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("genrst=warn")),
        1 => EnvFilter::new("genrst=debug"),
        _ => EnvFilter::new("genrst=trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
