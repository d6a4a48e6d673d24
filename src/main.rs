mod cli;

use clap::Parser;
use cli::OutputFormat;
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = cli::Args::parse();

    let _ = stderrlog::new()
        .module(module_path!())
        .verbosity(args.verbose.log_level_filter())
        .init();

    let locator = match cli::build_locator(&args) {
        Ok(locator) => locator,
        Err(error) => {
            error!("Failed to initialize the geolocator: {error}");
            return ExitCode::FAILURE;
        }
    };

    let addresses = match cli::addresses(&args) {
        Ok(addresses) => addresses,
        Err(error) => {
            error!("Failed to read addresses: {error}");
            return ExitCode::FAILURE;
        }
    };

    let mut results = Vec::with_capacity(addresses.len());
    for address in &addresses {
        let result = locator.lookup(address);
        match args.output {
            OutputFormat::Line => cli::output::line(&result),
            OutputFormat::Json => cli::output::json(&result),
            OutputFormat::Table => {}
        }
        results.push(result);
    }

    if args.output == OutputFormat::Table {
        cli::output::table(&results);
    }

    cli::log::summary(&results);

    if let Some(csv_file) = &args.csv_file {
        if let Err(error) = cli::csv::save(&results, csv_file) {
            error!("Failed to save results to `{:?}`: {}", csv_file, error);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
