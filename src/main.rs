//! autoloader CLI: resolve auto loader configurations into read plans.
//!
//! Each configured reader is validated, its schema resolved and its options
//! merged. The resulting read request is printed to stdout as one JSON line
//! per reader.

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};

use autoloader::{AutoLoader, CliArgs, Config, PlanningEngine, ReadPlan, init_tracing};

#[derive(Serialize)]
struct PlanLine<'a> {
    reader: &'a str,
    plan: ReadPlan,
}

fn main() -> ExitCode {
    init_tracing();

    let args = CliArgs::parse();

    let paths = args.config_paths();
    if paths.is_empty() {
        eprintln!("Error: no config files or directories specified");
        return ExitCode::FAILURE;
    }

    info!("Loading config from {} source(s)", paths.len());

    let config = match Config::from_paths(&paths) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let readers: Vec<_> = config
        .readers()
        .filter(|(key, _)| args.reader.as_deref().is_none_or(|name| key.id() == name))
        .collect();

    if readers.is_empty() {
        eprintln!(
            "Error: reader '{}' not found in config",
            args.reader.as_deref().unwrap_or_default()
        );
        return ExitCode::FAILURE;
    }

    info!("Planning {} reader(s)", readers.len());

    let mut failures = 0;
    for (key, reader_config) in readers {
        let result = AutoLoader::new(reader_config.clone())
            .and_then(|loader| loader.execute(&PlanningEngine));

        match result {
            Ok(output) => {
                let line = PlanLine {
                    reader: key.id(),
                    plan: output.into_dataset(),
                };
                match serde_json::to_string(&line) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        error!(reader = %key, "Failed to serialize read plan: {e}");
                        failures += 1;
                    }
                }
            }
            Err(e) => {
                error!(reader = %key, "{e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        eprintln!("{failures} reader(s) failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
