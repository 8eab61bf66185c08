//! cwbundle CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use cwbundle::BundleError;
use cwbundle_cli::{Args, error_adapter::to_reportable};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logger(&args.log_level);
    debug!(args:?; "Parsed arguments");

    match cwbundle_cli::run(&args) {
        Ok(()) => info!("Completed successfully"),
        Err(err) => {
            error!("{}", render_error(&err));
            process::exit(1);
        }
    }
}

fn init_logger(level: &str) {
    let filter = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .init();
    info!(log_level:? = filter; "Starting cwbundle");
}

fn render_error(err: &BundleError) -> String {
    let mut report = String::new();
    miette::GraphicalReportHandler::new()
        .render_report(&mut report, &to_reportable(err))
        .expect("Writing to String buffer is infallible");
    report
}
