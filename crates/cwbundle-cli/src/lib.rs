//! CLI logic for the cwbundle tool.
//!
//! This module contains the core CLI logic: loading configuration, applying
//! command-line overrides and dispatching the selected subcommand.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use log::info;

use cwbundle::{Bundle, BundleError, config::AppConfig};

/// Run the cwbundle CLI application
///
/// # Errors
///
/// Returns `BundleError` for:
/// - Configuration loading errors
/// - File and archive I/O errors
/// - Archive conflicts under the `fail` policy
/// - Validation failures in `verify`
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), BundleError> {
    let mut app_config = config::load_config(args.config.as_ref())?;
    apply_overrides(&mut app_config, args);

    let bundle = Bundle::new(app_config);

    match &args.command {
        Command::Write { .. } => {
            let stages = args.command.selected_stages();
            let report = bundle.write_stages(&stages)?;
            info!(
                written = report.written().len(),
                added = report.added().len(),
                replaced = report.replaced().len(),
                kept = report.kept().len();
                "Bundle written"
            );
        }
        Command::Diagram { register, .. } => {
            if let Some(outcome) = bundle.render_diagram(*register)? {
                info!(
                    added = outcome.added().len(),
                    replaced = outcome.replaced().len(),
                    kept = outcome.kept().len();
                    "Diagram registered"
                );
            }
        }
        Command::List => {
            for name in bundle.list()? {
                println!("{name}");
            }
        }
        Command::Verify => {
            let verified = bundle.verify()?;
            println!("{verified} entries verified");
        }
    }

    Ok(())
}

/// Command-line paths and policy take precedence over the configuration file.
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(dir) = &args.bundle_dir {
        config.bundle_mut().set_directory(dir);
    }
    if let Some(archive) = &args.archive {
        config.bundle_mut().set_archive(archive);
    }
    if let Some(policy) = args.on_conflict {
        config.bundle_mut().set_on_conflict(policy);
    }
    if let Command::Diagram {
        output: Some(output),
        ..
    } = &args.command
    {
        config.diagram_mut().set_output(output);
    }
}
