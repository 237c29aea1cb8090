//! mounted-swagger - command-line tool for generating Swagger documentation from
//! API module manifests.
//!
//! # Usage
//!
//! ```bash
//! mounted-swagger [OPTIONS] <MANIFEST_DIR>
//! ```
//!
//! # Examples
//!
//! Print the root document:
//! ```bash
//! mounted-swagger ./api --host example.org --scheme https --scheme http
//! ```
//!
//! Print the document for one resource:
//! ```bash
//! mounted-swagger ./api --resource simple
//! ```
//!
//! Write `doc.json` plus `doc/<key>.json` for every resource:
//! ```bash
//! mounted-swagger ./api --split ./public/swagger_doc -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use mounted_swagger::cli;

fn main() -> Result<()> {
    // Parse once so the verbose flag can configure the logger before anything logs
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("mounted-swagger starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Documentation generation completed successfully");

    Ok(())
}
