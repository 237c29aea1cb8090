use crate::config::{ConfigOverrides, DocConfig};
use crate::document_builder::generate;
use crate::manifest::ManifestLoader;
use crate::partition::{partition, resource_keys};
use crate::serializer::{serialize_json, serialize_yaml, write_split, write_to_file};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Build Swagger documentation from a tree of mounted API module manifests
#[derive(Parser, Debug)]
#[command(name = "mounted-swagger")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Directory containing module manifests (.yaml, .yml, .json)
    #[arg(value_name = "MANIFEST_DIR")]
    pub manifest_dir: PathBuf,

    /// Root module name (if not specified, the one module nobody mounts)
    #[arg(short = 'r', long = "root", value_name = "MODULE")]
    pub root: Option<String>,

    /// Only output the document for this resource key
    #[arg(long = "resource", value_name = "KEY", conflicts_with = "split")]
    pub resource: Option<String>,

    /// Write doc.json and doc/<key>.json for every resource into this directory
    #[arg(long = "split", value_name = "DIR")]
    pub split: Option<PathBuf>,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Document settings file (YAML or JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// API title
    #[arg(long = "title")]
    pub title: Option<String>,

    /// API version
    #[arg(long = "api-version")]
    pub api_version: Option<String>,

    /// Host the API is served from
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Supported scheme; repeat for several
    #[arg(long = "scheme")]
    pub schemes: Vec<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.manifest_dir.is_dir() {
        anyhow::bail!(
            "Manifest directory does not exist or is not a directory: {}",
            args.manifest_dir.display()
        );
    }

    info!("Manifest directory: {}", args.manifest_dir.display());
    info!("Output format: {:?}", args.output_format);
    match (&args.split, &args.output_path) {
        (Some(dir), _) => info!("Split output into: {}", dir.display()),
        (None, Some(output)) => info!("Output file: {}", output.display()),
        (None, None) => info!("Output: stdout"),
    }

    Ok(args)
}

/// Assemble the document settings from the optional file and the flags
pub fn load_config(args: &CliArgs) -> Result<DocConfig> {
    let config = match &args.config {
        Some(path) => DocConfig::load(path)?,
        None => DocConfig::default(),
    };
    Ok(config.apply_overrides(ConfigOverrides {
        title: args.title.clone(),
        version: args.api_version.clone(),
        host: args.host.clone(),
        schemes: args.schemes.clone(),
    }))
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting documentation generation...");

    let config = load_config(&args)?;

    // Step 1: Load manifests and assemble the module tree
    let api = ManifestLoader::load_dir(&args.manifest_dir, args.root.as_deref())?;
    info!("Assembled {} modules", api.tree.len());

    // Step 2: Walk, normalize and build
    let document = generate(&api.tree, api.root, &api.registry, &config)?;
    let keys = resource_keys(&document);

    // Step 3: Output
    if let Some(dir) = &args.split {
        write_split(&document, dir)?;
    } else {
        let document = match &args.resource {
            Some(key) => {
                let part = partition(&document, key);
                if part.paths.is_empty() {
                    warn!("No routes for resource '{}'", key);
                }
                part
            }
            None => document,
        };

        let content = match args.output_format {
            OutputFormat::Json => serialize_json(&document)?,
            OutputFormat::Yaml => serialize_yaml(&document)?,
        };

        if let Some(output_path) = &args.output_path {
            write_to_file(&content, output_path)?;
            info!("Successfully wrote document to {}", output_path.display());
        } else {
            println!("{}", content);
        }
    }

    info!("Generation complete!");
    info!("  - Modules: {}", api.tree.len());
    info!("  - Resources: {:?}", keys);

    Ok(())
}
