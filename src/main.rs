//! Augmenta CLI
//!
//! Commands: run, list, info, check

use anyhow::{bail, Context, Result};
use augmenta::prelude::*;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "augmenta", version)]
#[command(about = "Augmenta - configuration-driven image augmentation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output (parameter fallbacks, per-step details)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Augment every image in a directory
    Run {
        /// Directory of source images
        #[arg(short, long)]
        input: PathBuf,

        /// Augmentation document (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Run settings (TOML)
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Seed for random transforms
        #[arg(long)]
        seed: Option<u64>,

        /// JPEG quality for outputs (1-100)
        #[arg(long)]
        quality: Option<u8>,

        /// Suffix for the output directory
        #[arg(long)]
        suffix: Option<String>,

        /// Stop at the first image that fails
        #[arg(long)]
        stop_on_error: bool,

        /// Write the run report as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List available transforms
    List,

    /// Show the parameters of a transform
    Info {
        /// Transform name
        name: String,
    },

    /// Compile a document and show what each operation would apply
    Check {
        /// Augmentation document (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Run {
            input,
            config,
            settings,
            seed,
            quality,
            suffix,
            stop_on_error,
            report,
        } => {
            let overrides = Overrides {
                seed,
                quality,
                suffix,
                stop_on_error,
            };
            run(&input, &config, settings.as_deref(), overrides, report.as_deref())
        }
        Commands::List => {
            list_transforms();
            Ok(true)
        }
        Commands::Info { name } => transform_info(&name).map(|_| true),
        Commands::Check { config } => check(&config).map(|_| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Command-line values that take precedence over the settings file.
struct Overrides {
    seed: Option<u64>,
    quality: Option<u8>,
    suffix: Option<String>,
    stop_on_error: bool,
}

impl Overrides {
    fn apply(self, settings: &mut Settings) {
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(quality) = self.quality {
            settings.jpeg_quality = quality;
        }
        if let Some(suffix) = self.suffix {
            settings.output_suffix = suffix;
        }
        if self.stop_on_error {
            settings.stop_on_error = true;
        }
    }
}

/// Returns `Ok(false)` when some images failed.
fn run(
    input: &Path,
    config: &Path,
    settings_path: Option<&Path>,
    overrides: Overrides,
    report_path: Option<&Path>,
) -> Result<bool> {
    let mut settings = Settings::load_or_default(settings_path).context("Failed to load settings")?;
    overrides.apply(&mut settings);
    settings.validate().context("Invalid settings")?;

    if !input.is_dir() {
        bail!("Input {} is not a directory", input.display());
    }

    let registry = TransformRegistry::with_builtins();
    let plan = Plan::load(config, &registry)
        .with_context(|| format!("Failed to load augmentation document {}", config.display()))?;

    let store = FsImageStore::new(&settings.extensions, settings.jpeg_quality);
    let augmenter = Augmenter::new(store, Dispatcher::new(registry), RunOptions::from(&settings));
    let report = augmenter.run(input, &plan)?;

    println!(
        "Wrote {} image(s) to {} ({} of {} source image(s) processed)",
        report.outputs.len(),
        report.output_dir.display(),
        report.images_processed,
        report.images_seen
    );
    for failure in &report.failures {
        println!("  failed: {} ({})", failure.path.display(), failure.error);
    }

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
    }

    Ok(report.is_success())
}

fn list_transforms() {
    let registry = TransformRegistry::with_builtins();

    println!("Available transforms ({} total):", registry.len());
    println!();

    for (category, names) in registry.grouped_by_category() {
        println!("  {:?}", category);
        for name in names {
            if let Some(metadata) = registry.get_metadata(name) {
                println!("      {:<18} {}", metadata.id, metadata.description);
            }
        }
        println!();
    }
}

fn transform_info(name: &str) -> Result<()> {
    let registry = TransformRegistry::with_builtins();
    let Some(metadata) = registry.get_metadata(name) else {
        bail!("Unknown transform '{}'. Use 'list' to see available transforms.", name);
    };

    println!("Transform: {}", metadata.id);
    println!("Category: {:?}", metadata.category);
    println!();
    println!("Description:");
    println!("  {}", metadata.description);
    println!();
    println!("Parameters:");
    for param in &metadata.parameters {
        let default = param
            .default_value
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unset".to_string());
        println!(
            "  {} [{}] default {}, valid {}",
            param.name,
            param.param_type,
            default,
            param.constraint_summary()
        );
        if !param.description.is_empty() {
            println!("    {}", param.description);
        }
    }
    Ok(())
}

fn check(config: &Path) -> Result<()> {
    let registry = TransformRegistry::with_builtins();
    let document = AugmentationDocument::load(config)
        .with_context(|| format!("Failed to load augmentation document {}", config.display()))?;
    let plan = document.compile(&registry);

    println!("{} operation(s), {} output(s) per image", plan.operations.len(), plan.outputs_per_image());
    for operation in &plan.operations {
        let mode = if operation.is_chain() { "chain" } else { "single" };
        if operation.is_empty() {
            println!("  {}: no recognized transform, produces no output", operation.key);
        } else {
            println!("  {} ({}): {}", operation.key, mode, operation.names().join(" -> "));
        }
        for step in &operation.steps {
            let marker = if step.is_random() { " (random)" } else { "" };
            println!("      {:?}{}", step, marker);
        }
        for skipped in &operation.skipped {
            println!("      skipped unknown transform '{}'", skipped);
        }
    }
    Ok(())
}
