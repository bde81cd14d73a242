//! Prompt injector CLI
//!
//! Entry point for the `prompt-inject` command-line tool.

use clap::{Parser, Subcommand};
use prompt_injector::config::{self, EffectiveConfig, DEFAULT_CONFIG_FILE_NAME};
use prompt_injector::diag::TracingSink;
use prompt_injector::plugin::{self, LoadReport};
use serde_json::json;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "prompt-inject")]
#[command(about = "Custom prompt injection lane", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Explain how each [[prompts]] record resolves, without registering
    Explain {
        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,

        /// Path to config file (default: config.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Write a fresh default config file
    Init {
        /// Path to config file (default: config.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Synchronize the config file with the current schema
    Sync {
        /// Path to config file (default: config.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Report drift without rewriting the file
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Explain { human, config } => run_explain(human, config),
        Commands::Init { config, force } => run_init(config, force),
        Commands::Sync { config, dry_run } => run_sync(config, dry_run),
    }
}

fn config_path(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE_NAME))
}

fn run_explain(human: bool, config: Option<PathBuf>) {
    let path = config_path(config);
    let diag = TracingSink;

    let effective = match EffectiveConfig::build(Some(&path), &diag) {
        Ok(effective) => effective,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let report = plugin::load_components(&effective.config, &diag);

    if human {
        print_human_report(&effective, &report);
    } else {
        let records: Vec<_> = report
            .components
            .iter()
            .map(|c| {
                json!({
                    "index": c.source_index(),
                    "name": c.name(),
                    "decision": "ACCEPTED",
                    "rules": c.rules(),
                })
            })
            .chain(report.skipped.iter().map(|s| {
                json!({
                    "index": s.index,
                    "name": s.name,
                    "decision": "SKIPPED",
                    "reason": s.reason.to_machine_string(),
                })
            }))
            .collect();

        let output = json!({
            "config": {
                "path": effective.source.path,
                "digest": effective.source.digest,
                "changed": effective.changed,
            },
            "plugin_enabled": effective.get_bool("plugin.enabled", true),
            "malformed_section": report.malformed_section,
            "records": records,
        });

        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }

    if report.malformed_section {
        process::exit(1);
    }
}

fn print_human_report(effective: &EffectiveConfig, report: &LoadReport) {
    println!("Config: {}", effective.source.path.as_deref().unwrap_or("(defaults)"));
    println!(
        "Plugin enabled: {}",
        effective.get_bool("plugin.enabled", true)
    );
    println!();

    if report.malformed_section {
        println!("'prompts' is not a sequence; section ignored");
        return;
    }

    let mut lines: Vec<(usize, String)> = report
        .components
        .iter()
        .map(|c| {
            (
                c.source_index(),
                format!("#{} {} ACCEPTED ({} rules)", c.source_index(), c.name(), c.rules().len()),
            )
        })
        .chain(report.skipped.iter().map(|s| {
            (
                s.index,
                format!("#{} {} SKIPPED ({})", s.index, s.name, s.reason.to_machine_string()),
            )
        }))
        .collect();
    lines.sort_by_key(|(index, _)| *index);

    for (_, line) in &lines {
        println!("{line}");
    }

    println!();
    println!(
        "{} component(s) would be registered",
        report.components.len()
    );
}

fn run_init(config: Option<PathBuf>, force: bool) {
    let path = config_path(config);

    if force && path.exists() {
        if let Err(e) = std::fs::remove_file(&path) {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }

    match config::write_default_config(&path) {
        Ok(()) => println!("Wrote default config to {}", path.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn run_sync(config: Option<PathBuf>, dry_run: bool) {
    let path = config_path(config);
    let diag = TracingSink;

    if !path.exists() {
        eprintln!("Error: config file not found: {}", path.display());
        process::exit(1);
    }

    let effective = match EffectiveConfig::build(Some(&path), &diag) {
        Ok(effective) => effective,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if !effective.changed {
        println!("Config is up to date");
        return;
    }

    if dry_run {
        println!("Config drifted from the schema; rerun without --dry-run to rewrite");
        return;
    }

    match config::save_config(&path, &effective.config, &diag) {
        Ok(()) => println!("Rewrote {}", path.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
