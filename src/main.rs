//! buildvar CLI
//!
//! Entry point for the `buildvar` command-line tool.

use buildvar::config::{EffectiveConfig, PROJECT_CONFIG_FILE};
use buildvar::signing::needs_placeholder_warning;
use buildvar::telemetry::init_tracing;
use buildvar::{
    load, load_effective, variant_key, BuildVariant, LoadOptions, Loaded, VariantError,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::Level;

#[derive(Parser)]
#[command(name = "buildvar")]
#[command(about = "Resolve build variants into validated toolchain, signing and shrinking settings", version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// Path to project config file (default: ./buildvar.toml when present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Path to host config file (default: ~/.config/buildvar/config.toml)
    #[arg(long)]
    host_config: Option<PathBuf>,

    /// Override a config value, e.g. --set toolchain.min_platform=24
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    overrides: Vec<(String, String)>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one variant
    Resolve {
        /// Variant name (e.g. debug, release)
        name: String,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Resolve every variant, reporting and excluding failures
    List {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Fail if any variant does not validate
    Verify {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the effective configuration with provenance
    Config {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    init_tracing(cli.log_json, level);

    match cli.command {
        Commands::Resolve { name, config, json } => run_resolve(&name, &config, json),
        Commands::List { config, json } => run_list(&config, json),
        Commands::Verify { config } => run_verify(&config),
        Commands::Config { config } => run_config(&config),
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

fn load_options(args: &ConfigArgs) -> LoadOptions {
    let project_config = args.config.clone().or_else(|| {
        let default = PathBuf::from(PROJECT_CONFIG_FILE);
        default.exists().then_some(default)
    });

    LoadOptions {
        host_config: args
            .host_config
            .clone()
            .or_else(EffectiveConfig::default_host_path),
        project_config,
        overrides: args.overrides.clone(),
    }
}

fn load_or_exit(args: &ConfigArgs) -> Loaded {
    match load(&load_options(args)) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

fn report_failure(err: &VariantError) {
    tracing::warn!(code = %err.to_report().to_code(), "variant failed");
    match err.field() {
        Some(field) => eprintln!("Variant '{}' failed: {} ({})", err.variant(), err.kind(), field),
        None => eprintln!("Variant '{}' failed: {}", err.variant(), err.kind()),
    }
    eprintln!("  {}", err);
}

fn warn_placeholder(variant: &BuildVariant) {
    if needs_placeholder_warning(variant) {
        tracing::warn!(
            variant = %variant.name,
            alias = %variant.signing.alias,
            "release-grade variant is signed with the development key"
        );
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn key_or_exit(variant: &BuildVariant) -> String {
    match variant_key(variant) {
        Ok(key) => key,
        Err(e) => {
            eprintln!("Error computing variant key: {}", e);
            process::exit(1);
        }
    }
}

fn print_variant(variant: &BuildVariant, key: &str) {
    let toolchain = &variant.toolchain;
    let signing = &variant.signing;
    let optimization = &variant.optimization;

    println!("Variant: {}", variant.name);
    println!("  Key: {}", key);
    println!("  Toolchain:");
    println!(
        "    Language level: {} (target {}, jvm {})",
        toolchain.compile_level,
        toolchain.target_level,
        toolchain.effective_jvm_target()
    );
    println!("    NDK: {}", toolchain.ndk_version);
    println!(
        "    Platform: min {}, target {}, compile {}",
        toolchain.min_platform, toolchain.target_platform, toolchain.compile_platform
    );
    println!("  Signing:");
    if signing.is_complete() {
        println!("    Alias: {}", signing.alias);
        println!("    Credential: {}", signing.credential_ref);
        println!("    Keystore: {}", signing.keystore_location.display());
    } else {
        println!("    (incomplete)");
    }
    println!("  Optimization:");
    println!("    Shrink code: {}", optimization.shrink_code);
    println!("    Shrink resources: {}", optimization.shrink_resources);
    if !optimization.rule_files.is_empty() {
        let files: Vec<String> = optimization
            .rule_files
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        println!("    Rule files: {}", files.join(", "));
    }
}

fn run_resolve(name: &str, args: &ConfigArgs, json_output: bool) {
    let Loaded { resolver, .. } = load_or_exit(args);

    let variant = match resolver.resolve(name) {
        Ok(variant) => variant,
        Err(e) => {
            if json_output {
                print_json(&e.to_report());
            }
            report_failure(&e);
            if e.kind().is_validation() {
                process::exit(1);
            }
            let names: Vec<&str> = resolver.names().collect();
            eprintln!("Available variants: {}", names.join(", "));
            process::exit(1);
        }
    };

    warn_placeholder(&variant);
    let key = key_or_exit(&variant);

    if json_output {
        print_json(&serde_json::json!({
            "variant": variant,
            "variant_key": key,
        }));
    } else {
        print_variant(&variant, &key);
    }
}

fn run_list(args: &ConfigArgs, json_output: bool) {
    let Loaded { resolver, .. } = load_or_exit(args);

    let mut reports = Vec::new();
    let mut excluded = 0usize;

    for outcome in resolver.resolve_all() {
        match &outcome.result {
            Ok(variant) => warn_placeholder(variant),
            Err(e) => {
                excluded += 1;
                if !json_output {
                    report_failure(e);
                }
            }
        }
        reports.push(outcome);
    }

    if json_output {
        let output: Vec<_> = reports.iter().map(|o| o.to_report()).collect();
        print_json(&output);
        return;
    }

    if reports.is_empty() {
        println!("No variants configured.");
        return;
    }

    println!(
        "Buildable variants ({} of {}):\n",
        reports.len() - excluded,
        reports.len()
    );
    for outcome in &reports {
        if let Ok(variant) = &outcome.result {
            let release = if variant.is_release_grade() { " [release-grade]" } else { "" };
            println!("  {}{}", variant.name, release);
        }
    }
}

fn run_verify(args: &ConfigArgs) {
    let Loaded { resolver, .. } = load_or_exit(args);

    let mut failed = 0usize;
    for outcome in resolver.resolve_all() {
        match outcome.result {
            Ok(variant) => {
                warn_placeholder(&variant);
                println!("  ok   {}", outcome.name);
            }
            Err(e) => {
                failed += 1;
                println!("  FAIL {}", outcome.name);
                report_failure(&e);
            }
        }
    }

    if failed > 0 {
        eprintln!("{} of {} variants failed validation", failed, resolver.len());
        process::exit(1);
    }
    println!("All {} variants valid", resolver.len());
}

fn run_config(args: &ConfigArgs) {
    let effective = match load_effective(&load_options(args)) {
        Ok(effective) => effective,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };
    match effective.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
