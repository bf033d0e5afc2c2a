use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{
    keystore::{KeystoreCommands, handle_keystore_command},
    signing::{InitArgs, ResolveArgs, handle_clean, handle_init, handle_resolve},
    variant::{VariantArgs, handle_variant},
};

#[derive(Parser)]
#[command(name = "keyprops")]
#[command(about = "Android signing config resolution for Flutter projects", long_about = None)]
#[command(version)]
struct Cli {
    /// Android root project or Flutter project root
    #[arg(long, env = "KEYPROPS_ANDROID_DIR", global = true)]
    android_dir: Option<PathBuf>,

    /// Signing properties file (defaults to <android-dir>/key.properties)
    #[arg(long, global = true)]
    properties: Option<PathBuf>,

    /// App module directory name inside the Android root
    #[arg(long, env = "KEYPROPS_MODULE", default_value = "app", global = true)]
    module: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the release signing config
    Resolve(ResolveArgs),

    /// Show the app module build configuration
    Variant(VariantArgs),

    /// Keystore checks
    #[command(subcommand)]
    Keystore(KeystoreCommands),

    /// Write key.properties
    Init(InitArgs),

    /// Remove key.properties
    Clean,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "keyprops=debug,keyprops_core=debug"
    } else {
        "keyprops=info,keyprops_core=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    // Load .env file if present (doesn't override existing env vars)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("keyprops-core {}", keyprops_core::VERSION);

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let strict_flag = matches!(&cli.command, Commands::Resolve(args) if args.strict);
    let resolved = config::resolve_config(
        cli.android_dir.as_deref(),
        cli.properties.as_deref(),
        &cli.module,
        strict_flag,
        &cwd,
    )?;
    tracing::debug!("Using {:?}", resolved);

    match cli.command {
        Commands::Resolve(args) => handle_resolve(&resolved, args)?,
        Commands::Variant(args) => handle_variant(&resolved, args)?,
        Commands::Keystore(cmd) => handle_keystore_command(&resolved, cmd)?,
        Commands::Init(args) => handle_init(&resolved, args)?,
        Commands::Clean => handle_clean(&resolved)?,
    }

    Ok(())
}
