//! `keyprops variant` prints the app module build configuration.

use anyhow::{Context, Result};
use clap::Args;
use keyprops_core::models::AndroidBuildConfig;
use keyprops_core::variant::{VariantSettings, resolve_build_config};

use super::{or_unset, print_json};
use crate::config::ResolvedConfig;

#[derive(Args)]
pub struct VariantArgs {
    /// Application id, e.g. com.example.app
    #[arg(long, env = "KEYPROPS_APPLICATION_ID")]
    pub application_id: String,

    /// Namespace (defaults to the application id)
    #[arg(long, env = "KEYPROPS_NAMESPACE")]
    pub namespace: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Show passwords (by default they are masked)
    #[arg(long)]
    pub show_secrets: bool,
}

pub fn handle_variant(config: &ResolvedConfig, args: VariantArgs) -> Result<()> {
    let mut settings = VariantSettings::new(args.application_id);
    if let Some(namespace) = args.namespace {
        settings = settings.with_namespace(namespace);
    }

    let mut build = resolve_build_config(&config.android_dir, &settings).with_context(|| {
        format!(
            "Failed to resolve build config for {}",
            config.android_dir.display()
        )
    })?;

    if config.strict {
        build
            .signing_configs
            .release
            .config
            .require_complete()
            .context("Incomplete release signing config")?;
    }

    if !args.show_secrets {
        redact(&mut build);
    }

    if args.json {
        return print_json(&build);
    }

    print_build(&build);
    Ok(())
}

fn redact(build: &mut AndroidBuildConfig) {
    build.signing_configs.debug = build.signing_configs.debug.redacted();
    build.signing_configs.release.config = build.signing_configs.release.config.redacted();
}

fn print_build(build: &AndroidBuildConfig) {
    println!("Android Build Configuration");
    println!("===========================");
    println!("  Namespace:      {}", build.namespace);
    println!("  Application id: {}", build.application_id);
    println!(
        "  Version:        {} ({})",
        build.version.version_name, build.version.version_code
    );
    println!(
        "  SDK:            min {}, target {}, compile {}",
        build.sdk.min_sdk, build.sdk.target_sdk, build.sdk.compile_sdk
    );
    println!("  NDK:            {}", build.ndk_version);
    if let Some(sdk) = &build.flutter_sdk {
        println!("  Flutter SDK:    {}", sdk.display());
    }
    println!("  Java:           {}", build.java_version);
    println!();

    println!("Build types:");
    for build_type in &build.build_types {
        let signing = build.signing_configs.get(build_type.signing_config);
        println!(
            "  {:<8} signingConfig={} alias={} store={}",
            build_type.name,
            build_type.signing_config,
            or_unset(signing.key_alias.as_deref()),
            or_unset(signing.store_file_path.as_deref()),
        );
    }
    println!();

    println!("Release signing source: {}", build.signing_configs.release.source);
}
