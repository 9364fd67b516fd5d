//! Config command

use anyhow::{anyhow, Context, Result};
use auditbucket_core::config::{generate_config, ConfigInitContext};
use auditbucket_core::{compile_bucket, LoadedConfig, SchemaValidator};
use camino::Utf8Path;
use tracing::debug;

use crate::cli::{ConfigCommands, ConfigInitArgs, ConfigShowArgs, ConfigValidateArgs};
use crate::output;

pub fn run(cmd: ConfigCommands, config: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Init(args) => init(args),
        ConfigCommands::Validate(args) => validate(args, config),
        ConfigCommands::Show(args) => show(args, config),
    }
}

fn init(args: ConfigInitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        return Err(anyhow!(
            "File {} already exists. Use --force to overwrite.",
            args.output
        ));
    }

    let name = args.name.unwrap_or_else(|| "audit-logs".to_string());

    let context = ConfigInitContext {
        namespace: args.namespace,
        name,
        stage: args.stage,
        region: args.region,
    };
    debug!("Rendering starter config to {}", args.output);
    let content = generate_config(&context).context("Failed to generate config")?;

    std::fs::write(&args.output, content)
        .with_context(|| format!("Failed to write {}", args.output))?;

    output::success(&format!("Created {}", args.output));
    output::kv("Namespace", &context.namespace);
    output::kv("Name", &context.name);
    output::kv("Region", &context.region);

    Ok(())
}

fn validate(args: ConfigValidateArgs, config: Option<&Utf8Path>) -> Result<()> {
    let spinner = output::spinner("Validating configuration...");

    let validator = SchemaValidator::new()?;
    let path = args.file.as_deref().or(config);
    let loaded = LoadedConfig::load_and_validate(path, &validator);
    spinner.finish_and_clear();
    let loaded = loaded?;
    debug!("Schema validation passed for {}", loaded.config_path);

    let compiled = compile_bucket(&loaded.config)
        .with_context(|| format!("Invalid configuration in {}", loaded.config_path))?;

    output::success(&format!("Configuration is valid: {}", loaded.config_path));
    match compiled {
        Some(spec) => {
            output::kv("Bucket", &spec.name);
            output::kv(
                "Lifecycle",
                if spec.lifecycle.is_absent() {
                    "disabled"
                } else {
                    "enabled"
                },
            );
            if !spec.access.is_locked_down() {
                output::warning("Access policy is less strict than the default posture");
            }
        }
        None => output::info("Bucket is disabled (enabled: false)"),
    }

    Ok(())
}

fn show(args: ConfigShowArgs, config: Option<&Utf8Path>) -> Result<()> {
    let loaded = LoadedConfig::load(config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&loaded.config)?);
    } else {
        println!("{}", loaded.to_yaml()?);
    }

    Ok(())
}
