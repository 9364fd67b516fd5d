//! Command implementations

pub mod apply;
pub mod completions;
pub mod config;
pub mod plan;
pub mod render;
pub mod version;

use anyhow::{Context, Result};
use auditbucket_core::config::ProviderSettings;
use auditbucket_core::{compile_bucket, BucketSpec, Change, LoadedConfig};
use auditbucket_s3::{Reconciler, S3BucketStore};
use camino::Utf8Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

use crate::cli::ProviderArgs;
use crate::output;

/// Load the config and compile the desired bucket.
///
/// Returns `None` (after telling the user) when the component is disabled.
pub(crate) fn load_spec(config: Option<&Utf8Path>) -> Result<Option<(LoadedConfig, BucketSpec)>> {
    let loaded = LoadedConfig::load(config).context("Failed to load configuration")?;
    debug!("Loaded configuration from {}", loaded.config_path);
    let spec = compile_bucket(&loaded.config)
        .with_context(|| format!("Invalid configuration in {}", loaded.config_path))?;

    match spec {
        Some(spec) => Ok(Some((loaded, spec))),
        None => {
            output::warning(&format!(
                "Bucket is disabled in {} (enabled: false); nothing to do",
                loaded.config_path
            ));
            Ok(None)
        }
    }
}

/// Build a reconciler for the configured provider, applying CLI overrides
pub(crate) async fn connect(
    settings: &ProviderSettings,
    overrides: &ProviderArgs,
) -> Reconciler<S3BucketStore> {
    let mut settings = settings.clone();
    if let Some(region) = &overrides.region {
        settings.region = region.clone();
    }
    if let Some(endpoint) = &overrides.endpoint {
        settings.endpoint = Some(endpoint.clone());
    }

    debug!(
        "Connecting to S3 in {} (endpoint: {})",
        settings.region,
        settings.endpoint.as_deref().unwrap_or("default")
    );
    let store = S3BucketStore::new(&settings.region, settings.endpoint.as_deref()).await;
    Reconciler::new(store, &settings)
}

#[derive(Tabled)]
struct ChangeRow {
    action: String,
    detail: String,
}

/// Print a change list as a table
pub(crate) fn print_changes(changes: &[Change]) {
    let rows: Vec<ChangeRow> = changes
        .iter()
        .map(|c| ChangeRow {
            action: c.action().to_string(),
            detail: c.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
}
