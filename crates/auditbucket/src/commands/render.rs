//! Render command: print the compiled desired state offline

use anyhow::Result;
use auditbucket_core::{BucketSpec, LifecyclePolicy};
use camino::Utf8Path;
use tabled::{settings::Style, Table, Tabled};

use super::load_spec;
use crate::cli::RenderArgs;
use crate::output;

#[derive(Tabled)]
struct TagRow {
    key: String,
    value: String,
}

pub fn run(args: RenderArgs, config: Option<&Utf8Path>) -> Result<()> {
    let Some((_, spec)) = load_spec(config)? else {
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&spec)?);
        return Ok(());
    }

    print_spec(&spec)
}

fn print_spec(spec: &BucketSpec) -> Result<()> {
    output::header("Bucket");
    output::kv("Name", &spec.name);

    output::header("Tags");
    let rows: Vec<TagRow> = spec
        .tags
        .iter()
        .map(|(key, value)| TagRow {
            key: key.clone(),
            value: value.clone(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);

    output::header("Access");
    let encryption = &spec.access.encryption;
    output::kv("Encryption", &encryption.algorithm.to_string());
    if let Some(key) = &encryption.kms_key_id {
        output::kv("KMS key", key);
    }
    let pab = &spec.access.public_access_block;
    output::kv("Block public ACLs", &pab.block_public_acls.to_string());
    output::kv("Ignore public ACLs", &pab.ignore_public_acls.to_string());
    output::kv("Block public policy", &pab.block_public_policy.to_string());
    output::kv("Restrict public buckets", &pab.restrict_public_buckets.to_string());
    output::kv("Versioning", if spec.access.versioning_enabled { "enabled" } else { "suspended" });

    output::header("Lifecycle");
    match &spec.lifecycle {
        LifecyclePolicy::Absent => output::info("Disabled; any existing configuration is removed"),
        LifecyclePolicy::Rules(set) => println!("{}", serde_json::to_string_pretty(set)?),
    }

    Ok(())
}
