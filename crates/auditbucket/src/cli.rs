//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// auditbucket - provision and reconcile locked-down audit-log buckets
#[derive(Parser, Debug)]
#[command(name = "auditbucket")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to auditbucket.yaml config file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Print the compiled desired state without contacting the provider
    Render(RenderArgs),

    /// Show drift between the desired state and the live bucket
    Plan(PlanArgs),

    /// Reconcile the live bucket onto the desired state
    Apply(ApplyArgs),
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new auditbucket.yaml
    Init(ConfigInitArgs),

    /// Validate the configuration against the schema and compile it
    Validate(ConfigValidateArgs),

    /// Show the parsed configuration with defaults filled in
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Bucket name label
    #[arg(short, long)]
    pub name: Option<String>,

    /// Namespace label (organization or product prefix)
    #[arg(long, default_value = "eg")]
    pub namespace: String,

    /// Stage label
    #[arg(long, default_value = "prod")]
    pub stage: String,

    /// Provider region
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Output file path
    #[arg(short, long, default_value = "auditbucket.yaml")]
    pub output: Utf8PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ConfigValidateArgs {
    /// Path to config file (default: --config, AUDITBUCKET_CONFIG, or search)
    #[arg(short, long)]
    pub file: Option<Utf8PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Provider connection overrides shared by plan and apply
#[derive(Args, Debug)]
pub struct ProviderArgs {
    /// Region. Takes precedence over provider.region in the config file;
    /// the ambient AWS_REGION is not consulted
    #[arg(long)]
    pub region: Option<String>,

    /// S3-compatible endpoint URL (overrides provider.endpoint)
    #[arg(long, env = "AUDITBUCKET_ENDPOINT")]
    pub endpoint: Option<String>,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub provider: ProviderArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub provider: ProviderArgs,

    /// Show the changes without applying them
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
