//! Configuration loading and management

mod file;
mod loader;
mod template;

pub use file::{AuditBucketConfig, ProviderSettings, RetryPolicy, RetryStrategy};
pub use loader::{LoadedConfig, CONFIG_ENV_VAR, CONFIG_FILE_NAMES};
pub use template::{generate_config, ConfigInitContext};
