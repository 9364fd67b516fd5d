//! Starter config generation for `config init`

use crate::error::{Error, Result};
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

const TEMPLATE_NAME: &str = "auditbucket.yaml";

/// Values substituted into the starter config
#[derive(Debug, Clone, Serialize)]
pub struct ConfigInitContext {
    pub namespace: String,
    pub name: String,
    pub stage: String,
    pub region: String,
}

impl ConfigInitContext {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            stage: "prod".to_string(),
            region: "us-east-1".to_string(),
        }
    }
}

/// Render a starter auditbucket.yaml
pub fn generate_config(context: &ConfigInitContext) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, include_str!("auditbucket.yaml.tera"))
        .map_err(|e| Error::Template(e.to_string()))?;

    debug!("Rendering {} for {}", TEMPLATE_NAME, context.name);

    let tera_context =
        Context::from_serialize(context).map_err(|e| Error::Template(e.to_string()))?;
    tera.render(TEMPLATE_NAME, &tera_context)
        .map_err(|e| Error::Template(e.to_string()))
}
