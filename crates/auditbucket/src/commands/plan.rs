//! Plan command: show drift against the live bucket

use anyhow::Result;
use camino::Utf8Path;

use super::{connect, load_spec, print_changes};
use crate::cli::PlanArgs;
use crate::output;

pub async fn run(args: PlanArgs, config: Option<&Utf8Path>) -> Result<()> {
    let Some((loaded, spec)) = load_spec(config)? else {
        return Ok(());
    };

    let reconciler = connect(&loaded.config.provider, &args.provider).await;

    let spinner = output::spinner(&format!("Inspecting {}...", spec.name));
    let changes = reconciler.plan(&spec).await;
    spinner.finish_and_clear();
    let changes = changes?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
    } else if changes.is_empty() {
        output::success(&format!("{} is up to date", spec.name));
    } else {
        output::info(&format!("{} change(s) needed for {}", changes.len(), spec.name));
        print_changes(&changes);
    }

    Ok(())
}
