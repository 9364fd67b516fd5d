//! Apply command: reconcile the live bucket

use anyhow::Result;
use auditbucket_s3::ReconcileReport;
use camino::Utf8Path;
use tracing::debug;

use super::{connect, load_spec, print_changes};
use crate::cli::ApplyArgs;
use crate::output;

pub async fn run(args: ApplyArgs, config: Option<&Utf8Path>) -> Result<()> {
    let Some((loaded, spec)) = load_spec(config)? else {
        return Ok(());
    };

    let reconciler = connect(&loaded.config.provider, &args.provider).await;

    if args.dry_run {
        debug!("Dry run for {}: planning only", spec.name);
        let changes = reconciler.plan(&spec).await?;
        let report = ReconcileReport {
            bucket: spec.name.clone(),
            changes,
        };
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            output::info("Dry run: no changes applied");
            print_report(&report, false);
        }
        return Ok(());
    }

    let spinner = output::spinner(&format!("Reconciling {}...", spec.name));
    let report = reconciler.reconcile(&spec).await;
    spinner.finish_and_clear();

    let report = match report {
        Ok(report) => report,
        Err(e) => {
            output::error(&format!("Reconciliation of {} failed", spec.name));
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, true);
    }

    Ok(())
}

fn print_report(report: &ReconcileReport, applied: bool) {
    if report.is_noop() {
        output::success(&format!("{} is up to date", report.bucket));
        return;
    }

    print_changes(&report.changes);
    if applied {
        output::success(&format!(
            "{}: applied {} change(s)",
            report.bucket,
            report.changes.len()
        ));
    } else {
        output::info(&format!(
            "{}: {} change(s) would be applied",
            report.bucket,
            report.changes.len()
        ));
    }
}
