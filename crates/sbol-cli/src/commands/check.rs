use super::load_document;
use crate::cli::CheckArgs;
use crate::error::{CliError, Result};
use sbol::analysis::validation::{self, Severity, ValidationReport};
use tracing::info;

pub fn run(args: CheckArgs) -> Result<()> {
    let doc = load_document(&args.manifest, &args.policy)?;

    info!("Validating design...");
    let report = validation::validate(&doc);
    print!("{}", render(&report));

    outcome(&report, args.deny_warnings)
}

fn render(report: &ValidationReport) -> String {
    let mut out = String::new();
    for issue in report.issues() {
        out.push_str(&issue.to_string());
        out.push('\n');
    }
    out.push_str(&format!(
        "{} error(s), {} warning(s), {} note(s)\n",
        report.count(Severity::Error),
        report.count(Severity::Warning),
        report.count(Severity::Info)
    ));
    out
}

fn outcome(report: &ValidationReport, deny_warnings: bool) -> Result<()> {
    let errors = report.count(Severity::Error);
    let warnings = report.count(Severity::Warning);
    if errors > 0 || (deny_warnings && warnings > 0) {
        return Err(CliError::Validation { errors, warnings });
    }
    Ok(())
}
