pub mod types;

pub use types::Annotation;

use crate::pipeline::{Outcome, PipelineError, CREATED};
use colored::Colorize;

/// Print the run's result for the CI log: at most one annotation line on
/// stdout, plus the suggestion itself on a dry run.
pub fn announce(result: &Result<Outcome, PipelineError>) {
    if let Ok(Outcome::DryRun { number, suggestion }) = result {
        print_suggestion(*number, suggestion);
    }
    if let Some(annotation) = annotation_for(result) {
        println!("{annotation}");
    }
}

/// Print a single error annotation.
pub fn error(message: &str) {
    println!("{}", Annotation::error(message));
}

/// The annotation a finished run produces. A missing label is an ordinary
/// outcome and only gets a notice.
pub fn annotation_for(result: &Result<Outcome, PipelineError>) -> Option<Annotation> {
    match result {
        Ok(Outcome::LabelAbsent { number }) => Some(Annotation::notice(format!(
            "Skipping AI review for PR {number}: trigger label not present."
        ))),
        Ok(Outcome::DryRun { .. }) => None,
        Ok(Outcome::Commented { number, status }) if *status == CREATED => Some(Annotation::notice(
            format!("Successfully posted comment to PR {number}."),
        )),
        Ok(Outcome::Commented { number, status }) => Some(Annotation::error(format!(
            "Failed to post comment to PR {number}. Status code: {status}"
        ))),
        Err(err) => Some(Annotation::error(err.to_string())),
    }
}

/// Terminal output for dry runs:
///
/// ═══ AI suggestions for PR #42 (dry run) ═══
/// <suggestion text>
fn print_suggestion(number: u64, suggestion: &str) {
    println!();
    println!(
        "{}",
        format!("═══ AI suggestions for PR #{number} (dry run) ═══")
            .cyan()
            .bold()
    );
    println!("{suggestion}");
    println!();
}
