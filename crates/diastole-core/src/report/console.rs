use crate::engine::RunSummary;
use crate::model::{Mode, Prompt};

/// Format the per-prompt progress line. Deterministic, unit-testable.
#[must_use]
pub fn format_progress_line(done: usize, total: usize, prompt: &Prompt) -> String {
    format!(
        "[{}/{}] Processing {} ({})...",
        done, total, prompt.id, prompt.category
    )
}

#[must_use]
pub fn format_call_line(mode: Mode, latency_s: f64, failed: bool) -> String {
    if failed {
        format!("  -> {}: failed after {:.1}s", mode.label(), latency_s)
    } else {
        format!("  -> {}: done ({:.1}s)", mode.label(), latency_s)
    }
}

/// Progress goes to stderr so stdout stays clean for callers piping the output.
pub fn emit_progress_line(line: &str) {
    eprintln!("{}", line);
}

#[must_use]
pub fn format_run_footer(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Done: {} prompts, {} calls, {} failed",
        summary.prompts, summary.calls, summary.failures
    )];
    lines.push(format!("  records:    {}", summary.outputs_dir.display()));
    lines.push(format!("  log:        {}", summary.log_path.display()));
    lines.push(format!("  comparison: {}", summary.comparison_path.display()));
    lines.push(format!("  key:        {}", summary.key_path.display()));
    lines
}

/// Print the end-of-run summary with output paths to stderr.
pub fn print_run_footer(summary: &RunSummary) {
    for line in format_run_footer(summary) {
        eprintln!("{}", line);
    }
}
