//! Markdown reporter for run reports

use std::fmt::Write;

use crate::error::Result;
use crate::runner::RunReport;

/// Markdown format reporter
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Format a run report as Markdown
    pub fn format(report: &RunReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "# Smoke Check Report: {}", report.harness_name)?;
        writeln!(output)?;
        writeln!(output, "- **Base URL**: {}", report.base_url)?;
        writeln!(output, "- **Started**: {}", report.started_at)?;
        writeln!(output, "- **Duration**: {}ms", report.duration_ms)?;
        writeln!(output, "- **Screenshot**: `{}`", report.screenshot_path)?;
        writeln!(
            output,
            "- **Status**: {}",
            if report.passed { "✅ PASSED" } else { "❌ FAILED" }
        )?;
        writeln!(output)?;

        if !report.setup_failures.is_empty() {
            writeln!(output, "## Setup Failures")?;
            writeln!(output)?;
            for failure in &report.setup_failures {
                writeln!(output, "- {}", failure)?;
            }
            writeln!(output)?;
        }

        writeln!(output, "## Checks")?;
        writeln!(output)?;
        writeln!(output, "| Check | Result | Duration | Detail |")?;
        writeln!(output, "|-------|--------|----------|--------|")?;
        for outcome in &report.outcomes {
            writeln!(
                output,
                "| {} | {} | {}ms | {} |",
                outcome.name,
                if outcome.passed { "✅" } else { "❌" },
                outcome.duration_ms,
                outcome.detail.as_deref().unwrap_or("(none)")
            )?;
        }

        Ok(output)
    }
}
