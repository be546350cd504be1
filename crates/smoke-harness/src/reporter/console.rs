//! Console reporter for run reports
//!
//! Provides human-readable output with per-check status indicators.

use std::fmt::Write;

use crate::error::Result;
use crate::runner::RunReport;

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format a run report for console output
    pub fn format(report: &RunReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                      SMOKE CHECK REPORT                       ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;

        writeln!(output, "Suite:      {}", report.harness_name)?;
        writeln!(output, "Base URL:   {}", report.base_url)?;
        writeln!(output, "Started:    {}", report.started_at)?;
        writeln!(output, "Duration:   {}ms", report.duration_ms)?;
        writeln!(output, "Screenshot: {}", report.screenshot_path)?;
        writeln!(output)?;

        if !report.setup_failures.is_empty() {
            writeln!(output, "Setup failures:")?;
            for failure in &report.setup_failures {
                writeln!(output, "  ✗ {}", failure)?;
            }
            writeln!(output)?;
        }

        writeln!(output, "Checks ({} passed, {} failed):", report.passed_count(), report.failed_count())?;
        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        for outcome in &report.outcomes {
            let symbol = if outcome.passed { "✓" } else { "✗" };
            writeln!(output, "  {} {} ({}ms)", symbol, outcome.name, outcome.duration_ms)?;
            if let Some(detail) = &outcome.detail {
                writeln!(output, "      {}", detail)?;
            }
        }

        writeln!(output)?;
        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        let status = if report.passed { "PASSED" } else { "FAILED" };
        let status_symbol = if report.passed { "✓" } else { "✗" };
        writeln!(output, "Overall Status: {} {}", status_symbol, status)?;
        writeln!(output)?;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CheckOutcome;

    #[test]
    fn test_console_lists_every_outcome() {
        let report = RunReport {
            harness_name: "Suite".to_string(),
            base_url: "http://localhost:4173".to_string(),
            started_at: "2024-01-01T00:00:00Z".to_string(),
            duration_ms: 100,
            screenshot_path: "smoke.png".to_string(),
            setup_failures: vec!["setup step 1 (click '.header'): element not found".to_string()],
            outcomes: vec![
                CheckOutcome {
                    name: "Rail visible".to_string(),
                    passed: true,
                    detail: None,
                    duration_ms: 10,
                },
                CheckOutcome {
                    name: "Help visible".to_string(),
                    passed: false,
                    detail: Some("expected text 'Help' visible; observed nothing".to_string()),
                    duration_ms: 20,
                },
            ],
            passed: false,
        };

        let output = ConsoleReporter::format(&report).unwrap();
        assert!(output.contains("✓ Rail visible"));
        assert!(output.contains("✗ Help visible"));
        assert!(output.contains("expected text 'Help' visible"));
        assert!(output.contains("Setup failures:"));
        assert!(output.contains("Overall Status: ✗ FAILED"));
    }

    #[test]
    fn test_console_passed_footer() {
        let report = RunReport {
            harness_name: "Suite".to_string(),
            base_url: "http://localhost:4173".to_string(),
            started_at: "2024-01-01T00:00:00Z".to_string(),
            duration_ms: 100,
            screenshot_path: "smoke.png".to_string(),
            setup_failures: Vec::new(),
            outcomes: vec![CheckOutcome {
                name: "Rail visible".to_string(),
                passed: true,
                detail: None,
                duration_ms: 10,
            }],
            passed: true,
        };

        let output = ConsoleReporter::format(&report).unwrap();
        assert!(output.contains("Overall Status: ✓ PASSED"));
        assert!(!output.contains("Setup failures:"));
    }
}
