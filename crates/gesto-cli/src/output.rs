//! Output formatting for scenario reports and accept checks

use crate::error::CliResult;
use console::{style, Style, Term};
use gesto::{FileDescriptor, RejectReason, ScenarioReport, UploadStatus};
use serde::{Deserialize, Serialize};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// One file checked against an accept constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptRow {
    /// File name
    pub name: String,
    /// MIME type used for matching
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Whether the constraint admits the file
    pub accepted: bool,
}

/// Writes rendered output to stdout
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            quiet,
        }
    }

    /// Print rendered output unless quiet
    pub fn emit(&self, rendered: &str) {
        if self.quiet {
            return;
        }
        let _ = self.term.write_line(rendered.trim_end());
    }

    /// Render a scenario report
    pub fn render_report(&self, report: &ScenarioReport, format: OutputFormat) -> CliResult<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Text => Ok(self.report_text(report)),
        }
    }

    /// Render accept-check rows
    pub fn render_accept(
        &self,
        constraint: &str,
        rows: &[AcceptRow],
        format: OutputFormat,
    ) -> CliResult<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
            OutputFormat::Text => {
                let mut out = format!("{}\n", self.header(&format!("accept=\"{constraint}\"")));
                for row in rows {
                    let mark = if row.accepted {
                        self.paint("accept", &Style::new().green().bold())
                    } else {
                        self.paint("reject", &Style::new().red().bold())
                    };
                    out.push_str(&format!("  {mark} {} ({})\n", row.name, row.mime_type));
                }
                Ok(out)
            }
        }
    }

    fn report_text(&self, report: &ScenarioReport) -> String {
        let title = if report.name.is_empty() {
            "Scenario".to_string()
        } else {
            format!("Scenario: {}", report.name)
        };
        let mut out = format!("{}\n\nEvents fired:\n", self.header(&title));
        for line in report.event_log() {
            out.push_str(&format!("  {line}\n"));
        }

        let status = match report.outcome.status {
            UploadStatus::Committed => self.paint(
                &format!("committed ({} file(s))", report.files.len()),
                &Style::new().green().bold(),
            ),
            UploadStatus::Rejected(reason) => self.paint(
                &format!("rejected: {}", reason_text(reason)),
                &Style::new().yellow().bold(),
            ),
        };
        out.push_str(&format!("\nStatus: {status}\n"));

        out.push_str(&format!("Files on {}:\n", report.effective));
        if report.files.is_empty() {
            out.push_str("  (none)\n");
        }
        for file in &report.files {
            out.push_str(&format!("  {}\n", file_line(file)));
        }
        if !report.outcome.rejected.is_empty() {
            out.push_str("Not committed:\n");
            for file in &report.outcome.rejected {
                out.push_str(&format!("  {}\n", file_line(file)));
            }
        }
        out
    }

    fn header(&self, title: &str) -> String {
        if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            title.to_string()
        }
    }

    fn paint(&self, text: &str, with: &Style) -> String {
        if self.use_color {
            with.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}

fn reason_text(reason: RejectReason) -> &'static str {
    match reason {
        RejectReason::Disabled => "target is disabled",
        RejectReason::NotFileInput => "target is not a file input",
        RejectReason::NoFiles => "no files offered",
        RejectReason::NoneAccepted => "no file matched accept",
    }
}

fn file_line(file: &FileDescriptor) -> String {
    format!("{} ({}, {} bytes)", file.name(), file.mime_type(), file.size())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use gesto::Scenario;

    const SCENARIO: &str = r#"
name: direct
document:
  - tag: input
    ref: input
    attrs: { type: file, accept: "image/*" }
target: input
files:
  - name: hello.png
    content: hello
  - name: notes.txt
"#;

    fn report() -> ScenarioReport {
        Scenario::from_yaml(SCENARIO).unwrap().run().unwrap()
    }

    mod report_tests {
        use super::*;

        #[test]
        fn test_text_report_plain() {
            let reporter = Reporter::new(false, false);
            let text = reporter.render_report(&report(), OutputFormat::Text).unwrap();
            assert!(text.starts_with("Scenario: direct\n"));
            assert!(text.contains("  input[type=\"file\"] - click: Left (0)\n"));
            assert!(text.contains("Status: committed (1 file(s))"));
            assert!(text.contains("  hello.png (image/png, 5 bytes)"));
            assert!(text.contains("Not committed:\n  notes.txt (text/plain, 0 bytes)"));
        }

        #[test]
        fn test_json_report_parses() {
            let reporter = Reporter::new(false, false);
            let json = reporter.render_report(&report(), OutputFormat::Json).unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["name"], "direct");
            assert_eq!(value["events"].as_array().unwrap().len(), 19);
            assert_eq!(value["outcome"]["status"], "Committed");
        }

        #[test]
        fn test_rejection_reason_text() {
            assert_eq!(reason_text(RejectReason::Disabled), "target is disabled");
            assert_eq!(reason_text(RejectReason::NoneAccepted), "no file matched accept");
        }
    }

    mod accept_tests {
        use super::*;

        fn rows() -> Vec<AcceptRow> {
            vec![
                AcceptRow {
                    name: "a.png".into(),
                    mime_type: "image/png".into(),
                    accepted: true,
                },
                AcceptRow {
                    name: "b.txt".into(),
                    mime_type: "text/plain".into(),
                    accepted: false,
                },
            ]
        }

        #[test]
        fn test_accept_text_plain() {
            let reporter = Reporter::new(false, false);
            let text = reporter
                .render_accept("image/*", &rows(), OutputFormat::Text)
                .unwrap();
            assert_eq!(
                text,
                "accept=\"image/*\"\n  accept a.png (image/png)\n  reject b.txt (text/plain)\n"
            );
        }

        #[test]
        fn test_accept_json() {
            let reporter = Reporter::new(false, false);
            let json = reporter
                .render_accept("image/*", &rows(), OutputFormat::Json)
                .unwrap();
            let back: Vec<AcceptRow> = serde_json::from_str(&json).unwrap();
            assert_eq!(back, rows());
            assert!(json.contains("\"type\": \"image/png\""));
        }

        #[test]
        fn test_colored_output_differs() {
            let plain = Reporter::new(false, false)
                .render_accept("image/*", &rows(), OutputFormat::Text)
                .unwrap();
            let colored = Reporter::new(true, false)
                .render_accept("image/*", &rows(), OutputFormat::Text)
                .unwrap();
            assert_eq!(console::strip_ansi_codes(&colored), plain);
        }

        #[test]
        fn test_quiet_emit_is_silent() {
            let reporter = Reporter::new(false, true);
            reporter.emit("hidden");
            assert!(reporter.quiet);
        }
    }
}
