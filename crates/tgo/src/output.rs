//! Output formatting for diagnostics.

use crate::cli::OutputFormat;
use crate::orchestrator::{Diagnostic, FileReport, RunResult};
use miette::{LabeledSpan, NamedSource};

/// Formatter for diagnostic output.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print one diagnostic of a file.
    pub fn print_diagnostic(&self, report: &FileReport, diagnostic: &Diagnostic) {
        match self.format {
            OutputFormat::Human => self.print_human(report, diagnostic),
            OutputFormat::Json => println!("{}", json_line(report, diagnostic)),
            OutputFormat::Machine => println!("{}", machine_line(report, diagnostic)),
        }
    }

    /// Print the summary.
    pub fn print_summary(&self, result: &RunResult) {
        match self.format {
            OutputFormat::Human => self.print_summary_human(result),
            OutputFormat::Json => println!("{}", json_summary(result)),
            OutputFormat::Machine => {
                // No summary for machine format
            }
        }
    }

    // Human format

    fn print_human(&self, report: &FileReport, diagnostic: &Diagnostic) {
        println!("{:?}", human_report(report, diagnostic));
    }

    fn print_summary_human(&self, result: &RunResult) {
        println!();
        if result.error_count == 0 {
            println!(
                "\x1b[32m✓\x1b[0m No issues found in {} files ({}ms)",
                result.file_count, result.duration_ms
            );
        } else {
            println!(
                "\x1b[31m✗\x1b[0m Found {} error{} in {} files",
                result.error_count,
                if result.error_count == 1 { "" } else { "s" },
                result.file_count
            );
            if result.hidden_count > 0 {
                println!("  ({} not shown)", result.hidden_count);
            }
            println!("Time: {}ms", result.duration_ms);
        }
        if result.written_count > 0 {
            println!(
                "Wrote {} Go file{}",
                result.written_count,
                if result.written_count == 1 { "" } else { "s" }
            );
        }
    }
}

fn human_report(report: &FileReport, diagnostic: &Diagnostic) -> miette::Report {
    let text = report.source.text();
    let start = (diagnostic.span.start as usize).min(text.len());
    let end = (diagnostic.span.end as usize).clamp(start, text.len());

    miette::miette!(
        code = diagnostic.code,
        labels = vec![LabeledSpan::at(start..end, diagnostic.code)],
        "{}",
        diagnostic.message
    )
    .with_source_code(NamedSource::new(
        report.path.display().to_string(),
        text.to_string(),
    ))
}

// JSON format

fn json_line(report: &FileReport, diagnostic: &Diagnostic) -> serde_json::Value {
    serde_json::json!({
        "type": "diagnostic",
        "file": report.path.to_string_lossy(),
        "code": diagnostic.code,
        "message": diagnostic.message,
        "line": diagnostic.line,
        "column": diagnostic.column,
        "span": {
            "start": diagnostic.span.start,
            "end": diagnostic.span.end
        }
    })
}

fn json_summary(result: &RunResult) -> serde_json::Value {
    serde_json::json!({
        "type": "summary",
        "files": result.file_count,
        "errors": result.error_count,
        "hidden": result.hidden_count,
        "written": result.written_count,
        "duration_ms": result.duration_ms
    })
}

// Machine format

fn machine_line(report: &FileReport, diagnostic: &Diagnostic) -> String {
    format!(
        "{}:{}:{}:{}:{}",
        report.path.display(),
        diagnostic.line,
        diagnostic.column,
        diagnostic.code,
        diagnostic.message.replace(':', "\\:")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use source_map::{SourceFile, Span};
    use std::path::PathBuf;

    fn report() -> (FileReport, Diagnostic) {
        let report = FileReport {
            path: PathBuf::from("views/page.tgo"),
            source: SourceFile::new("page.tgo", "package views\n\nfunc f() {\n\t<p></p>\n}\n"),
            diagnostics: Vec::new(),
            generated: None,
        };
        let diagnostic = Diagnostic {
            code: "context",
            message: "open tag is not allowed in this context".to_string(),
            line: 4,
            column: 2,
            span: Span::new(27, 30),
        };
        (report, diagnostic)
    }

    #[test]
    fn test_machine_line() {
        let (report, mut diagnostic) = report();
        assert_eq!(
            machine_line(&report, &diagnostic),
            "views/page.tgo:4:2:context:open tag is not allowed in this context"
        );

        diagnostic.message = "expected a: b".to_string();
        assert!(machine_line(&report, &diagnostic).ends_with(":expected a\\: b"));
    }

    #[test]
    fn test_json_line() {
        let (report, diagnostic) = report();
        assert_eq!(
            json_line(&report, &diagnostic),
            serde_json::json!({
                "type": "diagnostic",
                "file": "views/page.tgo",
                "code": "context",
                "message": "open tag is not allowed in this context",
                "line": 4,
                "column": 2,
                "span": {"start": 27, "end": 30}
            })
        );
    }

    #[test]
    fn test_json_summary() {
        let result = RunResult {
            file_count: 3,
            error_count: 2,
            hidden_count: 1,
            written_count: 1,
            duration_ms: 12,
        };
        let json = json_summary(&result);
        assert_eq!(json["type"], "summary");
        assert_eq!(json["errors"], 2);
        assert_eq!(json["hidden"], 1);
        assert_eq!(json["written"], 1);
    }

    #[test]
    fn test_human_report() {
        let (report, diagnostic) = report();
        let rendered = human_report(&report, &diagnostic);
        assert_eq!(rendered.to_string(), "open tag is not allowed in this context");

        let labels: Vec<_> = rendered.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!((labels[0].offset(), labels[0].len()), (27, 3));
        assert_eq!(labels[0].label(), Some("context"));
    }
}
