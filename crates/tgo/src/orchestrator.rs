//! Orchestrator for checking and building tgo files.

use crate::cli::{Args, Command};
use crate::config::{Config, CONFIG_FILE_NAME};
use crate::output::OutputFormatter;
use miette::{IntoDiagnostic, Result, WrapErr};
use rayon::prelude::*;
use source_map::{SourceFile, Span};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tgo_analyzer::AnalyzeError;
use tgo_parser::ParseError;
use tgo_transpiler::TranspileError;

/// A problem found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: &'static str,
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub span: Span,
}

impl Diagnostic {
    fn from_parse(err: &ParseError, source: &SourceFile) -> Self {
        let start = source.position(err.span.start);
        Self {
            code: err.code.as_str(),
            message: err.message.clone(),
            line: start.line,
            column: start.column,
            span: err.span,
        }
    }

    fn from_analyze(err: &AnalyzeError) -> Self {
        Self {
            code: err.kind.as_str(),
            message: err.message.clone(),
            line: err.start.line,
            column: err.start.column,
            span: err.span,
        }
    }

    fn from_transpile(err: &TranspileError) -> Self {
        let position = err.position();
        let message = err.to_string();
        let message = match message.split_once(": ") {
            Some((_, rest)) => rest.to_string(),
            None => message,
        };
        Self {
            code: err.code(),
            message,
            line: position.line,
            column: position.column,
            span: Span::new(position.offset, position.offset + 1),
        }
    }
}

/// Outcome of processing one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub source: SourceFile,
    pub diagnostics: Vec<Diagnostic>,
    /// Generated Go, when requested and the file is clean.
    pub generated: Option<String>,
}

/// Parse, analyze and optionally transpile a single file.
pub fn process_file(path: &Path, config: &Config, generate: bool) -> Result<FileReport> {
    let text = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    let source = SourceFile::new(config.directive_name(path), text);

    let mut report = FileReport {
        path: path.to_path_buf(),
        diagnostics: Vec::new(),
        generated: None,
        source,
    };

    let file = match tgo_parser::parse(report.source.text()) {
        Ok(file) => file,
        Err(err) => {
            let diagnostic = Diagnostic::from_parse(&err, &report.source);
            report.diagnostics.push(diagnostic);
            return Ok(report);
        }
    };

    if let Err(errors) = tgo_analyzer::analyze(&file, &report.source) {
        report
            .diagnostics
            .extend(errors.iter().map(Diagnostic::from_analyze));
        return Ok(report);
    }

    if generate {
        match tgo_transpiler::transpile(&file, &report.source, &config.transpile) {
            Ok(result) => report.generated = Some(result.code),
            Err(err) => report.diagnostics.push(Diagnostic::from_transpile(&err)),
        }
    }
    Ok(report)
}

/// Result of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Number of files processed.
    pub file_count: usize,
    /// Number of errors.
    pub error_count: usize,
    /// Errors left out by `--max-errors`.
    pub hidden_count: usize,
    /// Number of generated files written.
    pub written_count: usize,
    /// Time taken.
    pub duration_ms: u64,
}

/// Orchestrator for running tgo.
pub struct Orchestrator {
    /// Configuration.
    config: Config,
    /// CLI arguments.
    args: Args,
    /// Output formatter.
    formatter: OutputFormatter,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(workspace: PathBuf, args: Args) -> Result<Self> {
        let config = Config::load(&workspace, &args)?;
        let formatter = OutputFormatter::new(args.output);
        tracing::debug!(
            workspace = %config.workspace.display(),
            ignore = ?config.ignore_patterns,
            "loaded configuration"
        );

        Ok(Self {
            config,
            args,
            formatter,
        })
    }

    /// Run the selected command once.
    pub fn run_once(&self) -> Result<RunResult> {
        let start = Instant::now();

        let mut result = match &self.args.command {
            Command::Check { paths } => self.run_files(paths, false)?,
            Command::Build { paths, .. } => self.run_files(paths, true)?,
            Command::Print { file } => self.run_print(file)?,
        };
        result.duration_ms = start.elapsed().as_millis() as u64;

        if self.args.timings {
            eprintln!("\nTiming: {}ms", result.duration_ms);
        }
        if !matches!(self.args.command, Command::Print { .. }) {
            self.formatter.print_summary(&result);
        }

        Ok(result)
    }

    /// Run in watch mode.
    pub fn run_watch_mode(&mut self) -> Result<()> {
        use notify::{Config as NotifyConfig, RecommendedWatcher, RecursiveMode, Watcher};
        use std::sync::mpsc::channel;
        use std::time::Duration;

        eprintln!("Starting watch mode...\n");

        if let Err(e) = self.run_once() {
            eprintln!("{:?}", e);
        }

        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                if let Ok(event) = res {
                    let _ = tx.send(event);
                }
            },
            NotifyConfig::default().with_poll_interval(Duration::from_millis(500)),
        )
        .into_diagnostic()?;

        watcher
            .watch(&self.config.workspace, RecursiveMode::Recursive)
            .into_diagnostic()?;

        loop {
            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => {
                    let config_changed = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().is_some_and(|n| n == CONFIG_FILE_NAME));
                    let should_rerun = config_changed
                        || event.paths.iter().any(|p| is_tgo_file(p));
                    if !should_rerun {
                        continue;
                    }

                    if config_changed {
                        match Config::load(&self.config.workspace, &self.args) {
                            Ok(config) => self.config = config,
                            Err(e) => {
                                tracing::warn!("keeping previous configuration");
                                eprintln!("{:?}", e);
                                continue;
                            }
                        }
                    }

                    tracing::info!(paths = ?event.paths, "change detected");
                    eprintln!("File change detected. Rerunning...\n");
                    if let Err(e) = self.run_once() {
                        eprintln!("{:?}", e);
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }

        Ok(())
    }

    /// Find all tgo files under `paths`, or the whole workspace.
    pub fn find_files(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let roots = if paths.is_empty() {
            vec![self.config.workspace.clone()]
        } else {
            paths.iter().map(|p| self.config.workspace.join(p)).collect()
        };

        let mut files = Vec::new();
        for root in roots {
            if root.is_file() {
                files.push(root);
                continue;
            }
            for entry in walkdir::WalkDir::new(&root)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if entry.file_type().is_file()
                    && is_tgo_file(path)
                    && !self.config.is_ignored(path)
                {
                    files.push(path.to_path_buf());
                }
            }
        }

        files.sort();
        files.dedup();
        files
    }

    fn run_files(&self, paths: &[PathBuf], generate: bool) -> Result<RunResult> {
        let files = self.find_files(paths);
        tracing::debug!(count = files.len(), "found tgo files");

        let reports: Vec<_> = files
            .par_iter()
            .map(|file| process_file(file, &self.config, generate))
            .collect();

        let mut result = RunResult {
            file_count: files.len(),
            ..Default::default()
        };
        for report in reports {
            let report = match report {
                Ok(report) => report,
                Err(e) => {
                    eprintln!("{:?}", e);
                    result.error_count += 1;
                    continue;
                }
            };

            self.report_diagnostics(&report, &mut result);

            if let Some(code) = &report.generated {
                let out = self.config.output_path(&report.path);
                write_output(&out, code)?;
                tracing::debug!(file = %out.display(), "wrote generated Go");
                result.written_count += 1;
            }
        }

        Ok(result)
    }

    fn run_print(&self, file: &Path) -> Result<RunResult> {
        let path = self.config.workspace.join(file);
        let report = process_file(&path, &self.config, true)?;

        let mut result = RunResult {
            file_count: 1,
            ..Default::default()
        };
        self.report_diagnostics(&report, &mut result);
        if let Some(code) = &report.generated {
            print!("{code}");
        }
        Ok(result)
    }

    fn report_diagnostics(&self, report: &FileReport, result: &mut RunResult) {
        for diagnostic in &report.diagnostics {
            let shown = result.error_count - result.hidden_count;
            if self.args.max_errors.is_some_and(|max| shown >= max) {
                result.hidden_count += 1;
            } else {
                self.formatter.print_diagnostic(report, diagnostic);
            }
            result.error_count += 1;
        }
    }
}

fn is_tgo_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "tgo")
}

fn write_output(path: &Path, code: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, code)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    const PAGE: &str = "package views\n\nimport \"github.com/mateusz834/tgo\"\n\nfunc Page(ctx tgo.Ctx, title string) error {\n\t<h1>\"\\{title}\"</h1>\n\treturn nil\n}\n";

    const BROKEN: &str = "package views\n\nfunc plain() {\n\t<p></p>\n}\n";

    fn orchestrator(dir: &Path, argv: &[&str]) -> Orchestrator {
        let args = Args::parse_from(
            ["tgo"]
                .into_iter()
                .chain(argv.iter().copied())
                .chain(["--output", "machine"]),
        );
        Orchestrator::new(dir.to_path_buf(), args).unwrap()
    }

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_process_clean_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "page.tgo", PAGE);
        let config = orchestrator(dir.path(), &["build"]).config;

        let report = process_file(&path, &config, true).unwrap();
        assert!(report.diagnostics.is_empty());
        let code = report.generated.unwrap();
        assert!(code.starts_with("// Code generated by tgo DO NOT EDIT.\n\n//line page.tgo:1:1\n"));
        assert!(code.contains("tgo.DynamicWrite(ctx, /*line page.tgo:6:9*/title)"));
    }

    #[test]
    fn test_process_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let broken = write(dir.path(), "broken.tgo", BROKEN);
        let unparsable = write(dir.path(), "bad.tgo", "package views\nfunc f() { @ }\n");
        let config = orchestrator(dir.path(), &["check"]).config;

        let report = process_file(&broken, &config, true).unwrap();
        assert_eq!(report.generated, None);
        assert_eq!(
            report
                .diagnostics
                .iter()
                .map(|d| (d.code, d.line, d.column))
                .collect::<Vec<_>>(),
            vec![("context", 4, 2), ("context", 4, 5)]
        );

        let report = process_file(&unparsable, &config, false).unwrap();
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].code, "unexpected-token");
        assert_eq!(report.diagnostics[0].line, 2);
    }

    #[test]
    fn test_transpile_error_becomes_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "cr.tgo", "package views\r\n");
        let config = orchestrator(dir.path(), &["build"]).config;

        let report = process_file(&path, &config, true).unwrap();
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic {
                code: "carriage-return",
                message: "carriage returns are not supported".to_string(),
                line: 1,
                column: 14,
                span: Span::new(13, 14),
            }]
        );
    }

    #[test]
    fn test_find_files_skips_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.tgo", PAGE);
        write(dir.path(), "views/b.tgo", PAGE);
        write(dir.path(), "views/b.go", "package views\n");
        write(dir.path(), "vendor/c.tgo", PAGE);
        write(dir.path(), "views/testdata/d.tgo", PAGE);

        let orch = orchestrator(dir.path(), &["check"]);
        let names: Vec<_> = orch
            .find_files(&[])
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(names, vec![PathBuf::from("a.tgo"), PathBuf::from("views/b.tgo")]);

        let only = orch.find_files(&[PathBuf::from("views")]);
        assert_eq!(only.len(), 1);
    }

    #[test]
    fn test_build_writes_clean_files_only() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "page.tgo", PAGE);
        write(dir.path(), "broken.tgo", BROKEN);

        let result = orchestrator(dir.path(), &["build"]).run_once().unwrap();
        assert_eq!(result.file_count, 2);
        assert_eq!(result.error_count, 2);
        assert_eq!(result.written_count, 1);
        assert!(dir.path().join("page.go").is_file());
        assert!(!dir.path().join("broken.go").exists());
    }

    #[test]
    fn test_build_into_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "views/page.tgo", PAGE);

        let result = orchestrator(dir.path(), &["build", "--out-dir", "gen"])
            .run_once()
            .unwrap();
        assert_eq!(result.written_count, 1);
        let code = std::fs::read_to_string(dir.path().join("gen/views/page.go")).unwrap();
        assert!(code.contains("//line "));
        assert!(code.contains("page.tgo:7:1\n\treturn nil"));
    }

    #[test]
    fn test_max_errors_hides_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "broken.tgo", BROKEN);

        let result = orchestrator(dir.path(), &["check", "--max-errors", "1"])
            .run_once()
            .unwrap();
        assert_eq!(result.error_count, 2);
        assert_eq!(result.hidden_count, 1);
        assert_eq!(result.written_count, 0);
    }
}
