//! Configuration loading and management.

use crate::cli::Args;
use globset::{Glob, GlobSet, GlobSetBuilder};
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tgo_transpiler::TranspileOptions;

/// Name of the optional configuration file in the workspace root.
pub const CONFIG_FILE_NAME: &str = "tgo.json";

const DEFAULT_IGNORE: &[&str] = &["**/.git/**", "**/vendor/**", "**/testdata/**"];

/// Contents of `tgo.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Extra ignore patterns.
    pub ignore: Vec<String>,
    /// Output directory for `build`, relative to the workspace.
    pub out_dir: Option<PathBuf>,
    /// Context name for writes outside template functions.
    pub ctx_name: Option<String>,
    /// Runtime package name for writes outside template functions.
    pub runtime_name: Option<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&text)
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Load `tgo.json` from `workspace` if there is one.
    pub fn find(workspace: &Path) -> Result<Option<Self>> {
        let path = workspace.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }
}

/// Configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace root directory.
    pub workspace: PathBuf,
    /// Where `build` writes, `None` for next to each source.
    pub out_dir: Option<PathBuf>,
    /// Options handed to the transpiler.
    pub transpile: TranspileOptions,
    /// Ignore patterns, defaults first.
    pub ignore_patterns: Vec<String>,
    ignore: GlobSet,
}

impl Config {
    /// Load configuration from CLI arguments and workspace.
    pub fn load(workspace: &Path, args: &Args) -> Result<Self> {
        let file = ConfigFile::find(workspace)?.unwrap_or_default();
        Self::from_parts(workspace, file, args)
    }

    /// Merge a configuration file with the command line, flags winning.
    pub fn from_parts(workspace: &Path, file: ConfigFile, args: &Args) -> Result<Self> {
        let mut transpile = TranspileOptions::default();
        if let Some(ctx_name) = file.ctx_name {
            transpile.ctx_name = ctx_name;
        }
        if let Some(runtime_name) = file.runtime_name {
            transpile.runtime_name = runtime_name;
        }

        let out_dir = args
            .out_dir()
            .map(Path::to_path_buf)
            .or(file.out_dir)
            .map(|dir| workspace.join(dir));

        let mut ignore_patterns: Vec<String> =
            DEFAULT_IGNORE.iter().map(|p| p.to_string()).collect();
        ignore_patterns.extend(file.ignore);
        ignore_patterns.extend(args.ignore.iter().cloned());

        let mut builder = GlobSetBuilder::new();
        for pattern in &ignore_patterns {
            let glob = Glob::new(pattern)
                .into_diagnostic()
                .wrap_err_with(|| format!("Invalid ignore pattern {pattern:?}"))?;
            builder.add(glob);
        }
        let ignore = builder.build().into_diagnostic()?;

        Ok(Self {
            workspace: workspace.to_path_buf(),
            out_dir,
            transpile,
            ignore_patterns,
            ignore,
        })
    }

    /// Check if a path matches an ignore pattern.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.workspace).unwrap_or(path);
        self.ignore.is_match(relative)
    }

    /// Where the Go file generated from `input` is written.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let go = input.with_extension("go");
        match &self.out_dir {
            None => go,
            Some(dir) => match go.strip_prefix(&self.workspace) {
                Ok(relative) => dir.join(relative),
                Err(_) => dir.join(go.file_name().unwrap_or_default()),
            },
        }
    }

    /// File name written into the line directives of `input`'s output.
    ///
    /// Next to the source the bare file name is enough; elsewhere the
    /// directives carry the full path.
    pub fn directive_name(&self, input: &Path) -> String {
        match (&self.out_dir, input.file_name()) {
            (None, Some(name)) => name.to_string_lossy().into_owned(),
            _ => input.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("tgo").chain(argv.iter().copied()))
    }

    #[test]
    fn test_config_file_fields() {
        let file: ConfigFile = serde_json::from_str(
            r#"{"ignore": ["gen/**"], "outDir": "out", "ctxName": "c", "runtimeName": "rt"}"#,
        )
        .unwrap();
        assert_eq!(
            file,
            ConfigFile {
                ignore: vec!["gen/**".to_string()],
                out_dir: Some(PathBuf::from("out")),
                ctx_name: Some("c".to_string()),
                runtime_name: Some("rt".to_string()),
            }
        );
        assert!(serde_json::from_str::<ConfigFile>(r#"{"outdir": "x"}"#).is_err());
    }

    #[test]
    fn test_find_in_workspace() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(ConfigFile::find(dir.path()).unwrap(), None);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{"ctxName": "w"}"#).unwrap();
        let config = Config::load(dir.path(), &args(&["check"])).unwrap();
        assert_eq!(config.transpile.ctx_name, "w");
        assert_eq!(config.transpile.runtime_name, "__tgo");

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{").unwrap();
        assert!(Config::load(dir.path(), &args(&["check"])).is_err());
    }

    #[test]
    fn test_ignore_patterns() {
        let file = ConfigFile {
            ignore: vec!["gen/**".to_string()],
            ..Default::default()
        };
        let config =
            Config::from_parts(Path::new("/ws"), file, &args(&["check", "--ignore", "*_old.tgo"]))
                .unwrap();

        assert_eq!(config.ignore_patterns.len(), 5);
        assert!(config.is_ignored(Path::new("/ws/vendor/x/a.tgo")));
        assert!(config.is_ignored(Path::new("/ws/a/testdata/b.tgo")));
        assert!(config.is_ignored(Path::new("/ws/gen/a.tgo")));
        assert!(config.is_ignored(Path::new("/ws/page_old.tgo")));
        assert!(!config.is_ignored(Path::new("/ws/views/page.tgo")));
    }

    #[test]
    fn test_output_paths() {
        let next_to =
            Config::from_parts(Path::new("/ws"), ConfigFile::default(), &args(&["build"])).unwrap();
        assert_eq!(
            next_to.output_path(Path::new("/ws/views/page.tgo")),
            PathBuf::from("/ws/views/page.go")
        );
        assert_eq!(next_to.directive_name(Path::new("/ws/views/page.tgo")), "page.tgo");

        let file = ConfigFile {
            out_dir: Some(PathBuf::from("from-file")),
            ..Default::default()
        };
        let out = Config::from_parts(Path::new("/ws"), file, &args(&["build", "--out-dir", "gen"]))
            .unwrap();
        assert_eq!(out.out_dir, Some(PathBuf::from("/ws/gen")));
        assert_eq!(
            out.output_path(Path::new("/ws/views/page.tgo")),
            PathBuf::from("/ws/gen/views/page.go")
        );
        assert_eq!(
            out.output_path(Path::new("/elsewhere/page.tgo")),
            PathBuf::from("/ws/gen/page.go")
        );
        assert_eq!(
            out.directive_name(Path::new("/ws/views/page.tgo")),
            "/ws/views/page.tgo"
        );
    }
}
