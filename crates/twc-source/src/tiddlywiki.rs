//! Thin wrapper around the `tiddlywiki` executable.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

/// Program name looked up on `PATH` when no explicit path is configured.
pub const DEFAULT_PROGRAM: &str = "tiddlywiki";

/// A failed `tiddlywiki` invocation.
#[derive(Debug, thiserror::Error)]
#[error("`{command}` failed (exit code {exit_code:?}): {stderr}")]
pub struct ToolError {
    pub command: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

/// Runs the `tiddlywiki` command-line tool.
#[derive(Clone, Debug)]
pub struct TiddlyWikiCli {
    program: PathBuf,
}

impl TiddlyWikiCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run `tiddlywiki <args...>` in `cwd`.
    pub fn run<I, S>(&self, args: I, cwd: &Path) -> Result<(), ToolError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let command = self.describe(&args);
        debug!(%command, cwd = %cwd.display(), "running tiddlywiki");

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(cwd)
            .output()
            .map_err(|e| ToolError {
                command: command.clone(),
                stderr: e.to_string(),
                exit_code: None,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ToolError {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
                exit_code: output.status.code(),
            })
        }
    }

    /// Explode a single-file wiki into a wiki folder.
    ///
    /// Equivalent to `tiddlywiki --load <html> --savewikifolder <out_dir>`.
    pub fn explode(&self, html: &Path, out_dir: &Path, cwd: &Path) -> Result<(), ToolError> {
        self.run(
            [
                OsString::from("--load"),
                html.as_os_str().to_owned(),
                OsString::from("--savewikifolder"),
                out_dir.as_os_str().to_owned(),
            ],
            cwd,
        )
    }

    /// Run a named build target of a wiki folder.
    ///
    /// Equivalent to `tiddlywiki <wiki_dir> --build <target>`.
    pub fn build(&self, wiki_dir: &Path, target: &str) -> Result<(), ToolError> {
        self.run(
            [
                wiki_dir.as_os_str().to_owned(),
                OsString::from("--build"),
                OsString::from(target),
            ],
            wiki_dir,
        )
    }

    fn describe(&self, args: &[OsString]) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

impl Default for TiddlyWikiCli {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_program_is_on_path() {
        assert_eq!(TiddlyWikiCli::default().program(), Path::new("tiddlywiki"));
    }

    #[test]
    fn missing_program_reports_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let cli = TiddlyWikiCli::new(dir.path().join("no-such-tiddlywiki"));
        let err = cli.build(dir.path(), "index").unwrap_err();
        assert_eq!(err.exit_code, None);
        assert!(err.command.ends_with("--build index"));
    }
}
