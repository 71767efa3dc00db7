//! Process execution: one child at a time, output appended to the run's log files.

use chrono::Utc;
use scs_core::{ExecRequest, Layout, Result, SetupError};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Runs [`ExecRequest`]s, appending child stdout and stderr to two fixed log files.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    stdout_log: PathBuf,
    stderr_log: PathBuf,
}

impl CommandRunner {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(stdout_log: P, stderr_log: Q) -> Self {
        Self {
            stdout_log: stdout_log.as_ref().to_path_buf(),
            stderr_log: stderr_log.as_ref().to_path_buf(),
        }
    }

    pub fn for_layout(layout: &Layout) -> Self {
        Self::new(layout.stdout_log(), layout.stderr_log())
    }

    pub fn stdout_log(&self) -> &Path {
        &self.stdout_log
    }

    pub fn stderr_log(&self) -> &Path {
        &self.stderr_log
    }

    /// Run the request to completion.
    ///
    /// The child inherits this process's environment plus `request.env`. Any exit
    /// other than status 0 is a [`SetupError::CommandFailed`].
    pub async fn exec(&self, request: &ExecRequest) -> Result<()> {
        let command_line = request.to_string();

        info!(
            command = %command_line,
            stdout = %self.stdout_log.display(),
            stderr = %self.stderr_log.display(),
            working_dir = %request.working_dir.display(),
            env = ?request.env,
            sys = ?request.sys_props,
            "Executing command"
        );

        let working_dir = std::path::absolute(&request.working_dir)
            .map_err(|e| SetupError::fs(&request.working_dir, e))?;
        let program = resolve_program(&request.program, &working_dir)?;
        let stdout = open_log(&self.stdout_log, &command_line, &working_dir)?;
        let stderr = open_log(&self.stderr_log, &command_line, &working_dir)?;

        let status = Command::new(&program)
            .args(request.argv())
            .current_dir(&working_dir)
            .envs(request.env.iter())
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status()
            .await
            .map_err(|source| SetupError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        if !status.success() {
            return Err(SetupError::CommandFailed {
                command: command_line,
                code: status.code(),
            });
        }

        debug!(command = %command_line, "Command completed");
        Ok(())
    }
}

/// Delete the log directory left by a previous run and recreate it empty.
pub fn reset_log_dir(layout: &Layout) -> Result<()> {
    let dir = layout.log_dir();
    match fs::remove_dir_all(&dir) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(SetupError::fs(&dir, e)),
    }
    fs::create_dir_all(&dir).map_err(|e| SetupError::fs(&dir, e))
}

/// Bare names are looked up on `PATH`. Relative paths are taken relative to the
/// child's working directory, which must already be absolute so the result does not
/// depend on how the platform resolves a relative program after changing directory.
fn resolve_program(program: &str, working_dir: &Path) -> Result<PathBuf> {
    let path = Path::new(program);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    if path.components().count() > 1 {
        return Ok(working_dir.join(path));
    }
    which::which(program).map_err(|e| SetupError::ProgramNotFound {
        program: program.to_string(),
        reason: e.to_string(),
    })
}

fn open_log(path: &Path, command_line: &str, working_dir: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SetupError::fs(parent, e))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| SetupError::fs(path, e))?;
    writeln!(
        file,
        "==> {} {} (in {})",
        Utc::now().to_rfc3339(),
        command_line,
        working_dir.display()
    )
    .map_err(|e| SetupError::fs(path, e))?;
    Ok(file)
}
