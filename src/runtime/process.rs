//! External command execution.

use anyhow::Result;
use log::debug;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::RealRuntime;

/// Failure of an external command.
#[derive(Debug)]
pub enum CommandError {
    /// The program could not be started (not installed, not executable, ...)
    Spawn { program: String, source: io::Error },
    /// The program ran but exited unsuccessfully. `code` is `None` when it
    /// was terminated by a signal.
    Failed { command: String, code: Option<i32> },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Spawn { program, source } => {
                write!(f, "Failed to run '{}': {}", program, source)
            }
            CommandError::Failed {
                command,
                code: Some(code),
            } => {
                write!(f, "Command '{}' exited with status {}", command, code)
            }
            CommandError::Failed { command, code: None } => {
                write!(f, "Command '{}' was terminated by a signal", command)
            }
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Spawn { source, .. } => Some(source),
            CommandError::Failed { .. } => None,
        }
    }
}

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) async fn run_command_impl(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<()> {
        let command_line = std::iter::once(program)
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        debug!("Running `{}` in {:?}", command_line, cwd);

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(CommandError::Failed {
                command: command_line,
                code: status.code(),
            }
            .into());
        }
        Ok(())
    }
}
