//! Runtime abstraction for system operations.
//!
//! Every side effect lintup performs (file system access, spawning the
//! package manager, prompting the user) goes through the [`Runtime`] trait so
//! that commands can be exercised against a mock.
//!
//! # Structure
//!
//! - `env` - Process environment (working directory)
//! - `fs` - File system operations (exists, read, write, rename)
//! - `process` - External command execution
//! - `user` - User interaction (confirmation prompts)

mod env;
mod fs;
mod process;
mod user;

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use process::CommandError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runtime: Send + Sync {
    // Environment
    fn current_dir(&self) -> Result<PathBuf>;

    // File System
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Create the file or truncate and overwrite it.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    // Processes
    /// Run `program` with `args` in `cwd`, inheriting stdin/stdout/stderr.
    /// Fails with a [`CommandError`] if the program cannot be spawned or exits
    /// with a non-zero status.
    async fn run_command(&self, program: &str, args: &[String], cwd: &Path) -> Result<()>;

    // User interaction
    /// Ask a yes/no question. An empty answer selects `default`.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

pub struct RealRuntime;

#[async_trait]
impl Runtime for RealRuntime {
    fn current_dir(&self) -> Result<PathBuf> {
        self.current_dir_impl()
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.rename_impl(from, to)
    }

    async fn run_command(&self, program: &str, args: &[String], cwd: &Path) -> Result<()> {
        self.run_command_impl(program, args, cwd).await
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        self.confirm_impl(prompt, default)
    }
}
