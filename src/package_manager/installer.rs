//! Dependency installation through the project's package manager.
//!
//! Each supported package manager has its own [`Installer`]; all of them
//! delegate to [`Runtime::run_command`] with inherited stdio so the user sees
//! the package manager's own output.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};

use super::PackageManager;
use crate::runtime::Runtime;

/// A fully resolved package manager invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl InstallCommand {
    /// `<program> add <packages...> <dev_flag>`
    fn add(program: &str, packages: &[String], dev_flag: &str) -> Self {
        let mut args = Vec::with_capacity(packages.len() + 2);
        args.push("add".to_string());
        args.extend(packages.iter().cloned());
        args.push(dev_flag.to_string());
        Self {
            program: executable(program),
            args,
        }
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Package managers are batch shims on Windows.
fn executable(name: &str) -> String {
    if cfg!(windows) {
        format!("{}.cmd", name)
    } else {
        name.to_string()
    }
}

#[async_trait]
pub trait Installer: Send + Sync {
    fn manager(&self) -> PackageManager;

    /// The command line that installs `packages` as dev-dependencies.
    fn command(&self, packages: &[String]) -> InstallCommand;

    /// Install `packages` as dev-dependencies. An empty list is a no-op.
    async fn install(&self, packages: &[String]) -> Result<()>;
}

async fn run_install<R: Runtime>(
    runtime: &R,
    dir: &Path,
    manager: PackageManager,
    command: InstallCommand,
) -> Result<()> {
    info!("Installing with {}: {}", manager, command);
    runtime
        .run_command(&command.program, &command.args, dir)
        .await
        .with_context(|| format!("Failed to install dependencies with {}", manager))
}

macro_rules! installer {
    ($(#[$doc:meta])* $name:ident, $manager:expr, $program:literal, $dev_flag:literal) => {
        $(#[$doc])*
        pub struct $name<'a, R: Runtime> {
            runtime: &'a R,
            dir: PathBuf,
        }

        impl<'a, R: Runtime> $name<'a, R> {
            pub fn new(runtime: &'a R, dir: impl Into<PathBuf>) -> Self {
                Self {
                    runtime,
                    dir: dir.into(),
                }
            }
        }

        #[async_trait]
        impl<'a, R: Runtime> Installer for $name<'a, R> {
            fn manager(&self) -> PackageManager {
                $manager
            }

            fn command(&self, packages: &[String]) -> InstallCommand {
                InstallCommand::add($program, packages, $dev_flag)
            }

            #[tracing::instrument(skip(self))]
            async fn install(&self, packages: &[String]) -> Result<()> {
                if packages.is_empty() {
                    debug!("No packages to install");
                    return Ok(());
                }
                run_install(self.runtime, &self.dir, $manager, self.command(packages)).await
            }
        }
    };
}

installer!(
    /// `npm add <packages> --save-dev`
    NpmInstaller,
    PackageManager::Npm,
    "npm",
    "--save-dev"
);

installer!(
    /// `yarn add <packages> --dev`
    ///
    /// Unlike npm and pnpm, yarn spells the dev-dependency flag `--dev`;
    /// yarn 1 rejects `--save-dev`.
    YarnInstaller,
    PackageManager::Yarn,
    "yarn",
    "--dev"
);

installer!(
    /// `pnpm add <packages> --save-dev`
    PnpmInstaller,
    PackageManager::Pnpm,
    "pnpm",
    "--save-dev"
);

/// Build the installer for `manager`, running in `dir`.
pub fn installer_for<'a, R: Runtime>(
    manager: PackageManager,
    runtime: &'a R,
    dir: &Path,
) -> Box<dyn Installer + 'a> {
    match manager {
        PackageManager::Npm => Box::new(NpmInstaller::new(runtime, dir)),
        PackageManager::Yarn => Box::new(YarnInstaller::new(runtime, dir)),
        PackageManager::Pnpm => Box::new(PnpmInstaller::new(runtime, dir)),
    }
}
