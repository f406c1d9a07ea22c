//! Package manager detection.
//!
//! The package manager of a project is inferred from the lockfile in its
//! root directory; the result selects which [`Installer`] is used.

mod installer;

use anyhow::{Result, bail};
use log::debug;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::runtime::Runtime;

pub use installer::{
    InstallCommand, Installer, NpmInstaller, PnpmInstaller, YarnInstaller, installer_for,
};

pub const YARN_LOCKFILE: &str = "yarn.lock";
pub const PNPM_LOCKFILE: &str = "pnpm-lock.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "yarn" => Ok(PackageManager::Yarn),
            "pnpm" => Ok(PackageManager::Pnpm),
            other => bail!("Unknown package manager '{}'. Expected npm, yarn or pnpm.", other),
        }
    }
}

/// Detect the package manager used in `dir`.
///
/// `yarn.lock` wins over `pnpm-lock.yaml`; without either lockfile the
/// project is assumed to use npm.
#[tracing::instrument(skip(runtime))]
pub fn detect<R: Runtime>(runtime: &R, dir: &Path) -> PackageManager {
    let manager = if runtime.exists(&dir.join(YARN_LOCKFILE)) {
        PackageManager::Yarn
    } else if runtime.exists(&dir.join(PNPM_LOCKFILE)) {
        PackageManager::Pnpm
    } else {
        PackageManager::Npm
    };

    debug!("Detected {} in {:?}", manager, dir);
    manager
}
