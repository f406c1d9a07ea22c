use anyhow::Result;

use crate::package_manager;
use crate::runtime::Runtime;

use super::config::Config;

/// Print the package manager used by the project
#[tracing::instrument(skip(runtime, config))]
pub fn detect<R: Runtime>(runtime: R, config: &Config) -> Result<()> {
    let manager = package_manager::detect(&runtime, &config.project_dir);
    println!("{}", manager);
    Ok(())
}
