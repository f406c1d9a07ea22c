use anyhow::{Result, bail};
use log::debug;
use std::path::PathBuf;

use crate::preset::PresetCatalog;
use crate::runtime::Runtime;

/// Settings shared by every command, resolved from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing the project's `package.json`.
    pub project_dir: PathBuf,
    pub catalog: PresetCatalog,
}

impl Config {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(
        runtime: &R,
        project_dir: Option<PathBuf>,
        presets_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let project_dir = resolve_project_dir(runtime, project_dir)?;
        debug!("Using project directory: {:?}", project_dir);

        let catalog = match presets_dir {
            Some(dir) => {
                debug!("Loading presets from {:?}", dir);
                PresetCatalog::from_dir(runtime, &dir)?
            }
            None => PresetCatalog::embedded()?,
        };

        Ok(Self {
            project_dir,
            catalog,
        })
    }
}

/// Absolute project directory; defaults to the current directory.
fn resolve_project_dir<R: Runtime>(runtime: &R, dir: Option<PathBuf>) -> Result<PathBuf> {
    let cwd = runtime.current_dir()?;
    let dir = match dir {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => cwd.join(dir),
        None => return Ok(cwd),
    };
    if !runtime.exists(&dir) {
        bail!("Project directory {} does not exist", dir.display());
    }
    Ok(dir)
}
