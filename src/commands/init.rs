use anyhow::Result;
use log::{debug, info};

use crate::runtime::Runtime;
use crate::setup::{self, SetupContext};

use super::config::Config;

/// Options for `lintup init`
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Preset name; the catalog default when absent
    pub preset: Option<String>,
    /// Run every enabled step without asking
    pub yes: bool,
    pub skip_install: bool,
    pub skip_scripts: bool,
    pub skip_config: bool,
}

/// Set up ESLint in the configured project.
#[tracing::instrument(skip(runtime, config))]
pub async fn init<R: Runtime + 'static>(
    runtime: R,
    config: Config,
    options: InitOptions,
) -> Result<()> {
    let preset = match options.preset.as_deref() {
        Some(name) => config.catalog.get(name)?,
        None => config.catalog.default_preset(),
    };
    info!("Using preset {} v{}", preset.name, preset.version);

    let ctx = SetupContext {
        runtime: &runtime,
        project_dir: config.project_dir.clone(),
        catalog: &config.catalog,
        preset,
    };

    let pipeline = setup::standard::<R>(
        !options.yes,
        !options.skip_install,
        !options.skip_scripts,
        !options.skip_config,
    );
    let report = pipeline.run(&ctx).await?;

    for (step, outcome) in &report.steps {
        debug!("{}: {}", step, outcome);
    }
    Ok(())
}
