//! Ordered setup pipeline.
//!
//! `lintup init` is a fixed sequence of [`Step`]s. Each step is awaited
//! before the next one starts and the first failure stops the pipeline;
//! effects of steps that already completed are left in place.

mod steps;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use std::fmt;
use std::path::PathBuf;

use crate::preset::{Preset, PresetCatalog};
use crate::runtime::Runtime;

pub use steps::{AddScripts, InstallDependencies, WriteConfig};

/// Everything a step needs to know about the project being set up.
pub struct SetupContext<'a, R: Runtime> {
    pub runtime: &'a R,
    pub project_dir: PathBuf,
    pub catalog: &'a PresetCatalog,
    pub preset: &'a Preset,
}

impl<R: Runtime> SetupContext<'_, R> {
    pub fn config_path(&self) -> PathBuf {
        self.project_dir.join(self.catalog.config_file())
    }
}

#[async_trait]
pub trait Step<R: Runtime>: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Question asked before running the step interactively.
    fn prompt(&self, ctx: &SetupContext<'_, R>) -> String;

    async fn run(&self, ctx: &SetupContext<'_, R>) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    /// The user declined the step.
    Skipped,
    /// Turned off on the command line.
    Disabled,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepOutcome::Completed => "completed",
            StepOutcome::Skipped => "skipped",
            StepOutcome::Disabled => "disabled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub steps: Vec<(&'static str, StepOutcome)>,
}

impl SetupReport {
    pub fn outcome(&self, name: &str) -> Option<StepOutcome> {
        self.steps
            .iter()
            .find(|(step, _)| *step == name)
            .map(|(_, outcome)| *outcome)
    }
}

struct Entry<R: Runtime> {
    step: Box<dyn Step<R>>,
    enabled: bool,
}

pub struct Pipeline<R: Runtime> {
    entries: Vec<Entry<R>>,
    interactive: bool,
}

impl<R: Runtime> Pipeline<R> {
    /// An empty pipeline. Interactive pipelines ask for confirmation
    /// (defaulting to yes) before each enabled step.
    pub fn new(interactive: bool) -> Self {
        Self {
            entries: Vec::new(),
            interactive,
        }
    }

    pub fn step(mut self, step: impl Step<R> + 'static, enabled: bool) -> Self {
        self.entries.push(Entry {
            step: Box::new(step),
            enabled,
        });
        self
    }

    #[tracing::instrument(skip(self, ctx), fields(preset = %ctx.preset.name))]
    pub async fn run(&self, ctx: &SetupContext<'_, R>) -> Result<SetupReport> {
        let mut report = SetupReport::default();

        for entry in &self.entries {
            let name = entry.step.name();

            if !entry.enabled {
                debug!("Step {} disabled", name);
                report.steps.push((name, StepOutcome::Disabled));
                continue;
            }

            if self.interactive && !ctx.runtime.confirm(&entry.step.prompt(ctx), true)? {
                info!("Step {} declined", name);
                report.steps.push((name, StepOutcome::Skipped));
                continue;
            }

            debug!("Running step {}", name);
            entry
                .step
                .run(ctx)
                .await
                .with_context(|| format!("Setup step '{}' failed", name))?;
            report.steps.push((name, StepOutcome::Completed));
        }

        Ok(report)
    }
}

/// The standard `init` pipeline: install, scripts, config.
pub fn standard<R: Runtime + 'static>(
    interactive: bool,
    install: bool,
    scripts: bool,
    config: bool,
) -> Pipeline<R> {
    Pipeline::new(interactive)
        .step(InstallDependencies, install)
        .step(AddScripts, scripts)
        .step(WriteConfig, config)
}
