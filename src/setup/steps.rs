use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;

use super::{SetupContext, Step};
use crate::manifest::{MANIFEST_FILE, PackageManifest};
use crate::package_manager::{detect, installer_for};
use crate::runtime::Runtime;

/// Install the preset's dependencies with the detected package manager.
pub struct InstallDependencies;

#[async_trait]
impl<R: Runtime> Step<R> for InstallDependencies {
    fn name(&self) -> &'static str {
        "install"
    }

    fn prompt(&self, _ctx: &SetupContext<'_, R>) -> String {
        "Do you want to install dependencies?".to_string()
    }

    async fn run(&self, ctx: &SetupContext<'_, R>) -> Result<()> {
        println!("Detecting package manager...");
        let manager = detect(ctx.runtime, &ctx.project_dir);
        println!("Package manager: {}", manager);

        let installer = installer_for(manager, ctx.runtime, &ctx.project_dir);
        println!("Installing dependencies...");
        installer.install(&ctx.preset.dependencies).await?;
        println!("Dependencies have been installed.");
        Ok(())
    }
}

/// Add the catalog's lint scripts to `package.json`.
pub struct AddScripts;

#[async_trait]
impl<R: Runtime> Step<R> for AddScripts {
    fn name(&self) -> &'static str {
        "scripts"
    }

    fn prompt(&self, _ctx: &SetupContext<'_, R>) -> String {
        "Do you want to add ESLint scripts to package.json?".to_string()
    }

    async fn run(&self, ctx: &SetupContext<'_, R>) -> Result<()> {
        let path = ctx.project_dir.join(MANIFEST_FILE);
        println!("Adding scripts to package.json...");

        let mut manifest = PackageManifest::load(ctx.runtime, &path)?;
        manifest.add_scripts(ctx.catalog.scripts())?;
        manifest.save(ctx.runtime, &path)?;

        info!("Updated scripts in {:?}", path);
        println!("ESLint scripts have been added to package.json.");
        Ok(())
    }
}

/// Write the preset's config file, replacing any existing one.
pub struct WriteConfig;

#[async_trait]
impl<R: Runtime> Step<R> for WriteConfig {
    fn name(&self) -> &'static str {
        "config"
    }

    fn prompt(&self, ctx: &SetupContext<'_, R>) -> String {
        format!("Do you want to create {}?", ctx.catalog.config_file())
    }

    async fn run(&self, ctx: &SetupContext<'_, R>) -> Result<()> {
        let file_name = ctx.catalog.config_file();
        let path = ctx.config_path();
        println!("Creating {}...", file_name);

        ctx.runtime
            .write(&path, ctx.preset.content.as_bytes())
            .with_context(|| format!("Error creating {}", file_name))?;

        info!(
            "Wrote preset {} v{} to {:?}",
            ctx.preset.name, ctx.preset.version, path
        );
        println!("{} created!", file_name);
        Ok(())
    }
}
