use anyhow::Result;
use std::io::Write;

use crate::preset::PresetCatalog;

use super::config::Config;

/// List available presets
#[tracing::instrument(skip(config))]
pub fn presets(config: &Config) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write_preset_list(&config.catalog, &mut stdout)
}

/// Print a preset's configuration document verbatim
#[tracing::instrument(skip(config))]
pub fn show(config: &Config, name: &str) -> Result<()> {
    let preset = config.catalog.get(name)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(preset.content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn write_preset_list<W: Write>(catalog: &PresetCatalog, out: &mut W) -> Result<()> {
    let width = catalog.iter().map(|p| p.name.len()).max().unwrap_or(0);
    for preset in catalog.iter() {
        let marker = if preset.name == catalog.default_name() {
            " (default)"
        } else {
            ""
        };
        writeln!(
            out,
            "{:<width$}  v{}  {}{}",
            preset.name,
            preset.version,
            preset.description,
            marker,
            width = width
        )?;
    }
    Ok(())
}
