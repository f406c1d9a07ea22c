//! Named, versioned ESLint configuration presets.
//!
//! A catalog is described by a `presets.json` manifest listing each preset's
//! metadata, dependencies and template file, plus the shared config file name
//! and `package.json` scripts. The built-in catalog is compiled into the
//! binary from the `presets/` directory; an external catalog with the same
//! layout can be loaded from disk.

use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Component, Path};

use crate::runtime::Runtime;

pub const MANIFEST_FILE: &str = "presets.json";

const EMBEDDED_MANIFEST: &str = include_str!("../../presets/presets.json");

const EMBEDDED_TEMPLATES: &[(&str, &str)] = &[
    ("base.mjs", include_str!("../../presets/base.mjs")),
    ("react.mjs", include_str!("../../presets/react.mjs")),
    ("strict.mjs", include_str!("../../presets/strict.mjs")),
];

#[derive(Debug, Deserialize)]
struct CatalogManifest {
    default: String,
    config_file: String,
    scripts: serde_json::Map<String, serde_json::Value>,
    presets: Vec<PresetEntry>,
}

#[derive(Debug, Deserialize)]
struct PresetEntry {
    name: String,
    version: u32,
    #[serde(default)]
    description: String,
    template: String,
    #[serde(default)]
    dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub name: String,
    pub version: u32,
    pub description: String,
    pub dependencies: Vec<String>,
    /// Written verbatim to the config file.
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
    default_index: usize,
    config_file: String,
    scripts: Vec<(String, String)>,
}

impl PresetCatalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_manifest(EMBEDDED_MANIFEST, |template| {
            EMBEDDED_TEMPLATES
                .iter()
                .find(|(name, _)| *name == template)
                .map(|(_, content)| content.to_string())
                .ok_or_else(|| anyhow!("Template '{}' is not embedded", template))
        })
        .context("Built-in preset catalog is invalid")
    }

    /// Load a catalog from `dir/presets.json`, resolving templates relative to `dir`.
    #[tracing::instrument(skip(runtime))]
    pub fn from_dir<R: Runtime>(runtime: &R, dir: &Path) -> Result<Self> {
        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = runtime.read_to_string(&manifest_path)?;
        Self::from_manifest(&manifest, |template| {
            if !is_contained(template) {
                bail!("Template path '{}' must stay inside {}", template, dir.display());
            }
            runtime.read_to_string(&dir.join(template))
        })
        .with_context(|| format!("Invalid preset catalog at {}", manifest_path.display()))
    }

    fn from_manifest<F>(manifest: &str, mut load_template: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let manifest: CatalogManifest =
            serde_json::from_str(manifest).context("Failed to parse preset manifest")?;

        if manifest.config_file.trim().is_empty() {
            bail!("config_file must not be empty");
        }
        if !is_contained(&manifest.config_file) {
            bail!(
                "config_file '{}' must stay inside the project directory",
                manifest.config_file
            );
        }

        let scripts = manifest
            .scripts
            .into_iter()
            .map(|(name, value)| match value {
                serde_json::Value::String(command) => Ok((name, command)),
                _ => bail!("Script '{}' must be a string", name),
            })
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        let mut presets = Vec::with_capacity(manifest.presets.len());
        for entry in manifest.presets {
            if !seen.insert(entry.name.clone()) {
                bail!("Duplicate preset '{}'", entry.name);
            }
            if entry.version == 0 {
                bail!("Preset '{}' must have a version of at least 1", entry.name);
            }
            let content = load_template(&entry.template)
                .with_context(|| format!("Failed to load template for preset '{}'", entry.name))?;
            debug!("Loaded preset {} v{}", entry.name, entry.version);
            presets.push(Preset {
                name: entry.name,
                version: entry.version,
                description: entry.description,
                dependencies: entry.dependencies,
                content,
            });
        }

        let default_index = presets
            .iter()
            .position(|p| p.name == manifest.default)
            .ok_or_else(|| anyhow!("Default preset '{}' is not defined", manifest.default))?;

        Ok(Self {
            presets,
            default_index,
            config_file: manifest.config_file,
            scripts,
        })
    }

    pub fn get(&self, name: &str) -> Result<&Preset> {
        self.presets.iter().find(|p| p.name == name).ok_or_else(|| {
            anyhow!(
                "Unknown preset '{}'. Available presets: {}",
                name,
                self.names().join(", ")
            )
        })
    }

    pub fn default_preset(&self) -> &Preset {
        &self.presets[self.default_index]
    }

    pub fn default_name(&self) -> &str {
        &self.default_preset().name
    }

    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    /// File name of the generated config, relative to the project directory.
    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Scripts added to `package.json`, in manifest order.
    pub fn scripts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.scripts.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A relative path with no `..` component, so joining it onto a directory
/// cannot leave that directory.
fn is_contained(path: &str) -> bool {
    let path = Path::new(path);
    !path.is_absolute()
        && !path.has_root()
        && !path.components().any(|c| matches!(c, Component::ParentDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use std::path::PathBuf;

    #[test]
    fn test_embedded_catalog() {
        let catalog = PresetCatalog::embedded().unwrap();
        assert_eq!(catalog.names(), ["base", "react", "strict"]);
        assert_eq!(catalog.default_name(), "strict");
        assert_eq!(catalog.default_preset().name, "strict");
        assert_eq!(catalog.config_file(), "eslint.config.mjs");

        let scripts: Vec<_> = catalog.scripts().collect();
        assert_eq!(
            scripts,
            [
                (
                    "lint",
                    "eslint . --cache --cache-location=.cache/.eslintcache --cache-strategy metadata"
                ),
                (
                    "lint:fix",
                    "eslint --fix . --cache --cache-location=.cache/.eslintcache --cache-strategy metadata"
                ),
            ]
        );
    }

    #[test]
    fn test_embedded_preset_contents() {
        let catalog = PresetCatalog::embedded().unwrap();

        let react = catalog.get("react").unwrap();
        assert!(react.content.starts_with("// eslint.config.mjs\n"));
        assert!(react.content.contains("pluginReact.configs.flat.recommended"));
        assert_eq!(
            react.dependencies,
            ["@eslint/js", "eslint", "globals", "eslint-plugin-react", "typescript-eslint"]
        );

        let strict = catalog.get("strict").unwrap();
        assert!(strict.content.starts_with("import pluginJs from '@eslint/js';\n"));
        assert!(strict.content.ends_with("];\n"));
        assert!(strict.content.contains("'import/order'"));
        assert_eq!(strict.dependencies.len(), 7);
        assert!(strict.dependencies.iter().any(|d| d == "eslint-plugin-react-hooks"));

        let base = catalog.get("base").unwrap();
        assert_eq!(base.dependencies, ["@eslint/js", "eslint", "globals"]);
    }

    #[test]
    fn test_unknown_preset_lists_available() {
        let catalog = PresetCatalog::embedded().unwrap();
        let err = catalog.get("airbnb").unwrap_err().to_string();
        assert!(err.contains("Unknown preset 'airbnb'"));
        assert!(err.contains("base, react, strict"));
    }

    fn manifest(default: &str, presets: &str) -> String {
        format!(
            r#"{{"default": "{}", "config_file": "eslint.config.mjs", "scripts": {{"lint": "eslint ."}}, "presets": [{}]}}"#,
            default, presets
        )
    }

    fn load(manifest: &str) -> Result<PresetCatalog> {
        PresetCatalog::from_manifest(manifest, |t| Ok(format!("// {}\n", t)))
    }

    #[test]
    fn test_validation() {
        let one = r#"{"name": "a", "version": 1, "template": "a.mjs"}"#;

        let catalog = load(&manifest("a", one)).unwrap();
        assert_eq!(catalog.get("a").unwrap().content, "// a.mjs\n");
        assert!(catalog.get("a").unwrap().dependencies.is_empty());

        let err = load(&manifest("b", one)).unwrap_err();
        assert!(err.to_string().contains("Default preset 'b'"));

        let err = load(&manifest("a", &format!("{},{}", one, one))).unwrap_err();
        assert!(err.to_string().contains("Duplicate preset 'a'"));

        let zero = r#"{"name": "a", "version": 0, "template": "a.mjs"}"#;
        assert!(load(&manifest("a", zero)).is_err());

        assert!(load("{}").is_err());
    }

    #[test]
    fn test_non_string_script_rejected() {
        let manifest = r#"{"default": "a", "config_file": "x.mjs", "scripts": {"lint": 1},
            "presets": [{"name": "a", "version": 1, "template": "a.mjs"}]}"#;
        let err = load(manifest).unwrap_err();
        assert!(err.to_string().contains("Script 'lint'"));
    }

    #[test]
    fn test_from_dir() {
        let dir = PathBuf::from("/opt/presets");
        let mut runtime = MockRuntime::new();
        runtime.expect_read_to_string().returning(|path| {
            match path.file_name().and_then(|n| n.to_str()) {
                Some("presets.json") => Ok(r#"{
                    "default": "team",
                    "config_file": "eslint.config.js",
                    "scripts": {},
                    "presets": [{"name": "team", "version": 3, "template": "team.js"}]
                }"#
                .to_string()),
                Some("team.js") => Ok("export default [];\n".to_string()),
                _ => Err(anyhow!("unexpected read of {:?}", path)),
            }
        });

        let catalog = PresetCatalog::from_dir(&runtime, &dir).unwrap();
        let team = catalog.get("team").unwrap();
        assert_eq!(team.version, 3);
        assert_eq!(team.content, "export default [];\n");
        assert_eq!(catalog.config_file(), "eslint.config.js");
        assert_eq!(catalog.scripts().count(), 0);
    }

    #[test]
    fn test_from_dir_rejects_escaping_template() {
        let mut runtime = MockRuntime::new();
        runtime.expect_read_to_string().returning(|_| {
            Ok(r#"{"default": "a", "config_file": "x.mjs", "scripts": {},
                "presets": [{"name": "a", "version": 1, "template": "../secret"}]}"#
                .to_string())
        });
        assert!(PresetCatalog::from_dir(&runtime, Path::new("/opt/presets")).is_err());
    }

    #[test]
    fn test_from_dir_accepts_dotted_template_name() {
        let mut runtime = MockRuntime::new();
        runtime.expect_read_to_string().returning(|path| {
            match path.file_name().and_then(|n| n.to_str()) {
                Some("presets.json") => Ok(r#"{"default": "team", "config_file": "x.mjs", "scripts": {},
                    "presets": [{"name": "team", "version": 2, "template": "team..v2.mjs"}]}"#
                    .to_string()),
                Some("team..v2.mjs") => Ok("export default [];\n".to_string()),
                _ => Err(anyhow!("unexpected read of {:?}", path)),
            }
        });

        let catalog = PresetCatalog::from_dir(&runtime, Path::new("/opt/presets")).unwrap();
        assert_eq!(catalog.default_preset().content, "export default [];\n");
    }

    #[test]
    fn test_config_file_must_stay_in_project() {
        let catalog = |config_file: &str| {
            load(&format!(
                r#"{{"default": "a", "config_file": "{}", "scripts": {{}},
                    "presets": [{{"name": "a", "version": 1, "template": "a.mjs"}}]}}"#,
                config_file
            ))
        };

        for escaping in ["../eslint.config.mjs", "conf/../../eslint.config.mjs", "/etc/eslint.config.mjs"] {
            let err = catalog(escaping).unwrap_err();
            assert!(err.to_string().contains("must stay inside"), "accepted {}", escaping);
        }
        assert_eq!(catalog("conf/eslint..config.mjs").unwrap().config_file(), "conf/eslint..config.mjs");
    }

    #[test]
    fn test_default_preset_follows_manifest_default() {
        let two = r#"{"name": "a", "version": 1, "template": "a.mjs"},
            {"name": "b", "version": 1, "template": "b.mjs"}"#;
        let catalog = load(&manifest("b", two)).unwrap();
        assert_eq!(catalog.default_preset().name, "b");
        assert_eq!(catalog.default_preset().content, "// b.mjs\n");
        assert_eq!(catalog.default_name(), "b");
    }
}
