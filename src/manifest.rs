//! `package.json` handling.
//!
//! The manifest is kept as an order-preserving JSON object so that a rewrite
//! only changes the `scripts` entries lintup adds.

use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use serde_json::{Map, Value};
use std::path::Path;

use crate::runtime::Runtime;

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    root: Map<String, Value>,
    trailing_newline: bool,
}

impl PackageManifest {
    pub fn parse(content: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(content).context("Failed to parse package.json")?;
        let Value::Object(root) = value else {
            bail!("package.json must contain a JSON object");
        };
        Ok(Self {
            root,
            trailing_newline: content.ends_with('\n'),
        })
    }

    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        Self::parse(&content).with_context(|| format!("Invalid manifest at {}", path.display()))
    }

    pub fn scripts(&self) -> Option<&Map<String, Value>> {
        self.root.get("scripts").and_then(Value::as_object)
    }

    /// Merge `entries` into the `scripts` object, creating it when absent or null.
    /// Existing scripts with the same name are replaced in place.
    pub fn add_scripts<'e, I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'e str, &'e str)>,
    {
        let scripts = self
            .root
            .entry("scripts")
            .or_insert_with(|| Value::Object(Map::new()));
        if scripts.is_null() {
            *scripts = Value::Object(Map::new());
        }
        let scripts = scripts
            .as_object_mut()
            .ok_or_else(|| anyhow!("\"scripts\" in package.json is not an object"))?;

        for (name, command) in entries {
            debug!("Setting script {} = {}", name, command);
            scripts.insert(name.to_string(), Value::String(command.to_string()));
        }
        Ok(())
    }

    /// Two-space indented JSON, ending in a newline only if the original did.
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(&self.root)?;
        if self.trailing_newline {
            json.push('\n');
        }
        Ok(json)
    }

    /// Write through a temporary file and rename it over `path`.
    #[tracing::instrument(skip(self, runtime))]
    pub fn save<R: Runtime>(&self, runtime: &R, path: &Path) -> Result<()> {
        let json = self.to_pretty_string()?;
        let tmp_path = path.with_extension("json.tmp");
        runtime.write(&tmp_path, json.as_bytes())?;
        runtime.rename(&tmp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use std::path::PathBuf;

    const LINT: (&str, &str) = ("lint", "eslint .");
    const LINT_FIX: (&str, &str) = ("lint:fix", "eslint --fix .");

    #[test]
    fn test_add_scripts_preserves_existing() {
        let mut manifest = PackageManifest::parse(
            r#"{"name": "app", "scripts": {"build": "vite build", "lint": "old"}}"#,
        )
        .unwrap();
        manifest.add_scripts([LINT, LINT_FIX]).unwrap();

        let scripts = manifest.scripts().unwrap();
        let keys: Vec<_> = scripts.keys().map(String::as_str).collect();
        assert_eq!(keys, ["build", "lint", "lint:fix"]);
        assert_eq!(scripts["build"], "vite build");
        assert_eq!(scripts["lint"], "eslint .");
        assert_eq!(scripts["lint:fix"], "eslint --fix .");
    }

    #[test]
    fn test_add_scripts_creates_section() {
        let mut manifest = PackageManifest::parse(r#"{"name": "app"}"#).unwrap();
        manifest.add_scripts([LINT, LINT_FIX]).unwrap();

        let scripts = manifest.scripts().unwrap();
        assert_eq!(scripts.len(), 2);
        assert_eq!(scripts["lint"], "eslint .");
        assert_eq!(scripts["lint:fix"], "eslint --fix .");
    }

    #[test]
    fn test_add_scripts_replaces_null_section() {
        let mut manifest = PackageManifest::parse(r#"{"name": "app", "scripts": null}"#).unwrap();
        manifest.add_scripts([LINT, LINT_FIX]).unwrap();

        let scripts = manifest.scripts().unwrap();
        let keys: Vec<_> = scripts.keys().map(String::as_str).collect();
        assert_eq!(keys, ["lint", "lint:fix"]);
        assert_eq!(scripts["lint"], "eslint .");
        assert_eq!(scripts["lint:fix"], "eslint --fix .");
    }

    #[test]
    fn test_add_scripts_rejects_non_object_scripts() {
        for scripts in [r#""npm test""#, "[]", "42", "true"] {
            let mut manifest =
                PackageManifest::parse(&format!(r#"{{"scripts": {}}}"#, scripts)).unwrap();
            assert!(manifest.add_scripts([LINT]).is_err(), "accepted {}", scripts);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(PackageManifest::parse("not json").is_err());
        assert!(PackageManifest::parse("[1, 2]").is_err());
    }

    #[test]
    fn test_pretty_output_keeps_key_order_and_indent() {
        let mut manifest = PackageManifest::parse(
            "{\"version\": \"1.0.0\", \"name\": \"app\", \"private\": true}\n",
        )
        .unwrap();
        manifest.add_scripts([LINT]).unwrap();

        let expected = "{\n  \"version\": \"1.0.0\",\n  \"name\": \"app\",\n  \"private\": true,\n  \"scripts\": {\n    \"lint\": \"eslint .\"\n  }\n}\n";
        assert_eq!(manifest.to_pretty_string().unwrap(), expected);
    }

    #[test]
    fn test_pretty_output_without_trailing_newline() {
        let manifest = PackageManifest::parse(r#"{"name": "app"}"#).unwrap();
        assert_eq!(manifest.to_pretty_string().unwrap(), "{\n  \"name\": \"app\"\n}");
    }

    #[test]
    fn test_save_writes_tmp_then_renames() {
        let path = PathBuf::from("/work/app/package.json");
        let tmp = PathBuf::from("/work/app/package.json.tmp");

        let mut runtime = MockRuntime::new();
        runtime
            .expect_write()
            .with(eq(tmp.clone()), eq(b"{\n  \"name\": \"app\"\n}".to_vec()))
            .times(1)
            .returning(|_, _| Ok(()));
        runtime
            .expect_rename()
            .with(eq(tmp), eq(path.clone()))
            .times(1)
            .returning(|_, _| Ok(()));

        let manifest = PackageManifest::parse(r#"{"name":"app"}"#).unwrap();
        manifest.save(&runtime, &path).unwrap();
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = PackageManifest::load(&RealRuntime, &dir.path().join(MANIFEST_FILE)).unwrap_err();
        assert!(err.to_string().contains("package.json"));
    }

    #[test]
    fn test_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "{\n  \"name\": \"app\",\n  \"scripts\": {\n    \"build\": \"tsc\"\n  }\n}\n").unwrap();

        let mut manifest = PackageManifest::load(&RealRuntime, &path).unwrap();
        manifest.add_scripts([LINT]).unwrap();
        manifest.save(&RealRuntime, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n  \"name\": \"app\",\n  \"scripts\": {\n    \"build\": \"tsc\",\n    \"lint\": \"eslint .\"\n  }\n}\n"
        );
        assert!(!dir.path().join("package.json.tmp").exists());
    }
}
