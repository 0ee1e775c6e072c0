use crate::{
    error::{Error, Result},
    policy::Policy,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Contents of a `vipsgen.json` file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    pub generator: GeneratorConfig,
    pub policy: PolicyConfig,
}

/// Where the artifacts go and how they are named
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GeneratorConfig {
    pub output_dir: PathBuf,
    pub source_file: String,
    pub header_file: String,
    pub bridge_file: String,
    /// Go package of the bridge file
    pub package: String,
    /// Prefix of legacy generated files that are removed before generating
    pub stale_prefix: String,
    /// Hand-maintained files that share the stale prefix
    pub preserve: Vec<String>,
    pub doc_base_url: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("vips"),
            source_file: "generated.c".to_string(),
            header_file: "generated.h".to_string(),
            bridge_file: "generated.go".to_string(),
            package: "vips".to_string(),
            stale_prefix: "gen_".to_string(),
            preserve: vec!["gen_enum_extras.go".to_string()],
            doc_base_url: "https://www.libvips.org/API/current".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Include guard derived from the header file name, e.g. `GENERATED_H`.
    pub fn header_guard(&self) -> String {
        self.header_file
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let files = [&self.source_file, &self.header_file, &self.bridge_file];
        if files.iter().any(|f| f.is_empty()) {
            return Err(Error::ConfigError(
                "Artifact file names must not be empty".to_string(),
            ));
        }
        if files[0] == files[1] || files[0] == files[2] || files[1] == files[2] {
            return Err(Error::ConfigError(
                "Artifact file names must be distinct".to_string(),
            ));
        }
        if self.package.is_empty() {
            return Err(Error::ConfigError("Bridge package must not be empty".to_string()));
        }
        if !self.stale_prefix.is_empty()
            && files.iter().any(|f| f.starts_with(&self.stale_prefix))
        {
            return Err(Error::ConfigError(format!(
                "Artifact file names must not start with the stale prefix '{}'",
                self.stale_prefix
            )));
        }
        Ok(())
    }
}

/// Adjustments layered over the built-in policy tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PolicyConfig {
    /// Extra operations to exclude
    pub exclude: Vec<String>,
    /// Operations to remove from the built-in exclusions
    pub include: Vec<String>,
    pub category_overrides: BTreeMap<String, String>,
    pub enum_names: BTreeMap<String, String>,
}

impl Config {
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))?;
        config.generator.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Built-in policy with this config's adjustments applied.
    pub fn policy(&self) -> Policy {
        Policy::builtin().with_overrides(&self.policy)
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            for name in ["vipsgen.json", ".vipsgen.json"] {
                let config_path = current.join(name);
                if config_path.exists() {
                    return Some(config_path);
                }
            }

            current = current.parent()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.generator.output_dir, PathBuf::from("vips"));
        assert_eq!(config.generator.header_guard(), "GENERATED_H");
        assert_eq!(config.generator.preserve, vec!["gen_enum_extras.go"]);
        assert!(config.generator.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(
            r#"{
                "generator": { "output_dir": "out", "package": "vipsbind" },
                "policy": { "exclude": ["gaussblur"], "enum_names": { "VipsAccess": "Access" } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.generator.output_dir, PathBuf::from("out"));
        assert_eq!(config.generator.package, "vipsbind");
        assert_eq!(config.generator.source_file, "generated.c");

        let policy = config.policy();
        assert!(policy.is_excluded("gaussblur"));
        assert!(policy.is_excluded("jpegload"));
        assert_eq!(policy.enum_type_name("VipsAccess"), Some("Access"));
    }

    #[test]
    fn test_rejects_clashing_file_names() {
        let err = Config::from_json(r#"{ "generator": { "header_file": "generated.c" } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("distinct"));

        let err = Config::from_json(r#"{ "generator": { "bridge_file": "gen_bridge.go" } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("stale prefix"));
    }

    #[test]
    fn test_malformed_json() {
        let err = Config::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_save_and_find() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let nested = temp_dir.path().join("a/b");
        std::fs::create_dir_all(&nested)?;

        let mut config = Config::default();
        config.policy.include.push("embed".to_string());
        config.save_to_file(&temp_dir.path().join("vipsgen.json"))?;

        let found = Config::find_config_file(&nested).unwrap();
        assert_eq!(found, temp_dir.path().join("vipsgen.json"));
        assert_eq!(Config::load_from_file(&found)?, config);
        Ok(())
    }
}
