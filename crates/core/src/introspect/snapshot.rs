//! Registry replay from a JSON snapshot
//!
//! Lets generation, listings and tests run on machines without libvips. A
//! snapshot is normally captured with `vipsgen snapshot` against the real
//! library, but hand-written files work too since argument types may be given
//! by name.

use std::path::Path;

use super::Reflection;
use super::raw::{RawEnum, RawOperation, RawRegistry};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct SnapshotReflection {
    registry: RawRegistry,
}

impl SnapshotReflection {
    pub fn new(registry: RawRegistry) -> Self {
        Self { registry }
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let registry: RawRegistry = serde_json::from_str(contents).map_err(|e| {
            Error::IntrospectionError(format!("Failed to parse registry snapshot: {e}"))
        })?;
        Ok(Self::new(registry))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::IntrospectionError(format!(
                "Failed to read registry snapshot {}: {e}",
                path.display()
            ))
        })?;
        tracing::debug!("Loaded registry snapshot from {:?}", path);
        Self::from_json(&contents)
    }

    pub fn registry(&self) -> &RawRegistry {
        &self.registry
    }
}

impl Reflection for SnapshotReflection {
    fn operations(&self) -> Result<Vec<RawOperation>> {
        Ok(self.registry.operations.clone())
    }

    fn enum_values(&self, type_name: &str) -> Result<RawEnum> {
        self.registry
            .enums
            .iter()
            .find(|e| e.name == type_name)
            .cloned()
            .ok_or_else(|| {
                Error::EnumIntrospectionError(format!(
                    "enum type {type_name} is not in the registry snapshot"
                ))
            })
    }
}

/// Write a registry as pretty JSON.
pub fn save_registry(registry: &RawRegistry, path: &Path) -> Result<()> {
    let contents = serde_json::to_string_pretty(registry)?;
    std::fs::write(path, contents).map_err(|source| Error::WriteError {
        path: path.to_path_buf(),
        source,
    })
}
