//! Exclusion and classification policy
//!
//! Decides which discovered operations are generated, which category each
//! belongs to and which bridge type an enum GType maps to. The tables are
//! plain data: `Policy::builtin()` builds them once and the result is passed
//! to whoever needs it, so tests can build their own.

pub mod builtin;

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::config::PolicyConfig;
use crate::types::OperationSignature;

/// Category of the format load/save family, which is never generated.
pub const FOREIGN_CATEGORY: &str = "foreign";

/// Minimum libvips version that registers an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MinVersion {
    pub major: u32,
    pub minor: u32,
}

impl fmt::Display for MinVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Policy {
    exclusions: BTreeSet<String>,
    category_overrides: HashMap<String, String>,
    category_normalization: HashMap<String, String>,
    enum_names: HashMap<String, String>,
    version_gates: HashMap<String, MinVersion>,
}

impl Policy {
    /// Policy with no exclusions, overrides or mappings.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in tables for libvips.
    pub fn builtin() -> Self {
        let mut policy = Self::empty();

        for name in builtin::FOREIGN_OPERATIONS.iter().chain(builtin::SPECIAL_EXCLUSIONS) {
            policy.exclusions.insert((*name).to_string());
        }
        for (op, category) in builtin::CATEGORY_OVERRIDES {
            policy
                .category_overrides
                .insert((*op).to_string(), (*category).to_string());
        }
        for (class_name, category) in builtin::CATEGORY_FAMILIES {
            policy
                .category_normalization
                .insert((*class_name).to_string(), (*category).to_string());
            policy
                .category_normalization
                .insert((*category).to_string(), (*category).to_string());
        }
        for (native, bridge) in builtin::ENUM_NAMES {
            policy
                .enum_names
                .insert((*native).to_string(), (*bridge).to_string());
        }
        for (op, (major, minor)) in builtin::VERSION_GATES {
            policy.version_gates.insert(
                (*op).to_string(),
                MinVersion {
                    major: *major,
                    minor: *minor,
                },
            );
        }

        policy
    }

    /// Layer user configuration over this policy.
    pub fn with_overrides(mut self, config: &PolicyConfig) -> Self {
        for name in &config.exclude {
            self.exclusions.insert(name.clone());
        }
        for name in &config.include {
            self.exclusions.remove(name);
        }
        for (op, category) in &config.category_overrides {
            self.category_overrides.insert(op.clone(), category.clone());
        }
        for (native, bridge) in &config.enum_names {
            self.enum_names.insert(native.clone(), bridge.clone());
        }
        self
    }

    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.exclusions.insert(name.into());
        self
    }

    pub fn with_category_override(mut self, op: impl Into<String>, category: impl Into<String>) -> Self {
        self.category_overrides.insert(op.into(), category.into());
        self
    }

    pub fn with_category_alias(mut self, raw: impl Into<String>, category: impl Into<String>) -> Self {
        self.category_normalization.insert(raw.into(), category.into());
        self
    }

    pub fn with_enum_name(mut self, native: impl Into<String>, bridge: impl Into<String>) -> Self {
        self.enum_names.insert(native.into(), bridge.into());
        self
    }

    pub fn with_version_gate(mut self, op: impl Into<String>, major: u32, minor: u32) -> Self {
        self.version_gates.insert(op.into(), MinVersion { major, minor });
        self
    }

    pub fn is_excluded(&self, op_name: &str) -> bool {
        self.exclusions.contains(op_name)
    }

    /// Excluded operation names in sorted order.
    pub fn exclusions(&self) -> impl Iterator<Item = &str> {
        self.exclusions.iter().map(String::as_str)
    }

    /// Map a raw reflection category to its canonical name. Unrecognised
    /// categories pass through unchanged.
    pub fn normalize_category(&self, raw: &str) -> String {
        self.category_normalization
            .get(raw)
            .cloned()
            .unwrap_or_else(|| raw.to_string())
    }

    /// Category of an operation: the per-operation override if there is one,
    /// else the normalised reflection category.
    pub fn classify_category(&self, op_name: &str, raw: &str) -> String {
        match self.category_overrides.get(op_name) {
            Some(category) => category.clone(),
            None => self.normalize_category(raw),
        }
    }

    /// Bridge type name for an enum GType, if one is mapped.
    pub fn enum_type_name(&self, native: &str) -> Option<&str> {
        self.enum_names.get(native).map(String::as_str)
    }

    /// Informational only: no version guards are generated.
    pub fn min_version(&self, op_name: &str) -> Option<MinVersion> {
        self.version_gates.get(op_name).copied()
    }

    /// Whether the driver emits this operation.
    pub fn is_generated(&self, op: &OperationSignature) -> bool {
        !self.is_excluded(&op.name)
            && self.classify_category(&op.name, &op.category) != FOREIGN_CATEGORY
    }
}
