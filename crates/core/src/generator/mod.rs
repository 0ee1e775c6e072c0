//! Generation driver
//!
//! Filters and sorts the discovered operations, renders the three artifacts
//! and writes each one only when its content changed.

mod files;

pub use files::{WriteStatus, digest, remove_stale_files, write_if_changed};

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::emit::{self, EmitContext};
use crate::error::Result;
use crate::mapper;
use crate::policy::Policy;
use crate::types::OperationSignature;

/// One rendered artifact, not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub emitter: &'static str,
    pub file_name: String,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactOutcome {
    pub path: PathBuf,
    pub status: WriteStatus,
    /// md5 of the rendered content
    pub digest: String,
}

/// What a generation run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    pub operation_count: usize,
    pub artifacts: Vec<ArtifactOutcome>,
    pub removed: Vec<PathBuf>,
}

impl GenerationReport {
    /// Artifacts rewritten plus stale files removed.
    pub fn files_modified(&self) -> usize {
        self.artifacts
            .iter()
            .filter(|a| a.status == WriteStatus::Written)
            .count()
            + self.removed.len()
    }
}

/// Drives generation with an injected policy and output settings.
#[derive(Debug, Clone)]
pub struct Generator {
    policy: Policy,
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(policy: Policy, config: GeneratorConfig) -> Self {
        Self { policy, config }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Operations that will be emitted, with their category classified and
    /// sorted by name. Order is re-established here regardless of upstream.
    pub fn select(&self, ops: &[OperationSignature]) -> Vec<OperationSignature> {
        let mut selected: Vec<OperationSignature> = ops
            .iter()
            .filter(|op| {
                let keep = self.policy.is_generated(op);
                if !keep {
                    debug!("Skipping operation: {}", op.name);
                }
                keep
            })
            .map(|op| {
                let mut op = op.clone();
                op.category = self.policy.classify_category(&op.name, &op.category);
                op
            })
            .collect();
        selected.sort_by(|a, b| a.name.cmp(&b.name));
        selected
    }

    /// Render every artifact for already-selected operations.
    pub fn render(&self, ops: &[OperationSignature]) -> Vec<RenderedArtifact> {
        let ctx = EmitContext::new(&self.policy, &self.config);
        emit::all_emitters()
            .iter()
            .map(|emitter| RenderedArtifact {
                emitter: emitter.name(),
                file_name: emitter.file_name(&self.config).to_string(),
                contents: emitter.emit(ops, &ctx),
            })
            .collect()
    }

    /// Generate into `output_dir`. The directory must exist; a missing one
    /// surfaces as a write error.
    pub fn generate(&self, ops: &[OperationSignature], output_dir: &Path) -> Result<GenerationReport> {
        let removed = remove_stale_files(output_dir, &self.config.stale_prefix, &self.config.preserve);

        let selected = self.select(ops);
        info!(
            "Generating {} of {} operations into {}",
            selected.len(),
            ops.len(),
            output_dir.display()
        );
        for op in &selected {
            for arg in &op.args {
                if let Some(note) = mapper::unmapped_note(arg, &self.policy) {
                    warn!("{}: {}", op.name, note);
                }
            }
        }

        let mut artifacts = Vec::new();
        for artifact in self.render(&selected) {
            let path = output_dir.join(&artifact.file_name);
            let status = write_if_changed(&path, &artifact.contents)?;
            debug!("{} {}: {}", artifact.emitter, path.display(), status);
            artifacts.push(ArtifactOutcome {
                path,
                status,
                digest: digest(&artifact.contents),
            });
        }

        Ok(GenerationReport {
            output_dir: output_dir.to_path_buf(),
            operation_count: selected.len(),
            artifacts,
            removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::FOREIGN_CATEGORY;
    use crate::types::{ArgFlags, ArgKind, ArgumentSignature};
    use tempfile::TempDir;

    fn op(name: &str, category: &str) -> OperationSignature {
        OperationSignature::new(name, format!("{name} operation"), category)
            .with_arg(ArgumentSignature::new("in", ArgKind::Image, ArgFlags::INPUT | ArgFlags::REQUIRED, 1))
            .with_arg(ArgumentSignature::new("out", ArgKind::Image, ArgFlags::OUTPUT | ArgFlags::REQUIRED, 2))
    }

    fn generator() -> Generator {
        let policy = Policy::empty()
            .exclude("composite")
            .with_category_alias("VipsForeign", FOREIGN_CATEGORY)
            .with_category_alias("VipsConversion", "conversion")
            .with_category_override("flip", "geometry");
        Generator::new(policy, GeneratorConfig::default())
    }

    #[test]
    fn test_select_filters_classifies_and_sorts() {
        let ops = vec![
            op("invert", "VipsArithmetic"),
            op("flip", "VipsConversion"),
            op("composite", "VipsConversion"),
            op("pngload", "VipsForeign"),
            op("copy", "VipsConversion"),
        ];
        let selected = generator().select(&ops);

        let names: Vec<_> = selected.iter().map(|op| op.name.as_str()).collect();
        assert_eq!(names, vec!["copy", "flip", "invert"]);
        assert_eq!(selected[0].category, "conversion");
        assert_eq!(selected[1].category, "geometry");
        assert_eq!(selected[2].category, "VipsArithmetic");
    }

    #[test]
    fn test_render_produces_three_artifacts() {
        let generator = generator();
        let artifacts = generator.render(&generator.select(&[op("invert", "arithmetic")]));

        let files: Vec<_> = artifacts.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(files, vec!["generated.c", "generated.h", "generated.go"]);
        assert!(artifacts.iter().all(|a| a.contents.contains("invert")));
    }

    #[test]
    fn test_generate_reports_outcomes() -> Result<()> {
        let temp_dir = TempDir::new()?;
        std::fs::write(temp_dir.path().join("gen_arithmetic.go"), "package vips\n")?;
        let ops = vec![op("invert", "arithmetic"), op("copy", "conversion")];

        let report = generator().generate(&ops, temp_dir.path())?;
        assert_eq!(report.operation_count, 2);
        assert_eq!(report.removed, vec![temp_dir.path().join("gen_arithmetic.go")]);
        assert_eq!(report.files_modified(), 4);
        assert!(report.artifacts.iter().all(|a| a.digest.len() == 32));

        let rerun = generator().generate(&ops, temp_dir.path())?;
        assert_eq!(rerun.files_modified(), 0);
        assert!(rerun.artifacts.iter().all(|a| a.status == WriteStatus::Unchanged));
        assert_eq!(
            report.artifacts.iter().map(|a| &a.digest).collect::<Vec<_>>(),
            rerun.artifacts.iter().map(|a| &a.digest).collect::<Vec<_>>()
        );
        Ok(())
    }

    #[test]
    fn test_missing_output_directory_is_a_write_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = generator()
            .generate(&[op("invert", "arithmetic")], &temp_dir.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::WriteError { .. }));
    }
}
