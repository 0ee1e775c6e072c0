use std::path::Path;

use anyhow::{Context, Result};

use vipsgen_core::introspect::snapshot::save_registry;

use super::CommandContext;

pub fn snapshot_command(ctx: &CommandContext, output: &Path) -> Result<()> {
    let registry = ctx
        .introspector
        .capture_registry()
        .context("Failed to capture registry")?;
    save_registry(&registry, output)?;

    println!(
        "Wrote {} operations and {} enum types to {}",
        registry.operations.len(),
        registry.enums.len(),
        output.display()
    );
    Ok(())
}
