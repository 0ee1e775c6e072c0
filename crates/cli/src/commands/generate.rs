use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use vipsgen_core::{GenerationReport, Generator};

use super::CommandContext;

pub fn generate_command(ctx: &CommandContext, output: Option<&Path>) -> Result<()> {
    let ops = ctx.discover_operations()?;

    let generator_config = ctx.config.generator.clone();
    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| generator_config.output_dir.clone());
    info!("Output directory: {}", output_dir.display());

    let generator = Generator::new(ctx.policy.clone(), generator_config);
    let report = generator
        .generate(&ops, &output_dir)
        .with_context(|| format!("Failed to generate into {}", output_dir.display()))?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &GenerationReport) {
    for path in &report.removed {
        println!("  removed   {}", path.display());
    }
    for artifact in &report.artifacts {
        println!(
            "  {:<9} {} ({})",
            artifact.status.to_string(),
            artifact.path.display(),
            artifact.digest
        );
    }
    println!(
        "Generated {} operations into {} ({} files modified)",
        report.operation_count,
        report.output_dir.display(),
        report.files_modified()
    );
}
