use anyhow::Result;

use vipsgen_core::report::render_coverage;

use super::CommandContext;

pub fn coverage_command(ctx: &CommandContext) -> Result<()> {
    let ops = ctx.discover_operations()?;
    print!("{}", render_coverage(&ops, &ctx.policy));
    Ok(())
}
