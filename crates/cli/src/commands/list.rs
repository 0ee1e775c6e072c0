use anyhow::Result;

use vipsgen_core::report::render_operation_list;

use super::CommandContext;

pub fn list_command(ctx: &CommandContext, category: Option<&str>) -> Result<()> {
    let ops = ctx.discover_operations()?;
    print!("{}", render_operation_list(&ops, &ctx.policy, category));
    Ok(())
}
