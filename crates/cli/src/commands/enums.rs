use anyhow::{Context, Result};
use tracing::debug;

use vipsgen_core::collect_enum_types;
use vipsgen_core::report::render_enum_list;

use super::CommandContext;

pub fn enums_command(ctx: &CommandContext) -> Result<()> {
    let ops = ctx.discover_operations()?;
    let enum_types = collect_enum_types(&ops);
    debug!("Referenced enum types: {:?}", enum_types);

    let enums = ctx
        .introspector
        .discover_enums(&enum_types)
        .context("Failed to introspect enums")?;
    print!("{}", render_enum_list(&enums, &ctx.policy));
    Ok(())
}
