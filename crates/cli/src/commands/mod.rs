pub mod context;
pub mod coverage;
pub mod enums;
pub mod generate;
pub mod list;
pub mod snapshot;

pub use context::CommandContext;
pub use coverage::coverage_command;
pub use enums::enums_command;
pub use generate::generate_command;
pub use list::list_command;
pub use snapshot::snapshot_command;
