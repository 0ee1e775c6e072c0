use anyhow::{Context, Result};
use tracing::debug;

use vipsgen_core::{
    Config, ConfigLoader, Introspector, NativeReflection, OperationSignature, Policy, Reflection,
    SnapshotReflection,
};
#[cfg(feature = "bundled-shim")]
use vipsgen_core::LinkedReflection;

use crate::cli::GlobalArgs;

/// Config, policy and registry access shared by every command
pub struct CommandContext {
    pub config: Config,
    pub policy: Policy,
    pub introspector: Introspector<Box<dyn Reflection>>,
}

impl CommandContext {
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let config = ConfigLoader::load(args.config.as_deref()).context("Failed to load config")?;
        let policy = config.policy();

        let reflection: Box<dyn Reflection> = match (&args.registry, &args.library) {
            (Some(path), _) => {
                debug!("Reading registry snapshot: {}", path.display());
                Box::new(SnapshotReflection::load_from_file(path)?)
            }
            (None, Some(path)) => {
                debug!("Loading introspection library: {}", path.display());
                Box::new(NativeReflection::open(path)?)
            }
            (None, None) => default_reflection()?,
        };

        Ok(Self {
            config,
            policy,
            introspector: Introspector::new(reflection),
        })
    }

    pub fn discover_operations(&self) -> Result<Vec<OperationSignature>> {
        let ops = self
            .introspector
            .discover_operations()
            .context("Failed to introspect operations")?;
        debug!("Discovered {} operations", ops.len());
        Ok(ops)
    }
}

/// Registry source when neither `--registry` nor `--library` is given.
#[cfg(feature = "bundled-shim")]
fn default_reflection() -> Result<Box<dyn Reflection>> {
    debug!("Using the bundled introspection shim");
    Ok(Box::new(LinkedReflection::new()))
}

/// Registry source when neither `--registry` nor `--library` is given.
#[cfg(not(feature = "bundled-shim"))]
fn default_reflection() -> Result<Box<dyn Reflection>> {
    let reflection = NativeReflection::open_default().context(
        "No registry source: pass --registry FILE or --library PATH, \
         or build vipsgen with --features bundled-shim",
    )?;
    Ok(Box::new(reflection))
}
