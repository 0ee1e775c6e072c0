//! Artifact emitters
//!
//! Three emitters render the shim source, the shim header and the Go bridge
//! from the same filtered, sorted operation list. Emission is pure: each
//! emitter returns the full file contents and the generator decides whether
//! to write them.

pub mod bridge;
pub mod shape;
pub mod shim_header;
pub mod shim_source;

pub use bridge::BridgeEmitter;
pub use shape::{CallSlot, OperationShape};
pub use shim_header::ShimHeaderEmitter;
pub use shim_source::ShimSourceEmitter;

use crate::config::GeneratorConfig;
use crate::policy::Policy;
use crate::types::OperationSignature;

/// First line of every generated artifact.
pub const GENERATED_BANNER: &str = "// Code generated by vipsgen. DO NOT EDIT.";

/// What an emitter needs besides the operations.
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
    pub policy: &'a Policy,
    pub config: &'a GeneratorConfig,
}

impl<'a> EmitContext<'a> {
    pub fn new(policy: &'a Policy, config: &'a GeneratorConfig) -> Self {
        Self { policy, config }
    }
}

pub trait Emitter {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// File name of the artifact inside the output directory.
    fn file_name<'c>(&self, config: &'c GeneratorConfig) -> &'c str;

    fn emit(&self, ops: &[OperationSignature], ctx: &EmitContext<'_>) -> String;
}

/// The emitters in the order their artifacts are written.
pub fn all_emitters() -> Vec<Box<dyn Emitter>> {
    vec![
        Box::new(ShimSourceEmitter),
        Box::new(ShimHeaderEmitter),
        Box::new(BridgeEmitter),
    ]
}
