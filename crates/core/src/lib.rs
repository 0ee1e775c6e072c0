//! vipsgen - introspection-driven libvips binding generator
//!
//! This crate provides functionality to:
//! - Discover libvips operations and enum types through a reflection back-end
//! - Decide which operations are generated and how they are categorised
//! - Emit a C shim (source + header) and a cgo bridge from one operation list
//! - Write the artifacts idempotently and report what changed
pub mod config;
pub mod emit;
pub mod error;
pub mod generator;
pub mod introspect;
pub mod mapper;
pub mod policy;
pub mod report;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use config::{Config, ConfigLoader, GeneratorConfig, PolicyConfig};
pub use generator::{GenerationReport, Generator, WriteStatus};
pub use introspect::{
    Introspector, NativeReflection, RawRegistry, Reflection, SnapshotReflection,
    collect_enum_types,
};
#[cfg(feature = "bundled-shim")]
pub use introspect::LinkedReflection;
pub use policy::Policy;
