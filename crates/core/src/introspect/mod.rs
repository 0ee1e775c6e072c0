//! Operation and enum discovery
//!
//! A `Reflection` back-end hands over the registry as loosely typed records.
//! `Introspector` turns them into the typed signature model straight away:
//! arguments are checked and ordered by priority, operations are sorted by
//! name and deduplicated, so everything downstream can rely on a stable shape.

pub mod native;
pub mod raw;
pub mod snapshot;

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::{
    ArgFlags, ArgKind, ArgumentSignature, EnumSignature, EnumValue, NumericBounds,
    OperationSignature,
};

pub use native::NativeReflection;
#[cfg(feature = "bundled-shim")]
pub use native::LinkedReflection;
pub use raw::{RawArgument, RawEnum, RawEnumValue, RawOperation, RawRegistry, TypeTag};
pub use snapshot::SnapshotReflection;

/// Nick of the sentinel member closing most libvips enums
const SENTINEL_NICK: &str = "last";

/// Access to the native library's runtime type registry
pub trait Reflection {
    /// Every registered operation with its arguments.
    fn operations(&self) -> Result<Vec<RawOperation>>;

    /// Members of one enum GType.
    fn enum_values(&self, type_name: &str) -> Result<RawEnum>;

    /// Members of several enum GTypes. Fails as a whole if any lookup fails.
    fn enum_values_batch(&self, type_names: &[String]) -> Result<Vec<RawEnum>> {
        type_names
            .iter()
            .map(|name| self.enum_values(name))
            .collect()
    }
}

impl<R: Reflection + ?Sized> Reflection for Box<R> {
    fn operations(&self) -> Result<Vec<RawOperation>> {
        (**self).operations()
    }

    fn enum_values(&self, type_name: &str) -> Result<RawEnum> {
        (**self).enum_values(type_name)
    }

    fn enum_values_batch(&self, type_names: &[String]) -> Result<Vec<RawEnum>> {
        (**self).enum_values_batch(type_names)
    }
}

pub struct Introspector<R> {
    reflection: R,
}

impl<R: Reflection> Introspector<R> {
    pub fn new(reflection: R) -> Self {
        Self { reflection }
    }

    pub fn reflection(&self) -> &R {
        &self.reflection
    }

    /// Discover all operations, sorted by name with duplicate nicknames removed.
    pub fn discover_operations(&self) -> Result<Vec<OperationSignature>> {
        let raw = self.reflection.operations()?;
        debug!("Reflection returned {} operations", raw.len());

        let mut ops: Vec<OperationSignature> = raw.into_iter().map(convert_operation).collect();

        // Stable: among equal names the first discovered stays first.
        ops.sort_by(|a, b| a.name.cmp(&b.name));

        let before = ops.len();
        ops.dedup_by(|later, earlier| later.name == earlier.name);
        if ops.len() != before {
            debug!("Dropped {} duplicate operation nicknames", before - ops.len());
        }

        Ok(ops)
    }

    pub fn discover_enum(&self, type_name: &str) -> Result<EnumSignature> {
        let raw = self.reflection.enum_values(type_name)?;
        Ok(convert_enum(raw))
    }

    /// Discover several enum types in one call, all or nothing.
    pub fn discover_enums(&self, type_names: &[String]) -> Result<Vec<EnumSignature>> {
        if type_names.is_empty() {
            return Ok(Vec::new());
        }

        let raw = self.reflection.enum_values_batch(type_names)?;
        if raw.len() != type_names.len() {
            return Err(Error::EnumIntrospectionError(format!(
                "requested {} enum types but received {}",
                type_names.len(),
                raw.len()
            )));
        }

        Ok(raw.into_iter().map(convert_enum).collect())
    }

    /// Capture the raw registry together with every enum type it references,
    /// suitable for replay through `SnapshotReflection`.
    pub fn capture_registry(&self) -> Result<RawRegistry> {
        let operations = self.reflection.operations()?;
        let ops: Vec<OperationSignature> = operations.iter().cloned().map(convert_operation).collect();
        let enum_types = collect_enum_types(&ops);
        let enums = if enum_types.is_empty() {
            Vec::new()
        } else {
            self.reflection.enum_values_batch(&enum_types)?
        };

        Ok(RawRegistry { operations, enums })
    }
}

/// Distinct enum GType names referenced by any argument, sorted.
pub fn collect_enum_types(ops: &[OperationSignature]) -> Vec<String> {
    let names: BTreeSet<&str> = ops
        .iter()
        .flat_map(|op| op.args.iter())
        .filter_map(|arg| arg.enum_type.as_deref())
        .collect();

    names.into_iter().map(str::to_string).collect()
}

fn convert_operation(raw: RawOperation) -> OperationSignature {
    let RawOperation {
        name,
        description,
        category,
        args,
    } = raw;

    let mut args: Vec<ArgumentSignature> = args
        .into_iter()
        .filter_map(|arg| convert_argument(&name, arg))
        .collect();

    // Stable: ties keep discovery order.
    args.sort_by_key(|arg| arg.priority);

    OperationSignature {
        name,
        description,
        category,
        args,
    }
}

fn convert_argument(op_name: &str, raw: RawArgument) -> Option<ArgumentSignature> {
    let flags = ArgFlags::from_bits_truncate(raw.flags);
    if !flags.has_direction() {
        warn!(
            "Ignoring argument '{}' of '{}': neither input nor output (flags {:#x})",
            raw.name, op_name, raw.flags
        );
        return None;
    }

    let kind = raw.type_tag.kind();
    let enum_type = match kind {
        ArgKind::Enum if !raw.enum_type.is_empty() => Some(raw.enum_type),
        ArgKind::Enum => {
            debug!(
                "Enum argument '{}' of '{}' has no enum type name",
                raw.name, op_name
            );
            None
        }
        _ => None,
    };

    Some(ArgumentSignature {
        name: raw.name,
        kind,
        flags,
        priority: raw.priority,
        enum_type,
        bounds: NumericBounds {
            default: raw.default,
            min: raw.min,
            max: raw.max,
        },
    })
}

fn convert_enum(raw: RawEnum) -> EnumSignature {
    EnumSignature {
        native_name: raw.name,
        values: raw
            .values
            .into_iter()
            .filter(|v| v.nick != SENTINEL_NICK)
            .map(|v| EnumValue {
                native_name: v.name,
                nick: v.nick,
                value: v.value,
            })
            .collect(),
    }
}
