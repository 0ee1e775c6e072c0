//! Argument kind to shim (C) and bridge (Go) type mapping.
//!
//! Every emitter goes through these tables. A mismatch between what the shim
//! header declares and what the bridge passes is silent ABI corruption, so
//! there is exactly one place that decides each representation.

use crate::policy::Policy;
use crate::types::{ArgKind, ArgumentSignature};

/// How an optional argument signals that the caller supplied it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Scalar value: the shim branches on a `has_<field>` flag.
    Flag,
    /// Aggregate value: the shim branches on the field being non-null.
    NonNull,
}

/// The three representations of one argument kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindMapping {
    /// Shim parameter and options-field type
    pub shim: String,
    /// Bridge type of a required argument
    pub bridge: String,
    /// Bridge type of the same argument in the options struct
    pub bridge_optional: String,
    pub presence: Presence,
}

pub fn resolve_kind_mapping(kind: ArgKind, enum_type: Option<&str>, policy: &Policy) -> KindMapping {
    KindMapping {
        shim: shim_type(kind, enum_type),
        bridge: bridge_type(kind, enum_type, policy),
        bridge_optional: bridge_optional_type(kind, enum_type, policy),
        presence: presence(kind),
    }
}

pub fn presence(kind: ArgKind) -> Presence {
    match kind {
        ArgKind::Double
        | ArgKind::Int
        | ArgKind::Bool
        | ArgKind::String
        | ArgKind::Enum
        | ArgKind::Flags => Presence::Flag,
        ArgKind::Image
        | ArgKind::Interpolate
        | ArgKind::ArrayDouble
        | ArgKind::ArrayInt
        | ArgKind::ArrayImage
        | ArgKind::Blob
        | ArgKind::Source
        | ArgKind::Target
        | ArgKind::Unknown => Presence::NonNull,
    }
}

/// C type of an input parameter or options field. Enums without a known
/// GType degrade to `int`.
pub fn shim_type(kind: ArgKind, enum_type: Option<&str>) -> String {
    let name = match kind {
        ArgKind::Image => "VipsImage *",
        ArgKind::Double => "double",
        ArgKind::Int | ArgKind::Bool | ArgKind::Flags => "int",
        ArgKind::String => "const char *",
        ArgKind::Enum => return enum_type.unwrap_or("int").to_string(),
        ArgKind::ArrayDouble => "double *",
        ArgKind::ArrayInt => "int *",
        ArgKind::ArrayImage => "VipsImage **",
        ArgKind::Interpolate => "VipsInterpolate *",
        ArgKind::Blob | ArgKind::Source | ArgKind::Target | ArgKind::Unknown => "void *",
    };
    name.to_string()
}

/// C type of the element count that accompanies slice-backed kinds.
pub fn length_type(kind: ArgKind) -> Option<&'static str> {
    match kind {
        ArgKind::ArrayDouble | ArgKind::ArrayInt | ArgKind::ArrayImage => Some("int"),
        ArgKind::Blob => Some("size_t"),
        _ => None,
    }
}

/// Whether an output of this kind is returned as a typed value rather than
/// an opaque pointer.
pub fn has_typed_output(kind: ArgKind) -> bool {
    matches!(
        kind,
        ArgKind::Image
            | ArgKind::Double
            | ArgKind::Int
            | ArgKind::Bool
            | ArgKind::Enum
            | ArgKind::Flags
    )
}

/// C type of an output pointer parameter.
pub fn shim_output_type(kind: ArgKind) -> &'static str {
    match kind {
        ArgKind::Image => "VipsImage **",
        ArgKind::Double => "double *",
        ArgKind::Int | ArgKind::Bool | ArgKind::Enum | ArgKind::Flags => "int *",
        _ => "void **",
    }
}

fn bridge_enum_type(enum_type: Option<&str>, policy: &Policy) -> String {
    enum_type
        .and_then(|native| policy.enum_type_name(native))
        .unwrap_or("int")
        .to_string()
}

/// Go type of a required input.
pub fn bridge_type(kind: ArgKind, enum_type: Option<&str>, policy: &Policy) -> String {
    let name = match kind {
        ArgKind::Image => "*C.VipsImage",
        ArgKind::Double => "float64",
        ArgKind::Int | ArgKind::Flags => "int",
        ArgKind::Bool => "bool",
        ArgKind::String => "string",
        ArgKind::Enum => return bridge_enum_type(enum_type, policy),
        ArgKind::ArrayDouble => "[]float64",
        // Reinterpreted as the shim's `int *`, so the element width must match C.int.
        ArgKind::ArrayInt => "[]int32",
        ArgKind::ArrayImage => "[]*C.VipsImage",
        ArgKind::Interpolate => "*C.VipsInterpolate",
        ArgKind::Blob => "[]byte",
        ArgKind::Source | ArgKind::Target | ArgKind::Unknown => "unsafe.Pointer",
    };
    name.to_string()
}

/// Go type of an options-struct field. Scalars become pointers so that nil
/// means absent; aggregates are already nilable and keep their required type.
pub fn bridge_optional_type(kind: ArgKind, enum_type: Option<&str>, policy: &Policy) -> String {
    let required = bridge_type(kind, enum_type, policy);
    match presence(kind) {
        Presence::Flag => format!("*{required}"),
        Presence::NonNull => required,
    }
}

/// Go type of the local that receives an output from the shim.
pub fn bridge_output_var_type(kind: ArgKind) -> &'static str {
    match kind {
        ArgKind::Image => "*C.VipsImage",
        ArgKind::Double => "C.double",
        ArgKind::Int | ArgKind::Bool | ArgKind::Enum | ArgKind::Flags => "C.int",
        _ => "unsafe.Pointer",
    }
}

/// Go type an output is returned as.
pub fn bridge_output_type(kind: ArgKind, enum_type: Option<&str>, policy: &Policy) -> String {
    if has_typed_output(kind) {
        bridge_type(kind, enum_type, policy)
    } else {
        "unsafe.Pointer".to_string()
    }
}

/// Value returned in place of an output when the call fails.
pub fn bridge_zero_value(kind: ArgKind) -> &'static str {
    match kind {
        ArgKind::Double | ArgKind::Int | ArgKind::Enum | ArgKind::Flags => "0",
        ArgKind::Bool => "false",
        _ => "nil",
    }
}

/// Describes why an argument falls back to a generic representation, or
/// `None` if it has an explicit mapping.
pub fn unmapped_note(arg: &ArgumentSignature, policy: &Policy) -> Option<String> {
    match arg.kind {
        ArgKind::Unknown | ArgKind::Source | ArgKind::Target => Some(format!(
            "{} has no typed mapping for kind {} and is passed as unsafe.Pointer",
            arg.name,
            arg.kind.display_name()
        )),
        ArgKind::Enum => match arg.enum_type.as_deref() {
            Some(native) if policy.enum_type_name(native).is_some() => None,
            Some(native) => Some(format!(
                "{} uses enum {native}, which has no bridge type, and is passed as int",
                arg.name
            )),
            None => Some(format!("{} has no enum type and is passed as int", arg.name)),
        },
        kind if arg.is_output() && !arg.is_input() && !has_typed_output(kind) => Some(format!(
            "output {} of kind {} is returned as unsafe.Pointer",
            arg.name,
            kind.display_name()
        )),
        _ => None,
    }
}
