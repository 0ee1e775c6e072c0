use serde::Serialize;

use crate::impl_case_insensitive_deserialize;

/// Semantic category of an operation argument, as classified from its GType
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    Unknown,
    Image,
    Double,
    Int,
    Bool,
    String,
    Enum,
    Flags,
    ArrayDouble,
    ArrayInt,
    ArrayImage,
    Blob,
    Interpolate,
    Source,
    Target,
}

impl_case_insensitive_deserialize!(
    ArgKind,
    fallback = Unknown,
    Image => "image",
    Double => "double",
    Int => "int",
    Bool => "bool",
    String => "string",
    Enum => "enum",
    Flags => "flags",
    ArrayDouble => "array_double",
    ArrayInt => "array_int",
    ArrayImage => "array_image",
    Blob => "blob",
    Interpolate => "interpolate",
    Source => "source",
    Target => "target"
);

impl ArgKind {
    /// Every kind in type-tag order.
    pub const ALL: [ArgKind; 15] = [
        ArgKind::Unknown,
        ArgKind::Image,
        ArgKind::Double,
        ArgKind::Int,
        ArgKind::Bool,
        ArgKind::String,
        ArgKind::Enum,
        ArgKind::Flags,
        ArgKind::ArrayDouble,
        ArgKind::ArrayInt,
        ArgKind::ArrayImage,
        ArgKind::Blob,
        ArgKind::Interpolate,
        ArgKind::Source,
        ArgKind::Target,
    ];

    /// Decode the integer type tag used by the native introspection records.
    /// Tags outside the known range decode as `Unknown`.
    pub fn from_tag(tag: i32) -> Self {
        usize::try_from(tag)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .unwrap_or(ArgKind::Unknown)
    }

    /// Integer type tag of this kind.
    pub fn tag(self) -> i32 {
        Self::ALL
            .iter()
            .position(|kind| *kind == self)
            .map_or(0, |index| index as i32)
    }

    /// Short human-readable name used in listings.
    pub fn display_name(self) -> &'static str {
        match self {
            ArgKind::Image => "image",
            ArgKind::Double => "double",
            ArgKind::Int => "int",
            ArgKind::Bool => "bool",
            ArgKind::String => "string",
            ArgKind::Enum => "enum",
            ArgKind::Flags => "flags",
            ArgKind::ArrayDouble => "[]double",
            ArgKind::ArrayInt => "[]int",
            ArgKind::ArrayImage => "[]image",
            ArgKind::Blob => "blob",
            ArgKind::Interpolate => "interpolate",
            ArgKind::Source => "source",
            ArgKind::Target => "target",
            ArgKind::Unknown => "unknown",
        }
    }

    /// Kinds whose values live in a contiguous buffer passed as pointer + length.
    pub fn is_slice_backed(self) -> bool {
        matches!(
            self,
            ArgKind::ArrayDouble | ArgKind::ArrayInt | ArgKind::ArrayImage | ArgKind::Blob
        )
    }
}

/// Direction and requiredness bits of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct ArgFlags(u32);

impl ArgFlags {
    pub const INPUT: ArgFlags = ArgFlags(1 << 0);
    pub const OUTPUT: ArgFlags = ArgFlags(1 << 1);
    pub const REQUIRED: ArgFlags = ArgFlags(1 << 2);
    pub const MODIFY: ArgFlags = ArgFlags(1 << 3);

    const KNOWN: u32 = 0b1111;

    /// Build from raw bits, discarding bits we do not understand.
    pub fn from_bits_truncate(bits: u32) -> Self {
        ArgFlags(bits & Self::KNOWN)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: ArgFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// An argument is only meaningful if it flows in, out, or both.
    pub fn has_direction(self) -> bool {
        self.contains(Self::INPUT) || self.contains(Self::OUTPUT)
    }
}

impl std::ops::BitOr for ArgFlags {
    type Output = ArgFlags;

    fn bitor(self, rhs: ArgFlags) -> ArgFlags {
        ArgFlags(self.0 | rhs.0)
    }
}

/// Default and range of a numeric argument. Carried through the model but not
/// used during emission yet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NumericBounds {
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

/// One argument of a discovered operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentSignature {
    pub name: String,
    pub kind: ArgKind,
    pub flags: ArgFlags,
    pub priority: i32,
    /// GType name of the enum, present only when `kind` is `Enum`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_type: Option<String>,
    pub bounds: NumericBounds,
}

impl ArgumentSignature {
    pub fn new(name: impl Into<String>, kind: ArgKind, flags: ArgFlags, priority: i32) -> Self {
        Self {
            name: name.into(),
            kind,
            flags,
            priority,
            enum_type: None,
            bounds: NumericBounds::default(),
        }
    }

    pub fn with_enum_type(mut self, enum_type: impl Into<String>) -> Self {
        self.enum_type = Some(enum_type.into());
        self
    }

    pub fn with_bounds(mut self, bounds: NumericBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn is_input(&self) -> bool {
        self.flags.contains(ArgFlags::INPUT)
    }

    pub fn is_output(&self) -> bool {
        self.flags.contains(ArgFlags::OUTPUT)
    }

    pub fn is_required(&self) -> bool {
        self.flags.contains(ArgFlags::REQUIRED)
    }

    pub fn is_required_input(&self) -> bool {
        self.is_input() && self.is_required()
    }

    pub fn is_optional_input(&self) -> bool {
        self.is_input() && !self.is_required()
    }

    /// Type name used in listings: the enum GType when known, else the kind name.
    pub fn type_label(&self) -> &str {
        match &self.enum_type {
            Some(enum_type) => enum_type,
            None => self.kind.display_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_round_trip_through_table() {
        assert_eq!(ArgKind::from_tag(1), ArgKind::Image);
        assert_eq!(ArgKind::from_tag(10), ArgKind::ArrayImage);
        assert_eq!(ArgKind::from_tag(14), ArgKind::Target);
        assert_eq!(ArgKind::Blob.tag(), 11);
    }

    #[test]
    fn test_unknown_tags_fall_back() {
        assert_eq!(ArgKind::from_tag(-1), ArgKind::Unknown);
        assert_eq!(ArgKind::from_tag(99), ArgKind::Unknown);
    }

    #[test]
    fn test_kind_names_deserialize_leniently() {
        let kind: ArgKind = serde_json::from_str(r#""Array-Double""#).unwrap();
        assert_eq!(kind, ArgKind::ArrayDouble);

        let kind: ArgKind = serde_json::from_str(r#""matrix""#).unwrap();
        assert_eq!(kind, ArgKind::Unknown);
    }

    #[test]
    fn test_flags() {
        let flags = ArgFlags::INPUT | ArgFlags::REQUIRED;
        assert!(flags.contains(ArgFlags::INPUT));
        assert!(!flags.contains(ArgFlags::OUTPUT));
        assert!(flags.has_direction());

        assert!(!ArgFlags::REQUIRED.has_direction());
        assert_eq!(ArgFlags::from_bits_truncate(0xff).bits(), 0b1111);
    }

    #[test]
    fn test_argument_partitions() {
        let required = ArgumentSignature::new("in", ArgKind::Image, ArgFlags::INPUT | ArgFlags::REQUIRED, 1);
        let optional = ArgumentSignature::new("sigma", ArgKind::Double, ArgFlags::INPUT, 2);
        let output = ArgumentSignature::new("out", ArgKind::Image, ArgFlags::OUTPUT | ArgFlags::REQUIRED, 3);

        assert!(required.is_required_input());
        assert!(!required.is_optional_input());
        assert!(optional.is_optional_input());
        assert!(output.is_output());
        assert!(!output.is_required_input());
    }

    #[test]
    fn test_type_label_prefers_enum_type() {
        let arg = ArgumentSignature::new("kernel", ArgKind::Enum, ArgFlags::INPUT, 1)
            .with_enum_type("VipsKernel");
        assert_eq!(arg.type_label(), "VipsKernel");

        let arg = ArgumentSignature::new("scale", ArgKind::ArrayDouble, ArgFlags::INPUT, 1);
        assert_eq!(arg.type_label(), "[]double");
    }
}
