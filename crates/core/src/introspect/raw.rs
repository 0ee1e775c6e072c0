//! Loosely typed records as handed over by the reflection facility.

use serde::{Deserialize, Serialize};

use crate::types::ArgKind;

/// Argument type as reported: the integer tag of the native records, or the
/// kind's name in hand-written snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeTag {
    Code(i32),
    Name(ArgKind),
}

impl TypeTag {
    pub fn kind(self) -> ArgKind {
        match self {
            TypeTag::Code(code) => ArgKind::from_tag(code),
            TypeTag::Name(kind) => kind,
        }
    }
}

impl From<ArgKind> for TypeTag {
    fn from(kind: ArgKind) -> Self {
        TypeTag::Code(kind.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArgument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    pub flags: u32,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub default: f64,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    /// Empty when the argument is not an enum type
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub enum_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOperation {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub args: Vec<RawArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEnumValue {
    pub name: String,
    pub nick: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawEnum {
    pub name: String,
    #[serde(default)]
    pub values: Vec<RawEnumValue>,
}

/// Whole registry: every operation plus the enum types captured with it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRegistry {
    pub operations: Vec<RawOperation>,
    #[serde(default)]
    pub enums: Vec<RawEnum>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_accepts_code_or_name() {
        let arg: RawArgument =
            serde_json::from_str(r#"{ "name": "in", "type": 1, "flags": 5 }"#).unwrap();
        assert_eq!(arg.type_tag.kind(), ArgKind::Image);
        assert_eq!(arg.priority, 0);
        assert!(arg.enum_type.is_empty());

        let arg: RawArgument = serde_json::from_str(
            r#"{ "name": "scale", "type": "array_double", "flags": 1, "priority": 4 }"#,
        )
        .unwrap();
        assert_eq!(arg.type_tag.kind(), ArgKind::ArrayDouble);
        assert_eq!(arg.priority, 4);
    }

    #[test]
    fn test_serializes_integer_codes() {
        let arg = RawArgument {
            name: "kernel".to_string(),
            type_tag: ArgKind::Enum.into(),
            flags: 1,
            priority: 3,
            default: 5.0,
            min: 0.0,
            max: 0.0,
            enum_type: "VipsKernel".to_string(),
        };
        let json = serde_json::to_value(&arg).unwrap();
        assert_eq!(json["type"], 6);
        assert_eq!(json["enum_type"], "VipsKernel");
    }
}
