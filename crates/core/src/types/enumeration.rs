use serde::Serialize;

/// One member of an enum type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    /// C identifier, e.g. `VIPS_KERNEL_LANCZOS3`
    pub native_name: String,
    pub nick: String,
    pub value: i32,
}

/// Value set of an enum GType. Aliased values are kept as reported.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EnumSignature {
    /// GType name, e.g. `VipsKernel`
    pub native_name: String,
    pub values: Vec<EnumValue>,
}
