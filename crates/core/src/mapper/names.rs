//! Identifier conversion for libvips operation and argument names.

/// Parameter-style names that would collide with a keyword or predeclared
/// identifier of C or Go, or with a local of the generated functions.
pub const RESERVED_PARAMETERS: &[(&str, &str)] = &[
    ("type", "typ"),
    ("func", "fn"),
    ("map", "mapVal"),
    ("range", "rangeVal"),
    ("in", "input"),
    ("case", "caseVal"),
    ("chan", "channel"),
    ("const", "constVal"),
    ("default", "defaultVal"),
    ("defer", "deferVal"),
    ("go", "goVal"),
    ("import", "importVal"),
    ("interface", "iface"),
    ("package", "pkg"),
    ("select", "selectVal"),
    ("struct", "structVal"),
    ("switch", "switchVal"),
    ("var", "variable"),
    ("int", "intVal"),
    ("double", "doubleVal"),
    ("float", "floatVal"),
    ("char", "charVal"),
    ("long", "longVal"),
    ("signed", "signedVal"),
    ("unsigned", "unsignedVal"),
    ("error", "errVal"),
    ("len", "length"),
    ("nil", "nilVal"),
    ("op", "opVal"),
    ("opts", "optsVal"),
    ("ret", "retVal"),
    ("runtime", "runtimeVal"),
    ("unsafe", "unsafeVal"),
];

/// Exported-style names that are remapped for parity with the parameter
/// names. Capitalised identifiers cannot hit Go keywords, so this set is
/// smaller.
pub const RESERVED_EXPORTED: &[(&str, &str)] = &[
    ("Type", "Typ"),
    ("Func", "Fn"),
    ("Map", "MapVal"),
    ("Range", "RangeVal"),
    ("In", "Input"),
];

const SHIM_FUNCTION_PREFIX: &str = "gen_vips_";
const BRIDGE_FUNCTION_PREFIX: &str = "vipsGen";

fn segments(name: &str) -> impl Iterator<Item = &str> {
    name.split(['-', '_']).filter(|s| !s.is_empty())
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn remap(name: String, table: &[(&str, &str)]) -> String {
    table
        .iter()
        .find(|(reserved, _)| *reserved == name)
        .map_or(name, |(_, replacement)| (*replacement).to_string())
}

/// `min_ampl` -> `MinAmpl`
pub fn to_type_identifier(name: &str) -> String {
    segments(name).map(capitalize).collect()
}

/// `min_ampl` -> `minAmpl`, with reserved names remapped (`in` -> `input`).
pub fn to_parameter_identifier(name: &str) -> String {
    let mut out = String::new();
    for (index, segment) in segments(name).enumerate() {
        if index == 0 {
            out.push_str(segment);
        } else {
            out.push_str(&capitalize(segment));
        }
    }
    remap(out, RESERVED_PARAMETERS)
}

/// `min_ampl` -> `MinAmpl`, with reserved names remapped (`in` -> `Input`).
pub fn to_exported_identifier(name: &str) -> String {
    remap(to_type_identifier(name), RESERVED_EXPORTED)
}

pub fn shim_function_name(op_name: &str) -> String {
    format!("{SHIM_FUNCTION_PREFIX}{op_name}")
}

pub fn bridge_function_name(op_name: &str) -> String {
    format!("{BRIDGE_FUNCTION_PREFIX}{}", to_type_identifier(op_name))
}

pub fn shim_options_struct_name(op_name: &str) -> String {
    format!("Gen{}Opts", to_type_identifier(op_name))
}

pub fn bridge_options_type_name(op_name: &str) -> String {
    format!("{}Options", to_type_identifier(op_name))
}
