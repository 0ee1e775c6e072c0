//! Name and type mapping shared by all emitters
//!
//! Pure functions only. The three emitters call the same functions for every
//! argument, which is what keeps the shim header, shim source and bridge in
//! agreement.

pub mod kinds;
pub mod names;

pub use kinds::{
    KindMapping, Presence, bridge_optional_type, bridge_output_type, bridge_output_var_type,
    bridge_type, bridge_zero_value, has_typed_output, length_type, presence,
    resolve_kind_mapping, shim_output_type, shim_type, unmapped_note,
};
pub use names::{
    bridge_function_name, bridge_options_type_name, shim_function_name,
    shim_options_struct_name, to_exported_identifier, to_parameter_identifier,
    to_type_identifier,
};
