//! Call shape shared by the shim prototype and the bridge call site.
//!
//! Both sides walk the same `CallSlot` list, so required inputs, their
//! lengths, outputs and the options pointer always line up positionally.

use crate::mapper::{self, KindMapping, names};
use crate::policy::Policy;
use crate::types::{ArgumentSignature, OperationSignature};

/// One positional parameter of a shim function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CallSlot<'a> {
    /// A required input value
    Input(&'a ArgumentSignature),
    /// Element count following a slice-backed required input
    Length(&'a ArgumentSignature),
    /// Pointer receiving an output
    Output(&'a ArgumentSignature),
    /// Pointer to the options struct
    Options,
}

#[derive(Debug, Clone)]
pub struct OperationShape<'a> {
    pub op: &'a OperationSignature,
    pub policy: &'a Policy,
    pub required: Vec<&'a ArgumentSignature>,
    pub optional: Vec<&'a ArgumentSignature>,
    pub outputs: Vec<&'a ArgumentSignature>,
}

impl<'a> OperationShape<'a> {
    pub fn new(op: &'a OperationSignature, policy: &'a Policy) -> Self {
        Self {
            op,
            policy,
            required: op.required_inputs(),
            optional: op.optional_inputs(),
            outputs: op.outputs(),
        }
    }

    /// Shim type, bridge types and presence encoding of an input argument.
    pub fn mapping(&self, arg: &ArgumentSignature) -> KindMapping {
        mapper::resolve_kind_mapping(arg.kind, arg.enum_type.as_deref(), self.policy)
    }

    pub fn has_options(&self) -> bool {
        !self.optional.is_empty()
    }

    /// Required inputs passed as a pointer to their first element.
    pub fn required_slices(&self) -> Vec<&'a ArgumentSignature> {
        self.required
            .iter()
            .copied()
            .filter(|arg| arg.kind.is_slice_backed())
            .collect()
    }

    /// Optional slice-backed arguments hand Go memory to C and must be pinned.
    pub fn needs_pinner(&self) -> bool {
        self.optional.iter().any(|arg| arg.kind.is_slice_backed())
    }

    pub fn call_slots(&self) -> Vec<CallSlot<'a>> {
        let mut slots = Vec::new();
        for &arg in &self.required {
            slots.push(CallSlot::Input(arg));
            if arg.kind.is_slice_backed() {
                slots.push(CallSlot::Length(arg));
            }
        }
        slots.extend(self.outputs.iter().copied().map(CallSlot::Output));
        if self.has_options() {
            slots.push(CallSlot::Options);
        }
        slots
    }

    /// C parameter declarations in call order.
    pub fn shim_parameters(&self) -> Vec<String> {
        self.call_slots()
            .into_iter()
            .map(|slot| match slot {
                CallSlot::Input(arg) => c_declaration(&self.mapping(arg).shim, &param_name(arg)),
                CallSlot::Length(arg) => c_declaration(
                    mapper::length_type(arg.kind).unwrap_or("int"),
                    &length_name(arg),
                ),
                CallSlot::Output(arg) => {
                    c_declaration(mapper::shim_output_type(arg.kind), &output_name(arg))
                }
                CallSlot::Options => c_declaration(
                    &format!("{} *", names::shim_options_struct_name(&self.op.name)),
                    "opts",
                ),
            })
            .collect()
    }

    /// `int gen_vips_<op>(...)`, with `void` for an empty parameter list.
    pub fn shim_signature(&self) -> String {
        let params = self.shim_parameters();
        let params = if params.is_empty() {
            "void".to_string()
        } else {
            params.join(", ")
        };
        format!("int {}({params})", names::shim_function_name(&self.op.name))
    }
}

/// Parameter-style identifier of an argument, shared by C and Go.
pub fn param_name(arg: &ArgumentSignature) -> String {
    names::to_parameter_identifier(&arg.name)
}

/// Exported Go field name of an optional argument.
pub fn field_name(arg: &ArgumentSignature) -> String {
    names::to_exported_identifier(&arg.name)
}

/// Generated identifiers never contain an underscore, so suffixed and
/// prefixed names cannot collide with them.
pub fn length_name(arg: &ArgumentSignature) -> String {
    format!("{}_n", param_name(arg))
}

pub fn output_name(arg: &ArgumentSignature) -> String {
    format!("out_{}", param_name(arg))
}

pub fn presence_name(arg: &ArgumentSignature) -> String {
    format!("has_{}", param_name(arg))
}

/// `VipsImage *` + `in` -> `VipsImage *in`, `double` + `x` -> `double x`.
pub fn c_declaration(ty: &str, name: &str) -> String {
    if ty.ends_with('*') {
        format!("{ty}{name}")
    } else {
        format!("{ty} {name}")
    }
}
