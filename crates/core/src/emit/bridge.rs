use super::shape::{
    CallSlot, OperationShape, field_name, length_name, output_name, param_name, presence_name,
};
use super::{EmitContext, Emitter, GENERATED_BANNER};
use crate::config::GeneratorConfig;
use crate::mapper::{self, Presence, names};
use crate::policy::Policy;
use crate::types::{ArgKind, ArgumentSignature, OperationSignature};

/// Renders the cgo bridge: an options struct and a wrapper function per
/// operation that marshals Go values into a shim call.
#[derive(Debug, Clone, Copy, Default)]
pub struct BridgeEmitter;

impl Emitter for BridgeEmitter {
    fn name(&self) -> &'static str {
        "bridge"
    }

    fn file_name<'c>(&self, config: &'c GeneratorConfig) -> &'c str {
        &config.bridge_file
    }

    fn emit(&self, ops: &[OperationSignature], ctx: &EmitContext<'_>) -> String {
        let shapes: Vec<OperationShape<'_>> = ops
            .iter()
            .map(|op| OperationShape::new(op, ctx.policy))
            .collect();

        let mut out = String::new();
        out.push_str(GENERATED_BANNER);
        out.push('\n');
        out.push_str(&format!("package {}\n\n", ctx.config.package));
        out.push_str(&format!("// #include \"{}\"\n", ctx.config.header_file));
        out.push_str("import \"C\"\n\n");

        let mut imports = Vec::new();
        if shapes.iter().any(|shape| !shape.required_slices().is_empty()) {
            imports.push("errors");
        }
        if shapes.iter().any(OperationShape::needs_pinner) {
            imports.push("runtime");
        }
        imports.push("unsafe");
        if imports.len() == 1 {
            out.push_str("import \"unsafe\"\n\n");
        } else {
            out.push_str("import (\n");
            for import in &imports {
                out.push_str(&format!("\t\"{import}\"\n"));
            }
            out.push_str(")\n\n");
        }
        out.push_str("// Ensure imports are used.\n");
        out.push_str("var _ = unsafe.Pointer(nil)\n\n");

        for shape in &shapes {
            emit_operation(&mut out, shape, ctx);
        }
        out
    }
}

/// Link to the libvips reference for an operation.
pub fn doc_link(base_url: &str, op: &OperationSignature) -> String {
    format!(
        "{}/libvips-{}.html#vips-{}",
        base_url.trim_end_matches('/'),
        op.category,
        op.name.replace('_', "-")
    )
}

fn emit_operation(out: &mut String, shape: &OperationShape<'_>, ctx: &EmitContext<'_>) {
    let op = shape.op;
    let policy = ctx.policy;
    let func_name = names::bridge_function_name(&op.name);
    let opts_type = names::bridge_options_type_name(&op.name);

    if shape.has_options() {
        out.push_str(&format!(
            "// {opts_type} are optional parameters for {}.\n",
            op.name
        ));
        out.push_str(&format!("type {opts_type} struct {{\n"));
        for arg in &shape.optional {
            out.push_str(&format!(
                "\t{} {}\n",
                field_name(arg),
                shape.mapping(arg).bridge_optional
            ));
        }
        out.push_str("}\n\n");
    }

    out.push_str(&format!("// {func_name} calls the vips {} operation.\n", op.name));
    for line in op.description.lines() {
        out.push_str(&format!("// {line}\n"));
    }
    out.push_str(&format!("// See {}\n", doc_link(&ctx.config.doc_base_url, op)));
    for arg in &op.args {
        if let Some(note) = mapper::unmapped_note(arg, policy) {
            out.push_str(&format!("// Note: {note}.\n"));
        }
    }

    let mut params: Vec<String> = shape
        .required
        .iter()
        .map(|arg| format!("{} {}", param_name(arg), shape.mapping(arg).bridge))
        .collect();
    if shape.has_options() {
        params.push(format!("opts *{opts_type}"));
    }

    let mut returns: Vec<String> = shape
        .outputs
        .iter()
        .map(|arg| mapper::bridge_output_type(arg.kind, arg.enum_type.as_deref(), policy))
        .collect();
    returns.push("error".to_string());
    let returns = if returns.len() == 1 {
        "error".to_string()
    } else {
        format!("({})", returns.join(", "))
    };

    out.push_str(&format!("func {func_name}({}) {returns} {{\n", params.join(", ")));
    out.push_str(&format!("\tincOpCounter(\"{}\")\n", op.name));

    let zeros: Vec<&str> = shape
        .outputs
        .iter()
        .map(|arg| mapper::bridge_zero_value(arg.kind))
        .collect();

    // Indexing an empty slice would panic before reaching C.
    for arg in shape.required_slices() {
        let name = param_name(arg);
        let mut values: Vec<String> = zeros.iter().map(|zero| zero.to_string()).collect();
        values.push(format!(
            "errors.New(\"{}: {} must not be empty\")",
            op.name, arg.name
        ));
        out.push_str(&format!("\tif len({name}) == 0 {{\n"));
        out.push_str(&format!("\t\treturn {}\n", values.join(", ")));
        out.push_str("\t}\n");
    }

    let mut locals = String::new();
    for arg in shape.required.iter().filter(|arg| arg.kind == ArgKind::String) {
        let name = param_name(arg);
        locals.push_str(&format!("\tcStr_{name} := C.CString({name})\n"));
        locals.push_str(&format!("\tdefer C.free(unsafe.Pointer(cStr_{name}))\n"));
    }
    for arg in &shape.outputs {
        locals.push_str(&format!(
            "\tvar {} {}\n",
            output_name(arg),
            mapper::bridge_output_var_type(arg.kind)
        ));
    }
    if !locals.is_empty() {
        out.push('\n');
        out.push_str(&locals);
    }

    if shape.has_options() {
        out.push_str(&format!(
            "\n\tvar cOpts C.{}\n",
            names::shim_options_struct_name(&op.name)
        ));
        if shape.needs_pinner() {
            out.push_str("\tvar pinner runtime.Pinner\n");
            out.push_str("\tdefer pinner.Unpin()\n");
        }
        out.push_str("\tif opts != nil {\n");
        for arg in &shape.optional {
            emit_option_field(out, shape, arg);
        }
        out.push_str("\t}\n");
    }

    out.push_str(&format!(
        "\n\tret := C.{}({})\n",
        names::shim_function_name(&op.name),
        call_arguments(shape).join(", ")
    ));

    let error_value = match shape.outputs.first() {
        Some(first) if op.first_output_is_image() => {
            format!("handleImageError({})", output_name(first))
        }
        _ => "handleVipsError()".to_string(),
    };
    let mut failure: Vec<String> = zeros.iter().map(|zero| zero.to_string()).collect();
    failure.push(error_value);
    out.push_str("\tif ret != 0 {\n");
    out.push_str(&format!("\t\treturn {}\n", failure.join(", ")));
    out.push_str("\t}\n\n");

    let mut success: Vec<String> = shape
        .outputs
        .iter()
        .map(|arg| output_value(arg, policy))
        .collect();
    success.push("nil".to_string());
    out.push_str(&format!("\treturn {}\n", success.join(", ")));
    out.push_str("}\n\n");
}

/// Go expressions passed to the shim, in the shim's parameter order.
pub fn call_arguments(shape: &OperationShape<'_>) -> Vec<String> {
    shape
        .call_slots()
        .into_iter()
        .map(|slot| match slot {
            CallSlot::Input(arg) => input_value(arg),
            CallSlot::Length(arg) => slice_length(arg.kind, &param_name(arg)),
            CallSlot::Output(arg) => format!("&{}", output_name(arg)),
            CallSlot::Options => "&cOpts".to_string(),
        })
        .collect()
}

fn enum_conversion(arg: &ArgumentSignature) -> String {
    format!("C.{}", arg.enum_type.as_deref().unwrap_or("int"))
}

fn input_value(arg: &ArgumentSignature) -> String {
    let name = param_name(arg);
    match arg.kind {
        ArgKind::Double => format!("C.double({name})"),
        ArgKind::Int | ArgKind::Flags => format!("C.int({name})"),
        ArgKind::Bool => format!("C.int(boolToInt({name}))"),
        ArgKind::String => format!("cStr_{name}"),
        ArgKind::Enum => format!("{}({name})", enum_conversion(arg)),
        kind if kind.is_slice_backed() => slice_pointer(kind, &name),
        _ => name,
    }
}

fn slice_pointer(kind: ArgKind, slice: &str) -> String {
    match kind {
        ArgKind::ArrayDouble => format!("(*C.double)(unsafe.Pointer(&{slice}[0]))"),
        ArgKind::ArrayInt => format!("(*C.int)(unsafe.Pointer(&{slice}[0]))"),
        ArgKind::ArrayImage => format!("(**C.VipsImage)(unsafe.Pointer(&{slice}[0]))"),
        _ => format!("unsafe.Pointer(&{slice}[0])"),
    }
}

fn slice_length(kind: ArgKind, slice: &str) -> String {
    match kind {
        ArgKind::Blob => format!("C.size_t(len({slice}))"),
        _ => format!("C.int(len({slice}))"),
    }
}

fn emit_option_field(out: &mut String, shape: &OperationShape<'_>, arg: &ArgumentSignature) {
    let field = format!("opts.{}", field_name(arg));
    let target = format!("cOpts.{}", param_name(arg));

    if arg.kind.is_slice_backed() {
        out.push_str(&format!("\t\tif len({field}) > 0 {{\n"));
        out.push_str(&format!("\t\t\tcOpts.{} = 1\n", presence_name(arg)));
        out.push_str(&format!("\t\t\tpinner.Pin(&{field}[0])\n"));
        out.push_str(&format!("\t\t\t{target} = {}\n", slice_pointer(arg.kind, &field)));
        out.push_str(&format!(
            "\t\t\tcOpts.{} = {}\n",
            length_name(arg),
            slice_length(arg.kind, &field)
        ));
        out.push_str("\t\t}\n");
        return;
    }

    out.push_str(&format!("\t\tif {field} != nil {{\n"));
    out.push_str(&format!("\t\t\tcOpts.{} = 1\n", presence_name(arg)));
    match (shape.mapping(arg).presence, arg.kind) {
        (Presence::NonNull, _) => out.push_str(&format!("\t\t\t{target} = {field}\n")),
        (Presence::Flag, ArgKind::String) => {
            let name = param_name(arg);
            out.push_str(&format!("\t\t\ttmp_{name} := C.CString(*{field})\n"));
            out.push_str(&format!("\t\t\tdefer C.free(unsafe.Pointer(tmp_{name}))\n"));
            out.push_str(&format!("\t\t\t{target} = tmp_{name}\n"));
        }
        (Presence::Flag, kind) => {
            let value = match kind {
                ArgKind::Double => format!("C.double(*{field})"),
                ArgKind::Bool => format!("C.int(boolToInt(*{field}))"),
                ArgKind::Enum => format!("{}(*{field})", enum_conversion(arg)),
                _ => format!("C.int(*{field})"),
            };
            out.push_str(&format!("\t\t\t{target} = {value}\n"));
        }
    }
    out.push_str("\t\t}\n");
}

fn output_value(arg: &ArgumentSignature, policy: &Policy) -> String {
    let name = output_name(arg);
    match arg.kind {
        ArgKind::Double => format!("float64({name})"),
        ArgKind::Int | ArgKind::Flags => format!("int({name})"),
        ArgKind::Bool => format!("{name} != 0"),
        ArgKind::Enum => format!(
            "{}({name})",
            mapper::bridge_type(arg.kind, arg.enum_type.as_deref(), policy)
        ),
        _ => name,
    }
}
