use super::shape::{OperationShape, length_name, output_name, param_name, presence_name};
use super::{EmitContext, Emitter, GENERATED_BANNER};
use crate::config::GeneratorConfig;
use crate::mapper::Presence;
use crate::types::{ArgKind, ArgumentSignature, OperationSignature};

/// Renders the C shim: one function per operation that builds the libvips
/// operation through the generic property API.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShimSourceEmitter;

impl Emitter for ShimSourceEmitter {
    fn name(&self) -> &'static str {
        "shim source"
    }

    fn file_name<'c>(&self, config: &'c GeneratorConfig) -> &'c str {
        &config.source_file
    }

    fn emit(&self, ops: &[OperationSignature], ctx: &EmitContext<'_>) -> String {
        let mut out = String::new();
        out.push_str(GENERATED_BANNER);
        out.push('\n');
        out.push_str(&format!("#include \"{}\"\n\n", ctx.config.header_file));

        for op in ops {
            emit_operation(&mut out, &OperationShape::new(op, ctx.policy));
        }
        out
    }
}

fn emit_operation(out: &mut String, shape: &OperationShape<'_>) {
    out.push_str(&format!("{} {{\n", shape.shim_signature()));
    out.push_str(&format!(
        "    VipsOperation *op = vips_operation_new(\"{}\");\n",
        shape.op.name
    ));
    out.push_str("    if (!op) return -1;\n\n");

    for arg in &shape.required {
        emit_required_set(out, arg);
    }

    if shape.has_options() {
        out.push_str("\n    if (opts) {\n");
        for arg in &shape.optional {
            let gate = match shape.mapping(arg).presence {
                Presence::Flag => format!("opts->{}", presence_name(arg)),
                Presence::NonNull => format!("opts->{}", param_name(arg)),
            };
            out.push_str(&format!("        if ({gate}) {{\n"));
            emit_optional_set(out, arg);
            out.push_str("        }\n");
        }
        out.push_str("    }\n");
    }

    out.push_str("\n    if (vips_cache_operation_buildp(&op)) goto error;\n\n");

    for arg in &shape.outputs {
        out.push_str(&format!(
            "    g_object_get(VIPS_OBJECT(op), \"{}\", {}, NULL);\n",
            arg.name,
            output_name(arg)
        ));
    }

    out.push_str("\n    vips_object_unref_outputs(VIPS_OBJECT(op));\n");
    out.push_str("    g_object_unref(op);\n");
    out.push_str("    return 0;\n\n");
    out.push_str("error:\n");
    out.push_str("    vips_object_unref_outputs(VIPS_OBJECT(op));\n");
    out.push_str("    g_object_unref(op);\n");
    out.push_str("    return -1;\n");
    out.push_str("}\n\n");
}

/// Boxed type and constructor for slice-backed kinds. The box takes its own
/// copy or reference, so it is released right after the property is set.
fn boxing(kind: ArgKind) -> Option<(&'static str, &'static str)> {
    match kind {
        ArgKind::ArrayDouble => Some(("VipsArrayDouble", "vips_array_double_new")),
        ArgKind::ArrayInt => Some(("VipsArrayInt", "vips_array_int_new")),
        ArgKind::ArrayImage => Some(("VipsArrayImage", "vips_array_image_new")),
        ArgKind::Blob => Some(("VipsBlob", "vips_blob_copy")),
        _ => None,
    }
}

fn scalar_value(kind: ArgKind, value: &str) -> String {
    match kind {
        ArgKind::Bool => format!("(gboolean){value}"),
        ArgKind::Enum => format!("(int){value}"),
        _ => value.to_string(),
    }
}

fn emit_required_set(out: &mut String, arg: &ArgumentSignature) {
    let value = param_name(arg);
    match boxing(arg.kind) {
        Some((boxed_type, constructor)) => {
            out.push_str("    {\n");
            out.push_str(&format!(
                "        {boxed_type} *boxed_value = {constructor}({value}, {});\n",
                length_name(arg)
            ));
            out.push_str(&format!(
                "        int set_status = vips_object_set(VIPS_OBJECT(op), \"{}\", boxed_value, NULL);\n",
                arg.name
            ));
            out.push_str("        vips_area_unref(VIPS_AREA(boxed_value));\n");
            out.push_str("        if (set_status) goto error;\n");
            out.push_str("    }\n");
        }
        None => out.push_str(&format!(
            "    if (vips_object_set(VIPS_OBJECT(op), \"{}\", {}, NULL)) goto error;\n",
            arg.name,
            scalar_value(arg.kind, &value)
        )),
    }
}

/// Failures setting an optional argument are ignored.
fn emit_optional_set(out: &mut String, arg: &ArgumentSignature) {
    let value = format!("opts->{}", param_name(arg));
    match boxing(arg.kind) {
        Some((boxed_type, constructor)) => {
            out.push_str(&format!(
                "            {boxed_type} *boxed_value = {constructor}({value}, opts->{});\n",
                length_name(arg)
            ));
            out.push_str(&format!(
                "            vips_object_set(VIPS_OBJECT(op), \"{}\", boxed_value, NULL);\n",
                arg.name
            ));
            out.push_str("            vips_area_unref(VIPS_AREA(boxed_value));\n");
        }
        None => out.push_str(&format!(
            "            vips_object_set(VIPS_OBJECT(op), \"{}\", {}, NULL);\n",
            arg.name,
            scalar_value(arg.kind, &value)
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;
    use crate::types::ArgFlags;

    fn render(op: OperationSignature) -> String {
        let policy = Policy::empty();
        let config = GeneratorConfig::default();
        ShimSourceEmitter.emit(&[op], &EmitContext::new(&policy, &config))
    }

    fn optional(name: &str, kind: ArgKind) -> ArgumentSignature {
        ArgumentSignature::new(name, kind, ArgFlags::INPUT, 10)
    }

    fn with_optional(arg: ArgumentSignature) -> OperationSignature {
        OperationSignature::new("sample", "", "misc")
            .with_arg(ArgumentSignature::new("in", ArgKind::Image, ArgFlags::INPUT | ArgFlags::REQUIRED, 1))
            .with_arg(ArgumentSignature::new("out", ArgKind::Image, ArgFlags::OUTPUT | ArgFlags::REQUIRED, 2))
            .with_arg(arg)
    }

    #[test]
    fn test_function_skeleton() {
        let source = render(with_optional(optional("sigma", ArgKind::Double)));

        assert!(source.starts_with(GENERATED_BANNER));
        assert!(source.contains("#include \"generated.h\"\n"));
        assert!(source.contains(
            "int gen_vips_sample(VipsImage *input, VipsImage **out_out, GenSampleOpts *opts) {\n"
        ));
        assert!(source.contains("VipsOperation *op = vips_operation_new(\"sample\");\n    if (!op) return -1;\n"));
        assert!(source.contains("if (vips_object_set(VIPS_OBJECT(op), \"in\", input, NULL)) goto error;"));
        assert!(source.contains("if (vips_cache_operation_buildp(&op)) goto error;"));
        assert!(source.contains("g_object_get(VIPS_OBJECT(op), \"out\", out_out, NULL);"));
        // Outputs and the operation are released on both paths.
        assert_eq!(source.matches("vips_object_unref_outputs(VIPS_OBJECT(op));").count(), 2);
        assert_eq!(source.matches("g_object_unref(op);").count(), 2);
    }

    #[test]
    fn test_scalar_optionals_check_presence_flag() {
        for kind in [ArgKind::Double, ArgKind::Int, ArgKind::Bool, ArgKind::String, ArgKind::Flags] {
            let source = render(with_optional(optional("level", kind)));
            assert!(source.contains("if (opts->has_level) {"), "{kind:?}");
            assert!(!source.contains("if (opts->level) {"), "{kind:?}");
        }

        let enum_arg = optional("kernel", ArgKind::Enum).with_enum_type("VipsKernel");
        let source = render(with_optional(enum_arg));
        assert!(source.contains("if (opts->has_kernel) {"));
        assert!(source.contains("vips_object_set(VIPS_OBJECT(op), \"kernel\", (int)opts->kernel, NULL);"));
    }

    #[test]
    fn test_aggregate_optionals_check_null() {
        for kind in [
            ArgKind::Image,
            ArgKind::Interpolate,
            ArgKind::ArrayDouble,
            ArgKind::ArrayInt,
            ArgKind::ArrayImage,
            ArgKind::Blob,
        ] {
            let source = render(with_optional(optional("extra", kind)));
            assert!(source.contains("if (opts->extra) {"), "{kind:?}");
            assert!(!source.contains("if (opts->has_extra) {"), "{kind:?}");
        }
    }

    #[test]
    fn test_optional_failures_are_ignored() {
        let source = render(with_optional(optional("sigma", ArgKind::Double)));
        assert!(source.contains("            vips_object_set(VIPS_OBJECT(op), \"sigma\", opts->sigma, NULL);\n"));
        assert!(!source.contains("\"sigma\", opts->sigma, NULL)) goto error"));
    }

    #[test]
    fn test_arrays_are_boxed_and_released() {
        let op = OperationSignature::new("linear", "", "arithmetic")
            .with_arg(ArgumentSignature::new("a", ArgKind::ArrayDouble, ArgFlags::INPUT | ArgFlags::REQUIRED, 1))
            .with_arg(optional("mask", ArgKind::ArrayInt))
            .with_arg(optional("data", ArgKind::Blob));
        let source = render(op);

        assert!(source.contains("VipsArrayDouble *boxed_value = vips_array_double_new(a, a_n);"));
        assert!(source.contains("int set_status = vips_object_set(VIPS_OBJECT(op), \"a\", boxed_value, NULL);"));
        assert!(source.contains("if (set_status) goto error;"));
        assert!(source.contains("VipsArrayInt *boxed_value = vips_array_int_new(opts->mask, opts->mask_n);"));
        assert!(source.contains("VipsBlob *boxed_value = vips_blob_copy(opts->data, opts->data_n);"));
        assert_eq!(source.matches("vips_area_unref(VIPS_AREA(boxed_value));").count(), 3);
    }

    #[test]
    fn test_bool_is_cast_to_gboolean() {
        let op = OperationSignature::new("flag", "", "misc")
            .with_arg(ArgumentSignature::new("on", ArgKind::Bool, ArgFlags::INPUT | ArgFlags::REQUIRED, 1));
        let source = render(op);
        assert!(source.contains("if (vips_object_set(VIPS_OBJECT(op), \"on\", (gboolean)on, NULL)) goto error;"));
    }
}
