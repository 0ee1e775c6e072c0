use super::shape::{OperationShape, c_declaration, length_name, param_name, presence_name};
use super::{EmitContext, Emitter, GENERATED_BANNER};
use crate::config::GeneratorConfig;
use crate::mapper::{self, names};
use crate::types::OperationSignature;

/// Renders the C header: one options struct per operation with optional
/// arguments, and one prototype per operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShimHeaderEmitter;

impl Emitter for ShimHeaderEmitter {
    fn name(&self) -> &'static str {
        "shim header"
    }

    fn file_name<'c>(&self, config: &'c GeneratorConfig) -> &'c str {
        &config.header_file
    }

    fn emit(&self, ops: &[OperationSignature], ctx: &EmitContext<'_>) -> String {
        let guard = ctx.config.header_guard();
        let mut out = String::new();
        out.push_str(GENERATED_BANNER);
        out.push('\n');
        out.push_str(&format!("#ifndef {guard}\n"));
        out.push_str(&format!("#define {guard}\n\n"));
        out.push_str("#include <stdlib.h>\n");
        out.push_str("#include <vips/vips.h>\n\n");

        for op in ops {
            emit_operation(&mut out, &OperationShape::new(op, ctx.policy));
        }

        out.push_str("#endif\n");
        out
    }
}

fn emit_operation(out: &mut String, shape: &OperationShape<'_>) {
    if shape.has_options() {
        out.push_str("typedef struct {\n");
        for arg in &shape.optional {
            out.push_str(&format!("    int {};\n", presence_name(arg)));
            let field = c_declaration(&shape.mapping(arg).shim, &param_name(arg));
            match mapper::length_type(arg.kind) {
                Some(length) => {
                    out.push_str(&format!("    {field}; {length} {};\n", length_name(arg)));
                }
                None => {
                    out.push_str(&format!("    {field};\n"));
                }
            }
        }
        out.push_str(&format!("}} {};\n\n", names::shim_options_struct_name(&shape.op.name)));
    }

    out.push_str(&format!("{};\n\n", shape.shim_signature()));
}
