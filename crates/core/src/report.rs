//! Human-readable listings of a discovered registry
//!
//! Used by the `list`, `enums` and `coverage` commands. Everything here
//! returns a string so the CLI decides where it goes.

use std::collections::BTreeMap;

use crate::policy::Policy;
use crate::types::{ArgumentSignature, EnumSignature, OperationSignature};

fn format_args(args: &[&ArgumentSignature]) -> String {
    args.iter()
        .map(|arg| format!("{}:{}", arg.name, arg.type_label()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Generated operations grouped by category, optionally limited to one
/// category. The header counts cover the whole registry.
pub fn render_operation_list(ops: &[OperationSignature], policy: &Policy, category: Option<&str>) -> String {
    let generated = ops.iter().filter(|op| policy.is_generated(op)).count();
    let mut out = format!(
        "Discovered {} operations ({} excluded, {} generatable)\n\n",
        ops.len(),
        ops.len() - generated,
        generated
    );

    let mut categories: BTreeMap<String, Vec<&OperationSignature>> = BTreeMap::new();
    for op in ops.iter().filter(|op| policy.is_generated(op)) {
        let classified = policy.classify_category(&op.name, &op.category);
        if category.is_some_and(|wanted| wanted != classified) {
            continue;
        }
        categories.entry(classified).or_default().push(op);
    }

    for (name, mut members) in categories {
        members.sort_by(|a, b| a.name.cmp(&b.name));
        out.push_str(&format!("=== {} ({} ops) ===\n", name, members.len()));
        for op in members {
            match policy.min_version(&op.name) {
                Some(version) => out.push_str(&format!(
                    "  {}: {} (requires libvips {}+)\n",
                    op.name, op.description, version
                )),
                None => out.push_str(&format!("  {}: {}\n", op.name, op.description)),
            }

            let required = op.required_inputs();
            let optional = op.optional_inputs();
            let outputs = op.outputs();
            if !required.is_empty() {
                out.push_str(&format!("    required: {}\n", format_args(&required)));
            }
            if !optional.is_empty() {
                out.push_str(&format!("    optional: {}\n", format_args(&optional)));
            }
            if !outputs.is_empty() {
                out.push_str(&format!("    outputs:  {}\n", format_args(&outputs)));
            }
            out.push('\n');
        }
    }

    out
}

/// Enum types with their bridge names and values.
pub fn render_enum_list(enums: &[EnumSignature], policy: &Policy) -> String {
    let mut out = format!("Discovered {} enum types\n\n", enums.len());
    for signature in enums {
        let bridge_name = policy
            .enum_type_name(&signature.native_name)
            .unwrap_or("(unmapped)");
        out.push_str(&format!("{} -> {}\n", signature.native_name, bridge_name));
        for value in &signature.values {
            out.push_str(&format!(
                "  {} = {} (nick: {})\n",
                value.native_name, value.value, value.nick
            ));
        }
        out.push('\n');
    }
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageRow {
    pub generated: usize,
    pub excluded: usize,
}

impl CoverageRow {
    pub fn total(&self) -> usize {
        self.generated + self.excluded
    }
}

/// Per-category counts of generated and excluded operations.
pub fn coverage(ops: &[OperationSignature], policy: &Policy) -> BTreeMap<String, CoverageRow> {
    let mut rows: BTreeMap<String, CoverageRow> = BTreeMap::new();
    for op in ops {
        let row = rows
            .entry(policy.classify_category(&op.name, &op.category))
            .or_default();
        if policy.is_generated(op) {
            row.generated += 1;
        } else {
            row.excluded += 1;
        }
    }
    rows
}

pub fn render_coverage(ops: &[OperationSignature], policy: &Policy) -> String {
    let rule = "-".repeat(50);
    let mut out = String::from("Coverage Report\n");
    out.push_str(&format!(
        "{:<20} {:>8} {:>8} {:>8}\n",
        "Category", "Generate", "Excluded", "Total"
    ));
    out.push_str(&format!("{rule}\n"));

    let mut totals = CoverageRow::default();
    for (category, row) in coverage(ops, policy) {
        totals.generated += row.generated;
        totals.excluded += row.excluded;
        out.push_str(&format!(
            "{:<20} {:>8} {:>8} {:>8}\n",
            category,
            row.generated,
            row.excluded,
            row.total()
        ));
    }

    out.push_str(&format!("{rule}\n"));
    out.push_str(&format!(
        "{:<20} {:>8} {:>8} {:>8}\n",
        "TOTAL",
        totals.generated,
        totals.excluded,
        totals.total()
    ));
    out
}
