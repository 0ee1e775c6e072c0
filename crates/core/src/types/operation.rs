use serde::Serialize;

use super::argument::{ArgKind, ArgumentSignature};

/// A libvips operation discovered through introspection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationSignature {
    /// Registered nickname, e.g. `gaussblur`
    pub name: String,
    pub description: String,
    /// Category as reported by reflection, or the classified category once
    /// the operation has been selected for generation
    pub category: String,
    /// Arguments in priority order
    pub args: Vec<ArgumentSignature>,
}

impl OperationSignature {
    pub fn new(name: impl Into<String>, description: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: category.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: ArgumentSignature) -> Self {
        self.args.push(arg);
        self
    }

    pub fn required_inputs(&self) -> Vec<&ArgumentSignature> {
        self.args.iter().filter(|a| a.is_required_input()).collect()
    }

    pub fn optional_inputs(&self) -> Vec<&ArgumentSignature> {
        self.args.iter().filter(|a| a.is_optional_input()).collect()
    }

    pub fn outputs(&self) -> Vec<&ArgumentSignature> {
        self.args.iter().filter(|a| a.is_output()).collect()
    }

    pub fn has_optional_inputs(&self) -> bool {
        self.args.iter().any(|a| a.is_optional_input())
    }

    /// True when the first declared output is an image. Such operations can
    /// report errors through the partially built image.
    pub fn first_output_is_image(&self) -> bool {
        self.args
            .iter()
            .find(|a| a.is_output())
            .is_some_and(|a| a.kind == ArgKind::Image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArgFlags;

    fn blur() -> OperationSignature {
        OperationSignature::new("gaussblur", "gaussian blur", "convolution")
            .with_arg(ArgumentSignature::new("in", ArgKind::Image, ArgFlags::INPUT | ArgFlags::REQUIRED, 1))
            .with_arg(ArgumentSignature::new("out", ArgKind::Image, ArgFlags::OUTPUT | ArgFlags::REQUIRED, 2))
            .with_arg(ArgumentSignature::new("sigma", ArgKind::Double, ArgFlags::INPUT | ArgFlags::REQUIRED, 3))
            .with_arg(ArgumentSignature::new("min_ampl", ArgKind::Double, ArgFlags::INPUT, 4))
    }

    #[test]
    fn test_derived_views() {
        let op = blur();
        let names = |args: Vec<&ArgumentSignature>| args.iter().map(|a| a.name.clone()).collect::<Vec<_>>();

        assert_eq!(names(op.required_inputs()), vec!["in", "sigma"]);
        assert_eq!(names(op.optional_inputs()), vec!["min_ampl"]);
        assert_eq!(names(op.outputs()), vec!["out"]);
        assert!(op.has_optional_inputs());
        assert!(op.first_output_is_image());
    }

    #[test]
    fn test_first_output_must_be_image() {
        let op = OperationSignature::new("avg", "find image average", "arithmetic")
            .with_arg(ArgumentSignature::new("in", ArgKind::Image, ArgFlags::INPUT | ArgFlags::REQUIRED, 1))
            .with_arg(ArgumentSignature::new("out", ArgKind::Double, ArgFlags::OUTPUT | ArgFlags::REQUIRED, 2))
            .with_arg(ArgumentSignature::new("mask", ArgKind::Image, ArgFlags::OUTPUT, 3));

        assert!(!op.first_output_is_image());
    }
}
