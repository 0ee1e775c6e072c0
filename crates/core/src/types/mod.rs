pub mod argument;
pub mod enumeration;
pub mod operation;

// Re-export commonly used types
pub use argument::{ArgFlags, ArgKind, ArgumentSignature, NumericBounds};
pub use enumeration::{EnumSignature, EnumValue};
pub use operation::OperationSignature;
