//! Uni-Form Validation Core
//!
//! The validator registry and message formatter behind Uni-Form forms.
//! Shared by the form binder, the CLI and the WASM bindings so every
//! surface produces the same outcomes and the same messages.
//!
//! ```
//! use uniform_validation_core::{FieldDescriptor, Rule, ValidatorRegistry};
//!
//! let registry = ValidatorRegistry::new();
//! let field = FieldDescriptor::new("Al", "Name").with_rule(Rule::MinLength(3));
//! assert_eq!(
//!     registry.validate(&field).message(),
//!     Some("Name should be at least 3 characters long"),
//! );
//! ```

pub mod error;
pub mod message;
pub mod numeric;
pub mod patterns;
pub mod registry;
pub mod rules;

pub use error::{Result, UniformError};
pub use message::{format, format_template, FormatArg, MessageCatalog, MessageKey};
pub use registry::{
    FieldCallback, FieldDescriptor, FieldLookup, FieldRef, NoFields, ValidationOutcome,
    ValidatorRegistry,
};
pub use rules::{Bound, FieldRules, Rule, RuleConfig, ValidatorKind};
