// Uni-Form binder
// Headless focus/blur/submit/leave handling for forms validated by
// uniform-validation-core

pub mod definition;
pub mod form;
pub mod settings;

pub use definition::{FieldDefinition, FieldKind, FormDefinition, HolderDefinition};
pub use form::{BlurOutcome, Field, FieldColor, Form, FormError, Hint, Holder, SubmitDecision};
pub use settings::{FormSettings, ASK_ON_LEAVE_CLASS, PREVENT_SUBMIT_CLASS};

// Re-export the validation core
pub use uniform_validation_core as validation;
