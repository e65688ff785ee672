// File: src/registry.rs
// Purpose: Validator registry, field descriptors and callback registration

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::message::{FormatArg, MessageCatalog, MessageKey};
use crate::numeric::parse_leading_int;
use crate::patterns;
use crate::rules::{FieldRules, Rule, ValidatorKind};

/// Result of running one or more validators on a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(String),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid(msg) => Some(msg),
        }
    }
}

impl From<Result<(), String>> for ValidationOutcome {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => ValidationOutcome::Valid,
            Err(msg) => ValidationOutcome::Invalid(msg),
        }
    }
}

impl From<ValidationOutcome> for Result<(), String> {
    fn from(outcome: ValidationOutcome) -> Self {
        match outcome {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid(msg) => Err(msg),
        }
    }
}

/// A field as seen by the validators
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub value: String,
    /// Human readable label used in messages
    pub caption: String,
    pub rules: FieldRules,
}

impl FieldDescriptor {
    pub fn new(value: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            caption: caption.into(),
            rules: FieldRules::new(),
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: FieldRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.insert(rule);
        self
    }
}

/// Borrowed view of another field, used by `sameAs`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef<'a> {
    pub value: &'a str,
    pub caption: &'a str,
}

/// Resolves other fields of the same form by id
pub trait FieldLookup {
    fn lookup(&self, id: &str) -> Option<FieldRef<'_>>;
}

/// Lookup for a field validated on its own
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFields;

impl FieldLookup for NoFields {
    fn lookup(&self, _id: &str) -> Option<FieldRef<'_>> {
        None
    }
}

impl FieldLookup for HashMap<String, FieldDescriptor> {
    fn lookup(&self, id: &str) -> Option<FieldRef<'_>> {
        self.get(id).map(|field| FieldRef {
            value: &field.value,
            caption: &field.caption,
        })
    }
}

/// A host-supplied validator registered by name
pub trait FieldCallback {
    fn check(&self, value: &str, caption: &str) -> ValidationOutcome;
}

impl<F> FieldCallback for F
where
    F: Fn(&str, &str) -> ValidationOutcome,
{
    fn check(&self, value: &str, caption: &str) -> ValidationOutcome {
        self(value, caption)
    }
}

/// The built-in validators plus named callbacks.
///
/// Evaluation never mutates the registry, so identical inputs always give
/// identical outcomes. Cloning is cheap: callbacks are shared.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    catalog: MessageCatalog,
    callbacks: HashMap<String, Rc<dyn FieldCallback>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: MessageCatalog) -> Self {
        Self {
            catalog,
            callbacks: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Swaps in another catalog; registered callbacks are kept
    pub fn set_catalog(&mut self, catalog: MessageCatalog) {
        self.catalog = catalog;
    }

    /// Registers `callback` under `name`, replacing any earlier one
    pub fn register_callback<C>(&mut self, name: impl Into<String>, callback: C)
    where
        C: FieldCallback + 'static,
    {
        let name = name.into();
        tracing::debug!("Registered validation callback {}", name);
        self.callbacks.insert(name, Rc::new(callback));
    }

    pub fn unregister_callback(&mut self, name: &str) -> bool {
        self.callbacks.remove(name).is_some()
    }

    pub fn has_callback(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    pub fn callback_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.callbacks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Formats a message from this registry's catalog
    pub fn format(&self, key: MessageKey, args: &[FormatArg]) -> String {
        self.catalog.format(key, args)
    }

    /// Runs the validator called `name` on a standalone field.
    ///
    /// See [`evaluate_in`](Self::evaluate_in).
    pub fn evaluate(&self, name: &str, field: &FieldDescriptor) -> ValidationOutcome {
        self.evaluate_in(name, field, &NoFields)
    }

    /// Runs a single validator by name.
    ///
    /// `name` may be a built-in validator (class or short name) or a
    /// registered callback. A built-in validator takes its parameter from
    /// `field.rules`, or its default when the field does not carry that rule.
    /// Any other name yields the `callback` message.
    pub fn evaluate_in(
        &self,
        name: &str,
        field: &FieldDescriptor,
        fields: &dyn FieldLookup,
    ) -> ValidationOutcome {
        if let Ok(kind) = name.parse::<ValidatorKind>() {
            let rule = field
                .rules
                .get(kind)
                .cloned()
                .unwrap_or_else(|| default_rule(kind));
            return self.check_rule(&rule, field, fields);
        }

        self.run_callback(name, field)
    }

    /// Runs every rule of a standalone field.
    ///
    /// See [`validate_in`](Self::validate_in).
    pub fn validate(&self, field: &FieldDescriptor) -> ValidationOutcome {
        self.validate_in(field, &NoFields)
    }

    /// Runs the field's rules in evaluation order and stops at the first
    /// failure.
    pub fn validate_in(&self, field: &FieldDescriptor, fields: &dyn FieldLookup) -> ValidationOutcome {
        for rule in &field.rules {
            let outcome = self.check_rule(rule, field, fields);
            if let ValidationOutcome::Invalid(msg) = &outcome {
                tracing::debug!("{} failed {}: {}", field.caption, rule.kind(), msg);
                return outcome;
            }
        }
        ValidationOutcome::Valid
    }

    /// Runs one rule against a field
    pub fn check_rule(
        &self,
        rule: &Rule,
        field: &FieldDescriptor,
        fields: &dyn FieldLookup,
    ) -> ValidationOutcome {
        let value = field.value.as_str();
        let caption = field.caption.as_str();
        let fail = |args: &[FormatArg]| {
            ValidationOutcome::Invalid(self.catalog.format(rule.kind().message_key(), args))
        };
        let check = |ok: bool| {
            if ok {
                ValidationOutcome::Valid
            } else {
                fail(&[caption.into()])
            }
        };

        match rule {
            Rule::Required => check(!is_blank(value)),
            Rule::MinLength(min) => {
                if *min > 0 && value.chars().count() < *min {
                    fail(&[caption.into(), (*min).into()])
                } else {
                    ValidationOutcome::Valid
                }
            }
            Rule::MaxLength(max) => {
                if *max > 0 && value.chars().count() > *max {
                    fail(&[caption.into(), (*max).into()])
                } else {
                    ValidationOutcome::Valid
                }
            }
            Rule::Min(Some(min)) => match parse_leading_int(value) {
                Some(n) if n < *min => fail(&[caption.into(), (*min).into()]),
                _ => ValidationOutcome::Valid,
            },
            Rule::Max(Some(max)) => match parse_leading_int(value) {
                Some(n) if n > *max => fail(&[caption.into(), (*max).into()]),
                _ => ValidationOutcome::Valid,
            },
            Rule::Min(None) | Rule::Max(None) => ValidationOutcome::Valid,
            Rule::SameAs(target) => match fields.lookup(target) {
                Some(other) if other.value != value => fail(&[caption.into(), other.caption.into()]),
                _ => ValidationOutcome::Valid,
            },
            Rule::Email => check(patterns::is_valid_email(value)),
            Rule::Url => check(patterns::is_valid_url(value)),
            Rule::Number => check(patterns::is_number(value)),
            Rule::Integer => check(patterns::is_integer(value)),
            Rule::Alpha => check(patterns::is_alpha(value)),
            Rule::AlphaNum => check(patterns::is_alpha_num(value)),
            Rule::Phrase => check(patterns::is_phrase(value)),
            Rule::Phone => check(patterns::is_phone(value)),
            Rule::Date => check(patterns::is_date(value)),
            Rule::Callback(name) => self.run_callback(name, field),
        }
    }

    fn run_callback(&self, name: &str, field: &FieldDescriptor) -> ValidationOutcome {
        match self.callbacks.get(name) {
            Some(callback) => callback.check(&field.value, &field.caption),
            None => {
                tracing::warn!("Validation callback {:?} is not registered", name);
                ValidationOutcome::Invalid(
                    self.catalog
                        .format(MessageKey::Callback, &[field.caption.as_str().into(), name.into()]),
                )
            }
        }
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("catalog", &self.catalog)
            .field("callbacks", &self.callback_names())
            .finish()
    }
}

/// Whitespace only, counting a byte order mark as whitespace
fn is_blank(value: &str) -> bool {
    value
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
        .is_empty()
}

/// Rule used when a validator is invoked on a field that carries no
/// parameter for it
fn default_rule(kind: ValidatorKind) -> Rule {
    match kind {
        ValidatorKind::Required => Rule::Required,
        ValidatorKind::MinLength => Rule::MinLength(0),
        ValidatorKind::Min => Rule::Min(None),
        ValidatorKind::MaxLength => Rule::MaxLength(0),
        ValidatorKind::Max => Rule::Max(None),
        ValidatorKind::SameAs => Rule::SameAs(String::new()),
        ValidatorKind::Email => Rule::Email,
        ValidatorKind::Url => Rule::Url,
        ValidatorKind::Number => Rule::Number,
        ValidatorKind::Integer => Rule::Integer,
        ValidatorKind::Alpha => Rule::Alpha,
        ValidatorKind::AlphaNum => Rule::AlphaNum,
        ValidatorKind::Phrase => Rule::Phrase,
        ValidatorKind::Phone => Rule::Phone,
        ValidatorKind::Date => Rule::Date,
        ValidatorKind::Callback => Rule::Callback(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_conversions() {
        let outcome: ValidationOutcome = Err("bad".to_string()).into();
        assert_eq!(outcome.message(), Some("bad"));
        let back: Result<(), String> = ValidationOutcome::Valid.into();
        assert!(back.is_ok());
    }

    #[test]
    fn test_closure_callback() {
        let mut registry = ValidatorRegistry::new();
        registry.register_callback("is_34", |value: &str, caption: &str| {
            if value == "34" {
                ValidationOutcome::Valid
            } else {
                ValidationOutcome::Invalid(format!("{caption} value should be \"34\""))
            }
        });

        assert!(registry.has_callback("is_34"));
        assert!(registry.evaluate("is_34", &FieldDescriptor::new("34", "Age")).is_valid());
        assert_eq!(
            registry.evaluate("is_34", &FieldDescriptor::new("35", "Age")).message(),
            Some("Age value should be \"34\"")
        );
        assert!(registry.unregister_callback("is_34"));
        assert!(!registry.has_callback("is_34"));
    }

    #[test]
    fn test_debug_lists_callbacks() {
        let mut registry = ValidatorRegistry::new();
        registry.register_callback("b", |_: &str, _: &str| ValidationOutcome::Valid);
        registry.register_callback("a", |_: &str, _: &str| ValidationOutcome::Valid);
        assert_eq!(registry.callback_names(), vec!["a", "b"]);
        assert!(format!("{registry:?}").contains(r#"callbacks: ["a", "b"]"#));
    }
}
