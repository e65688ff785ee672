//! The form state machine
//!
//! A [`Form`] holds the presentation state the binder manages: class sets on
//! holders and fields, field values with their placeholder defaults, the
//! hint text of each holder, and the text color of each field. The host
//! forwards focus, blur, submit and unload events and renders the state.

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;
use uniform_validation_core::{
    FieldDescriptor, FieldLookup, FieldRef, FieldRules, MessageKey, ValidationOutcome,
    ValidatorRegistry,
};

use crate::definition::{FieldKind, FormDefinition};
use crate::settings::{FormSettings, ASK_ON_LEAVE_CLASS, PREVENT_SUBMIT_CLASS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Duplicate field id: {0}")]
    DuplicateField(String),
}

pub type Result<T> = std::result::Result<T, FormError>;

/// Text color of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldColor {
    /// The field's own color
    Normal,
    /// The settings' `default_value_color`, shown with the default value
    Muted,
}

#[derive(Debug, Clone)]
pub struct Hint {
    pub html: String,
    /// Original hint, saved while a validation message replaces it
    saved: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Holder {
    pub label: String,
    pub classes: BTreeSet<String>,
    pub hint: Option<Hint>,
    fields: Vec<usize>,
}

impl Holder {
    pub fn hint_text(&self) -> Option<&str> {
        self.hint.as_ref().map(|hint| hint.html.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub id: String,
    pub name: String,
    pub kind: FieldKind,
    pub value: String,
    pub default_value: Option<String>,
    pub rules: FieldRules,
    pub classes: BTreeSet<String>,
    pub color: FieldColor,
    holder: usize,
}

impl Field {
    fn shows_default(&self) -> bool {
        self.default_value.as_deref() == Some(self.value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// What a blur event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlurOutcome {
    /// Empty optional field: the default value was put back, state untouched
    Restored,
    /// The field has no validators
    Unvalidated,
    Validated(ValidationOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDecision {
    Allow,
    Block,
}

/// A bound form
#[derive(Debug, Clone)]
pub struct Form {
    settings: FormSettings,
    classes: BTreeSet<String>,
    holders: Vec<Holder>,
    fields: Vec<Field>,
    index: HashMap<String, usize>,
    registry: ValidatorRegistry,
    initial_values: Option<Vec<(String, String)>>,
}

impl Form {
    /// Builds the form and applies the initial presentation: fields that
    /// are empty or hold their default show the default value, muted.
    pub fn new(definition: FormDefinition, registry: ValidatorRegistry) -> Result<Self> {
        let FormDefinition {
            settings,
            class,
            holders: holder_defs,
        } = definition;

        let mut holders = Vec::with_capacity(holder_defs.len());
        let mut fields = Vec::new();
        let mut index = HashMap::new();

        for (holder_idx, holder_def) in holder_defs.into_iter().enumerate() {
            let mut holder = Holder {
                label: holder_def.label,
                classes: BTreeSet::from([settings.holder_class.clone()]),
                hint: holder_def.hint.map(|html| Hint { html, saved: None }),
                fields: Vec::with_capacity(holder_def.fields.len()),
            };

            for field_def in holder_def.fields {
                if index.contains_key(&field_def.id) {
                    return Err(FormError::DuplicateField(field_def.id));
                }

                let mut field = Field {
                    name: field_def.name().to_string(),
                    rules: field_def.effective_rules(),
                    classes: field_def.class.split_whitespace().map(str::to_string).collect(),
                    id: field_def.id,
                    kind: field_def.kind,
                    value: field_def.value,
                    default_value: field_def.default_value,
                    color: FieldColor::Normal,
                    holder: holder_idx,
                };

                if field.value.is_empty() || field.shows_default() {
                    if field.kind != FieldKind::Select {
                        field.color = FieldColor::Muted;
                    }
                    if let Some(default) = &field.default_value {
                        field.value.clone_from(default);
                    }
                }

                index.insert(field.id.clone(), fields.len());
                holder.fields.push(fields.len());
                fields.push(field);
            }

            holders.push(holder);
        }

        let mut form = Self {
            settings,
            classes: class.split_whitespace().map(str::to_string).collect(),
            holders,
            fields,
            index,
            registry,
            initial_values: None,
        };

        if form.settings.ask_on_leave || form.classes.contains(ASK_ON_LEAVE_CLASS) {
            form.initial_values = Some(form.serialize());
        }

        tracing::debug!(
            "Bound form with {} holders and {} fields",
            form.holders.len(),
            form.fields.len()
        );

        Ok(form)
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    /// Mutable access for registering callbacks after binding
    pub fn registry_mut(&mut self) -> &mut ValidatorRegistry {
        &mut self.registry
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn holders(&self) -> &[Holder] {
        &self.holders
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.index.get(id).map(|&idx| &self.fields[idx])
    }

    /// Holder containing the field
    pub fn holder_of(&self, id: &str) -> Option<&Holder> {
        self.field(id).map(|field| &self.holders[field.holder])
    }

    /// Fields of a holder, in definition order
    pub fn holder_fields<'a>(&'a self, holder: &'a Holder) -> impl Iterator<Item = &'a Field> + 'a {
        holder.fields.iter().map(move |&idx| &self.fields[idx])
    }

    /// The field as the validators see it, captioned by its holder label
    pub fn descriptor(&self, id: &str) -> Option<FieldDescriptor> {
        let field = self.field(id)?;
        Some(
            FieldDescriptor::new(field.value.clone(), self.holders[field.holder].label.clone())
                .with_rules(field.rules.clone()),
        )
    }

    /// `(name, value)` pairs in field order
    pub fn serialize(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.value.clone()))
            .collect()
    }

    fn field_index(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| FormError::UnknownField(id.to_string()))
    }

    /// Host input: replaces the field's value
    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> Result<()> {
        let idx = self.field_index(id)?;
        self.fields[idx].value = value.into();
        Ok(())
    }

    fn clear_focus(&mut self) {
        let focused = &self.settings.focused_class;
        for holder in &mut self.holders {
            holder.classes.remove(focused);
        }
        for field in &mut self.fields {
            field.classes.remove(focused);
        }
    }

    /// Focus: only this field's holder is focused, and a shown default
    /// value is cleared for typing.
    pub fn focus(&mut self, id: &str) -> Result<()> {
        let idx = self.field_index(id)?;
        self.clear_focus();

        let holder = self.fields[idx].holder;
        self.holders[holder]
            .classes
            .insert(self.settings.focused_class.clone());

        let field = &mut self.fields[idx];
        if field.shows_default() {
            field.value.clear();
        }
        if field.kind != FieldKind::Select {
            field.color = FieldColor::Normal;
        }

        tracing::trace!("Focused {}", id);
        Ok(())
    }

    /// Blur: validates the field and marks it and its holder valid or
    /// invalid.
    ///
    /// An empty optional field, or one still holding its default, is not
    /// validated; its default value is shown again instead.
    pub fn blur(&mut self, id: &str) -> Result<BlurOutcome> {
        let idx = self.field_index(id)?;
        self.clear_focus();

        let field = &mut self.fields[idx];
        if (field.value.is_empty() || field.shows_default()) && !field.rules.is_required() {
            if field.kind != FieldKind::Select {
                field.color = FieldColor::Muted;
            }
            if let Some(default) = &field.default_value {
                field.value.clone_from(default);
            }
            return Ok(BlurOutcome::Restored);
        }

        if field.rules.is_empty() {
            field.color = FieldColor::Normal;
            return Ok(BlurOutcome::Unvalidated);
        }

        let descriptor = self
            .descriptor(id)
            .ok_or_else(|| FormError::UnknownField(id.to_string()))?;
        let outcome = self.registry.validate_in(&descriptor, &*self);

        match &outcome {
            ValidationOutcome::Invalid(msg) => {
                tracing::debug!("{} is invalid: {}", id, msg);
                self.mark(idx, false, Some(msg.clone()));
            }
            ValidationOutcome::Valid => {
                tracing::debug!("{} is valid", id);
                self.mark(idx, true, None);
                self.fields[idx].color = FieldColor::Normal;
            }
        }

        Ok(BlurOutcome::Validated(outcome))
    }

    /// Applies the validation state to a field, its holder and the
    /// holder's hint
    fn mark(&mut self, idx: usize, valid: bool, message: Option<String>) {
        let settings = &self.settings;
        let field = &mut self.fields[idx];
        let holder = &mut self.holders[field.holder];

        for classes in [&mut holder.classes, &mut field.classes] {
            toggle(classes, &settings.invalid_class, !valid);
            toggle(classes, &settings.error_class, !valid);
            toggle(classes, &settings.valid_class, valid);
        }

        let Some(hint) = holder.hint.as_mut() else {
            return;
        };

        let mut text = message;
        if !valid && hint.saved.as_deref().map_or(true, str::is_empty) {
            hint.saved = Some(hint.html.clone());
        } else if valid {
            text.clone_from(&hint.saved);
        }

        if let Some(text) = text.filter(|t| !t.is_empty()) {
            hint.html = text;
        }
    }

    /// Submit: clears fields still showing their default, then blocks when
    /// submit prevention is on and anything is marked invalid.
    pub fn submit(&mut self) -> SubmitDecision {
        for field in &mut self.fields {
            if field.shows_default() {
                field.value.clear();
            }
        }

        let prevent =
            self.settings.prevent_submit || self.classes.contains(PREVENT_SUBMIT_CLASS);
        if prevent && self.has_errors() {
            tracing::debug!("Submit blocked by invalid fields");
            return SubmitDecision::Block;
        }

        SubmitDecision::Allow
    }

    /// Whether any holder or field carries the invalid or error class
    pub fn has_errors(&self) -> bool {
        let marked = |classes: &BTreeSet<String>| {
            classes.contains(&self.settings.invalid_class)
                || classes.contains(&self.settings.error_class)
        };
        self.holders.iter().any(|h| marked(&h.classes))
            || self.fields.iter().any(|f| marked(&f.classes))
    }

    /// Leave prompt: the `on_leave` message when leave checking is on and
    /// the values differ from those at binding time
    pub fn before_unload(&self) -> Option<String> {
        let initial = self.initial_values.as_ref()?;
        if *initial == self.serialize() {
            return None;
        }
        Some(self.registry.format(MessageKey::OnLeave, &[]))
    }
}

impl FieldLookup for Form {
    fn lookup(&self, id: &str) -> Option<FieldRef<'_>> {
        let field = self.field(id)?;
        Some(FieldRef {
            value: &field.value,
            caption: &self.holders[field.holder].label,
        })
    }
}

fn toggle(classes: &mut BTreeSet<String>, class: &str, on: bool) {
    if on {
        classes.insert(class.to_string());
    } else {
        classes.remove(class);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{FieldDefinition, HolderDefinition};

    fn single_field(field: FieldDefinition) -> Form {
        let definition = FormDefinition {
            holders: vec![HolderDefinition {
                label: "Name".to_string(),
                hint: Some("Your full name".to_string()),
                fields: vec![field],
            }],
            ..FormDefinition::default()
        };
        Form::new(definition, ValidatorRegistry::new()).unwrap()
    }

    #[test]
    fn test_default_value_shown_muted() {
        let form = single_field(FieldDefinition {
            id: "name".to_string(),
            default_value: Some("Jane Doe".to_string()),
            ..FieldDefinition::default()
        });
        let field = form.field("name").unwrap();
        assert_eq!(field.value, "Jane Doe");
        assert_eq!(field.color, FieldColor::Muted);
        assert!(form.holder_of("name").unwrap().has_class("ctrlHolder"));
    }

    #[test]
    fn test_select_keeps_color() {
        let form = single_field(FieldDefinition {
            id: "country".to_string(),
            kind: FieldKind::Select,
            ..FieldDefinition::default()
        });
        assert_eq!(form.field("country").unwrap().color, FieldColor::Normal);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let field = FieldDefinition {
            id: "a".to_string(),
            ..FieldDefinition::default()
        };
        let definition = FormDefinition {
            holders: vec![HolderDefinition {
                label: "A".to_string(),
                hint: None,
                fields: vec![field.clone(), field],
            }],
            ..FormDefinition::default()
        };
        let err = Form::new(definition, ValidatorRegistry::new()).unwrap_err();
        assert_eq!(err, FormError::DuplicateField("a".to_string()));
    }

    #[test]
    fn test_unknown_field() {
        let mut form = single_field(FieldDefinition {
            id: "name".to_string(),
            ..FieldDefinition::default()
        });
        assert_eq!(
            form.focus("nope").unwrap_err(),
            FormError::UnknownField("nope".to_string())
        );
    }
}
