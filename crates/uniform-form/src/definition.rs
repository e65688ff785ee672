// File: src/definition.rs
// Purpose: Form definitions parsed from TOML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uniform_validation_core::FieldRules;

use crate::settings::FormSettings;

/// A whole form: settings, form classes and control holders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormDefinition {
    #[serde(default)]
    pub settings: FormSettings,

    /// Class attribute of the form element (`preventSubmit`, `askOnLeave`)
    #[serde(default)]
    pub class: String,

    #[serde(default, rename = "holder")]
    pub holders: Vec<HolderDefinition>,
}

/// A control holder: label, optional hint and its fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolderDefinition {
    pub label: String,

    /// Hint text shown below the fields, replaced by validation messages
    #[serde(default)]
    pub hint: Option<String>,

    #[serde(default, rename = "field")]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Input,
    Textarea,
    Select,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,

    /// Name used when serializing the form; defaults to the id
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub kind: FieldKind,

    #[serde(default)]
    pub value: String,

    /// Placeholder text shown while the field is empty
    #[serde(default)]
    pub default_value: Option<String>,

    /// Class attribute; validator class names in it are activated
    #[serde(default)]
    pub class: String,

    /// Structured rules, merged over the ones found in `class`
    #[serde(default)]
    pub rules: FieldRules,
}

impl FieldDefinition {
    /// Rules from the class attribute, overridden by structured rules
    pub fn effective_rules(&self) -> FieldRules {
        let mut rules = FieldRules::from_class_attr(&self.class);
        for rule in &self.rules {
            rules.insert(rule.clone());
        }
        rules
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

impl FormDefinition {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse form definition")
    }

    /// Loads a form definition from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read form definition: {:?}", path))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse form definition: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uniform_validation_core::{Rule, ValidatorKind};

    const SIGNUP: &str = r#"
        class = "uniForm preventSubmit"

        [settings]
        ask_on_leave = true

        [[holder]]
        label = "Email"
        hint = "We never share it"

        [[holder.field]]
        id = "email"
        default_value = "you@example.com"
        class = "textInput required validateEmail"

        [[holder]]
        label = "Age"

        [[holder.field]]
        id = "age"
        name = "user_age"
        rules = { integer = true, min = 18 }
    "#;

    #[test]
    fn test_parse_definition() {
        let def = FormDefinition::from_toml_str(SIGNUP).unwrap();
        assert_eq!(def.class, "uniForm preventSubmit");
        assert!(def.settings.ask_on_leave);
        assert!(!def.settings.prevent_submit);
        assert_eq!(def.holders.len(), 2);
        assert_eq!(def.holders[0].hint.as_deref(), Some("We never share it"));

        let email = &def.holders[0].fields[0];
        assert_eq!(email.kind, FieldKind::Input);
        assert_eq!(email.name(), "email");
        assert!(email.effective_rules().contains(ValidatorKind::Email));

        let age = &def.holders[1].fields[0];
        assert_eq!(age.name(), "user_age");
        assert_eq!(age.effective_rules().get(ValidatorKind::Min), Some(&Rule::Min(Some(18))));
    }

    #[test]
    fn test_structured_rules_override_class() {
        let field = FieldDefinition {
            id: "code".to_string(),
            class: "validateMaxLength val-4".to_string(),
            rules: FieldRules::new().with(Rule::MaxLength(8)),
            ..FieldDefinition::default()
        };
        assert_eq!(
            field.effective_rules().get(ValidatorKind::MaxLength),
            Some(&Rule::MaxLength(8))
        );
    }

    #[test]
    fn test_unknown_rule_is_rejected() {
        let toml = r#"
            [[holder]]
            label = "X"
            [[holder.field]]
            id = "x"
            rules = { postcode = true }
        "#;
        assert!(FormDefinition::from_toml_str(toml).is_err());
    }
}
