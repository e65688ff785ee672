// File: src/settings.rs
// Purpose: Binder settings, the [settings] table of a form definition

use serde::{Deserialize, Serialize};

/// Form class that turns on submit blocking regardless of settings
pub const PREVENT_SUBMIT_CLASS: &str = "preventSubmit";

/// Form class that turns on the leave prompt regardless of settings
pub const ASK_ON_LEAVE_CLASS: &str = "askOnLeave";

/// Binder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    /// Block submission while any field is marked invalid
    pub prevent_submit: bool,

    /// Warn before leaving a page with unsaved changes
    pub ask_on_leave: bool,

    pub valid_class: String,
    pub invalid_class: String,
    pub error_class: String,
    pub focused_class: String,

    /// Class of the container grouping a label, hint and fields
    pub holder_class: String,

    /// Text color while a field shows its default value
    pub default_value_color: String,
}

fn default_valid_class() -> String {
    "valid".to_string()
}

fn default_invalid_class() -> String {
    "invalid".to_string()
}

fn default_error_class() -> String {
    "error".to_string()
}

fn default_focused_class() -> String {
    "focused".to_string()
}

fn default_holder_class() -> String {
    "ctrlHolder".to_string()
}

fn default_value_color() -> String {
    "#AFAFAF".to_string()
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            prevent_submit: false,
            ask_on_leave: false,
            valid_class: default_valid_class(),
            invalid_class: default_invalid_class(),
            error_class: default_error_class(),
            focused_class: default_focused_class(),
            holder_class: default_holder_class(),
            default_value_color: default_value_color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = FormSettings::default();
        assert!(!settings.prevent_submit);
        assert!(!settings.ask_on_leave);
        assert_eq!(settings.invalid_class, "invalid");
        assert_eq!(settings.holder_class, "ctrlHolder");
        assert_eq!(settings.default_value_color, "#AFAFAF");
    }

    #[test]
    fn test_partial_settings() {
        let toml = r#"
            prevent_submit = true
            error_class = "has-error"
        "#;
        let settings: FormSettings = toml::from_str(toml).unwrap();
        assert!(settings.prevent_submit);
        assert_eq!(settings.error_class, "has-error");
        assert_eq!(settings.valid_class, "valid");
    }
}
