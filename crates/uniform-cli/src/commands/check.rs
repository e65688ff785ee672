use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use uniform_form::validation::{MessageCatalog, ValidationOutcome, ValidatorRegistry};
use uniform_form::{BlurOutcome, Form, FormDefinition, SubmitDecision};

/// Tabs through every field of the form and submits it.
///
/// Returns whether the form would be submitted.
pub fn execute(form_path: &Path, values_path: Option<&Path>, catalog: MessageCatalog) -> Result<bool> {
    let definition = FormDefinition::load(form_path)?;
    let values = match values_path {
        Some(path) => load_values(path)?,
        None => HashMap::new(),
    };

    let mut form = Form::new(definition, ValidatorRegistry::with_catalog(catalog))?;

    for (id, _) in values.iter().filter(|(id, _)| form.field(id).is_none()) {
        tracing::warn!("Value given for unknown field: {}", id);
    }

    println!("{} {}", "Checking".green().bold(), form_path.display());
    println!();

    let ids: Vec<String> = form.fields().iter().map(|f| f.id.clone()).collect();
    for id in &ids {
        form.focus(id)?;
        if let Some(value) = values.get(id) {
            form.set_value(id, value.as_str())?;
        }

        match form.blur(id)? {
            BlurOutcome::Validated(ValidationOutcome::Valid) => {
                println!("  {} {}", "✓".green(), id);
            }
            BlurOutcome::Validated(ValidationOutcome::Invalid(msg)) => {
                println!("  {} {}: {}", "✗".red(), id, msg.red());
            }
            BlurOutcome::Unvalidated => {
                println!("  {} {}", "-".dimmed(), format!("{id} (no validators)").dimmed());
            }
            BlurOutcome::Restored => {
                println!("  {} {}", "-".dimmed(), format!("{id} (empty)").dimmed());
            }
        }
    }

    println!();
    match form.submit() {
        SubmitDecision::Allow if form.has_errors() => {
            println!("{}", "⚠ Submit allowed with invalid fields".yellow());
            Ok(true)
        }
        SubmitDecision::Allow => {
            println!("{}", "✓ Submit allowed".green().bold());
            Ok(true)
        }
        SubmitDecision::Block => {
            println!("{}", "✗ Submit blocked".red().bold());
            Ok(false)
        }
    }
}

fn load_values(path: &Path) -> Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read values: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Values must be a JSON object of strings: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn demo(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos").join(name)
    }

    #[test]
    fn test_load_values() {
        let values = load_values(&demo("signup-values.json")).unwrap();
        assert_eq!(values.get("username").map(String::as_str), Some("jd"));
        assert_eq!(values.len(), 5);
    }

    #[test]
    fn test_demo_form_is_blocked() {
        let passed = execute(
            &demo("signup.toml"),
            Some(&demo("signup-values.json")),
            MessageCatalog::english(),
        )
        .unwrap();
        assert!(!passed);
    }

    #[test]
    fn test_missing_form_file() {
        let err = execute(&demo("missing.toml"), None, MessageCatalog::english()).unwrap_err();
        assert!(err.to_string().contains("Failed to read form definition"));
    }
}
