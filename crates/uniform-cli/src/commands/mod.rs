pub mod check;
pub mod format;
pub mod parse;
pub mod validators;

use std::path::Path;

use anyhow::{Context, Result};
use uniform_validation_core::MessageCatalog;

/// English catalog, or the English catalog overridden by a TOML file
pub fn load_catalog(path: Option<&Path>) -> Result<MessageCatalog> {
    let Some(path) = path else {
        return Ok(MessageCatalog::english());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read message catalog: {}", path.display()))?;

    MessageCatalog::from_toml_str(&content)
        .with_context(|| format!("Failed to parse message catalog: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use uniform_validation_core::MessageKey;

    #[test]
    fn test_no_catalog_is_english() {
        let catalog = load_catalog(None).unwrap();
        assert_eq!(catalog, MessageCatalog::english());
    }

    #[test]
    fn test_missing_catalog_file() {
        let err = load_catalog(Some(Path::new("does-not-exist.toml"))).unwrap_err();
        assert!(err.to_string().contains("does-not-exist.toml"));
    }

    #[test]
    fn test_catalog_override() {
        let path = std::env::temp_dir().join("uniform-cli-catalog-test.toml");
        std::fs::write(&path, "required = \"%s est obligatoire\"\n").unwrap();

        let catalog = load_catalog(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(catalog.template(MessageKey::Required), "%s est obligatoire");
        assert_eq!(
            catalog.template(MessageKey::Email),
            MessageKey::Email.english()
        );
    }
}
