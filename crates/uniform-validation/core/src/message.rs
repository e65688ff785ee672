//! Message catalogs and the `%s`/`%d` template formatter

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, UniformError};
use crate::numeric::parse_leading_int;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([ds])(.*)$").unwrap());

/// Keys of the message catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKey {
    Required,
    MinLength,
    Min,
    MaxLength,
    Max,
    SameAs,
    Email,
    Url,
    Number,
    Integer,
    Alpha,
    AlphaNum,
    Phrase,
    Phone,
    Date,
    Callback,
    OnLeave,
}

impl MessageKey {
    pub const ALL: [MessageKey; 17] = [
        MessageKey::Required,
        MessageKey::MinLength,
        MessageKey::Min,
        MessageKey::MaxLength,
        MessageKey::Max,
        MessageKey::SameAs,
        MessageKey::Email,
        MessageKey::Url,
        MessageKey::Number,
        MessageKey::Integer,
        MessageKey::Alpha,
        MessageKey::AlphaNum,
        MessageKey::Phrase,
        MessageKey::Phone,
        MessageKey::Date,
        MessageKey::Callback,
        MessageKey::OnLeave,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::Required => "required",
            MessageKey::MinLength => "minlength",
            MessageKey::Min => "min",
            MessageKey::MaxLength => "maxlength",
            MessageKey::Max => "max",
            MessageKey::SameAs => "same_as",
            MessageKey::Email => "email",
            MessageKey::Url => "url",
            MessageKey::Number => "number",
            MessageKey::Integer => "integer",
            MessageKey::Alpha => "alpha",
            MessageKey::AlphaNum => "alphanum",
            MessageKey::Phrase => "phrase",
            MessageKey::Phone => "phone",
            MessageKey::Date => "date",
            MessageKey::Callback => "callback",
            MessageKey::OnLeave => "on_leave",
        }
    }

    /// English template for this key
    pub fn english(self) -> &'static str {
        match self {
            MessageKey::Required => "%s is required",
            MessageKey::MinLength => "%s should be at least %d characters long",
            MessageKey::Min => "%s should be greater than or equal to %d",
            MessageKey::MaxLength => "%s should not be longer than %d characters",
            MessageKey::Max => "%s should be less than or equal to %d",
            MessageKey::SameAs => "%s is expected to be same as %s",
            MessageKey::Email => "%s is not a valid email address",
            MessageKey::Url => "%s is not a valid URL",
            MessageKey::Number => "%s needs to be a number",
            MessageKey::Integer => "%s needs to be a whole number",
            MessageKey::Alpha => {
                "%s should contain only letters (without special characters or numbers)"
            }
            MessageKey::AlphaNum => {
                "%s should contain only numbers and letters (without special characters)"
            }
            MessageKey::Phrase => {
                "%s should contain only alphabetic characters, numbers, spaces, and the following: . , - _ () * # :"
            }
            MessageKey::Phone => "%s should be a phone number",
            MessageKey::Date => "%s should be a date (mm/dd/yyyy)",
            MessageKey::Callback => {
                "Failed to validate %s field. Validator function (%s) is not defined!"
            }
            MessageKey::OnLeave => {
                "Are you sure you want to leave this page without saving this form?"
            }
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKey {
    type Err = UniformError;

    fn from_str(s: &str) -> Result<Self> {
        MessageKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UniformError::UnknownMessageKey(s.to_string()))
    }
}

/// A positional argument for [`format_template`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatArg {
    Str(String),
    Int(i64),
    /// Holds a position without a value; its piece is dropped
    Absent,
}

impl FormatArg {
    fn as_text(&self) -> String {
        match self {
            FormatArg::Str(s) => s.clone(),
            FormatArg::Int(i) => i.to_string(),
            FormatArg::Absent => String::new(),
        }
    }

    fn as_int(&self) -> String {
        match self {
            FormatArg::Str(s) => parse_leading_int(s)
                .map(|i| i.to_string())
                .unwrap_or_else(|| "NaN".to_string()),
            FormatArg::Int(i) => i.to_string(),
            FormatArg::Absent => String::new(),
        }
    }
}

impl<T: Into<FormatArg>> From<Option<T>> for FormatArg {
    fn from(arg: Option<T>) -> Self {
        arg.map_or(FormatArg::Absent, Into::into)
    }
}

impl From<&str> for FormatArg {
    fn from(s: &str) -> Self {
        FormatArg::Str(s.to_string())
    }
}

impl From<String> for FormatArg {
    fn from(s: String) -> Self {
        FormatArg::Str(s)
    }
}

impl From<&String> for FormatArg {
    fn from(s: &String) -> Self {
        FormatArg::Str(s.clone())
    }
}

impl From<i64> for FormatArg {
    fn from(i: i64) -> Self {
        FormatArg::Int(i)
    }
}

impl From<i32> for FormatArg {
    fn from(i: i32) -> Self {
        FormatArg::Int(i64::from(i))
    }
}

impl From<usize> for FormatArg {
    fn from(i: usize) -> Self {
        FormatArg::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

/// Substitutes positional arguments into a `%s`/`%d` template.
///
/// The template is split on `%`. The first piece is copied verbatim; piece
/// `i` that starts with `d` or `s` is replaced by argument `i` (1-based)
/// followed by the rest of the piece. A piece whose argument is missing,
/// or which does not start with a placeholder letter, is dropped.
///
/// `%d` renders the leading integer of the argument, or `NaN` when it has
/// none.
pub fn format_template(template: &str, args: &[FormatArg]) -> String {
    let mut pieces = template.split('%');
    let mut out = pieces.next().unwrap_or_default().to_string();

    for (i, piece) in pieces.enumerate() {
        let Some(caps) = PLACEHOLDER.captures(piece) else {
            continue;
        };
        let Some(arg) = args.get(i).filter(|arg| **arg != FormatArg::Absent) else {
            continue;
        };

        match &caps[1] {
            "d" => out.push_str(&arg.as_int()),
            _ => out.push_str(&arg.as_text()),
        }
        out.push_str(&caps[2]);
    }

    out
}

/// Key to template mapping, fixed after construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    templates: HashMap<MessageKey, String>,
}

impl MessageCatalog {
    /// The built-in English catalog
    pub fn english() -> Self {
        let templates = MessageKey::ALL
            .into_iter()
            .map(|key| (key, key.english().to_string()))
            .collect();
        Self { templates }
    }

    /// Builds a catalog from a TOML table of `key = "template"` pairs.
    ///
    /// Keys missing from the table keep their English template.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let overrides: HashMap<String, String> = toml::from_str(content)?;
        let mut catalog = Self::english();

        for (key, template) in overrides {
            let key: MessageKey = key.parse()?;
            catalog.templates.insert(key, template);
        }

        Ok(catalog)
    }

    pub fn template(&self, key: MessageKey) -> &str {
        self.templates
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.english())
    }

    /// Formats the template stored under `key`
    pub fn format(&self, key: MessageKey, args: &[FormatArg]) -> String {
        format_template(self.template(key), args)
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::english()
    }
}

/// Formats `key` from the English catalog
pub fn format(key: MessageKey, args: &[FormatArg]) -> String {
    format_template(key.english(), args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minlength_message() {
        let msg = format(MessageKey::MinLength, &["Name".into(), 5.into()]);
        assert_eq!(msg, "Name should be at least 5 characters long");
    }

    #[test]
    fn test_same_as_message() {
        let msg = format(MessageKey::SameAs, &["Confirm".into(), "Password".into()]);
        assert_eq!(msg, "Confirm is expected to be same as Password");
    }

    #[test]
    fn test_missing_argument_drops_piece() {
        let msg = format(MessageKey::MinLength, &["Name".into()]);
        assert_eq!(msg, "Name should be at least ");
    }

    #[test]
    fn test_absent_argument_keeps_later_positions() {
        let msg = format(MessageKey::SameAs, &[FormatArg::Absent, "Password".into()]);
        assert_eq!(msg, "Password");

        let none: Option<&str> = None;
        let msg = format(MessageKey::MinLength, &["Name".into(), none.into()]);
        assert_eq!(msg, "Name should be at least ");
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(format_template("%s is required", &[]), "");
        assert_eq!(format_template("plain text", &[]), "plain text");
    }

    #[test]
    fn test_int_placeholder_parses_strings() {
        assert_eq!(format_template("max %d", &["12px".into()]), "max 12");
        assert_eq!(format_template("max %d", &["many".into()]), "max NaN");
    }

    #[test]
    fn test_unknown_placeholder_is_dropped() {
        // The argument slot is still consumed by the dropped piece.
        let msg = format_template("a %x b %s c", &["one".into(), "two".into()]);
        assert_eq!(msg, "a two c");
    }

    #[test]
    fn test_piece_spanning_lines_is_dropped() {
        assert_eq!(format_template("%s is\nrequired", &["Name".into()]), "");
        assert_eq!(
            format_template("%s is required\n%s", &["Name".into(), "x".into()]),
            "x"
        );
    }

    #[test]
    fn test_catalog_override_and_fallback() {
        let catalog = MessageCatalog::from_toml_str(r#"required = "%s ist erforderlich""#).unwrap();
        assert_eq!(
            catalog.format(MessageKey::Required, &["Name".into()]),
            "Name ist erforderlich"
        );
        assert_eq!(catalog.template(MessageKey::Email), MessageKey::Email.english());
    }

    #[test]
    fn test_catalog_rejects_unknown_key() {
        let err = MessageCatalog::from_toml_str(r#"nope = "x""#).unwrap_err();
        assert!(matches!(err, UniformError::UnknownMessageKey(k) if k == "nope"));
    }

    #[test]
    fn test_key_round_trip() {
        assert_eq!("same_as".parse::<MessageKey>().unwrap(), MessageKey::SameAs);
        assert_eq!(MessageKey::OnLeave.to_string(), "on_leave");
    }
}
