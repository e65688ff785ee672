//! Validator kinds and the per-field rule set
//!
//! Rules are normally given as a structured [`RuleConfig`] (TOML or JSON,
//! camelCase keys). Markup that still carries validators as class names is
//! read with [`FieldRules::from_class_attr`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UniformError};
use crate::message::MessageKey;
use crate::numeric::parse_leading_int;

/// Prefix of the class token carrying a numeric parameter
pub const PARAM_PREFIX: &str = "val-";

/// The built-in validators, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValidatorKind {
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
}

impl ValidatorKind {
    pub const ALL: [ValidatorKind; 16] = [
        ValidatorKind::Required,
        ValidatorKind::MinLength,
        ValidatorKind::Min,
        ValidatorKind::MaxLength,
        ValidatorKind::Max,
        ValidatorKind::SameAs,
        ValidatorKind::Email,
        ValidatorKind::Url,
        ValidatorKind::Number,
        ValidatorKind::Integer,
        ValidatorKind::Alpha,
        ValidatorKind::AlphaNum,
        ValidatorKind::Phrase,
        ValidatorKind::Phone,
        ValidatorKind::Date,
        ValidatorKind::Callback,
    ];

    /// Class name that activates the validator in markup
    pub fn name(self) -> &'static str {
        match self {
            ValidatorKind::Required => "required",
            ValidatorKind::MinLength => "validateMinLength",
            ValidatorKind::Min => "validateMin",
            ValidatorKind::MaxLength => "validateMaxLength",
            ValidatorKind::Max => "validateMax",
            ValidatorKind::SameAs => "validateSameAs",
            ValidatorKind::Email => "validateEmail",
            ValidatorKind::Url => "validateUrl",
            ValidatorKind::Number => "validateNumber",
            ValidatorKind::Integer => "validateInteger",
            ValidatorKind::Alpha => "validateAlpha",
            ValidatorKind::AlphaNum => "validateAlphaNum",
            ValidatorKind::Phrase => "validatePhrase",
            ValidatorKind::Phone => "validatePhone",
            ValidatorKind::Date => "validateDate",
            ValidatorKind::Callback => "validateCallback",
        }
    }

    /// Short name, as used in rule configs
    pub fn short_name(self) -> &'static str {
        match self {
            ValidatorKind::Required => "required",
            ValidatorKind::MinLength => "minLength",
            ValidatorKind::Min => "min",
            ValidatorKind::MaxLength => "maxLength",
            ValidatorKind::Max => "max",
            ValidatorKind::SameAs => "sameAs",
            ValidatorKind::Email => "email",
            ValidatorKind::Url => "url",
            ValidatorKind::Number => "number",
            ValidatorKind::Integer => "integer",
            ValidatorKind::Alpha => "alpha",
            ValidatorKind::AlphaNum => "alphaNumeric",
            ValidatorKind::Phrase => "phrase",
            ValidatorKind::Phone => "phone",
            ValidatorKind::Date => "date",
            ValidatorKind::Callback => "callback",
        }
    }

    pub fn message_key(self) -> MessageKey {
        match self {
            ValidatorKind::Required => MessageKey::Required,
            ValidatorKind::MinLength => MessageKey::MinLength,
            ValidatorKind::Min => MessageKey::Min,
            ValidatorKind::MaxLength => MessageKey::MaxLength,
            ValidatorKind::Max => MessageKey::Max,
            ValidatorKind::SameAs => MessageKey::SameAs,
            ValidatorKind::Email => MessageKey::Email,
            ValidatorKind::Url => MessageKey::Url,
            ValidatorKind::Number => MessageKey::Number,
            ValidatorKind::Integer => MessageKey::Integer,
            ValidatorKind::Alpha => MessageKey::Alpha,
            ValidatorKind::AlphaNum => MessageKey::AlphaNum,
            ValidatorKind::Phrase => MessageKey::Phrase,
            ValidatorKind::Phone => MessageKey::Phone,
            ValidatorKind::Date => MessageKey::Date,
            ValidatorKind::Callback => MessageKey::Callback,
        }
    }

    fn takes_numeric_param(self) -> bool {
        matches!(
            self,
            ValidatorKind::MinLength | ValidatorKind::Min | ValidatorKind::MaxLength | ValidatorKind::Max
        )
    }

    /// Looks up a validator by class name only
    pub fn from_class(token: &str) -> Option<Self> {
        ValidatorKind::ALL.into_iter().find(|kind| kind.name() == token)
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValidatorKind {
    type Err = UniformError;

    /// Accepts both the class name and the short name
    fn from_str(s: &str) -> Result<Self> {
        ValidatorKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s || kind.short_name() == s)
            .ok_or_else(|| UniformError::UnknownValidator(s.to_string()))
    }
}

/// A validator together with its parameter.
///
/// A zero length bound disables the length check. `Min`/`Max` without a
/// bound always pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    Min(Option<i64>),
    MaxLength(usize),
    Max(Option<i64>),
    /// Id of the field whose value must match
    SameAs(String),
    Email,
    Url,
    Number,
    Integer,
    Alpha,
    AlphaNum,
    Phrase,
    Phone,
    Date,
    /// Name of a registered callback
    Callback(String),
}

impl Rule {
    pub fn kind(&self) -> ValidatorKind {
        match self {
            Rule::Required => ValidatorKind::Required,
            Rule::MinLength(_) => ValidatorKind::MinLength,
            Rule::Min(_) => ValidatorKind::Min,
            Rule::MaxLength(_) => ValidatorKind::MaxLength,
            Rule::Max(_) => ValidatorKind::Max,
            Rule::SameAs(_) => ValidatorKind::SameAs,
            Rule::Email => ValidatorKind::Email,
            Rule::Url => ValidatorKind::Url,
            Rule::Number => ValidatorKind::Number,
            Rule::Integer => ValidatorKind::Integer,
            Rule::Alpha => ValidatorKind::Alpha,
            Rule::AlphaNum => ValidatorKind::AlphaNum,
            Rule::Phrase => ValidatorKind::Phrase,
            Rule::Phone => ValidatorKind::Phone,
            Rule::Date => ValidatorKind::Date,
            Rule::Callback(_) => ValidatorKind::Callback,
        }
    }

    /// Builds the rule for `kind` from the class token that follows it
    fn from_class_param(kind: ValidatorKind, next: Option<&str>) -> Self {
        let numeric = || {
            next.and_then(|token| token.strip_prefix(PARAM_PREFIX))
                .and_then(parse_leading_int)
        };
        let length = || {
            numeric()
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(0)
        };
        let target = || next.unwrap_or_default().to_string();

        match kind {
            ValidatorKind::Required => Rule::Required,
            ValidatorKind::MinLength => Rule::MinLength(length()),
            ValidatorKind::Min => Rule::Min(numeric()),
            ValidatorKind::MaxLength => Rule::MaxLength(length()),
            ValidatorKind::Max => Rule::Max(numeric()),
            ValidatorKind::SameAs => Rule::SameAs(target()),
            ValidatorKind::Email => Rule::Email,
            ValidatorKind::Url => Rule::Url,
            ValidatorKind::Number => Rule::Number,
            ValidatorKind::Integer => Rule::Integer,
            ValidatorKind::Alpha => Rule::Alpha,
            ValidatorKind::AlphaNum => Rule::AlphaNum,
            ValidatorKind::Phrase => Rule::Phrase,
            ValidatorKind::Phone => Rule::Phone,
            ValidatorKind::Date => Rule::Date,
            ValidatorKind::Callback => Rule::Callback(target()),
        }
    }
}

/// The rules active on one field, at most one per validator, kept in
/// evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RuleConfig", into = "RuleConfig")]
pub struct FieldRules {
    rules: Vec<Rule>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `rule`, replacing any rule of the same kind
    #[must_use]
    pub fn with(mut self, rule: Rule) -> Self {
        self.insert(rule);
        self
    }

    pub fn insert(&mut self, rule: Rule) {
        let kind = rule.kind();
        match self.rules.binary_search_by_key(&kind, Rule::kind) {
            Ok(pos) => self.rules[pos] = rule,
            Err(pos) => self.rules.insert(pos, rule),
        }
    }

    pub fn get(&self, kind: ValidatorKind) -> Option<&Rule> {
        self.rules
            .binary_search_by_key(&kind, Rule::kind)
            .ok()
            .map(|pos| &self.rules[pos])
    }

    pub fn contains(&self, kind: ValidatorKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn is_required(&self) -> bool {
        self.contains(ValidatorKind::Required)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Reads validators from a whitespace separated class attribute.
    ///
    /// A token equal to a validator's class name activates it. Numeric
    /// parameters come from the next token with the `val-` prefix
    /// (`validateMinLength val-5`); `validateSameAs` and `validateCallback`
    /// take the next token verbatim as the target id or callback name.
    /// Tokens that are not validator names are ignored.
    pub fn from_class_attr(class_attr: &str) -> Self {
        let tokens: Vec<&str> = class_attr.split_whitespace().collect();
        Self::from_tokens(&tokens)
    }

    /// A numeric validator takes its parameter from the first occurrence
    /// followed by a `val-` token; other validators from their first
    /// occurrence.
    pub fn from_tokens(tokens: &[&str]) -> Self {
        let mut rules = Self::new();
        let mut settled = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(kind) = ValidatorKind::from_class(token) else {
                continue;
            };
            if settled.contains(&kind) {
                continue;
            }

            let next = tokens.get(i + 1).copied();
            let has_param = next.is_some_and(|t| t.starts_with(PARAM_PREFIX));
            if has_param || !kind.takes_numeric_param() {
                settled.push(kind);
            }
            if has_param || !rules.contains(kind) {
                rules.insert(Rule::from_class_param(kind, next));
            }
        }
        rules
    }

    /// Parses a JSON rule object such as `{"required": true, "minLength": 5}`
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RuleConfig = serde_json::from_str(json)?;
        Ok(config.into())
    }
}

impl FromIterator<Rule> for FieldRules {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut rules = Self::new();
        for rule in iter {
            rules.insert(rule);
        }
        rules
    }
}

impl<'a> IntoIterator for &'a FieldRules {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Serialized form of [`FieldRules`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_as: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub email: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub url: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub number: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub integer: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub alpha: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub alpha_numeric: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub phrase: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub phone: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub date: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
}

/// `min`/`max` of a [`RuleConfig`]: a bound, or `true` for a validator
/// that is active without one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Value(i64),
    Active(bool),
}

impl Bound {
    /// `None` when the validator is switched off
    fn into_rule_param(self) -> Option<Option<i64>> {
        match self {
            Bound::Value(n) => Some(Some(n)),
            Bound::Active(true) => Some(None),
            Bound::Active(false) => None,
        }
    }
}

impl From<Option<i64>> for Bound {
    fn from(bound: Option<i64>) -> Self {
        bound.map_or(Bound::Active(true), Bound::Value)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl From<RuleConfig> for FieldRules {
    fn from(config: RuleConfig) -> Self {
        let flags = [
            (config.required, Rule::Required),
            (config.email, Rule::Email),
            (config.url, Rule::Url),
            (config.number, Rule::Number),
            (config.integer, Rule::Integer),
            (config.alpha, Rule::Alpha),
            (config.alpha_numeric, Rule::AlphaNum),
            (config.phrase, Rule::Phrase),
            (config.phone, Rule::Phone),
            (config.date, Rule::Date),
        ];

        let mut rules: FieldRules = flags
            .into_iter()
            .filter_map(|(on, rule)| on.then_some(rule))
            .collect();

        if let Some(n) = config.min_length {
            rules.insert(Rule::MinLength(n));
        }
        if let Some(bound) = config.min.and_then(Bound::into_rule_param) {
            rules.insert(Rule::Min(bound));
        }
        if let Some(n) = config.max_length {
            rules.insert(Rule::MaxLength(n));
        }
        if let Some(bound) = config.max.and_then(Bound::into_rule_param) {
            rules.insert(Rule::Max(bound));
        }
        if let Some(target) = config.same_as {
            rules.insert(Rule::SameAs(target));
        }
        if let Some(name) = config.callback {
            rules.insert(Rule::Callback(name));
        }

        rules
    }
}

impl From<FieldRules> for RuleConfig {
    fn from(rules: FieldRules) -> Self {
        let mut config = RuleConfig::default();
        for rule in rules.rules {
            match rule {
                Rule::Required => config.required = true,
                Rule::MinLength(n) => config.min_length = Some(n),
                Rule::Min(n) => config.min = Some(n.into()),
                Rule::MaxLength(n) => config.max_length = Some(n),
                Rule::Max(n) => config.max = Some(n.into()),
                Rule::SameAs(target) => config.same_as = Some(target),
                Rule::Email => config.email = true,
                Rule::Url => config.url = true,
                Rule::Number => config.number = true,
                Rule::Integer => config.integer = true,
                Rule::Alpha => config.alpha = true,
                Rule::AlphaNum => config.alpha_numeric = true,
                Rule::Phrase => config.phrase = true,
                Rule::Phone => config.phone = true,
                Rule::Date => config.date = true,
                Rule::Callback(name) => config.callback = Some(name),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_names_are_unique() {
        for (i, a) in ValidatorKind::ALL.iter().enumerate() {
            for b in &ValidatorKind::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
                assert_ne!(a.short_name(), b.short_name());
            }
        }
    }

    #[test]
    fn test_kind_from_str_accepts_both_names() {
        assert_eq!("validateMinLength".parse::<ValidatorKind>().unwrap(), ValidatorKind::MinLength);
        assert_eq!("minLength".parse::<ValidatorKind>().unwrap(), ValidatorKind::MinLength);
        assert_eq!("alphaNumeric".parse::<ValidatorKind>().unwrap(), ValidatorKind::AlphaNum);
        assert!("validateZip".parse::<ValidatorKind>().is_err());
    }

    #[test]
    fn test_rules_stay_in_evaluation_order() {
        let rules = FieldRules::new()
            .with(Rule::Email)
            .with(Rule::Required)
            .with(Rule::MaxLength(40));
        let kinds: Vec<_> = rules.iter().map(Rule::kind).collect();
        assert_eq!(
            kinds,
            vec![ValidatorKind::Required, ValidatorKind::MaxLength, ValidatorKind::Email]
        );
    }

    #[test]
    fn test_insert_replaces_same_kind() {
        let rules = FieldRules::new().with(Rule::MinLength(3)).with(Rule::MinLength(8));
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.get(ValidatorKind::MinLength), Some(&Rule::MinLength(8)));
    }

    #[test]
    fn test_class_attr_parsing() {
        let rules = FieldRules::from_class_attr(
            "textInput required validateMinLength val-5 validateMax val-99 validateSameAs password",
        );
        assert_eq!(
            rules,
            FieldRules::new()
                .with(Rule::Required)
                .with(Rule::MinLength(5))
                .with(Rule::Max(Some(99)))
                .with(Rule::SameAs("password".to_string()))
        );
    }

    #[test]
    fn test_class_attr_missing_parameters() {
        let rules = FieldRules::from_class_attr("validateMinLength validateMin val-abc validateCallback");
        assert_eq!(rules.get(ValidatorKind::MinLength), Some(&Rule::MinLength(0)));
        assert_eq!(rules.get(ValidatorKind::Min), Some(&Rule::Min(None)));
        assert_eq!(
            rules.get(ValidatorKind::Callback),
            Some(&Rule::Callback(String::new()))
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let rules = FieldRules::from_class_attr("validateMaxLength val-10 validateMaxLength val-2");
        assert_eq!(rules.get(ValidatorKind::MaxLength), Some(&Rule::MaxLength(10)));
    }

    #[test]
    fn test_numeric_parameter_from_later_occurrence() {
        let rules = FieldRules::from_class_attr("validateMinLength foo validateMinLength val-5");
        assert_eq!(rules.get(ValidatorKind::MinLength), Some(&Rule::MinLength(5)));

        let rules = FieldRules::from_class_attr("validateSameAs password validateSameAs email");
        assert_eq!(
            rules.get(ValidatorKind::SameAs),
            Some(&Rule::SameAs("password".to_string()))
        );
    }

    #[test]
    fn test_json_rules() {
        let rules =
            FieldRules::from_json(r#"{"required": true, "minLength": 5, "sameAs": "email"}"#).unwrap();
        assert!(rules.is_required());
        assert_eq!(rules.get(ValidatorKind::MinLength), Some(&Rule::MinLength(5)));
        assert_eq!(
            rules.get(ValidatorKind::SameAs),
            Some(&Rule::SameAs("email".to_string()))
        );
    }

    #[test]
    fn test_json_rejects_unknown_rule() {
        assert!(FieldRules::from_json(r#"{"zip": true}"#).is_err());
    }

    #[test]
    fn test_unbounded_min_max_survive_serialization() {
        let rules = FieldRules::from_class_attr("validateMin validateMax val-10");
        let json = serde_json::to_string(&rules).unwrap();
        assert_eq!(json, r#"{"min":true,"max":10}"#);
        assert_eq!(FieldRules::from_json(&json).unwrap(), rules);

        let off = FieldRules::from_json(r#"{"min": false}"#).unwrap();
        assert!(off.is_empty());
    }

    #[test]
    fn test_serialize_skips_inactive_rules() {
        let rules = FieldRules::new().with(Rule::Required).with(Rule::MaxLength(3));
        let json = serde_json::to_string(&rules).unwrap();
        assert_eq!(json, r#"{"required":true,"maxLength":3}"#);
    }
}
