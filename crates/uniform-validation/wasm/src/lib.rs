//! Uni-Form Validation WASM
//!
//! WebAssembly bindings for the Uni-Form validator registry.
//! The page binder calls these from its focus/blur/submit handlers so the
//! browser produces the same outcomes and messages as the server and CLI.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uniform_validation_core::{
    FieldDescriptor, FieldRules, FormatArg, MessageCatalog, MessageKey, RuleConfig,
    ValidationOutcome, ValidatorKind, ValidatorRegistry,
};
use wasm_bindgen::prelude::*;

thread_local! {
    static REGISTRY: RefCell<ValidatorRegistry> = RefCell::new(ValidatorRegistry::new());
}

/// Snapshot of the registry, so callbacks may re-enter the bindings
fn registry() -> ValidatorRegistry {
    REGISTRY.with(|registry| registry.borrow().clone())
}

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Another field of the form, for `sameAs`
#[derive(Deserialize, Debug)]
pub struct FieldInput {
    pub value: String,
    #[serde(default)]
    pub caption: String,
}

/// Result of a validation returned to JavaScript
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<ValidationOutcome> for ValidationResult {
    fn from(outcome: ValidationOutcome) -> Self {
        match outcome {
            ValidationOutcome::Valid => Self {
                valid: true,
                message: None,
            },
            ValidationOutcome::Invalid(msg) => Self {
                valid: false,
                message: Some(msg),
            },
        }
    }
}

/// A JavaScript function registered as a validator.
///
/// Called as `fn(value, caption)`. A returned string is the failure
/// message; any other return value passes.
struct JsCallback(js_sys::Function);

impl uniform_validation_core::FieldCallback for JsCallback {
    fn check(&self, value: &str, caption: &str) -> ValidationOutcome {
        match self
            .0
            .call2(&JsValue::NULL, &JsValue::from_str(value), &JsValue::from_str(caption))
        {
            Ok(result) => match result.as_string() {
                Some(msg) => ValidationOutcome::Invalid(msg),
                None => ValidationOutcome::Valid,
            },
            Err(err) => {
                web_sys::console::error_2(&JsValue::from_str("Validator function threw"), &err);
                let msg = err
                    .as_string()
                    .unwrap_or_else(|| format!("Failed to validate {caption} field"));
                ValidationOutcome::Invalid(msg)
            }
        }
    }
}

fn parse_rules(rules: JsValue) -> Result<FieldRules, JsValue> {
    if rules.is_undefined() || rules.is_null() {
        return Ok(FieldRules::new());
    }
    serde_wasm_bindgen::from_value(rules)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse rules: {}", e)))
}

fn parse_fields(fields: JsValue) -> Result<HashMap<String, FieldDescriptor>, JsValue> {
    if fields.is_undefined() || fields.is_null() {
        return Ok(HashMap::new());
    }
    let fields: HashMap<String, FieldInput> = serde_wasm_bindgen::from_value(fields)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse fields: {}", e)))?;

    Ok(fields
        .into_iter()
        .map(|(id, field)| (id, FieldDescriptor::new(field.value, field.caption)))
        .collect())
}

/// Register a JavaScript validator referenced by `validateCallback <name>`
///
/// # Example (JavaScript)
/// ```javascript
/// registerCallback('is_34', (value, caption) =>
///     value === '34' ? true : `${caption} value should be "34"`);
/// ```
#[wasm_bindgen(js_name = registerCallback)]
pub fn register_callback(name: &str, callback: js_sys::Function) {
    REGISTRY.with(|registry| {
        registry
            .borrow_mut()
            .register_callback(name, JsCallback(callback));
    });
}

#[wasm_bindgen(js_name = unregisterCallback)]
pub fn unregister_callback(name: &str) -> bool {
    REGISTRY.with(|registry| registry.borrow_mut().unregister_callback(name))
}

/// Replace the message catalog with a TOML table of templates
#[wasm_bindgen(js_name = setMessages)]
pub fn set_messages(catalog_toml: &str) -> Result<(), JsValue> {
    let catalog = MessageCatalog::from_toml_str(catalog_toml)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    REGISTRY.with(|registry| registry.borrow_mut().set_catalog(catalog));
    Ok(())
}

/// Run one validator by name
///
/// # Arguments
/// * `name` - Validator name (`validateEmail`, `email`, ...) or callback name
/// * `value` - The field value
/// * `caption` - Field label used in messages
/// * `rules` - Optional rule object supplying parameters, e.g. `{minLength: 5}`
#[wasm_bindgen]
pub fn evaluate(name: &str, value: &str, caption: &str, rules: JsValue) -> Result<JsValue, JsValue> {
    let field = FieldDescriptor::new(value, caption).with_rules(parse_rules(rules)?);
    let result = ValidationResult::from(registry().evaluate(name, &field));
    Ok(serde_wasm_bindgen::to_value(&result)?)
}

/// Validate a single field value against all of its rules
///
/// # Arguments
/// * `value` - The value to validate
/// * `caption` - Field label used in messages
/// * `rules` - JavaScript object with validation rules
/// * `fields` - Optional map of other fields by id, for `sameAs`
///
/// # Returns
/// `{valid: true}` or `{valid: false, message}`
///
/// # Example (JavaScript)
/// ```javascript
/// const result = validateField('jd', 'Username', {
///     required: true,
///     minLength: 3
/// });
/// ```
#[wasm_bindgen(js_name = validateField)]
pub fn validate_field(
    value: &str,
    caption: &str,
    rules: JsValue,
    fields: JsValue,
) -> Result<JsValue, JsValue> {
    let field = FieldDescriptor::new(value, caption).with_rules(parse_rules(rules)?);
    let fields = parse_fields(fields)?;
    let result = ValidationResult::from(registry().validate_in(&field, &fields));
    Ok(serde_wasm_bindgen::to_value(&result)?)
}

/// Read validators from a class attribute into a rule object
#[wasm_bindgen(js_name = parseClasses)]
pub fn parse_classes(class_attr: &str) -> Result<JsValue, JsValue> {
    let config = RuleConfig::from(FieldRules::from_class_attr(class_attr));
    Ok(serde_wasm_bindgen::to_value(&config)?)
}

/// Format a catalog message; `null`/`undefined` arguments drop their piece
#[wasm_bindgen]
pub fn format(key: &str, args: Vec<JsValue>) -> Result<String, JsValue> {
    let key: MessageKey = key.parse().map_err(|e: uniform_validation_core::UniformError| {
        JsValue::from_str(&e.to_string())
    })?;

    let args: Vec<FormatArg> = args.iter().map(format_arg).collect();

    Ok(registry().format(key, &args))
}

/// `NaN` and the infinities have no integer part and render as `NaN`
fn number_arg(n: f64) -> FormatArg {
    if n.is_finite() {
        FormatArg::Int(n.trunc() as i64)
    } else {
        FormatArg::Str("NaN".to_string())
    }
}

fn format_arg(arg: &JsValue) -> FormatArg {
    if let Some(s) = arg.as_string() {
        FormatArg::Str(s)
    } else if let Some(n) = arg.as_f64() {
        number_arg(n)
    } else {
        FormatArg::Absent
    }
}

/// Names of the built-in validators, in evaluation order
#[wasm_bindgen]
pub fn validators() -> Vec<String> {
    ValidatorKind::ALL
        .iter()
        .map(|kind| kind.name().to_string())
        .collect()
}
