use anyhow::Result;
use uniform_validation_core::FieldRules;

pub fn execute(class_attr: &str) -> Result<()> {
    let rules = FieldRules::from_class_attr(class_attr);
    if rules.is_empty() {
        tracing::warn!("No validators in class attribute: {:?}", class_attr);
    }

    println!("{}", serde_json::to_string_pretty(&rules)?);
    Ok(())
}
