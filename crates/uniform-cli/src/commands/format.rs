use anyhow::Result;
use uniform_validation_core::{FormatArg, MessageCatalog, MessageKey};

pub fn execute(key: &str, args: &[String], catalog: &MessageCatalog) -> Result<()> {
    let key: MessageKey = key.parse()?;
    let args: Vec<FormatArg> = args.iter().map(FormatArg::from).collect();

    println!("{}", catalog.format(key, &args));
    Ok(())
}
