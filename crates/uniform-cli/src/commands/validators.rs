use colored::Colorize;
use uniform_validation_core::ValidatorKind;

pub fn execute() {
    println!("{}", "Validators (evaluation order)".green().bold());
    println!();

    for kind in ValidatorKind::ALL {
        println!(
            "  {:<20} {:<14} {}",
            kind.name().cyan(),
            kind.short_name(),
            kind.message_key().as_str().dimmed()
        );
    }
}
