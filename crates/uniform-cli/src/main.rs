mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "uniform")]
#[command(version, about = "Uni-Form CLI - check forms and validation messages", long_about = None)]
struct Cli {
    /// Message catalog (TOML) replacing the English messages
    #[arg(short, long, global = true)]
    messages: Option<PathBuf>,

    /// Log validation steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Blur every field of a form definition and report the outcomes
    Check {
        /// Form definition (TOML)
        form: PathBuf,

        /// JSON object of field values keyed by field id
        #[arg(long)]
        values: Option<PathBuf>,
    },

    /// Format a message from the catalog
    Format {
        /// Message key (e.g. minlength, same_as)
        key: String,

        /// Positional arguments
        args: Vec<String>,
    },

    /// Read validators from a class attribute and print them as JSON rules
    Parse {
        /// Class attribute, e.g. "required validateMinLength val-5"
        class: String,
    },

    /// List the built-in validators in evaluation order
    Validators,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let catalog = commands::load_catalog(cli.messages.as_deref())?;

    match cli.command {
        Commands::Check { form, values } => {
            let passed = commands::check::execute(&form, values.as_deref(), catalog)?;
            if !passed {
                std::process::exit(1);
            }
        }
        Commands::Format { key, args } => {
            commands::format::execute(&key, &args, &catalog)?;
        }
        Commands::Parse { class } => {
            commands::parse::execute(&class)?;
        }
        Commands::Validators => {
            commands::validators::execute();
        }
    }

    Ok(())
}
