use clap::Parser;
use schema_form::cli::Cli;
use schema_form::commands;
use schema_form::config::Settings;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new_with_cli(&cli)?;

    // Initialize tracing (RUST_LOG wins over the configured level)
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&settings.log.level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let output = commands::run(&cli.command, &settings)?;
    let text = if settings.output.pretty {
        serde_json::to_string_pretty(&output.json)?
    } else {
        serde_json::to_string(&output.json)?
    };
    println!("{}", text);

    if !output.success {
        std::process::exit(1);
    }
    Ok(())
}
