//! lscode - TypeScript symbol references and definitions for AI coding agents

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lscode::LscodeError;
use lscode::app::App;
use lscode::cli::output::error_json;
use lscode::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Quiet defaults so stdout stays machine-readable; RUST_LOG overrides
    let default_filter = if cli.verbose { "lscode=debug" } else { "lscode=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let app = match App::new(cli.format.as_deref()) {
        Ok(app) => app,
        Err(e) => {
            let response = error_json(&format!("Failed to initialize: {}", e), None);
            println!(
                "{}",
                serde_json::to_string_pretty(&response)
                    .unwrap_or_else(|_| format!(r#"{{"success":false,"error":"{}"}}"#, e))
            );
            std::process::exit(2);
        }
    };

    if let Err(e) = execute_command(cli.command, &app) {
        let typed = e.downcast_ref::<LscodeError>();
        app.output()
            .print_error(&e.to_string(), typed.and_then(LscodeError::code));
        let status = if typed.is_some_and(LscodeError::is_typed) { 1 } else { 2 };
        std::process::exit(status);
    }
}

fn execute_command(command: Commands, app: &App) -> anyhow::Result<()> {
    use lscode::cli::commands;

    match command {
        Commands::FindReferences(args) => commands::find_references::execute(args, app),
        Commands::GetDefinition(args) => commands::get_definition::execute(args, app),
    }
}
