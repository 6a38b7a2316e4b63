//! CLI module for lscode
//!
//! Provides command-line interface using clap derive macros.

pub mod commands;
pub mod output;
pub mod query;
pub mod response;

pub use output::{OutputContext, OutputFormat};
pub use query::SymbolQuery;

use clap::{Parser, Subcommand};

use commands::{find_references::FindReferencesArgs, get_definition::GetDefinitionArgs};

const LONG_ABOUT: &str = r#"
lscode - TypeScript symbol references and definitions for AI coding agents

Symbols are addressed by name inside a file. When a name is declared more than
once in that file, every declaration is listed and -n selects one of them.

EXAMPLES:
  lscode find-references src/math.ts#add          # all references to `add`
  lscode find-references src/math.ts#add -n 1     # the second `add` declared there
  lscode get-definition src/main.ts#multiply      # follows the import to its declaration
  lscode get-definition pkg/a.ts#run --tsconfig pkg/tsconfig.build.json

Without --tsconfig, ./tsconfig.json and the projects it references are searched
for the one that includes the file. With no tsconfig.json at all, the file is
analyzed on its own together with everything it imports.
"#;

/// lscode - TypeScript symbol references and definitions for AI coding agents
#[derive(Parser, Debug)]
#[command(name = "lscode")]
#[command(author, version, about, long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
#[command(after_help = "Use 'lscode <COMMAND> --help' for more information about a command.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text, json); defaults to the configured format
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Verbose output (show debug info)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find all references to a symbol declared in a file
    FindReferences(FindReferencesArgs),

    /// Get the definition of a symbol declared in a file
    GetDefinition(GetDefinitionArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_find_references() {
        let cli = Cli::try_parse_from([
            "lscode",
            "find-references",
            "src/math.ts#add",
            "-n",
            "1",
            "--tsconfig",
            "tsconfig.json",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format.as_deref(), Some("json"));
        let Commands::FindReferences(args) = cli.command else {
            panic!("expected find-references");
        };
        assert_eq!(args.query, "src/math.ts#add");
        assert_eq!(args.n, 1);
        assert_eq!(args.tsconfig.as_deref(), Some(std::path::Path::new("tsconfig.json")));
    }

    #[test]
    fn test_parse_get_definition_defaults() {
        let cli = Cli::try_parse_from(["lscode", "get-definition", "a.ts#PI", "-v"]).unwrap();
        assert!(cli.verbose);
        let Commands::GetDefinition(args) = cli.command else {
            panic!("expected get-definition");
        };
        assert_eq!(args.n, 0);
        assert!(args.tsconfig.is_none());
    }

    #[test]
    fn test_negative_index_is_accepted_by_parser() {
        let cli = Cli::try_parse_from(["lscode", "get-definition", "a.ts#PI", "-n", "-1"]).unwrap();
        let Commands::GetDefinition(args) = cli.command else {
            panic!("expected get-definition");
        };
        assert_eq!(args.n, -1);
    }
}
