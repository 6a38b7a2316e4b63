//! get-definition command

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::App;
use crate::cli::SymbolQuery;
use crate::cli::response::{DefinitionOutput, DefinitionResponse, SymbolOutput};
use crate::error::LscodeError;
use crate::services::navigation::{self, Navigator};

#[derive(Args, Debug)]
pub struct GetDefinitionArgs {
    /// Symbol query (file#symbol)
    pub query: String,

    /// Which declaration to use when the name is declared more than once (0-based)
    #[arg(short = 'n', long = "index", default_value_t = 0, allow_negative_numbers = true)]
    pub n: i64,

    /// TypeScript config to use instead of searching from ./tsconfig.json
    #[arg(long)]
    pub tsconfig: Option<PathBuf>,
}

pub fn execute(args: GetDefinitionArgs, app: &App) -> Result<()> {
    let ctx = &app.output;
    let query = SymbolQuery::parse(&args.query)?;
    let analysis = app.analyze(&query, args.tsconfig.as_deref())?;

    let selected = navigation::select(&analysis.candidates, args.n, &analysis.name, &analysis.file)
        .map_err(LscodeError::from)?;
    let index = usize::try_from(args.n)?;
    let definitions = Navigator::new(&analysis.engine).definitions(selected);

    let response = DefinitionResponse {
        symbols: SymbolOutput::list(&analysis.candidates, ctx),
        selected: index,
        definitions: definitions
            .iter()
            .map(|d| DefinitionOutput::from_definition(d, ctx))
            .collect(),
        resolved_config: super::resolved_config(app, analysis.settings.config_path.as_deref()),
    };

    ctx.print_success(&response, || response.to_text());
    Ok(())
}
