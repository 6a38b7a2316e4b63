//! find-references command
//!
//! Lists the declarations matching `file#name`, then every reference to the
//! selected one across the loaded program.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::App;
use crate::cli::SymbolQuery;
use crate::cli::response::{LocationOutput, ReferencesResponse, SymbolOutput};
use crate::error::LscodeError;
use crate::services::navigation::{self, Navigator};

#[derive(Args, Debug)]
pub struct FindReferencesArgs {
    /// Symbol query (file#symbol)
    pub query: String,

    /// Which declaration to use when the name is declared more than once (0-based)
    #[arg(short = 'n', long = "index", default_value_t = 0, allow_negative_numbers = true)]
    pub n: i64,

    /// TypeScript config to use instead of searching from ./tsconfig.json
    #[arg(long)]
    pub tsconfig: Option<PathBuf>,

    /// Maximum references to print (default from config: references.limit, 0 = all)
    #[arg(long)]
    pub limit: Option<usize>,
}

pub fn execute(args: FindReferencesArgs, app: &App) -> Result<()> {
    let ctx = &app.output;
    let query = SymbolQuery::parse(&args.query)?;
    let analysis = app.analyze(&query, args.tsconfig.as_deref())?;

    let selected = navigation::select(&analysis.candidates, args.n, &analysis.name, &analysis.file)
        .map_err(LscodeError::from)?;
    let index = usize::try_from(args.n)?;
    let references = Navigator::new(&analysis.engine).references(selected);

    let limit = match args.limit.unwrap_or(app.config().references.limit) {
        0 => usize::MAX,
        n => n,
    };

    let response = ReferencesResponse {
        symbols: SymbolOutput::list(&analysis.candidates, ctx),
        selected: index,
        count: references.len(),
        references: references
            .iter()
            .take(limit)
            .map(|l| LocationOutput::from_location(l, ctx))
            .collect(),
        resolved_config: super::resolved_config(app, analysis.settings.config_path.as_deref()),
    };

    ctx.print_success(&response, || response.to_text());
    Ok(())
}
