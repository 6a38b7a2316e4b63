//! Command implementations for lscode
//!
//! Each command is implemented in its own module.

pub mod find_references;
pub mod get_definition;

use crate::app::App;

/// Display path of the config that governed the analysis
pub(crate) fn resolved_config(app: &App, config_path: Option<&std::path::Path>) -> Option<String> {
    config_path.map(|p| app.output.relative_path(p))
}
