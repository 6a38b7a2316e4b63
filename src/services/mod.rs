//! Service layer for lscode

pub mod analysis;
pub mod config;
pub mod locator;
pub mod navigation;
pub mod tsconfig;

pub use analysis::{AnalysisEngine, SyntaxEngine};
pub use config::{ConfigService, DefaultConfigService};
pub use locator::SymbolLocator;
pub use navigation::{Navigator, select};
pub use tsconfig::ConfigResolver;
