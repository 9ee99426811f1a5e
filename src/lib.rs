pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fs;
pub mod github;
pub mod graph;
pub mod layout;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod resolver;
pub mod style;

pub use cli::Cli;
pub use commands::{cmd_analyze, cmd_cache, cmd_init, cmd_tree};
pub use config::Config;
pub use graph::CanvasGraph;
pub use pipeline::{AnalysisReport, Analyzer, CanvasError};
