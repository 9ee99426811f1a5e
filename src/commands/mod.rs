mod analyze;
mod cache;
mod init;
mod tree;

pub use analyze::cmd_analyze;
pub use cache::cmd_cache;
pub use init::cmd_init;
pub use tree::cmd_tree;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::fs::{FileSystem, default_fs};
use crate::graph::CanvasGraph;
use crate::output::{JsonOutput, MarkdownOutput, OutputFormatter};
use crate::style;
use std::io;
use std::path::Path;

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub config: Config,
}

impl CommandContext {
    /// Load config from the working directory, falling back to defaults.
    pub fn new() -> Self {
        let config = Config::load(Path::new(".")).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });
        Self { config }
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a graph to the chosen destination in the chosen format.
/// Markdown going to a terminal gets rendered; everything else is plain.
pub(crate) fn emit(graph: &CanvasGraph, format: OutputFormat, output: Option<&Path>) -> i32 {
    let mut buffer = Vec::new();
    let formatted = match format {
        OutputFormat::Markdown => MarkdownOutput::new().format(graph, &mut buffer),
        OutputFormat::Json => JsonOutput::new().format(graph, &mut buffer),
    };
    if let Err(e) = formatted {
        style::error(&format!("Failed to format output: {}", e));
        return 1;
    }

    let text = String::from_utf8_lossy(&buffer);
    match output {
        Some(path) => {
            let fs = default_fs();
            if let Err(e) = fs.write(path, &text) {
                style::error(&format!("Could not write output file: {}", e));
                return 1;
            }
            style::success(&format!("Wrote {}", style::path(path)));
            0
        }
        None => {
            let result = match format {
                OutputFormat::Markdown => style::render_markdown(&text, &mut io::stdout()),
                OutputFormat::Json => {
                    use io::Write;
                    io::stdout().write_all(&buffer)
                }
            };
            if let Err(e) = result {
                style::error(&format!("Failed to write output: {}", e));
                return 1;
            }
            0
        }
    }
}
