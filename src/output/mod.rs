mod json;
mod markdown;

pub use json::JsonOutput;
pub use markdown::MarkdownOutput;

use crate::graph::CanvasGraph;
use std::io::Write;

pub trait OutputFormatter {
    fn format<W: Write>(&self, graph: &CanvasGraph, writer: &mut W) -> std::io::Result<()>;
}
