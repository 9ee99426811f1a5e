use crate::graph::CanvasGraph;
use crate::output::OutputFormatter;
use std::io::{self, Write};

/// Emits the graph exactly as cached: positioned nodes, styled edges,
/// warnings, and metadata. This is the machine-readable canvas payload.
pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format<W: Write>(&self, graph: &CanvasGraph, writer: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, graph).map_err(io::Error::other)?;
        writeln!(writer)
    }
}
