use crate::graph::CanvasGraph;
use crate::model::NodePayload;
use crate::output::OutputFormatter;
use std::collections::BTreeMap;
use std::io::Write;

/// Human-readable summary of an analyzed repository.
pub struct MarkdownOutput;

impl MarkdownOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for MarkdownOutput {
    fn format<W: Write>(&self, graph: &CanvasGraph, writer: &mut W) -> std::io::Result<()> {
        let meta = &graph.metadata;
        writeln!(writer, "# {}/{}\n", meta.owner, meta.repo)?;
        if !meta.sha.is_empty() {
            writeln!(writer, "Commit: `{}`\n", meta.sha)?;
        }
        writeln!(
            writer,
            "{} nodes, {} dependency edges.",
            meta.node_count, meta.edge_count
        )?;

        let files: Vec<_> = graph
            .nodes
            .iter()
            .filter_map(|node| match &node.payload {
                NodePayload::File(file) => Some(file),
                _ => None,
            })
            .collect();

        let mut by_language: BTreeMap<String, usize> = BTreeMap::new();
        for file in &files {
            let label = file
                .language
                .map(|l| l.to_string())
                .unwrap_or_else(|| "Other".to_string());
            *by_language.entry(label).or_default() += 1;
        }
        if !by_language.is_empty() {
            writeln!(writer, "\n## Languages\n")?;
            for (language, count) in &by_language {
                writeln!(
                    writer,
                    "- {}: {} {}",
                    language,
                    count,
                    if *count == 1 { "file" } else { "files" }
                )?;
            }
        }

        if !graph.warnings.is_empty() {
            writeln!(writer, "\n## Warnings\n")?;
            for warning in &graph.warnings {
                writeln!(writer, "- {}", warning)?;
            }
        }

        let failures: Vec<_> = graph.parse_failures().collect();
        if !failures.is_empty() {
            writeln!(writer, "\n## Parse Failures\n")?;
            for (path, error) in failures {
                writeln!(writer, "- `{}`: {}", path, error)?;
            }
        }

        if !files.is_empty() {
            writeln!(writer, "\n## Files\n")?;
            writeln!(writer, "| File | Language | Imports | Exports |")?;
            writeln!(writer, "|------|----------|---------|---------|")?;
            for file in &files {
                let language = file
                    .language
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    writer,
                    "| `{}` | {} | {} | {} |",
                    file.path, language, file.import_count, file.export_count
                )?;
            }
        }

        let directories: Vec<_> = graph
            .nodes
            .iter()
            .filter_map(|node| match &node.payload {
                NodePayload::Directory(dir) => Some(dir),
                _ => None,
            })
            .collect();

        if !directories.is_empty() {
            writeln!(writer, "\n## Directories\n")?;
            for dir in &directories {
                writeln!(
                    writer,
                    "- `{}` ({} {})",
                    dir.path,
                    dir.file_count,
                    if dir.file_count == 1 { "file" } else { "files" }
                )?;
            }
        }

        Ok(())
    }
}
