use super::parsed::{Language, ParsedFile};
use serde::{Deserialize, Serialize};

/// Top-left corner of a node's footprint after layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A source file in the dependency graph. Identity is the repository-root
/// relative path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    pub path: String,
    pub label: String,
    pub language: Option<Language>,
    pub import_count: usize,
    pub export_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
}

impl FileNode {
    pub fn from_parsed(file: &ParsedFile) -> Self {
        let label = basename(&file.path);
        let language = Language::from_path(&file.path);

        match file.source() {
            Some(source) => FileNode {
                path: file.path.clone(),
                label,
                language,
                import_count: source.imports.len(),
                export_count: source.exports.len(),
                parse_error: None,
                functions: source.functions.clone(),
                classes: source.classes.clone(),
            },
            None => FileNode {
                path: file.path.clone(),
                label,
                language,
                import_count: 0,
                export_count: 0,
                parse_error: file.error().map(str::to_string),
                functions: Vec::new(),
                classes: Vec::new(),
            },
        }
    }
}

/// A directory in the file-tree view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryNode {
    pub path: String,
    pub label: String,
    pub depth: usize,
    pub file_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestState {
    Open,
    Closed,
    Merged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestNode {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub head_branch: String,
    pub state: PullRequestState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchNode {
    pub name: String,
    pub head_sha: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitNode {
    pub sha: String,
    pub message: String,
    pub author: String,
}

/// Payload of a canvas node, discriminated by `kind` so renderers and
/// layout code dispatch exhaustively instead of trusting untyped fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodePayload {
    File(FileNode),
    Directory(DirectoryNode),
    PullRequest(PullRequestNode),
    Branch(BranchNode),
    Commit(CommitNode),
}

impl NodePayload {
    /// Unique node identity within one graph.
    pub fn id(&self) -> String {
        match self {
            NodePayload::File(n) => n.path.clone(),
            NodePayload::Directory(n) => n.path.clone(),
            NodePayload::PullRequest(n) => format!("pr-{}", n.number),
            NodePayload::Branch(n) => format!("branch-{}", n.name),
            NodePayload::Commit(n) => n.sha.clone(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NodePayload::File(n) => &n.label,
            NodePayload::Directory(n) => &n.label,
            NodePayload::PullRequest(n) => &n.title,
            NodePayload::Branch(n) => &n.name,
            NodePayload::Commit(n) => &n.message,
        }
    }
}

pub(crate) fn basename(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}
