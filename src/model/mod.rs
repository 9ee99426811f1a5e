mod node;
mod parsed;

pub use node::{
    BranchNode, CommitNode, DirectoryNode, FileNode, NodePayload, Position, PullRequestNode,
    PullRequestState,
};
pub use parsed::{
    ExportKind, ExportStatement, ImportKind, ImportStatement, Language, ParseOutcome, ParsedFile,
    ParsedSource, Specifier,
};
