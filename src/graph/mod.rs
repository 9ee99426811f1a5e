mod builder;
mod data;

pub use builder::{DependencyGraph, EdgeStyle};
pub use data::{CanvasEdge, CanvasGraph, CanvasNode, GraphMetadata};
