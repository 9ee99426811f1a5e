use super::{CommandContext, emit};
use crate::cli::TreeArgs;
use crate::github::{GitHubClient, parse_repo_spec};
use crate::pipeline::Analyzer;
use crate::style;

pub fn cmd_tree(args: TreeArgs) -> i32 {
    let ctx = CommandContext::new();

    let spec = match parse_repo_spec(&args.repo) {
        Ok(spec) => spec,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            style::error(&format!("Failed to create async runtime: {}", e));
            return 1;
        }
    };

    let client = GitHubClient::new(ctx.config.fetch.token.clone(), ctx.config.tree_filter());
    let analyzer = Analyzer::new(&client, &ctx.config);

    let graph = match rt.block_on(analyzer.file_tree(&spec)) {
        Ok(graph) => graph,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    emit(&graph, args.format, args.output.as_deref())
}
