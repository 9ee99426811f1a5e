use clap::Parser;
use codecanvas::cli::{Cli, Command};
use codecanvas::{cmd_analyze, cmd_cache, cmd_init, cmd_tree};

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Command::Analyze(args) => cmd_analyze(args),
        Command::Tree(args) => cmd_tree(args),
        Command::Cache(args) => cmd_cache(args),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}
