use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use avl_words::browser::FileBrowser;
use avl_words::import::import_path;
use avl_words::shell::Shell;
use avl_words::{Promotion, TreeConfig, Verbosity, WordTree};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "avl-words", version, about = "Count words in a self-balancing AVL tree")]
struct Cli {
    /// Which neighbour replaces a removed node that has two children.
    #[arg(long, global = true, default_value_t = Promotion::Random)]
    promotion: Promotion,
    /// Seed for the random promotion choice.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Log rebalancing decisions to stderr and show node addresses.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive insert/search/delete session (the default).
    Shell {
        /// Starting directory for the import file browser.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Import text files and print the resulting tree.
    Count {
        /// Files to import; every alphabetic run is one word.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// How to print the tree.
        #[arg(long, default_value_t = Verbosity::Simple)]
        view: Verbosity,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = TreeConfig::new().promotion(cli.promotion);
    if let Some(seed) = cli.seed {
        config = config.seed(seed);
    }
    let mut tree = WordTree::with_config(config);
    let verbosity = if cli.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Simple
    };

    match cli.command.unwrap_or(Commands::Shell { dir: None }) {
        Commands::Shell { dir } => run_shell(&mut tree, dir, verbosity)?,
        Commands::Count { files, view } => run_count(&mut tree, files, view)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_shell(tree: &mut WordTree, dir: Option<PathBuf>, verbosity: Verbosity) -> Result<()> {
    let browser = match dir {
        Some(dir) => FileBrowser::at(&dir)
            .with_context(|| format!("failed to open directory {}", dir.display()))?,
        None => FileBrowser::new().context("failed to read the current directory")?,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(tree, stdin.lock(), stdout.lock(), browser)
        .verbosity(verbosity)
        .run()
        .context("shell session failed")?;
    Ok(())
}

fn run_count(tree: &mut WordTree, files: Vec<PathBuf>, view: Verbosity) -> Result<()> {
    for path in &files {
        import_path(tree, path).with_context(|| format!("failed to import {}", path.display()))?;
    }

    print!("{}", tree.render(view));
    println!(
        "{} words, {} distinct, height {}",
        tree.total(),
        tree.len(),
        tree.height()
    );
    Ok(())
}
