//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum, ValueHint};

use crate::application::OutputFormat;

/// Rebuild an interaction tree from a learner treelog and render it as a Graphviz graph
#[derive(Parser, Debug)]
#[command(name = "treelog-dot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Treelog written by the tree learner
    #[arg(value_hint = ValueHint::FilePath)]
    pub treelog: PathBuf,

    /// Label every node with its core features, not only the leaves
    #[arg(short = 'a', long)]
    pub core_features: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Dot)]
    pub format: Format,

    /// Write to file instead of stdout
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Abort on duplicate names, unreachable records and unterminated blocks
    #[arg(long)]
    pub strict: bool,

    /// Config file to use instead of the global/local lookup
    #[arg(short, long, env = "TREELOG_DOT_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Graphviz digraph
    Dot,
    /// Indented text tree
    Outline,
    /// Leaf names with core features
    Leaves,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Dot => OutputFormat::Dot,
            Format::Outline => OutputFormat::Outline,
            Format::Leaves => OutputFormat::Leaves,
        }
    }
}
