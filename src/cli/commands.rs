//! CLI command definitions using clap.
//!
//! Subcommands:
//! - scrape: collect posts and comments into a JSON corpus file
//! - analyze: run the analysis pipeline over a collected corpus
//! - run: scrape and analyze in one go
//! - tasks: list the fixed analysis pipeline

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// redsift - Reddit corpus collection and LLM analysis pipeline
#[derive(Parser, Debug)]
#[command(name = "redsift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect posts and comments into a corpus file
    Scrape {
        /// Search query (searches all of Reddit)
        #[arg(short, long, conflicts_with = "subreddit")]
        query: Option<String>,

        /// Subreddit to read instead of searching
        #[arg(short, long)]
        subreddit: Option<String>,

        /// Listing to read from a subreddit (hot, new, top, rising)
        #[arg(short, long, default_value = "hot")]
        listing: String,

        /// Time window (hour, day, week, month, year, all)
        #[arg(short, long, default_value = "all")]
        time: String,

        /// Where to write the corpus JSON
        #[arg(short, long, default_value = "corpus.json")]
        output: PathBuf,
    },

    /// Run the analysis pipeline over a collected corpus
    Analyze {
        /// Corpus JSON file produced by scrape
        input: PathBuf,

        /// Search query substituted into prompt templates
        #[arg(short, long)]
        query: String,

        /// Where to write the analysis results JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the configured corpus size
        #[arg(long)]
        num_top_posts: Option<usize>,

        /// Override the configured comment score threshold
        #[arg(long)]
        min_comment_score: Option<i64>,
    },

    /// Scrape and analyze in one go
    Run {
        /// Search query: drives both collection and prompt templates
        query: String,

        /// Time window (hour, day, week, month, year, all)
        #[arg(short, long, default_value = "all")]
        time: String,

        /// Where to write the analysis results JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the analysis tasks in execution order
    Tasks,
}
