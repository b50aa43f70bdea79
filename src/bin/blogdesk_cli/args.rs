//! Command-line surface for `blogdesk`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use blogdesk::config::ClientOverrides;
use blogdesk::domain::posts::Partition;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "blogdesk",
    version,
    about = "Draft, review and publish blog posts",
    long_about = None
)]
pub struct Cli {
    /// Optional path to a configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ClientOverrides,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a bearer token and verify it against the service
    Login(LoginArgs),
    /// Forget the stored token
    Logout,
    /// Show the signed-in user and what they may do
    Whoami,
    /// Read, write and publish posts
    Posts(PostsArgs),
    /// Post and user counters for the signed-in role
    Dashboard,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Path to file containing the token (takes precedence over env)
    #[arg(long, env = "BLOGDESK_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Token from env (no flag, to keep tokens out of shell history)
    #[arg(hide = true, env = "BLOGDESK_TOKEN")]
    pub token_env: Option<String>,
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List one page of a partition
    List {
        #[arg(long, value_enum, default_value_t = PartitionArg::Published)]
        partition: PartitionArg,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        /// Page size (defaults to the configured size for the partition)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        size: Option<u32>,
    },
    /// Show a single post
    Show { id: String },
    /// Create a draft, optionally publishing it straight away
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, conflicts_with = "content_file", required_unless_present = "content_file")]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        publish: bool,
    },
    /// Edit an existing post
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Publish after saving
        #[arg(long)]
        publish: bool,
    },
    /// Publish drafts shown on one page of the review listing
    Publish {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        size: Option<u32>,
        /// Select every draft on the page
        #[arg(long, conflicts_with = "ids", required_unless_present = "ids")]
        all: bool,
        /// Draft ids to select
        ids: Vec<String>,
    },
    /// Delete a post and show the refreshed listing
    Delete {
        id: String,
        /// Listing to refresh (defaults to the role's draft listing)
        #[arg(long, value_enum)]
        partition: Option<PartitionArg>,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PartitionArg {
    Published,
    Drafts,
    AllDrafts,
    Mine,
}

impl From<PartitionArg> for Partition {
    fn from(value: PartitionArg) -> Self {
        match value {
            PartitionArg::Published => Partition::Published,
            PartitionArg::Drafts => Partition::Drafts,
            PartitionArg::AllDrafts => Partition::AllDrafts,
            PartitionArg::Mine => Partition::Mine,
        }
    }
}
