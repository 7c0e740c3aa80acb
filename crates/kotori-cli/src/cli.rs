use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kotori",
    about = "kotori — a tiny self-hosted micro-blog",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the local cache
    #[arg(long, global = true, default_value = ".kotori")]
    pub data_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Get or set the remote configuration
    Config(ConfigArgs),
    /// Write a new post and push it
    Post(PostArgs),
    /// Delete a post (batched locally until `save` unless --now)
    Delete(DeleteArgs),
    /// Push pending deletions to the remote ledger
    Save(SaveArgs),
    /// Replace the local timeline with the remote one
    Refresh(RefreshArgs),
    /// Show the timeline
    Timeline(TimelineArgs),
    /// Toggle a reaction stamp on a post
    React(ReactArgs),
    /// List every hashtag in use
    Tags(TagsArgs),
    /// Set the user icon on every post
    Icon(IconArgs),
}

#[derive(Args)]
pub struct ConfigArgs {
    /// One of: repo, branch, token, reactions-endpoint
    pub key: Option<String>,
    pub value: Option<String>,
}

#[derive(Args)]
pub struct PostArgs {
    pub text: Option<String>,
    /// File containing an inline image as a data: URL (repeatable)
    #[arg(long)]
    pub image: Vec<PathBuf>,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
    /// Push the deletion immediately instead of batching it
    #[arg(long)]
    pub now: bool,
}

#[derive(Args)]
pub struct SaveArgs {}

#[derive(Args)]
pub struct RefreshArgs {}

#[derive(Args)]
pub struct TimelineArgs {
    /// Only posts carrying this hashtag
    #[arg(long)]
    pub tag: Option<String>,
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

#[derive(Args)]
pub struct ReactArgs {
    pub id: String,
    /// Stamp kind (iine, suki, omedetou, gannbare, otukare, kitai, wakaru, www, ok)
    pub kind: String,
}

#[derive(Args)]
pub struct TagsArgs {}

#[derive(Args)]
pub struct IconArgs {
    /// File containing the icon as a data: URL
    pub file: PathBuf,
}
