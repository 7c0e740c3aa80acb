use std::fs;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;

use kotori_ledger::ContentLedger;
use kotori_protocol::HyperTransport;
use kotori_reactions::HttpReactionStore;
use kotori_store::{FileKv, LocalCache, RemoteConfig};
use kotori_sync::{DeleteOutcome, Orchestrator, SyncOptions, SyncResult};
use kotori_types::{ImageBlob, PostDraft, PostId, ReactionKind};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let kv = FileKv::open(cli.data_dir.join("cache.json"))
        .context("could not open the local cache")?;
    let cache = LocalCache::new(Arc::new(kv));

    match cli.command {
        Command::Config(args) => cmd_config(&cache, args),
        Command::Post(args) => cmd_post(cache, args).await,
        Command::Delete(args) => cmd_delete(cache, args).await,
        Command::Save(_) => cmd_save(cache).await,
        Command::Refresh(_) => cmd_refresh(cache).await,
        Command::Timeline(args) => cmd_timeline(cache, args),
        Command::React(args) => cmd_react(cache, args).await,
        Command::Tags(_) => cmd_tags(cache),
        Command::Icon(args) => cmd_icon(cache, args).await,
    }
}

/// Wire the orchestrator to whatever remotes the cached config names.
/// Missing config is not an error here; the operation that needs the
/// remote refuses with its own message.
fn orchestrator(cache: LocalCache, options: SyncOptions) -> anyhow::Result<Orchestrator> {
    let config = cache.remote_config()?;
    let mut orch = Orchestrator::new(cache).with_options(options);

    if let Some(config) = config {
        let transport = Arc::new(HyperTransport::new());
        if !config.repo.is_empty() && !config.token.is_empty() {
            orch = orch.with_ledger(Arc::new(ContentLedger::new(
                transport.clone(),
                config.repo,
                config.branch,
                config.token,
            )));
        }
        if let Some(endpoint) = config.reactions_endpoint {
            orch = orch.with_reactions(Arc::new(HttpReactionStore::new(transport, endpoint)));
        }
    }

    orch.load()?;
    Ok(orch)
}

/// Map a sync failure to the short message the user should see.
fn surface<T>(result: SyncResult<T>) -> anyhow::Result<T> {
    result.map_err(|err| anyhow!("{}", err.user_message()))
}

fn cmd_config(cache: &LocalCache, args: ConfigArgs) -> anyhow::Result<()> {
    let current = cache.remote_config()?;
    match (args.key.as_deref(), args.value) {
        (None, _) => match current {
            Some(config) => {
                println!("repo               = {}", config.repo.bold());
                println!("branch             = {}", config.branch.yellow());
                println!("token              = {}", mask(&config.token));
                println!(
                    "reactions-endpoint = {}",
                    config.reactions_endpoint.as_deref().unwrap_or("(not set)")
                );
                Ok(())
            }
            None => {
                println!("No remote configured. Set one with:");
                println!("  kotori config repo {}", "owner/name".bold());
                println!("  kotori config token {}", "<api token>".bold());
                Ok(())
            }
        },
        (Some(key), Some(value)) => {
            let mut config = current.unwrap_or(RemoteConfig {
                repo: String::new(),
                branch: "main".into(),
                token: String::new(),
                reactions_endpoint: None,
            });
            match key {
                "repo" => config.repo = value,
                "branch" => config.branch = value,
                "token" => config.token = value,
                "reactions-endpoint" => config.reactions_endpoint = Some(value),
                other => bail!("unknown config key: {other}"),
            }
            cache.set_remote_config(&config)?;
            println!("{} Set {}", "✓".green(), key.bold());
            Ok(())
        }
        (Some(key), None) => {
            let config = current.context("no remote configured")?;
            let value = match key {
                "repo" => config.repo,
                "branch" => config.branch,
                "token" => mask(&config.token),
                "reactions-endpoint" => config
                    .reactions_endpoint
                    .unwrap_or_else(|| "(not set)".into()),
                other => bail!("unknown config key: {other}"),
            };
            println!("{key} = {value}");
            Ok(())
        }
    }
}

fn mask(token: &str) -> String {
    if token.chars().count() <= 4 {
        "****".to_string()
    } else {
        let head: String = token.chars().take(4).collect();
        format!("{head}…")
    }
}

async fn cmd_post(cache: LocalCache, args: PostArgs) -> anyhow::Result<()> {
    let user_icon = cache.user_icon()?;
    let mut orch = orchestrator(cache, SyncOptions::default())?;

    let mut images = Vec::new();
    for path in &args.image {
        let data_url = fs::read_to_string(path)
            .with_context(|| format!("could not read image file {}", path.display()))?;
        images.push(ImageBlob::from_data_url(data_url.trim())?);
    }

    let mut draft = PostDraft::new(args.text.unwrap_or_default()).with_images(images);
    if let Some(icon) = user_icon {
        draft = draft.with_user_icon(icon);
    }

    let post = surface(orch.create_post(draft).await)?;
    println!("{} Posted {}", "✓".green().bold(), post.id.to_string().yellow());
    if !post.hashtags.is_empty() {
        let tags: Vec<String> = post.hashtags.iter().map(|t| format!("#{t}")).collect();
        println!("  {}", tags.join(" ").cyan());
    }
    Ok(())
}

async fn cmd_delete(cache: LocalCache, args: DeleteArgs) -> anyhow::Result<()> {
    let options = SyncOptions {
        defer_deletes: !args.now,
    };
    let mut orch = orchestrator(cache, options)?;
    let id = PostId::from_string(args.id);

    match surface(orch.delete_post(&id).await)? {
        DeleteOutcome::NotFound => {
            println!("No post with id {}", id.to_string().yellow());
        }
        DeleteOutcome::Deferred => {
            println!(
                "{} Deleted locally — run {} to push",
                "✓".green(),
                "kotori save".bold()
            );
        }
        DeleteOutcome::Pushed => {
            println!("{} Deleted {}", "✓".green().bold(), id.to_string().yellow());
        }
    }
    Ok(())
}

async fn cmd_save(cache: LocalCache) -> anyhow::Result<()> {
    let mut orch = orchestrator(cache, SyncOptions::default())?;
    if surface(orch.save_pending().await)? {
        println!(
            "{} Saved — {} posts remain",
            "✓".green().bold(),
            orch.timeline().len().to_string().bold()
        );
    } else {
        println!("Nothing pending.");
    }
    Ok(())
}

async fn cmd_refresh(cache: LocalCache) -> anyhow::Result<()> {
    let mut orch = orchestrator(cache, SyncOptions::default())?;
    surface(orch.refresh().await)?;
    println!(
        "{} Refreshed — {} posts",
        "✓".green().bold(),
        orch.timeline().len().to_string().bold()
    );
    Ok(())
}

fn cmd_timeline(cache: LocalCache, args: TimelineArgs) -> anyhow::Result<()> {
    let orch = orchestrator(cache, SyncOptions::default())?;
    let timeline = orch.timeline();

    let posts: Vec<_> = match &args.tag {
        Some(tag) => timeline.filter_by_tag(tag).take(args.limit).collect(),
        None => timeline.posts().iter().take(args.limit).collect(),
    };

    if posts.is_empty() {
        println!("No posts.");
        return Ok(());
    }
    if orch.state().pending_save {
        println!("{}", "(unsaved deletions — run `kotori save`)".red());
    }

    for post in posts {
        println!(
            "{}  {}",
            post.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            post.id.to_string().yellow()
        );
        if !post.text.is_empty() {
            println!("  {}", post.text);
        }
        if !post.images.is_empty() {
            println!("  [{} images]", post.images.len());
        }
        if !post.hashtags.is_empty() {
            let tags: Vec<String> = post.hashtags.iter().map(|t| format!("#{t}")).collect();
            println!("  {}", tags.join(" ").cyan());
        }
        if let Some(counts) = orch.cached_reaction_counts(&post.id)? {
            if !counts.is_empty() {
                let shown: Vec<String> = counts
                    .iter()
                    .map(|(kind, count)| format!("{} {}", kind.label(), count))
                    .collect();
                println!("  {}", shown.join("  ").magenta());
            }
        }
    }
    Ok(())
}

async fn cmd_react(cache: LocalCache, args: ReactArgs) -> anyhow::Result<()> {
    let kind: ReactionKind = args.kind.parse()?;
    let orch = orchestrator(cache, SyncOptions::default())?;
    let id = PostId::from_string(args.id);

    let outcome = surface(orch.toggle_reaction(&id, kind).await)?;
    let state = if outcome.reacted {
        "on".green()
    } else {
        "off".dimmed()
    };
    println!(
        "{} {} {} ({})",
        "✓".green(),
        kind.label().bold(),
        state,
        outcome.counts.get(kind)
    );
    Ok(())
}

fn cmd_tags(cache: LocalCache) -> anyhow::Result<()> {
    let orch = orchestrator(cache, SyncOptions::default())?;
    let timeline = orch.timeline();
    let index = timeline.tag_index();

    if index.is_empty() {
        println!("No hashtags yet.");
        return Ok(());
    }
    for tag in index {
        let count = timeline.filter_by_tag(&tag).count();
        println!("{}  {}", format!("#{tag}").cyan(), count.to_string().dimmed());
    }
    Ok(())
}

async fn cmd_icon(cache: LocalCache, args: IconArgs) -> anyhow::Result<()> {
    let data_url = fs::read_to_string(&args.file)
        .with_context(|| format!("could not read icon file {}", args.file.display()))?;
    let icon = ImageBlob::from_data_url(data_url.trim())?;

    let mut orch = orchestrator(cache, SyncOptions::default())?;
    let touched = surface(orch.set_user_icon(icon).await)?;
    println!(
        "{} Icon set on {} posts",
        "✓".green().bold(),
        touched.to_string().bold()
    );
    Ok(())
}
