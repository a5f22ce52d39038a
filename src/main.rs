use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use console::Emoji;

use podforge::{
    BuildOptions, FeedPaths, FfmpegTool, build_episode, publish_feed, set_asset_urls,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static HAMMER: Emoji<'_, '_> = Emoji("🔨 ", "[~] ");
static FEED: Emoji<'_, '_> = Emoji("📡 ", "[>] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static LINK: Emoji<'_, '_> = Emoji("🔗 ", "[@] ");

/// Build podcast episodes and publish an RSS feed
#[derive(Parser, Debug)]
#[command(name = "podforge")]
#[command(about = "Build podcast episodes and publish an Apple Podcasts-compatible RSS feed")]
#[command(version)]
struct Args {
    /// Project root containing config.yaml and episodes.yaml
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Combine an episode folder's MP3s, log the episode, and regenerate the feed
    Build {
        /// Episode folder name under episodes/ (e.g. 01-intro)
        episode: String,

        /// Episode title (defaults to a title derived from the folder name)
        #[arg(short, long)]
        title: Option<String>,

        /// Episode description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Skip feed regeneration
        #[arg(long)]
        skip_feed: bool,
    },

    /// Regenerate the feed from config.yaml and episodes.yaml
    Generate,

    /// Rewrite pasted share URLs and store them on an episode record
    UpdateUrls {
        /// Episode folder name
        folder: String,

        /// Share URL for episode.mp3
        #[arg(short = 'f', long)]
        file_url: String,

        /// Share URL for cover.jpg
        #[arg(short = 'c', long)]
        cover_url: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!(
        "\n{}{} {}\n",
        MICROPHONE,
        "podforge".bold().magenta(),
        "- Podcast Publisher".dimmed()
    );

    match args.command {
        Command::Build {
            episode,
            title,
            description,
            skip_feed,
        } => {
            println!("{HAMMER}Building episode {}", episode.cyan());

            let options = BuildOptions {
                title,
                description,
                skip_feed,
            };
            let tool = FfmpegTool::new();
            let outcome = build_episode(&tool, &args.root, &episode, &options)
                .with_context(|| format!("Failed to build episode '{episode}'"))?;

            println!(
                "{SUCCESS}Combined {} source file(s) into {}",
                outcome.source_count.to_string().cyan(),
                outcome.audio_path.display().to_string().cyan()
            );
            match &outcome.duration {
                Some(duration) => println!("   Duration: {}", duration.cyan()),
                None => println!("{WARNING}{}", "Could not probe duration".yellow()),
            }
            if outcome.logged {
                println!("{SUCCESS}Logged as {}", outcome.title.bold().green());
            } else {
                println!(
                    "{WARNING}{}",
                    "Episode already in the log - entry unchanged".yellow()
                );
            }
            if let Some(feed) = &outcome.feed {
                report_feed(&feed.output_path, &feed.feed_url, feed.item_count);
            }
        }

        Command::Generate => {
            let paths = FeedPaths::under_root(&args.root);
            let feed = publish_feed(&paths).context("Failed to generate feed")?;
            report_feed(&feed.output_path, &feed.feed_url, feed.item_count);
        }

        Command::UpdateUrls {
            folder,
            file_url,
            cover_url,
        } => {
            let paths = FeedPaths::under_root(&args.root);
            let updated = set_asset_urls(&paths.episodes, &folder, &file_url, &cover_url)
                .with_context(|| format!("Failed to update URLs for '{folder}'"))?;

            println!("{SUCCESS}Updated {}", folder.bold().green());
            if let Some(url) = &updated.file_url {
                println!("{LINK}file_url:  {}", url.cyan());
            }
            if let Some(url) = &updated.cover_url {
                println!("{LINK}cover_url: {}", url.cyan());
            }
            println!(
                "\nRun {} to publish the change",
                "podforge generate".bold()
            );
        }
    }

    Ok(())
}

fn report_feed(output_path: &std::path::Path, feed_url: &str, item_count: usize) {
    println!(
        "{FEED}{} {} ({} item(s))",
        "Feed written:".bold().green(),
        output_path.display().to_string().cyan(),
        item_count.to_string().cyan()
    );
    println!("   Feed URL: {}", feed_url.cyan());
}
