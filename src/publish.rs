use std::path::{Path, PathBuf};

use crate::config::{ChannelConfig, load_episodes};
use crate::error::PublishError;
use crate::feed::{assemble, write_feed};

/// Locations of the flat-file inputs and the publish directory
#[derive(Debug, Clone)]
pub struct FeedPaths {
    /// Channel config mapping (restricted-YAML)
    pub config: PathBuf,
    /// Episode log sequence (restricted-YAML, newest first)
    pub episodes: PathBuf,
    /// Directory the feed file is published into
    pub output_dir: PathBuf,
}

impl FeedPaths {
    /// Conventional layout under a project root: `config.yaml`,
    /// `episodes.yaml`, and a `docs/` publish directory
    pub fn under_root(root: &Path) -> Self {
        Self {
            config: root.join("config.yaml"),
            episodes: root.join("episodes.yaml"),
            output_dir: root.join("docs"),
        }
    }
}

/// Result of a successful feed publication
#[derive(Debug, Clone)]
pub struct PublishedFeed {
    /// Where the feed file was written
    pub output_path: PathBuf,
    /// The public URL the feed will be served from
    pub feed_url: String,
    /// Number of items in the generated feed
    pub item_count: usize,
}

/// Regenerate the feed from the config files and write it out
///
/// The whole pipeline in one call: load both configs (missing files act
/// as empty), assemble the document tree, render, and write
/// `{output_dir}/{feed_filename}`. Re-reads everything from scratch;
/// there is no state carried between runs.
pub fn publish_feed(paths: &FeedPaths) -> Result<PublishedFeed, PublishError> {
    let config = ChannelConfig::load(&paths.config)?;
    let episodes = load_episodes(&paths.episodes)?;

    let item_count = episodes
        .iter()
        .filter(|e| e.folder.as_deref().is_some_and(|f| !f.is_empty()))
        .count();

    let document = assemble(&config, &episodes).map_err(PublishError::Feed)?;

    let output_path = paths.output_dir.join(&config.feed_filename);
    write_feed(&document, &output_path)?;

    Ok(PublishedFeed {
        output_path,
        feed_url: config.feed_url(),
        item_count,
    })
}
