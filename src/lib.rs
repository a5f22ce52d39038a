pub mod audio;
pub mod build;
pub mod config;
pub mod dropbox;
pub mod error;
pub mod feed;
pub mod publish;
pub mod yaml;

// Re-export main types for convenience
pub use audio::{AudioTool, FfmpegTool, format_seconds};
pub use build::{BuildOptions, BuildOutcome, build_episode, collect_sources, title_from_folder};
pub use config::{ChannelConfig, EpisodeRecord, NewEpisode, append_episode, set_asset_urls};
pub use dropbox::{direct_url, rewrite_share_url};
pub use error::{AudioError, BuildError, ConfigError, FeedError, LogError, PublishError};
pub use feed::{Element, Namespace, assemble, render, write_feed};
pub use publish::{FeedPaths, PublishedFeed, publish_feed};
