mod channel;
mod episodes;

pub use channel::ChannelConfig;
pub use episodes::{EpisodeRecord, NewEpisode, append_episode, load_episodes, set_asset_urls};
