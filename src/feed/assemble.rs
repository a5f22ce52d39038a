// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::NaiveDate;

use crate::config::{ChannelConfig, EpisodeRecord};
use crate::dropbox::direct_url;
use crate::error::FeedError;

use super::xml::{ATOM_NS, Element, ITUNES_NS, Namespace};

/// Filename of the combined audio artifact inside each episode folder
const AUDIO_FILENAME: &str = "episode.mp3";

/// Filename of the per-episode cover art inside each episode folder
const COVER_FILENAME: &str = "cover.jpg";

/// Build the full feed document tree from channel config and episode records
///
/// Episodes appear in source order (the log is newest-first by
/// convention); records without a folder are silently skipped. The tree
/// is rebuilt from scratch on every run - identical inputs give
/// byte-identical output.
pub fn assemble(
    config: &ChannelConfig,
    episodes: &[EpisodeRecord],
) -> Result<Element, FeedError> {
    let mut rss = Element::new(Namespace::Rss, "rss")
        .attr("version", "2.0")
        .attr("xmlns:itunes", ITUNES_NS)
        .attr("xmlns:atom", ATOM_NS);

    let mut channel = Element::new(Namespace::Rss, "channel");

    channel.push(Element::text(Namespace::Rss, "title", &config.title));
    channel.push(Element::text(
        Namespace::Rss,
        "description",
        &config.description,
    ));
    channel.push(Element::text(Namespace::Rss, "language", &config.language));
    channel.push(Element::text(Namespace::Rss, "link", &config.site_url));

    channel.push(
        Element::new(Namespace::Atom, "link")
            .attr("href", config.feed_url())
            .attr("rel", "self")
            .attr("type", "application/rss+xml"),
    );

    channel.push(Element::text(Namespace::ITunes, "author", &config.author));
    channel.push(Element::text(
        Namespace::ITunes,
        "summary",
        &config.description,
    ));
    channel.push(Element::text(
        Namespace::ITunes,
        "explicit",
        if config.explicit { "yes" } else { "no" },
    ));

    let mut owner = Element::new(Namespace::ITunes, "owner");
    owner.push(Element::text(Namespace::ITunes, "name", &config.author));
    owner.push(Element::text(Namespace::ITunes, "email", &config.email));
    channel.push(owner);

    channel.push(Element::new(Namespace::ITunes, "category").attr("text", config.category.clone()));

    if let Some(cover_url) = &config.cover_art_url {
        channel.push(Element::new(Namespace::ITunes, "image").attr("href", cover_url.clone()));

        let mut image = Element::new(Namespace::Rss, "image");
        image.push(Element::text(Namespace::Rss, "url", cover_url));
        image.push(Element::text(Namespace::Rss, "title", &config.title));
        image.push(Element::text(Namespace::Rss, "link", &config.site_url));
        channel.push(image);
    }

    for episode in episodes {
        let Some(folder) = episode.folder.as_deref().filter(|f| !f.is_empty()) else {
            continue;
        };
        channel.push(assemble_item(config, episode, folder)?);
    }

    rss.push(channel);
    Ok(rss)
}

fn assemble_item(
    config: &ChannelConfig,
    episode: &EpisodeRecord,
    folder: &str,
) -> Result<Element, FeedError> {
    let audio_url = direct_url(&config.dropbox_base_url, folder, AUDIO_FILENAME)?;
    let cover_url = direct_url(&config.dropbox_base_url, folder, COVER_FILENAME)?;

    let mut item = Element::new(Namespace::Rss, "item");

    let title = episode.title.as_deref().unwrap_or("Untitled Episode");
    let description = episode.description.as_deref().unwrap_or("");

    item.push(Element::text(Namespace::Rss, "title", title));
    item.push(Element::text(Namespace::Rss, "description", description));
    item.push(Element::text(Namespace::ITunes, "summary", description));
    item.push(Element::new(Namespace::ITunes, "image").attr("href", cover_url.to_string()));

    // An unparseable date drops the element rather than failing the run
    if let Some(pub_date) = episode.pub_date.as_deref().and_then(format_pub_date) {
        item.push(Element::text(Namespace::Rss, "pubDate", pub_date));
    }

    // Dropbox does not expose the byte size, so length stays 0
    item.push(
        Element::new(Namespace::Rss, "enclosure")
            .attr("url", audio_url.to_string())
            .attr("type", "audio/mpeg")
            .attr("length", "0"),
    );

    if let Some(duration) = episode.duration.as_deref() {
        item.push(Element::text(
            Namespace::ITunes,
            "duration",
            format_duration(duration),
        ));
    }

    // URL-as-identity: a changed audio URL is a new episode to clients
    item.push(
        Element::text(Namespace::Rss, "guid", audio_url.to_string())
            .attr("isPermaLink", "false"),
    );

    item.push(Element::text(Namespace::ITunes, "explicit", "no"));

    Ok(item)
}

/// Format a stored `YYYY-MM-DD` date as the RFC 2822 style RSS expects,
/// with a fixed noon-UTC time so regeneration is deterministic
fn format_pub_date(date_str: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
    Some(date.format("%a, %d %b %Y 12:00:00 +0000").to_string())
}

/// Normalize a duration to `HH:MM:SS`
///
/// Two segments are `MM:SS`; three are re-zero-padded; anything else
/// passes through unchanged.
fn format_duration(duration: &str) -> String {
    let parts: Vec<&str> = duration.split(':').collect();
    match parts.as_slice() {
        [m, s] => format!("00:{:0>2}:{:0>2}", m, s),
        [h, m, s] => format!("{:0>2}:{:0>2}:{:0>2}", h, m, s),
        _ => duration.to_string(),
    }
}
