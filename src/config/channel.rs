// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::error::ConfigError;
use crate::yaml::{Mapping, load_mapping};

/// Channel-level podcast configuration
///
/// The explicit schema for the channel config file. Every key has a
/// documented default so a missing or empty file still yields a usable
/// (if bland) feed. Loaded once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub title: String,
    pub description: String,
    pub language: String,
    pub site_url: String,
    pub feed_filename: String,
    pub author: String,
    pub email: String,
    pub category: String,
    pub cover_art_url: Option<String>,
    pub explicit: bool,
    pub dropbox_base_url: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            title: "My Podcast".to_string(),
            description: String::new(),
            language: "en-us".to_string(),
            site_url: String::new(),
            feed_filename: "feed.xml".to_string(),
            author: String::new(),
            email: String::new(),
            category: "Society & Culture".to_string(),
            cover_art_url: None,
            explicit: false,
            dropbox_base_url: String::new(),
        }
    }
}

impl ChannelConfig {
    /// Build a config from a parsed mapping, filling in defaults for
    /// absent keys
    pub fn from_mapping(mapping: &Mapping) -> Self {
        let defaults = Self::default();
        Self {
            title: string_or(mapping, "title", defaults.title),
            description: string_or(mapping, "description", defaults.description),
            language: string_or(mapping, "language", defaults.language),
            site_url: string_or(mapping, "site_url", defaults.site_url),
            feed_filename: string_or(mapping, "feed_filename", defaults.feed_filename),
            author: string_or(mapping, "author", defaults.author),
            email: string_or(mapping, "email", defaults.email),
            category: string_or(mapping, "category", defaults.category),
            cover_art_url: mapping.get_str("cover_art_url").map(String::from),
            explicit: mapping.get_bool("explicit").unwrap_or(defaults.explicit),
            dropbox_base_url: string_or(mapping, "dropbox_base_url", defaults.dropbox_base_url),
        }
    }

    /// Load the channel config from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::from_mapping(&load_mapping(path)?))
    }

    /// The public URL of the generated feed: `{site_url}/{feed_filename}`
    pub fn feed_url(&self) -> String {
        format!("{}/{}", self.site_url, self.feed_filename)
    }
}

fn string_or(mapping: &Mapping, key: &str, default: String) -> String {
    mapping
        .get_str(key)
        .map(String::from)
        .unwrap_or(default)
}
