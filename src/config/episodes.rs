// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::dropbox::rewrite_share_url;
use crate::error::{ConfigError, LogError};
use crate::yaml::{Mapping, emit_sequence, load_sequence};

/// Header comment written at the top of every re-serialized episode log
const LOG_HEADER: &str = "# Episodes - newest first\n";

/// One entry in the episode log
///
/// `folder` names the episode's asset subfolder and is the record's
/// identity; records without it are kept here but skipped at feed
/// assembly. `file_url`/`cover_url` are optional pre-formed direct links
/// written by the update-urls flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeRecord {
    pub folder: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub pub_date: Option<String>,
    pub duration: Option<String>,
    pub file_url: Option<String>,
    pub cover_url: Option<String>,
}

impl EpisodeRecord {
    pub fn from_mapping(mapping: &Mapping) -> Self {
        let field = |key: &str| mapping.get_str(key).map(String::from);
        Self {
            folder: field("folder"),
            title: field("title"),
            description: field("description"),
            pub_date: field("pub_date"),
            duration: field("duration"),
            file_url: field("file_url"),
            cover_url: field("cover_url"),
        }
    }

    fn to_mapping(&self) -> Mapping {
        let mut mapping = Mapping::new();
        let mut push = |key: &str, value: &Option<String>| {
            if let Some(v) = value {
                mapping.insert(key, v.as_str());
            }
        };
        push("folder", &self.folder);
        push("title", &self.title);
        push("description", &self.description);
        push("pub_date", &self.pub_date);
        push("duration", &self.duration);
        push("file_url", &self.file_url);
        push("cover_url", &self.cover_url);
        mapping
    }
}

/// Load all episode records in file order (newest first by convention)
pub fn load_episodes(path: &Path) -> Result<Vec<EpisodeRecord>, ConfigError> {
    let records = load_sequence(path)?;
    Ok(records.iter().map(EpisodeRecord::from_mapping).collect())
}

/// Data for a freshly built episode about to be logged
#[derive(Debug, Clone)]
pub struct NewEpisode {
    pub folder: String,
    pub title: String,
    pub description: String,
    pub pub_date: String,
    pub duration: String,
}

/// Prepend a new record to the episode log
///
/// Returns `false` without touching the file when a record with the same
/// folder already exists. The whole log is re-serialized; hand-edited
/// comments (other than the fixed header) do not survive.
pub fn append_episode(path: &Path, episode: &NewEpisode) -> Result<bool, LogError> {
    let mut records = load_episodes(path)?;

    if records
        .iter()
        .any(|r| r.folder.as_deref() == Some(episode.folder.as_str()))
    {
        return Ok(false);
    }

    records.insert(
        0,
        EpisodeRecord {
            folder: Some(episode.folder.clone()),
            title: Some(episode.title.clone()),
            description: Some(episode.description.clone()),
            pub_date: Some(episode.pub_date.clone()),
            duration: Some(episode.duration.clone()),
            file_url: None,
            cover_url: None,
        },
    );

    write_log(path, &records)?;
    Ok(true)
}

/// Store rewritten direct-download URLs on an existing episode record
///
/// Both URLs go through the share-link rewrite (host swap, `dl=1`,
/// tracking parameter stripped) before being stored.
pub fn set_asset_urls(
    path: &Path,
    folder: &str,
    file_url: &str,
    cover_url: &str,
) -> Result<EpisodeRecord, LogError> {
    let mut records = load_episodes(path)?;

    let record = records
        .iter_mut()
        .find(|r| r.folder.as_deref() == Some(folder))
        .ok_or_else(|| LogError::EpisodeNotFound {
            folder: folder.to_string(),
        })?;

    record.file_url = Some(rewrite_share_url(file_url));
    record.cover_url = Some(rewrite_share_url(cover_url));
    let updated = record.clone();

    write_log(path, &records)?;
    Ok(updated)
}

fn write_log(path: &Path, records: &[EpisodeRecord]) -> Result<(), LogError> {
    let mappings: Vec<Mapping> = records.iter().map(EpisodeRecord::to_mapping).collect();
    let mut text = String::from(LOG_HEADER);
    text.push_str(&emit_sequence(&mappings));

    std::fs::write(path, text).map_err(|e| LogError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
