use std::path::{Path, PathBuf};

use crate::audio::{AudioTool, format_seconds};
use crate::config::{NewEpisode, append_episode};
use crate::error::{AudioError, BuildError};
use crate::publish::{FeedPaths, PublishedFeed, publish_feed};

/// Filename of the combined artifact written into the episode folder
const OUTPUT_FILENAME: &str = "episode.mp3";

/// Options for building one episode
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Episode title; derived from the folder name when absent
    pub title: Option<String>,
    /// Episode description (may be empty)
    pub description: String,
    /// Skip regenerating the feed after logging the episode
    pub skip_feed: bool,
}

/// Result of a completed episode build
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Path of the combined audio artifact
    pub audio_path: PathBuf,
    /// Probed duration, already formatted as `MM:SS`/`HH:MM:SS`
    pub duration: Option<String>,
    /// Title the episode was logged under
    pub title: String,
    /// Number of MP3 sources that went into the artifact
    pub source_count: usize,
    /// False when the folder was already present in the episode log
    pub logged: bool,
    /// The regenerated feed, unless skipped
    pub feed: Option<PublishedFeed>,
}

/// Collect the MP3 sources of an episode folder, sorted by name
///
/// The combined output file is excluded so rebuilding a folder doesn't
/// concatenate the previous artifact into the new one.
pub fn collect_sources(episode_dir: &Path) -> Result<Vec<PathBuf>, AudioError> {
    let entries = std::fs::read_dir(episode_dir).map_err(|e| AudioError::ReadDirectoryFailed {
        path: episode_dir.to_path_buf(),
        source: e,
    })?;

    let mut sources: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AudioError::ReadDirectoryFailed {
            path: episode_dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        if name.to_ascii_lowercase().ends_with(".mp3") && name != OUTPUT_FILENAME {
            sources.push(path);
        }
    }

    sources.sort();
    Ok(sources)
}

/// Derive a human title from a folder name: `01-intro` becomes `01 Intro`
pub fn title_from_folder(folder: &str) -> String {
    folder
        .split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build one episode end to end
///
/// Combines the folder's MP3 sources into `episode.mp3` (a single source
/// is copied instead of run through the tool), probes the duration,
/// prepends a record to the episode log (duplicates detected by folder),
/// and regenerates the feed unless `skip_feed` is set.
pub fn build_episode<T: AudioTool>(
    tool: &T,
    project_root: &Path,
    folder: &str,
    options: &BuildOptions,
) -> Result<BuildOutcome, BuildError> {
    let episode_dir = project_root.join("episodes").join(folder);
    if !episode_dir.is_dir() {
        return Err(BuildError::DirectoryNotFound(episode_dir));
    }

    let sources = collect_sources(&episode_dir)?;
    if sources.is_empty() {
        return Err(BuildError::Audio(AudioError::NoSourceFiles(episode_dir)));
    }

    let audio_path = episode_dir.join(OUTPUT_FILENAME);
    if sources.len() == 1 {
        std::fs::copy(&sources[0], &audio_path).map_err(|e| {
            BuildError::Audio(AudioError::CopyFailed {
                path: sources[0].clone(),
                source: e,
            })
        })?;
    } else {
        tool.concat(&sources, &audio_path)?;
    }

    // A failed probe shouldn't throw away a built artifact; the log
    // entry just goes in without a usable duration
    let duration = tool.duration_seconds(&audio_path).ok().map(format_seconds);

    let title = options
        .title
        .clone()
        .unwrap_or_else(|| title_from_folder(folder));

    let paths = FeedPaths::under_root(project_root);
    let logged = append_episode(
        &paths.episodes,
        &NewEpisode {
            folder: folder.to_string(),
            title: title.clone(),
            description: options.description.clone(),
            pub_date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            duration: duration.clone().unwrap_or_else(|| "00:00".to_string()),
        },
    )?;

    let feed = if options.skip_feed {
        None
    } else {
        Some(publish_feed(&paths)?)
    };

    Ok(BuildOutcome {
        audio_path,
        duration,
        title,
        source_count: sources.len(),
        logged,
        feed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Stub tool that concatenates file bytes and reports a fixed duration
    struct StubTool {
        duration: f64,
    }

    impl AudioTool for StubTool {
        fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), AudioError> {
            let mut combined = Vec::new();
            for input in inputs {
                combined.extend(std::fs::read(input).unwrap());
            }
            std::fs::write(output, combined).unwrap();
            Ok(())
        }

        fn duration_seconds(&self, _path: &Path) -> Result<f64, AudioError> {
            Ok(self.duration)
        }
    }

    fn setup_project(sources: &[(&str, &str)]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let episode_dir = dir.path().join("episodes").join("01-intro");
        std::fs::create_dir_all(&episode_dir).unwrap();
        for (name, content) in sources {
            std::fs::write(episode_dir.join(name), content).unwrap();
        }
        (dir, episode_dir)
    }

    #[test]
    fn collect_sources_sorts_and_excludes_output() {
        let (_dir, episode_dir) = setup_project(&[
            ("02-part.mp3", "b"),
            ("01-part.mp3", "a"),
            ("episode.mp3", "old artifact"),
            ("cover.jpg", "not audio"),
        ]);

        let sources = collect_sources(&episode_dir).unwrap();
        let names: Vec<_> = sources
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["01-part.mp3", "02-part.mp3"]);
    }

    #[test]
    fn title_from_folder_capitalizes_parts() {
        assert_eq!(title_from_folder("01-intro"), "01 Intro");
        assert_eq!(title_from_folder("field-notes"), "Field Notes");
        assert_eq!(title_from_folder("solo"), "Solo");
    }

    #[test]
    fn build_combines_sources_and_logs_episode() {
        let (dir, episode_dir) = setup_project(&[("01-a.mp3", "aaa"), ("02-b.mp3", "bbb")]);
        let tool = StubTool { duration: 754.0 };

        let outcome = build_episode(
            &tool,
            dir.path(),
            "01-intro",
            &BuildOptions {
                skip_feed: true,
                ..BuildOptions::default()
            },
        )
        .unwrap();

        assert_eq!(outcome.source_count, 2);
        assert_eq!(outcome.duration.as_deref(), Some("12:34"));
        assert_eq!(outcome.title, "01 Intro");
        assert!(outcome.logged);
        assert!(outcome.feed.is_none());
        assert_eq!(
            std::fs::read_to_string(episode_dir.join("episode.mp3")).unwrap(),
            "aaabbb"
        );

        let log = std::fs::read_to_string(dir.path().join("episodes.yaml")).unwrap();
        assert!(log.contains("folder: \"01-intro\""));
        assert!(log.contains("duration: \"12:34\""));
    }

    #[test]
    fn build_copies_single_source_without_tool() {
        let (dir, episode_dir) = setup_project(&[("only.mp3", "solo take")]);

        struct PanickyTool;
        impl AudioTool for PanickyTool {
            fn concat(&self, _: &[PathBuf], _: &Path) -> Result<(), AudioError> {
                panic!("concat must not run for a single source");
            }
            fn duration_seconds(&self, _: &Path) -> Result<f64, AudioError> {
                Ok(90.0)
            }
        }

        let outcome = build_episode(
            &PanickyTool,
            dir.path(),
            "01-intro",
            &BuildOptions {
                skip_feed: true,
                ..BuildOptions::default()
            },
        )
        .unwrap();

        assert_eq!(outcome.source_count, 1);
        assert_eq!(
            std::fs::read_to_string(episode_dir.join("episode.mp3")).unwrap(),
            "solo take"
        );
    }

    #[test]
    fn build_rejects_missing_episode_dir() {
        let dir = tempdir().unwrap();
        let tool = StubTool { duration: 1.0 };
        let result = build_episode(&tool, dir.path(), "99-ghost", &BuildOptions::default());
        assert!(matches!(result, Err(BuildError::DirectoryNotFound(_))));
    }

    #[test]
    fn build_rejects_empty_episode_dir() {
        let (dir, _) = setup_project(&[("cover.jpg", "art only")]);
        let tool = StubTool { duration: 1.0 };
        let result = build_episode(&tool, dir.path(), "01-intro", &BuildOptions::default());
        assert!(matches!(
            result,
            Err(BuildError::Audio(AudioError::NoSourceFiles(_)))
        ));
    }

    #[test]
    fn rebuild_does_not_duplicate_log_entry() {
        let (dir, _) = setup_project(&[("01-a.mp3", "aaa")]);
        let tool = StubTool { duration: 60.0 };
        let options = BuildOptions {
            skip_feed: true,
            ..BuildOptions::default()
        };

        let first = build_episode(&tool, dir.path(), "01-intro", &options).unwrap();
        let second = build_episode(&tool, dir.path(), "01-intro", &options).unwrap();

        assert!(first.logged);
        assert!(!second.logged);
    }

    #[test]
    fn build_regenerates_feed_by_default() {
        let (dir, _) = setup_project(&[("01-a.mp3", "aaa")]);
        std::fs::write(
            dir.path().join("config.yaml"),
            "site_url: \"https://example.com\"\ndropbox_base_url: \"https://www.dropbox.com/sh/abc\"\n",
        )
        .unwrap();
        let tool = StubTool { duration: 60.0 };

        let outcome =
            build_episode(&tool, dir.path(), "01-intro", &BuildOptions::default()).unwrap();

        let feed = outcome.feed.expect("feed should be generated");
        assert_eq!(feed.item_count, 1);
        assert!(feed.output_path.exists());
    }
}
