use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading config files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur when updating the episode log
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to write episode log {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Episode '{folder}' not found in the episode log")]
    EpisodeNotFound { folder: String },
}

/// Errors that can occur when assembling or writing the feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to render feed XML: {0}")]
    RenderFailed(#[source] std::io::Error),

    #[error("Rendered feed is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write feed file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur when running the external audio tool
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No MP3 source files found in {0}")]
    NoSourceFiles(PathBuf),

    #[error("Failed to run {command}: {source}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ffmpeg failed to combine sources: {stderr}")]
    ConcatFailed { stderr: String },

    #[error("ffprobe reported no usable duration for {path}")]
    ProbeFailed { path: PathBuf },

    #[error("Failed to copy {path}: {source}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level errors for feed publication
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),
}

/// Top-level errors for episode builds
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Episode directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Episode log error: {0}")]
    Log(#[from] LogError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}
