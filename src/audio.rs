// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::AudioError;

/// Audio tool abstraction for testability
///
/// The build pipeline only needs two things from the outside world:
/// joining an ordered list of MP3 sources into one artifact, and asking
/// how long that artifact runs.
pub trait AudioTool {
    /// Concatenate `inputs` (in order) into `output`
    fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), AudioError>;

    /// Duration of an audio file in seconds
    fn duration_seconds(&self, path: &Path) -> Result<f64, AudioError>;
}

/// Default implementation shelling out to ffmpeg and ffprobe
#[derive(Debug, Clone, Default)]
pub struct FfmpegTool;

impl FfmpegTool {
    pub fn new() -> Self {
        Self
    }
}

impl AudioTool for FfmpegTool {
    fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), AudioError> {
        let concat_list = output.with_file_name("concat.txt");
        std::fs::write(&concat_list, concat_listing(inputs)).map_err(|e| AudioError::CommandFailed {
            command: "ffmpeg".to_string(),
            source: e,
        })?;

        let result = Command::new("ffmpeg")
            .arg("-y")
            .args(["-f", "concat", "-safe", "0"])
            .arg("-i")
            .arg(&concat_list)
            .args(["-c", "copy"])
            .arg(output)
            .output();

        // The list file is scratch either way
        let _ = std::fs::remove_file(&concat_list);

        let output_data = result.map_err(|e| AudioError::CommandFailed {
            command: "ffmpeg".to_string(),
            source: e,
        })?;

        if !output_data.status.success() {
            return Err(AudioError::ConcatFailed {
                stderr: String::from_utf8_lossy(&output_data.stderr).into_owned(),
            });
        }

        Ok(())
    }

    fn duration_seconds(&self, path: &Path) -> Result<f64, AudioError> {
        let output = Command::new("ffprobe")
            .args(["-v", "error"])
            .args(["-show_entries", "format=duration"])
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(path)
            .output()
            .map_err(|e| AudioError::CommandFailed {
                command: "ffprobe".to_string(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(AudioError::ProbeFailed {
                path: path.to_path_buf(),
            });
        }

        String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse()
            .map_err(|_| AudioError::ProbeFailed {
                path: path.to_path_buf(),
            })
    }
}

/// Render the input list in ffmpeg's concat-demuxer format
///
/// Quoting rule: a `'` in a filename closes the quote, emits an escaped
/// quote, and reopens
fn concat_listing(inputs: &[PathBuf]) -> String {
    let mut listing = String::new();
    for input in inputs {
        let escaped = input.display().to_string().replace('\'', "'\\''");
        listing.push_str(&format!("file '{}'\n", escaped));
    }
    listing
}

/// Format a duration in seconds as `MM:SS`, or `HH:MM:SS` once it
/// reaches an hour - the same shape the episode log stores
pub fn format_seconds(seconds: f64) -> String {
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}
