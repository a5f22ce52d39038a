// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use url::Url;

use crate::error::FeedError;

/// Interactive share host that serves preview pages
const SHARE_HOST: &str = "www.dropbox.com";

/// Direct-content host that serves file bytes immediately
const DIRECT_HOST: &str = "dl.dropboxusercontent.com";

/// Build a direct-download URL for a file inside a shared folder
///
/// Takes the configured share base URL and appends `/{folder}/{filename}`
/// to its path. Of the original query only the first `rlkey` value
/// survives (the folder access key on `scl/fo` links); `dl=1` is always
/// set and everything else is dropped. The host becomes the
/// direct-content host over https.
///
/// A base that is empty or not an absolute URL (an unconfigured
/// `dropbox_base_url`, say) is treated as a bare path prefix, so feed
/// generation stays best-effort instead of aborting the run.
///
/// Handles both share-link generations:
/// - old: `https://www.dropbox.com/sh/abc123/def456?dl=1`
/// - new: `https://www.dropbox.com/scl/fo/abc123/def456?rlkey=xxx&dl=1`
pub fn direct_url(base_url: &str, folder: &str, filename: &str) -> Result<Url, FeedError> {
    let (base_path, rlkey) = match Url::parse(base_url) {
        Ok(base) => {
            let rlkey = base
                .query_pairs()
                .find(|(key, _)| key == "rlkey")
                .map(|(_, value)| value.into_owned());
            (base.path().trim_end_matches('/').to_string(), rlkey)
        }
        Err(_) => (base_url.trim_end_matches('/').to_string(), None),
    };

    let new_path = format!("{}/{}/{}", base_path, folder, filename);

    let mut direct = Url::parse(&format!("https://{DIRECT_HOST}"))?;
    direct.set_path(&new_path);
    {
        let mut query = direct.query_pairs_mut();
        if let Some(rlkey) = &rlkey {
            query.append_pair("rlkey", rlkey);
        }
        query.append_pair("dl", "1");
    }

    Ok(direct)
}

/// Rewrite a complete pre-formed share URL into a direct-download URL
///
/// Used when the producer pastes share links straight from the Dropbox
/// UI. Deliberately literal string surgery, not URL parsing: strip the
/// `st=` tracking parameter, swap the interactive host for the
/// direct-content host, and flip `dl=0` to `dl=1`. Applying it twice is
/// a no-op.
pub fn rewrite_share_url(share_url: &str) -> String {
    strip_st_param(share_url)
        .replace(SHARE_HOST, DIRECT_HOST)
        .replace("dl=0", "dl=1")
}

/// Remove every `&st=...` fragment up to the next `&` or end of string
fn strip_st_param(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut rest = url;
    while let Some(idx) = rest.find("&st=") {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + "&st=".len()..];
        rest = match after.find('&') {
            Some(amp) => &after[amp..],
            None => "",
        };
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_url_preserves_rlkey_and_sets_dl() {
        let url = direct_url(
            "https://www.dropbox.com/scl/fo/abc123/def456?rlkey=secret&st=track&dl=0",
            "01-intro",
            "episode.mp3",
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://dl.dropboxusercontent.com/scl/fo/abc123/def456/01-intro/episode.mp3?rlkey=secret&dl=1"
        );
    }

    #[test]
    fn direct_url_old_format_has_only_dl() {
        let url = direct_url(
            "https://www.dropbox.com/sh/abc123/def456?dl=1",
            "02-next",
            "cover.jpg",
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://dl.dropboxusercontent.com/sh/abc123/def456/02-next/cover.jpg?dl=1"
        );
    }

    #[test]
    fn direct_url_trims_trailing_slash_before_appending() {
        let url = direct_url("https://www.dropbox.com/sh/abc/", "ep", "episode.mp3").unwrap();
        assert_eq!(url.path(), "/sh/abc/ep/episode.mp3");
    }

    #[test]
    fn direct_url_is_stable_on_already_direct_base() {
        let first = direct_url(
            "https://www.dropbox.com/scl/fo/abc?rlkey=secret",
            "ep",
            "episode.mp3",
        )
        .unwrap();

        // Rewriting a base that already points at the direct host keeps
        // the host, rlkey, and dl=1 unchanged.
        let again = direct_url("https://dl.dropboxusercontent.com/scl/fo/abc?rlkey=secret", "ep", "episode.mp3")
            .unwrap();

        assert_eq!(first.host_str(), again.host_str());
        assert_eq!(first.query(), again.query());
    }

    #[test]
    fn direct_url_empty_base_still_builds_direct_link() {
        let url = direct_url("", "01-intro", "episode.mp3").unwrap();
        assert_eq!(
            url.as_str(),
            "https://dl.dropboxusercontent.com/01-intro/episode.mp3?dl=1"
        );
    }

    #[test]
    fn direct_url_treats_relative_base_as_path_prefix() {
        let url = direct_url("shared/show", "01-intro", "cover.jpg").unwrap();
        assert_eq!(
            url.as_str(),
            "https://dl.dropboxusercontent.com/shared/show/01-intro/cover.jpg?dl=1"
        );
    }

    #[test]
    fn share_rewrite_strips_tracking_and_flips_dl() {
        let rewritten = rewrite_share_url(
            "https://www.dropbox.com/scl/fi/xyz/episode.mp3?rlkey=secret&st=abcd1234&dl=0",
        );
        assert_eq!(
            rewritten,
            "https://dl.dropboxusercontent.com/scl/fi/xyz/episode.mp3?rlkey=secret&dl=1"
        );
    }

    #[test]
    fn share_rewrite_handles_trailing_st_param() {
        let rewritten = rewrite_share_url("https://www.dropbox.com/s/abc/a.mp3?dl=0&st=tail");
        assert_eq!(rewritten, "https://dl.dropboxusercontent.com/s/abc/a.mp3?dl=1");
    }

    #[test]
    fn share_rewrite_is_idempotent() {
        let once = rewrite_share_url(
            "https://www.dropbox.com/scl/fi/xyz/episode.mp3?rlkey=secret&st=abcd&dl=0",
        );
        let twice = rewrite_share_url(&once);
        assert_eq!(once, twice);
    }
}
