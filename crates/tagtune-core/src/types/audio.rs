//! The extraction result returned to callers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound on the length of attached lyrics, in characters.
pub const MAX_LYRICS_CHARS: usize = 20_000;

/// The metadata tag that produced an [`AudioInfo::audio_url`].
///
/// Variants are declared in lookup priority order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceTag {
    #[serde(rename = "og:audio")]
    OgAudio,
    #[serde(rename = "og:audio:url")]
    OgAudioUrl,
    #[serde(rename = "og:audio:secure_url")]
    OgAudioSecureUrl,
    #[serde(rename = "twitter:player:stream")]
    TwitterPlayerStream,
}

impl SourceTag {
    /// All tags, highest priority first.
    pub const PRIORITY: [Self; 4] = [
        Self::OgAudio,
        Self::OgAudioUrl,
        Self::OgAudioSecureUrl,
        Self::TwitterPlayerStream,
    ];

    /// The tag name as it appears in a page's `<meta>` element.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OgAudio => "og:audio",
            Self::OgAudioUrl => "og:audio:url",
            Self::OgAudioSecureUrl => "og:audio:secure_url",
            Self::TwitterPlayerStream => "twitter:player:stream",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio resource located on a web page.
///
/// Serializes directly as the `/api/info` response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AudioInfo {
    /// Absolute URL of the audio file.
    pub audio_url: String,
    /// Display title; `"audio"` when the page names none.
    pub title: String,
    /// Best-effort artist name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Lyrics recovered from the page, at most [`MAX_LYRICS_CHARS`] long.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    /// Filesystem-safe download name.
    pub filename: String,
    /// Representative artwork.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Which tag produced `audio_url`.
    pub source_tag: SourceTag,
    /// The canonicalized page URL that was requested.
    pub page_url: String,
}

impl AudioInfo {
    /// Attach lyrics, truncating to [`MAX_LYRICS_CHARS`].
    #[must_use]
    pub fn with_lyrics(mut self, lyrics: Option<String>) -> Self {
        self.lyrics = lyrics.map(|text| truncate_chars(text, MAX_LYRICS_CHARS));
        self
    }
}

/// Truncate a string to at most `max` characters.
pub fn truncate_chars(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text,
    }
}
