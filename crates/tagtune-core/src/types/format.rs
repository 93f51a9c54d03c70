//! Audio file extensions accepted in download names.

use serde::{Deserialize, Serialize};
use url::Url;

/// A recognized audio file extension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioExtension {
    #[default]
    Mp3,
    Mp4,
    M4a,
    Wav,
    Ogg,
    Flac,
    Aac,
    Opus,
    Wma,
    Webm,
}

impl AudioExtension {
    /// Parse a bare extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "mp4" => Some(Self::Mp4),
            "m4a" => Some(Self::M4a),
            "wav" => Some(Self::Wav),
            "ogg" => Some(Self::Ogg),
            "flac" => Some(Self::Flac),
            "aac" => Some(Self::Aac),
            "opus" => Some(Self::Opus),
            "wma" => Some(Self::Wma),
            "webm" => Some(Self::Webm),
            _ => None,
        }
    }

    /// Derive the extension from an audio URL's path, ignoring query and
    /// fragment. Unrecognized suffixes fall back to mp3.
    pub fn from_url(audio_url: &str) -> Self {
        let path = Url::parse(audio_url).map_or_else(
            |_| {
                audio_url
                    .split(['?', '#'])
                    .next()
                    .unwrap_or_default()
                    .to_string()
            },
            |url| url.path().to_string(),
        );

        path.rsplit('/')
            .next()
            .and_then(|segment| segment.rsplit_once('.'))
            .and_then(|(_, ext)| Self::from_extension(ext))
            .unwrap_or_default()
    }

    /// The extension without a leading dot.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Mp4 => "mp4",
            Self::M4a => "m4a",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::Aac => "aac",
            Self::Opus => "opus",
            Self::Wma => "wma",
            Self::Webm => "webm",
        }
    }
}
