//! Lyrics recovery for Tagtune.
//!
//! Suno song pages don't expose lyrics through any meta tag. The text lives
//! in the streaming payload of the song's embed page, either inline on the
//! clip object or delivered as a separate text row that the clip points at
//! with a `$<id>` reference token.
//!
//! Resolution is best effort: every failure is logged and reported as "no
//! lyrics", never as an error.

mod heuristics;
mod parser;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tagtune_core::{truncate_chars, PageFetcher, MAX_LYRICS_CHARS};
use tracing::{debug, info, warn};
use url::Url;

pub use heuristics::{is_instrumental, looks_like_lyrics, reference_id};
pub use parser::{extract_balanced_object, find_clip_object, normalize_escapes, split_chunks};

/// Host serving song pages with recoverable lyrics.
pub const LYRICS_HOST: &str = "suno.com";

/// Default base for embed page URLs.
pub const DEFAULT_EMBED_BASE: &str = "https://suno.com/embed";

/// Chunks scanned after the one that introduces a reference id.
const TOKEN_LOOKAHEAD: usize = 7;

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static SONG_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/song/([0-9A-Fa-f-]{36})/?$").expect("song path pattern is valid")
});

/// Resolver for lyrics hosted on the lyrics source.
#[derive(Debug, Clone)]
pub struct LyricsResolver {
    embed_base: String,
}

impl Default for LyricsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsResolver {
    /// Create a resolver pointing at the public embed endpoint.
    pub fn new() -> Self {
        Self::with_embed_base(DEFAULT_EMBED_BASE)
    }

    /// Create a resolver with a custom embed base URL.
    pub fn with_embed_base(base: impl Into<String>) -> Self {
        Self {
            embed_base: base.into().trim_end_matches('/').to_string(),
        }
    }

    /// The song identifier, if `page_url` is a lyrics-source song page.
    pub fn song_id(page_url: &Url) -> Option<String> {
        let host = page_url.host_str()?.to_ascii_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);
        if host != LYRICS_HOST {
            return None;
        }

        SONG_PATH
            .captures(page_url.path())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_ascii_lowercase())
    }

    /// URL of the embed page for a song.
    pub fn embed_url(&self, song_id: &str) -> String {
        format!("{}/{song_id}", self.embed_base)
    }

    /// Fetch and parse lyrics for `page_url`.
    ///
    /// Returns `None` immediately for pages outside the lyrics source.
    pub async fn resolve(&self, fetcher: &dyn PageFetcher, page_url: &Url) -> Option<String> {
        let song_id = Self::song_id(page_url)?;
        let embed_url = self.embed_url(&song_id);

        debug!("Fetching embed page {embed_url}");
        let html = match fetcher.fetch_text(&embed_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Lyrics embed fetch failed for {song_id}: {e}");
                return None;
            }
        };

        let lyrics = lyrics_from_embed(&html);
        match &lyrics {
            Some(text) => info!(
                "Recovered {} chars of lyrics for {song_id}",
                text.chars().count()
            ),
            None => debug!("No lyrics recovered for {song_id}"),
        }
        lyrics
    }
}

/// Extract lyrics from an embed page body.
pub fn lyrics_from_embed(html: &str) -> Option<String> {
    let normalized = normalize_escapes(html);
    let Some(clip_text) = find_clip_object(&normalized) else {
        debug!("Embed page has no clip object");
        return None;
    };

    let clip: Value = match serde_json::from_str(clip_text) {
        Ok(value) => value,
        Err(e) => {
            debug!("Clip object is not valid JSON: {e}");
            return None;
        }
    };

    if let Some(lyrics) = displayed_lyrics(&clip) {
        return Some(truncate_chars(lyrics.trim().to_string(), MAX_LYRICS_CHARS));
    }

    let prompt = metadata_field(&clip, "prompt")?;
    if prompt.trim().is_empty() || is_instrumental(prompt) {
        return None;
    }

    let text = match reference_id(prompt) {
        Some(id) => resolve_reference(&split_chunks(html), id)?,
        None => prompt.to_string(),
    };

    if reference_id(&text).is_some() {
        return None;
    }
    Some(truncate_chars(text.trim().to_string(), MAX_LYRICS_CHARS))
}

/// `displayed_lyrics` from the clip or its metadata, when usable.
fn displayed_lyrics(clip: &Value) -> Option<&str> {
    let lyrics = clip_field(clip, "displayed_lyrics")?;
    let usable = !lyrics.trim().is_empty()
        && reference_id(lyrics).is_none()
        && !is_instrumental(lyrics);
    usable.then_some(lyrics)
}

/// A string field from the clip's top level, falling back to `metadata`.
fn clip_field<'a>(clip: &'a Value, name: &str) -> Option<&'a str> {
    clip.get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            clip.get("metadata")
                .and_then(|m| m.get(name))
                .and_then(Value::as_str)
        })
}

/// A string field from the clip's `metadata`, falling back to the top level.
fn metadata_field<'a>(clip: &'a Value, name: &str) -> Option<&'a str> {
    clip.get("metadata")
        .and_then(|m| m.get(name))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| clip.get(name).and_then(Value::as_str))
}

/// Find the chunk that a `$<id>` reference points at.
///
/// Tried in order: the chunks following the one that introduces `id`, the
/// chunk just before the clip row, then the first lyric-shaped chunk anywhere.
fn resolve_reference(chunks: &[String], id: &str) -> Option<String> {
    let text_row = format!("{id}:T");
    let any_row = format!("{id}:");
    let intro = chunks
        .iter()
        .position(|c| c.contains(&text_row))
        .or_else(|| chunks.iter().position(|c| c.contains(&any_row)));

    if let Some(idx) = intro {
        if let Some(found) = chunks
            .iter()
            .skip(idx + 1)
            .take(TOKEN_LOOKAHEAD)
            .find(|c| looks_like_lyrics(c))
        {
            debug!("Reference ${id} resolved from lookahead");
            return Some(found.clone());
        }
    }

    if let Some(clip_idx) = chunks.iter().position(|c| c.contains(parser::CLIP_MARKER)) {
        if let Some(prev) = clip_idx.checked_sub(1).and_then(|i| chunks.get(i)) {
            if looks_like_lyrics(prev) {
                debug!("Reference ${id} resolved from chunk before clip");
                return Some(prev.clone());
            }
        }
    }

    let fallback = chunks.iter().find(|c| looks_like_lyrics(c)).cloned();
    if fallback.is_some() {
        debug!("Reference ${id} resolved from first lyric-shaped chunk");
    }
    fallback
}
