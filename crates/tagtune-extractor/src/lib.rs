//! # tagtune-extractor
//!
//! Audio metadata extraction for Tagtune.
//!
//! Features:
//! - Open Graph / Twitter Card audio tag extraction
//! - Lyrics recovery for supported song pages
//! - Short-lived response caching keyed by canonical page URL

pub mod config;
pub mod filename;
pub mod http;
pub mod meta;

use std::sync::Arc;

use tagtune_cache::ResponseCache;
use tagtune_core::{validate_target, AudioExtension, AudioInfo, Error, PageFetcher, Result};
use tagtune_lyrics::LyricsResolver;
use tracing::{debug, info};

pub use config::EngineConfig;
pub use filename::{build_filename, sanitize_filename};
pub use http::HttpFetcher;
pub use meta::{extract_metadata, PageMetadata};

/// Turns a page URL into an [`AudioInfo`].
pub struct Extractor {
    fetcher: Arc<dyn PageFetcher>,
    cache: ResponseCache,
    lyrics: LyricsResolver,
}

impl Extractor {
    /// Create an extractor that fetches over HTTP.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(&config)?);
        Ok(Self::with_fetcher(&config, fetcher))
    }

    /// Create an extractor on top of a custom fetcher.
    pub fn with_fetcher(config: &EngineConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            cache: ResponseCache::with_settings(config.cache_ttl, config.cache_soft_limit),
            lyrics: LyricsResolver::with_embed_base(config.embed_base.clone()),
        }
    }

    /// Extract audio metadata for `page_url`.
    ///
    /// The URL is validated before any network access. Results are cached
    /// per canonical URL; lyrics failures never fail the call.
    pub async fn get_audio_info(&self, page_url: &str) -> Result<AudioInfo> {
        let url = validate_target(page_url)?;
        let key = url.as_str();

        if let Some(hit) = self.cache.get(key) {
            debug!("Cache hit for {key}");
            return Ok(hit);
        }
        debug!("Cache miss for {key}");

        info!("Fetching {key}");
        let html = self.fetcher.fetch_text(key).await?;
        let meta = extract_metadata(&html, &url).ok_or(Error::NoAudioTag)?;
        let lyrics = self.lyrics.resolve(self.fetcher.as_ref(), &url).await;

        let ext = AudioExtension::from_url(&meta.audio_url);
        let filename = build_filename(&meta.title, meta.artist.as_deref(), ext);

        let audio = AudioInfo {
            audio_url: meta.audio_url,
            title: meta.title,
            artist: meta.artist,
            lyrics: None,
            filename,
            image: meta.image,
            source_tag: meta.source_tag,
            page_url: key.to_string(),
        }
        .with_lyrics(lyrics);

        info!(
            "Extracted {} from {key} via {}",
            audio.filename, audio.source_tag
        );
        self.cache.insert(key, audio.clone());
        Ok(audio)
    }

    /// Number of cached results, including not-yet-swept expired ones.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached result.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
