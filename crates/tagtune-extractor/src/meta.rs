//! Open Graph / Twitter Card tag extraction.
//!
//! Markup is matched with regular expressions rather than a DOM parser:
//! only `<meta>` and `<title>` elements matter, and sites are inconsistent
//! about attribute order, quoting and case.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tagtune_core::SourceTag;
use url::Url;

/// Title used when a page names none.
pub const DEFAULT_TITLE: &str = "audio";

/// Description tags searched for an artist credit, in order.
const DESCRIPTION_TAGS: [&str; 3] = ["og:description", "description", "twitter:description"];

const TITLE_TAGS: [&str; 2] = ["og:title", "twitter:title"];

const IMAGE_TAG: &str = "og:image";

/// Matchers for one tag name, in both attribute orders.
struct MetaPattern {
    /// `property`/`name` before `content`.
    forward: Regex,
    /// `content` before `property`/`name`.
    reverse: Regex,
}

impl MetaPattern {
    fn new(name: &str) -> Result<Self, regex::Error> {
        let name = regex::escape(name);
        let ident = format!(r#"\s(?:property|name)\s*=\s*["']{name}["']"#);
        let content = r#"\scontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#;

        Ok(Self {
            forward: Regex::new(&format!(r"(?i)<meta\b[^>]*?{ident}[^>]*?{content}"))?,
            reverse: Regex::new(&format!(r"(?i)<meta\b[^>]*?{content}[^>]*?{ident}"))?,
        })
    }

    /// First non-empty `content` value across both orders.
    fn find(&self, html: &str) -> Option<String> {
        [&self.forward, &self.reverse].into_iter().find_map(|re| {
            re.captures_iter(html)
                .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
                .map(|m| m.as_str().trim())
                .find(|value| !value.is_empty())
                .map(str::to_string)
        })
    }
}

static PATTERNS: Lazy<HashMap<&'static str, MetaPattern>> = Lazy::new(|| {
    SourceTag::PRIORITY
        .iter()
        .map(SourceTag::as_str)
        .chain(TITLE_TAGS)
        .chain(DESCRIPTION_TAGS)
        .chain([IMAGE_TAG])
        .filter_map(|name| MetaPattern::new(name).ok().map(|p| (name, p)))
        .collect()
});

#[allow(clippy::expect_used)] // Patterns are compile-time constants
static TITLE_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title>").expect("title pattern is valid"));

#[allow(clippy::expect_used)]
static ARTIST_CREDIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^.*\sby\s+([^\n()]+?)(?:\s*\(@[^)]*\))?[\s.,]*(?:Listen|on\s)")
        .expect("artist pattern is valid")
});

/// Metadata pulled from a page that declares an audio resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    /// Absolute audio URL.
    pub audio_url: String,
    /// Tag the audio URL came from.
    pub source_tag: SourceTag,
    /// Display title, entity-decoded.
    pub title: String,
    pub artist: Option<String>,
    pub image: Option<String>,
}

/// Raw `content` of the first `<meta>` named `name`, in either attribute
/// order. Empty values are skipped.
pub fn meta_content(html: &str, name: &str) -> Option<String> {
    match PATTERNS.get(name) {
        Some(pattern) => pattern.find(html),
        None => MetaPattern::new(name).ok()?.find(html),
    }
}

/// Extract page metadata, or `None` if no recognized audio tag is present.
pub fn extract_metadata(html: &str, page_url: &Url) -> Option<PageMetadata> {
    let (source_tag, raw_audio) = SourceTag::PRIORITY
        .into_iter()
        .find_map(|tag| meta_content(html, tag.as_str()).map(|value| (tag, value)))?;

    Some(PageMetadata {
        audio_url: absolutize(page_url, &decode_entities(&raw_audio)),
        source_tag,
        title: extract_title(html),
        artist: extract_artist(html),
        image: meta_content(html, IMAGE_TAG)
            .map(|raw| absolutize(page_url, &decode_entities(&raw))),
    })
}

/// Resolve the display title: `og:title`, `twitter:title`, then `<title>`.
pub fn extract_title(html: &str) -> String {
    TITLE_TAGS
        .iter()
        .filter_map(|name| meta_content(html, name))
        .chain(
            TITLE_ELEMENT
                .captures(html)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
        )
        .map(|raw| decode_entities(&raw).trim().to_string())
        .find(|title| !title.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Best-effort artist from a description of the form
/// `"<title> by <Name> (@handle). Listen ..."` or `"... by <Name> on ..."`.
pub fn extract_artist(html: &str) -> Option<String> {
    DESCRIPTION_TAGS
        .iter()
        .filter_map(|name| meta_content(html, name))
        .find_map(|raw| artist_from_description(&decode_entities(&raw)))
}

fn artist_from_description(description: &str) -> Option<String> {
    ARTIST_CREDIT
        .captures(description)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Decode the handful of entities that show up in tag values.
pub fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Make `href` absolute against the page it was found on.
fn absolutize(page_url: &Url, href: &str) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    page_url
        .join(href)
        .map_or_else(|_| href.to_string(), |url| url.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://music.example.com/tracks/42").unwrap()
    }

    #[test]
    fn test_both_attribute_orders() {
        for tag in SourceTag::PRIORITY {
            let forward = format!(
                r#"<meta property="{tag}" content="https://cdn.x.com/f.mp3">"#
            );
            let reverse = format!(r#"<meta content='https://cdn.x.com/r.mp3' name='{tag}' />"#);

            let meta = extract_metadata(&forward, &page()).unwrap();
            assert_eq!(meta.audio_url, "https://cdn.x.com/f.mp3");
            assert_eq!(meta.source_tag, tag);

            let meta = extract_metadata(&reverse, &page()).unwrap();
            assert_eq!(meta.audio_url, "https://cdn.x.com/r.mp3");
            assert_eq!(meta.source_tag, tag);
        }
    }

    #[test]
    fn test_tag_priority() {
        let html = r#"
            <meta name="twitter:player:stream" content="https://cdn.x.com/stream.mp3">
            <meta property="og:audio:secure_url" content="https://cdn.x.com/secure.mp3">
            <meta property="og:audio:url" content="https://cdn.x.com/url.mp3">
        "#;
        let meta = extract_metadata(html, &page()).unwrap();
        assert_eq!(meta.source_tag, SourceTag::OgAudioUrl);
        assert_eq!(meta.audio_url, "https://cdn.x.com/url.mp3");

        let with_primary = format!(r#"{html}<meta property="og:audio" content="https://cdn.x.com/a.mp3">"#);
        let meta = extract_metadata(&with_primary, &page()).unwrap();
        assert_eq!(meta.source_tag, SourceTag::OgAudio);
    }

    #[test]
    fn test_empty_content_falls_through() {
        let html = r#"
            <meta property="og:audio" content="">
            <meta property="og:audio:secure_url" content="https://cdn.x.com/s.ogg">
        "#;
        let meta = extract_metadata(html, &page()).unwrap();
        assert_eq!(meta.source_tag, SourceTag::OgAudioSecureUrl);
    }

    #[test]
    fn test_no_audio_tag() {
        let html = r#"<html><head><meta property="og:title" content="Nope"><meta property="og:audio:type" content="audio/mpeg"></head></html>"#;
        assert_eq!(extract_metadata(html, &page()), None);
        assert_eq!(extract_metadata("", &page()), None);
    }

    #[test]
    fn test_ignores_lookalike_attributes() {
        let html = r#"<meta data-property="og:audio" data-content="https://evil/x.mp3">"#;
        assert_eq!(extract_metadata(html, &page()), None);
    }

    #[test]
    fn test_title_resolution_order() {
        let html = r#"<title>Page Title</title><meta name="twitter:title" content="Tw Title">"#;
        assert_eq!(extract_title(html), "Tw Title");

        let html = r#"<meta name="twitter:title" content="Tw"><meta property="og:title" content=" OG &quot;Title&quot; ">"#;
        assert_eq!(extract_title(html), "OG \"Title\"");

        assert_eq!(extract_title("<TITLE>\n  Rock &amp; Roll &#39;99\n</TITLE>"), "Rock & Roll '99");
        assert_eq!(extract_title("<title>   </title>"), DEFAULT_TITLE);
        assert_eq!(extract_title("<p>no title</p>"), DEFAULT_TITLE);
    }

    #[test]
    fn test_artist_heuristic() {
        let html = r#"<meta property="og:description" content="Midnight Drive by Nova Lane (@novalane). Listen and make your own on Suno.">"#;
        assert_eq!(extract_artist(html).as_deref(), Some("Nova Lane"));

        let html = r#"<meta name="description" content="Stand by Me by The Drifters on Suno">"#;
        assert_eq!(extract_artist(html).as_deref(), Some("The Drifters"));

        let html = r#"<meta name="description" content="A podcast about cooking">"#;
        assert_eq!(extract_artist(html), None);

        let html = r#"<meta name="description" content="Written by hand">"#;
        assert_eq!(extract_artist(html), None);
    }

    #[test]
    fn test_image_and_relative_urls() {
        let html = r#"
            <meta property="og:audio" content="/media/clip.m4a?a=1&amp;b=2">
            <meta property="og:image" content="https://img.x.com/cover.jpg">
        "#;
        let meta = extract_metadata(html, &page()).unwrap();
        assert_eq!(meta.audio_url, "https://music.example.com/media/clip.m4a?a=1&b=2");
        assert_eq!(meta.image.as_deref(), Some("https://img.x.com/cover.jpg"));
        assert_eq!(meta.artist, None);
    }

    #[test]
    fn test_decode_entities_does_not_double_decode() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("&lt;b&gt; &#x27;x&#x27;"), "<b> 'x'");
    }
}
