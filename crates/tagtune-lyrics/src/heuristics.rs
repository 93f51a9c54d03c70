//! Text classification for payload chunks.
//!
//! The payload interleaves JSON rows, component references and plain prose
//! with no type tag, so lyrics are recognized by shape alone.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

const MIN_LYRICS_CHARS: usize = 80;
const MIN_LYRICS_LINES: usize = 4;
const MIN_DISTINCT_WORDS: usize = 20;

/// Fragments that only show up in serialized payload data.
const PAYLOAD_FRAGMENTS: [&str; 3] = [r#"{""#, r#":["$"#, r#""$L"#];

#[allow(clippy::expect_used)] // Patterns are compile-time constants
static ROW_ID_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+:").expect("row id pattern is valid"));

#[allow(clippy::expect_used)]
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Alphabetic}{2,}").expect("word pattern is valid"));

#[allow(clippy::expect_used)]
static REFERENCE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$(\d+)$").expect("token pattern is valid"));

/// Whether a chunk of payload text reads like song lyrics.
pub fn looks_like_lyrics(text: &str) -> bool {
    let text = text.trim();

    if text.chars().count() < MIN_LYRICS_CHARS {
        return false;
    }
    if PAYLOAD_FRAGMENTS.iter().any(|frag| text.contains(frag)) {
        return false;
    }
    if ROW_ID_PREFIX.is_match(text) {
        return false;
    }
    if text.lines().filter(|line| !line.trim().is_empty()).count() < MIN_LYRICS_LINES {
        return false;
    }

    let words: HashSet<String> = WORD
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect();
    words.len() >= MIN_DISTINCT_WORDS
}

/// The numeric id of a `$<digits>` reference token, if `value` is one.
pub fn reference_id(value: &str) -> Option<&str> {
    REFERENCE_TOKEN
        .captures(value.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether `value` is the placeholder used for tracks without vocals.
pub fn is_instrumental(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("[instrumental]") || value.eq_ignore_ascii_case("instrumental")
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSE: &str = "\
Walking down the river where the cold lights glow
Every shadow whispers that I never let you go
Morning paints the windows in a borrowed shade of gold
Carry every promise that we never really told
Hold me like the thunder holds the echo of the rain
Sing it back tomorrow and we start it all again";

    #[test]
    fn test_accepts_plain_verse() {
        assert_eq!(VERSE.lines().count(), 6);
        assert!(VERSE.split_whitespace().count() >= 40);
        assert!(looks_like_lyrics(VERSE));
    }

    #[test]
    fn test_rejects_short_text() {
        assert!(!looks_like_lyrics("la la la\nla la la\nla la la\nla la la"));
        assert!(!looks_like_lyrics(&"x".repeat(79)));
    }

    #[test]
    fn test_rejects_payload_fragments() {
        for frag in PAYLOAD_FRAGMENTS {
            let text = format!("{VERSE}\n{frag}");
            assert!(!looks_like_lyrics(&text), "{frag}");
        }
    }

    #[test]
    fn test_rejects_row_prefix() {
        let text = format!("1a:{VERSE}");
        assert!(!looks_like_lyrics(&text));
    }

    #[test]
    fn test_rejects_few_lines_or_repetitive_words() {
        let one_line = VERSE.replace('\n', " ");
        assert!(!looks_like_lyrics(&one_line));

        let repetitive = "oh yeah oh yeah oh yeah oh yeah oh yeah\n".repeat(6);
        assert!(!looks_like_lyrics(&repetitive));
    }

    #[test]
    fn test_reference_tokens() {
        assert_eq!(reference_id("$12"), Some("12"));
        assert_eq!(reference_id(" $7 "), Some("7"));
        assert_eq!(reference_id("$L12"), None);
        assert_eq!(reference_id("$"), None);
        assert_eq!(reference_id("costs $12"), None);
    }

    #[test]
    fn test_instrumental_marker() {
        assert!(is_instrumental("[Instrumental]"));
        assert!(is_instrumental(" instrumental "));
        assert!(!is_instrumental("[Verse]"));
    }
}
