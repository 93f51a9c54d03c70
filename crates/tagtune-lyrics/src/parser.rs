//! Parser for the streaming payload embedded in lyrics-source pages.
//!
//! The embed page ships its data as a series of inline scripts of the form
//! `self.__next_f.push([1,"..."])`, each carrying one escaped string. The
//! concatenated strings are not valid JSON on their own, so objects are cut
//! out with a brace-depth scanner rather than a general parser.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Marker preceding the clip object in the payload.
pub const CLIP_MARKER: &str = r#""clip":{"#;

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static PUSH_SCRIPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"self\.__next_f\.push\(\[1,\s*"((?:[^"\\]|\\.)*)"\]\)"#)
        .expect("push script pattern is valid")
});

/// Undo one level of string escaping across the whole page.
///
/// Handles escaped quotes, backslashes, slashes, newlines, tabs and
/// `\uXXXX` sequences (`\u003c`, `\u003e`, `\u0026` in practice). Anything
/// else is left untouched.
pub fn normalize_escapes(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some('"') => {
                chars.next();
                out.push('"');
            }
            Some('\\') => {
                chars.next();
                out.push('\\');
            }
            Some('/') => {
                chars.next();
                out.push('/');
            }
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('r') => {
                chars.next();
                out.push('\r');
            }
            Some('t') => {
                chars.next();
                out.push('\t');
            }
            Some('u') => {
                let hex: String = chars.clone().skip(1).take(4).collect();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                if let Some(ch) = decoded {
                    for _ in 0..5 {
                        chars.next();
                    }
                    out.push(ch);
                } else {
                    out.push('\\');
                }
            }
            _ => out.push('\\'),
        }
    }

    out
}

/// Cut out the balanced `{...}` object that opens at byte offset `start`.
///
/// Braces inside string literals are ignored, honoring backslash escapes.
/// Returns `None` if `start` isn't an opening brace or the object never
/// closes.
pub fn extract_balanced_object(text: &str, start: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Locate the first clip object in normalized page text.
pub fn find_clip_object(text: &str) -> Option<&str> {
    let marker = text.find(CLIP_MARKER)?;
    let brace = marker + CLIP_MARKER.len() - 1;
    let object = extract_balanced_object(text, brace);
    if object.is_none() {
        debug!("Clip marker at {marker} has no balanced object");
    }
    object
}

/// Split the page's push scripts into decoded text chunks, in page order.
pub fn split_chunks(html: &str) -> Vec<String> {
    PUSH_SCRIPT
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|raw| decode_literal(raw.as_str()))
        .collect()
}

/// Decode the body of a JS string literal, falling back to the lenient
/// normalizer when it isn't strict JSON.
fn decode_literal(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\""))
        .unwrap_or_else(|_| normalize_escapes(raw))
}
