//! Download filename construction.

use tagtune_core::AudioExtension;

/// Base used when nothing usable survives sanitizing.
const FALLBACK_BASE: &str = "audio";

/// Characters that are illegal in filenames on common filesystems.
const FORBIDDEN: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Strip forbidden characters, then trim surrounding whitespace and dots.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN.contains(c) && !c.is_control())
        .collect::<String>()
        .trim_matches(|c: char| c.is_whitespace() || c == '.')
        .to_string()
}

/// `"<Artist> - <Title>.<ext>"`, or `"<Title>.<ext>"` without an artist.
pub fn build_filename(title: &str, artist: Option<&str>, ext: AudioExtension) -> String {
    let base = match artist.filter(|a| !a.trim().is_empty()) {
        Some(artist) => sanitize_filename(&format!("{artist} - {title}")),
        None => sanitize_filename(title),
    };
    let base = if base.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        base
    };
    format!("{base}.{}", ext.as_str())
}
