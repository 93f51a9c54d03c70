//! Core domain types for Tagtune.

pub mod audio;
pub mod format;

pub use audio::{truncate_chars, AudioInfo, SourceTag, MAX_LYRICS_CHARS};
pub use format::AudioExtension;
