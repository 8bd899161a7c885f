//! Upload classification and on-disk layout.
//!
//! Uploaded media lands under `{root}/{yyyy}/{mm}/{uuid}.{ext}` so a single
//! directory never grows without bound.

use chrono::Datelike;
use serde::Serialize;
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::Timestamp;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "ogg", "m4a", "aac"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

/// Broad category of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

/// Lower-cased extension of `filename`, if it has one.
pub fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Classify an extension, rejecting anything outside the allow-lists.
pub fn classify(ext: &str) -> Result<MediaKind, CoreError> {
    if IMAGE_EXTENSIONS.contains(&ext) {
        Ok(MediaKind::Image)
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        Ok(MediaKind::Audio)
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        Ok(MediaKind::Video)
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported file type '.{ext}'"
        )))
    }
}

/// Check the payload size against the configured ceiling.
pub fn validate_size(size: usize, max_bytes: usize) -> Result<(), CoreError> {
    if size == 0 {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if size > max_bytes {
        return Err(CoreError::Validation(format!(
            "File is {size} bytes, the limit is {max_bytes} bytes"
        )));
    }
    Ok(())
}

/// Relative storage path `yyyy/mm/{id}.{ext}` for a file uploaded at `now`.
pub fn dated_path(now: Timestamp, id: Uuid, ext: &str) -> String {
    format!("{:04}/{:02}/{id}.{ext}", now.year(), now.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_of("Cover.PNG").as_deref(), Some("png"));
        assert_eq!(extension_of("track.final.mp3").as_deref(), Some("mp3"));
    }

    #[test]
    fn missing_extension_is_none() {
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".hidden"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn classify_known_types() {
        assert_eq!(classify("jpg").unwrap(), MediaKind::Image);
        assert_eq!(classify("flac").unwrap(), MediaKind::Audio);
        assert_eq!(classify("mov").unwrap(), MediaKind::Video);
        assert!(classify("exe").is_err());
    }

    #[test]
    fn size_limits() {
        assert!(validate_size(0, 10).is_err());
        assert!(validate_size(10, 10).is_ok());
        assert!(validate_size(11, 10).is_err());
    }

    #[test]
    fn dated_path_is_zero_padded() {
        let now = Utc.with_ymd_and_hms(2026, 2, 3, 4, 5, 6).unwrap();
        let id = Uuid::nil();
        assert_eq!(
            dated_path(now, id, "mp3"),
            "2026/02/00000000-0000-0000-0000-000000000000.mp3"
        );
    }
}
