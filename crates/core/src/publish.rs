//! The storage collaborator: persists finished decks and returns a location.

use crate::error::PublishError;
use chrono::NaiveDateTime;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Fallback filename stem when a title has no usable characters.
const FALLBACK_STEM: &str = "Untitled_Presentation";

/// How many numbered variants of a taken name are tried before giving up.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Where a published document ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stored {
    /// URL the document can be fetched from.
    pub location: String,
    /// Name it was stored under. Differs from the suggested name when that
    /// one was already taken.
    pub filename: String,
}

/// Stores a rendered document and reports where it can be fetched.
pub trait Publisher {
    /// Store `bytes` under a name derived from `suggested_filename`.
    fn publish(&self, bytes: &[u8], suggested_filename: &str) -> Result<Stored, PublishError>;
}

/// Publishes into a local (or mounted) directory, returning `file://` URLs.
///
/// Existing files are never overwritten: a taken name gets a `_2`, `_3`, ...
/// suffix before the extension. The document is staged in a temporary file
/// next to its target, so a failed write leaves nothing under the final name.
#[derive(Debug, Clone)]
pub struct DirectoryPublisher {
    root: PathBuf,
}

impl DirectoryPublisher {
    /// Publish into `root`, creating it on first use.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Publisher for DirectoryPublisher {
    fn publish(&self, bytes: &[u8], suggested_filename: &str) -> Result<Stored, PublishError> {
        if suggested_filename.is_empty()
            || suggested_filename.contains(['/', '\\'])
            || suggested_filename.starts_with('.')
        {
            return Err(PublishError::Rejected(format!(
                "invalid filename '{}'",
                suggested_filename
            )));
        }

        fs::create_dir_all(&self.root).map_err(|e| map_io(e, &self.root))?;

        let mut staged = NamedTempFile::new_in(&self.root).map_err(|e| map_io(e, &self.root))?;
        staged
            .write_all(bytes)
            .map_err(|e| map_io(e, &self.root))?;
        staged.as_file().sync_all()?;

        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let filename = numbered_filename(suggested_filename, attempt);
            let path = self.root.join(&filename);
            match staged.persist_noclobber(&path) {
                Ok(_) => {
                    let absolute = fs::canonicalize(&path)?;
                    log::info!("Published {} bytes to {}", bytes.len(), absolute.display());
                    return Ok(Stored {
                        location: format!("file://{}", absolute.display()),
                        filename,
                    });
                }
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                    log::debug!("{} is taken, trying the next name", path.display());
                    staged = e.file;
                }
                Err(e) => return Err(map_io(e.error, &path)),
            }
        }

        Err(PublishError::Rejected(format!(
            "{} and {} numbered variants already exist in {}",
            suggested_filename,
            MAX_NAME_ATTEMPTS - 1,
            self.root.display()
        )))
    }
}

/// `deck.pptx`, then `deck_2.pptx`, `deck_3.pptx`, ...
fn numbered_filename(filename: &str, attempt: usize) -> String {
    if attempt <= 1 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, attempt, ext),
        _ => format!("{}_{}", filename, attempt),
    }
}

fn map_io(error: std::io::Error, path: &Path) -> PublishError {
    if error.kind() == ErrorKind::PermissionDenied {
        PublishError::PermissionDenied(path.display().to_string())
    } else {
        PublishError::Io(error)
    }
}

/// Build a storage-safe filename from a deck title and a timestamp.
///
/// Keeps alphanumerics, spaces and underscores, turns spaces into
/// underscores, and appends `_YYYYmmddHHMMSS.pptx`.
pub fn suggested_filename(title: &str, stamp: NaiveDateTime) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect();
    let kept = kept.trim();

    let stem = if kept.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        kept.split_whitespace().collect::<Vec<_>>().join("_")
    };

    format!("{}_{}.pptx", stem, stamp.format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 5)
            .unwrap()
            .and_hms_opt(14, 3, 9)
            .unwrap()
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_suggested_filename() {
        assert_eq!(
            suggested_filename("Q3 Review: Wins & Losses", stamp()),
            "Q3_Review_Wins_Losses_20250905140309.pptx"
        );
        assert_eq!(
            suggested_filename("!!!", stamp()),
            "Untitled_Presentation_20250905140309.pptx"
        );
        assert_eq!(
            suggested_filename("Café roadmap", stamp()),
            "Café_roadmap_20250905140309.pptx"
        );
    }

    #[test]
    fn test_numbered_filename() {
        assert_eq!(numbered_filename("deck.pptx", 1), "deck.pptx");
        assert_eq!(numbered_filename("deck.pptx", 2), "deck_2.pptx");
        assert_eq!(numbered_filename("deck", 3), "deck_3");
    }

    #[test]
    fn test_directory_publisher_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = DirectoryPublisher::new(dir.path().join("decks"));

        let stored = publisher.publish(b"PK\x03\x04data", "deck.pptx").unwrap();

        assert!(stored.location.starts_with("file://"));
        assert!(stored.location.ends_with("deck.pptx"));
        assert_eq!(stored.filename, "deck.pptx");
        let written = fs::read(dir.path().join("decks").join("deck.pptx")).unwrap();
        assert_eq!(written, b"PK\x03\x04data");
        // No staging file left behind
        assert_eq!(entries(&dir.path().join("decks")), vec!["deck.pptx"]);
    }

    #[test]
    fn test_directory_publisher_rejects_bad_names() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = DirectoryPublisher::new(dir.path());

        assert!(matches!(
            publisher.publish(b"x", "../escape.pptx"),
            Err(PublishError::Rejected(_))
        ));
        assert!(matches!(
            publisher.publish(b"x", ""),
            Err(PublishError::Rejected(_))
        ));
    }

    #[test]
    fn test_taken_name_gets_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = DirectoryPublisher::new(dir.path());

        let first = publisher.publish(b"first", "deck.pptx").unwrap();
        let second = publisher.publish(b"second", "deck.pptx").unwrap();
        let third = publisher.publish(b"third", "deck.pptx").unwrap();

        assert_eq!(first.filename, "deck.pptx");
        assert_eq!(second.filename, "deck_2.pptx");
        assert_eq!(third.filename, "deck_3.pptx");
        assert!(second.location.ends_with("deck_2.pptx"));
        assert_eq!(fs::read(dir.path().join("deck.pptx")).unwrap(), b"first");
        assert_eq!(fs::read(dir.path().join("deck_2.pptx")).unwrap(), b"second");
    }

    #[test]
    fn test_failed_publish_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = DirectoryPublisher::new(dir.path());
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            fs::write(dir.path().join(numbered_filename("deck.pptx", attempt)), b"old").unwrap();
        }
        let before = entries(dir.path());

        assert!(matches!(
            publisher.publish(b"new", "deck.pptx"),
            Err(PublishError::Rejected(_))
        ));

        // Nothing overwritten and no partial or staging file left behind
        assert_eq!(entries(dir.path()), before);
        assert_eq!(fs::read(dir.path().join("deck.pptx")).unwrap(), b"old");
    }

    #[test]
    fn test_unwritable_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, b"file").unwrap();
        let publisher = DirectoryPublisher::new(&blocker);

        assert!(publisher.publish(b"x", "deck.pptx").is_err());
        assert_eq!(entries(dir.path()), vec!["not_a_dir"]);
    }
}
