//! Content loading for headless runs.
//!
//! Reads a content RON file, or falls back to the built-in content when no
//! path is given.

use std::fs;
use std::path::Path;

use gauntlet_core::content::ContentDatabase;

use crate::error::{HeadlessError, Result};

/// Load and validate content from `path`, or the built-in content for `None`.
///
/// # Errors
///
/// Returns [`HeadlessError::Io`] if the file can't be read, and an
/// [`HeadlessError::Encounter`] wrapping the parse or validation failure.
pub fn load_content(path: Option<&Path>) -> Result<ContentDatabase> {
    let Some(path) = path else {
        tracing::debug!("Using built-in content");
        return Ok(ContentDatabase::builtin());
    };

    let text = fs::read_to_string(path).map_err(|e| HeadlessError::io(path, e))?;
    let content = ContentDatabase::load_validated(&text, &path.display().to_string())?;
    tracing::info!(
        path = %path.display(),
        battles = content.total_battle_count(),
        "Content loaded"
    );
    Ok(content)
}

/// Validate the content at `path` without failing on validation problems.
///
/// Returns the list of problems found, empty when the content is consistent.
///
/// # Errors
///
/// Returns [`HeadlessError::Io`] if the file can't be read and
/// [`HeadlessError::Encounter`] if it is not valid content RON.
pub fn validate_content_file(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| HeadlessError::io(path, e))?;
    let content = ContentDatabase::from_ron_str(&text, &path.display().to_string())?;
    let problems = content.validate();
    for problem in &problems {
        tracing::warn!(path = %path.display(), "{problem}");
    }
    Ok(problems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_core::error::EncounterError;

    #[test]
    fn test_no_path_uses_builtin() {
        let content = load_content(None).unwrap();
        assert_eq!(content.total_battle_count(), 10);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_content(Some(Path::new("/definitely/not/here.ron"))).unwrap_err();
        assert!(matches!(err, HeadlessError::Io { .. }));
    }

    #[test]
    fn test_builtin_written_then_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.ron");
        fs::write(&path, ContentDatabase::builtin().to_ron_string().unwrap()).unwrap();

        let content = load_content(Some(&path)).unwrap();
        assert_eq!(content.total_battle_count(), 10);
        assert!(validate_content_file(&path).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ron");
        fs::write(&path, "(tiers: [").unwrap();

        let err = load_content(Some(&path)).unwrap_err();
        assert!(matches!(
            err,
            HeadlessError::Encounter(EncounterError::ContentParse { .. })
        ));
    }
}
