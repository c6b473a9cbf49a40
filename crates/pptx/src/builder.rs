//! Building a deck from a slide outline file.

use crate::writer::DeckWriter;
use contentpack_core::{parse_outline, Deck, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// What happened when building a deck from an outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckOutcome {
    /// The deck was written.
    Written { path: PathBuf, slide_count: usize },

    /// No outline file exists; nothing was written.
    MissingOutline { path: PathBuf },

    /// The outline had no slide blocks; nothing was written.
    EmptyOutline { path: PathBuf },
}

impl DeckOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

impl fmt::Display for DeckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written { path, .. } => write!(f, "[slides] PPTX generated: {}", path.display()),
            Self::MissingOutline { path } => write!(
                f,
                "[slides] No slide outline file found at {}. Skipping PPTX generation.",
                path.display()
            ),
            Self::EmptyOutline { .. } => {
                write!(f, "[slides] Slide outline is empty, nothing to build.")
            }
        }
    }
}

/// Parse the outline at `outline_path` and write it as a deck to `pptx_path`.
///
/// A missing or empty outline is not an error: the deck step is skipped and
/// any existing file at `pptx_path` is left alone.
pub fn build_deck_from_outline(outline_path: &Path, pptx_path: &Path) -> Result<DeckOutcome> {
    if !outline_path.exists() {
        log::warn!("No slide outline at {}", outline_path.display());
        return Ok(DeckOutcome::MissingOutline {
            path: outline_path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(outline_path)?;
    let deck = Deck::new(parse_outline(&text));

    if deck.is_empty() {
        log::warn!("Slide outline at {} is empty", outline_path.display());
        return Ok(DeckOutcome::EmptyOutline {
            path: outline_path.to_path_buf(),
        });
    }

    DeckWriter::new().write_to_path(&deck, pptx_path)?;
    log::info!("Wrote {} slides to {}", deck.len(), pptx_path.display());

    Ok(DeckOutcome::Written {
        path: pptx_path.to_path_buf(),
        slide_count: deck.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeckReader;

    const OUTLINE: &str = "\
Slide 1: Why agents now
- Models can plan
- Tools are cheap

Slide 2: Benefits
- Fast
• Reliable

Slide 3: Questions
";

    #[test]
    fn test_missing_outline_leaves_deck_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let pptx = dir.path().join("slides.pptx");
        std::fs::write(&pptx, b"previous deck").unwrap();

        let outcome = build_deck_from_outline(&dir.path().join("nope.txt"), &pptx).unwrap();

        assert!(matches!(outcome, DeckOutcome::MissingOutline { .. }));
        assert_eq!(std::fs::read(&pptx).unwrap(), b"previous deck");
    }

    #[test]
    fn test_empty_outline_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let outline = dir.path().join("slide_outline.txt");
        let pptx = dir.path().join("slides.pptx");
        std::fs::write(&outline, "  \n\n\t\n").unwrap();

        let outcome = build_deck_from_outline(&outline, &pptx).unwrap();

        assert!(matches!(outcome, DeckOutcome::EmptyOutline { .. }));
        assert!(!pptx.exists());
    }

    #[test]
    fn test_builds_deck_from_outline() {
        let dir = tempfile::tempdir().unwrap();
        let outline = dir.path().join("slide_outline.txt");
        let pptx = dir.path().join("slides.pptx");
        std::fs::write(&outline, OUTLINE).unwrap();

        let outcome = build_deck_from_outline(&outline, &pptx).unwrap();
        assert_eq!(
            outcome,
            DeckOutcome::Written {
                path: pptx.clone(),
                slide_count: 3
            }
        );

        let deck = DeckReader::new().read_path(&pptx).unwrap();
        let titles: Vec<&str> = deck.slides.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Why agents now", "Benefits", "Questions"]);
        assert_eq!(deck.slides[1].bullets, vec!["Fast", "Reliable"]);
        assert!(deck.slides[2].bullets.is_empty());
    }

    #[test]
    fn test_rebuild_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let outline = dir.path().join("slide_outline.txt");
        let pptx = dir.path().join("slides.pptx");
        std::fs::write(&outline, OUTLINE).unwrap();

        build_deck_from_outline(&outline, &pptx).unwrap();
        let first = std::fs::read(&pptx).unwrap();
        build_deck_from_outline(&outline, &pptx).unwrap();
        let second = std::fs::read(&pptx).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_outcome_messages() {
        let missing = DeckOutcome::MissingOutline {
            path: PathBuf::from("out/slide_outline.txt"),
        };
        assert_eq!(
            missing.to_string(),
            "[slides] No slide outline file found at out/slide_outline.txt. Skipping PPTX generation."
        );
        assert!(!missing.is_written());
    }
}
