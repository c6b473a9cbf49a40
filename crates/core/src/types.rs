//! Domain types for labeled content sections and slide decks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recognized section heading in the final content pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionMarker {
    KeynoteSpeech,
    LinkedinPost,
    YoutubeScript,
    SlideOutline,
}

impl SectionMarker {
    /// Every marker, in output order.
    pub const ALL: [SectionMarker; 4] = [
        Self::KeynoteSpeech,
        Self::LinkedinPost,
        Self::YoutubeScript,
        Self::SlideOutline,
    ];

    /// The literal heading line for this marker.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeynoteSpeech => "[KEYNOTE SPEECH]",
            Self::LinkedinPost => "[LINKEDIN POST]",
            Self::YoutubeScript => "[YOUTUBE SCRIPT]",
            Self::SlideOutline => "[SLIDE OUTLINE]",
        }
    }

    /// Match a line against the marker set.
    ///
    /// Surrounding whitespace is ignored; everything else must match exactly,
    /// so `[keynote speech]` or `[B-ROLL]` are not markers.
    pub fn from_line(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        Self::ALL.into_iter().find(|m| m.as_str() == trimmed)
    }

    /// Output filename for this section, e.g. `keynote_speech.txt`.
    pub fn file_name(&self) -> String {
        let label = self.as_str().trim_matches(|c| c == '[' || c == ']');
        format!("{}.txt", label.to_lowercase().replace(' ', "_"))
    }
}

impl fmt::Display for SectionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lines collected under one marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub marker: SectionMarker,

    /// Content lines exactly as they appeared in the input.
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(marker: SectionMarker) -> Self {
        Self {
            marker,
            lines: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines rejoined with newlines, trimmed at both ends.
    pub fn content(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

/// A single slide: a title and its bullets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    pub bullets: Vec<String>,
}

impl Slide {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            bullets: Vec::new(),
        }
    }

    /// Add a bullet to this slide.
    pub fn add_bullet(&mut self, text: impl Into<String>) {
        self.bullets.push(text.into());
    }
}

/// An ordered collection of slides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides }
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }
}
