//! Splitting a combined content pack into labeled sections.
//!
//! The final pipeline output is one text blob with heading lines such as
//! `[KEYNOTE SPEECH]`. Each heading opens a section that runs until the next
//! heading or the end of the input.

use crate::types::{Section, SectionMarker};

/// Splits text into sections keyed by a fixed set of markers.
pub struct SectionSplitter {
    markers: Vec<SectionMarker>,
}

impl SectionSplitter {
    /// Create a splitter recognizing every known marker.
    pub fn new() -> Self {
        Self {
            markers: SectionMarker::ALL.to_vec(),
        }
    }

    /// Restrict the recognized markers. Output follows this order.
    pub fn with_markers(mut self, markers: &[SectionMarker]) -> Self {
        self.markers = markers.to_vec();
        self
    }

    /// Split `text` into its non-empty sections.
    ///
    /// Lines before the first marker are dropped. A marker that shows up
    /// again keeps appending to the section it opened the first time.
    pub fn split(&self, text: &str) -> Vec<Section> {
        let mut sections: Vec<Section> = self.markers.iter().map(|m| Section::new(*m)).collect();
        let mut current: Option<usize> = None;

        for line in text.lines() {
            if let Some(marker) = SectionMarker::from_line(line) {
                if let Some(idx) = self.markers.iter().position(|m| *m == marker) {
                    current = Some(idx);
                    continue;
                }
            }

            if let Some(idx) = current {
                sections[idx].lines.push(line.to_string());
            }
        }

        sections.retain(|s| !s.is_empty());
        log::debug!("Split content into {} non-empty sections", sections.len());
        sections
    }
}

impl Default for SectionSplitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `text` using the given marker set.
pub fn split_sections(text: &str, markers: &[SectionMarker]) -> Vec<Section> {
    SectionSplitter::new().with_markers(markers).split(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of(sections: &[Section], marker: SectionMarker) -> Vec<&str> {
        sections
            .iter()
            .find(|s| s.marker == marker)
            .map(|s| s.lines.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_no_markers_yields_no_sections() {
        let text = "Just some text\nwith no headings\n\n[NOT A MARKER]\n";
        assert!(SectionSplitter::new().split(text).is_empty());
    }

    #[test]
    fn test_lines_before_first_marker_are_dropped() {
        let text = "preamble\n[LINKEDIN POST]\nHook line";
        let sections = SectionSplitter::new().split(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(lines_of(&sections, SectionMarker::LinkedinPost), vec!["Hook line"]);
    }

    #[test]
    fn test_content_lines_keep_whitespace_and_order() {
        let text = "[KEYNOTE SPEECH]\n  Indented intro\n\nBody\t\n[YOUTUBE SCRIPT]\n[B-ROLL] city\n";
        let sections = SectionSplitter::new().split(text);

        assert_eq!(
            lines_of(&sections, SectionMarker::KeynoteSpeech),
            vec!["  Indented intro", "", "Body\t"]
        );
        assert_eq!(lines_of(&sections, SectionMarker::YoutubeScript), vec!["[B-ROLL] city"]);
    }

    #[test]
    fn test_marker_lines_never_in_content() {
        let text = "[SLIDE OUTLINE]\n  [SLIDE OUTLINE]  \nSlide 1: Intro\n[KEYNOTE SPEECH]\nHello";
        let sections = SectionSplitter::new().split(text);
        for section in &sections {
            for line in &section.lines {
                assert!(SectionMarker::from_line(line).is_none(), "marker leaked: {line}");
            }
        }
    }

    #[test]
    fn test_repeated_marker_appends_to_same_section() {
        let text = "[KEYNOTE SPEECH]\nPart one\n[LINKEDIN POST]\nPost\n[KEYNOTE SPEECH]\nPart two";
        let sections = SectionSplitter::new().split(text);

        assert_eq!(sections.len(), 2);
        assert_eq!(
            lines_of(&sections, SectionMarker::KeynoteSpeech),
            vec!["Part one", "Part two"]
        );
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let text = "[KEYNOTE SPEECH]\n[LINKEDIN POST]\nOnly this one";
        let sections = SectionSplitter::new().split(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].marker, SectionMarker::LinkedinPost);
    }

    #[test]
    fn test_output_follows_marker_order() {
        let text = "[SLIDE OUTLINE]\nS\n[KEYNOTE SPEECH]\nK";
        let markers: Vec<SectionMarker> = SectionSplitter::new()
            .split(text)
            .iter()
            .map(|s| s.marker)
            .collect();
        assert_eq!(markers, vec![SectionMarker::KeynoteSpeech, SectionMarker::SlideOutline]);
    }

    #[test]
    fn test_unrecognized_markers_are_content() {
        let text = "[LINKEDIN POST]\nHook\n[SLIDE OUTLINE]\nSlide 1: Intro";
        let sections = split_sections(text, &[SectionMarker::LinkedinPost]);

        assert_eq!(sections.len(), 1);
        assert_eq!(
            lines_of(&sections, SectionMarker::LinkedinPost),
            vec!["Hook", "[SLIDE OUTLINE]", "Slide 1: Intro"]
        );
    }

    #[test]
    fn test_crlf_input() {
        let text = "[KEYNOTE SPEECH]\r\nHello\r\nWorld\r\n";
        let sections = SectionSplitter::new().split(text);
        assert_eq!(lines_of(&sections, SectionMarker::KeynoteSpeech), vec!["Hello", "World"]);
    }
}
