//! Parsing a loosely structured slide outline into slides.
//!
//! Expected format: one block per slide, blocks separated by blank lines.
//! The first line of a block is `Slide N: Title` or just `Title`; the rest
//! are bullets, optionally prefixed with `-` or `•`.

use crate::types::Slide;

/// Characters stripped from the start of a bullet line.
const BULLET_GLYPHS: &[char] = &['-', '•', ' '];

/// Parse outline text into slides, one per non-empty block.
pub fn parse_outline(text: &str) -> Vec<Slide> {
    let slides: Vec<Slide> = split_blocks(text)
        .iter()
        .filter_map(|block| parse_block(block))
        .collect();

    log::debug!("Parsed {} slides from outline", slides.len());
    slides
}

/// Group lines into blocks separated by lines that are blank after trimming.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn parse_block(block: &[&str]) -> Option<Slide> {
    let mut lines = block.iter().map(|l| l.trim()).filter(|l| !l.is_empty());

    let mut slide = Slide::new(parse_title(lines.next()?));
    for line in lines {
        let bullet = strip_bullet(line);
        if !bullet.is_empty() {
            slide.add_bullet(bullet);
        }
    }

    Some(slide)
}

/// `Slide 2: Benefits` -> `Benefits`; lines without a colon are kept whole.
fn parse_title(line: &str) -> String {
    match line.split_once(':') {
        Some((_, rest)) => rest.trim().to_string(),
        None => line.to_string(),
    }
}

fn strip_bullet(line: &str) -> String {
    line.trim_start_matches(BULLET_GLYPHS).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_only_block() {
        let slides = parse_outline("Closing Thoughts\n");
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "Closing Thoughts");
        assert!(slides[0].bullets.is_empty());
    }

    #[test]
    fn test_slide_prefix_is_stripped() {
        assert_eq!(parse_title("Slide 2: Benefits"), "Benefits");
        assert_eq!(parse_title("Benefits"), "Benefits");
    }

    #[test]
    fn test_title_splits_on_first_colon_only() {
        assert_eq!(parse_title("Slide 3: Agents: a primer"), "Agents: a primer");
    }

    #[test]
    fn test_bullet_glyphs_are_stripped() {
        assert_eq!(strip_bullet("- Fast"), "Fast");
        assert_eq!(strip_bullet("• Cheap"), "Cheap");
        assert_eq!(strip_bullet("- • -  Nested"), "Nested");
        assert_eq!(strip_bullet("No glyph"), "No glyph");
        assert_eq!(strip_bullet("Well-known"), "Well-known");
    }

    #[test]
    fn test_glyph_only_bullets_are_dropped() {
        let slides = parse_outline("Slide 1: Intro\n- \n•\n- Real point");
        assert_eq!(slides[0].bullets, vec!["Real point"]);
    }

    #[test]
    fn test_blocks_split_on_blank_lines() {
        let outline = "\
Slide 1: Why now
- Costs are falling
- Tooling matured

   \t
Slide 2: Benefits
- Fast
• Reliable


Slide 3: Wrap-up";
        let slides = parse_outline(outline);

        assert_eq!(slides.len(), 3);
        assert_eq!(slides[0].title, "Why now");
        assert_eq!(slides[0].bullets, vec!["Costs are falling", "Tooling matured"]);
        assert_eq!(slides[1].title, "Benefits");
        assert_eq!(slides[1].bullets, vec!["Fast", "Reliable"]);
        assert_eq!(slides[2].title, "Wrap-up");
        assert!(slides[2].bullets.is_empty());
    }

    #[test]
    fn test_empty_outline() {
        assert!(parse_outline("").is_empty());
        assert!(parse_outline("\n   \n\t\n").is_empty());
    }

    #[test]
    fn test_indented_lines_are_trimmed() {
        let slides = parse_outline("   Slide 1:   Overview  \n    - Point one  ");
        assert_eq!(slides[0].title, "Overview");
        assert_eq!(slides[0].bullets, vec!["Point one"]);
    }
}
