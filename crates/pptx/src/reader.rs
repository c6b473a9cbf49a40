//! PPTX deck reader.
//!
//! Reads a deck back into titles and bullets. Used to inspect generated decks;
//! it understands placeholder-based slides and treats every non-title text
//! paragraph as a bullet.

use crate::parts::{PRESENTATION_RELS_PATH, REL_SLIDE};
use contentpack_core::{Deck, Error, Result, Slide};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Reader for PPTX (Office Open XML) decks.
pub struct DeckReader;

impl DeckReader {
    /// Create a new deck reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a deck from a PPTX file on disk.
    pub fn read_path(&self, path: &Path) -> Result<Deck> {
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Read a deck from any seekable PPTX source.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Deck> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut slides = Vec::new();
        for slide_path in self.slide_order(&mut archive)? {
            let content = read_part(&mut archive, &slide_path)?;
            slides.push(parse_slide(&content)?);
        }

        log::debug!("Read {} slides from PPTX", slides.len());
        Ok(Deck::new(slides))
    }

    /// Slide part paths in presentation order.
    fn slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels = read_part(archive, PRESENTATION_RELS_PATH)?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"Relationship" =>
                {
                    let rel_type = attribute(e, b"Type").unwrap_or_default();
                    if rel_type != REL_SLIDE {
                        continue;
                    }

                    let id = attribute(e, b"Id").unwrap_or_default();
                    let target = attribute(e, b"Target").unwrap_or_default();
                    let order = extract_slide_number(&id).or_else(|| extract_slide_number(&target));
                    let full_path = match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("ppt/{}", target),
                    };
                    slides.push((full_path, order));
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }
}

impl Default for DeckReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Text of one shape, split into paragraphs.
#[derive(Debug, Default)]
struct ShapeText {
    is_title: bool,
    paragraphs: Vec<String>,
}

fn parse_slide(xml: &str) -> Result<Slide> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut shapes: Vec<ShapeText> = Vec::new();
    let mut current: Option<ShapeText> = None;
    let mut paragraph: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => current = Some(ShapeText::default()),
                b"ph" => mark_placeholder(e, current.as_mut()),
                b"p" if current.is_some() => paragraph = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if local_name(e.name().as_ref()) == b"ph" {
                    mark_placeholder(e, current.as_mut());
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_text {
                    if let Some(text) = paragraph.as_mut() {
                        text.push_str(&e.unescape().unwrap_or_default());
                    }
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"p" => {
                    if let (Some(text), Some(shape)) = (paragraph.take(), current.as_mut()) {
                        let text = text.trim();
                        if !text.is_empty() {
                            shape.paragraphs.push(text.to_string());
                        }
                    }
                }
                b"sp" => {
                    if let Some(shape) = current.take() {
                        shapes.push(shape);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::PptxParseError(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    let title = shapes
        .iter()
        .find(|s| s.is_title)
        .map(|s| s.paragraphs.join(" "))
        .unwrap_or_default();

    let mut slide = Slide::new(title);
    for shape in shapes.into_iter().filter(|s| !s.is_title) {
        for text in shape.paragraphs {
            slide.add_bullet(text);
        }
    }

    Ok(slide)
}

fn mark_placeholder(e: &BytesStart, shape: Option<&mut ShapeText>) {
    if let Some(shape) = shape {
        let kind = attribute(e, b"type").unwrap_or_default();
        shape.is_title = kind == "title" || kind == "ctrTitle";
    }
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml");
    let start = s.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    s[start..].parse().ok()
}
