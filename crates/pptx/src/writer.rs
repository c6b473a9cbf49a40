//! PPTX deck writer.

use crate::parts::*;
use contentpack_core::{Deck, Error, Result, Slide};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// First slide id; PowerPoint reserves lower values.
const FIRST_SLIDE_ID: usize = 256;

/// Relationship ids 1 and 2 of the presentation part go to the master and theme.
const FIRST_SLIDE_REL: usize = 3;

/// Writes decks as "Title and Content" slides in a PPTX package.
///
/// Output is reproducible: parts are written in a fixed order, every ZIP
/// entry carries the same timestamp and no document property holds a date.
pub struct DeckWriter;

impl DeckWriter {
    /// Create a new deck writer.
    pub fn new() -> Self {
        Self
    }

    /// Write a deck as a PPTX package into `writer`.
    pub fn write<W: Write + Seek>(&self, deck: &Deck, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut add_part = |name: &str, data: &[u8]| -> Result<()> {
            zip.start_file(name, options)
                .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
            zip.write_all(data)
                .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", name, e)))
        };

        add_part("[Content_Types].xml", &content_types_xml(deck.len())?)?;
        add_part("_rels/.rels", ROOT_RELS.as_bytes())?;
        add_part(APP_PROPS_PATH, APP_PROPS.as_bytes())?;
        add_part(PRESENTATION_PATH, &presentation_xml(deck.len())?)?;
        add_part(PRESENTATION_RELS_PATH, &presentation_rels_xml(deck.len())?)?;
        add_part(SLIDE_MASTER_PATH, SLIDE_MASTER.as_bytes())?;
        add_part(SLIDE_MASTER_RELS_PATH, SLIDE_MASTER_RELS.as_bytes())?;
        add_part(SLIDE_LAYOUT_PATH, SLIDE_LAYOUT.as_bytes())?;
        add_part(SLIDE_LAYOUT_RELS_PATH, SLIDE_LAYOUT_RELS.as_bytes())?;
        add_part(THEME_PATH, THEME.as_bytes())?;

        for (idx, slide) in deck.slides.iter().enumerate() {
            let number = idx + 1;
            add_part(&format!("ppt/slides/slide{}.xml", number), &slide_xml(slide)?)?;
            add_part(
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                SLIDE_RELS.as_bytes(),
            )?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;

        log::debug!("Wrote PPTX package with {} slides", deck.len());
        Ok(())
    }

    /// Render a deck to an in-memory PPTX package.
    pub fn to_bytes(&self, deck: &Deck) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write(deck, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Write a deck to `path`, replacing any existing file.
    ///
    /// The package is written to a temporary file in the destination
    /// directory and renamed into place, so readers never see a partial deck.
    pub fn write_to_path(&self, deck: &Deck, path: &Path) -> Result<()> {
        let bytes = self.to_bytes(deck)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| Error::IoError(e.error))?;

        Ok(())
    }
}

impl Default for DeckWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Thin event-writing wrapper so part builders read top-down.
struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_error)?;
        Ok(Self { writer })
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(start)).map_err(xml_error)
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(start)).map_err(xml_error)
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn xml_error(e: impl std::fmt::Display) -> Error {
    Error::XmlError(e.to_string())
}

fn content_types_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.open("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty("Default", &[("Extension", "rels"), ("ContentType", CT_RELS)])?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", CT_XML)])?;

    let fixed = [
        (PRESENTATION_PATH, CT_PRESENTATION),
        (SLIDE_MASTER_PATH, CT_SLIDE_MASTER),
        (SLIDE_LAYOUT_PATH, CT_SLIDE_LAYOUT),
        (THEME_PATH, CT_THEME),
        (APP_PROPS_PATH, CT_EXTENDED_PROPERTIES),
    ];
    for (path, content_type) in fixed {
        let part_name = format!("/{}", path);
        xml.empty(
            "Override",
            &[("PartName", part_name.as_str()), ("ContentType", content_type)],
        )?;
    }

    for number in 1..=slide_count {
        let part_name = format!("/ppt/slides/slide{}.xml", number);
        xml.empty(
            "Override",
            &[("PartName", part_name.as_str()), ("ContentType", CT_SLIDE)],
        )?;
    }

    xml.close("Types")?;
    Ok(xml.finish())
}

fn presentation_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.open(
        "p:presentation",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("saveSubsetFonts", "1"),
        ],
    )?;

    xml.open("p:sldMasterIdLst", &[])?;
    xml.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
    xml.close("p:sldMasterIdLst")?;

    if slide_count > 0 {
        xml.open("p:sldIdLst", &[])?;
        for idx in 0..slide_count {
            let id = (FIRST_SLIDE_ID + idx).to_string();
            let rel_id = format!("rId{}", FIRST_SLIDE_REL + idx);
            xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel_id.as_str())])?;
        }
        xml.close("p:sldIdLst")?;
    }

    let width = SLIDE_WIDTH.to_string();
    let height = SLIDE_HEIGHT.to_string();
    xml.empty(
        "p:sldSz",
        &[("cx", width.as_str()), ("cy", height.as_str()), ("type", "screen4x3")],
    )?;
    xml.empty("p:notesSz", &[("cx", height.as_str()), ("cy", width.as_str())])?;

    xml.close("p:presentation")?;
    Ok(xml.finish())
}

fn presentation_rels_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.open("Relationships", &[("xmlns", NS_RELS)])?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", REL_SLIDE_MASTER),
            ("Target", "slideMasters/slideMaster1.xml"),
        ],
    )?;
    xml.empty(
        "Relationship",
        &[("Id", "rId2"), ("Type", REL_THEME), ("Target", "theme/theme1.xml")],
    )?;

    for idx in 0..slide_count {
        let rel_id = format!("rId{}", FIRST_SLIDE_REL + idx);
        let target = format!("slides/slide{}.xml", idx + 1);
        xml.empty(
            "Relationship",
            &[
                ("Id", rel_id.as_str()),
                ("Type", REL_SLIDE),
                ("Target", target.as_str()),
            ],
        )?;
    }

    xml.close("Relationships")?;
    Ok(xml.finish())
}

fn slide_xml(slide: &Slide) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.open("p:sld", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
    xml.open("p:cSld", &[])?;
    xml.open("p:spTree", &[])?;

    xml.open("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.close("p:nvGrpSpPr")?;
    xml.empty("p:grpSpPr", &[])?;

    let title: Vec<&str> = if slide.title.is_empty() {
        Vec::new()
    } else {
        vec![slide.title.as_str()]
    };
    let bullets: Vec<&str> = slide.bullets.iter().map(String::as_str).collect();

    placeholder(&mut xml, "2", "Title 1", &[("type", "title")], &title)?;
    placeholder(&mut xml, "3", "Content Placeholder 2", &[("idx", "1")], &bullets)?;

    xml.close("p:spTree")?;
    xml.close("p:cSld")?;
    xml.open("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.close("p:clrMapOvr")?;
    xml.close("p:sld")?;
    Ok(xml.finish())
}

/// A layout placeholder shape with one paragraph per entry in `paragraphs`.
fn placeholder(
    xml: &mut XmlPart,
    id: &str,
    name: &str,
    ph: &[(&str, &str)],
    paragraphs: &[&str],
) -> Result<()> {
    xml.open("p:sp", &[])?;

    xml.open("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", id), ("name", name)])?;
    xml.open("p:cNvSpPr", &[])?;
    xml.empty("a:spLocks", &[("noGrp", "1")])?;
    xml.close("p:cNvSpPr")?;
    xml.open("p:nvPr", &[])?;
    xml.empty("p:ph", ph)?;
    xml.close("p:nvPr")?;
    xml.close("p:nvSpPr")?;

    xml.empty("p:spPr", &[])?;

    xml.open("p:txBody", &[])?;
    xml.empty("a:bodyPr", &[])?;
    xml.empty("a:lstStyle", &[])?;
    if paragraphs.is_empty() {
        // A text body needs at least one paragraph.
        xml.open("a:p", &[])?;
        xml.empty("a:endParaRPr", &[("lang", "en-US")])?;
        xml.close("a:p")?;
    }
    for text in paragraphs {
        xml.open("a:p", &[])?;
        xml.open("a:r", &[])?;
        xml.empty("a:rPr", &[("lang", "en-US"), ("dirty", "0")])?;
        xml.open("a:t", &[])?;
        xml.text(text)?;
        xml.close("a:t")?;
        xml.close("a:r")?;
        xml.close("a:p")?;
    }
    xml.close("p:txBody")?;

    xml.close("p:sp")
}
