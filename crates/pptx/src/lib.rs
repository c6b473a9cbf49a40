//! PPTX (Office Open XML) backend for slide decks.
//!
//! Writes outlines as `.pptx` packages (ZIP archives of XML parts) and reads
//! generated decks back for inspection.

pub mod builder;
mod parts;
pub mod reader;
pub mod writer;

pub use builder::{build_deck_from_outline, DeckOutcome};
pub use reader::DeckReader;
pub use writer::DeckWriter;
