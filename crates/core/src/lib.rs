//! Core domain types, section splitting, outline parsing, and pipeline
//! configuration for content pack generation.

pub mod config;
pub mod error;
pub mod outline;
pub mod sections;
pub mod types;

pub use config::{DecodingMethod, ModelProfile, PipelineConfig, SearchConfig, WatsonxConfig};
pub use error::{Error, Result};
pub use outline::parse_outline;
pub use sections::{split_sections, SectionSplitter};
pub use types::{Deck, Section, SectionMarker, Slide};
