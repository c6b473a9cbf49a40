//! The text-generation seam between agents and a model provider.

use crate::error::Result;
use contentpack_core::ModelProfile;

/// Something that turns a prompt into text using a given model profile.
pub trait TextGenerator {
    /// Human-readable provider name for logs.
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`.
    fn generate(&self, profile: &ModelProfile, prompt: &str) -> Result<String>;
}
