//! The upstream content pipeline: LLM-backed agents run in a fixed order to
//! research a topic and repurpose it into a multi-format content pack.
//!
//! The pipeline sits behind [`ContentGenerator`]; callers only see
//! "topic in, final text out".

pub mod agent;
pub mod crew;
pub mod error;
pub mod llm;
pub mod search;
pub mod watsonx;

pub use agent::{Agent, ModelRole, Task};
pub use crew::{ContentGenerator, Crew};
pub use error::{AgentError, Result};
pub use llm::TextGenerator;
pub use search::{SearchResult, SearchTool, SerperSearch};
pub use watsonx::WatsonxClient;
