//! Agent personas and the tasks they run.

use contentpack_core::{ModelProfile, PipelineConfig, SectionMarker};

/// Which configured model an agent writes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRole {
    /// Research and core writing.
    Main,
    /// Formatting and editing with a larger token budget.
    Formatter,
}

impl ModelRole {
    pub fn profile<'a>(&self, config: &'a PipelineConfig) -> &'a ModelProfile {
        match self {
            Self::Main => &config.main_model,
            Self::Formatter => &config.formatter_model,
        }
    }
}

/// An LLM persona.
#[derive(Debug, Clone)]
pub struct Agent {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub model: ModelRole,

    /// Whether the agent may call the web search tool.
    pub uses_search: bool,
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        model: ModelRole,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            model,
            uses_search: false,
        }
    }

    pub fn with_search(mut self) -> Self {
        self.uses_search = true;
        self
    }

    /// The system-style preamble describing who the agent is.
    pub fn persona(&self) -> String {
        format!(
            "You are a {}. {}\nYour goal: {}",
            self.role, self.backstory, self.goal
        )
    }
}

/// One step of the pipeline.
#[derive(Debug, Clone)]
pub struct Task {
    pub description: String,
    pub expected_output: String,

    /// Artifact name inside the output directory.
    pub output_file: String,

    /// Index into the crew's agent list.
    pub agent: usize,
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        output_file: impl Into<String>,
        agent: usize,
    ) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
            output_file: output_file.into(),
            agent,
        }
    }
}

/// The four-agent content team and its tasks, in run order.
pub fn content_team(topic: &str) -> (Vec<Agent>, Vec<Task>) {
    let agents = vec![
        Agent::new(
            "Senior AI Researcher",
            format!(
                "Research the topic '{topic}' using the web and extract the most important, \
                 recent, and practical insights."
            ),
            "You are a veteran AI researcher with experience in industry and academia. \
             You care about credible sources, practical relevance, and clear structure.",
            ModelRole::Main,
        )
        .with_search(),
        Agent::new(
            "Content Architect",
            format!(
                "Turn the research about '{topic}' into a clear, structured explanation that \
                 can be reused in multiple formats."
            ),
            "You are excellent at teaching complex technical concepts to mixed audiences. \
             You write in a clear, logical, and engaging way.",
            ModelRole::Main,
        ),
        Agent::new(
            "Multi-format Content Strategist",
            format!(
                "Convert the core narrative about '{topic}' into multiple content formats that \
                 are immediately usable on stage, on LinkedIn, in video, and in business contexts."
            ),
            "You are a content strategist who knows how to repurpose one strong idea into many \
             formats. You understand how speakers, founders, and leaders communicate on \
             different channels.",
            ModelRole::Formatter,
        ),
        Agent::new(
            "Senior Editor",
            "Polish all generated content for clarity, conciseness, and impact while preserving \
             meaning. Make sure everything flows well and feels coherent as one content pack.",
            "You are an experienced editor who has worked on talks, posts, decks, and executive \
             summaries. You eliminate fluff and keep the strongest ideas and phrasing.",
            ModelRole::Formatter,
        ),
    ];

    let headings: Vec<&str> = SectionMarker::ALL.iter().map(|m| m.as_str()).collect();

    let tasks = vec![
        Task::new(
            format!(
                "Use web search to research the topic '{topic}'. \
                 Identify 5-10 key insights, trends, or important points.\n\n\
                 For each insight, include:\n\
                 - A short title\n\
                 - 2-3 sentence explanation\n\
                 - Why it matters in practice\n\
                 If possible, briefly reference where the insight comes from \
                 (e.g., company, paper, or blog)."
            ),
            "A structured set of 5-10 bullet points. Each bullet should include: a title, \
             explanation, and why it matters. This will be used as the factual base.",
            "01_research_notes.txt",
            0,
        ),
        Task::new(
            format!(
                "Using the research notes, write a clear, structured explanation of '{topic}'. \
                 Assume the reader is technical but not an expert in the field.\n\n\
                 Include sections:\n\
                 1. What is the topic and why now?\n\
                 2. Key concepts and frameworks (with simple analogies).\n\
                 3. Where it is used in practice (examples).\n\
                 4. Benefits and limitations.\n\
                 5. How this fits into the bigger AI landscape."
            ),
            "A 800-1200 word narrative that explains the topic clearly and can be reused for \
             speech, posts, and scripts.",
            "02_core_narrative.txt",
            1,
        ),
        Task::new(
            format!(
                "Based on the core narrative, create the following FOUR distinct outputs.\n\n\
                 1) KEYNOTE SPEECH:\n\
                 - Structure: Introduction, 3-4 main sections, Conclusion\n\
                 - Tone: confident, inspiring, story-driven\n\n\
                 2) LINKEDIN POST:\n\
                 - Structure: 2-line hook, 4-6 lines of insight, 1-line takeaway or CTA\n\
                 - Tone: conversational, practical, shareable\n\n\
                 3) YOUTUBE SCRIPT (5-7 min):\n\
                 - Parts: Hook, Setup, Main Content (3 chapters), Recap, Outro/CTA\n\
                 - Include stage directions like [B-ROLL], [ON SCREEN TEXT] sparingly.\n\n\
                 4) SLIDE OUTLINE:\n\
                 - Provide slide titles and 3-5 bullets per slide.\n\
                 - Separate slides with a blank line; start each with 'Slide N: Title'.\n\
                 - Aim for 8-12 slides total.\n\n\
                 Clearly label each section with a heading on its own line:\n{}\n",
                headings.join("\n")
            ),
            "A single combined document containing all four sections, each clearly labeled \
             with the specified headings.",
            "03_multiformat_content_pack_raw.txt",
            2,
        ),
        Task::new(
            "Take the multi-format content pack and polish it for clarity, flow, and impact.\n\n\
             Rules:\n\
             - Keep the four sections and their headings.\n\
             - Improve wording, remove repetition, and tighten long sentences.\n\
             - Ensure the tone is consistent across formats (expert, friendly, clear).\n\
             - Fix any obvious logical inconsistencies or contradictions.",
            "A final, polished content pack with the same four labeled sections, ready for \
             real-world use.",
            "04_multiformat_content_pack_final.txt",
            3,
        ),
    ];

    (agents, tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_is_interpolated() {
        let (agents, tasks) = content_team("edge inference");
        assert!(agents[0].goal.contains("'edge inference'"));
        assert!(tasks[0].description.contains("'edge inference'"));
        assert!(tasks[1].description.contains("'edge inference'"));
    }

    #[test]
    fn test_only_researcher_searches() {
        let (agents, _) = content_team("x");
        let searchers: Vec<&str> = agents
            .iter()
            .filter(|a| a.uses_search)
            .map(|a| a.role.as_str())
            .collect();
        assert_eq!(searchers, vec!["Senior AI Researcher"]);
    }

    #[test]
    fn test_formatter_prompt_lists_every_heading() {
        let (_, tasks) = content_team("x");
        for marker in SectionMarker::ALL {
            assert!(tasks[2].description.contains(marker.as_str()));
        }
    }

    #[test]
    fn test_tasks_point_at_valid_agents() {
        let (agents, tasks) = content_team("x");
        assert_eq!(tasks.len(), 4);
        for task in &tasks {
            assert!(task.agent < agents.len());
        }
    }

    #[test]
    fn test_model_roles_resolve_profiles() {
        let config = PipelineConfig::default();
        assert_eq!(ModelRole::Main.profile(&config).max_new_tokens, 500);
        assert_eq!(ModelRole::Formatter.profile(&config).max_new_tokens, 1500);
    }
}
