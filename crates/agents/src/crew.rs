//! Sequential crew runner.
//!
//! Tasks run strictly in order. Each task's output becomes the context of the
//! next one and is saved as a stage artifact; the last output is the result.

use crate::agent::{content_team, Agent, Task};
use crate::error::Result;
use crate::llm::TextGenerator;
use crate::search::{format_results, SearchTool};
use contentpack_core::PipelineConfig;
use regex::Regex;
use std::sync::LazyLock;

/// Labels models like to put in front of a search query.
static QUERY_LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(web\s+)?(search\s+)?query\s*:\s*").unwrap());

/// Produces the final content pack text for a topic.
pub trait ContentGenerator {
    fn generate(&self, topic: &str) -> Result<String>;
}

/// The content team: four agents run in a fixed order.
pub struct Crew {
    config: PipelineConfig,
    llm: Box<dyn TextGenerator>,
    search: Option<Box<dyn SearchTool>>,
}

impl Crew {
    /// Create a crew without a search tool.
    pub fn new(config: PipelineConfig, llm: Box<dyn TextGenerator>) -> Self {
        Self {
            config,
            llm,
            search: None,
        }
    }

    /// Give search-enabled agents access to a web search tool.
    pub fn with_search(mut self, search: Box<dyn SearchTool>) -> Self {
        self.search = Some(search);
        self
    }

    fn run_task(
        &self,
        topic: &str,
        agent: &Agent,
        task: &Task,
        context: Option<&str>,
    ) -> Result<String> {
        let research = if agent.uses_search {
            self.research(topic)?
        } else {
            None
        };

        let prompt = build_prompt(agent, task, context, research.as_deref());
        let output = self
            .llm
            .generate(agent.model.profile(&self.config), &prompt)?;
        let output = output.trim().to_string();

        let path = self.config.output_path(&task.output_file);
        std::fs::write(&path, &output)?;
        log::debug!("Saved stage output to {}", path.display());

        Ok(output)
    }

    /// Plan a query with the function-calling model and run the search.
    fn research(&self, topic: &str) -> Result<Option<String>> {
        let Some(search) = self.search.as_ref() else {
            log::warn!("No search tool configured; researching without web results");
            return Ok(None);
        };

        let planning_prompt = format!(
            "You are choosing a web search query for research on '{topic}'. \
             Reply with the single best search query and nothing else."
        );
        let planned = self
            .llm
            .generate(&self.config.function_calling_model, &planning_prompt)?;
        let query = clean_query(&planned).unwrap_or_else(|| topic.to_string());

        let results = search.search(&query)?;
        if results.is_empty() {
            log::warn!("Web search for '{}' returned no results", query);
            return Ok(None);
        }

        Ok(Some(format_results(&results)))
    }
}

impl ContentGenerator for Crew {
    fn generate(&self, topic: &str) -> Result<String> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let (agents, tasks) = content_team(topic);
        let mut context: Option<String> = None;

        for (step, task) in tasks.iter().enumerate() {
            let agent = &agents[task.agent];
            log::info!(
                "[{}/{}] {} -> {} (via {})",
                step + 1,
                tasks.len(),
                agent.role,
                task.output_file,
                self.llm.name()
            );
            context = Some(self.run_task(topic, agent, task, context.as_deref())?);
        }

        Ok(context.unwrap_or_default())
    }
}

/// Assemble the full prompt for one task.
fn build_prompt(agent: &Agent, task: &Task, context: Option<&str>, research: Option<&str>) -> String {
    let mut prompt = format!(
        "{}\n\nTask:\n{}\n\nExpected output:\n{}\n",
        agent.persona(),
        task.description.trim(),
        task.expected_output.trim()
    );

    if let Some(context) = context {
        prompt.push_str("\nContext from the previous step:\n");
        prompt.push_str(context);
        prompt.push('\n');
    }

    if let Some(research) = research {
        prompt.push_str("\nWeb search results:\n");
        prompt.push_str(research);
        prompt.push('\n');
    }

    prompt.push_str("\nAnswer:\n");
    prompt
}

/// First non-empty line with labels and surrounding quotes removed.
fn clean_query(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty())?;
    let line = QUERY_LABEL_REGEX.replace(line, "");
    let query = line.trim().trim_matches(|c: char| c == '"' || c == '\'' || c == '`').trim();

    if query.is_empty() {
        None
    } else {
        Some(query.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgentError;
    use crate::search::SearchResult;
    use contentpack_core::ModelProfile;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    type CallLog = Rc<RefCell<Vec<(String, String)>>>;

    /// Returns canned replies in order and records (model, prompt) pairs.
    struct ScriptedGenerator {
        replies: RefCell<VecDeque<String>>,
        calls: CallLog,
    }

    impl ScriptedGenerator {
        fn new(replies: &[&str], calls: CallLog) -> Self {
            Self {
                replies: RefCell::new(replies.iter().map(|r| r.to_string()).collect()),
                calls,
            }
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn name(&self) -> &str {
            "scripted"
        }

        fn generate(&self, profile: &ModelProfile, prompt: &str) -> Result<String> {
            self.calls
                .borrow_mut()
                .push((profile.model_id.clone(), prompt.to_string()));
            self.replies
                .borrow_mut()
                .pop_front()
                .ok_or(AgentError::MalformedResponse {
                    service: "scripted",
                    message: "out of replies".to_string(),
                })
        }
    }

    struct FixedSearch {
        queries: Rc<RefCell<Vec<String>>>,
    }

    impl SearchTool for FixedSearch {
        fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
            self.queries.borrow_mut().push(query.to_string());
            Ok(vec![SearchResult {
                title: "Agents at work".to_string(),
                link: "https://example.com".to_string(),
                snippet: "A survey.".to_string(),
            }])
        }
    }

    fn test_config(dir: &std::path::Path) -> PipelineConfig {
        let mut config = PipelineConfig::default().with_output_dir(dir);
        config.main_model.model_id = "main".to_string();
        config.function_calling_model.model_id = "tools".to_string();
        config.formatter_model.model_id = "formatter".to_string();
        config
    }

    #[test]
    fn test_runs_stages_in_order_and_chains_context() {
        let dir = tempfile::tempdir().unwrap();
        let calls = CallLog::default();
        let llm = ScriptedGenerator::new(
            &["notes", "narrative", "raw pack", "  final pack\n"],
            calls.clone(),
        );

        let crew = Crew::new(test_config(dir.path()), Box::new(llm));
        let result = crew.generate("agentic AI").unwrap();

        assert_eq!(result, "final pack");

        let calls = calls.borrow();
        let models: Vec<&str> = calls.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(models, vec!["main", "main", "formatter", "formatter"]);

        assert!(!calls[0].1.contains("Context from the previous step"));
        assert!(calls[1].1.contains("Context from the previous step:\nnotes"));
        assert!(calls[2].1.contains("Context from the previous step:\nnarrative"));
        assert!(calls[3].1.contains("Context from the previous step:\nraw pack"));
        assert!(calls[0].1.starts_with("You are a Senior AI Researcher."));
    }

    #[test]
    fn test_writes_stage_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let llm = ScriptedGenerator::new(&["a", "b", "c", "d"], CallLog::default());

        Crew::new(test_config(dir.path()), Box::new(llm))
            .generate("topic")
            .unwrap();

        let read = |name: &str| std::fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(read("01_research_notes.txt"), "a");
        assert_eq!(read("02_core_narrative.txt"), "b");
        assert_eq!(read("03_multiformat_content_pack_raw.txt"), "c");
        assert_eq!(read("04_multiformat_content_pack_final.txt"), "d");
    }

    #[test]
    fn test_researcher_plans_query_and_uses_results() {
        let dir = tempfile::tempdir().unwrap();
        let calls = CallLog::default();
        let queries = Rc::new(RefCell::new(Vec::new()));
        let llm = ScriptedGenerator::new(
            &["Query: \"agentic AI adoption 2026\"", "notes", "b", "c", "d"],
            calls.clone(),
        );

        let crew = Crew::new(test_config(dir.path()), Box::new(llm)).with_search(Box::new(
            FixedSearch {
                queries: queries.clone(),
            },
        ));
        crew.generate("agentic AI").unwrap();

        assert_eq!(*queries.borrow(), vec!["agentic AI adoption 2026"]);

        let calls = calls.borrow();
        assert_eq!(calls[0].0, "tools");
        assert!(calls[1].1.contains("Web search results:\n1. Agents at work"));
        assert!(!calls[2].1.contains("Web search results"));
    }

    #[test]
    fn test_llm_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let llm = ScriptedGenerator::new(&["only one"], CallLog::default());

        let err = Crew::new(test_config(dir.path()), Box::new(llm))
            .generate("topic")
            .unwrap_err();
        assert!(matches!(err, AgentError::MalformedResponse { .. }));
    }

    #[test]
    fn test_clean_query() {
        assert_eq!(clean_query("edge AI chips").as_deref(), Some("edge AI chips"));
        assert_eq!(
            clean_query("\n  Search query: 'rust async runtimes'\nextra").as_deref(),
            Some("rust async runtimes")
        );
        assert_eq!(clean_query("QUERY:   \"x\"").as_deref(), Some("x"));
        assert_eq!(clean_query("   \n\"\"").as_deref(), None);
    }
}
