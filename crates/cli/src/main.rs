//! CLI that researches a topic with an LLM agent team, splits the resulting
//! content pack into per-format files, and builds a slide deck.

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use contentpack_agents::{ContentGenerator, Crew, SerperSearch, WatsonxClient};
use contentpack_core::{PipelineConfig, SectionMarker, SectionSplitter};
use contentpack_pptx::{build_deck_from_outline, DeckReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DECK_FILE: &str = "slides.pptx";

/// Generate a multi-format content pack (speech, post, script, slides) for a topic.
#[derive(Parser, Debug)]
#[command(name = "contentpack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory for all generated files (default: content_output)
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline: research, write, split, build slides
    Run(RunArgs),

    /// Split an existing content pack file into per-section files
    Split {
        /// Combined content pack text file
        input: PathBuf,
    },

    /// Build the slide deck from a slide outline file
    Deck {
        /// Outline file (default: <output-dir>/slide_outline.txt)
        #[arg(long)]
        outline: Option<PathBuf>,

        /// Deck path (default: <output-dir>/slides.pptx)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the titles and bullets of a generated deck
    Inspect {
        /// A .pptx file
        deck: PathBuf,
    },
}

#[derive(ClapArgs, Debug)]
struct RunArgs {
    /// Topic to generate content for (prompted for when omitted)
    #[arg(short, long)]
    topic: Option<String>,

    /// watsonx.ai API key
    #[arg(long, env = "WATSONX_APIKEY", hide_env_values = true)]
    watsonx_apikey: Option<String>,

    /// watsonx.ai project id
    #[arg(long, env = "WATSONX_PROJECT_ID")]
    project_id: Option<String>,

    /// watsonx.ai endpoint
    #[arg(long, env = "WATSONX_URL")]
    watsonx_url: Option<String>,

    /// Serper API key for web search
    #[arg(long, env = "SERPER_API_KEY", hide_env_values = true)]
    serper_api_key: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = load_config(&cli)?;

    match &cli.command {
        Command::Run(args) => run_pipeline(config, args, cli.verbose),
        Command::Split { input } => {
            let text = std::fs::read_to_string(input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            save_sections(&text, &config.output_dir)?;
            Ok(())
        }
        Command::Deck { outline, output } => {
            let outline = outline
                .clone()
                .unwrap_or_else(|| config.output_path(&SectionMarker::SlideOutline.file_name()));
            let output = output.clone().unwrap_or_else(|| config.output_path(DECK_FILE));
            build_deck(&outline, &output)
        }
        Command::Inspect { deck } => inspect_deck(deck),
    }
}

/// Load the config file (if any) and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }

    if let Command::Run(args) = &cli.command {
        if let Some(key) = &args.watsonx_apikey {
            config.watsonx.api_key = Some(key.clone());
        }
        if let Some(project) = &args.project_id {
            config.watsonx.project_id = project.clone();
        }
        if let Some(url) = &args.watsonx_url {
            config.watsonx.url = url.clone();
        }
        if let Some(key) = &args.serper_api_key {
            config.search.api_key = Some(key.clone());
        }
    }

    log::debug!("Using configuration: {:?}", config);
    Ok(config)
}

fn run_pipeline(config: PipelineConfig, args: &RunArgs, verbose: bool) -> Result<()> {
    let raw_topic = match &args.topic {
        Some(topic) => topic.clone(),
        None => prompt_topic()?,
    };
    let topic = validate_topic(&raw_topic)?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let llm = WatsonxClient::new(config.watsonx.clone(), timeout)
        .context("Failed to set up the watsonx.ai client")?;

    let mut crew = Crew::new(config.clone(), Box::new(llm));
    match SerperSearch::new(&config.search, timeout) {
        Ok(search) => crew = crew.with_search(Box::new(search)),
        Err(e) => log::warn!("Web search disabled: {}", e),
    }

    if verbose {
        eprintln!("Generating content for: {}", topic);
    }

    let final_result = crew
        .generate(&topic)
        .context("Content pipeline failed")?;

    println!("\n========== FINAL RESULT ==========\n");
    println!("{}", final_result);

    save_sections(&final_result, &config.output_dir)?;

    build_deck(
        &config.output_path(&SectionMarker::SlideOutline.file_name()),
        &config.output_path(DECK_FILE),
    )
}

fn prompt_topic() -> Result<String> {
    let topic: String = dialoguer::Input::new()
        .with_prompt("Enter the topic you want to generate content for")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read topic")?;
    Ok(topic)
}

/// Trim the topic and reject it when nothing is left.
fn validate_topic(raw: &str) -> std::result::Result<String, contentpack_core::Error> {
    let topic = raw.trim();
    if topic.is_empty() {
        return Err(contentpack_core::Error::EmptyTopic);
    }
    Ok(topic.to_string())
}

/// Write each non-empty section of `text` to its own file in `output_dir`.
fn save_sections(text: &str, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let mut written = Vec::new();
    for section in SectionSplitter::new().split(text) {
        let filename = section.marker.file_name();
        let path = output_dir.join(&filename);
        std::fs::write(&path, section.content())
            .with_context(|| format!("Failed to write to {}", path.display()))?;
        println!("Saved {} to {}", section.marker, filename);
        written.push(path);
    }

    if written.is_empty() {
        log::warn!("No labeled sections found in the content pack");
    }

    Ok(written)
}

fn build_deck(outline: &Path, output: &Path) -> Result<()> {
    let outcome = build_deck_from_outline(outline, output)
        .with_context(|| format!("Failed to build {}", output.display()))?;
    println!("{}", outcome);
    Ok(())
}

fn inspect_deck(path: &Path) -> Result<()> {
    let deck = DeckReader::new()
        .read_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    for (idx, slide) in deck.slides.iter().enumerate() {
        println!("Slide {}: {}", idx + 1, slide.title);
        for bullet in &slide.bullets {
            println!("  - {}", bullet);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_topic() {
        assert_eq!(validate_topic("  agentic AI \n").unwrap(), "agentic AI");
        assert!(matches!(
            validate_topic(" \t\n"),
            Err(contentpack_core::Error::EmptyTopic)
        ));
    }

    #[test]
    fn test_save_sections_writes_one_file_per_section() {
        let dir = tempfile::tempdir().unwrap();
        let text = "\
Here is your content pack.
[KEYNOTE SPEECH]

Good morning, everyone.

[SLIDE OUTLINE]
Slide 1: Intro
- Why now
[YOUTUBE SCRIPT]
";
        let written = save_sections(text, dir.path()).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("keynote_speech.txt")).unwrap(),
            "Good morning, everyone."
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("slide_outline.txt")).unwrap(),
            "Slide 1: Intro\n- Why now"
        );
        assert!(!dir.path().join("youtube_script.txt").exists());
        assert!(!dir.path().join("linkedin_post.txt").exists());
    }

    #[test]
    fn test_split_then_deck() {
        let dir = tempfile::tempdir().unwrap();
        let text = "[SLIDE OUTLINE]\nSlide 1: Intro\n- Why now\n\nSlide 2: Benefits\n- Fast\n";
        save_sections(text, dir.path()).unwrap();

        let outline = dir.path().join("slide_outline.txt");
        let deck_path = dir.path().join(DECK_FILE);
        build_deck(&outline, &deck_path).unwrap();

        let deck = DeckReader::new().read_path(&deck_path).unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.slides[1].title, "Benefits");
        assert_eq!(deck.slides[1].bullets, vec!["Fast"]);
    }

    #[test]
    fn test_cli_parses_run_with_topic() {
        let cli = Cli::try_parse_from([
            "contentpack",
            "--output-dir",
            "out",
            "run",
            "--topic",
            "edge AI",
        ])
        .unwrap();

        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        match cli.command {
            Command::Run(args) => assert_eq!(args.topic.as_deref(), Some("edge AI")),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
