use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use thrive_agents::{NutritionAgent, ResearchAgent, SpecialistRegistry, WellnessAgent};
use thrive_core::{ChatMessage, ProgressEvent, ProgressSink};
use thrive_llm::{ModelConfig, OpenAiClient};
use thrive_memory::{
    ContextLibrary, Domain, DomainContext, HashedBagEmbedding, InMemoryProfileStore,
    InMemoryVectorIndex, PubMedSearch,
};
use thrive_orchestrator::{Coach, TurnOutcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod corpus;

#[derive(Parser)]
#[command(name = "thrive", about = "Thrive — supervised wellness & nutrition coach")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "thrive.toml")]
    config: PathBuf,

    /// Print the audit step trace after each answer
    #[arg(long)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question
    Ask {
        /// The question to ask
        question: String,
    },
    /// Interactive chat session
    Chat,
}

#[derive(Deserialize)]
struct ThriveConfig {
    model: ModelConfig,
}

/// Prints one status line per progress event.
struct TerminalSink;

impl ProgressSink for TerminalSink {
    fn emit(&self, event: ProgressEvent) {
        eprintln!("  · {}", event.message());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config_str = tokio::fs::read_to_string(&cli.config).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to read config file '{}': {}",
            cli.config.display(),
            e
        )
    })?;
    let config: ThriveConfig = toml::from_str(&config_str)?;

    let coach = build_coach(config.model).await;

    match cli.command {
        Commands::Ask { question } => {
            let outcome = coach.run_turn(&question, &[], &TerminalSink).await?;
            println!("\n{}", outcome.answer);
            if cli.trace {
                print_trace(&outcome);
            }
        }
        Commands::Chat => {
            println!("Thrive coach ready. Empty line or Ctrl-D to quit.");
            let mut history: Vec<ChatMessage> = Vec::new();
            let stdin = std::io::stdin();
            loop {
                print!("\nyou> ");
                std::io::stdout().flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let question = line.trim();
                if question.is_empty() {
                    break;
                }

                let outcome = coach.run_turn(question, &history, &TerminalSink).await?;
                println!("\ncoach> {}", outcome.answer);
                if cli.trace {
                    print_trace(&outcome);
                }
                history.push(ChatMessage::user(question));
                history.push(ChatMessage::assistant(outcome.answer));
            }
        }
    }

    Ok(())
}

/// Wire the full engine: local embedding index seeded with the demo
/// corpora, live research search over it, the three specialists, and
/// the supervising coach.
async fn build_coach(model: ModelConfig) -> Coach {
    let client = Arc::new(OpenAiClient::new(model));

    let library = Arc::new(ContextLibrary::new(
        Arc::new(HashedBagEmbedding::default()),
        Arc::new(InMemoryVectorIndex::new()),
    ));
    for (namespace, texts) in corpus::SEEDS {
        library.seed(namespace, texts).await;
    }
    info!("Demo corpora seeded");

    let research_fallback = Arc::new(DomainContext::new(Arc::clone(&library), Domain::Research));
    let mut registry = SpecialistRegistry::new();
    registry.register(Arc::new(NutritionAgent::new(
        Arc::clone(&client) as Arc<dyn thrive_llm::ChatClient>,
        Arc::new(DomainContext::new(Arc::clone(&library), Domain::Nutrition)),
    )));
    registry.register(Arc::new(ResearchAgent::new(
        Arc::clone(&client) as Arc<dyn thrive_llm::ChatClient>,
        Arc::new(PubMedSearch::new(research_fallback)),
    )));
    registry.register(Arc::new(WellnessAgent::new(
        Arc::clone(&client) as Arc<dyn thrive_llm::ChatClient>,
        Arc::new(DomainContext::new(Arc::clone(&library), Domain::Wellness)),
    )));

    Coach::new(
        client,
        Arc::new(registry),
        Arc::new(InMemoryProfileStore::new()),
    )
}

fn print_trace(outcome: &TurnOutcome) {
    eprintln!("\n--- step trace ({} steps) ---", outcome.steps.len());
    for (i, step) in outcome.steps.iter().enumerate() {
        let status = if step.response.get("error").is_some() {
            "error"
        } else {
            "ok"
        };
        eprintln!("{:>3}. {} [{}] at {}", i + 1, step.module, status, step.created_at);
    }
}
