use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use thulli_core::api::{handle_message, handle_message_json, TurnRequest};
use thulli_core::{Agent, AgentBuilder, AgentConfig, JsonFileStorage, StdRandom, TaskIntentResolver, WebSearch};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "thulli", version, about = "Talk to the Thulli companion from the terminal")]
struct Cli {
    /// TOML file overriding the default configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON file holding conversations, memories, behaviors and training.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Seed for reproducible phrase selection.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Disable web search for "search for ..." requests.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive conversation; an empty line or `/quit` exits.
    Chat {
        #[arg(long, default_value = "cosmo")]
        user: String,
        #[arg(long, default_value = "Dear")]
        name: String,
    },
    /// Send one utterance and print the JSON response.
    Say {
        text: String,
        #[arg(long, default_value = "cosmo")]
        user: String,
        #[arg(long, default_value = "Dear")]
        name: String,
    },
    /// Read one JSON request body per line from stdin and answer each.
    Serve,
    /// Print the effective configuration as TOML.
    Config,
}

async fn build_agent(cli: &Cli) -> Result<Agent, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => AgentConfig::from_toml_file(path)?,
        None => AgentConfig::default(),
    };

    let mut builder = AgentBuilder::new(config);

    if let Some(path) = &cli.data {
        builder = builder.storage(Arc::new(JsonFileStorage::open(path).await?));
    }

    if let Some(seed) = cli.seed {
        builder = builder.random(Arc::new(StdRandom::seeded(seed)));
    }

    let tasks = if cli.offline {
        TaskIntentResolver::new()
    } else {
        match WebSearch::new() {
            Ok(search) => TaskIntentResolver::new().with_search(Arc::new(search)),
            Err(e) => {
                tracing::warn!(error = %e, "web search unavailable");
                TaskIntentResolver::new()
            }
        }
    };

    Ok(builder.tasks(Arc::new(tasks)).build()?)
}

async fn chat(agent: &Agent, user: &str, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let identity = &agent.config().identity;
    println!("{} is listening. Send an empty line or /quit to leave.", identity.name);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", name);
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let text = line.trim();
        if text.is_empty() || text == "/quit" {
            break;
        }

        let result = handle_message(agent, TurnRequest::new(text).for_user(user, name)).await;
        println!("{}: {}", identity.name, result.body.reply);
    }

    Ok(())
}

async fn serve(agent: &Agent) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let result = handle_message_json(agent, &line).await;
        println!("{}", result.to_json()?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::Config = cli.command {
        let config = match &cli.config {
            Some(path) => AgentConfig::from_toml_file(path)?,
            None => AgentConfig::default(),
        };
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let agent = build_agent(&cli).await?;

    match &cli.command {
        Command::Chat { user, name } => chat(&agent, user, name).await?,
        Command::Say { text, user, name } => {
            let result = handle_message(&agent, TurnRequest::new(text.as_str()).for_user(user, name)).await;
            println!("{}", result.to_json()?);
        }
        Command::Serve => serve(&agent).await?,
        Command::Config => {}
    }

    Ok(())
}
