use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::scoring::notify::NoopNotifier;
use crate::scoring::{BatchResult, Progress, ScoringRequest};
use crate::state::{build_scorer, build_source, load_store};

#[derive(Parser, Debug)]
#[command(
    name = "candidate-review",
    about = "Serve the candidate review app and run AI scoring from the command line",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score every eligible candidate that has no AI score yet (stop the server first)
    ///
    /// The server and this command both rewrite the whole scores file under
    /// SCORES_DIR, so running them together loses updates.
    Score(ScoreArgs),
    /// Delete all persisted AI scores (stop the server first)
    ///
    /// A running server keeps its scores in memory and writes them back on the
    /// next save, undoing the reset.
    Reset,
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// OpenAI API key; falls back to OPENAI_API_KEY, then an interactive prompt
    #[arg(long)]
    api_key: Option<String>,
    /// Completion model, e.g. gpt-4 for higher quality at higher cost
    #[arg(long)]
    model: Option<String>,
}

pub async fn run(config: Config) -> Result<()> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => crate::serve(config, args).await,
        Command::Score(args) => run_scoring(config, args).await,
        Command::Reset => {
            let mut store = load_store(&config, Arc::new(NoopNotifier));
            store.reset()?;
            println!("AI scores reset");
            Ok(())
        }
    }
}

async fn run_scoring(config: Config, args: ScoreArgs) -> Result<()> {
    let api_key = match args.api_key.or_else(|| config.openai_api_key.clone()) {
        Some(key) => key,
        None => prompt_api_key().await?,
    };
    let model = args.model.unwrap_or_else(|| config.openai_model.clone());
    let request = ScoringRequest::new(api_key).with_model(model);

    let source = build_source(&config)?;
    let scorer = build_scorer(&config, source)?;
    let store = Mutex::new(load_store(&config, Arc::new(NoopNotifier)));

    println!("Starting AI scoring: {}", request.model);
    let on_progress: &mut (dyn FnMut(Progress<'_>) + Send) = &mut |p| {
        println!(
            "{}/{}: {} = {}",
            p.current,
            p.total,
            p.candidate.display_name(),
            p.score
        );
    };
    let result = scorer
        .run(&store, &request, Some(on_progress))
        .await
        .context("Failed")?;

    println!("{}", summary(&result));
    Ok(())
}

async fn prompt_api_key() -> Result<String> {
    tokio::task::spawn_blocking(|| rpassword::prompt_password("Enter OpenAI API key: "))
        .await
        .context("API key prompt was interrupted")?
        .context("Failed to read API key")
}

/// Human-readable end-of-run report.
fn summary(result: &BatchResult) -> String {
    if let Some(message) = &result.message {
        return message.clone();
    }

    let mut out = format!(
        "Complete!\nSuccess: {}\nFailed: {}",
        result.successful, result.failed
    );
    if !result.errors.is_empty() {
        out.push_str("\n\nErrors:");
        for failure in &result.errors {
            out.push_str(&format!("\n{}: {}", failure.name, failure.error));
        }
    }
    out
}
