use crate::catalog;
use crate::model::{ProviderKind, RunConfig};
use crate::orchestrator;
use crate::provider::{self, RecommendationProvider};
use crate::wizard::{Action, WizardState};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "mood-food",
    version,
    about = "Food recommendations matched to your mood, with an optional TUI wizard"
)]
pub struct Cli {
    /// Recommendation provider
    #[arg(long, value_enum, env = "MOOD_FOOD_PROVIDER", default_value_t = ProviderKind::Gemini)]
    pub provider: ProviderKind,

    /// API key for the Gemini provider
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name used by the provider
    #[arg(long, env = "MOOD_FOOD_MODEL", default_value = "gemini-2.5-flash")]
    pub model: String,

    /// Base URL for the Gemini API
    #[arg(long, env = "MOOD_FOOD_BASE_URL", default_value = "https://generativelanguage.googleapis.com")]
    pub base_url: String,

    /// Request timeout for one recommendation call
    #[arg(long, default_value = "30s")]
    pub timeout: humantime::Duration,

    /// Mood to select (e.g. Happy, Stressed)
    #[arg(long)]
    pub mood: Option<String>,

    /// Meal type to select (e.g. Breakfast, Dinner)
    #[arg(long)]
    pub meal: Option<String>,

    /// Cuisine preference; repeat to select several
    #[arg(long = "cuisine")]
    pub cuisines: Vec<String>,

    /// Print JSON result and exit (no TUI)
    #[arg(long, conflicts_with = "text")]
    pub json: bool,

    /// Print text summary and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// List the available moods, meal types and cuisines and exit
    #[arg(long)]
    pub list: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log file for the TUI (defaults to the user cache directory)
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,
}

pub async fn run(args: Cli) -> Result<()> {
    if args.list {
        print_catalogs();
        return Ok(());
    }

    if !args.json && !args.text {
        #[cfg(feature = "tui")]
        {
            init_tui_logging(&args);
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            crate::telemetry::init_stderr(&args.log_level);
            return run_text(args).await;
        }
    }

    crate::telemetry::init_stderr(&args.log_level);
    if args.json {
        return run_json(args).await;
    }

    run_text(args).await
}

#[cfg(feature = "tui")]
fn init_tui_logging(args: &Cli) {
    let path = args
        .log_file
        .clone()
        .or_else(crate::telemetry::default_log_file);
    if let Some(path) = path {
        // Logging is best-effort in the TUI; the session runs without it.
        let _ = crate::telemetry::init_file(&args.log_level, &path);
    }
}

fn print_catalogs() {
    println!("Moods:");
    for m in catalog::moods() {
        println!("  {} {}", m.emoji, m.name);
    }
    println!("Meal types:");
    for m in catalog::meal_types() {
        println!("  {} {}", m.emoji.as_deref().unwrap_or(" "), m.name);
    }
    println!("Cuisines:");
    for c in catalog::cuisines() {
        println!("  {}", c.name);
    }
}

/// Build a `RunConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> RunConfig {
    RunConfig {
        provider: args.provider,
        base_url: args.base_url.clone(),
        model: args.model.clone(),
        api_key: args.api_key.clone(),
        timeout: Duration::from(args.timeout),
        user_agent: format!("mood-food/{}", env!("CARGO_PKG_VERSION")),
    }
}

/// Translate `--mood`, `--meal` and `--cuisine` into wizard actions.
///
/// Unknown names are an error; cuisines are deduplicated so a repeated flag
/// does not toggle the cuisine back off.
pub fn selection_actions(args: &Cli) -> Result<Vec<Action>> {
    let mut actions = Vec::new();
    if let Some(name) = args.mood.as_deref() {
        let mood = catalog::find_mood(name)
            .ok_or_else(|| anyhow!("unknown mood {name:?} (see --list)"))?;
        actions.push(Action::SelectMood(mood));
    }
    if let Some(name) = args.meal.as_deref() {
        let meal = catalog::find_meal_type(name)
            .ok_or_else(|| anyhow!("unknown meal type {name:?} (see --list)"))?;
        actions.push(Action::SelectMealType(meal));
    }
    let mut seen: Vec<String> = Vec::new();
    for name in &args.cuisines {
        let cuisine = catalog::find_cuisine(name)
            .ok_or_else(|| anyhow!("unknown cuisine {name:?} (see --list)"))?;
        if !seen.contains(&cuisine) {
            seen.push(cuisine.clone());
            actions.push(Action::ToggleCuisine(cuisine));
        }
    }
    Ok(actions)
}

/// Run the wizard once from flags and return the provider used with the final state.
async fn run_one_shot(args: &Cli) -> Result<(std::sync::Arc<dyn RecommendationProvider>, WizardState)> {
    let cfg = build_config(args);
    let provider = provider::create_provider(&cfg).context("provider setup failed")?;
    let mut actions = selection_actions(args)?;
    actions.push(Action::Submit);
    let state = orchestrator::run_once(provider.as_ref(), actions).await;
    Ok((provider, state))
}

async fn run_json(args: Cli) -> Result<()> {
    let (provider, state) = run_one_shot(&args).await?;
    if let Some(err) = state.error() {
        return Err(anyhow!("{err}"));
    }
    let result = orchestrator::build_run_result(provider.as_ref(), &state)
        .context("run finished without recommendations")?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn run_text(args: Cli) -> Result<()> {
    let (out_tx, out_handle) = spawn_output_writer();
    let _ = out_tx.send(OutputLine::Stderr("Finding food to match your mood…".into()));

    let outcome = run_one_shot(&args)
        .await
        .and_then(|(_, state)| crate::text_summary::build_text_summary(&state));

    if let Ok(summary) = &outcome {
        for line in &summary.lines {
            let _ = out_tx.send(OutputLine::Stdout(line.clone()));
        }
    }
    drop(out_tx);
    let _ = out_handle.await;
    outcome.map(|_| ())
}
