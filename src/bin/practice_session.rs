use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use patient_sim::config::templates;
use patient_sim::utils::markup;
use patient_sim::{OpenAiGenerator, PatientConfig, Session, SessionOptions, TurnOutcome};

/// Interactive patient simulation session in the terminal.
#[derive(Parser)]
#[command(name = "practice-session", version, about)]
struct Args {
    /// Built-in persona to load (emma, david, sarah)
    #[arg(long, default_value = "emma", conflicts_with = "persona")]
    template: String,

    /// Path to a TOML persona file (overrides --template)
    #[arg(long)]
    persona: Option<PathBuf>,

    /// Chat model to generate patient replies with
    #[arg(long, default_value = "gpt-3.5-turbo")]
    model: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    base_url: Option<String>,

    /// Generator timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Strip *stage directions* from displayed replies instead of emphasizing them
    #[arg(long)]
    hide_actions: bool,
}

fn load_config(args: &Args) -> Result<PatientConfig, Box<dyn std::error::Error>> {
    if let Some(path) = &args.persona {
        return Ok(PatientConfig::from_toml_path(path)?);
    }
    templates::by_name(&args.template).ok_or_else(|| {
        format!(
            "unknown template '{}' (available: {})",
            args.template,
            templates::template_names().join(", ")
        )
        .into()
    })
}

fn render(text: &str, hide_actions: bool) -> String {
    if hide_actions {
        markup::strip(text)
    } else {
        markup::emphasize(text)
    }
}

fn print_turn(name: &str, outcome: &TurnOutcome, hide_actions: bool) {
    println!("{}: {}", name, render(&outcome.reply, hide_actions));
    if outcome.fallback {
        println!("  (generator unavailable, fallback reply)");
    }

    let detected = outcome.scores.detected();
    if !detected.is_empty() {
        let labels: Vec<&str> = detected.iter().map(|technique| technique.label()).collect();
        println!("  [techniques: {}]", labels.join(", "));
    }
    println!(
        "  [rapport {:.1}/10  openness {:.1}/10]",
        outcome.state.rapport, outcome.state.openness
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let patient_name = config.name.clone();

    let mut generator = OpenAiGenerator::from_env()?.with_model(&args.model);
    if let Some(base_url) = &args.base_url {
        generator = generator.with_base_url(base_url);
    }

    let mut session = Session::new(Box::new(generator)).with_options(SessionOptions {
        response_timeout: Duration::from_secs(args.timeout),
    });
    session.load(config)?;

    println!("Session with {} started. Type your responses; /end to finish.\n", patient_name);

    let opening = session.start().await?;
    print_turn(&patient_name, &opening, args.hide_actions);

    let stdin = io::stdin();
    loop {
        print!("\nTherapist: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/end" {
            break;
        }

        let outcome = session.submit_therapist_turn(line).await?;
        print_turn(&patient_name, &outcome, args.hide_actions);
    }

    session.end()?;

    let snapshot = session.snapshot();
    println!(
        "\nSession ended after {} utterances. Final rapport {:.1}/10, openness {:.1}/10.",
        snapshot.history.len(),
        snapshot.state.rapport,
        snapshot.state.openness
    );

    Ok(())
}
