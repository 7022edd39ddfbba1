use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use triage_agents::TriageAgent;
use triage_core::{KeywordSets, ResolveParams, ResponseBank};
use triage_ml::ClassifierAdapter;
use triage_observability::{init_tracing, AppMetrics};

#[derive(Debug, Parser)]
#[command(name = "triage")]
#[command(about = "Support intent triage CLI")]
struct Cli {
    #[arg(long, default_value = "artifacts", env = "TRIAGE_ARTIFACTS_DIR")]
    artifacts_dir: PathBuf,

    #[arg(long, env = "TRIAGE_MIN_CONFIDENCE")]
    min_conf: Option<f32>,

    #[arg(long, env = "TRIAGE_MARGIN")]
    margin: Option<f32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify a single message and print the outcome as JSON.
    Predict { text: String },
    /// Interactive loop; type 'exit' to quit.
    Chat,
    /// Print the loaded label vocabulary.
    Labels,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("triage_cli");
    let cli = Cli::parse();

    let agent = build_agent(&cli)?;

    match cli.command {
        Command::Predict { text } => {
            let outcome = agent.handle_message(text).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Chat => run_chat(agent).await?,
        Command::Labels => {
            for label in agent.labels().names() {
                println!("{label}");
            }
        }
    }

    Ok(())
}

async fn run_chat(agent: TriageAgent) -> Result<()> {
    println!("Triage chat mode. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }
        if message.is_empty() {
            continue;
        }

        let outcome = agent.handle_message(message.to_string()).await?;
        println!(
            "\n[{} @ {:.3}]\n{}\n",
            outcome.intent.as_label(),
            outcome.confidence,
            outcome.reply
        );
    }

    Ok(())
}

fn build_agent(cli: &Cli) -> Result<TriageAgent> {
    let adapter = ClassifierAdapter::load(&cli.artifacts_dir).with_context(|| {
        format!(
            "failed loading classifier artifacts from {}",
            cli.artifacts_dir.display()
        )
    })?;

    let mut params = ResolveParams::default();
    if let Some(min_conf) = cli.min_conf {
        params.min_conf = min_conf;
    }
    if let Some(margin) = cli.margin {
        params.margin = margin;
    }

    Ok(TriageAgent::new(
        Arc::new(adapter),
        KeywordSets::default(),
        ResponseBank::default(),
        params,
        AppMetrics::shared(),
    ))
}
