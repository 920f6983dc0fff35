//! mallcoord - Mall Agent Coordinator
//!
//! CLI entry point for routing events to mall agents.

use std::fs;
use std::io::{BufRead, BufReader};

use clap::{CommandFactory, Parser};
use colored::*;
use eyre::{Context, Result};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use mallcoord::Persona;
use mallcoord::cli::{Cli, Command, OutputFormat, get_log_path};
use mallcoord::config::Config;
use mallcoord::coordinator::{AgentInbox, CoordinatorHandle, CoordinatorMetrics, CoordinatorService, Routed};
use mallcoord::script::Script;

fn setup_logging(verbose: bool) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        "mallcoord loaded config: builtin_agents={}, custom_agents={}",
        config.agents.builtin,
        config.agents.custom.len()
    );

    // Dispatch command
    match cli.command {
        Some(Command::Agents { format }) => cmd_agents(&config, format),
        Some(Command::Submit {
            category,
            payload,
            collaborators,
            format,
        }) => cmd_submit(&config, &category, &payload, collaborators, format).await,
        Some(Command::Run { script, format }) => cmd_run(&config, &script, format).await,
        Some(Command::History { agent, lines, format }) => cmd_history(&config, agent.as_deref(), lines, format).await,
        Some(Command::Logs { follow, lines }) => cmd_logs(follow, lines),
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Running coordinator with every configured agent registered
struct Session {
    handle: CoordinatorHandle,
    task: JoinHandle<()>,
    inboxes: Vec<AgentInbox>,
}

impl Session {
    async fn start(config: &Config) -> Result<Self> {
        let service = match config.journal() {
            Some(journal) => CoordinatorService::with_journal(config.coordinator.clone(), journal),
            None => CoordinatorService::new(config.coordinator.clone()),
        };
        let handle = service.handle();
        let task = tokio::spawn(service.run());
        info!("Coordinator started");

        let mut inboxes = Vec::new();
        for agent in config.build_agents()? {
            let name = agent.name().to_string();
            let inbox = handle
                .register(agent)
                .await
                .with_context(|| format!("Failed to register agent {}", name))?;
            inboxes.push(inbox);
        }
        info!("Registered {} agents", inboxes.len());

        Ok(Self { handle, task, inboxes })
    }

    async fn stop(self) -> Result<()> {
        self.handle.shutdown().await?;
        self.task.await.context("Coordinator task failed")?;
        info!("Coordinator stopped");
        Ok(())
    }
}

/// List configured agents
fn cmd_agents(config: &Config, format: OutputFormat) -> Result<()> {
    let agents = config.build_agents()?;

    match format {
        OutputFormat::Json => {
            let json: Vec<_> = agents
                .iter()
                .map(|a| {
                    serde_json::json!({
                        "name": a.name(),
                        "category": a.capability(),
                        "description": a.description(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            if agents.is_empty() {
                println!("No agents configured.");
                return Ok(());
            }
            println!("Configured agents:");
            println!();
            for agent in &agents {
                println!("  {} ({})", agent.name().bold(), agent.capability().as_str().cyan());
                if !agent.description().is_empty() {
                    println!("    {}", agent.description());
                }
            }
        }
    }

    Ok(())
}

/// Route one event
async fn cmd_submit(
    config: &Config,
    category: &str,
    payload: &str,
    collaborators: Vec<String>,
    format: OutputFormat,
) -> Result<()> {
    let event = mallcoord::Event::parse(category, payload)?;
    let session = Session::start(config).await?;

    let result = session.handle.route(event, collaborators).await;
    if let Err(e) = session.stop().await {
        warn!("Coordinator did not stop cleanly: {}", e);
    }

    let routed = result?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&routed_json(&routed))?),
        OutputFormat::Text => print_routed(&routed),
    }

    Ok(())
}

/// Route every step of a script
async fn cmd_run(config: &Config, script_path: &std::path::Path, format: OutputFormat) -> Result<()> {
    let script = Script::load(script_path)?;
    info!("Running script {} ({} steps)", script_path.display(), script.steps.len());

    let mut session = Session::start(config).await?;
    let mut results = Vec::new();

    for (index, step) in script.steps.iter().enumerate() {
        let outcome = match step.event() {
            Ok(event) => session.handle.route(event, step.collaborators.clone()).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(routed) => {
                if format == OutputFormat::Text {
                    print!("{:>3}. ", index + 1);
                    print_routed(&routed);
                }
                results.push(routed_json(&routed));
            }
            Err(e) => {
                warn!(step = index + 1, error = %e, "Script step failed");
                if format == OutputFormat::Text {
                    println!("{:>3}. {} {}", index + 1, "✗".red(), e);
                }
                results.push(serde_json::json!({ "step": index + 1, "error": e.to_string() }));
            }
        }
    }

    let metrics = session.handle.metrics().await?;
    let received: Vec<(String, usize)> = session
        .inboxes
        .iter_mut()
        .map(|inbox| (inbox.agent().to_string(), inbox.drain().len()))
        .collect();
    session.stop().await?;

    match format {
        OutputFormat::Json => {
            let inboxes: serde_json::Map<String, serde_json::Value> =
                received.into_iter().map(|(name, n)| (name, n.into())).collect();
            let json = serde_json::json!({
                "results": results,
                "inboxes": inboxes,
                "metrics": metrics,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!();
            println!("Inboxes");
            println!("-------");
            for (name, count) in &received {
                println!("  {:<12} {}", name, count);
            }
            println!();
            print_metrics(&metrics);
        }
    }

    Ok(())
}

/// Show journaled responses
async fn cmd_history(config: &Config, agent: Option<&str>, lines: usize, format: OutputFormat) -> Result<()> {
    let Some(journal) = config.journal() else {
        println!("Response journal is disabled (storage.journal-enabled: false)");
        return Ok(());
    };

    // Built-in agent names match case-insensitively
    let agent = agent.map(|name| match name.parse::<Persona>() {
        Ok(persona) => persona.name(),
        Err(_) => name,
    });
    let entries = journal.history(agent, lines).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No journaled responses at {}", journal.path().display());
                return Ok(());
            }
            for entry in &entries {
                let when = chrono::DateTime::from_timestamp(entry.created_at, 0)
                    .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| entry.created_at.to_string());
                println!(
                    "{} {} [{}] {}",
                    when.dimmed(),
                    entry.response.agent().bold(),
                    entry.response.category().as_str().cyan(),
                    entry.response.payload()
                );
                if !entry.delivered.is_empty() {
                    println!("    delivered: {}", entry.delivered.join(", "));
                }
                for failure in &entry.failed {
                    println!("    {} {}: {}", "✗".red(), failure.collaborator, failure.reason);
                }
            }
        }
    }

    Ok(())
}

/// Show logs
fn cmd_logs(follow: bool, lines: usize) -> Result<()> {
    let log_path = get_log_path();

    if !log_path.exists() {
        println!("No log file found at: {}", log_path.display());
        return Ok(());
    }

    if follow {
        println!("Following log file: {} (Ctrl+C to stop)", log_path.display());
        println!();

        // Use tail -f for following
        let mut child = std::process::Command::new("tail")
            .args(["-f", "-n", &lines.to_string()])
            .arg(&log_path)
            .spawn()
            .context("Failed to run tail -f")?;

        child.wait()?;
    } else {
        // Read last N lines
        let file = fs::File::open(&log_path).context("Failed to open log file")?;
        let reader = BufReader::new(file);
        let all_lines: Vec<String> = reader.lines().map_while(std::result::Result::ok).collect();

        let start = all_lines.len().saturating_sub(lines);
        for line in &all_lines[start..] {
            println!("{}", line);
        }
    }

    Ok(())
}

fn routed_json(routed: &Routed) -> serde_json::Value {
    serde_json::json!({
        "response": routed.response,
        "delivered": routed.report.delivered,
        "failed": routed.report.failed,
    })
}

fn print_routed(routed: &Routed) {
    let response = &routed.response;
    println!(
        "{} {} [{}]: {}",
        "✓".green(),
        response.agent().bold(),
        response.category().as_str().cyan(),
        response.payload()
    );
    for name in &routed.report.delivered {
        println!("     → {}", name);
    }
    for failure in &routed.report.failed {
        println!("     {} {}: {}", "✗".red(), failure.collaborator, failure.reason);
    }
}

fn print_metrics(metrics: &CoordinatorMetrics) {
    println!("Coordinator Metrics");
    println!("-------------------");
    println!("Registered agents: {}", metrics.registered_agents);
    println!("Events submitted:  {}", metrics.events_submitted);
    println!("  Responses:       {}", metrics.responses);
    println!("  Unhandled:       {}", metrics.unhandled_events);
    println!("  Too large:       {}", metrics.rejected_payloads);
    println!("  Handler errors:  {}", metrics.handler_failures);
    println!("Deliveries:        {}", metrics.deliveries);
    println!("  Failed:          {}", metrics.delivery_failures);
}
