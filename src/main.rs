//! agent-relay CLI binary entry point.

use std::io::Write;

use agent_relay::agent::{ExecutionDriver, LogAgent, ReplayAgent, RunInput};
use agent_relay::cli::{Cli, Commands, ReplayArgs};
use agent_relay::config::RelayConfig;
use agent_relay::notify::{Notification, Sink};
use agent_relay::stream_transform::{outbound_channel, sse_frames, DeltaEncoder};
use agent_relay::types::MessageRecord;
use clap::Parser;
use futures::StreamExt;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Replay(args) => handle_replay(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_replay(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RelayConfig::global().clone();
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(width) = args.width {
        config.chunk_width = width;
    }
    if args.system.is_some() {
        config.system_prompt = args.system;
    }

    let agent = ReplayAgent::load(&args.file).await?;
    let driver = ExecutionDriver::new(
        || Ok(()),
        move |_model: (), _tools| Ok(Box::new(agent.clone()) as Box<dyn LogAgent>),
    )
    .with_config(&config);

    let records = args
        .prompt
        .map(|prompt| vec![MessageRecord::new("user", prompt)])
        .unwrap_or_default();
    let input = RunInput::builder()
        .messages(records)
        .maybe_system_prompt(config.system_prompt.clone())
        .build();

    if args.complete {
        println!("{}", driver.complete(input).await?);
        return Ok(());
    }

    let (tx, rx) = outbound_channel(config.channel_capacity);
    let encoder = DeltaEncoder::new(tx, config.model.clone());
    let status = Sink::immediate(|notification| {
        if let Notification::Status(status) = notification {
            eprintln!("[status] {}", status.description);
        }
        Ok(())
    });

    let producer = async move {
        let result = driver.relay(input, &encoder, Some(status)).await;
        drop(encoder);
        result
    };
    let writer = async move {
        let mut frames = sse_frames(rx);
        let mut stdout = std::io::stdout();
        while let Some(frame) = frames.next().await {
            stdout.write_all(frame?.as_bytes())?;
            stdout.flush()?;
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    };

    let (relayed, written) = tokio::join!(producer, writer);
    let stats = relayed?;
    written?;
    tracing::info!(
        events = stats.events,
        fragments = stats.fragments,
        tool_events = stats.tool_events,
        "replay finished"
    );
    Ok(())
}
