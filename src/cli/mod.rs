//! Command-line interface for agent-relay.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// agent-relay CLI
#[derive(Parser, Debug)]
#[command(name = "agent-relay", version, about = "Relay recorded agent execution logs as chat-completion streams")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSON-lines execution log as SSE frames on stdout
    Replay(ReplayArgs),
}

/// Arguments for the `replay` subcommand.
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// JSON-lines file, one raw log event per line
    pub file: PathBuf,

    /// Model name reported in chunks (defaults to RELAY_MODEL / config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Characters per content chunk
    #[arg(short, long)]
    pub width: Option<usize>,

    /// System prompt prepended to the dialogue
    #[arg(short, long)]
    pub system: Option<String>,

    /// User prompt for the run
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Print only the final text instead of streaming
    #[arg(long)]
    pub complete: bool,
}
