use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use tracing::{info, warn};

use relay_channels::{ReplyDispatcher, ReplyPayload};
use relay_chunker::{split_message, Limits};
use relay_core::{RelayConfig, SplitConfig};
use relay_hooks::{resolve_hook_path, HookRunner, InboundBatch, InboundBatcher, InboundMessage, InboundSink};

mod cli;

use cli::{Cli, Command, LimitArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the messages; logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // load config: --config > RELAY_CONFIG env > ~/.relay/relay.toml
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .or_else(|| std::env::var("RELAY_CONFIG").ok());
    let config = RelayConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        RelayConfig::default()
    });

    match cli.command {
        Command::Split {
            input,
            limits,
            json,
            separator,
        } => {
            let text = read_input(input.as_deref())?;
            let messages = split_text(&text, &apply_limit_args(&config.split, &limits));
            info!(messages = messages.len(), "split complete");

            let rendered = render_messages(&messages, json, &separator)?;
            if !rendered.is_empty() {
                println!("{rendered}");
            }
        }
        Command::Payloads { input, limits } => {
            let raw = read_input(input.as_deref())?;
            let payloads: Vec<ReplyPayload> = serde_json::from_str(&raw)
                .context("input is not a JSON array of reply payloads")?;

            let dispatcher = ReplyDispatcher::from_config(&apply_limit_args(&config.split, &limits));
            let expanded = dispatcher.prepare(payloads);
            println!("{}", serde_json::to_string_pretty(&expanded)?);
        }
        Command::Hook { path } => {
            let explicit = path.or_else(|| config.hooks.path.clone());
            let resolved = resolve_hook_path(explicit.as_deref());
            let runner = HookRunner::load(explicit.as_deref());
            let state = if runner.has_hook() { "loaded" } else { "not loaded" };
            println!("{}\t{state}", resolved.display());
        }
        Command::Inbound {
            input,
            channel,
            sender,
        } => {
            let text = read_input(input.as_deref())?;
            run_inbound(&config, &text, &channel, &sender).await?;
        }
    }

    Ok(())
}

/// Read the whole input file, or stdin when no path (or `-`) is given.
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("cannot read {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("cannot read stdin")?;
            Ok(buf)
        }
    }
}

/// Command-line limits win over the config file. Passing any limit also
/// switches splitting on.
fn apply_limit_args(base: &SplitConfig, args: &LimitArgs) -> SplitConfig {
    let mut split = base.clone();
    if let Some(max_lines) = args.max_lines {
        split.max_lines = max_lines;
        split.enabled = true;
    }
    if let Some(max_paragraphs) = args.max_paragraphs {
        split.max_paragraphs = max_paragraphs;
        split.enabled = true;
    }
    split
}

/// Same switch as the payload path: with splitting disabled the text goes
/// out as one message (or none, if it is blank).
fn split_text(text: &str, split: &SplitConfig) -> Vec<String> {
    if !split.enabled {
        if text.trim().is_empty() {
            return Vec::new();
        }
        return vec![text.to_string()];
    }
    split_message(text, &Limits::new(split.max_lines, split.max_paragraphs))
}

fn render_messages(messages: &[String], json: bool, separator: &str) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(messages)?);
    }
    Ok(messages.join(&format!("\n{separator}\n")))
}

/// Prints each batch that reaches default processing.
struct PrintSink;

#[async_trait]
impl InboundSink for PrintSink {
    async fn process(&self, batch: InboundBatch) {
        println!("[{}] {}", batch.key, batch.text);
    }
}

async fn run_inbound(
    config: &RelayConfig,
    text: &str,
    channel: &str,
    sender: &str,
) -> anyhow::Result<()> {
    let (batcher, batches) = InboundBatcher::from_config(&config.hooks);
    let runner = HookRunner::load(config.hooks.path.as_deref());
    let worker = tokio::spawn(relay_hooks::drive(batches, runner, Arc::new(PrintSink)));

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        batcher.push(InboundMessage::new(channel, sender, line)).await;
    }

    // end of input: nothing more will arrive, flush instead of waiting out the timers
    batcher.flush_all().await;
    drop(batcher);
    worker.await.context("inbound worker panicked")?;
    Ok(())
}
