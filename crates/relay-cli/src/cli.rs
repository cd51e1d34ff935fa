use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "relay-split")]
#[command(about = "Split long replies into channel-sized messages without breaking code fences.")]
pub(crate) struct Cli {
    /// Config file (default: $RELAY_CONFIG, then ~/.relay/relay.toml).
    #[arg(long, global = true)]
    pub(crate) config: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Overrides for the `[split]` config section.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct LimitArgs {
    /// Line budget per message.
    #[arg(long)]
    pub(crate) max_lines: Option<usize>,

    /// Paragraph budget per message.
    #[arg(long)]
    pub(crate) max_paragraphs: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Split plain text (file or stdin) and print the messages.
    Split {
        /// Input file; reads stdin when omitted.
        input: Option<PathBuf>,

        #[command(flatten)]
        limits: LimitArgs,

        /// Print a JSON array instead of separator-delimited text.
        #[arg(long)]
        json: bool,

        /// Line printed between messages in text output.
        #[arg(long, default_value = "---")]
        separator: String,
    },
    /// Expand a JSON array of reply payloads and print the result.
    Payloads {
        /// Input file; reads stdin when omitted.
        input: Option<PathBuf>,

        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Show where the inbound hook is looked up and whether it loads.
    Hook {
        /// Manifest path (overrides config and RELAY_HOOK_PATH).
        #[arg(long)]
        path: Option<String>,
    },
    /// Feed lines as inbound messages through batching and the hook.
    Inbound {
        /// Input file; reads stdin when omitted.
        input: Option<PathBuf>,

        #[arg(long, default_value = "cli")]
        channel: String,

        #[arg(long, default_value = "local")]
        sender: String,
    },
}
