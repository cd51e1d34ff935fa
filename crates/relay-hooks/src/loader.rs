//! Optional user-installed inbound hook, loaded from a manifest on disk.
//!
//! ```text
//! ~/.relay/hooks/inbound/
//!   hook.toml   ← manifest
//!   hook.py     ← entry point (any language)
//! ```
//!
//! The manifest path can be overridden with `RELAY_HOOK_PATH`.
//!
//! ## Execution contract
//!
//! - The batch is passed as a JSON string in the `RELAY_INPUT` env variable.
//! - The script prints a decision on **stdout**:
//!   `{"action":"continue"}`, `{"action":"continue","text":"…"}` or
//!   `{"action":"handled"}`.
//! - Exit code 0 = success. Anything else, a timeout, or unparseable stdout
//!   counts as a failure and the batch goes to default processing.
//!
//! ## Manifest format (`hook.toml`)
//!
//! ```toml
//! name = "digest"
//!
//! [run]
//! command = "python3"   # interpreter: bash, python3, node, …
//! script  = "hook.py"   # relative to the manifest directory
//! timeout = 10          # seconds (optional, default 10)
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{HookError, Result};
use crate::types::{HookDecision, InboundBatch, InboundSink};

pub const HOOK_PATH_ENV: &str = "RELAY_HOOK_PATH";
const INPUT_ENV: &str = "RELAY_INPUT";

#[derive(Debug, Deserialize)]
struct HookManifest {
    name: String,
    run: RunConfig,
}

#[derive(Debug, Deserialize)]
struct RunConfig {
    command: String,
    script: String,
    #[serde(default = "default_timeout")]
    timeout: u64,
}

fn default_timeout() -> u64 {
    10
}

/// Where to look for the hook manifest.
///
/// Order: explicit config value, then `RELAY_HOOK_PATH`, then
/// `~/.relay/hooks/inbound/hook.toml`.
pub fn resolve_hook_path(explicit: Option<&str>) -> PathBuf {
    pick_hook_path(
        explicit,
        std::env::var(HOOK_PATH_ENV).ok().as_deref(),
        &relay_core::config::relay_home(),
    )
}

fn pick_hook_path(explicit: Option<&str>, env: Option<&str>, home: &str) -> PathBuf {
    explicit
        .or(env)
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(home).join("hooks").join("inbound").join("hook.toml"))
}

/// A script hook loaded from a `hook.toml` manifest.
#[derive(Debug)]
pub struct ScriptHook {
    manifest: HookManifest,
    /// Directory holding the manifest; the script runs from here.
    dir: PathBuf,
}

impl ScriptHook {
    pub fn load(manifest_path: &Path) -> Result<Self> {
        if !manifest_path.exists() {
            return Err(HookError::NotFound(manifest_path.display().to_string()));
        }
        let content = std::fs::read_to_string(manifest_path)
            .map_err(|e| HookError::InvalidManifest(format!("{}: {e}", manifest_path.display())))?;
        let manifest: HookManifest = toml::from_str(&content)
            .map_err(|e| HookError::InvalidManifest(format!("{}: {e}", manifest_path.display())))?;
        let dir = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { manifest, dir })
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    /// Run the script on `batch` and parse its decision.
    pub async fn invoke(&self, batch: &InboundBatch) -> Result<HookDecision> {
        let input = serde_json::to_string(batch)
            .map_err(|e| HookError::ExecutionFailed(format!("cannot encode batch: {e}")))?;
        let timeout_secs = self.manifest.run.timeout;

        let run = tokio::process::Command::new(&self.manifest.run.command)
            .arg(self.dir.join(&self.manifest.run.script))
            .env(INPUT_ENV, &input)
            .current_dir(&self.dir)
            .kill_on_drop(true)
            .output();

        let out = match tokio::time::timeout(Duration::from_secs(timeout_secs), run).await {
            Err(_) => return Err(HookError::Timeout { secs: timeout_secs }),
            Ok(Err(e)) => {
                return Err(HookError::ExecutionFailed(format!(
                    "failed to launch '{}': {e}",
                    self.manifest.name
                )))
            }
            Ok(Ok(out)) => out,
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            return Err(HookError::ExecutionFailed(format!(
                "exit {}: {stderr}",
                out.status.code().unwrap_or(-1)
            )));
        }

        let stdout = String::from_utf8_lossy(&out.stdout);
        serde_json::from_str(stdout.trim()).map_err(|e| HookError::InvalidReply(e.to_string()))
    }
}

/// Routes each batch through the hook (if any) before default processing.
///
/// Default processing runs at most once per batch: skipped when the hook
/// reports `handled`, run once otherwise. Hook failures never block it.
#[derive(Debug, Default)]
pub struct HookRunner {
    hook: Option<ScriptHook>,
}

impl HookRunner {
    /// Runner with no hook: every batch goes straight to the sink.
    pub fn passthrough() -> Self {
        Self { hook: None }
    }

    pub fn with_hook(hook: ScriptHook) -> Self {
        Self { hook: Some(hook) }
    }

    /// Load the hook at the resolved path. Missing or broken manifests are
    /// logged and yield a pass-through runner.
    pub fn load(explicit: Option<&str>) -> Self {
        let path = resolve_hook_path(explicit);
        match ScriptHook::load(&path) {
            Ok(hook) => {
                info!(name = %hook.name(), path = %path.display(), "inbound hook loaded");
                Self::with_hook(hook)
            }
            Err(HookError::NotFound(_)) => {
                debug!(path = %path.display(), "no inbound hook installed");
                Self::passthrough()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "inbound hook ignored");
                Self::passthrough()
            }
        }
    }

    pub fn has_hook(&self) -> bool {
        self.hook.is_some()
    }

    pub async fn dispatch(&self, mut batch: InboundBatch, sink: &dyn InboundSink) {
        let Some(hook) = &self.hook else {
            sink.process(batch).await;
            return;
        };

        match hook.invoke(&batch).await {
            Ok(HookDecision::Handled) => {
                debug!(hook = %hook.name(), key = %batch.key, "batch handled by hook");
            }
            Ok(HookDecision::Continue { text }) => {
                if let Some(text) = text {
                    batch.text = text;
                }
                sink.process(batch).await;
            }
            Err(e) => {
                warn!(hook = %hook.name(), key = %batch.key, error = %e, "inbound hook failed, using default processing");
                sink.process(batch).await;
            }
        }
    }
}
