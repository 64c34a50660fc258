use std::env;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use crate::error::Error;

#[async_trait]
pub trait Clipboard: Send {
    async fn copy(&mut self, text: &str) -> Result<(), Error>;
}

/// Pipes text into a spawned system clipboard command over stdin.
pub struct CommandClipboard {
    command: String,
    timeout_ms: u64,
}

impl CommandClipboard {
    pub fn new(command: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            command: command.into(),
            timeout_ms,
        }
    }

    pub fn from_env() -> Self {
        let command =
            env::var("CLIPBOARD_CMD").unwrap_or_else(|_| default_command().to_string());
        Self::new(command, 2_000)
    }
}

fn default_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "pbcopy"
    } else {
        "xclip -selection clipboard"
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn copy(&mut self, text: &str) -> Result<(), Error> {
        if self.command.trim().is_empty() {
            return Err(Error::Clipboard("clipboard command is missing".to_string()));
        }

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| Error::Clipboard(format!("failed to spawn clipboard command: {err}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(text.as_bytes()).await {
                return Err(Error::Clipboard(format!(
                    "failed to write to clipboard command: {err}"
                )));
            }
            // Dropping stdin closes the pipe so the command can finish.
        }

        let status = timeout(Duration::from_millis(self.timeout_ms), child.wait())
            .await
            .map_err(|_| Error::Clipboard("clipboard command timed out".to_string()))?
            .map_err(|err| Error::Clipboard(format!("clipboard command failed: {err}")))?;

        if !status.success() {
            return Err(Error::Clipboard(format!(
                "clipboard command exited with {status}"
            )));
        }

        Ok(())
    }
}
