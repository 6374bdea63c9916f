use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Title used when the summarizer cannot be reached or answers garbage.
pub const FALLBACK_TITLE: &str = "New Slide";
/// Title used when the summarizer answers with an empty title.
pub const UNTITLED_TITLE: &str = "Untitled Slide";

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ShellCommand(String);

crate::impl_string_newtype!(ShellCommand);

/// Turns slide body text into a short title. Implementations never fail: every error
/// degrades to a fixed title.
pub trait Summarizer {
    fn summarize(&self, text: &str) -> impl Future<Output = String> + Send;
}

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("Failed to run summarizer: {0}")]
    Io(#[from] std::io::Error),
    #[error("Summarizer timed out after {0:?}")]
    Timeout(Duration),
    #[error("Summarizer exited with {0}")]
    Status(ExitStatus),
    #[error("Malformed summarizer response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Summarizer response has no title")]
    MissingTitle,
}

#[derive(Debug, Deserialize)]
struct TitleResponse {
    title: Option<String>,
}

fn prompt(text: &str) -> String {
    format!(
        "Summarize this presentation slide content into a short, punchy title (max 5 words): \"{}\"",
        text
    )
}

fn parse_title(stdout: &[u8]) -> Result<String, SummarizeError> {
    let response: TitleResponse = serde_json::from_slice(stdout)?;
    let title = response.title.ok_or(SummarizeError::MissingTitle)?;
    let title = title.trim();
    Ok(if title.is_empty() { UNTITLED_TITLE } else { title }.to_string())
}

/// Asks an external program for a title: the prompt goes to its stdin and a
/// `{"title": "..."}` JSON object is expected on its stdout.
#[derive(Debug, Clone)]
pub struct CommandSummarizer {
    command: ShellCommand,
    timeout: Duration,
}

impl CommandSummarizer {
    pub fn new(command: ShellCommand, timeout: Duration) -> Self {
        Self { command, timeout }
    }

    pub async fn request_title(&self, text: &str) -> Result<String, SummarizeError> {
        tokio::time::timeout(self.timeout, self.exchange(text))
            .await
            .map_err(|_| SummarizeError::Timeout(self.timeout))?
    }

    async fn exchange(&self, text: &str) -> Result<String, SummarizeError> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(self.command.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // commands that answer without reading their input close the pipe early
            if let Err(e) = stdin.write_all(prompt(text).as_bytes()).await
                && e.kind() != std::io::ErrorKind::BrokenPipe
            {
                return Err(e.into());
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(SummarizeError::Status(output.status));
        }
        parse_title(&output.stdout)
    }
}

impl Summarizer for CommandSummarizer {
    async fn summarize(&self, text: &str) -> String {
        match self.request_title(text).await {
            Ok(title) => title,
            Err(e) => {
                log::warn!("Title summarization failed: {}", e);
                FALLBACK_TITLE.to_string()
            }
        }
    }
}

/// The summarizer chosen by configuration.
#[derive(Debug, Clone)]
pub enum TitleService {
    Command(CommandSummarizer),
    Disabled,
}

impl TitleService {
    pub fn from_config(command: Option<&ShellCommand>, timeout: Duration) -> Self {
        match command.filter(|c| !c.trim().is_empty()) {
            Some(command) => Self::Command(CommandSummarizer::new(command.clone(), timeout)),
            None => Self::Disabled,
        }
    }
}

impl Summarizer for TitleService {
    async fn summarize(&self, text: &str) -> String {
        match self {
            Self::Command(summarizer) => summarizer.summarize(text).await,
            Self::Disabled => {
                log::debug!("No summarizer configured, using fallback title");
                FALLBACK_TITLE.to_string()
            }
        }
    }
}
