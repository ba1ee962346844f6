//! **SystemTtsVoice**: speaks through a local synthesizer binary.
//!
//! Probes `PATH` for `espeak-ng`, `espeak`, `spd-say` and `say` (in that order).
//! Input still comes from stdin; this provider only replaces the output side.
//! Replies are split into sentences with a short pause between them so long
//! answers do not run together.

use crate::console::{read_line, SPEAKER_PREFIX};
use crate::error::{VoiceError, VoiceResult};
use crate::provider::VoiceIo;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const CANDIDATES: &[&str] = &["espeak-ng", "espeak", "spd-say", "say"];

const SENTENCE_PAUSE: Duration = Duration::from_millis(300);

pub struct SystemTtsVoice {
    program: PathBuf,
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl SystemTtsVoice {
    /// Finds the first available synthesizer. Fails when none is installed.
    pub fn detect() -> VoiceResult<Self> {
        let program = CANDIDATES
            .iter()
            .find_map(|name| which::which(name).ok())
            .ok_or_else(|| {
                VoiceError::Unavailable(format!(
                    "no speech synthesizer found in PATH (tried {})",
                    CANDIDATES.join(", ")
                ))
            })?;
        Ok(Self::with_program(program))
    }

    pub fn with_program(program: PathBuf) -> Self {
        Self {
            program,
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    fn program_name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("say")
    }

    fn command_for(&self, sentence: &str, lang: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        match self.program_name() {
            "espeak-ng" | "espeak" => {
                cmd.arg("-v").arg(lang);
            }
            "spd-say" => {
                cmd.arg("-w").arg("-l").arg(lang);
            }
            _ => {}
        }
        cmd.arg(sentence);
        cmd
    }
}

/// Splits text after `.`, `!` or `?` followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().map_or(true, |n| n.is_whitespace()) {
            let s = current.trim();
            if !s.is_empty() {
                out.push(s.to_string());
            }
            current.clear();
        }
    }
    let rest = current.trim();
    if !rest.is_empty() {
        out.push(rest.to_string());
    }
    out
}

#[async_trait]
impl VoiceIo for SystemTtsVoice {
    fn name(&self) -> &str {
        "system"
    }

    async fn speak(&self, text: &str, lang: &str) -> VoiceResult<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        println!("{}: {}", SPEAKER_PREFIX, text);
        let sentences = split_sentences(text);
        let last = sentences.len().saturating_sub(1);
        for (i, sentence) in sentences.iter().enumerate() {
            let status = self
                .command_for(sentence, lang)
                .status()
                .await
                .map_err(|e| VoiceError::Tts(e.to_string()))?;
            if !status.success() {
                warn!(target: "raki::voice", program = %self.program.display(), %status, "synthesizer exited with failure");
                return Err(VoiceError::Tts(format!("{} exited with {}", self.program_name(), status)));
            }
            if i < last {
                tokio::time::sleep(SENTENCE_PAUSE).await;
            }
        }
        debug!(target: "raki::voice", sentences = sentences.len(), "spoke reply");
        Ok(())
    }

    async fn listen(&self) -> VoiceResult<Option<String>> {
        read_line(&self.lines).await
    }
}
