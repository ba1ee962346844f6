//! Console provider: the assistant reads typed lines and prints its replies.

use crate::error::{VoiceError, VoiceResult};
use crate::provider::VoiceIo;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Prefix printed before every spoken line.
pub const SPEAKER_PREFIX: &str = "Raki AI";

pub struct ConsoleVoice {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleVoice {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for ConsoleVoice {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads one line from the shared stdin reader. Shared with the system TTS provider,
/// which has no recognizer of its own.
pub(crate) async fn read_line(lines: &Mutex<Lines<BufReader<Stdin>>>) -> VoiceResult<Option<String>> {
    let mut lines = lines.lock().await;
    match lines.next_line().await? {
        Some(line) => {
            let line = line.trim().to_string();
            if line.is_empty() {
                Ok(None)
            } else {
                Ok(Some(line))
            }
        }
        None => Err(VoiceError::InputClosed),
    }
}

#[async_trait]
impl VoiceIo for ConsoleVoice {
    fn name(&self) -> &str {
        "console"
    }

    async fn speak(&self, text: &str, _lang: &str) -> VoiceResult<()> {
        if !text.trim().is_empty() {
            println!("{}: {}", SPEAKER_PREFIX, text);
        }
        Ok(())
    }

    async fn listen(&self) -> VoiceResult<Option<String>> {
        read_line(&self.lines).await
    }
}
