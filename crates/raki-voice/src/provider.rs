//! **VoiceIo**: the speech capability the assistant core depends on.
//!
//! Every provider implements `speak(text, lang)` and `listen()`. The daemon picks
//! exactly one provider at startup from the `voice_provider` config string.

use crate::console::ConsoleVoice;
use crate::error::{VoiceError, VoiceResult};
use crate::system::SystemTtsVoice;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Speech input/output capability. Implement for any TTS/STT pairing.
#[async_trait]
pub trait VoiceIo: Send + Sync {
    /// Short provider identifier used in logs.
    fn name(&self) -> &str;

    /// Say `text` in the language identified by `lang` (ISO 639-1 code, e.g. "en", "fr").
    async fn speak(&self, text: &str, lang: &str) -> VoiceResult<()>;

    /// Wait for the next utterance. `Ok(None)` means nothing intelligible was heard;
    /// `Err(VoiceError::InputClosed)` means the input source is gone for good.
    async fn listen(&self) -> VoiceResult<Option<String>>;

    /// Speak a question and return the answer (convenience used by multi-step commands).
    async fn ask(&self, question: &str, lang: &str) -> VoiceResult<Option<String>> {
        self.speak(question, lang).await?;
        self.listen().await
    }
}

/// Provider selector as written in the config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceProvider {
    /// Text in on stdin, text out on stdout.
    Console,
    /// Local speech synthesizer binary (espeak-ng, espeak, spd-say or say) with stdin input.
    System,
}

impl VoiceProvider {
    pub fn parse(name: &str) -> VoiceResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "console" | "text" => Ok(Self::Console),
            "system" | "tts" | "espeak" => Ok(Self::System),
            other => Err(VoiceError::UnknownProvider(other.to_string())),
        }
    }
}

/// Build the provider selected by `name`. An explicitly selected provider that cannot
/// run on this host is an error; the caller treats it as fatal.
pub fn create_voice(name: &str) -> VoiceResult<Arc<dyn VoiceIo>> {
    let provider = VoiceProvider::parse(name)?;
    let voice: Arc<dyn VoiceIo> = match provider {
        VoiceProvider::Console => Arc::new(ConsoleVoice::new()),
        VoiceProvider::System => Arc::new(SystemTtsVoice::detect()?),
    };
    info!(target: "raki::voice", provider = voice.name(), "voice provider selected");
    Ok(voice)
}
