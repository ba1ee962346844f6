//! Scripted provider: replays queued utterances and records what was spoken.
//! Used by tests and by dry runs that feed commands from a file.

use crate::error::{VoiceError, VoiceResult};
use crate::provider::VoiceIo;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct ScriptedVoice {
    inputs: Mutex<VecDeque<Option<String>>>,
    spoken: Mutex<Vec<(String, String)>>,
    close_when_empty: bool,
}

impl ScriptedVoice {
    /// Utterances are returned in order; once exhausted `listen` yields `Ok(None)`.
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: Mutex::new(inputs.into_iter().map(|s| Some(s.into())).collect()),
            spoken: Mutex::new(Vec::new()),
            close_when_empty: false,
        }
    }

    /// Like `new`, but `listen` reports `InputClosed` after the script runs out.
    pub fn closing<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            close_when_empty: true,
            ..Self::new(inputs)
        }
    }

    /// Queue an unintelligible utterance (`listen` returns `Ok(None)` for it).
    pub fn push_silence(&self) {
        if let Ok(mut q) = self.inputs.lock() {
            q.push_back(None);
        }
    }

    /// Everything spoken so far, as `(text, lang)` pairs.
    pub fn spoken(&self) -> Vec<(String, String)> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken().into_iter().map(|(t, _)| t).collect()
    }
}

#[async_trait]
impl VoiceIo for ScriptedVoice {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn speak(&self, text: &str, lang: &str) -> VoiceResult<()> {
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push((text.to_string(), lang.to_string()));
        }
        Ok(())
    }

    async fn listen(&self) -> VoiceResult<Option<String>> {
        let next = self.inputs.lock().ok().and_then(|mut q| q.pop_front());
        match next {
            Some(utterance) => Ok(utterance),
            None if self.close_when_empty => Err(VoiceError::InputClosed),
            None => Ok(None),
        }
    }
}
