//! # Raki Voice
//!
//! Speech capability for the Raki assistant. The core only sees the [`VoiceIo`]
//! trait; the concrete provider is chosen once at startup by [`create_voice`].
//!
//! ```text
//!   voice_provider = "console"  ->  ConsoleVoice   (stdin / stdout)
//!   voice_provider = "system"   ->  SystemTtsVoice (espeak-ng | espeak | spd-say | say)
//!   tests                       ->  ScriptedVoice  (queued utterances)
//! ```

pub mod console;
pub mod error;
pub mod provider;
pub mod scripted;
pub mod system;

pub use console::ConsoleVoice;
pub use error::{VoiceError, VoiceResult};
pub use provider::{create_voice, VoiceIo, VoiceProvider};
pub use scripted::ScriptedVoice;
pub use system::SystemTtsVoice;
