//! Integration test: provider selection from the config string.

use raki_voice::{create_voice, VoiceError, VoiceIo, ScriptedVoice};

#[tokio::test]
async fn console_provider_is_always_available() {
    let voice = create_voice("console").expect("console provider should build");
    assert_eq!(voice.name(), "console");
}

#[tokio::test]
async fn unknown_provider_is_rejected() {
    let err = create_voice("carrier-pigeon").err().expect("should fail");
    assert!(matches!(err, VoiceError::UnknownProvider(ref p) if p == "carrier-pigeon"));
}

#[tokio::test]
async fn scripted_voice_records_language_per_line() {
    let voice = ScriptedVoice::new(Vec::<String>::new());
    voice.speak("Bonjour", "fr").await.unwrap();
    voice.speak("Hello", "en").await.unwrap();
    assert_eq!(
        voice.spoken(),
        vec![
            ("Bonjour".to_string(), "fr".to_string()),
            ("Hello".to_string(), "en".to_string())
        ]
    );
}
