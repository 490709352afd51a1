//! Speech output boundary. The router speaks on every terminal branch;
//! failures in the backend are invisible to the pipeline.

use std::sync::Arc;

/// Text-to-speech capability consumed by the router and handed to skills.
pub trait SpeechOutput: Send + Sync {
    fn speak(&self, text: &str);
}

impl<T: SpeechOutput + ?Sized> SpeechOutput for Arc<T> {
    fn speak(&self, text: &str) {
        (**self).speak(text)
    }
}

/// Prints responses to stdout. Stand-in for a real TTS engine adapter.
#[derive(Debug, Default)]
pub struct ConsoleVoice;

impl SpeechOutput for ConsoleVoice {
    fn speak(&self, text: &str) {
        tracing::info!(target: "valet::voice", "{text}");
        println!("valet> {text}");
    }
}

/// Discards all output. Useful for headless runs.
#[derive(Debug, Default)]
pub struct SilentVoice;

impl SpeechOutput for SilentVoice {
    fn speak(&self, _text: &str) {}
}
