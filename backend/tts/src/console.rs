//! Console synthesizer: "speaks" by printing to stdout.

use std::io::Write;

use tracing::info;

use crate::speech::{SpeechSynthesizer, Utterance, Voice};

#[derive(Debug, Default, Clone)]
pub struct ConsoleSynthesizer {
    voices: Vec<Voice>,
}

impl ConsoleSynthesizer {
    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self { voices }
    }
}

impl SpeechSynthesizer for ConsoleSynthesizer {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn cancel(&self) {}

    fn speak(&self, utterance: Utterance) {
        info!(lang = %utterance.lang, "Announcing");
        let mut out = std::io::stdout().lock();
        // stdout may already be closed; nothing to report then.
        let _ = writeln!(out, "[{}] {}", utterance.lang, utterance.text);
        let _ = out.flush();
    }
}
