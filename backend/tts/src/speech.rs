//! Speech feedback: announces status changes through the host synthesizer.
//!
//! Best-effort: with no synthesizer every call is a silent no-op.
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A voice offered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP-47 tag, e.g. `es-MX`.
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

/// One thing to say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub voice: Option<Voice>,
    pub lang: String,
}

/// Host speech capability. Starting an utterance must not block.
pub trait SpeechSynthesizer: Send + Sync {
    fn voices(&self) -> Vec<Voice>;

    /// Stop whatever is being spoken and drop anything queued.
    fn cancel(&self);

    fn speak(&self, utterance: Utterance);
}

/// Which voice to prefer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoicePreference {
    /// Language prefix a voice's tag must start with (`es`).
    pub language: String,
    /// Tag requested when no installed voice matches (`es-ES`).
    pub fallback_locale: String,
}

impl Default for VoicePreference {
    fn default() -> Self {
        Self {
            language: "es".into(),
            fallback_locale: "es-ES".into(),
        }
    }
}

pub struct SpeechFeedback {
    synth: Option<Arc<dyn SpeechSynthesizer>>,
    preference: VoicePreference,
}

impl SpeechFeedback {
    pub fn new(synth: Arc<dyn SpeechSynthesizer>, preference: VoicePreference) -> Self {
        Self {
            synth: Some(synth),
            preference,
        }
    }

    /// Feedback for a host without speech support.
    pub fn silent() -> Self {
        Self {
            synth: None,
            preference: VoicePreference::default(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.synth.is_some()
    }

    /// Cancel the current utterance, then say `text`. Empty text is ignored.
    /// Returns whether an utterance was started.
    pub fn speak(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let Some(synth) = &self.synth else {
            trace!("No speech synthesizer; skipping announcement");
            return false;
        };

        synth.cancel();
        let voice = self.select_voice(&synth.voices());
        let lang = voice
            .as_ref()
            .map(|v| v.lang.clone())
            .unwrap_or_else(|| self.preference.fallback_locale.clone());
        debug!(lang = %lang, voice = ?voice.as_ref().map(|v| &v.name), "Speaking status");
        synth.speak(Utterance {
            text: text.to_string(),
            voice,
            lang,
        });
        true
    }

    /// Silence any in-progress utterance.
    pub fn cancel(&self) {
        if let Some(synth) = &self.synth {
            synth.cancel();
        }
    }

    /// First voice whose tag starts with the preferred language prefix.
    pub fn select_voice(&self, voices: &[Voice]) -> Option<Voice> {
        let prefix = self.preference.language.to_ascii_lowercase();
        voices
            .iter()
            .find(|v| v.lang.to_ascii_lowercase().starts_with(&prefix))
            .cloned()
    }
}
