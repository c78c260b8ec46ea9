pub mod console;
pub mod speech;

pub use console::ConsoleSynthesizer;
pub use speech::{SpeechFeedback, SpeechSynthesizer, Utterance, Voice, VoicePreference};
