// src/quiz/mod.rs  -  Call-sign quiz: list handling, round playback, sequencing
pub mod callsigns;
pub mod capabilities;
pub mod playback;
pub mod sequencer;

#[cfg(test)]
pub(crate) mod testing;

pub use capabilities::{Capabilities, CommandSpeech, NullSpeech, NullWakeLock};
pub use playback::RoundEvent;
pub use sequencer::{Quiz, QuizState};
