// src/quiz/capabilities.rs  -  Optional collaborators injected into the quiz
//
// Audio, speech and the wake lock may all be missing at runtime.  Each has a
// no-op stand-in so the sequencer never has to ask "is this available?".
use crate::audio::{AudioOutput, NullAudio};
use std::process::{Child, Command, Stdio};

/// Text-to-speech output
pub trait Speech: Send {
    /// Start speaking; returns false when speech is unavailable
    fn speak(&mut self, text: &str, voice: &str) -> bool;
    fn is_speaking(&mut self) -> bool;
    fn cancel(&mut self);
}

/// Keeps the machine awake during a session
pub trait WakeLock: Send {
    fn acquire(&mut self);
    fn release(&mut self);
}

pub struct NullSpeech;

impl Speech for NullSpeech {
    fn speak(&mut self, _text: &str, _voice: &str) -> bool { false }
    fn is_speaking(&mut self) -> bool { false }
    fn cancel(&mut self) {}
}

pub struct NullWakeLock;

impl WakeLock for NullWakeLock {
    fn acquire(&mut self) { log::debug!("[wake-lock] acquire (no-op)"); }
    fn release(&mut self) { log::debug!("[wake-lock] release (no-op)"); }
}

/// Speech through an external TTS program such as `espeak-ng -v {voice}`.
/// The text is passed as the last argument.
pub struct CommandSpeech {
    template: Vec<String>,
    child:    Option<Child>,
}

impl CommandSpeech {
    /// None when the template is blank
    pub fn new(template: &str) -> Option<Self> {
        let template: Vec<String> = template.split_whitespace().map(String::from).collect();
        if template.is_empty() {
            return None;
        }
        Some(Self { template, child: None })
    }

    fn command(&self, text: &str, voice: &str) -> Command {
        let mut cmd = Command::new(&self.template[0]);
        for arg in &self.template[1..] {
            cmd.arg(arg.replace("{voice}", voice));
        }
        cmd.arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl Speech for CommandSpeech {
    fn speak(&mut self, text: &str, voice: &str) -> bool {
        self.cancel();
        match self.command(text, voice).spawn() {
            Ok(child) => {
                log::debug!("[speech] {:?}", text);
                self.child = Some(child);
                true
            }
            Err(e) => {
                log::warn!("[speech] cannot run {:?}: {e}", self.template[0]);
                false
            }
        }
    }

    fn is_speaking(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else { return false };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(_)) | Err(_) => {
                self.child = None;
                false
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) { self.cancel(); }
}

/// Everything the playback engine talks to besides its own state
pub struct Capabilities {
    pub audio:     Box<dyn AudioOutput>,
    pub speech:    Box<dyn Speech>,
    pub wake_lock: Box<dyn WakeLock>,
}

impl Capabilities {
    /// No sound, no speech, no wake lock
    #[cfg(test)]
    pub fn none() -> Self {
        Self {
            audio:     Box::new(NullAudio::new()),
            speech:    Box::new(NullSpeech),
            wake_lock: Box::new(NullWakeLock),
        }
    }
}
