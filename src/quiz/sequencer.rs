// src/quiz/sequencer.rs  -  Walks a shuffled call-sign queue, one round per entry
use super::capabilities::Capabilities;
use super::playback::{Phase, Phrases, PlaybackController, PlaybackParams, RoundEvent};
use crate::config::AppConfig;
use crate::i18n::I18n;
use anyhow::{ensure, Result};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::time::Duration;

/// Solutions kept for the history pane
pub const HISTORY_LEN: usize = 10;

/// Snapshot for the UI
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizState {
    pub started:   bool,
    pub paused:    bool,
    pub auto_mode: bool,
    /// 1-based position in the queue
    pub position:  usize,
    pub len:       usize,
    pub frequency: Option<u32>,
    /// (k, n) of the transmission in progress
    pub repeat:    Option<(u8, u8)>,
    /// Answer of the current round once revealed
    pub revealed:  Option<String>,
    /// Most recent solution first
    pub history:   Vec<String>,
}

pub struct Quiz {
    queue:      Vec<String>,
    index:      usize,
    started:    bool,
    frequency:  Option<u32>,
    repeat:     Option<(u8, u8)>,
    revealed:   Option<String>,
    history:    VecDeque<String>,
    cfg:        AppConfig,
    i18n:       I18n,
    caps:       Capabilities,
    controller: PlaybackController,
    rng:        SmallRng,
}

impl Quiz {
    pub fn new(cfg: AppConfig, caps: Capabilities) -> Self {
        Self::with_rng(cfg, caps, SmallRng::from_entropy())
    }

    pub fn with_rng(cfg: AppConfig, caps: Capabilities, mut rng: SmallRng) -> Self {
        let controller = PlaybackController::with_rng(SmallRng::seed_from_u64(rng.gen()));
        Self {
            queue:      Vec::new(),
            index:      0,
            started:    false,
            frequency:  None,
            repeat:     None,
            revealed:   None,
            history:    VecDeque::with_capacity(HISTORY_LEN),
            i18n:       I18n::new(&cfg.language),
            cfg,
            caps,
            controller,
            rng,
        }
    }

    pub fn config(&self) -> &AppConfig { &self.cfg }
    pub fn i18n(&self)   -> &I18n      { &self.i18n }

    /// Replace the queue; it is shuffled and restarts at the first entry
    pub fn set_queue(&mut self, list: Vec<String>) {
        self.queue = list;
        self.queue.shuffle(&mut self.rng);
        self.index = 0;
        log::info!("[quiz] {} call signs queued", self.queue.len());
    }

    /// Call sign of the running round
    #[cfg(test)]
    pub fn current(&self) -> Option<&str> {
        self.started.then(|| self.queue.get(self.index).map(String::as_str)).flatten()
    }

    #[cfg(test)]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.controller.next_deadline()
    }

    /// Begin the session with the first queued call sign.
    /// A second `start` while running does nothing.
    pub fn start(&mut self, now: Duration) -> Result<Option<RoundEvent>> {
        if self.started {
            log::debug!("[quiz] already running");
            return Ok(None);
        }
        ensure!(!self.queue.is_empty(), "call-sign list is empty");

        self.started = true;
        if self.cfg.auto_mode {
            self.caps.wake_lock.acquire();
        }
        Ok(Some(self.begin_round(now)))
    }

    /// Skip to the following call sign; ignored while stopped or paused
    pub fn next(&mut self, now: Duration) -> Option<RoundEvent> {
        if !self.started || self.controller.is_paused() {
            return None;
        }
        Some(self.advance(now))
    }

    pub fn pause(&mut self) {
        if self.started {
            self.controller.pause(&mut self.caps);
        }
    }

    pub fn resume(&mut self, now: Duration) -> Option<RoundEvent> {
        if !self.started {
            return None;
        }
        let ev = self.controller.resume(now, &mut self.caps)?;
        self.observe(ev, now)
    }

    pub fn toggle_pause(&mut self, now: Duration) -> Option<RoundEvent> {
        if self.controller.is_paused() {
            self.resume(now)
        } else {
            self.pause();
            None
        }
    }

    /// End the session: silence, back to the start of a reshuffled queue
    pub fn stop(&mut self) {
        self.controller.stop(&mut self.caps);
        if self.started {
            self.caps.wake_lock.release();
            log::info!("[quiz] stopped at {}/{}", self.index + 1, self.queue.len());
        }
        self.started = false;
        self.frequency = None;
        self.repeat = None;
        self.revealed = None;
        self.queue.shuffle(&mut self.rng);
        self.index = 0;
    }

    /// Switch auto-advance.  Turning it on while a solution is showing
    /// moves straight to the next call sign, or on resume when paused.
    pub fn set_auto(&mut self, auto: bool, now: Duration) -> Option<RoundEvent> {
        let was = self.cfg.auto_mode;
        self.cfg.auto_mode = auto;
        if !self.started || was == auto {
            return None;
        }
        self.controller.set_auto(auto, now);

        let revealed = self.controller.phase() == Phase::Revealed;
        if auto {
            self.caps.wake_lock.acquire();
            if revealed {
                return Some(self.advance(now));
            }
        } else if revealed {
            self.caps.wake_lock.release();
        }
        None
    }

    /// New settings take effect with the next round
    pub fn set_config(&mut self, cfg: AppConfig, now: Duration) -> Option<RoundEvent> {
        if cfg.language != self.cfg.language {
            self.i18n = I18n::new(&cfg.language);
        }
        let auto = cfg.auto_mode;
        self.cfg = AppConfig { auto_mode: self.cfg.auto_mode, ..cfg };
        self.set_auto(auto, now)
    }

    pub fn tick(&mut self, now: Duration) -> Option<RoundEvent> {
        if !self.started {
            return None;
        }
        let ev = self.controller.tick(now, &mut self.caps)?;
        self.observe(ev, now)
    }

    pub fn state(&self) -> QuizState {
        QuizState {
            started:   self.started,
            paused:    self.controller.is_paused(),
            auto_mode: self.cfg.auto_mode,
            position:  if self.started { self.index + 1 } else { 0 },
            len:       self.queue.len(),
            frequency: self.frequency,
            repeat:    self.repeat,
            revealed:  self.revealed.clone(),
            history:   self.history.iter().cloned().collect(),
        }
    }

    fn observe(&mut self, ev: RoundEvent, now: Duration) -> Option<RoundEvent> {
        match &ev {
            RoundEvent::Playing { repeat, of } => self.repeat = Some((*repeat, *of)),
            RoundEvent::Revealed(call) => {
                self.repeat = None;
                self.revealed = Some(call.clone());
                self.history.push_front(call.clone());
                self.history.truncate(HISTORY_LEN);
                if !self.cfg.auto_mode {
                    self.caps.wake_lock.release();
                }
            }
            RoundEvent::Advance => return Some(self.advance(now)),
            RoundEvent::PreCall | RoundEvent::Paused => {}
        }
        Some(ev)
    }

    fn advance(&mut self, now: Duration) -> RoundEvent {
        self.index += 1;
        if self.index >= self.queue.len() {
            log::info!("[quiz] list exhausted, reshuffling");
            self.queue.shuffle(&mut self.rng);
            self.index = 0;
        }
        self.begin_round(now)
    }

    fn begin_round(&mut self, now: Duration) -> RoundEvent {
        let call = self.queue[self.index].clone();
        let hz = self.rng.gen_range(self.cfg.min_frequency..=self.cfg.max_frequency);
        self.frequency = Some(hz);
        self.repeat = None;
        self.revealed = None;

        if !self.cfg.auto_mode {
            self.caps.wake_lock.acquire();
        }
        let phrases = Phrases {
            pre_call: self.i18n.t("pre_call_speech").to_string(),
            solution: self.i18n.t("solution").to_string(),
            voice:    self.i18n.voice().to_string(),
        };
        let params = PlaybackParams::from_config(&self.cfg, hz);
        self.controller.begin(&call, params, phrases, now, &mut self.caps)
    }
}
