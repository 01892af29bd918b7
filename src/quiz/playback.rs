// src/quiz/playback.rs  -  One round: pre-call → repeated transmissions → reveal
//
// The controller is ticked by the main loop with a monotonic `now`.  Every
// wait is a deadline; when it passes, exactly one transition happens.  Audio
// is scheduled ahead on the audio clock, so a transmission's completion is
// just the deadline `now + lead-in + duration`.
use crate::audio::{schedule, AudioOutput, NoiseHandle, Transmission, NOISE_TAIL};
use crate::config::{AppConfig, NoiseKind, PreCallMode};
use crate::morse::{encode, Timing};
use super::capabilities::Capabilities;
use rand::rngs::SmallRng;
use rand::Rng;
use std::time::Duration;

/// The "V V V" pre-call always sounds at this pitch
pub const PRE_CALL_HZ: f32 = 700.0;

/// Settings snapshot for one round
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackParams {
    pub wpm:            u8,
    pub farnsworth_wpm: u8,
    pub tone_hz:        u32,
    pub noise_kind:     NoiseKind,
    pub noise_level:    u8,
    pub qsb_level:      u8,
    pub qrm_level:      u8,
    pub repeat_count:   u8,
    pub pause:          Duration,
    pub call_delay:     Duration,
    pub morse_delay:    Duration,
    pub solution_delay: Duration,
    pub pre_call:       PreCallMode,
    pub auto_mode:      bool,
}

impl PlaybackParams {
    pub fn from_config(cfg: &AppConfig, tone_hz: u32) -> Self {
        Self {
            wpm:            cfg.wpm,
            farnsworth_wpm: cfg.farnsworth_wpm,
            tone_hz,
            noise_kind:     cfg.noise_kind,
            noise_level:    cfg.noise_level,
            qsb_level:      cfg.qsb_level,
            qrm_level:      cfg.qrm_level,
            repeat_count:   cfg.repeat_count.max(1),
            pause:          cfg.pause(),
            call_delay:     cfg.call_delay(),
            morse_delay:    cfg.morse_delay(),
            solution_delay: cfg.solution_delay(),
            pre_call:       cfg.pre_call,
            auto_mode:      cfg.auto_mode,
        }
    }

    pub fn timing(&self) -> Timing {
        Timing::farnsworth(self.wpm, self.farnsworth_wpm)
    }
}

/// The call sign as it is sent in each repeat: QSB on, Farnsworth spacing
pub fn call_transmission<R: Rng>(call: &str, p: &PlaybackParams, rng: &mut R) -> Transmission {
    schedule(&encode(call), &p.timing(), p.tone_hz as f32, p.qsb_level, rng)
}

/// "V V V" at character speed, fixed pitch, no fading
pub fn pre_call_transmission<R: Rng>(p: &PlaybackParams, rng: &mut R) -> Transmission {
    schedule(&encode("V V V"), &Timing::from_wpm(p.wpm), PRE_CALL_HZ, 0, rng)
}

/// Start the noise backdrop and queue one sending of `call` after the
/// lead-in.  Returns the started layers and the time until the last tone
/// is over.
pub fn send<R: Rng>(
    audio: &mut dyn AudioOutput,
    call:  &str,
    p:     &PlaybackParams,
    rng:   &mut R,
) -> (Vec<NoiseHandle>, Duration) {
    let start = audio.now();
    let mut layers = Vec::new();
    if p.noise_level > 0 {
        layers.extend(audio.start_noise(p.noise_kind, p.noise_level));
    }
    if p.qrm_level > 0 {
        layers.extend(audio.start_interference(p.qrm_level));
    }
    let tx = call_transmission(call, p, rng);
    audio.play(&tx, start + p.morse_delay);
    (layers, p.morse_delay + tx.duration)
}

/// Spoken texts for the current language
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Phrases {
    pub pre_call: String,
    /// Prefix for the spoken answer ("Solution")
    pub solution: String,
    pub voice:    String,
}

/// A continuation that a pause can hold back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Send repeat k (0-based)
    Repeat(u8),
    Reveal,
    Advance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    PreCall { speaking: bool },
    /// Between pre-call and the first repeat
    Waiting,
    Playing { repeat: u8 },
    /// Pause before the next repeat
    Gap { next: u8 },
    /// Pause before the solution
    Revealing,
    /// Solution shown; auto mode advances after the pause
    Revealed,
    /// Paused with a step held back
    Held,
}

/// Events produced by the controller for the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundEvent {
    PreCall,
    /// `repeat` counts from 1
    Playing { repeat: u8, of: u8 },
    Paused,
    Revealed(String),
    /// Auto mode: the round is over, move on
    Advance,
}

pub struct PlaybackController {
    phase:    Phase,
    deadline: Option<Duration>,
    paused:   bool,
    pending:  Option<Step>,
    call:     String,
    params:   Option<PlaybackParams>,
    phrases:  Phrases,
    /// Noise layers started for the current repeat
    session:  Vec<NoiseHandle>,
    rng:      SmallRng,
}

impl PlaybackController {
    pub fn with_rng(rng: SmallRng) -> Self {
        Self {
            phase:    Phase::Idle,
            deadline: None,
            paused:   false,
            pending:  None,
            call:     String::new(),
            params:   None,
            phrases:  Phrases::default(),
            session:  Vec::new(),
            rng,
        }
    }

    pub fn phase(&self)         -> Phase            { self.phase }
    pub fn is_paused(&self)     -> bool             { self.paused }
    pub fn next_deadline(&self) -> Option<Duration> { self.deadline }

    #[cfg(test)]
    pub fn pending(&self) -> Option<Step> { self.pending }

    /// Start a round, superseding whatever was running
    pub fn begin(
        &mut self,
        call:    &str,
        params:  PlaybackParams,
        phrases: Phrases,
        now:     Duration,
        caps:    &mut Capabilities,
    ) -> RoundEvent {
        self.stop(caps);
        log::info!("[round] {} @ {} Hz, {} × {} WPM/{} WPM",
            call, params.tone_hz, params.repeat_count, params.wpm, params.farnsworth_wpm);

        self.call = call.to_string();
        self.phrases = phrases;

        match params.pre_call {
            PreCallMode::Vvv => {
                let tx = pre_call_transmission(&params, &mut self.rng);
                let at = caps.audio.now();
                caps.audio.play(&tx, at);
                self.phase = Phase::PreCall { speaking: false };
                self.deadline = Some(now + tx.duration);
            }
            PreCallMode::Speech => {
                let speaking = caps.speech.speak(&self.phrases.pre_call, &self.phrases.voice);
                if !speaking {
                    log::debug!("[round] speech unavailable, skipping spoken pre-call");
                }
                self.phase = Phase::PreCall { speaking };
                self.deadline = if speaking { None } else { Some(now) };
            }
        }
        self.params = Some(params);
        RoundEvent::PreCall
    }

    /// Advance the state machine; at most one transition per call
    pub fn tick(&mut self, now: Duration, caps: &mut Capabilities) -> Option<RoundEvent> {
        if self.phase == (Phase::PreCall { speaking: true }) {
            if !caps.speech.is_speaking() {
                self.after_pre_call(now);
            }
            return None;
        }

        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;

        match self.phase {
            Phase::PreCall { .. }     => { self.after_pre_call(now); None }
            Phase::Waiting            => self.run(Step::Repeat(0), now, caps),
            Phase::Playing { repeat } => { self.after_repeat(repeat, now, caps); None }
            Phase::Gap { next }       => self.run(Step::Repeat(next), now, caps),
            Phase::Revealing          => self.run(Step::Reveal, now, caps),
            Phase::Revealed           => self.run(Step::Advance, now, caps),
            Phase::Idle | Phase::Held => None,
        }
    }

    /// Silence audio and hold the round.
    ///
    /// A running transmission is cut and its repeat is held back at once.
    /// In any other phase the running wait continues, and the step it would
    /// trigger is held back when it expires.
    pub fn pause(&mut self, caps: &mut Capabilities) {
        if self.paused || self.phase == Phase::Idle {
            return;
        }
        self.paused = true;
        caps.audio.stop_all();
        caps.speech.cancel();
        self.session.clear();

        if let Phase::Playing { repeat } = self.phase {
            self.hold(Step::Repeat(repeat));
        }
        log::debug!("[round] paused in {:?}", self.phase);
    }

    /// Run the held step, if any
    pub fn resume(&mut self, now: Duration, caps: &mut Capabilities) -> Option<RoundEvent> {
        if !self.paused {
            return None;
        }
        self.paused = false;
        let step = self.pending.take()?;
        log::debug!("[round] resuming with {:?}", step);
        self.run(step, now, caps)
    }

    /// Tear down the round; safe to call at any time
    pub fn stop(&mut self, caps: &mut Capabilities) {
        caps.audio.stop_all();
        caps.speech.cancel();
        self.session.clear();
        self.phase = Phase::Idle;
        self.deadline = None;
        self.paused = false;
        self.pending = None;
    }

    /// Switch auto-advance for the running round.
    ///
    /// Turning it on while the solution is showing moves on at `now`, or on
    /// resume when paused.  Turning it off keeps the solution up, including
    /// when the advance was already held back by a pause.
    pub fn set_auto(&mut self, auto: bool, now: Duration) {
        if let Some(p) = self.params.as_mut() {
            p.auto_mode = auto;
        }
        match (auto, self.phase) {
            (true, Phase::Revealed) if self.paused => self.hold(Step::Advance),
            (true, Phase::Revealed)                 => self.deadline = Some(now),
            (false, Phase::Revealed)                => self.deadline = None,
            (false, Phase::Held) if self.pending == Some(Step::Advance) => {
                self.pending = None;
                self.phase = Phase::Revealed;
            }
            _ => {}
        }
    }

    fn hold(&mut self, step: Step) {
        self.pending = Some(step);
        self.phase = Phase::Held;
        self.deadline = None;
    }

    fn run(&mut self, step: Step, now: Duration, caps: &mut Capabilities) -> Option<RoundEvent> {
        if self.paused {
            caps.audio.stop_all();
            self.session.clear();
            self.hold(step);
            log::debug!("[round] held {:?}", step);
            return Some(RoundEvent::Paused);
        }
        let params = self.params.clone()?;
        match step {
            Step::Repeat(k) => Some(self.play_repeat(k, &params, now, caps)),
            Step::Reveal    => Some(self.reveal(&params, now, caps)),
            Step::Advance   => {
                self.phase = Phase::Idle;
                Some(RoundEvent::Advance)
            }
        }
    }

    fn after_pre_call(&mut self, now: Duration) {
        let delay = self.params.as_ref().map_or(Duration::ZERO, |p| p.call_delay);
        self.phase = Phase::Waiting;
        self.deadline = Some(now + delay);
    }

    fn play_repeat(
        &mut self,
        k:      u8,
        p:      &PlaybackParams,
        now:    Duration,
        caps:   &mut Capabilities,
    ) -> RoundEvent {
        // previous repeat's noise tail must not overlap the new session
        caps.audio.stop_all();
        let (layers, length) = send(caps.audio.as_mut(), &self.call, p, &mut self.rng);
        self.session = layers;

        self.phase = Phase::Playing { repeat: k };
        self.deadline = Some(now + length);
        RoundEvent::Playing { repeat: k + 1, of: p.repeat_count }
    }

    fn after_repeat(&mut self, k: u8, now: Duration, caps: &mut Capabilities) {
        let tail = caps.audio.now() + NOISE_TAIL;
        for h in self.session.drain(..) {
            caps.audio.stop_at(h, tail);
        }

        let Some(p) = self.params.as_ref() else { return };
        if k + 1 < p.repeat_count {
            self.phase = Phase::Gap { next: k + 1 };
            self.deadline = Some(now + p.pause);
        } else {
            self.phase = Phase::Revealing;
            self.deadline = Some(now + p.solution_delay);
        }
    }

    fn reveal(&mut self, p: &PlaybackParams, now: Duration, caps: &mut Capabilities) -> RoundEvent {
        caps.audio.stop_all();
        self.session.clear();

        let spelled: Vec<String> = self.call.chars().map(String::from).collect();
        let text = format!("{} {}", self.phrases.solution, spelled.join(" "));
        caps.speech.speak(&text, &self.phrases.voice);

        self.phase = Phase::Revealed;
        self.deadline = p.auto_mode.then(|| now + p.pause);
        RoundEvent::Revealed(self.call.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::testing::Recorder;
    use rand::SeedableRng;

    const CALL: &str = "DL1ABC";

    fn params() -> PlaybackParams {
        PlaybackParams {
            wpm:            20,
            farnsworth_wpm: 20,
            tone_hz:        600,
            noise_kind:     NoiseKind::Pink,
            noise_level:    30,
            qsb_level:      0,
            qrm_level:      20,
            repeat_count:   2,
            pause:          Duration::from_secs(1),
            call_delay:     Duration::from_secs(1),
            morse_delay:    Duration::ZERO,
            solution_delay: Duration::from_secs(2),
            pre_call:       PreCallMode::Vvv,
            auto_mode:      false,
        }
    }

    fn phrases() -> Phrases {
        Phrases { pre_call: "Attention".into(), solution: "Solution".into(), voice: "en".into() }
    }

    fn controller() -> PlaybackController {
        PlaybackController::with_rng(SmallRng::seed_from_u64(9))
    }

    fn tx_len(p: &PlaybackParams) -> Duration {
        call_transmission(CALL, p, &mut SmallRng::seed_from_u64(0)).duration
    }

    fn vvv_len(p: &PlaybackParams) -> Duration {
        pre_call_transmission(p, &mut SmallRng::seed_from_u64(0)).duration
    }

    /// Jump from deadline to deadline until the controller stops scheduling
    fn drive(
        ctl:  &mut PlaybackController,
        caps: &mut Capabilities,
        now:  &mut Duration,
    ) -> Vec<(Duration, RoundEvent)> {
        let mut events = Vec::new();
        for _ in 0..50 {
            let Some(next) = ctl.next_deadline() else { break };
            *now = (*now).max(next);
            if let Some(ev) = ctl.tick(*now, caps) {
                events.push((*now, ev));
            }
        }
        events
    }

    /// Drive until the first event matching `pred`
    fn drive_until(
        ctl:  &mut PlaybackController,
        caps: &mut Capabilities,
        now:  &mut Duration,
        pred: impl Fn(&RoundEvent) -> bool,
    ) -> RoundEvent {
        for _ in 0..50 {
            let next = ctl.next_deadline().expect("controller went idle");
            *now = (*now).max(next);
            if let Some(ev) = ctl.tick(*now, caps) {
                if pred(&ev) {
                    return ev;
                }
            }
        }
        panic!("event never arrived");
    }

    #[test]
    fn two_repeats_one_second_apart_then_reveal() {
        let rec = Recorder::default();
        let mut caps = rec.capabilities();
        let mut ctl = controller();
        let p = params();
        let mut now = Duration::ZERO;

        assert_eq!(ctl.begin(CALL, p.clone(), phrases(), now, &mut caps), RoundEvent::PreCall);
        let events = drive(&mut ctl, &mut caps, &mut now);

        let plays: Vec<_> = events.iter()
            .filter(|(_, e)| matches!(e, RoundEvent::Playing { .. }))
            .collect();
        assert_eq!(plays.len(), 2);
        assert_eq!(plays[0].1, RoundEvent::Playing { repeat: 1, of: 2 });
        assert_eq!(plays[1].1, RoundEvent::Playing { repeat: 2, of: 2 });

        let t1 = vvv_len(&p) + p.call_delay;
        assert_eq!(plays[0].0, t1);
        assert_eq!(plays[1].0, t1 + tx_len(&p) + Duration::from_secs(1));

        let (t_reveal, last) = events.last().unwrap();
        assert_eq!(*last, RoundEvent::Revealed(CALL.into()));
        assert_eq!(*t_reveal, plays[1].0 + tx_len(&p) + p.solution_delay);

        // manual mode: nothing scheduled after the reveal
        assert_eq!(ctl.phase(), Phase::Revealed);
        assert_eq!(ctl.next_deadline(), None);

        // VVV + two renderings of the call
        let log = rec.log();
        assert_eq!(log.plays.len(), 3);
        assert!(log.plays[0].tones.iter().all(|t| t.hz == PRE_CALL_HZ));
        assert!(log.plays[1].tones.iter().all(|t| t.hz == 600.0));
        assert_eq!(log.plays[1], log.plays[2]);
        assert_eq!(log.mixer.active_sources(), 0);
    }

    #[test]
    fn pre_call_is_clean_and_fast() {
        let rec = Recorder::default();
        let mut caps = rec.capabilities();
        let mut ctl = controller();
        let p = PlaybackParams { farnsworth_wpm: 8, qsb_level: 80, ..params() };

        ctl.begin(CALL, p.clone(), phrases(), Duration::ZERO, &mut caps);
        let log = rec.log();
        assert_eq!(log.noise_started, 0);
        assert_eq!(log.interference_started, 0);
        let vvv = &log.plays[0];
        assert!(vvv.tones.iter().all(|t| t.amplitude == 1.0));
        assert_eq!(vvv.duration, pre_call_transmission(&params(), &mut SmallRng::seed_from_u64(1)).duration);
    }

    #[test]
    fn each_repeat_starts_one_fresh_noise_session() {
        let rec = Recorder::default();
        let mut caps = rec.capabilities();
        let mut ctl = controller();
        let mut now = Duration::ZERO;

        ctl.begin(CALL, PlaybackParams { repeat_count: 3, ..params() }, phrases(), now, &mut caps);
        for _ in 0..3 {
            drive_until(&mut ctl, &mut caps, &mut now, |e| matches!(e, RoundEvent::Playing { .. }));
            // one noise layer + one QRM carrier, never more
            assert_eq!(rec.log().mixer.active_sources(), 2);
        }
        let log = rec.log();
        assert_eq!(log.noise_started, 3);
        assert_eq!(log.interference_started, 3);
    }

    #[test]
    fn lead_in_delays_tones_not_noise() {
        let rec = Recorder::default();
        let mut caps = rec.capabilities();
        let mut ctl = controller();
        let p = PlaybackParams { morse_delay: Duration::from_secs(2), ..params() };
        let mut now = Duration::ZERO;

        ctl.begin(CALL, p.clone(), phrases(), now, &mut caps);
        drive_until(&mut ctl, &mut caps, &mut now, |e| matches!(e, RoundEvent::Playing { .. }));
        let started = now;
        assert_eq!(rec.log().play_times[1], Duration::from_secs(2));
        assert_eq!(ctl.next_deadline(), Some(started + Duration::from_secs(2) + tx_len(&p)));
    }

    #[test]
    fn pause_mid_repeat_resumes_same_repeat() {
        let rec = Recorder::default();
        let mut caps = rec.capabilities();
        let mut ctl = controller();
        let p = PlaybackParams { repeat_count: 3, ..params() };
        let mut now = Duration::ZERO;

        ctl.begin(CALL, p.clone(), phrases(), now, &mut caps);
        drive_until(&mut ctl, &mut caps, &mut now, |e| *e == RoundEvent::Playing { repeat: 1, of: 3 });
        drive_until(&mut ctl, &mut caps, &mut now, |e| *e == RoundEvent::Playing { repeat: 2, of: 3 });

        now += Duration::from_millis(100);
        ctl.pause(&mut caps);
        assert!(ctl.is_paused());
        assert_eq!(ctl.phase(), Phase::Held);
        assert_eq!(ctl.pending(), Some(Step::Repeat(1)));
        assert_eq!(rec.log().mixer.active_sources(), 0);
        assert_eq!(rec.log().mixer.pending_tones(), 0);
        let stops = rec.log().stop_all_calls;

        // nothing happens while held, however long we wait
        now += Duration::from_secs(60);
        assert_eq!(ctl.tick(now, &mut caps), None);
        assert_eq!(ctl.next_deadline(), None);

        assert_eq!(rec.log().stop_all_calls, stops);

        assert_eq!(ctl.resume(now, &mut caps), Some(RoundEvent::Playing { repeat: 2, of: 3 }));
        assert_eq!(ctl.pending(), None);
        assert!(!ctl.is_paused());
        // the replayed repeat starts its own session
        assert_eq!(rec.log().stop_all_calls, stops + 1);
    }

    #[test]
    fn pause_between_repeats_holds_the_next_one() {
        let rec = Recorder::default();
        let mut caps = rec.capabilities();
        let mut ctl = controller();
        let mut now = Duration::ZERO;

        ctl.begin(CALL, params(), phrases(), now, &mut caps);
        drive_until(&mut ctl, &mut caps, &mut now, |e| matches!(e, RoundEvent::Playing { .. }));
        // finish repeat 1 → gap
        now = ctl.next_deadline().unwrap();
        assert_eq!(ctl.tick(now, &mut caps), None);
        assert_eq!(ctl.phase(), Phase::Gap { next: 1 });

        ctl.pause(&mut caps);
        assert_eq!(ctl.phase(), Phase::Gap { next: 1 });
        let gap_end = ctl.next_deadline().unwrap();
        assert_eq!(ctl.tick(gap_end, &mut caps), Some(RoundEvent::Paused));
        assert_eq!(ctl.pending(), Some(Step::Repeat(1)));

        assert_eq!(ctl.resume(gap_end, &mut caps), Some(RoundEvent::Playing { repeat: 2, of: 2 }));
    }

    #[test]
    fn quick_pause_resume_does_not_duplicate_steps() {
        let rec = Recorder::default();
        let mut caps = rec.capabilities();
        let mut ctl = controller();
        let mut now = Duration::ZERO;

        ctl.begin(CALL, params(), phrases(), now, &mut caps);
        drive_until(&mut ctl, &mut caps, &mut now, |e| matches!(e, RoundEvent::Playing { .. }));
        now = ctl.next_deadline().unwrap();
        ctl.tick(now, &mut caps);

        for _ in 0..5 {
            ctl.pause(&mut caps);
            assert_eq!(ctl.resume(now, &mut caps), None);
        }
        let events = drive(&mut ctl, &mut caps, &mut now);
        let plays = events.iter().filter(|(_, e)| matches!(e, RoundEvent::Playing { .. })).count();
        assert_eq!(plays, 1);
        assert!(matches!(events.last(), Some((_, RoundEvent::Revealed(_)))));
    }

    #[test]
    fn spoken_pre_call_waits_for_speech() {
        let rec = Recorder::with_speech();
        let mut caps = rec.capabilities();
        let mut ctl = controller();
        let p = PlaybackParams { pre_call: PreCallMode::Speech, ..params() };
        let mut now = Duration::ZERO;

        ctl.begin(CALL, p.clone(), phrases(), now, &mut caps);
        assert_eq!(rec.log().spoken, ["Attention"]);
        assert!(rec.log().plays.is_empty());

        now += Duration::from_secs(5);
        assert_eq!(ctl.tick(now, &mut caps), None);
        assert_eq!(ctl.phase(), Phase::PreCall { speaking: true });

        rec.finish_speaking();
        assert_eq!(ctl.tick(now, &mut caps), None);
        assert_eq!(ctl.phase(), Phase::Waiting);
        assert_eq!(ctl.next_deadline(), Some(now + p.call_delay));
    }

    #[test]
    fn missing_speech_skips_spoken_pre_call() {
        let rec = Recorder::default();
        let mut caps = rec.capabilities();
        let mut ctl = controller();
        let p = PlaybackParams { pre_call: PreCallMode::Speech, ..params() };

        ctl.begin(CALL, p, phrases(), Duration::ZERO, &mut caps);
        assert_eq!(ctl.next_deadline(), Some(Duration::ZERO));
        ctl.tick(Duration::ZERO, &mut caps);
        assert_eq!(ctl.phase(), Phase::Waiting);
    }

    #[test]
    fn reveal_spells_the_call() {
        let rec = Recorder::with_speech();
        let mut caps = rec.capabilities();
        let mut ctl = controller();
        let mut now = Duration::ZERO;

        ctl.begin(CALL, params(), phrases(), now, &mut caps);
        drive(&mut ctl, &mut caps, &mut now);
        assert_eq!(rec.log().spoken.last().unwrap(), "Solution D L 1 A B C");
    }

    #[test]
    fn auto_mode_advances_after_pause() {
        let mut caps = Capabilities::none();
        let mut ctl = controller();
        let p = PlaybackParams { auto_mode: true, ..params() };
        let mut now = Duration::ZERO;

        ctl.begin(CALL, p.clone(), phrases(), now, &mut caps);
        let revealed = drive_until(&mut ctl, &mut caps, &mut now, |e| matches!(e, RoundEvent::Revealed(_)));
        assert_eq!(revealed, RoundEvent::Revealed(CALL.into()));
        let at = now;
        let events = drive(&mut ctl, &mut caps, &mut now);
        assert_eq!(events, [(at + p.pause, RoundEvent::Advance)]);
        assert_eq!(ctl.phase(), Phase::Idle);
    }

    #[test]
    fn switching_auto_off_keeps_the_solution_up() {
        let mut caps = Capabilities::none();
        let mut ctl = controller();
        let mut now = Duration::ZERO;

        ctl.begin(CALL, PlaybackParams { auto_mode: true, ..params() }, phrases(), now, &mut caps);
        drive_until(&mut ctl, &mut caps, &mut now, |e| matches!(e, RoundEvent::Revealed(_)));
        ctl.set_auto(false, now);
        assert_eq!(ctl.next_deadline(), None);
        assert_eq!(ctl.phase(), Phase::Revealed);
    }

    #[test]
    fn switching_auto_off_drops_a_held_advance() {
        let mut caps = Capabilities::none();
        let mut ctl = controller();
        let p = PlaybackParams { auto_mode: true, ..params() };
        let mut now = Duration::ZERO;

        ctl.begin(CALL, p.clone(), phrases(), now, &mut caps);
        drive_until(&mut ctl, &mut caps, &mut now, |e| matches!(e, RoundEvent::Revealed(_)));
        ctl.pause(&mut caps);
        now += p.pause;
        assert_eq!(ctl.tick(now, &mut caps), Some(RoundEvent::Paused));
        assert_eq!(ctl.pending(), Some(Step::Advance));

        ctl.set_auto(false, now);
        assert_eq!(ctl.pending(), None);
        assert_eq!(ctl.phase(), Phase::Revealed);

        // manual: the solution stays up after resuming
        assert_eq!(ctl.resume(now, &mut caps), None);
        assert_eq!(ctl.next_deadline(), None);
        assert_eq!(ctl.tick(now + Duration::from_secs(100), &mut caps), None);
        assert_eq!(ctl.phase(), Phase::Revealed);
    }

    #[test]
    fn switching_auto_on_while_paused_advances_on_resume() {
        let mut caps = Capabilities::none();
        let mut ctl = controller();
        let mut now = Duration::ZERO;

        ctl.begin(CALL, params(), phrases(), now, &mut caps);
        drive_until(&mut ctl, &mut caps, &mut now, |e| matches!(e, RoundEvent::Revealed(_)));
        ctl.pause(&mut caps);
        ctl.set_auto(true, now);
        assert_eq!(ctl.pending(), Some(Step::Advance));

        assert_eq!(ctl.resume(now, &mut caps), Some(RoundEvent::Advance));
        assert_eq!(ctl.phase(), Phase::Idle);
    }

    #[test]
    fn switching_auto_on_over_a_revealed_round_advances_next_tick() {
        let mut caps = Capabilities::none();
        let mut ctl = controller();
        let mut now = Duration::ZERO;

        ctl.begin(CALL, params(), phrases(), now, &mut caps);
        drive_until(&mut ctl, &mut caps, &mut now, |e| matches!(e, RoundEvent::Revealed(_)));
        ctl.set_auto(true, now);
        assert_eq!(ctl.next_deadline(), Some(now));
        assert_eq!(ctl.tick(now, &mut caps), Some(RoundEvent::Advance));
    }

    #[test]
    fn runs_without_any_audio_backend() {
        let mut caps = Capabilities::none();
        let mut ctl = controller();
        let mut now = Duration::ZERO;

        ctl.begin(CALL, params(), phrases(), now, &mut caps);
        let events = drive(&mut ctl, &mut caps, &mut now);
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].1, RoundEvent::Revealed(CALL.into()));
    }

    #[test]
    fn begin_supersedes_running_round() {
        let rec = Recorder::default();
        let mut caps = rec.capabilities();
        let mut ctl = controller();
        let mut now = Duration::ZERO;

        ctl.begin(CALL, params(), phrases(), now, &mut caps);
        drive_until(&mut ctl, &mut caps, &mut now, |e| matches!(e, RoundEvent::Playing { .. }));
        ctl.pause(&mut caps);

        ctl.begin("K5ZD", params(), phrases(), now, &mut caps);
        assert!(!ctl.is_paused());
        assert_eq!(ctl.pending(), None);
        assert_eq!(ctl.phase(), Phase::PreCall { speaking: false });
        assert_eq!(rec.log().mixer.active_sources(), 0);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut caps = Capabilities::none();
        let mut ctl = controller();
        ctl.stop(&mut caps);
        ctl.stop(&mut caps);
        ctl.pause(&mut caps);
        assert!(!ctl.is_paused());
        assert_eq!(ctl.phase(), Phase::Idle);
    }
}
