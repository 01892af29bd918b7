// src/main.rs  —  callsign-trainer  entry point
mod audio;
mod config;
mod i18n;
mod morse;
mod quiz;
mod tui;

use anyhow::{ensure, Result};
use clap::Parser;
use config::{AppConfig, Cli, NoiseKind, Setting};
use i18n::I18n;
use quiz::playback::{self, PlaybackParams};
use quiz::{callsigns, Capabilities, CommandSpeech, NullSpeech, NullWakeLock, Quiz, QuizState, RoundEvent};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::{Duration, Instant};

/// Sent by --test-morse, and by --wav unless --call is given
const TEST_CALL: &str = "DL1ZBC";

// ── Shared UI state (passed to TUI draw) ─────────────────────────────────────
#[derive(Default, Clone)]
pub struct AppState {
    pub quiz:           QuizState,
    pub wpm:            u8,
    pub farnsworth_wpm: u8,
    pub noise_kind:     Option<NoiseKind>,
    pub noise_level:    u8,
    pub qsb_level:      u8,
    pub qrm_level:      u8,
    /// Setting the arrow keys change
    pub setting:        Setting,
    pub setting_value:  String,
    pub status:         String,
}

impl AppState {
    fn refresh(&mut self, quiz: &Quiz) {
        let cfg = quiz.config();
        self.quiz           = quiz.state();
        self.wpm            = cfg.wpm;
        self.farnsworth_wpm = cfg.farnsworth_wpm;
        self.noise_kind     = Some(cfg.noise_kind);
        self.noise_level    = cfg.noise_level;
        self.qsb_level      = cfg.qsb_level;
        self.qrm_level      = cfg.qrm_level;
        self.setting_value  = self.setting.value(cfg);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // ── --print-config  ───────────────────────────────────────────────────────
    if cli.print_config {
        print!("{}", config::DEFAULT_CONFIG_TOML);
        return Ok(());
    }

    // ── --write-config  ───────────────────────────────────────────────────────
    if cli.write_config {
        let path = AppConfig::write_default_config(&cli)?;
        println!("Config written to: {}", path.display());
        println!("Edit it to set speed, tone range, noise, language, etc.");
        return Ok(());
    }

    // ── Load config ───────────────────────────────────────────────────────────
    // `stored` is the file layer; UI changes go there so CLI overrides stay out
    let stored = AppConfig::from_file(&cli)?;
    let cfg = stored.with_cli(&cli);
    let lang = I18n::new(&cfg.language);
    let mut rng = SmallRng::from_entropy();

    // ── --generate-callsigns  ─────────────────────────────────────────────────
    if let Some(path) = &cli.generate_callsigns {
        let list = callsigns::generate(&mut rng, 10_000, 10_000);
        callsigns::save(path, &list)?;
        println!("{} call signs written to {}", list.len(), path.display());
        return Ok(());
    }

    // ── --wav  ────────────────────────────────────────────────────────────────
    if let Some(path) = &cli.wav {
        let call = cli.call.as_deref().unwrap_or(TEST_CALL).to_uppercase();
        let params = PlaybackParams::from_config(&cfg, pick_tone(&cfg, &mut rng));
        let tx = playback::call_transmission(&call, &params, &mut rng);
        let mut mixer = audio::Mixer::new(audio::wav::WAV_SAMPLE_RATE, cfg.volume);
        let backdrop = audio::wav::Backdrop {
            noise_kind:  cfg.noise_kind,
            noise_level: cfg.noise_level,
            qrm_level:   cfg.qrm_level,
            lead_in:     cfg.morse_delay(),
        };
        let samples = audio::wav::render(&mut mixer, &tx, &backdrop);
        audio::wav::write(path, &samples, audio::wav::WAV_SAMPLE_RATE)?;
        println!("{} @ {} Hz written to {}", call, params.tone_hz, path.display());
        return Ok(());
    }

    // ── --test-morse  ─────────────────────────────────────────────────────────
    if cli.test_morse {
        println!("{}: {}", lang.t("test_morse"), TEST_CALL);
        let mut out = audio::create_audio(cfg.volume);
        let params = PlaybackParams::from_config(&cfg, pick_tone(&cfg, &mut rng));
        let (layers, length) = playback::send(out.as_mut(), TEST_CALL, &params, &mut rng);
        let tail = out.now() + length + audio::NOISE_TAIL;
        for h in layers {
            out.stop_at(h, tail);
        }
        thread::sleep(length + audio::NOISE_TAIL);
        out.stop_all();
        return Ok(());
    }

    // ── Call-sign list ────────────────────────────────────────────────────────
    let list = match load_callsigns(&cfg, &mut rng) {
        Ok(list) => list,
        Err(e) => {
            eprintln!("{}: {e:#}", lang.t("error_loading"));
            std::process::exit(1);
        }
    };

    // ── Capabilities ──────────────────────────────────────────────────────────
    let speech: Box<dyn quiz::capabilities::Speech> = match CommandSpeech::new(&cfg.speech_command) {
        Some(s) => Box::new(s),
        None    => Box::new(NullSpeech),
    };
    let caps = Capabilities {
        audio:     audio::create_audio(cfg.volume),
        speech,
        wake_lock: Box::new(NullWakeLock),
    };

    // ── Quiz ──────────────────────────────────────────────────────────────────
    let mut quiz = Quiz::new(cfg.clone(), caps);
    quiz.set_queue(list);

    let mut state = AppState { status: lang.t("press_start").into(), ..Default::default() };
    state.refresh(&quiz);

    // ── TUI ───────────────────────────────────────────────────────────────────
    #[cfg(feature = "tui")]
    let mut tui = tui::Tui::new()?;
    #[cfg(feature = "tui")]
    let mut stored = stored;

    let epoch = Instant::now();

    // Without a terminal UI there are no keys, so drill straight away
    #[cfg(not(feature = "tui"))]
    if let Some(ev) = quiz.start(Duration::ZERO)? {
        state.status = describe(&ev, quiz.i18n());
    }

    // ── Main loop ─────────────────────────────────────────────────────────────
    let tick = Duration::from_millis(10);

    'main: loop {
        let now = epoch.elapsed();

        // ── Single crossterm event reader ─────────────────────────────────────
        #[cfg(feature = "tui")]
        {
            use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
            while event::poll(Duration::from_millis(0))? {
                let Event::Key(k) = event::read()? else { continue };
                if k.kind == KeyEventKind::Release {
                    continue;
                }

                // Escape, Q or Ctrl+C quit
                if matches!(k.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'))
                    || (k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL))
                {
                    break 'main;
                }

                let ev = match k.code {
                    KeyCode::Char('s') | KeyCode::Char('S') => {
                        if quiz.state().started {
                            quiz.stop();
                            state.status = quiz.i18n().t("press_start").into();
                            None
                        } else {
                            match quiz.start(now) {
                                Ok(ev) => ev,
                                Err(e) => {
                                    state.status = format!("{}: {e:#}", quiz.i18n().t("error_loading"));
                                    None
                                }
                            }
                        }
                    }
                    KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => {
                        let ev = quiz.toggle_pause(now);
                        if quiz.state().paused {
                            state.status = quiz.i18n().t("paused").into();
                        }
                        ev
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter => {
                        if quiz.config().auto_mode { None } else { quiz.next(now) }
                    }
                    KeyCode::Char('a') | KeyCode::Char('A') => {
                        let auto = !quiz.config().auto_mode;
                        let ev = quiz.set_auto(auto, now);
                        persist(&cli, &mut stored, quiz.config(), Setting::AutoMode);
                        ev
                    }
                    KeyCode::Char('+') | KeyCode::Up => {
                        change_setting(&mut quiz, &mut stored, &cli, Setting::Wpm, true, now)
                    }
                    KeyCode::Char('-') | KeyCode::Down => {
                        change_setting(&mut quiz, &mut stored, &cli, Setting::Wpm, false, now)
                    }
                    KeyCode::Tab     => { state.setting = state.setting.cycle(true); None }
                    KeyCode::BackTab => { state.setting = state.setting.cycle(false); None }
                    KeyCode::Left | KeyCode::Right => {
                        let up = k.code == KeyCode::Right;
                        let ev = change_setting(&mut quiz, &mut stored, &cli, state.setting, up, now);
                        // A different pool means a fresh queue
                        if state.setting == Setting::Category {
                            quiz.stop();
                            state.status = match load_callsigns(quiz.config(), &mut rng) {
                                Ok(list) => {
                                    quiz.set_queue(list);
                                    quiz.i18n().t("press_start").into()
                                }
                                Err(e) => format!("{}: {e:#}", quiz.i18n().t("error_loading")),
                            };
                            None
                        } else {
                            ev
                        }
                    }
                    _ => None,
                };
                if let Some(ev) = ev {
                    state.status = describe(&ev, quiz.i18n());
                }
            }
        }

        // Quiz tick
        if let Some(ev) = quiz.tick(now) {
            state.status = describe(&ev, quiz.i18n());
        }
        state.refresh(&quiz);

        // Draw TUI
        #[cfg(feature = "tui")]
        tui.draw(&state, quiz.i18n())?;

        thread::sleep(tick);
    }

    // ── Cleanup ───────────────────────────────────────────────────────────────
    quiz.stop();
    #[cfg(feature = "tui")]
    tui.cleanup();

    println!("\n73 de callsign-trainer!\n");
    Ok(())
}

/// The configured list, or a generated one, narrowed to the category
fn load_callsigns(cfg: &AppConfig, rng: &mut SmallRng) -> Result<Vec<String>> {
    let list = match &cfg.callsign_file {
        Some(path) => callsigns::load(path)?,
        None       => callsigns::generate(rng, 1_000, 1_000),
    };
    let list = callsigns::filter(list, cfg.category);
    ensure!(!list.is_empty(), "no call signs left for category {:?}", cfg.category);
    Ok(list)
}

fn pick_tone(cfg: &AppConfig, rng: &mut SmallRng) -> u32 {
    rng.gen_range(cfg.min_frequency..=cfg.max_frequency)
}

/// One status line per round event
fn describe(ev: &RoundEvent, lang: &I18n) -> String {
    match ev {
        RoundEvent::PreCall                => lang.t("new_call").to_string(),
        RoundEvent::Playing { repeat, of } => format!("{}  {repeat}/{of}", lang.t("playing")),
        RoundEvent::Paused                 => lang.t("paused").to_string(),
        RoundEvent::Revealed(call)         => format!("{}: {call}", lang.t("solution")),
        RoundEvent::Advance                => lang.t("new_round").to_string(),
    }
}

#[cfg(feature = "tui")]
fn change_setting(
    quiz: &mut Quiz,
    stored: &mut AppConfig,
    cli: &Cli,
    setting: Setting,
    up: bool,
    now: Duration,
) -> Option<RoundEvent> {
    let mut cfg = quiz.config().clone();
    setting.adjust(&mut cfg, up);
    let ev = quiz.set_config(cfg, now);
    persist(cli, stored, quiz.config(), setting);
    ev
}

/// Settings changed in the UI survive a restart.  Only `setting` is
/// written, on top of what the file already held.
#[cfg(feature = "tui")]
fn persist(cli: &Cli, stored: &mut AppConfig, current: &AppConfig, setting: Setting) {
    setting.copy(current, stored);
    if let Err(e) = stored.save(&config::config_path(cli)) {
        log::warn!("[config] {e:#}");
    }
}
