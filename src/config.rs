// src/config.rs  -  Runtime configuration (CLI + TOML)
use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::audio::noise::QRM_MAX_LEVEL;

/// The example config is embedded directly in the binary at compile time.
/// Users can write it out with:  callsign-trainer --write-config
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config.toml.example");

// ── CLI ───────────────────────────────────────────────────────────────────────
#[derive(Parser, Debug, Default)]
#[command(
    name        = "callsign-trainer",
    about       = "Call-sign copying trainer  |  Morse with QSB, QRM and QRN",
    version,
)]
pub struct Cli {
    /// Config file path (default: ~/.config/callsign-trainer/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Character speed in WPM (5–50, default: 20)
    #[arg(long)]
    pub wpm: Option<u8>,

    /// Farnsworth (overall) speed in WPM; spacing is stretched to this speed
    #[arg(long)]
    pub farnsworth_wpm: Option<u8>,

    /// Lowest tone frequency in Hz; each round picks a tone in [min, max]
    #[arg(long)]
    pub min_freq: Option<u32>,

    /// Highest tone frequency in Hz
    #[arg(long)]
    pub max_freq: Option<u32>,

    /// Output volume 0.0–1.0
    #[arg(long)]
    pub volume: Option<f32>,

    /// Background noise: white | pink | brown | qrn | qrm
    #[arg(long)]
    pub noise: Option<NoiseKind>,

    /// Noise level 0–100
    #[arg(long)]
    pub noise_level: Option<u8>,

    /// QSB (fading) depth 0–100
    #[arg(long)]
    pub qsb: Option<u8>,

    /// QRM (competing carrier) level 0–73
    #[arg(long)]
    pub qrm: Option<u8>,

    /// How often each call sign is sent (1–10)
    #[arg(long)]
    pub repeat: Option<u8>,

    /// Seconds between repeats and before auto-advance (1–10)
    #[arg(long)]
    pub pause: Option<f32>,

    /// Seconds from the announcement to the first call sign (0–10)
    #[arg(long)]
    pub call_delay: Option<f32>,

    /// Seconds of noise before each transmission (0–10)
    #[arg(long)]
    pub morse_delay: Option<f32>,

    /// Seconds from the last transmission to the solution (0–10)
    #[arg(long)]
    pub solution_delay: Option<f32>,

    /// Announcement before each call sign: vvv | speech
    #[arg(long)]
    pub pre_call: Option<PreCallMode>,

    /// Call-sign pool: international | europe
    #[arg(long)]
    pub category: Option<CallsignCategory>,

    /// JSON file holding an array of call signs (default: generated list)
    #[arg(long)]
    pub callsigns: Option<PathBuf>,

    /// UI language: en | de | fr | it
    #[arg(long)]
    pub lang: Option<String>,

    /// Advance to the next call sign automatically
    #[arg(long, action, conflicts_with = "manual")]
    pub auto: bool,

    /// Wait for N before each new call sign
    #[arg(long, action)]
    pub manual: bool,

    /// Text-to-speech command; the text is appended as last argument,
    /// {voice} is replaced by the language's voice (e.g. "espeak-ng -v {voice}")
    #[arg(long)]
    pub speech: Option<String>,

    /// Play the test call sign once with the current settings and exit
    #[arg(long, action)]
    pub test_morse: bool,

    /// Render one transmission to a WAV file and exit
    #[arg(long)]
    pub wav: Option<PathBuf>,

    /// Call sign used by --wav (default: DL1ZBC)
    #[arg(long)]
    pub call: Option<String>,

    /// Write a freshly generated call-sign list (JSON) and exit
    #[arg(long)]
    pub generate_callsigns: Option<PathBuf>,

    /// Write the built-in default config.toml to the config path and exit.
    /// Use --config <PATH> to write to a custom location.
    #[arg(long, action)]
    pub write_config: bool,

    /// Print the built-in default config.toml to stdout and exit
    #[arg(long, action)]
    pub print_config: bool,
}

// ── Enums shared across CLI + TOML ────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// Uniform random samples
    White,
    /// 1/f noise, closest to band noise on a receiver
    Pink,
    /// Deep rumble
    Brown,
    /// Static crashes
    Qrn,
    /// A steady carrier near the CW tone
    Qrm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PreCallMode { Vvv, Speech }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CallsignCategory { International, Europe }

// ── TOML file structure ───────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    pub general: Option<GeneralCfg>,
    pub morse:   Option<MorseCfg>,
    pub noise:   Option<NoiseCfg>,
    pub timing:  Option<TimingCfg>,
    pub speech:  Option<SpeechCfg>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralCfg {
    pub language:      Option<String>,
    pub auto_mode:     Option<bool>,
    pub category:      Option<CallsignCategory>,
    pub callsign_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorseCfg {
    /// Character speed (WPM)
    pub wpm:            Option<u8>,
    /// Overall speed (WPM) for character spacing
    pub farnsworth_wpm: Option<u8>,
    pub min_frequency:  Option<u32>,
    pub max_frequency:  Option<u32>,
    pub volume:         Option<f32>,
    pub pre_call:       Option<PreCallMode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseCfg {
    pub kind:  Option<NoiseKind>,
    pub level: Option<u8>,
    pub qsb:   Option<u8>,
    pub qrm:   Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingCfg {
    pub repeat_count:     Option<u8>,
    pub pause_s:          Option<f32>,
    pub call_delay_s:     Option<f32>,
    pub morse_delay_s:    Option<f32>,
    pub solution_delay_s: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechCfg {
    pub command: Option<String>,
}

// ── Resolved / merged config ──────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub language:         String,
    pub auto_mode:        bool,
    pub category:         CallsignCategory,
    /// Empty = use a generated list
    pub callsign_file:    Option<PathBuf>,
    /// Character speed
    pub wpm:              u8,
    /// Overall speed; never above `wpm`
    pub farnsworth_wpm:   u8,
    pub min_frequency:    u32,
    pub max_frequency:    u32,
    pub volume:           f32,
    pub pre_call:         PreCallMode,
    pub noise_kind:       NoiseKind,
    pub noise_level:      u8,
    pub qsb_level:        u8,
    pub qrm_level:        u8,
    pub repeat_count:     u8,
    /// Between repeats, and before auto-advance
    pub pause_s:          f32,
    /// Pre-call end → first call sign
    pub call_delay_s:     f32,
    /// Noise-only lead-in before each transmission
    pub morse_delay_s:    f32,
    /// Last transmission → solution
    pub solution_delay_s: f32,
    pub speech_command:   String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language:         "en".into(),
            auto_mode:        true,
            category:         CallsignCategory::International,
            callsign_file:    None,
            wpm:              20,
            farnsworth_wpm:   20,
            min_frequency:    600,
            max_frequency:    800,
            volume:           0.7,
            pre_call:         PreCallMode::Vvv,
            noise_kind:       NoiseKind::Pink,
            noise_level:      24,
            qsb_level:        24,
            qrm_level:        0,
            repeat_count:     3,
            pause_s:          5.0,
            call_delay_s:     1.0,
            morse_delay_s:    2.0,
            solution_delay_s: 4.0,
            speech_command:   String::new(),
        }
    }
}

// ── Config loader ─────────────────────────────────────────────────────────────
impl AppConfig {
    /// Write the embedded default config to disk.
    /// Returns the path it was written to.
    pub fn write_default_config(cli: &Cli) -> Result<PathBuf> {
        let path = config_path(cli);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Creating config directory {:?}", parent))?;
        }
        std::fs::write(&path, DEFAULT_CONFIG_TOML)
            .with_context(|| format!("Writing config to {:?}", path))?;
        Ok(path)
    }

    /// Defaults, then the config file, then the command line
    pub fn load(cli: &Cli) -> Result<Self> {
        Ok(Self::from_file(cli)?.with_cli(cli))
    }

    /// Defaults overlaid with the config file only.  This is the layer
    /// that settings changed in the UI are written back to.
    pub fn from_file(cli: &Cli) -> Result<Self> {
        let mut cfg = Self::default();
        let path = config_path(cli);
        if path.exists() {
            cfg.apply_file(&read_file_config(&path)?);
        } else {
            log::info!(
                "No config file at {}; using defaults (`callsign-trainer --write-config` creates one)",
                path.display()
            );
        }
        // Out-of-range values snap to the nearest bound
        cfg.clamp();
        Ok(cfg)
    }

    /// This config with the command-line overrides on top
    pub fn with_cli(&self, cli: &Cli) -> Self {
        let mut cfg = self.clone();
        cfg.apply_cli(cli);
        cfg.clamp();
        cfg
    }

    /// Persist the current settings (used when they change inside the UI)
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(&self.to_file())
            .context("Serializing config")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Creating config directory {:?}", parent))?;
        }
        std::fs::write(path, raw)
            .with_context(|| format!("Writing config to {:?}", path))?;
        log::debug!("[config] saved to {}", path.display());
        Ok(())
    }

    fn apply_file(&mut self, fc: &FileConfig) {
        if let Some(g) = &fc.general {
            if let Some(v) = &g.language      { self.language      = v.clone(); }
            if let Some(v) = g.auto_mode      { self.auto_mode     = v; }
            if let Some(v) = g.category       { self.category      = v; }
            if let Some(v) = &g.callsign_file { self.callsign_file = Some(v.clone()); }
        }
        if let Some(m) = &fc.morse {
            if let Some(v) = m.wpm            { self.wpm            = v; }
            if let Some(v) = m.farnsworth_wpm { self.farnsworth_wpm = v; }
            if let Some(v) = m.min_frequency  { self.min_frequency  = v; }
            if let Some(v) = m.max_frequency  { self.max_frequency  = v; }
            if let Some(v) = m.volume         { self.volume         = v; }
            if let Some(v) = m.pre_call       { self.pre_call       = v; }
        }
        if let Some(n) = &fc.noise {
            if let Some(v) = n.kind  { self.noise_kind  = v; }
            if let Some(v) = n.level { self.noise_level = v; }
            if let Some(v) = n.qsb   { self.qsb_level   = v; }
            if let Some(v) = n.qrm   { self.qrm_level   = v; }
        }
        if let Some(t) = &fc.timing {
            if let Some(v) = t.repeat_count     { self.repeat_count     = v; }
            if let Some(v) = t.pause_s          { self.pause_s          = v; }
            if let Some(v) = t.call_delay_s     { self.call_delay_s     = v; }
            if let Some(v) = t.morse_delay_s    { self.morse_delay_s    = v; }
            if let Some(v) = t.solution_delay_s { self.solution_delay_s = v; }
        }
        if let Some(s) = &fc.speech {
            if let Some(v) = &s.command { self.speech_command = v.clone(); }
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(v) = cli.wpm            { self.wpm            = v; }
        if let Some(v) = cli.farnsworth_wpm { self.farnsworth_wpm = v; }
        if let Some(v) = cli.min_freq       { self.min_frequency  = v; }
        if let Some(v) = cli.max_freq       { self.max_frequency  = v; }
        if let Some(v) = cli.volume         { self.volume         = v; }
        if let Some(v) = cli.noise          { self.noise_kind     = v; }
        if let Some(v) = cli.noise_level    { self.noise_level    = v; }
        if let Some(v) = cli.qsb            { self.qsb_level      = v; }
        if let Some(v) = cli.qrm            { self.qrm_level      = v; }
        if let Some(v) = cli.repeat         { self.repeat_count   = v; }
        if let Some(v) = cli.pause          { self.pause_s        = v; }
        if let Some(v) = cli.call_delay     { self.call_delay_s   = v; }
        if let Some(v) = cli.morse_delay    { self.morse_delay_s  = v; }
        if let Some(v) = cli.solution_delay { self.solution_delay_s = v; }
        if let Some(v) = cli.pre_call       { self.pre_call       = v; }
        if let Some(v) = cli.category       { self.category       = v; }
        if let Some(v) = &cli.callsigns     { self.callsign_file  = Some(v.clone()); }
        if let Some(v) = &cli.lang          { self.language       = v.clone(); }
        if let Some(v) = &cli.speech        { self.speech_command = v.clone(); }
        if cli.auto                         { self.auto_mode      = true; }
        if cli.manual                       { self.auto_mode      = false; }
    }

    /// Snap every numeric setting into its valid range
    pub fn clamp(&mut self) {
        let d = Self::default();
        self.wpm            = self.wpm.clamp(5, 50);
        self.farnsworth_wpm = self.farnsworth_wpm.clamp(5, self.wpm);
        self.repeat_count   = self.repeat_count.clamp(1, 10);
        self.noise_level    = self.noise_level.min(100);
        self.qsb_level      = self.qsb_level.min(100);
        self.qrm_level      = self.qrm_level.min(QRM_MAX_LEVEL);
        self.volume         = clamp_f32(self.volume, 0.0, 1.0, d.volume);

        self.pause_s          = clamp_f32(self.pause_s,          1.0, 10.0, d.pause_s);
        self.call_delay_s     = clamp_f32(self.call_delay_s,     0.0, 10.0, d.call_delay_s);
        self.morse_delay_s    = clamp_f32(self.morse_delay_s,    0.0, 10.0, d.morse_delay_s);
        self.solution_delay_s = clamp_f32(self.solution_delay_s, 0.0, 10.0, d.solution_delay_s);

        self.min_frequency = self.min_frequency.clamp(300, 1000);
        self.max_frequency = self.max_frequency.clamp(300, 1000);
        if self.min_frequency >= self.max_frequency {
            log::warn!(
                "[config] tone range {}–{} Hz is empty, using {}–{} Hz",
                self.min_frequency, self.max_frequency, d.min_frequency, d.max_frequency
            );
            self.min_frequency = d.min_frequency;
            self.max_frequency = d.max_frequency;
        }
    }

    pub fn pause(&self)          -> Duration { Duration::from_secs_f32(self.pause_s) }
    pub fn call_delay(&self)     -> Duration { Duration::from_secs_f32(self.call_delay_s) }
    pub fn morse_delay(&self)    -> Duration { Duration::from_secs_f32(self.morse_delay_s) }
    pub fn solution_delay(&self) -> Duration { Duration::from_secs_f32(self.solution_delay_s) }

    fn to_file(&self) -> FileConfig {
        FileConfig {
            general: Some(GeneralCfg {
                language:      Some(self.language.clone()),
                auto_mode:     Some(self.auto_mode),
                category:      Some(self.category),
                callsign_file: self.callsign_file.clone(),
            }),
            morse: Some(MorseCfg {
                wpm:            Some(self.wpm),
                farnsworth_wpm: Some(self.farnsworth_wpm),
                min_frequency:  Some(self.min_frequency),
                max_frequency:  Some(self.max_frequency),
                volume:         Some(self.volume),
                pre_call:       Some(self.pre_call),
            }),
            noise: Some(NoiseCfg {
                kind:  Some(self.noise_kind),
                level: Some(self.noise_level),
                qsb:   Some(self.qsb_level),
                qrm:   Some(self.qrm_level),
            }),
            timing: Some(TimingCfg {
                repeat_count:     Some(self.repeat_count),
                pause_s:          Some(self.pause_s),
                call_delay_s:     Some(self.call_delay_s),
                morse_delay_s:    Some(self.morse_delay_s),
                solution_delay_s: Some(self.solution_delay_s),
            }),
            speech: Some(SpeechCfg {
                command: Some(self.speech_command.clone()),
            }),
        }
    }
}

// ── Settings adjustable from the UI ───────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Setting {
    #[default]
    Wpm,
    FarnsworthWpm,
    MinFrequency,
    MaxFrequency,
    Noise,
    NoiseLevel,
    Qsb,
    Qrm,
    RepeatCount,
    Pause,
    CallDelay,
    MorseDelay,
    SolutionDelay,
    PreCall,
    Category,
    Language,
    /// Toggled with its own key, so not part of [`Setting::TUNABLE`]
    AutoMode,
}

impl Setting {
    /// Order in which Tab walks through the settings
    pub const TUNABLE: [Setting; 16] = [
        Setting::Wpm,
        Setting::FarnsworthWpm,
        Setting::Noise,
        Setting::NoiseLevel,
        Setting::Qsb,
        Setting::Qrm,
        Setting::PreCall,
        Setting::RepeatCount,
        Setting::Pause,
        Setting::CallDelay,
        Setting::MorseDelay,
        Setting::SolutionDelay,
        Setting::MinFrequency,
        Setting::MaxFrequency,
        Setting::Category,
        Setting::Language,
    ];

    /// Neighbour in [`Setting::TUNABLE`], wrapping at both ends
    pub fn cycle(self, forward: bool) -> Setting {
        let all = Self::TUNABLE;
        let i = all.iter().position(|s| *s == self).unwrap_or(0);
        let step = if forward { 1 } else { all.len() - 1 };
        all[(i + step) % all.len()]
    }

    /// i18n key of the label
    pub fn key(self) -> &'static str {
        match self {
            Setting::Wpm           => "setting.wpm",
            Setting::FarnsworthWpm => "setting.farnsworth_wpm",
            Setting::MinFrequency  => "setting.min_frequency",
            Setting::MaxFrequency  => "setting.max_frequency",
            Setting::Noise         => "setting.noise",
            Setting::NoiseLevel    => "setting.noise_level",
            Setting::Qsb           => "setting.qsb",
            Setting::Qrm           => "setting.qrm",
            Setting::RepeatCount   => "setting.repeat_count",
            Setting::Pause         => "setting.pause",
            Setting::CallDelay     => "setting.call_delay",
            Setting::MorseDelay    => "setting.morse_delay",
            Setting::SolutionDelay => "setting.solution_delay",
            Setting::PreCall       => "setting.pre_call",
            Setting::Category      => "setting.category",
            Setting::Language      => "setting.language",
            Setting::AutoMode      => "setting.auto_mode",
        }
    }

    /// Current value as shown in the UI
    pub fn value(self, cfg: &AppConfig) -> String {
        match self {
            Setting::Wpm           => format!("{} WPM", cfg.wpm),
            Setting::FarnsworthWpm => format!("{} WPM", cfg.farnsworth_wpm),
            Setting::MinFrequency  => format!("{} Hz", cfg.min_frequency),
            Setting::MaxFrequency  => format!("{} Hz", cfg.max_frequency),
            Setting::Noise         => variant_name(cfg.noise_kind),
            Setting::NoiseLevel    => cfg.noise_level.to_string(),
            Setting::Qsb           => cfg.qsb_level.to_string(),
            Setting::Qrm           => cfg.qrm_level.to_string(),
            Setting::RepeatCount   => format!("×{}", cfg.repeat_count),
            Setting::Pause         => format!("{:.1} s", cfg.pause_s),
            Setting::CallDelay     => format!("{:.1} s", cfg.call_delay_s),
            Setting::MorseDelay    => format!("{:.1} s", cfg.morse_delay_s),
            Setting::SolutionDelay => format!("{:.1} s", cfg.solution_delay_s),
            Setting::PreCall       => variant_name(cfg.pre_call),
            Setting::Category      => variant_name(cfg.category),
            Setting::Language      => cfg.language.clone(),
            Setting::AutoMode      => cfg.auto_mode.to_string(),
        }
    }

    /// Move one notch up (`up`) or down; choices cycle, toggles flip
    pub fn adjust(self, cfg: &mut AppConfig, up: bool) {
        let delta: i8 = if up { 1 } else { -1 };
        match self {
            Setting::Wpm           => cfg.wpm = cfg.wpm.saturating_add_signed(delta),
            Setting::FarnsworthWpm => cfg.farnsworth_wpm = cfg.farnsworth_wpm.saturating_add_signed(delta),
            Setting::MinFrequency  => {
                let v = cfg.min_frequency.saturating_add_signed(10 * delta as i32);
                cfg.min_frequency = v.min(cfg.max_frequency.saturating_sub(10));
            }
            Setting::MaxFrequency  => {
                let v = cfg.max_frequency.saturating_add_signed(10 * delta as i32);
                cfg.max_frequency = v.max(cfg.min_frequency + 10);
            }
            Setting::Noise         => cfg.noise_kind = next_variant(cfg.noise_kind, up),
            Setting::NoiseLevel    => cfg.noise_level = cfg.noise_level.saturating_add_signed(5 * delta),
            Setting::Qsb           => cfg.qsb_level = cfg.qsb_level.saturating_add_signed(5 * delta),
            Setting::Qrm           => cfg.qrm_level = cfg.qrm_level.saturating_add_signed(5 * delta),
            Setting::RepeatCount   => cfg.repeat_count = cfg.repeat_count.saturating_add_signed(delta),
            Setting::Pause         => cfg.pause_s += 0.5 * delta as f32,
            Setting::CallDelay     => cfg.call_delay_s += 0.5 * delta as f32,
            Setting::MorseDelay    => cfg.morse_delay_s += 0.5 * delta as f32,
            Setting::SolutionDelay => cfg.solution_delay_s += 0.5 * delta as f32,
            Setting::PreCall       => cfg.pre_call = next_variant(cfg.pre_call, up),
            Setting::Category      => cfg.category = next_variant(cfg.category, up),
            Setting::Language      => {
                let all = crate::i18n::LANGUAGES;
                let i = all.iter().position(|l| *l == cfg.language).unwrap_or(0);
                let step = if up { 1 } else { all.len() - 1 };
                cfg.language = all[(i + step) % all.len()].to_string();
            }
            Setting::AutoMode      => cfg.auto_mode = !cfg.auto_mode,
        }
        cfg.clamp();
    }

    /// Carry this one setting from `from` over into `to`
    pub fn copy(self, from: &AppConfig, to: &mut AppConfig) {
        match self {
            Setting::Wpm           => {
                to.wpm = from.wpm;
                to.farnsworth_wpm = to.farnsworth_wpm.min(from.wpm);
            }
            Setting::FarnsworthWpm => {
                to.wpm = to.wpm.max(from.farnsworth_wpm);
                to.farnsworth_wpm = from.farnsworth_wpm;
            }
            // The two bounds only make sense together
            Setting::MinFrequency | Setting::MaxFrequency => {
                to.min_frequency = from.min_frequency;
                to.max_frequency = from.max_frequency;
            }
            Setting::Noise         => to.noise_kind       = from.noise_kind,
            Setting::NoiseLevel    => to.noise_level      = from.noise_level,
            Setting::Qsb           => to.qsb_level        = from.qsb_level,
            Setting::Qrm           => to.qrm_level        = from.qrm_level,
            Setting::RepeatCount   => to.repeat_count     = from.repeat_count,
            Setting::Pause         => to.pause_s          = from.pause_s,
            Setting::CallDelay     => to.call_delay_s     = from.call_delay_s,
            Setting::MorseDelay    => to.morse_delay_s    = from.morse_delay_s,
            Setting::SolutionDelay => to.solution_delay_s = from.solution_delay_s,
            Setting::PreCall       => to.pre_call         = from.pre_call,
            Setting::Category      => to.category         = from.category,
            Setting::Language      => to.language         = from.language.clone(),
            Setting::AutoMode      => to.auto_mode        = from.auto_mode,
        }
        to.clamp();
    }
}

fn next_variant<T: clap::ValueEnum + PartialEq + Copy>(current: T, forward: bool) -> T {
    let all = T::value_variants();
    let i = all.iter().position(|v| *v == current).unwrap_or(0);
    let step = if forward { 1 } else { all.len() - 1 };
    all[(i + step) % all.len()]
}

fn variant_name<T: clap::ValueEnum>(v: T) -> String {
    v.to_possible_value()
        .map(|p| p.get_name().to_string())
        .unwrap_or_default()
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Reading config {:?}", path))?;
    toml::from_str(&raw)
        .with_context(|| format!("Parsing config {:?}", path))
}

fn clamp_f32(v: f32, lo: f32, hi: f32, fallback: f32) -> f32 {
    if v.is_finite() { v.clamp(lo, hi) } else { fallback }
}

/// `--config` if given, else the per-user default location
pub fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(default_config_path)
}

fn default_config_path() -> PathBuf {
    dirs_next().join("callsign-trainer").join("config.toml")
}

fn dirs_next() -> PathBuf {
    if let Ok(v) = std::env::var("XDG_CONFIG_HOME") { return PathBuf::from(v); }
    if let Ok(v) = std::env::var("APPDATA")          { return PathBuf::from(v); }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_default();
    PathBuf::from(home).join(".config")
}
