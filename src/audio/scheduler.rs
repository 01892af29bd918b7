// src/audio/scheduler.rs  -  Symbol string → tone events on a virtual clock
use crate::morse::Timing;
use rand::Rng;
use std::time::Duration;

/// Fade-in and fade-out applied to every tone to keep keying click-free
pub const RAMP: Duration = Duration::from_millis(5);

/// One keyed tone, relative to the start of its transmission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneEvent {
    pub offset:    Duration,
    pub duration:  Duration,
    pub hz:        f32,
    /// Peak level after the QSB draw (0.0..=1.0)
    pub amplitude: f32,
}

/// Everything needed to play one string of Morse, computed up front
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transmission {
    pub tones:    Vec<ToneEvent>,
    /// Time from the first tone's start until the trailing gap has elapsed
    pub duration: Duration,
}

/// QSB: each tone gets a level drawn from `[1 - depth/100, 1]`
pub fn qsb_amplitude<R: Rng>(fade_depth: u8, rng: &mut R) -> f32 {
    if fade_depth == 0 {
        return 1.0;
    }
    let floor = 1.0 - f32::from(fade_depth.min(100)) / 100.0;
    rng.gen_range(floor..=1.0)
}

/// Lay out `symbols` ('.', '-', ' ') as tone events.
///
/// The clock advances by the tone length plus one unit after every dot or
/// dash, and by three Farnsworth units for every space.
pub fn schedule<R: Rng>(
    symbols:    &str,
    timing:     &Timing,
    hz:         f32,
    fade_depth: u8,
    rng:        &mut R,
) -> Transmission {
    let mut clock = Duration::ZERO;
    let mut tones = Vec::new();

    for sym in symbols.chars() {
        let len = match sym {
            '.' => timing.dot(),
            '-' => timing.dash(),
            ' ' => {
                clock += timing.char_space();
                continue;
            }
            _ => continue,
        };
        tones.push(ToneEvent {
            offset:    clock,
            duration:  len,
            hz,
            amplitude: qsb_amplitude(fade_depth, rng),
        });
        clock += len + timing.symbol_gap();
    }

    Transmission { tones, duration: clock }
}
