// src/morse/timing.rs  -  WPM → unit durations (PARIS standard)
use std::time::Duration;

/// Character unit plus the stretched Farnsworth unit used for spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub unit:            Duration,  // dot length at character speed
    pub farnsworth_unit: Duration,  // unit used for inter-character spaces
}

impl Timing {
    /// PARIS standard: unit = 1200 ms / wpm
    pub fn from_wpm(wpm: u8) -> Self {
        let unit = unit_for(wpm);
        Self { unit, farnsworth_unit: unit }
    }

    /// Farnsworth: characters at char_wpm, spacing at eff_wpm.
    /// The effective speed can only slow spacing down, never speed it up.
    pub fn farnsworth(char_wpm: u8, eff_wpm: u8) -> Self {
        let base = Self::from_wpm(char_wpm);
        Self {
            farnsworth_unit: unit_for(eff_wpm).max(base.unit),
            ..base
        }
    }

    pub fn dot(&self)  -> Duration { self.unit }
    pub fn dash(&self) -> Duration { self.unit * 3 }
    /// Gap after every dot or dash
    pub fn symbol_gap(&self) -> Duration { self.unit }
    /// Time consumed by one space in the symbol string
    pub fn char_space(&self) -> Duration { self.farnsworth_unit * 3 }
}

fn unit_for(wpm: u8) -> Duration {
    Duration::from_nanos(1_200_000_000 / u64::from(wpm.max(1)))
}
