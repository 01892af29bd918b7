// src/quiz/callsigns.rs  -  Call-sign pool: JSON load, category filter, generator
use crate::config::CallsignCategory;
use anyhow::{ensure, Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;

/// German prefixes (DL, DB … DR)
pub static GERMAN_PREFIXES: &[&str] = &[
    "DL", "DB", "DC", "DD", "DE", "DF", "DG", "DH", "DJ", "DK", "DM", "DO", "DP", "DR",
];

pub static INTERNATIONAL_PREFIXES: &[&str] = &[
    "K", "N", "W", "AA", "AB", "AC",    // USA
    "VE", "VA", "VO", "VY",             // Canada
    "G", "M",                           // United Kingdom
    "F", "I", "JA", "VK", "ZS", "PY", "LU",
    "UA", "R",                          // Russia
    "ON", "OE", "HB9", "9A", "SM", "SP", "YV", "HS", "9M", "SU", "ZL",
];

/// Prefixes kept by the "europe" category
pub static EUROPE_PREFIXES: &[&str] = &[
    "DL", "DB", "DC", "DD", "DE", "DF", "DG", "DH", "DJ", "DK", "DM", "DO", "DP", "DR",
    "ON", "OE", "HB9", "9A", "SM", "SP", "G", "M", "F", "I", "UA", "R", "LU",
];

/// Prefix + region digit (unless the prefix carries one) + 2–3 letters
pub fn generate_callsign<R: Rng>(prefix: &str, rng: &mut R) -> String {
    let mut call = String::from(prefix);
    if !prefix.chars().any(|c| c.is_ascii_digit()) {
        call.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    for _ in 0..rng.gen_range(2..=3) {
        call.push(char::from(b'A' + rng.gen_range(0..26u8)));
    }
    call
}

/// `german` calls with German prefixes plus `international` others, shuffled
pub fn generate<R: Rng>(rng: &mut R, german: usize, international: usize) -> Vec<String> {
    let mut out = Vec::with_capacity(german + international);
    for (prefixes, n) in [(GERMAN_PREFIXES, german), (INTERNATIONAL_PREFIXES, international)] {
        for _ in 0..n {
            if let Some(p) = prefixes.choose(rng) {
                out.push(generate_callsign(p, rng));
            }
        }
    }
    out.shuffle(rng);
    out
}

/// Parse a JSON array of call signs; entries are trimmed and uppercased
pub fn parse(raw: &str) -> Result<Vec<String>> {
    let list: Vec<String> = serde_json::from_str(raw)
        .context("Call-sign list must be a JSON array of strings")?;
    let list: Vec<String> = list
        .iter()
        .map(|c| c.trim().to_ascii_uppercase())
        .filter(|c| !c.is_empty())
        .collect();
    ensure!(!list.is_empty(), "Call-sign list is empty");
    Ok(list)
}

pub fn load(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Reading call-sign list {:?}", path))?;
    parse(&raw).with_context(|| format!("Parsing call-sign list {:?}", path))
}

pub fn save(path: &Path, list: &[String]) -> Result<()> {
    let raw = serde_json::to_string_pretty(list).context("Serializing call-sign list")?;
    std::fs::write(path, raw)
        .with_context(|| format!("Writing call-sign list {:?}", path))
}

/// Apply the category rule; "international" keeps everything
pub fn filter(list: Vec<String>, category: CallsignCategory) -> Vec<String> {
    match category {
        CallsignCategory::International => list,
        CallsignCategory::Europe => list
            .into_iter()
            .filter(|call| EUROPE_PREFIXES.iter().any(|p| call.starts_with(p)))
            .collect(),
    }
}
