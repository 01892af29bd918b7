// src/tui/mod.rs  —  ratatui terminal interface
#[cfg(feature = "tui")]
mod inner;
#[cfg(feature = "tui")]
pub use inner::Tui;

#[cfg(not(feature = "tui"))]
#[allow(dead_code)]
pub struct Tui;
#[cfg(not(feature = "tui"))]
#[allow(dead_code)]
impl Tui {
    pub fn new() -> anyhow::Result<Self> { Ok(Self) }
    pub fn draw(&mut self, _state: &crate::AppState, _t: &crate::i18n::I18n) -> anyhow::Result<()> { Ok(()) }
    pub fn cleanup(&mut self) {}
}
