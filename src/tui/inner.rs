// src/tui/inner.rs  —  ratatui layout
use anyhow::{Context, Result};
use crossterm::{execute, terminal::{self, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use crate::i18n::I18n;
use crate::AppState;
use std::io::stdout;

pub struct Tui {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
}

impl Tui {
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode().context("Enabling raw mode")?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen).context("Entering alternate screen")?;
        let backend  = CrosstermBackend::new(out);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    pub fn cleanup(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
    }

    /// Labels come from `t` so a language change shows on the next frame
    pub fn draw(&mut self, s: &AppState, t: &I18n) -> Result<()> {
        self.terminal.draw(|f| {
            let area = f.area();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),  // header / settings bar
                    Constraint::Min(7),     // quiz
                    Constraint::Min(4),     // solutions
                    Constraint::Length(3),  // footer hints
                ])
                .split(area);

            // ── Header ────────────────────────────────────────────────────
            let q = &s.quiz;
            let mode = if q.auto_mode { t.t("mode.auto") } else { t.t("mode.manual") };
            let noise = s.noise_kind
                .map(|k| format!("{:?} {}", k, s.noise_level).to_lowercase())
                .unwrap_or_default();
            let header = Paragraph::new(vec![
                Line::from(format!(
                    " {}  |  {}/{} WPM  |  {}  QSB {}  QRM {}  |  {}  |  {}",
                    t.t("app.title"), s.wpm, s.farnsworth_wpm,
                    noise, s.qsb_level, s.qrm_level, mode, t.lang_name()
                )),
                Line::from(format!(
                    " {}:  ◂ {}  {} ▸",
                    t.t("label.setting"), t.t(s.setting.key()), s.setting_value
                )),
            ])
            .style(Style::default().fg(Color::Black).bg(Color::Cyan)
                   .add_modifier(Modifier::BOLD));
            f.render_widget(header, chunks[0]);

            // ── Quiz ──────────────────────────────────────────────────────
            let answer = match &q.revealed {
                Some(call) => Span::styled(
                    call.clone(),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                None if q.started => Span::styled("? ? ?", Style::default().fg(Color::DarkGray)),
                None => Span::raw(""),
            };
            let progress = match (q.started, q.repeat) {
                (true, Some((k, n))) => format!("{} / {}   ×{k}/{n}", q.position, q.len),
                (true, None)         => format!("{} / {}", q.position, q.len),
                (false, _)           => format!("{} / {}", 0, q.len),
            };
            let tone = q.frequency.map(|hz| format!("{hz} Hz")).unwrap_or_default();
            let status_style = if q.paused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Magenta)
            };
            let quiz_lines = vec![
                Line::from(answer).alignment(Alignment::Center),
                Line::from(""),
                Line::from(vec![
                    Span::styled(format!("{}:  ", t.t("label.status")), Style::default().fg(Color::DarkGray)),
                    Span::styled(s.status.clone(), status_style),
                ]),
                Line::from(vec![
                    Span::styled(progress, Style::default().fg(Color::White)),
                    Span::raw("   "),
                    Span::styled(tone, Style::default().fg(Color::Cyan)),
                ]),
            ];
            let quiz_block = Paragraph::new(quiz_lines)
                .block(Block::default()
                    .title(format!(" {} ", t.t("label.quiz")))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)));
            f.render_widget(quiz_block, chunks[1]);

            // ── Solutions ─────────────────────────────────────────────────
            let history: Vec<Line> = q.history.iter()
                .map(|c| Line::from(Span::styled(c.clone(), Style::default().fg(Color::Green))))
                .collect();
            let history_block = Paragraph::new(history)
                .block(Block::default()
                    .title(format!(" {} ", t.t("label.history")))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green)));
            f.render_widget(history_block, chunks[2]);

            // ── Footer ────────────────────────────────────────────────────
            let hint = match (q.started, q.auto_mode) {
                (false, _)    => t.t("hint.idle"),
                (true, true)  => t.t("hint.auto"),
                (true, false) => t.t("hint.manual"),
            };
            let footer = Paragraph::new(format!(" {hint}"))
                .style(Style::default().fg(Color::DarkGray).bg(Color::Black));
            f.render_widget(footer, chunks[3]);
        })?;
        Ok(())
    }
}
