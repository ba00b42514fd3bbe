use std::collections::VecDeque;

use invaders::{GameState, MenuButton, MusicFlags, NetworkStats, Role, SoundCue};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

const MAX_LOG_LINES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn color(self) -> Color {
        match self {
            Self::Info => Color::White,
            Self::Warn => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

#[derive(Debug, Default)]
pub struct TuiState {
    log: VecDeque<(LogLevel, String)>,
    last_cues: SoundCue,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        if self.log.len() == MAX_LOG_LINES {
            self.log.pop_front();
        }
        self.log.push_back((level, message.into()));
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message);
    }

    pub fn log_warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message);
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message);
    }

    /// Keeps the most recent non-empty cue set on screen until the next one.
    pub fn record_cues(&mut self, cues: SoundCue) {
        if !cues.is_empty() {
            self.last_cues = cues;
        }
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }
}

/// Everything the panels show about the running session.
pub struct PeerStatus<'a> {
    pub role: Role,
    pub local_addr: String,
    pub remote_addr: String,
    pub uptime_secs: u64,
    pub state: GameState,
    pub menu: MenuButton,
    pub music: MusicFlags,
    pub enemies_alive: Option<u16>,
    pub stats: &'a NetworkStats,
}

pub fn render(frame: &mut Frame, tui: &TuiState, status: &PeerStatus) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], status);
    render_game(frame, chunks[1], tui, status);
    render_network(frame, chunks[2], status.stats);
    render_log(frame, chunks[3], tui);
    render_help(frame, chunks[4], status.role);
}

fn render_header(frame: &mut Frame, area: Rect, status: &PeerStatus) {
    let title = format!(
        " Invaders Peer ({}) - Uptime: {} ",
        status.role.as_str(),
        format_duration(status.uptime_secs)
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let text = format!("Local: {}  |  Peer: {}", status.local_addr, status.remote_addr);
    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn label(name: &str) -> Span<'_> {
    Span::styled(name, Style::default().fg(Color::Gray))
}

fn state_color(state: GameState) -> Color {
    match state {
        GameState::Connecting => Color::DarkGray,
        GameState::Playing => Color::Green,
        GameState::Win => Color::Cyan,
        GameState::Lose | GameState::Close => Color::Red,
        GameState::Menu | GameState::Paused => Color::Yellow,
    }
}

fn join_names<I: Iterator<Item = (&'static str, T)>, T>(names: I) -> String {
    let names: Vec<_> = names.map(|(name, _)| name.to_lowercase()).collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

fn render_game(frame: &mut Frame, area: Rect, tui: &TuiState, status: &PeerStatus) {
    let block = Block::default()
        .title(" Game ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let menu = match status.menu {
        MenuButton::Start => "start",
        MenuButton::Quit => "quit",
    };
    let enemies = status
        .enemies_alive
        .map_or_else(|| "-".to_string(), |n| n.to_string());

    let lines = vec![
        Line::from(vec![
            label("State: "),
            Span::styled(
                status.state.as_str(),
                Style::default()
                    .fg(state_color(status.state))
                    .add_modifier(Modifier::BOLD),
            ),
            label("  Menu: "),
            Span::raw(menu),
        ]),
        Line::from(vec![label("Enemies: "), Span::raw(enemies)]),
        Line::from(vec![
            label("Music: "),
            Span::raw(join_names(status.music.iter_names())),
        ]),
        Line::from(vec![
            label("Last cues: "),
            Span::raw(join_names(tui.last_cues.iter_names())),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_network(frame: &mut Frame, area: Rect, net: &NetworkStats) {
    let block = Block::default()
        .title(" Network ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let discarded = net.packets_discarded();
    let lines = vec![
        Line::from(vec![
            label("Packets: "),
            Span::styled(
                format!("{} sent / {} recv", net.packets_sent, net.packets_received),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            label("Bytes: "),
            Span::styled(
                format!(
                    "{} sent / {} recv",
                    format_bytes(net.bytes_sent),
                    format_bytes(net.bytes_received)
                ),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            label("Discarded: "),
            Span::styled(
                format!(
                    "{} (loss {}, stale {}, foreign {}, malformed {})",
                    discarded,
                    net.packets_dropped,
                    net.packets_stale,
                    net.packets_foreign,
                    net.packets_malformed
                ),
                Style::default().fg(if discarded > 0 {
                    Color::Red
                } else {
                    Color::White
                }),
            ),
        ]),
        Line::from(vec![
            label("Would block: "),
            Span::raw(net.would_block.to_string()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_log(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let block = Block::default()
        .title(" Log ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    let visible = area.height.saturating_sub(2) as usize;
    let skip = tui.log.len().saturating_sub(visible);
    let lines: Vec<Line> = tui
        .log
        .iter()
        .skip(skip)
        .map(|(level, message)| {
            Line::from(Span::styled(
                message.as_str(),
                Style::default().fg(level.color()),
            ))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help(frame: &mut Frame, area: Rect, role: Role) {
    let block = Block::default()
        .title(" Controls ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let text = match role {
        Role::Authoritative => {
            "Arrows/WASD move, Space fire, Enter select, P pause, Q/Esc quit"
        }
        Role::Replica => "Arrows/WASD move, Space fire, Q/Esc quit",
    };
    let paragraph = Paragraph::new(text).block(block).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    );

    frame.render_widget(paragraph, area);
}

fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{}B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1}MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_bounded() {
        let mut tui = TuiState::new();
        for i in 0..MAX_LOG_LINES + 10 {
            tui.log_info(format!("line {}", i));
        }
        assert_eq!(tui.log_len(), MAX_LOG_LINES);
        assert_eq!(tui.log.front().map(|(_, m)| m.as_str()), Some("line 10"));
    }

    #[test]
    fn empty_cues_keep_previous() {
        let mut tui = TuiState::new();
        tui.record_cues(SoundCue::SHIP_FIRE);
        tui.record_cues(SoundCue::empty());
        assert_eq!(tui.last_cues, SoundCue::SHIP_FIRE);
    }

    #[test]
    fn formats() {
        assert_eq!(format_duration(3725), "01:02:05");
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(2048), "2.0KB");
        assert_eq!(join_names(MusicFlags::empty().iter_names()), "-");
    }
}
