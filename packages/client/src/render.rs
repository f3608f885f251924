//! Terminal rendering.
//!
//! One row per participant: a colored label followed by the waveform.
//! Columns play the role of pixels. The anchor column near the right edge
//! is "now"; earlier activity sits `(now - t) * px_per_second` columns to
//! its left and scrolls away as local time advances.

use std::ops::Range;

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span as TextSpan},
    widgets::{Paragraph, Widget},
};

use morsecast_server::domain::{Color as ParticipantColor, ParticipantId};

use crate::{
    app::{App, ConnectionStatus},
    domain::{ActiveInterval, Member},
    input::KeyMode,
};

/// Columns reserved for the participant label.
pub const LABEL_WIDTH: u16 = 12;
/// Columns between the "now" anchor and the right edge.
pub const ANCHOR_MARGIN: u16 = 4;
/// Waveform width assumed before the first frame.
pub const DEFAULT_WAVE_WIDTH: u16 = 80;
/// Closed spans narrower than this many columns are not drawn.
pub const MIN_CLOSED_SPAN: f64 = 0.5;

/// Waveform columns left once the label is drawn.
pub fn wave_width(total_width: u16) -> u16 {
    total_width.saturating_sub(LABEL_WIDTH)
}

/// Time-to-column mapping of the waveform area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u16,
    pub anchor: f64,
    pub px_per_second: f64,
}

/// Horizontal extent of a projected interval, clipped to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    /// Cells touched by the span.
    pub fn columns(&self) -> Range<u16> {
        (self.start.floor() as u16)..(self.end.ceil() as u16)
    }
}

impl Viewport {
    pub fn new(width: u16, px_per_second: f64) -> Self {
        Self {
            width,
            anchor: f64::from(width.saturating_sub(ANCHOR_MARGIN)),
            px_per_second,
        }
    }

    /// Time span covered by the full width, in milliseconds.
    pub fn visible_duration_ms(&self) -> f64 {
        if self.px_per_second <= 0.0 {
            return 0.0;
        }
        f64::from(self.width) / self.px_per_second * 1000.0
    }

    /// Column of local time `t_ms` when the anchor is at `now_ms`.
    pub fn x_at(&self, t_ms: f64, now_ms: f64) -> f64 {
        self.anchor - (now_ms - t_ms) / 1000.0 * self.px_per_second
    }

    /// Project an interval, or `None` when nothing of it is visible.
    pub fn project(&self, interval: &ActiveInterval, now_ms: f64) -> Option<Span> {
        let start = self.x_at(interval.start_ms, now_ms);
        let end = self.x_at(interval.end_ms, now_ms);

        let width = end - start;
        let too_narrow = if interval.open {
            width <= 0.0
        } else {
            width < MIN_CLOSED_SPAN
        };
        if too_narrow {
            return None;
        }

        let start = start.max(0.0);
        let end = end.min(f64::from(self.width));
        (end > start).then_some(Span { start, end })
    }
}

/// `#RRGGBB` to a terminal color.
fn rgb(color: &ParticipantColor) -> Color {
    let hex = color.as_str().trim_start_matches('#');
    let channel = |at: usize| {
        hex.get(at..at + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
    };
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Reset,
    }
}

struct Waveform<'a> {
    member: &'a Member,
    viewport: Viewport,
    now_ms: f64,
}

impl Widget for Waveform<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = rgb(&self.member.color);
        let width = area.width.min(self.viewport.width);

        // baseline
        for x in 0..width {
            if let Some(cell) = buf.cell_mut((area.x + x, area.y)) {
                cell.set_symbol("─").set_fg(Color::DarkGray);
            }
        }

        for interval in self.member.timeline.active_intervals(self.now_ms) {
            let Some(span) = self.viewport.project(&interval, self.now_ms) else {
                continue;
            };
            for x in span.columns().filter(|x| *x < width) {
                if let Some(cell) = buf.cell_mut((area.x + x, area.y)) {
                    cell.set_symbol("█").set_fg(color);
                }
            }
        }

        if self.member.timeline.current_state() {
            let anchor = self.viewport.anchor as u16;
            if anchor < width
                && let Some(cell) = buf.cell_mut((area.x + anchor, area.y))
            {
                cell.set_symbol("●").set_fg(color);
            }
        }
    }
}

fn status_line(app: &App) -> Line<'static> {
    let mut spans = match app.status() {
        ConnectionStatus::Connecting => vec![TextSpan::styled(
            "○ Connecting",
            Style::default().fg(Color::Yellow),
        )],
        ConnectionStatus::Connected => vec![TextSpan::styled(
            "● Connected",
            Style::default().fg(Color::Green),
        )],
        ConnectionStatus::Disconnected => vec![TextSpan::styled(
            "○ Disconnected, retrying",
            Style::default().fg(Color::Red),
        )],
    };

    if let Some(local) = app.roster().local() {
        spans.push(TextSpan::raw("   "));
        spans.push(TextSpan::styled(
            format!("You are User {}", local.id),
            Style::default()
                .fg(rgb(&local.color))
                .add_modifier(Modifier::BOLD),
        ));
    }

    Line::from(spans)
}

fn help_line(app: &App) -> Line<'static> {
    let key = match app.key_mode() {
        KeyMode::PressRelease => "[space] hold to key",
        KeyMode::Toggle => "[space] toggle key",
    };
    let mut text = format!("{}   [q] quit", key);
    if !app.tones().is_audible() {
        text.push_str("   (no audio)");
    }
    Line::styled(text, Style::default().fg(Color::DarkGray))
}

fn label(id: ParticipantId, member: &Member, is_local: bool) -> Line<'static> {
    let marker = if is_local { "▶" } else { " " };
    Line::styled(
        format!("{} User {}", marker, id),
        Style::default().fg(rgb(&member.color)),
    )
}

/// Draw the whole client screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let [status_area, rows_area, help_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    frame.render_widget(Paragraph::new(status_line(app)), status_area);
    frame.render_widget(Paragraph::new(help_line(app)), help_area);

    let local_id = app.roster().local().map(|local| local.id);
    let viewport = app.viewport();
    let now_ms = app.now_ms();

    // one row per participant, spaced by a blank line when there is room
    let stride = if app.roster().len() as u16 * 2 <= rows_area.height {
        2
    } else {
        1
    };
    for (row, (id, member)) in app.roster().members().enumerate() {
        let y = rows_area.y + row as u16 * stride;
        if y >= rows_area.bottom() {
            break;
        }

        let [label_area, wave_area] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(LABEL_WIDTH), Constraint::Fill(1)])
            .areas(Rect::new(rows_area.x, y, rows_area.width, 1));

        frame.render_widget(
            Paragraph::new(label(id, member, local_id == Some(id))),
            label_area,
        );
        frame.render_widget(
            Waveform {
                member,
                viewport,
                now_ms,
            },
            wave_area,
        );
    }
}
