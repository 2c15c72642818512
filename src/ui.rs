pub mod help;
pub mod panels;
pub mod screen;
pub mod script_view;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::console::{Console, Mode};

const HEADER_HEIGHT: u16 = 3;
const TIMER_HEIGHT: u16 = 7;
const AUDIO_HEIGHT: u16 = 5;
const TOPICS_HEIGHT: u16 = 8;

impl Widget for &Console {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(area);

        render_header(self, rows[0], buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);

        script_view::render(self, columns[0], buf);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TIMER_HEIGHT),
                Constraint::Length(AUDIO_HEIGHT),
                Constraint::Length(TOPICS_HEIGHT),
                Constraint::Min(3),
            ])
            .split(columns[1]);

        panels::render_timer(self, side[0], buf);
        panels::render_audio(self, side[1], buf);
        panels::render_topics(self, side[2], buf);
        panels::render_roster(self, side[3], buf);

        render_footer(self, rows[2], buf);
    }
}

fn render_header(console: &Console, area: Rect, buf: &mut Buffer) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    block.render(area, buf);

    let clock_width = console.clock_label().width() as u16 + 1;
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(clock_width)])
        .split(inner);

    Paragraph::new(Span::styled(
        console.lesson().heading.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .render(parts[0], buf);

    Paragraph::new(Span::styled(
        console.clock_label(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Right)
    .render(parts[1], buf);
}

fn render_footer(console: &Console, area: Rect, buf: &mut Buffer) {
    let hint = match console.mode() {
        Mode::Lesson => "(←/→) section (↑/↓) scroll (1-4) preset (s)tart (p)ause (r)eset (m)usic (t)opics (e)dit roster (?) help (q)uit",
        Mode::Roster { draft: None } => "(↑/↓) seat (enter) edit name (esc) back to lesson",
        Mode::Roster { draft: Some(_) } => "type a name (backspace) delete (enter) save (esc) cancel",
        Mode::Help => "any key to close",
    };

    Paragraph::new(Span::styled(
        hint,
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
    ))
    .render(area, buf);
}

/// Ten-cell text bar for a percentage, e.g. `■■■□□□□□□□ 30%`
pub fn volume_bar(percent: u8) -> String {
    let filled = ((percent.min(100) as usize) + 5) / 10;
    format!("{}{} {}%", "■".repeat(filled), "□".repeat(10 - filled), percent)
}

/// Cut `text` to at most `max` terminal columns, keeping the tail
/// so the end of a name being typed stays visible.
pub fn fit_tail(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }

    let mut width = 0;
    let mut kept: Vec<char> = Vec::new();
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if width + w > max.saturating_sub(1) {
            break;
        }
        width += w;
        kept.push(c);
    }
    kept.reverse();
    format!("…{}", kept.into_iter().collect::<String>())
}

pub(crate) fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub(crate) fn key_hint(key: &str, label: &str, enabled: bool) -> Vec<Span<'static>> {
    let (key_style, label_style) = if enabled {
        (
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            Style::default(),
        )
    } else {
        (dim(), dim())
    };
    vec![
        Span::styled(format!("({key})"), key_style),
        Span::styled(label.to_string(), label_style),
        Span::raw(" "),
    ]
}

pub(crate) fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(Line::from(Span::styled(
            format!(" {title} "),
            Style::default().add_modifier(Modifier::BOLD),
        )))
}

/// Flatten a rendered buffer into one string per row
#[cfg(test)]
pub(crate) fn buffer_rows(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.y..area.y + area.height)
        .map(|y| {
            (area.x..area.x + area.width)
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Instant;

    use chrono::{Local, TimeZone};

    use crate::audio::RecordingEngine;
    use crate::clock::FixedClock;
    use crate::console::{Console, ConsoleSettings};

    pub fn console() -> (Console, Instant) {
        let clock = FixedClock(Local.with_ymd_and_hms(2024, 4, 2, 9, 5, 3).unwrap());
        let t0 = Instant::now();
        let console = Console::new(
            ConsoleSettings {
                seed: Some(5),
                ..ConsoleSettings::default()
            },
            Box::new(RecordingEngine::new()),
            Box::new(clock),
            t0,
        )
        .unwrap();
        (console, t0)
    }

    /// Japanese text renders with a padding cell after each wide glyph
    pub fn squash(rows: &[String]) -> String {
        rows.iter()
            .map(|r| r.replace(' ', ""))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{console, squash};
    use super::*;

    fn draw(console: &Console, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        console.render(area, &mut buffer);
        buffer_rows(&buffer)
    }

    #[test]
    fn full_screen_shows_every_panel() {
        let (c, _) = console();
        let rows = draw(&c, 140, 45);
        let all = squash(&rows);

        assert!(all.contains("速読インストラクター専用アプリ"));
        assert!(all.contains("9:05:03"));
        assert!(all.contains("レッスン台本"));
        assert!(all.contains("準備(1/14)"));
        assert!(all.contains("10:00"));
        assert!(all.contains("速聴制御"));
        assert!(all.contains("トークテーマ"));
        assert!(all.contains("生徒一覧"));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let (c, _) = console();
        let area = Rect::new(0, 0, 20, 5);
        let mut buffer = Buffer::empty(area);

        (&c).render(area, &mut buffer);

        assert_eq!(buffer.area, area);
    }

    #[test]
    fn volume_bar_rounds_to_cells() {
        assert_eq!(volume_bar(30), "■■■□□□□□□□ 30%");
        assert_eq!(volume_bar(0), "□□□□□□□□□□ 0%");
        assert_eq!(volume_bar(100), "■■■■■■■■■■ 100%");
        assert_eq!(volume_bar(45), "■■■■■□□□□□ 45%");
    }

    #[test]
    fn fit_tail_respects_wide_characters() {
        assert_eq!(fit_tail("はなこ", 6), "はなこ");
        assert_eq!(fit_tail("やまだはなこ", 7), "…はなこ");
        assert_eq!(fit_tail("abcdef", 4), "…def");
    }
}
